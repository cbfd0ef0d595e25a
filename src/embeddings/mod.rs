//! Text embeddings.
//!
//! The pipeline only depends on [`EmbeddingProvider`]. The one provider
//! built in is [`HashEmbedder`], a deterministic MD5-based stand-in that
//! needs no model or network access. Model-backed providers plug in behind
//! the same trait and are chosen through [`EmbeddingProviderKind`].

mod hash;

pub use hash::HashEmbedder;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::config::{Config, ConfigError};

/// Provider names that exist elsewhere but are not compiled into this crate.
const EXTERNAL_PROVIDERS: [&str; 4] = ["sentence-transformers", "openai", "cohere", "anthropic"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    #[error("provider returned {actual} dimensions, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding provider failed: {0}")]
    Provider(String),
}

/// Maps text to a fixed-length vector.
pub trait EmbeddingProvider {
    /// Length of every vector this provider returns.
    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingError>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn name(&self) -> &'static str;
}

/// Provider selection as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    Hash,
    /// Best available provider; only the hash provider is built in.
    Auto,
}

impl FromStr for EmbeddingProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "hash" => Ok(Self::Hash),
            "auto" => Ok(Self::Auto),
            other if EXTERNAL_PROVIDERS.contains(&other) => {
                Err(ConfigError::UnsupportedEmbeddingProvider(other.to_string()))
            }
            _ => Err(ConfigError::UnknownEmbeddingProvider(s.trim().to_string())),
        }
    }
}

impl Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hash => write!(f, "hash"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

/// Builds the provider selected by `config`.
pub fn provider_for(config: &Config) -> Box<dyn EmbeddingProvider> {
    match config.embedding_provider() {
        EmbeddingProviderKind::Hash => Box::new(HashEmbedder::new(config.embedding_dimensions())),
        EmbeddingProviderKind::Auto => {
            warn!(
                dimensions = config.embedding_dimensions(),
                "no model-backed embedding provider available, using hash embeddings"
            );
            Box::new(HashEmbedder::new(config.embedding_dimensions()))
        }
    }
}

/// Embeds `text` and checks the vector length against the provider's claim.
pub fn embed_checked(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<Vec<f64>, EmbeddingError> {
    let vector = provider.embed(text)?;
    if vector.len() != provider.dimensions() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: provider.dimensions(),
            actual: vector.len(),
        });
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl EmbeddingProvider for Broken {
        fn dimensions(&self) -> usize {
            4
        }
        fn embed(&self, _text: &str) -> Result<Vec<f64>, EmbeddingError> {
            Ok(vec![0.5; 3])
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[test]
    fn parses_provider_names() {
        assert_eq!("hash".parse::<EmbeddingProviderKind>(), Ok(EmbeddingProviderKind::Hash));
        assert_eq!(" Auto ".parse::<EmbeddingProviderKind>(), Ok(EmbeddingProviderKind::Auto));
        assert_eq!(
            "openai".parse::<EmbeddingProviderKind>(),
            Err(ConfigError::UnsupportedEmbeddingProvider("openai".to_string()))
        );
        assert_eq!(
            "magic".parse::<EmbeddingProviderKind>(),
            Err(ConfigError::UnknownEmbeddingProvider("magic".to_string()))
        );
    }

    #[test]
    fn provider_follows_config() {
        let config = Config::default().with_embedding_dimensions(8).unwrap();
        let provider = provider_for(&config);
        assert_eq!(provider.name(), "hash");
        assert_eq!(provider.dimensions(), 8);

        let auto = provider_for(&config.with_embedding_provider(EmbeddingProviderKind::Auto));
        assert_eq!(auto.name(), "hash");
    }

    #[test]
    fn embed_checked_rejects_wrong_length() {
        assert_eq!(
            embed_checked(&Broken, "text"),
            Err(EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn default_batch_embeds_each_text() {
        let batch = Broken.embed_batch(&["a", "b"]).unwrap();
        assert_eq!(batch.len(), 2);
    }
}
