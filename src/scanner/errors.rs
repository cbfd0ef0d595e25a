use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::decoding::DecodeError;
use crate::embeddings::EmbeddingError;

/// A single document that could not be turned into text. The scan logs it
/// and moves on.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// Failures that stop the whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("input path does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("failed to walk input directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("embedding failed for {url}: {source}")]
    Embedding {
        url: String,
        #[source]
        source: EmbeddingError,
    },
}
