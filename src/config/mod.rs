//! Configuration handling for the generator.
//!
//! Every tunable constant of the pipeline lives here. The core never reads
//! the environment itself: callers build a `Config` (usually through
//! `Config::from_env`, optionally overridden by CLI flags) and pass it down
//! explicitly.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::embeddings::EmbeddingProviderKind;

/// Environment variable names. Public so the CLI and tests can refer to them.
pub const ENV_EMBEDDING_METHOD: &str = "LLMR_EMBEDDING_METHOD";
pub const ENV_EMBEDDING_DIMENSIONS: &str = "LLMR_EMBEDDING_DIMENSIONS";
pub const ENV_MAX_KEYWORDS: &str = "LLMR_MAX_KEYWORDS";
pub const ENV_MAX_TITLE_LENGTH: &str = "LLMR_MAX_TITLE_LENGTH";
pub const ENV_MAX_DESCRIPTION_LENGTH: &str = "LLMR_MAX_DESCRIPTION_LENGTH";
pub const ENV_PARAGRAPHS_FOR_EMBEDDING: &str = "LLMR_PARAGRAPHS_FOR_EMBEDDING";
pub const ENV_WORDS_PER_MINUTE: &str = "LLMR_WORDS_PER_MINUTE";
pub const ENV_SKIP_PATTERNS: &str = "LLMR_SKIP_PATTERNS";
pub const ENV_SKIP_FILES: &str = "LLMR_SKIP_FILES";
pub const ENV_OUTPUT_FILENAME: &str = "LLMR_OUTPUT_FILENAME";
pub const ENV_BASE_URL: &str = "LLMR_BASE_URL";
pub const ENV_PRETTY: &str = "LLMR_PRETTY";
pub const ENV_INCLUDE_DEBUG_DATA: &str = "LLMR_INCLUDE_DEBUG_DATA";
pub const ENV_DETECT_LANGUAGE: &str = "LLMR_DETECT_LANGUAGE";
pub const ENV_STOP_WORDS: &str = "LLMR_STOP_WORDS";

const ALL_ENV_VARS: [&str; 15] = [
    ENV_EMBEDDING_METHOD,
    ENV_EMBEDDING_DIMENSIONS,
    ENV_MAX_KEYWORDS,
    ENV_MAX_TITLE_LENGTH,
    ENV_MAX_DESCRIPTION_LENGTH,
    ENV_PARAGRAPHS_FOR_EMBEDDING,
    ENV_WORDS_PER_MINUTE,
    ENV_SKIP_PATTERNS,
    ENV_SKIP_FILES,
    ENV_OUTPUT_FILENAME,
    ENV_BASE_URL,
    ENV_PRETTY,
    ENV_INCLUDE_DEBUG_DATA,
    ENV_DETECT_LANGUAGE,
    ENV_STOP_WORDS,
];

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 16;
pub const DEFAULT_MAX_KEYWORDS: usize = 10;
pub const DEFAULT_MAX_TITLE_LENGTH: usize = 100;
pub const DEFAULT_MAX_DESCRIPTION_LENGTH: usize = 200;
pub const DEFAULT_PARAGRAPHS_FOR_EMBEDDING: usize = 5;
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;
pub const DEFAULT_OUTPUT_FILENAME: &str = "site.json";

const DEFAULT_SKIP_PATTERNS: [&str; 7] = [
    "**/node_modules/**",
    "**/vendor/**",
    "**/tests/**",
    "**/test/**",
    "**/.git/**",
    "**/admin/**",
    "**/private/**",
];

const DEFAULT_SKIP_FILES: [&str; 4] = ["404.html", "500.html", "error.html", "test.html"];

/// Generator runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    embedding_provider: EmbeddingProviderKind,
    embedding_dimensions: usize,
    max_keywords: usize,
    max_title_length: usize,
    max_description_length: usize,
    paragraphs_for_embedding: usize,
    words_per_minute: usize,
    skip_patterns: Vec<String>,
    skip_files: Vec<String>,
    output_filename: String,
    base_url: String,
    pretty: bool,
    include_debug_data: bool,
    detect_language: bool,
    extra_stop_words: Vec<String>,
    custom_content_types: Vec<(String, Vec<String>)>,
    url_type_overrides: Vec<(String, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            embedding_provider: EmbeddingProviderKind::Hash,
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
            max_keywords: DEFAULT_MAX_KEYWORDS,
            max_title_length: DEFAULT_MAX_TITLE_LENGTH,
            max_description_length: DEFAULT_MAX_DESCRIPTION_LENGTH,
            paragraphs_for_embedding: DEFAULT_PARAGRAPHS_FOR_EMBEDDING,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect(),
            skip_files: DEFAULT_SKIP_FILES.iter().map(|s| s.to_string()).collect(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            base_url: String::new(),
            pretty: true,
            include_debug_data: false,
            detect_language: false,
            extra_stop_words: Vec::new(),
            custom_content_types: Vec::new(),
            url_type_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Load from `LLMR_*` environment variables, falling back to defaults.
    ///
    /// Fails fast on unparsable numbers, zero-valued limits and embedding
    /// providers this build cannot serve.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(method) = read_var(ENV_EMBEDDING_METHOD) {
            cfg.embedding_provider = method.parse()?;
        }
        if let Some(dims) = parse_positive(ENV_EMBEDDING_DIMENSIONS)? {
            cfg.embedding_dimensions = dims;
        }
        if let Some(n) = parse_positive(ENV_MAX_KEYWORDS)? {
            cfg.max_keywords = n;
        }
        if let Some(n) = parse_positive(ENV_MAX_TITLE_LENGTH)? {
            cfg.max_title_length = n;
        }
        if let Some(n) = parse_positive(ENV_MAX_DESCRIPTION_LENGTH)? {
            cfg.max_description_length = n;
        }
        if let Some(n) = parse_positive(ENV_PARAGRAPHS_FOR_EMBEDDING)? {
            cfg.paragraphs_for_embedding = n;
        }
        if let Some(n) = parse_positive(ENV_WORDS_PER_MINUTE)? {
            cfg.words_per_minute = n;
        }
        if let Some(patterns) = read_var(ENV_SKIP_PATTERNS) {
            cfg.skip_patterns = split_list(&patterns);
        }
        if let Some(files) = read_var(ENV_SKIP_FILES) {
            cfg.skip_files = split_list(&files);
        }
        if let Some(name) = read_var(ENV_OUTPUT_FILENAME) {
            cfg.output_filename = name;
        }
        if let Some(base_url) = read_var(ENV_BASE_URL) {
            cfg.base_url = base_url;
        }
        if let Some(pretty) = parse_bool(ENV_PRETTY)? {
            cfg.pretty = pretty;
        }
        if let Some(debug) = parse_bool(ENV_INCLUDE_DEBUG_DATA)? {
            cfg.include_debug_data = debug;
        }
        if let Some(detect) = parse_bool(ENV_DETECT_LANGUAGE)? {
            cfg.detect_language = detect;
        }
        if let Some(words) = read_var(ENV_STOP_WORDS) {
            cfg.extra_stop_words = split_list(&words)
                .into_iter()
                .map(|w| w.to_lowercase())
                .collect();
        }

        Ok(cfg)
    }

    /// Names of every environment variable `from_env` consults.
    pub fn env_vars() -> &'static [&'static str] {
        &ALL_ENV_VARS
    }

    pub fn embedding_provider(&self) -> EmbeddingProviderKind {
        self.embedding_provider
    }
    /// Length of every embedding vector written to the output.
    pub fn embedding_dimensions(&self) -> usize {
        self.embedding_dimensions
    }
    pub fn max_keywords(&self) -> usize {
        self.max_keywords
    }
    /// Title truncation length in characters.
    pub fn max_title_length(&self) -> usize {
        self.max_title_length
    }
    /// Description truncation length in characters.
    pub fn max_description_length(&self) -> usize {
        self.max_description_length
    }
    pub fn paragraphs_for_embedding(&self) -> usize {
        self.paragraphs_for_embedding
    }
    pub fn words_per_minute(&self) -> usize {
        self.words_per_minute
    }
    /// Glob patterns matched against paths relative to the scan root.
    pub fn skip_patterns(&self) -> &[String] {
        &self.skip_patterns
    }
    /// Exact file names that are never scanned.
    pub fn skip_files(&self) -> &[String] {
        &self.skip_files
    }
    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    pub fn pretty(&self) -> bool {
        self.pretty
    }
    pub fn include_debug_data(&self) -> bool {
        self.include_debug_data
    }
    pub fn detect_language(&self) -> bool {
        self.detect_language
    }
    pub fn extra_stop_words(&self) -> &[String] {
        &self.extra_stop_words
    }
    /// Content-type rules evaluated after the built-in keyword table.
    pub fn custom_content_types(&self) -> &[(String, Vec<String>)] {
        &self.custom_content_types
    }
    /// Exact page URL to content type, checked before any other rule.
    pub fn url_type_overrides(&self) -> &[(String, String)] {
        &self.url_type_overrides
    }

    pub fn with_embedding_provider(mut self, provider: EmbeddingProviderKind) -> Self {
        self.embedding_provider = provider;
        self
    }

    pub fn with_embedding_dimensions(mut self, dimensions: usize) -> Result<Self, ConfigError> {
        self.embedding_dimensions = non_zero("embedding_dimensions", dimensions)?;
        Ok(self)
    }

    pub fn with_max_keywords(mut self, max_keywords: usize) -> Result<Self, ConfigError> {
        self.max_keywords = non_zero("max_keywords", max_keywords)?;
        Ok(self)
    }

    pub fn with_max_title_length(mut self, length: usize) -> Result<Self, ConfigError> {
        self.max_title_length = non_zero("max_title_length", length)?;
        Ok(self)
    }

    pub fn with_max_description_length(mut self, length: usize) -> Result<Self, ConfigError> {
        self.max_description_length = non_zero("max_description_length", length)?;
        Ok(self)
    }

    pub fn with_skip_patterns(mut self, patterns: Vec<String>) -> Self {
        self.skip_patterns = patterns;
        self
    }

    pub fn with_skip_files(mut self, files: Vec<String>) -> Self {
        self.skip_files = files;
        self
    }

    pub fn with_output_filename(mut self, name: impl Into<String>) -> Self {
        self.output_filename = name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_include_debug_data(mut self, include: bool) -> Self {
        self.include_debug_data = include;
        self
    }

    pub fn with_detect_language(mut self, detect: bool) -> Self {
        self.detect_language = detect;
        self
    }

    pub fn with_extra_stop_words(mut self, words: Vec<String>) -> Self {
        self.extra_stop_words = words.into_iter().map(|w| w.to_lowercase()).collect();
        self
    }

    pub fn with_custom_content_type(
        mut self,
        content_type: impl Into<String>,
        keywords: Vec<String>,
    ) -> Self {
        let keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        self.custom_content_types.push((content_type.into(), keywords));
        self
    }

    pub fn with_url_type_override(
        mut self,
        url: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        self.url_type_overrides.push((url.into(), content_type.into()));
        self
    }
}

/// Errors that can occur while building a configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unknown embedding provider: {0}")]
    UnknownEmbeddingProvider(String),

    #[error("embedding provider '{0}' is not available in this build")]
    UnsupportedEmbeddingProvider(String),

    #[error("invalid skip pattern '{pattern}': {reason}")]
    InvalidSkipPattern { pattern: String, reason: String },
}

fn read_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive(key: &'static str) -> Result<Option<usize>, ConfigError> {
    let Some(raw) = read_var(key) else {
        return Ok(None);
    };
    let value = usize::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
        field: key,
        reason: format!("'{raw}' is not a number: {e}"),
    })?;
    non_zero(key, value).map(Some)
}

fn parse_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = read_var(key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidValue {
            field: key,
            reason: format!("'{raw}' is not a boolean"),
        }),
    }
}

fn non_zero(field: &'static str, value: usize) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
