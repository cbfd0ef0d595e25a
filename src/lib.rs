pub mod analysis;
pub mod config;
pub mod decoding;
pub mod embeddings;
pub mod extractor;
pub mod fetcher;
pub mod generator;
pub mod scanner;
pub mod summary;
