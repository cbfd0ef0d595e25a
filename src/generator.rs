//! Builds and writes the output document for a directory scan or a single
//! fetched page.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::analysis::{PageAnalysis, PageAnalyzer};
use crate::config::Config;
use crate::embeddings::{EmbeddingError, provider_for};
use crate::extractor::extract;
use crate::fetcher::{FetchError, fetch};
use crate::scanner::{ScanError, SiteScanner};
use crate::summary::{
    FORMAT_VERSION, LlmrDocument, Severity, ValidationIssue, compress, find_homepage, site_stats,
    summarize_site, validate_pages,
};

/// Page id used when a remote URL has no path.
const REMOTE_INDEX_ID: &str = "index";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("remote url has no host: {0}")]
    MissingHost(String),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What a run produced, for the closing log lines.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub output_path: PathBuf,
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
    pub content_types: Vec<(String, usize)>,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub issues: Vec<ValidationIssue>,
}

impl RunReport {
    /// Output size as a fraction of the input HTML size.
    pub fn compression_ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }

    pub fn log(&self) {
        info!(
            output = %self.output_path.display(),
            discovered = self.discovered,
            processed = self.processed,
            failed = self.failed,
            "generation complete"
        );
        for (content_type, count) in &self.content_types {
            info!(content_type = %content_type, count, "content type");
        }
        if let Some(ratio) = self.compression_ratio() {
            info!(
                input_bytes = self.input_bytes,
                output_bytes = self.output_bytes,
                ratio = %format!("{:.1}%", ratio * 100.0),
                "output size"
            );
        }
    }
}

/// Assembles the output document. `homepage` designates the page whose
/// metadata describes the site; when `None` the usual `/` or `/index.html`
/// lookup applies.
pub fn build_document(
    pages: Vec<PageAnalysis>,
    homepage: Option<usize>,
    config: &Config,
) -> LlmrDocument {
    let home = match homepage {
        Some(index) => pages.get(index),
        None => find_homepage(&pages),
    };
    let site = summarize_site(&pages, home, config);
    let stats = site_stats(&pages);
    let summaries = pages.iter().map(|page| compress(page, config)).collect();
    let now = Local::now();

    LlmrDocument {
        version: FORMAT_VERSION.to_string(),
        generated: now.to_rfc3339_opts(SecondsFormat::Secs, false),
        timestamp: now.timestamp(),
        site,
        pages: summaries,
        stats,
        debug: config.include_debug_data().then_some(pages),
    }
}

/// Serializes `document` to `path`, returning the number of bytes written.
pub fn write_document(
    document: &LlmrDocument,
    path: &Path,
    pretty: bool,
) -> Result<u64, GenerateError> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(document)?
    } else {
        serde_json::to_vec(document)?
    };
    fs::write(path, &bytes).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len() as u64)
}

/// Scans `input` (a directory or one file) and writes the document to
/// `output`. Without a configured base URL the site's `base_url` is the
/// input path.
pub fn generate_site(
    input: &Path,
    output: &Path,
    config: &Config,
) -> Result<RunReport, GenerateError> {
    let config = if config.base_url().is_empty() {
        config.clone().with_base_url(input.display().to_string())
    } else {
        config.clone()
    };

    let embedder = provider_for(&config);
    let analyzer = PageAnalyzer::new(&config, embedder.as_ref());
    let outcome = SiteScanner::new(input, &config)?.scan(&analyzer)?;

    let document = build_document(outcome.pages, None, &config);
    finish(
        document,
        output,
        &config,
        outcome.discovered,
        outcome.failed,
        outcome.input_bytes,
    )
}

/// Fetches one page and writes a single-page document into `output_dir`,
/// named after the URL's host.
pub async fn generate_remote(
    url: &str,
    output_dir: &Path,
    config: &Config,
) -> Result<RunReport, GenerateError> {
    let parsed = Url::parse(url).map_err(FetchError::from)?;
    let output = output_dir.join(remote_output_filename(&parsed)?);

    let response = fetch(url).await?;
    info!(url = %response.url_final, status = %response.status, "fetched remote page");

    let config = if config.base_url().is_empty() {
        config.clone().with_base_url(url)
    } else {
        config.clone()
    };

    let embedder = provider_for(&config);
    let analyzer = PageAnalyzer::new(&config, embedder.as_ref());
    let record = extract(&response.body_utf8, &config);
    let page = analyzer.analyze(remote_page_id(&parsed), url, record)?;

    let document = build_document(vec![page], Some(0), &config);
    finish(document, &output, &config, 1, 0, response.body_raw.len() as u64)
}

fn finish(
    document: LlmrDocument,
    output: &Path,
    config: &Config,
    discovered: usize,
    failed: usize,
    input_bytes: u64,
) -> Result<RunReport, GenerateError> {
    let issues = validate_pages(&document.pages);
    for issue in &issues {
        match issue.severity {
            Severity::Error => error!(%issue, "validation"),
            Severity::Warning => warn!(%issue, "validation"),
        }
    }

    let output_bytes = write_document(&document, output, config.pretty())?;

    Ok(RunReport {
        output_path: output.to_path_buf(),
        discovered,
        processed: document.pages.len(),
        failed,
        content_types: document.site.content_types.into_iter().collect(),
        input_bytes,
        output_bytes,
        issues,
    })
}

/// `<host>.json` with a leading `www.` removed.
pub fn remote_output_filename(url: &Url) -> Result<String, GenerateError> {
    let host = url
        .host_str()
        .ok_or_else(|| GenerateError::MissingHost(url.to_string()))?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    Ok(format!("{host}.json"))
}

/// The URL path with slashes turned into underscores, or `index`.
pub fn remote_page_id(url: &Url) -> String {
    let id = url.path().trim_matches('/').replace('/', "_");
    if id.is_empty() {
        REMOTE_INDEX_ID.to_string()
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn remote_names() {
        assert_eq!(
            remote_output_filename(&url("https://www.example.com/blog/post")).unwrap(),
            "example.com.json"
        );
        assert_eq!(
            remote_output_filename(&url("http://docs.rs:8080/")).unwrap(),
            "docs.rs.json"
        );
        assert_eq!(remote_page_id(&url("https://example.com/blog/post/")), "blog_post");
        assert_eq!(remote_page_id(&url("https://example.com")), "index");
    }

    #[test]
    fn compression_ratio_needs_input() {
        let mut report = RunReport {
            output_path: PathBuf::from("site.json"),
            discovered: 0,
            processed: 0,
            failed: 0,
            content_types: Vec::new(),
            input_bytes: 0,
            output_bytes: 50,
            issues: Vec::new(),
        };
        assert_eq!(report.compression_ratio(), None);
        report.input_bytes = 200;
        assert_eq!(report.compression_ratio(), Some(0.25));
    }

    #[test]
    fn empty_document_shape() {
        let document = build_document(Vec::new(), None, &Config::default());
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["version"], "2.0");
        assert_eq!(json["site"]["total_pages"], 0);
        assert_eq!(json["stats"], serde_json::json!({"total_pages": 0}));
        assert_eq!(json["pages"], serde_json::json!([]));
        assert!(json.get("debug").is_none());
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }
}
