//! Directory scanning: discovers `.html` files under a root, decodes them
//! and runs each one through extraction and analysis.

pub mod errors;

pub use errors::{DocumentError, ScanError};

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analysis::{PageAnalysis, PageAnalyzer};
use crate::config::{Config, ConfigError};
use crate::decoding::decode_html;
use crate::extractor::extract;

const HTML_EXTENSION: &str = "html";

/// An HTML file read and decoded from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File stem.
    pub id: String,
    /// `/` followed by the path relative to the scan root.
    pub url: String,
    pub path: PathBuf,
    pub html: String,
    /// Size on disk before decoding.
    pub size: u64,
}

/// Files found under a scan root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    /// Entries below the root that could not be walked, such as unreadable
    /// directories or dangling links.
    pub unreadable: usize,
}

/// Result of a scan: the analysed pages in traversal order plus counts for
/// the run report.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub pages: Vec<PageAnalysis>,
    pub discovered: usize,
    pub failed: usize,
    /// Total bytes of the HTML that made it into `pages`.
    pub input_bytes: u64,
}

pub struct SiteScanner<'a> {
    root: PathBuf,
    config: &'a Config,
    skip_patterns: GlobSet,
}

impl<'a> SiteScanner<'a> {
    pub fn new(root: impl Into<PathBuf>, config: &'a Config) -> Result<Self, ScanError> {
        let root = root.into();
        if !root.exists() {
            return Err(ScanError::RootNotFound(root));
        }
        let skip_patterns = compile_skip_patterns(config.skip_patterns())?;
        Ok(Self {
            root,
            config,
            skip_patterns,
        })
    }

    /// HTML files to process, sorted by path. A root that is itself a file
    /// is returned as-is and not subject to skip rules. Symbolic links are
    /// followed. Entries below the root that cannot be walked are logged and
    /// counted; only an unreadable root fails discovery.
    pub fn discover(&self) -> Result<Discovery, ScanError> {
        if self.root.is_file() {
            return Ok(Discovery {
                files: vec![self.root.clone()],
                unreadable: 0,
            });
        }

        let mut discovery = Discovery::default();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    discovery.unreadable += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() || !has_html_extension(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
            if self.is_skipped(relative) {
                debug!(path = %relative.display(), "skipping file");
                continue;
            }
            discovery.files.push(entry.into_path());
        }
        Ok(discovery)
    }

    fn is_skipped(&self, relative: &Path) -> bool {
        let skipped_name = relative
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.config.skip_files().iter().any(|skip| skip == name));
        skipped_name || self.skip_patterns.is_match(relative)
    }

    /// Reads and decodes one file.
    pub fn load(&self, path: &Path) -> Result<SourceDocument, DocumentError> {
        let bytes = fs::read(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let (html, charset) = decode_html(None, &bytes).map_err(|source| DocumentError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), charset = ?charset, "decoded file");

        Ok(SourceDocument {
            id: file_id(path),
            url: self.url_for(path),
            path: path.to_path_buf(),
            html,
            size: bytes.len() as u64,
        })
    }

    fn url_for(&self, path: &Path) -> String {
        let relative = if self.root.is_file() {
            path.file_name().map(Path::new).unwrap_or(path)
        } else {
            path.strip_prefix(&self.root).unwrap_or(path)
        };
        let segments: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect();
        format!("/{}", segments.join("/"))
    }

    /// Discovers, extracts and analyses every page. Unreadable documents and
    /// directory entries are logged, counted as failed and left out; anything
    /// else fails the scan.
    pub fn scan(&self, analyzer: &PageAnalyzer<'_>) -> Result<ScanOutcome, ScanError> {
        let Discovery { files, unreadable } = self.discover()?;
        info!(
            root = %self.root.display(),
            files = files.len(),
            unreadable,
            "discovered HTML files"
        );

        let mut outcome = ScanOutcome {
            discovered: files.len(),
            failed: unreadable,
            ..Default::default()
        };

        for path in &files {
            let document = match self.load(path) {
                Ok(document) => document,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping document");
                    outcome.failed += 1;
                    continue;
                }
            };

            let record = extract(&document.html, self.config);
            let url = document.url.clone();
            let page = analyzer
                .analyze(document.id, document.url, record)
                .map_err(|source| ScanError::Embedding { url, source })?;

            info!(
                url = %page.url,
                content_type = %page.content_type,
                words = page.word_count,
                "processed page"
            );
            outcome.input_bytes += document.size;
            outcome.pages.push(page);
        }

        info!(
            processed = outcome.pages.len(),
            failed = outcome.failed,
            "scan finished"
        );
        Ok(outcome)
    }
}

fn compile_skip_patterns(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidSkipPattern {
            pattern: pattern.clone(),
            reason: e.kind().to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidSkipPattern {
        pattern: patterns.join(","),
        reason: e.to_string(),
    })
}

fn has_html_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(HTML_EXTENSION))
}

fn file_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &[u8]) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn discovers_sorted_html_and_applies_skip_rules() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", b"<p>home</p>");
        write(dir.path(), "blog/b.html", b"<p>b</p>");
        write(dir.path(), "blog/a.HTML", b"<p>a</p>");
        write(dir.path(), "404.html", b"<p>missing</p>");
        write(dir.path(), "node_modules/pkg/readme.html", b"<p>dep</p>");
        write(dir.path(), "notes.txt", b"not html");

        let config = Config::default();
        let scanner = SiteScanner::new(dir.path(), &config).unwrap();
        let files: Vec<_> = scanner
            .discover()
            .unwrap()
            .files
            .into_iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            files,
            [
                PathBuf::from("blog/a.HTML"),
                PathBuf::from("blog/b.html"),
                PathBuf::from("index.html"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn follows_links_and_counts_broken_ones() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        write(dir.path(), "index.html", b"<p>home</p>");
        write(shared.path(), "faq.html", b"<p>faq</p>");
        symlink(shared.path().join("faq.html"), dir.path().join("faq.html")).unwrap();
        symlink(dir.path().join("gone.html"), dir.path().join("broken.html")).unwrap();

        let config = Config::default();
        let scanner = SiteScanner::new(dir.path(), &config).unwrap();
        let discovery = scanner.discover().unwrap();

        assert_eq!(
            discovery.files,
            [dir.path().join("faq.html"), dir.path().join("index.html")]
        );
        assert_eq!(discovery.unreadable, 1);
    }

    #[test]
    fn load_builds_url_and_id() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "docs/guide/intro.html", b"<title>Intro</title>");

        let config = Config::default();
        let scanner = SiteScanner::new(dir.path(), &config).unwrap();
        let doc = scanner
            .load(&dir.path().join("docs/guide/intro.html"))
            .unwrap();

        assert_eq!(doc.id, "intro");
        assert_eq!(doc.url, "/docs/guide/intro.html");
        assert_eq!(doc.html, "<title>Intro</title>");
        assert_eq!(doc.size, 20);
    }

    #[test]
    fn single_file_root() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "page.html", b"<p>solo</p>");
        let file = dir.path().join("page.html");

        let config = Config::default();
        let scanner = SiteScanner::new(&file, &config).unwrap();
        assert_eq!(scanner.discover().unwrap().files, [file.clone()]);
        assert_eq!(scanner.load(&file).unwrap().url, "/page.html");
    }

    #[test]
    fn missing_root_is_an_error() {
        let config = Config::default();
        let result = SiteScanner::new("/definitely/not/here", &config);
        assert!(matches!(result, Err(ScanError::RootNotFound(_))));
    }

    #[test]
    fn bad_skip_pattern_is_a_config_error() {
        let config = Config::default().with_skip_patterns(vec!["a[".to_string()]);
        let dir = TempDir::new().unwrap();
        let result = SiteScanner::new(dir.path(), &config);
        assert!(matches!(
            result,
            Err(ScanError::Config(ConfigError::InvalidSkipPattern { .. }))
        ));
    }

    #[test]
    fn undecodable_file_is_a_document_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "bad.html", b"<meta charset=\"utf-8\"><p>\xff</p>");
        let config = Config::default();
        let scanner = SiteScanner::new(dir.path(), &config).unwrap();
        let err = scanner.load(&dir.path().join("bad.html")).unwrap_err();
        assert!(matches!(err, DocumentError::Decode { .. }));
    }
}
