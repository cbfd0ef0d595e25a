use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::analysis::PageAnalysis;

pub const FORMAT_VERSION: &str = "2.0";

/// Compressed per-page record.
///
/// Optional keys are left out of the JSON entirely when they carry nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: String,
    /// URL
    pub u: String,
    /// Content type
    pub t: String,
    /// Title
    pub ti: String,
    /// Description
    pub d: String,
    /// Keywords
    pub kw: Vec<String>,
    /// Word count
    pub wc: usize,
    /// Read time in minutes
    pub rt: usize,
    /// Embedding
    pub emb: Vec<f64>,
    /// Author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    /// Language, only when not English
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<String>,
    /// Structured data flag, always 1 when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sd: Option<u8>,
    /// Code block count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cb: Option<usize>,
    /// First h1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSummary {
    pub title: String,
    pub description: String,
    pub author: String,
    pub base_url: String,
    pub content_types: BTreeMap<String, usize>,
    pub total_pages: usize,
}

/// Site statistics. With zero pages only `total_pages` is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteStats {
    pub total_pages: usize,
    #[serde(flatten)]
    pub details: Option<StatsDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsDetails {
    pub total_words: usize,
    /// Mean read time, one decimal place.
    pub avg_read_time: f64,
    pub pages_with_code: usize,
    pub pages_with_structured_data: usize,
    pub total_images: usize,
    pub total_videos: usize,
    pub languages: BTreeSet<String>,
}

/// The generated output file.
#[derive(Debug, Clone, Serialize)]
pub struct LlmrDocument {
    pub version: String,
    /// ISO-8601 local time.
    pub generated: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub site: SiteSummary,
    pub pages: Vec<PageSummary>,
    pub stats: SiteStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<PageAnalysis>>,
}
