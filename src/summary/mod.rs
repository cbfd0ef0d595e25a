//! Compressed output records and site-level aggregation.

pub mod aggregate;
pub mod compress;
pub mod model;
pub mod validate;

pub use aggregate::{find_homepage, site_stats, summarize_site};
pub use compress::compress;
pub use model::{FORMAT_VERSION, LlmrDocument, PageSummary, SiteStats, SiteSummary, StatsDetails};
pub use validate::{Severity, ValidationIssue, validate_pages};
