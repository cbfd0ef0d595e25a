use std::collections::{BTreeMap, BTreeSet};

use crate::analysis::PageAnalysis;
use crate::config::Config;
use crate::summary::compress::truncate_chars;
use crate::summary::model::{SiteStats, SiteSummary, StatsDetails};

/// URLs that mark a page as the homepage in a directory scan.
pub const HOMEPAGE_URLS: [&str; 2] = ["/", "/index.html"];

pub fn find_homepage(pages: &[PageAnalysis]) -> Option<&PageAnalysis> {
    pages
        .iter()
        .find(|page| HOMEPAGE_URLS.contains(&page.url.as_str()))
}

/// Site metadata taken from `homepage`, with the content-type histogram
/// counted over all `pages`. Without a homepage title, description and
/// author stay empty.
pub fn summarize_site(
    pages: &[PageAnalysis],
    homepage: Option<&PageAnalysis>,
    config: &Config,
) -> SiteSummary {
    let mut content_types = BTreeMap::new();
    for page in pages {
        *content_types.entry(page.content_type.clone()).or_insert(0) += 1;
    }

    let mut site = SiteSummary {
        base_url: config.base_url().to_string(),
        content_types,
        total_pages: pages.len(),
        ..Default::default()
    };
    if let Some(home) = homepage {
        site.title = home.title.clone();
        site.description = truncate_chars(&home.description, config.max_description_length());
        site.author = home.author.clone();
    }
    site
}

pub fn site_stats(pages: &[PageAnalysis]) -> SiteStats {
    if pages.is_empty() {
        return SiteStats::default();
    }

    let mut details = StatsDetails {
        total_words: 0,
        avg_read_time: 0.0,
        pages_with_code: 0,
        pages_with_structured_data: 0,
        total_images: 0,
        total_videos: 0,
        languages: BTreeSet::new(),
    };
    let mut total_read_time = 0;

    for page in pages {
        details.total_words += page.word_count;
        total_read_time += page.read_time;
        if page.code_blocks_count > 0 {
            details.pages_with_code += 1;
        }
        if page.has_structured_data {
            details.pages_with_structured_data += 1;
        }
        details.total_images += page.images_count;
        details.total_videos += page.videos_count;
        details.languages.insert(page.language.clone());
    }

    let mean = total_read_time as f64 / pages.len() as f64;
    details.avg_read_time = (mean * 10.0).round() / 10.0;

    SiteStats {
        total_pages: pages.len(),
        details: Some(details),
    }
}
