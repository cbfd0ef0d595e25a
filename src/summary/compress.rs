use crate::analysis::PageAnalysis;
use crate::config::Config;
use crate::extractor::model::DEFAULT_LANGUAGE;
use crate::summary::model::PageSummary;

/// Maps a page onto its compressed record.
///
/// Presence rules for the optional keys:
/// - `a`: author is non-empty
/// - `l`: language is non-empty and not the default
/// - `sd`: JSON-LD or microdata was found
/// - `cb`: at least one code block
/// - `h1`: the page has an h1, truncated like the title
pub fn compress(page: &PageAnalysis, config: &Config) -> PageSummary {
    let title_limit = config.max_title_length();

    PageSummary {
        id: page.id.clone(),
        u: page.url.clone(),
        t: page.content_type.clone(),
        ti: truncate_chars(&page.title, title_limit),
        d: truncate_chars(&page.description, config.max_description_length()),
        kw: page
            .keywords
            .iter()
            .take(config.max_keywords())
            .cloned()
            .collect(),
        wc: page.word_count,
        rt: page.read_time,
        emb: page.embedding.clone(),
        a: Some(page.author.clone()).filter(|a| !a.is_empty()),
        l: Some(page.language.clone()).filter(|l| !l.is_empty() && l != DEFAULT_LANGUAGE),
        sd: page.has_structured_data.then_some(1),
        cb: Some(page.code_blocks_count).filter(|&n| n > 0),
        h1: page.first_h1().map(|h| truncate_chars(h, title_limit)),
    }
}

/// First `max` characters of `text`. Counts chars, not bytes.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
