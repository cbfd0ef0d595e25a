use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::Config;
use crate::extractor::model::ExtractionRecord;
use crate::extractor::HeadingLevel;

static WORD_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[a-z]{3,}\b").unwrap());

pub const STOP_WORDS: [&str; 50] = [
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me",
];

/// Frequency-ranked keyword extraction over a page's visible text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    max_keywords: usize,
    stop_words: HashSet<String>,
}

impl KeywordExtractor {
    pub fn new(config: &Config) -> Self {
        let stop_words = STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_stop_words().iter().cloned())
            .collect();
        Self {
            max_keywords: config.max_keywords(),
            stop_words,
        }
    }

    /// Declared keywords followed by the most frequent extracted words,
    /// deduplicated and cut to the configured maximum.
    ///
    /// Extracted words are ranked by descending count, ties going to the
    /// word seen first. The merge keeps insertion order, so declared
    /// keywords come first and extracted words only fill the remaining slots.
    pub fn extract(&self, record: &ExtractionRecord) -> Vec<String> {
        let mut merged: Vec<String> = Vec::with_capacity(self.max_keywords);
        let candidates = record
            .keywords
            .iter()
            .cloned()
            .chain(self.top_words(&text_blob(record)));

        for keyword in candidates {
            if merged.len() == self.max_keywords {
                break;
            }
            if !merged.contains(&keyword) {
                merged.push(keyword);
            }
        }
        merged
    }

    /// Up to `max_keywords` words by descending frequency, stable on ties.
    pub fn top_words(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();

        for m in WORD_REGEX.find_iter(&lowered) {
            let word = m.as_str();
            if self.stop_words.contains(word) {
                continue;
            }
            let count = counts.entry(word).or_insert(0);
            if *count == 0 {
                order.push(word);
            }
            *count += 1;
        }

        // `order` is first-occurrence order; sort_by is stable.
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));
        order
            .into_iter()
            .take(self.max_keywords)
            .map(str::to_string)
            .collect()
    }
}

fn text_blob(record: &ExtractionRecord) -> String {
    [
        record.title.as_str(),
        record.description.as_str(),
        record.headings(HeadingLevel::H1).join(" ").as_str(),
        record.headings(HeadingLevel::H2).join(" ").as_str(),
        record.paragraphs.join(" ").as_str(),
    ]
    .join(" ")
}
