//! Content-type classification.
//!
//! Rules are evaluated in order and the first one that yields a type wins:
//! configured URL overrides, JSON-LD `@type`, microdata `itemtype`, the Open
//! Graph type, the keyword table, then [`DEFAULT_CONTENT_TYPE`].

use serde_json::{Map, Value};

use crate::config::Config;
use crate::extractor::HeadingLevel;
use crate::extractor::model::ExtractionRecord;
use crate::extractor::structured::json_ld_objects;

pub const DEFAULT_CONTENT_TYPE: &str = "WebPage";

/// How many h1 headings and paragraphs feed the keyword haystack.
const HAYSTACK_DEPTH: usize = 3;

const CONTENT_TYPE_RULES: [(&str, &[&str]); 13] = [
    ("Article", &["article", "blog", "post", "news"]),
    ("Product", &["product", "item", "shop"]),
    ("Event", &["event", "conference", "meetup"]),
    ("Organization", &["about", "company", "organization"]),
    ("Person", &["profile", "author", "bio"]),
    ("HowTo", &["tutorial", "guide", "howto"]),
    ("FAQPage", &["faq", "questions"]),
    ("ContactPage", &["contact"]),
    ("Recipe", &["recipe", "cooking"]),
    ("VideoObject", &["video", "watch"]),
    ("Course", &["course", "training", "learn"]),
    ("JobPosting", &["job", "career", "hiring"]),
    ("Review", &["review", "rating"]),
];

/// JSON-LD keys copied into the schema data.
const SCHEMA_KEYS: [&str; 8] = [
    "datePublished",
    "dateModified",
    "headline",
    "articleBody",
    "keywords",
    "author",
    "publisher",
    "image",
];

type Rule = fn(&ExtractionRecord, &str, &Config) -> Option<String>;

const CASCADE: [Rule; 5] = [
    url_override,
    json_ld_type,
    microdata_type,
    open_graph_type,
    keyword_match,
];

/// Picks the content type for a page served at `url`.
pub fn classify(record: &ExtractionRecord, url: &str, config: &Config) -> String {
    CASCADE
        .iter()
        .find_map(|rule| rule(record, url, config))
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

fn url_override(_record: &ExtractionRecord, url: &str, config: &Config) -> Option<String> {
    config
        .url_type_overrides()
        .iter()
        .find(|(pattern, _)| pattern == url)
        .map(|(_, content_type)| content_type.clone())
}

fn json_ld_type(record: &ExtractionRecord, _url: &str, _config: &Config) -> Option<String> {
    json_ld_objects(&record.json_ld).find_map(|obj| match obj.get("@type")? {
        Value::String(name) if !name.is_empty() => Some(name.clone()),
        Value::Array(names) => names
            .first()?
            .as_str()
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        _ => None,
    })
}

fn microdata_type(record: &ExtractionRecord, _url: &str, _config: &Config) -> Option<String> {
    record
        .microdata
        .iter()
        .find(|item| !item.item_type.is_empty())
        .and_then(|item| {
            item.item_type
                .rsplit('/')
                .find(|segment| !segment.is_empty())
                .map(str::to_string)
        })
}

fn open_graph_type(record: &ExtractionRecord, _url: &str, _config: &Config) -> Option<String> {
    record.og_type.clone()
}

fn keyword_match(record: &ExtractionRecord, url: &str, config: &Config) -> Option<String> {
    let url = url.to_lowercase();
    let haystack = haystack(record);
    let matches = |keyword: &str| url.contains(keyword) || haystack.contains(keyword);

    let builtin = CONTENT_TYPE_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| matches(k)))
        .map(|(name, _)| name.to_string());

    builtin.or_else(|| {
        config
            .custom_content_types()
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| matches(k)))
            .map(|(name, _)| name.clone())
    })
}

fn haystack(record: &ExtractionRecord) -> String {
    let h1 = record.headings(HeadingLevel::H1);
    let h1 = &h1[..h1.len().min(HAYSTACK_DEPTH)];
    let paragraphs = &record.paragraphs[..record.paragraphs.len().min(HAYSTACK_DEPTH)];

    [
        record.title.as_str(),
        record.description.as_str(),
        h1.join(" ").as_str(),
        paragraphs.join(" ").as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Base page fields plus the recognized JSON-LD keys, each taken from the
/// first JSON-LD object that carries it.
pub fn schema_data(record: &ExtractionRecord, content_type: &str) -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("type".into(), content_type.into());
    data.insert("title".into(), record.title.as_str().into());
    data.insert("description".into(), record.description.as_str().into());
    data.insert("author".into(), record.author.as_str().into());
    data.insert("language".into(), record.language.as_str().into());

    for key in SCHEMA_KEYS {
        if let Some(value) = json_ld_objects(&record.json_ld).find_map(|obj| obj.get(key)) {
            data.insert(key.to_string(), value.clone());
        }
    }
    data
}
