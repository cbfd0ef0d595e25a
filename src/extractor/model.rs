use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Heading levels `h1`..`h6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: String,
    pub rel: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub src: String,
    pub poster: String,
}

/// Which element opened a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeTag {
    Pre,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub tag: CodeTag,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrodataItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RdfaItem {
    pub property: String,
    #[serde(rename = "typeof")]
    pub type_of: String,
    pub content: String,
}

/// Everything pulled out of a single HTML document in one parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub language: String,
    pub canonical_url: String,
    /// Open Graph `og:type`, first occurrence.
    pub og_type: Option<String>,
    pub headings: BTreeMap<HeadingLevel, Vec<String>>,
    pub paragraphs: Vec<String>,
    pub list_items: Vec<String>,
    pub links: Vec<Link>,
    pub images: Vec<Image>,
    pub videos: Vec<Video>,
    pub code_blocks: Vec<CodeBlock>,
    pub json_ld: Vec<Value>,
    pub microdata: Vec<MicrodataItem>,
    pub rdfa: Vec<RdfaItem>,
    pub word_count: usize,
    pub estimated_read_time: usize,
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            keywords: Vec::new(),
            author: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            canonical_url: String::new(),
            og_type: None,
            headings: BTreeMap::new(),
            paragraphs: Vec::new(),
            list_items: Vec::new(),
            links: Vec::new(),
            images: Vec::new(),
            videos: Vec::new(),
            code_blocks: Vec::new(),
            json_ld: Vec::new(),
            microdata: Vec::new(),
            rdfa: Vec::new(),
            word_count: 0,
            estimated_read_time: 0,
        }
    }
}

impl ExtractionRecord {
    pub fn headings(&self, level: HeadingLevel) -> &[String] {
        self.headings.get(&level).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first_h1(&self) -> Option<&str> {
        self.headings(HeadingLevel::H1).first().map(String::as_str)
    }

    /// JSON-LD or microdata present. RDFa is left out because every Open
    /// Graph `<meta property=...>` would count.
    pub fn has_structured_data(&self) -> bool {
        !self.json_ld.is_empty() || !self.microdata.is_empty()
    }

    /// Sets `estimated_read_time` from `word_count`: rounded up, never below 1.
    pub fn calculate_read_time(&mut self, words_per_minute: usize) {
        let wpm = words_per_minute.max(1);
        self.estimated_read_time = self.word_count.div_ceil(wpm).max(1);
    }
}
