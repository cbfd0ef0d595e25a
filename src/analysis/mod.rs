//! Per-page analysis on top of a finished [`ExtractionRecord`].
//!
//! Classification, keyword ranking and the embedding all read the record;
//! none of them mutate it.

pub mod classifier;
pub mod keywords;

pub use classifier::{DEFAULT_CONTENT_TYPE, classify, schema_data};
pub use keywords::KeywordExtractor;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::embeddings::{EmbeddingError, EmbeddingProvider, embed_checked};
use crate::extractor::model::ExtractionRecord;
use crate::extractor::HeadingLevel;

/// Everything known about one page before compression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageAnalysis {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub author: String,
    pub language: String,
    pub word_count: usize,
    pub read_time: usize,
    /// Only levels that have at least one heading.
    pub headings: BTreeMap<HeadingLevel, Vec<String>>,
    pub links_count: usize,
    pub images_count: usize,
    pub videos_count: usize,
    pub code_blocks_count: usize,
    pub has_structured_data: bool,
    pub schema_data: Map<String, Value>,
    pub embedding: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub json_ld: Vec<Value>,
}

impl PageAnalysis {
    pub fn first_h1(&self) -> Option<&str> {
        self.headings
            .get(&HeadingLevel::H1)
            .and_then(|h| h.first())
            .map(String::as_str)
    }
}

/// Runs classification, keyword extraction and embedding for one page.
pub struct PageAnalyzer<'a> {
    config: &'a Config,
    keywords: KeywordExtractor,
    embedder: &'a dyn EmbeddingProvider,
}

impl<'a> PageAnalyzer<'a> {
    pub fn new(config: &'a Config, embedder: &'a dyn EmbeddingProvider) -> Self {
        Self {
            config,
            keywords: KeywordExtractor::new(config),
            embedder,
        }
    }

    pub fn analyze(
        &self,
        id: impl Into<String>,
        url: impl Into<String>,
        record: ExtractionRecord,
    ) -> Result<PageAnalysis, EmbeddingError> {
        let url = url.into();
        let content_type = classify(&record, &url, self.config);
        let schema_data = schema_data(&record, &content_type);
        let keywords = self.keywords.extract(&record);
        let embedding = embed_checked(self.embedder, &embedding_text(&record, self.config))?;

        let headings = record
            .headings
            .iter()
            .filter(|(_, texts)| !texts.is_empty())
            .map(|(level, texts)| (*level, texts.clone()))
            .collect();

        Ok(PageAnalysis {
            id: id.into(),
            url,
            content_type,
            has_structured_data: record.has_structured_data(),
            links_count: record.links.len(),
            images_count: record.images.len(),
            videos_count: record.videos.len(),
            code_blocks_count: record.code_blocks.len(),
            word_count: record.word_count,
            read_time: record.estimated_read_time,
            headings,
            schema_data,
            keywords,
            embedding,
            title: record.title,
            description: record.description,
            author: record.author,
            language: record.language,
            json_ld: record.json_ld,
        })
    }
}

/// Text fed to the embedding provider: title, description, every h1 and h2
/// and the leading paragraphs, skipping empty parts.
pub fn embedding_text(record: &ExtractionRecord, config: &Config) -> String {
    let limit = config.paragraphs_for_embedding().min(record.paragraphs.len());
    [
        record.title.clone(),
        record.description.clone(),
        record.headings(HeadingLevel::H1).join(" "),
        record.headings(HeadingLevel::H2).join(" "),
        record.paragraphs[..limit].join(" "),
    ]
    .into_iter()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashEmbedder;
    use crate::extractor::extract;

    const PAGE: &str = r#"<html><head>
        <title>Cooking Pasta</title>
        <meta name="description" content="A recipe for weeknights.">
        <meta name="keywords" content="pasta, dinner">
        </head><body>
        <h1>Pasta</h1><h2>Ingredients</h2>
        <p>Boil water. Add pasta.</p><p>Drain pasta.</p>
        <pre>no code here</pre>
        <img src="a.png"><img src="b.png">
        </body></html>"#;

    #[test]
    fn embedding_text_skips_empty_parts() {
        let record = ExtractionRecord {
            title: "Title".to_string(),
            paragraphs: (1..=7).map(|i| format!("p{i}")).collect(),
            ..Default::default()
        };
        assert_eq!(
            embedding_text(&record, &Config::default()),
            "Title p1 p2 p3 p4 p5"
        );
        assert_eq!(embedding_text(&ExtractionRecord::default(), &Config::default()), "");
    }

    #[test]
    fn analyze_fills_every_field() {
        let config = Config::default();
        let embedder = HashEmbedder::new(config.embedding_dimensions());
        let analyzer = PageAnalyzer::new(&config, &embedder);

        let record = extract(PAGE, &config);
        let expected_embedding = embedder.embed(&embedding_text(&record, &config)).unwrap();
        let page = analyzer.analyze("pasta", "/recipes/pasta.html", record).unwrap();

        assert_eq!(page.id, "pasta");
        assert_eq!(page.content_type, "Recipe");
        assert_eq!(page.keywords[..2], ["pasta", "dinner"]);
        assert_eq!(page.word_count, 6);
        assert_eq!(page.read_time, 1);
        assert_eq!(page.images_count, 2);
        assert_eq!(page.code_blocks_count, 1);
        assert!(!page.has_structured_data);
        assert_eq!(page.first_h1(), Some("Pasta"));
        assert_eq!(page.embedding, expected_embedding);
        assert_eq!(page.schema_data["type"], "Recipe");

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["type"], "Recipe");
        assert!(json.get("json_ld").is_none());
        assert_eq!(json["headings"]["h2"][0], "Ingredients");
    }
}
