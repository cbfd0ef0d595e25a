use std::fs;

use crate::config::Config;
use crate::extractor::extract;
use crate::extractor::model::{CodeTag, HeadingLevel};

fn fixture(name: &str) -> String {
    fs::read_to_string(format!("src/extractor/tests/fixtures/{name}"))
        .expect("Failed to read test fixture")
}

#[test]
fn test_extract_article() {
    let record = extract(&fixture("article.html"), &Config::default());

    assert_eq!(record.title, "Sample Article - News Site");
    assert_eq!(
        record.description,
        "A sample article used to exercise the extractor."
    );
    assert_eq!(record.keywords, ["news", "sample", "testing"]);
    assert_eq!(record.author, "Jane Reporter");
    assert_eq!(record.language, "en");
    assert_eq!(record.canonical_url, "https://example.com/article");
    assert_eq!(record.og_type.as_deref(), Some("article"));

    assert_eq!(record.headings(HeadingLevel::H1), ["Sample Article"]);
    assert_eq!(record.headings(HeadingLevel::H2), ["Background"]);
    assert_eq!(record.paragraphs.len(), 2);
    assert_eq!(record.word_count, 21);
    assert_eq!(record.estimated_read_time, 1);
    assert_eq!(record.list_items, ["First point", "Second point"]);

    let anchors: Vec<_> = record.links.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(anchors, ["Home", "Related"]);
    assert_eq!(record.images.len(), 1);
    assert_eq!(record.code_blocks.len(), 2);
    assert_eq!(record.code_blocks[0].tag, CodeTag::Code);
    assert_eq!(record.code_blocks[0].content, "let x = 1;");

    assert_eq!(record.json_ld.len(), 1);
    assert_eq!(record.json_ld[0]["headline"], "Sample Article");
    assert!(record.has_structured_data());
    // Script bodies never reach the text buffers.
    assert!(record.paragraphs.iter().all(|p| !p.contains("not content")));
}

#[test]
fn test_extract_blog_post() {
    let record = extract(&fixture("blog.html"), &Config::default());

    assert_eq!(record.title, "How to Build Better Software | Tech Blog");
    assert_eq!(
        record.description,
        "Lessons learned building software that lasts."
    );
    assert_eq!(record.language, "en");
    assert_eq!(record.microdata.len(), 1);
    assert_eq!(
        record.microdata[0].item_type,
        "https://schema.org/BlogPosting"
    );
    assert!(record.json_ld.is_empty());
    assert!(record.has_structured_data());
}

#[test]
fn test_malformed_html() {
    let record = extract(&fixture("malformed.html"), &Config::default());

    assert_eq!(record.title, "Broken");
    assert!(record.headings(HeadingLevel::H1).is_empty());
    assert_eq!(record.paragraphs, ["First paragraph survives"]);
    assert_eq!(record.word_count, 3);
    assert!(record.json_ld.is_empty());
}

#[test]
fn test_zero_paragraphs_still_reads_in_a_minute() {
    let record = extract("<html><head><title>Empty</title></head></html>", &Config::default());
    assert_eq!(record.word_count, 0);
    assert_eq!(record.estimated_read_time, 1);
}

#[test]
fn test_lang_attribute_overrides_default() {
    let html = r#"<html lang="fr"><head><title>Bonjour</title></head><body><p>Ceci est un test de cent mots...</p></body></html>"#;
    let record = extract(html, &Config::default());
    assert_eq!(record.title, "Bonjour");
    assert_eq!(record.language, "fr");
}

#[test]
fn test_language_detection_is_opt_in() {
    let html = "<html><body><p>Esto es una prueba del sistema de detección de idiomas en español. Debería funcionar bien.</p></body></html>";

    let record = extract(html, &Config::default());
    assert_eq!(record.language, "en");

    let record = extract(html, &Config::default().with_detect_language(true));
    assert_eq!(record.language, "es");
}

#[test]
fn test_declared_language_beats_detection() {
    let html = r#"<html lang="de"><body><p>This paragraph is written in English but the page says otherwise.</p></body></html>"#;
    let record = extract(html, &Config::default().with_detect_language(true));
    assert_eq!(record.language, "de");
}

#[test]
fn test_extract_is_deterministic() {
    let html = fixture("article.html");
    let first = extract(&html, &Config::default());
    let second = extract(&html, &Config::default());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_extract_never_panics(html in ".*") {
            let _ = extract(&html, &Config::default());
        }

        #[test]
        fn test_extract_deterministic_on_any_input(
            html in "(<[a-z]{1,6}( [a-z]+=\"[^\"]*\")?>|</[a-z]{1,6}>|[a-zA-Z ]{0,12}){0,40}",
        ) {
            let config = Config::default();
            prop_assert_eq!(extract(&html, &config), extract(&html, &config));
        }

        #[test]
        fn test_read_time_floor(html in ".*") {
            let record = extract(&html, &Config::default());
            prop_assert!(record.estimated_read_time >= 1);
        }
    }
}
