pub mod language;
pub mod model;
pub mod parser;
pub mod structured;
pub mod tokenizer;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use model::{ExtractionRecord, HeadingLevel};
pub use parser::PageParser;

use tracing::debug;

use crate::config::Config;

/// Parses one HTML document into an [`ExtractionRecord`].
///
/// Never fails: malformed markup and unparsable JSON-LD degrade to missing
/// fields. Read time is computed here, after the whole document is consumed.
pub fn extract(html: &str, config: &Config) -> ExtractionRecord {
    // 1. Tokenize and run the structural parser over the event stream
    let parser = tokenizer::tokenize(html, PageParser::new());
    let declared_language = parser.declared_language().is_some();
    let mut record = parser.finish();

    // 2. Fall back to detection when the root element has no lang
    if !declared_language
        && config.detect_language()
        && let Some(code) = language::detect_paragraph_language(&record.paragraphs)
    {
        debug!(language = %code, "detected document language");
        record.language = code;
    }

    // 3. Derived fields
    record.calculate_read_time(config.words_per_minute());
    record
}
