use tracing::trace;

use crate::extractor::model::{
    CodeBlock, CodeTag, DEFAULT_LANGUAGE, ExtractionRecord, HeadingLevel, Image, Link, Video,
};
use crate::extractor::structured;
use crate::extractor::tokenizer::{Attributes, HtmlEventHandler, StartTag};
use crate::extractor::tracker::TagContext;

/// Record under construction that is completed by the element's end tag.
#[derive(Debug)]
enum Pending {
    Link(Link),
    Code(CodeTag),
}

/// How text events are treated right now.
#[derive(Debug)]
enum ContentMode {
    Normal,
    /// Inside `<script>`; text is buffered and, for JSON-LD, parsed on close.
    Script { json_ld: bool, buffer: String },
    /// Inside `<style>`; text is dropped.
    Style,
}

/// Single-use parser state for one document.
///
/// Drive it with [`HtmlEventHandler`] events (usually through
/// [`crate::extractor::tokenizer::tokenize`]) and call [`PageParser::finish`]
/// once the stream is exhausted.
#[derive(Debug)]
pub struct PageParser {
    record: ExtractionRecord,
    context: TagContext<Pending>,
    mode: ContentMode,
    declared_language: Option<String>,
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PageParser {
    pub fn new() -> Self {
        Self {
            record: ExtractionRecord::default(),
            context: TagContext::new(),
            mode: ContentMode::Normal,
            declared_language: None,
        }
    }

    /// `lang` of the root element, if the document declared one.
    pub fn declared_language(&self) -> Option<&str> {
        self.declared_language.as_deref()
    }

    /// Returns the record. Read time is not computed here.
    pub fn finish(mut self) -> ExtractionRecord {
        self.record.language = self
            .declared_language
            .take()
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        self.record
    }

    fn apply_meta(&mut self, attrs: &Attributes) {
        let name = attrs.get_or_empty("name").to_lowercase();
        let property = attrs.get_or_empty("property").to_lowercase();
        let content = attrs.get_or_empty("content");
        if content.is_empty() {
            return;
        }

        let record = &mut self.record;
        if name == "description" || property == "og:description" {
            set_if_empty(&mut record.description, content);
        } else if name == "keywords" {
            if record.keywords.is_empty() {
                record.keywords = split_keywords(content);
            }
        } else if name == "author" || property == "article:author" {
            set_if_empty(&mut record.author, content);
        } else if property == "og:title" {
            set_if_empty(&mut record.title, content);
        } else if property == "og:type" && record.og_type.is_none() {
            record.og_type = Some(content.to_string());
        }
    }

    fn apply_link(&mut self, attrs: &Attributes) {
        let canonical = attrs
            .get_or_empty("rel")
            .split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("canonical"));
        if canonical {
            set_if_empty(&mut self.record.canonical_url, attrs.get_or_empty("href"));
        }
    }

    fn finish_script(&mut self) {
        let mode = std::mem::replace(&mut self.mode, ContentMode::Normal);
        if let ContentMode::Script {
            json_ld: true,
            buffer,
        } = mode
        {
            match structured::parse_json_ld(&buffer) {
                Some(value) => self.record.json_ld.push(value),
                None => trace!(len = buffer.len(), "discarding unparsable JSON-LD block"),
            }
        }
    }

    fn finish_element(&mut self, name: &str, text: String, payload: Option<Pending>) {
        if let Some(level) = HeadingLevel::from_tag(name) {
            if !text.is_empty() {
                self.record.headings.entry(level).or_default().push(text);
            }
            return;
        }

        match (name, payload) {
            ("p", _) if !text.is_empty() => {
                self.record.word_count += text.split_whitespace().count();
                self.record.paragraphs.push(text);
            }
            ("li", _) if !text.is_empty() => self.record.list_items.push(text),
            ("a", Some(Pending::Link(mut link))) => {
                link.text = text;
                self.record.links.push(link);
            }
            ("pre" | "code", Some(Pending::Code(tag))) => {
                self.record.code_blocks.push(CodeBlock { tag, content: text });
            }
            _ => {}
        }
    }
}

impl HtmlEventHandler for PageParser {
    fn start_tag(&mut self, tag: &StartTag) {
        let attrs = &tag.attrs;
        let pending = match tag.name.as_str() {
            "meta" => {
                self.apply_meta(attrs);
                None
            }
            "link" => {
                self.apply_link(attrs);
                None
            }
            "a" if attrs.contains("href") => Some(Pending::Link(Link {
                url: attrs.get_or_empty("href").to_string(),
                text: String::new(),
                rel: attrs.get_or_empty("rel").to_string(),
                title: attrs.get_or_empty("title").to_string(),
            })),
            "img" => {
                self.record.images.push(Image {
                    src: attrs.get_or_empty("src").to_string(),
                    alt: attrs.get_or_empty("alt").to_string(),
                    title: attrs.get_or_empty("title").to_string(),
                });
                None
            }
            "video" => {
                self.record.videos.push(Video {
                    src: attrs.get_or_empty("src").to_string(),
                    poster: attrs.get_or_empty("poster").to_string(),
                });
                None
            }
            "script" => {
                self.mode = ContentMode::Script {
                    json_ld: structured::is_json_ld_script(attrs),
                    buffer: String::new(),
                };
                None
            }
            "style" => {
                self.mode = ContentMode::Style;
                None
            }
            "pre" => Some(Pending::Code(CodeTag::Pre)),
            "code" => Some(Pending::Code(CodeTag::Code)),
            _ => None,
        };
        self.context.open(&tag.name, pending);

        if attrs.contains("itemscope") {
            self.record.microdata.push(structured::microdata_item(attrs));
        }
        if structured::has_rdfa(attrs) {
            self.record.rdfa.push(structured::rdfa_item(attrs));
        }
        if tag.name == "html"
            && let Some(lang) = attrs.get("lang").map(str::trim).filter(|l| !l.is_empty())
        {
            self.declared_language = Some(lang.to_string());
        }
    }

    fn end_tag(&mut self, name: &str) {
        let closed = self.context.close(name);
        match name {
            "script" => self.finish_script(),
            "style" => self.mode = ContentMode::Normal,
            _ => {}
        }
        if let Some(element) = closed {
            self.finish_element(&element.name, element.text, element.payload);
        }
    }

    fn text(&mut self, text: &str) {
        match &mut self.mode {
            ContentMode::Style => return,
            ContentMode::Script { buffer, .. } => {
                buffer.push_str(text);
                return;
            }
            ContentMode::Normal => {}
        }

        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if self.context.current() == Some("title") {
            set_if_empty(&mut self.record.title, text);
            return;
        }
        self.context.capture(text);
    }
}

fn set_if_empty(field: &mut String, value: &str) {
    if field.is_empty() {
        *field = value.to_string();
    }
}

/// Comma-separated declared keywords, trimmed, empties and repeats dropped.
fn split_keywords(content: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in content.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        if !keywords.iter().any(|k| k == keyword) {
            keywords.push(keyword.to_string());
        }
    }
    keywords
}
