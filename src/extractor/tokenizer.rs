//! Turns raw HTML into a flat stream of start-tag, end-tag and text events.
//!
//! Only the `html5ever` tokenizer runs here, no tree builder, so malformed
//! markup reaches the handler exactly as written. The tree builder's one
//! tokenizer-facing duty is kept: after `<script>`, `<style>`, `<title>` and
//! `<textarea>` the tokenizer is switched into the matching raw-text state so
//! their content arrives as text rather than as tags.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Elements that never have content or an end tag.
pub const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Attributes of a start tag in source order. Names are lowercase; the
/// tokenizer already drops duplicates, keeping the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of `name`, or `""` when the attribute is missing.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(key, _)| key == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    pub name: String,
    pub attrs: Attributes,
    pub self_closing: bool,
}

impl StartTag {
    pub fn new(name: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            name: name.into(),
            attrs,
            self_closing: false,
        }
    }
}

impl From<Tag> for StartTag {
    fn from(tag: Tag) -> Self {
        Self {
            name: tag.name.to_string(),
            attrs: tag
                .attrs
                .into_iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect(),
            self_closing: tag.self_closing,
        }
    }
}

/// Receiver of parse events in document order.
pub trait HtmlEventHandler {
    fn start_tag(&mut self, tag: &StartTag);
    fn end_tag(&mut self, name: &str);
    /// A maximal run of character data between two markup tokens, entities
    /// already decoded.
    fn text(&mut self, text: &str);
}

/// Feeds `html` through the tokenizer into `handler` and hands it back.
pub fn tokenize<H: HtmlEventHandler>(html: &str, handler: H) -> H {
    let mut tokenizer = Tokenizer::new(EventSink::new(handler), TokenizerOpts::default());
    let mut queue = BufferQueue::new();
    queue.push_back(StrTendril::from_slice(html));
    let _ = tokenizer.feed(&mut queue);
    tokenizer.end();
    tokenizer.sink.into_handler()
}

fn raw_kind_for(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

struct EventSink<H> {
    handler: H,
    pending_text: String,
}

impl<H: HtmlEventHandler> EventSink<H> {
    fn new(handler: H) -> Self {
        Self {
            handler,
            pending_text: String::new(),
        }
    }

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            let text = std::mem::take(&mut self.pending_text);
            self.handler.text(&text);
        }
    }

    fn into_handler(mut self) -> H {
        self.flush_text();
        self.handler
    }
}

impl<H: HtmlEventHandler> TokenSink for EventSink<H> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.pending_text.push_str(&text);
                TokenSinkResult::Continue
            }
            Token::NullCharacterToken | Token::ParseError(_) => TokenSinkResult::Continue,
            Token::TagToken(tag) => {
                self.flush_text();
                match tag.kind {
                    TagKind::StartTag => {
                        let raw_kind = raw_kind_for(&tag.name);
                        let start = StartTag::from(tag);
                        self.handler.start_tag(&start);
                        if let Some(kind) = raw_kind {
                            return TokenSinkResult::RawData(kind);
                        }
                        // `<a href="x"/>` behaves like an immediately closed element.
                        if start.self_closing && !is_void_element(&start.name) {
                            self.handler.end_tag(&start.name);
                        }
                    }
                    TagKind::EndTag => self.handler.end_tag(&tag.name),
                }
                TokenSinkResult::Continue
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text();
                TokenSinkResult::Continue
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl HtmlEventHandler for Recorder {
        fn start_tag(&mut self, tag: &StartTag) {
            self.events.push(format!("<{}>", tag.name));
        }
        fn end_tag(&mut self, name: &str) {
            self.events.push(format!("</{name}>"));
        }
        fn text(&mut self, text: &str) {
            self.events.push(text.to_string());
        }
    }

    fn events(html: &str) -> Vec<String> {
        tokenize(html, Recorder::default()).events
    }

    #[test]
    fn emits_events_in_document_order() {
        assert_eq!(
            events("<P CLASS=x>Hi <b>there</b></p>"),
            vec!["<p>", "Hi ", "<b>", "there", "</b>", "</p>"]
        );
    }

    #[test]
    fn coalesces_text_split_by_entities() {
        assert_eq!(
            events("<title>Tom &amp; Jerry</title>"),
            vec!["<title>", "Tom & Jerry", "</title>"]
        );
    }

    #[test]
    fn script_content_is_raw_text() {
        assert_eq!(
            events("<script>if (a<b) { x = '</p>'; }</script>"),
            vec!["<script>", "if (a<b) { x = '</p>'; }", "</script>"]
        );
    }

    #[test]
    fn comments_split_text_runs() {
        assert_eq!(events("<p>a<!-- c -->b</p>"), vec!["<p>", "a", "b", "</p>"]);
    }

    #[test]
    fn self_closing_non_void_tags_close_immediately() {
        assert_eq!(events("<a href='/x'/><br/>"), vec!["<a>", "</a>", "<br>"]);
    }

    #[test]
    fn attributes_are_lowercased_names_with_raw_values() {
        let mut seen = Attributes::default();
        struct Grab<'a>(&'a mut Attributes);
        impl HtmlEventHandler for Grab<'_> {
            fn start_tag(&mut self, tag: &StartTag) {
                *self.0 = tag.attrs.clone();
            }
            fn end_tag(&mut self, _name: &str) {}
            fn text(&mut self, _text: &str) {}
        }
        tokenize(r#"<div ItemScope ItemType="http://schema.org/Product">"#, Grab(&mut seen));
        assert!(seen.contains("itemscope"));
        assert_eq!(seen.get_or_empty("itemscope"), "");
        assert_eq!(seen.get("itemtype"), Some("http://schema.org/Product"));
        assert_eq!(seen.get("missing"), None);
    }
}
