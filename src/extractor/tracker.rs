use crate::extractor::tokenizer::is_void_element;

/// Tags whose text content is collected until they close.
pub const CAPTURING_TAGS: [&str; 11] = [
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "a", "li", "pre", "code",
];

pub fn is_capturing(name: &str) -> bool {
    CAPTURING_TAGS.contains(&name)
}

#[derive(Debug)]
struct Frame<P> {
    name: String,
    text: Vec<String>,
    payload: Option<P>,
}

/// An element popped off the stack by its matching end tag.
#[derive(Debug, PartialEq, Eq)]
pub struct ClosedElement<P> {
    pub name: String,
    /// Captured text pieces joined by single spaces and trimmed.
    pub text: String,
    pub payload: Option<P>,
}

/// Stack of open elements.
///
/// Each open element owns its own text buffer, so text only ever lands in
/// the element that is on top when it arrives. An element that is never
/// closed by a matching end tag takes its buffer and payload with it.
#[derive(Debug)]
pub struct TagContext<P> {
    stack: Vec<Frame<P>>,
}

impl<P> Default for TagContext<P> {
    fn default() -> Self {
        Self { stack: Vec::new() }
    }
}

impl<P> TagContext<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `name` with an optional payload to hand back on close. Void
    /// elements are never pushed since no end tag will pop them.
    pub fn open(&mut self, name: &str, payload: Option<P>) {
        if is_void_element(name) {
            return;
        }
        self.stack.push(Frame {
            name: name.to_string(),
            text: Vec::new(),
            payload,
        });
    }

    pub fn current(&self) -> Option<&str> {
        self.stack.last().map(|frame| frame.name.as_str())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Appends `text` to the top element if it is a capturing tag. Returns
    /// whether the text was kept.
    pub fn capture(&mut self, text: &str) -> bool {
        match self.stack.last_mut() {
            Some(frame) if is_capturing(&frame.name) => {
                frame.text.push(text.to_string());
                true
            }
            _ => false,
        }
    }

    /// Pops the top element only when it is `name`; any other end tag is
    /// ignored and the stack is left untouched.
    pub fn close(&mut self, name: &str) -> Option<ClosedElement<P>> {
        if self.current() != Some(name) {
            return None;
        }
        let frame = self.stack.pop()?;
        Some(ClosedElement {
            name: frame.name,
            text: frame.text.join(" ").trim().to_string(),
            payload: frame.payload,
        })
    }
}
