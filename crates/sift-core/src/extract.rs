//! Stack-based extraction of a single HTML subtree.
//!
//! The extractor consumes a forward stream of [`HtmlEvent`]s and copies the
//! first element matching a [`Criterion`] (with everything nested inside it)
//! to its output. Malformed markup is tolerated: a closing tag unwinds the
//! open-tag stack down to its opener, discarding implicitly closed entries,
//! and a stream that ends mid-element yields whatever was captured so far.

use std::fmt::Write as _;

/// One tokenizer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlEvent {
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    EndTag {
        name: String,
    },
    Text(String),
}

impl HtmlEvent {
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        HtmlEvent::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        HtmlEvent::EndTag {
            name: name.to_string(),
        }
    }

    pub fn text(data: &str) -> Self {
        HtmlEvent::Text(data.to_string())
    }
}

/// Which element opens the capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// Every name/value pair must be present on the tag with an equal value.
    ByAttribute(Vec<(String, String)>),
    ByTag(String),
}

impl Criterion {
    pub fn attribute(name: &str, value: &str) -> Self {
        Criterion::ByAttribute(vec![(name.to_string(), value.to_string())])
    }

    pub fn tag(name: &str) -> Self {
        Criterion::ByTag(name.to_string())
    }

    fn matches(&self, name: &str, attrs: &[(String, String)]) -> bool {
        match self {
            Criterion::ByAttribute(required) => required.iter().all(|(key, value)| {
                attrs
                    .iter()
                    .find(|(k, _)| k == key)
                    .is_some_and(|(_, v)| v == value)
            }),
            Criterion::ByTag(tag) => tag == name,
        }
    }
}

/// Single-pass extractor. Create one per document.
#[derive(Debug)]
pub struct ElementExtractor<'c> {
    criterion: &'c Criterion,
    inside: bool,
    /// Set once the first capture has closed; later matches are not reopened.
    captured: bool,
    stack: Vec<String>,
    output: Vec<String>,
}

impl<'c> ElementExtractor<'c> {
    pub fn new(criterion: &'c Criterion) -> Self {
        Self {
            criterion,
            inside: false,
            captured: false,
            stack: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Run a whole event stream and return the captured markup.
    pub fn extract(criterion: &Criterion, events: impl IntoIterator<Item = HtmlEvent>) -> String {
        let mut extractor = ElementExtractor::new(criterion);
        for event in events {
            extractor.feed(event);
        }
        extractor.finish()
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn feed(&mut self, event: HtmlEvent) {
        match event {
            HtmlEvent::StartTag { name, attrs } => self.start_tag(name, &attrs),
            HtmlEvent::EndTag { name } => self.end_tag(&name),
            HtmlEvent::Text(data) => {
                if self.inside {
                    self.output.push(data);
                }
            }
        }
    }

    /// Concatenated output. Unterminated captures are returned as-is.
    pub fn finish(self) -> String {
        self.output.concat()
    }

    fn start_tag(&mut self, name: String, attrs: &[(String, String)]) {
        if !self.inside {
            if self.captured || !self.criterion.matches(&name, attrs) {
                return;
            }
            self.inside = true;
        }
        self.output.push(serialize_start_tag(&name, attrs));
        self.stack.push(name);
    }

    fn end_tag(&mut self, name: &str) {
        if !self.inside {
            return;
        }
        self.output.push(format!("</{name}>"));
        if self.stack.iter().any(|open| open == name) {
            while let Some(open) = self.stack.pop() {
                if open == name {
                    break;
                }
            }
        }
        if self.stack.is_empty() {
            self.inside = false;
            self.captured = true;
        }
    }
}

fn serialize_start_tag(name: &str, attrs: &[(String, String)]) -> String {
    let mut tag = format!("<{name}");
    for (key, value) in attrs {
        let _ = write!(tag, " {key}=\"{value}\"");
    }
    tag.push('>');
    tag
}
