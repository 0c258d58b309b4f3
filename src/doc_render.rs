//! Two-tier rendering of doc comments: a one-sentence summary that is always
//! available and a detail view that replaces it when expanded.

use regex::Regex;
use serde::Serialize;

use crate::file_format::type_graph::{DocElement, DocElementKind, DocString};
use crate::links::{linkify_spans, Span};

/// A line of rendered text.
pub type Line = Vec<Span>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetailBlock {
    /// Embedded newlines become explicit breaks between `lines`.
    Paragraph { lines: Vec<Line> },
    Heading { spans: Line },
    List { items: Vec<Vec<Line>> },
    /// Preformatted and left alone; no link detection.
    Code { text: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDoc {
    pub summary: Line,
    /// Whether the summary carries the " ..." affordance that toggles between
    /// summary and detail.
    pub has_toggle: bool,
    pub detail: Vec<DetailBlock>,
    pub expanded: bool,
}

impl RenderedDoc {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.detail.is_empty()
    }

    pub fn summary_visible(&self) -> bool {
        !self.expanded
    }

    pub fn detail_visible(&self) -> bool {
        self.expanded
    }

    /// Flip between summary and detail.  Docs without the affordance have
    /// nothing to expand and stay put; returns whether anything changed.
    pub fn toggle(&mut self) -> bool {
        if !self.has_toggle {
            return false;
        }
        self.expanded = !self.expanded;
        true
    }

    /// Concatenated summary text, handy for plain-text output.
    pub fn summary_text(&self) -> String {
        self.summary.iter().map(|s| s.text()).collect()
    }
}

/// The leading run of text up to and including the first `.`, `?` or `!`.  The
/// search doesn't cross line breaks; if there is no terminator on the first
/// line the whole text is the sentence.
pub fn first_sentence(text: &str) -> &str {
    lazy_static! {
        static ref SENTENCE_REGEX: Regex = Regex::new(r"^.+?[.?!]").unwrap();
    }
    match SENTENCE_REGEX.find(text) {
        Some(m) => m.as_str(),
        None => text,
    }
}

fn render_lines(text: &str) -> Vec<Line> {
    text.split('\n').map(linkify_spans).collect()
}

fn first_content(elem: &DocElement) -> &str {
    elem.content.first().map(|s| s.as_str()).unwrap_or("")
}

fn render_block(elem: &DocElement) -> Option<DetailBlock> {
    match elem.kind {
        DocElementKind::Paragraph => Some(DetailBlock::Paragraph {
            lines: render_lines(first_content(elem)),
        }),
        DocElementKind::Heading => Some(DetailBlock::Heading {
            spans: linkify_spans(first_content(elem)),
        }),
        DocElementKind::List => Some(DetailBlock::List {
            items: elem.content.iter().map(|item| render_lines(item)).collect(),
        }),
        DocElementKind::Code => Some(DetailBlock::Code {
            text: first_content(elem).to_string(),
        }),
        // Directives are parsed but deliberately not shown.
        DocElementKind::Directive => None,
    }
}

pub fn render(doc: &DocString) -> RenderedDoc {
    match doc {
        DocString::Plain(text) => RenderedDoc {
            summary: linkify_spans(first_sentence(text)),
            has_toggle: false,
            detail: vec![DetailBlock::Paragraph {
                lines: vec![linkify_spans(text)],
            }],
            expanded: false,
        },
        DocString::Structured(structured) => {
            let elements = match structured.elements.as_deref() {
                Some(elements) if !elements.is_empty() => elements,
                _ => {
                    warn!("Structured doc string has no elements");
                    return RenderedDoc::default();
                }
            };

            let first = &elements[0];
            RenderedDoc {
                summary: linkify_spans(first_sentence(first_content(first))),
                has_toggle: elements.len() > 1 || first.content.len() > 1,
                detail: elements.iter().filter_map(render_block).collect(),
                expanded: false,
            }
        }
    }
}
