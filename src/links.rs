use regex::Regex;
use serde::Serialize;

/// A run of rendered doc text: either plain text or a detected URL.  Link
/// spans carry the literal matched text; nothing is validated beyond the
/// pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Span {
    Text(String),
    Link(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::Text(s) | Span::Link(s) => s,
        }
    }
}

/// Split `s` into text and link spans.  URLs are matched greedily up to the
/// next whitespace, so trailing punctuation ends up inside the link.
pub fn linkify_spans(s: &str) -> Vec<Span> {
    lazy_static! {
        static ref URL_REGEX: Regex = Regex::new(r"(?i)https?://[^\s/$.?#].[^\s]*").unwrap();
    }

    let mut spans = vec![];
    let mut last = 0;
    for m in URL_REGEX.find_iter(s) {
        if m.start() > last {
            spans.push(Span::Text(s[last..m.start()].to_string()));
        }
        spans.push(Span::Link(m.as_str().to_string()));
        last = m.end();
    }
    if last < s.len() {
        spans.push(Span::Text(s[last..].to_string()));
    }
    spans
}

#[test]
fn test_linkify_plain_text() {
    assert_eq!(
        linkify_spans("no links here."),
        vec![Span::Text("no links here.".to_string())]
    );
    assert_eq!(linkify_spans(""), vec![]);
}

#[test]
fn test_linkify_greedy_to_whitespace() {
    let spans = linkify_spans("See https://kubernetes.io/docs/concepts/. More at http://x.y");
    assert_eq!(
        spans,
        vec![
            Span::Text("See ".to_string()),
            Span::Link("https://kubernetes.io/docs/concepts/.".to_string()),
            Span::Text(" More at ".to_string()),
            Span::Link("http://x.y".to_string()),
        ]
    );
}

#[test]
fn test_linkify_accepts_partial_urls() {
    // Anything matching the pattern is a link, even if it isn't a real URL.
    assert_eq!(
        linkify_spans("HTTPS://ab"),
        vec![Span::Link("HTTPS://ab".to_string())]
    );
    // The first character after the scheme can't be a separator.
    assert_eq!(
        linkify_spans("http://.nope"),
        vec![Span::Text("http://.nope".to_string())]
    );
}
