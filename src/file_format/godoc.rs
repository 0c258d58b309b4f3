//! Line-oriented parser turning a raw Go doc comment into the structured
//! block form the doc renderer consumes.

use super::type_graph::{DocElement, DocElementKind, StructuredDoc};

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn starts_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn trim_indent(line: &str) -> &str {
    line.trim_start_matches(|c| c == ' ' || c == '\t')
}

/// Length in bytes of an ordered-list marker run like `12` or `a`, if the line
/// (already left-trimmed) starts with one followed by `.` or `)`.
fn ordered_marker_len(trimmed: &str) -> Option<usize> {
    let run = trimmed
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    match trimmed.as_bytes().get(run) {
        Some(b'.') | Some(b')') => Some(run),
        _ => None,
    }
}

fn is_list_item(line: &str) -> bool {
    let trimmed = trim_indent(line);
    if trimmed.is_empty() {
        return false;
    }

    for bullet in &['*', '+', '-', '•'] {
        if let Some(rest) = trimmed.strip_prefix(*bullet) {
            if rest.starts_with(' ') || rest.starts_with('\t') {
                return true;
            }
        }
    }

    match ordered_marker_len(trimmed) {
        Some(run) if run > 0 => {
            let after = &trimmed.as_bytes()[run + 1..];
            matches!(after.first(), Some(b' ') | Some(b'\t'))
        }
        _ => false,
    }
}

struct DocParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> DocParser<'a> {
    fn peek(&self) -> &'a str {
        self.lines.get(self.pos).copied().unwrap_or("")
    }

    /// Headings are `#`-prefixed lines (any number of `#`, then a space) with
    /// a blank line on both sides.  A lone `#` is not a heading.
    fn is_heading(&self) -> bool {
        if self.pos == 0 || self.pos + 1 >= self.lines.len() {
            return false;
        }
        let before = self.lines[self.pos - 1];
        let after = self.lines[self.pos + 1];
        let line = self.lines[self.pos];

        if !(is_blank(before) && is_blank(after)) {
            return false;
        }
        if line == "#" || !line.starts_with('#') {
            return false;
        }
        line.trim_start_matches('#').starts_with(' ')
    }

    fn parse_paragraph(&mut self) -> DocElement {
        let mut content = vec![];
        while self.pos < self.lines.len() && !is_blank(self.lines[self.pos]) {
            let line = self.lines[self.pos];
            if line.starts_with('+') {
                break;
            }
            content.push(line);
            self.pos += 1;
        }
        DocElement::new(DocElementKind::Paragraph, vec![content.join(" ")])
    }

    fn parse_code_block(&mut self) -> DocElement {
        let first = self.peek();
        let indent = first.len() - trim_indent(first).len();

        let start = self.pos;
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos];
            if !is_blank(line) && !starts_indented(line) {
                break;
            }
            self.pos += 1;
        }

        let content: Vec<&str> = self.lines[start..self.pos]
            .iter()
            .map(|line| line.get(indent..).unwrap_or(line))
            .collect();
        DocElement::new(DocElementKind::Code, vec![content.join("\n")])
    }

    fn parse_list(&mut self) -> DocElement {
        let mut items = vec![];

        while self.pos < self.lines.len() && is_list_item(self.lines[self.pos]) {
            let line = self.lines[self.pos];
            let trimmed = trim_indent(line);

            let marker_end = match trimmed.chars().next() {
                Some(c @ ('*' | '+' | '-' | '•')) => c.len_utf8(),
                _ => ordered_marker_len(trimmed).map(|run| run + 1).unwrap_or(0),
            };

            let text = trim_indent(&trimmed[marker_end..]);
            let mut item = text.to_string();
            let text_indent = line.len() - text.len();
            self.pos += 1;

            while self.pos < self.lines.len() {
                let next = self.lines[self.pos];
                if is_blank(next) || is_list_item(next) {
                    break;
                }
                let next_indent = next.len() - trim_indent(next).len();
                if next_indent < text_indent {
                    break;
                }
                item.push('\n');
                item.push_str(&next[text_indent..]);
                self.pos += 1;
            }
            items.push(item);
        }

        DocElement::new(DocElementKind::List, items)
    }
}

/// Parse a raw doc comment.  Blank lines separate blocks; list items,
/// indented code blocks, `+` directives and `#` headings are recognized and
/// everything else becomes a paragraph whose lines are joined by spaces.
pub fn parse_go_doc_string(comment: &str) -> StructuredDoc {
    let mut parser = DocParser {
        lines: comment.split('\n').collect(),
        pos: 0,
    };
    let mut elements = vec![];

    while parser.pos < parser.lines.len() {
        let line = parser.peek();

        if is_blank(line) {
            parser.pos += 1;
            continue;
        }

        if is_list_item(line) {
            elements.push(parser.parse_list());
            continue;
        }

        if starts_indented(line) {
            elements.push(parser.parse_code_block());
            continue;
        }

        if line.starts_with('+') {
            parser.pos += 1;
            elements.push(DocElement::new(
                DocElementKind::Directive,
                vec![line.to_string()],
            ));
            continue;
        }

        if parser.is_heading() {
            parser.pos += 1;
            elements.push(DocElement::new(
                DocElementKind::Heading,
                vec![line.trim_start_matches('#').trim().to_string()],
            ));
            continue;
        }

        elements.push(parser.parse_paragraph());
    }

    StructuredDoc {
        elements: if elements.is_empty() {
            None
        } else {
            Some(elements)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use DocElementKind::*;

    fn check(input: &str, expected: &[(DocElementKind, &[&str])]) {
        let doc = parse_go_doc_string(input);
        let actual: Vec<(DocElementKind, Vec<String>)> = doc
            .elements
            .unwrap_or_default()
            .into_iter()
            .map(|e| (e.kind, e.content))
            .collect();
        let expected: Vec<(DocElementKind, Vec<String>)> = expected
            .iter()
            .map(|(k, c)| (*k, c.iter().map(|s| s.to_string()).collect()))
            .collect();
        assert_eq!(actual, expected, "input: {:?}", input);
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_go_doc_string("").elements, None);
    }

    #[test]
    fn test_paragraphs() {
        check(
            "This is a simple paragraph.",
            &[(Paragraph, &["This is a simple paragraph."])],
        );
        check(
            "Paragraph one.\n\nParagraph two.",
            &[(Paragraph, &["Paragraph one."]), (Paragraph, &["Paragraph two."])],
        );
        check(
            "This is a line with a colon:\nbut it's part of a paragraph.",
            &[(
                Paragraph,
                &["This is a line with a colon: but it's part of a paragraph."],
            )],
        );
    }

    #[test]
    fn test_headings() {
        check("\n# This is a heading\n", &[(Heading, &["This is a heading"])]);
        check("\n#### This is a heading\n", &[(Heading, &["This is a heading"])]);
        check("# not a heading", &[(Paragraph, &["# not a heading"])]);
        check("\n#\n", &[(Paragraph, &["#"])]);
        check("\n#text\n", &[(Paragraph, &["#text"])]);
        check("\n# text", &[(Paragraph, &["# text"])]);
    }

    #[test]
    fn test_directive() {
        check(
            "+directive: Do not use.",
            &[(Directive, &["+directive: Do not use."])],
        );
        check(
            "Some text\n+optional",
            &[(Paragraph, &["Some text"]), (Directive, &["+optional"])],
        );
    }

    #[test]
    fn test_code_blocks() {
        check("  code line 1\n  code line 2", &[(Code, &["code line 1\ncode line 2"])]);
        check("  line 1\n  \n  line 3", &[(Code, &["line 1\n\nline 3"])]);
        check("  code\n\npara", &[(Code, &["code\n"]), (Paragraph, &["para"])]);
    }

    #[test]
    fn test_lists() {
        check("* item 1\n* item 2", &[(List, &["item 1", "item 2"])]);
        check("1. item 1\na) item 2", &[(List, &["item 1", "item 2"])]);
        check("• item", &[(List, &["item"])]);
        check(
            "* item 1\n  more text for item 1\n* item 2",
            &[(List, &["item 1\nmore text for item 1", "item 2"])],
        );
        check(
            "* item 1\n\n* item 2",
            &[(List, &["item 1"]), (List, &["item 2"])],
        );
    }

    #[test]
    fn test_mixed_content() {
        check(
            "This is a paragraph.\n\n# A Heading\n\n* list item 1\n* list item 2\n\n  code block\n\nAnother paragraph.",
            &[
                (Paragraph, &["This is a paragraph."]),
                (Heading, &["A Heading"]),
                (List, &["list item 1", "list item 2"]),
                (Code, &["code block\n"]),
                (Paragraph, &["Another paragraph."]),
            ],
        );
    }
}
