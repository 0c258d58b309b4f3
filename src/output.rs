/**
 * HTML output for the explorer's columns.  Anything emitted here has to stay
 * logically equivalent to what `templates/explorer.liquid`'s script builds on
 * the client when it re-renders after navigation.
 **/
use std::io::Write;

use crate::doc_render::{DetailBlock, Line, RenderedDoc};
use crate::error::Result;
use crate::links::Span;
use crate::render_plan::{Column, Entry, EntryKind, RenderPlan};

/// `generate_formatted` input type that allows for hierarchical indentation and
/// not having to call to_string() on everything.
#[derive(Clone, Debug)]
pub enum F {
    /// Indents its children by one 2-spaced level.
    Indent(Vec<F>),
    /// Doesn't indent its children.
    Seq(Vec<F>),
    /// Owned text, usually the result of a `format!` call.
    T(String),
    /// String literals in the program.
    S(&'static str),
}

pub fn generate_formatted(writer: &mut dyn Write, formatted: &F, indent: u32) -> Result<()> {
    match *formatted {
        F::Indent(ref seq) => {
            for f in seq {
                generate_formatted(writer, f, indent + 1)?;
            }
        }
        F::Seq(ref seq) => {
            for f in seq {
                generate_formatted(writer, f, indent)?;
            }
        }
        F::T(ref text) => write_line(writer, text, indent)?,
        F::S(text) => write_line(writer, text, indent)?,
    }
    Ok(())
}

fn write_line(writer: &mut dyn Write, text: &str, indent: u32) -> Result<()> {
    for _ in 0..indent {
        write!(writer, "  ")?;
    }
    writeln!(writer, "{}", text)?;
    Ok(())
}

/// Escape text content.
pub fn entity_replace(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a double-quoted attribute value.
pub fn attr_escape(s: &str) -> String {
    entity_replace(s).replace('"', "&quot;")
}

fn spans_html(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|span| match span {
            Span::Text(text) => entity_replace(text),
            Span::Link(url) => format!(
                r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
                attr_escape(url),
                entity_replace(url)
            ),
        })
        .collect()
}

fn lines_html(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|line| spans_html(line))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn detail_block_nodes(block: &DetailBlock) -> F {
    match block {
        DetailBlock::Paragraph { lines } => F::T(format!("<p>{}</p>", lines_html(lines))),
        DetailBlock::Heading { spans } => {
            F::T(format!(r#"<div class="heading">{}</div>"#, spans_html(spans)))
        }
        DetailBlock::List { items } => F::Seq(vec![
            F::S("<ul>"),
            F::Indent(
                items
                    .iter()
                    .map(|item| F::T(format!("<li>{}</li>", lines_html(item))))
                    .collect(),
            ),
            F::S("</ul>"),
        ]),
        DetailBlock::Code { text } => {
            F::T(format!("<pre><code>{}</code></pre>", entity_replace(text)))
        }
    }
}

/// A doc is a summary div and a detail div; exactly one of them is visible.
pub fn doc_nodes(doc: &RenderedDoc) -> F {
    let hidden = |visible: bool| if visible { "" } else { " hidden" };

    let ellipsis = if doc.has_toggle {
        r#"<span class="ellipsis"> ...</span>"#
    } else {
        ""
    };

    F::Seq(vec![
        F::S(r#"<div class="doc-string">"#),
        F::Indent(vec![
            F::T(format!(
                r#"<div class="doc-summary"{}>{}{}</div>"#,
                hidden(doc.summary_visible()),
                spans_html(&doc.summary),
                ellipsis
            )),
            F::T(format!(
                r#"<div class="doc-detail"{}>"#,
                hidden(doc.detail_visible())
            )),
            F::Indent(doc.detail.iter().map(detail_block_nodes).collect()),
            F::S("</div>"),
        ]),
        F::S("</div>"),
    ])
}

pub fn entry_nodes(entry: &Entry) -> F {
    let mut classes = vec![];
    if entry.selected {
        classes.push("selected");
    }
    if entry.kind == EntryKind::EnumValue {
        classes.push("enum-value");
    }
    let class_attr = if classes.is_empty() {
        String::new()
    } else {
        format!(r#" class="{}""#, classes.join(" "))
    };

    let mut contents = vec![];
    match entry.kind {
        EntryKind::Field => {
            contents.push(F::T(format!(
                r#"<div class="field-row"><span class="field-name">{}</span><span class="field-type">{}</span></div>"#,
                entity_replace(&entry.field_name),
                entity_replace(&entry.display_type)
            )));
            contents.push(F::T(format!(
                r#"<div class="type-name">{}</div>"#,
                entity_replace(&entry.package)
            )));
        }
        EntryKind::EnumValue => {
            contents.push(F::T(format!(
                r#"<div class="field-row"><span class="field-name">{}</span></div>"#,
                entity_replace(&entry.field_name)
            )));
        }
    }
    if let Some(doc) = &entry.doc {
        contents.push(doc_nodes(doc));
    }

    let opening = match entry.kind {
        EntryKind::Field => format!(
            r#"<li{} data-field-name="{}" data-type-name="{}" data-parent-type="{}">"#,
            class_attr,
            attr_escape(&entry.field_name),
            attr_escape(&entry.type_name),
            attr_escape(&entry.parent_type)
        ),
        EntryKind::EnumValue => format!(
            r#"<li{} data-field-name="{}" data-parent-type="{}">"#,
            class_attr,
            attr_escape(&entry.field_name),
            attr_escape(&entry.parent_type)
        ),
    };

    let mut item = vec![F::S("<div>"), F::Indent(contents), F::S("</div>")];
    if entry.navigable {
        item.push(F::S(r#"<span class="chevron"></span>"#));
    }

    F::Seq(vec![F::T(opening), F::Indent(item), F::S("</li>")])
}

pub fn column_nodes(column: &Column) -> F {
    F::Seq(vec![
        F::T(format!(
            r#"<div class="column" data-type-name="{}">"#,
            attr_escape(&column.type_name)
        )),
        F::Indent(vec![
            F::S(r#"<div class="column-header">"#),
            F::Indent(vec![
                F::T(format!(
                    r#"<div class="header-row">{}</div>"#,
                    entity_replace(&column.short_name)
                )),
                F::T(format!(
                    r#"<div class="type-name">{}</div>"#,
                    entity_replace(&column.package)
                )),
            ]),
            F::S("</div>"),
            F::S("<ul>"),
            F::Indent(column.entries.iter().map(entry_nodes).collect()),
            F::S("</ul>"),
        ]),
        F::S("</div>"),
    ])
}

/// Write every column of `plan`, leftmost first.
pub fn generate_columns(writer: &mut dyn Write, plan: &RenderPlan, indent: u32) -> Result<()> {
    let f = F::Seq(plan.columns.iter().map(column_nodes).collect());
    generate_formatted(writer, &f, indent)
}

pub fn columns_html(plan: &RenderPlan, indent: u32) -> Result<String> {
    let mut buf = Vec::new();
    generate_columns(&mut buf, plan, indent)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_format::type_graph::TypeGraph;
    use crate::nav_path::NavigationPath;
    use crate::render_plan::plan;
    use serde_json::json;

    fn render_to_string(f: &F) -> String {
        let mut buf = Vec::new();
        generate_formatted(&mut buf, f, 0).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_escaping() {
        assert_eq!(entity_replace("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(attr_escape(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn test_generate_formatted_indents() {
        let f = F::Seq(vec![
            F::S("<ul>"),
            F::Indent(vec![F::T(format!("<li>{}</li>", 1))]),
            F::S("</ul>"),
        ]);
        assert_eq!(render_to_string(&f), "<ul>\n  <li>1</li>\n</ul>\n");
    }

    #[test]
    fn test_doc_nodes() {
        let doc = RenderedDoc {
            summary: vec![Span::Text("See ".to_string()), Span::Link("https://a.b/?x=1&y=2".to_string())],
            has_toggle: true,
            detail: vec![
                DetailBlock::Paragraph {
                    lines: vec![vec![Span::Text("one".to_string())], vec![Span::Text("two".to_string())]],
                },
                DetailBlock::Code {
                    text: "if a < b {}".to_string(),
                },
            ],
            expanded: false,
        };
        assert_eq!(
            render_to_string(&doc_nodes(&doc)),
            concat!(
                "<div class=\"doc-string\">\n",
                "  <div class=\"doc-summary\">See <a href=\"https://a.b/?x=1&amp;y=2\" target=\"_blank\" rel=\"noopener\">https://a.b/?x=1&amp;y=2</a><span class=\"ellipsis\"> ...</span></div>\n",
                "  <div class=\"doc-detail\" hidden>\n",
                "    <p>one<br>two</p>\n",
                "    <pre><code>if a &lt; b {}</code></pre>\n",
                "  </div>\n",
                "</div>\n",
            )
        );
    }

    #[test]
    fn test_columns_carry_data_attributes() {
        let graph = TypeGraph::from_value(json!({
            "v1.Pod": {
                "typeName": "Pod", "package": "v1",
                "fields": [ { "fieldName": "Spec", "typeName": "v1.PodSpec", "typeDecorators": ["Ptr"] } ]
            },
            "v1.PodSpec": {
                "typeName": "PodSpec", "package": "v1",
                "enumValues": [ { "name": "Always" } ]
            }
        }))
        .unwrap();
        let rendered = plan(&graph, &NavigationPath::with_fields("v1.Pod", vec!["Spec"])).unwrap();
        let html = columns_html(&rendered, 0).unwrap();

        assert!(html.contains(r#"<div class="column" data-type-name="v1.Pod">"#));
        assert!(html.contains(
            r#"<li class="selected" data-field-name="Spec" data-type-name="v1.PodSpec" data-parent-type="v1.Pod">"#
        ));
        assert!(html.contains(r#"<span class="field-type">*PodSpec</span>"#));
        assert!(html.contains(r#"<span class="chevron"></span>"#));
        assert!(html.contains(
            r#"<li class="enum-value" data-field-name="Always" data-parent-type="v1.PodSpec">"#
        ));
        assert_eq!(html.matches(r#"<div class="column" "#).count(), 2);
    }
}
