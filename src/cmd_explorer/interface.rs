use std::fmt::Debug;
use std::io::Write;

use serde::Serialize;
use serde_json::{to_string, to_string_pretty, Value};

use super::parser::OutputFormat;
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::file_format::type_graph::TypeGraph;
use crate::input_router::SearchOverlay;
use crate::render_plan::RenderPlan;

/// Everything a command gets to work with: the loaded graph and the merged
/// configuration.
#[derive(Debug)]
pub struct ExplorerContext {
    pub graph: TypeGraph,
    pub config: ExplorerConfig,
}

/// The result of a command.  `TextFile` contents are written verbatim; every
/// other variant is emitted as JSON.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ExplorerValues {
    TextFile(TextFile),
    JsonValue(Value),
    TypeList(TypeList),
    DecodedPath(DecodedPath),
    NavigationReport(NavigationReport),
}

#[derive(Debug, Serialize)]
pub struct TextFile {
    pub mime_type: String,
    pub contents: String,
}

#[derive(Debug, Serialize)]
pub struct TypeList {
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodedPath {
    pub root: String,
    pub fields: Vec<String>,
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct ColumnSummary {
    pub type_name: String,
    pub selected: Option<String>,
    pub entries: usize,
}

impl ColumnSummary {
    pub fn from_plan(plan: &RenderPlan) -> Vec<ColumnSummary> {
        plan.columns
            .iter()
            .map(|column| ColumnSummary {
                type_name: column.type_name.clone(),
                selected: column.selected().map(|e| e.field_name.clone()),
                entries: column.entries.len(),
            })
            .collect()
    }
}

/// Where a replayed interaction ended up.
#[derive(Debug, Serialize)]
pub struct NavigationReport {
    pub fragment: String,
    pub path: Option<String>,
    pub columns: Vec<ColumnSummary>,
    pub active: Option<(usize, usize)>,
    pub restores: usize,
    pub overlay: SearchOverlay,
}

pub trait ExplorerCommand: Debug {
    fn execute(&self, ctx: &ExplorerContext) -> Result<ExplorerValues>;
}

impl ExplorerValues {
    pub fn write(&self, format: OutputFormat, writer: &mut dyn Write) -> Result<()> {
        match self {
            ExplorerValues::TextFile(file) => writer.write_all(file.contents.as_bytes())?,
            _ => {
                let s = match format {
                    OutputFormat::Pretty => to_string_pretty(self)?,
                    OutputFormat::Concise => to_string(self)?,
                };
                writeln!(writer, "{}", s)?;
            }
        }
        Ok(())
    }
}

#[test]
fn test_write_values() {
    let values = ExplorerValues::TypeList(TypeList {
        types: vec!["v1.Pod".to_string()],
    });
    let mut buf = Vec::new();
    values.write(OutputFormat::Concise, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "{\"types\":[\"v1.Pod\"]}\n");

    // Text files go out verbatim, whatever the format.
    let page = ExplorerValues::TextFile(TextFile {
        mime_type: "text/html".to_string(),
        contents: "<p>hi</p>".to_string(),
    });
    let mut buf = Vec::new();
    page.write(OutputFormat::Pretty, &mut buf).unwrap();
    assert_eq!(String::from_utf8(buf).unwrap(), "<p>hi</p>");
}
