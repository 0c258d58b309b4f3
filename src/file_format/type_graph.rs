use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufReader, Write};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{from_reader, from_str, from_value, Map, Value};

use crate::error::Result;

use super::godoc::parse_go_doc_string;

/// The generator emits `null` for empty Go slices and strings are never
/// absent, but hand-written graphs do all sorts of things.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Split a fully qualified type name like `k8s.io/api/core/v1.Pod` into its
/// package (`k8s.io/api/core/v1`) and short name (`Pod`).  Names without any
/// `.` are builtins and have an empty package.
pub fn split_type_name(full_type_name: &str) -> (&str, &str) {
    match full_type_name.rfind('.') {
        Some(offset) => (&full_type_name[..offset], &full_type_name[offset + 1..]),
        None => ("", full_type_name),
    }
}

pub fn short_type_name(full_type_name: &str) -> &str {
    split_type_name(full_type_name).1
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocElementKind {
    #[serde(rename = "p")]
    Paragraph,
    #[serde(rename = "h")]
    Heading,
    #[serde(rename = "l")]
    List,
    #[serde(rename = "c")]
    Code,
    #[serde(rename = "d")]
    Directive,
}

/// One block of a parsed doc comment.  Lists have one `content` entry per
/// item; every other kind has exactly one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocElement {
    #[serde(rename = "type")]
    pub kind: DocElementKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: Vec<String>,
}

impl DocElement {
    pub fn new(kind: DocElementKind, content: Vec<String>) -> DocElement {
        DocElement { kind, content }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDoc {
    #[serde(default)]
    pub elements: Option<Vec<DocElement>>,
}

/// Documentation as handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocString {
    Plain(String),
    Structured(StructuredDoc),
}

fn resolve_doc(raw: &str, parsed: &Option<StructuredDoc>) -> Option<DocString> {
    if raw.is_empty() {
        return None;
    }
    Some(match parsed {
        Some(structured) => DocString::Structured(structured.clone()),
        None => DocString::Plain(raw.to_string()),
    })
}

fn fill_parsed_doc(raw: &str, parsed: &mut Option<StructuredDoc>) {
    let missing = match parsed {
        None => true,
        Some(structured) => structured.elements.is_none(),
    };
    if missing && !raw.is_empty() {
        *parsed = Some(parse_go_doc_string(raw));
    }
}

/// Type modifiers as emitted by the generator, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decorator {
    Ptr,
    List,
    Map(String),
}

impl Decorator {
    pub fn parse(s: &str) -> Option<Decorator> {
        match s {
            "Ptr" => Some(Decorator::Ptr),
            "List" => Some(Decorator::List),
            _ => s
                .strip_prefix("Map[")
                .and_then(|rest| rest.strip_suffix(']'))
                .map(|key| Decorator::Map(key.to_string())),
        }
    }

    pub fn prefix(&self) -> String {
        match self {
            Decorator::Ptr => "*".to_string(),
            Decorator::List => "[]".to_string(),
            Decorator::Map(key) => format!("map[{}]", key),
        }
    }
}

/// Compose decorators into the Go-style prefix shown before the type name,
/// e.g. `["Map[string]", "Ptr"]` becomes `map[string]*`.  Decorators we don't
/// understand contribute nothing.
pub fn format_decorators<S: AsRef<str>>(decorators: &[S]) -> String {
    decorators
        .iter()
        .filter_map(|d| Decorator::parse(d.as_ref()))
        .map(|d| d.prefix())
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    pub field_name: String,
    /// Fully qualified name of the field's type, decorators stripped.
    pub type_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_decorators: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_doc_string: Option<StructuredDoc>,
}

impl FieldInfo {
    pub fn doc(&self) -> Option<DocString> {
        resolve_doc(&self.doc_string, &self.parsed_doc_string)
    }

    /// What the column shows as the field's type: decorators plus the short
    /// type name, e.g. `[]*Container`.
    pub fn display_type(&self) -> String {
        format!(
            "{}{}",
            format_decorators(&self.type_decorators),
            short_type_name(&self.type_name)
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_doc_string: Option<StructuredDoc>,
}

impl EnumValue {
    pub fn doc(&self) -> Option<DocString> {
        resolve_doc(&self.doc_string, &self.parsed_doc_string)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub package: String,
    /// Short name; the graph key carries the qualified one.
    pub type_name: String,
    #[serde(default)]
    pub fields: Option<Vec<FieldInfo>>,
    #[serde(default)]
    pub enum_values: Option<Vec<EnumValue>>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub doc_string: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_doc_string: Option<StructuredDoc>,
}

impl TypeInfo {
    pub fn field(&self, field_name: &str) -> Option<&FieldInfo> {
        self.fields
            .as_ref()?
            .iter()
            .find(|f| f.field_name == field_name)
    }

    pub fn field_list(&self) -> &[FieldInfo] {
        self.fields.as_deref().unwrap_or(&[])
    }

    pub fn enum_list(&self) -> &[EnumValue] {
        self.enum_values.as_deref().unwrap_or(&[])
    }
}

/// The read-only type graph produced by the generator.  Lookups are by fully
/// qualified type name; iteration follows the order of the input document so
/// that "the first type" is well defined.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    types: Vec<(String, TypeInfo)>,
    by_name: HashMap<String, usize>,
}

impl TypeGraph {
    pub fn from_entries<I>(entries: I) -> TypeGraph
    where
        I: IntoIterator<Item = (String, TypeInfo)>,
    {
        let mut graph = TypeGraph::default();
        for (name, info) in entries {
            match graph.by_name.get(&name) {
                Some(&idx) => graph.types[idx].1 = info,
                None => {
                    graph.by_name.insert(name.clone(), graph.types.len());
                    graph.types.push((name, info));
                }
            }
        }
        graph
    }

    /// Build from a JSON object value, preserving key order.
    pub fn from_value(value: Value) -> Result<TypeGraph> {
        let map: Map<String, Value> = from_value(value)?;
        let mut entries = Vec::with_capacity(map.len());
        for (name, info) in map {
            entries.push((name, from_value::<TypeInfo>(info)?));
        }
        Ok(TypeGraph::from_entries(entries))
    }

    pub fn from_json_str(s: &str) -> Result<TypeGraph> {
        TypeGraph::from_value(from_str(s)?)
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeInfo> {
        self.by_name.get(type_name).map(|&idx| &self.types[idx].1)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.by_name.contains_key(type_name)
    }

    pub fn first_type_name(&self) -> Option<&str> {
        self.types.first().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeInfo)> {
        self.types.iter().map(|(name, info)| (name.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// A copy suitable for publishing: fields and enum values sorted by name,
    /// and any raw doc comment without a parsed form gets one.
    pub fn normalized(&self) -> BTreeMap<String, TypeInfo> {
        let mut out = BTreeMap::new();
        for (name, info) in &self.types {
            let mut info = info.clone();
            fill_parsed_doc(&info.doc_string, &mut info.parsed_doc_string);
            if let Some(fields) = info.fields.as_mut() {
                fields.sort_by(|a, b| a.field_name.cmp(&b.field_name));
                for field in fields.iter_mut() {
                    fill_parsed_doc(&field.doc_string, &mut field.parsed_doc_string);
                }
            }
            if let Some(values) = info.enum_values.as_mut() {
                values.sort_by(|a, b| a.name.cmp(&b.name));
                for value in values.iter_mut() {
                    fill_parsed_doc(&value.doc_string, &mut value.parsed_doc_string);
                }
            }
            out.insert(name.clone(), info);
        }
        out
    }

    /// The graph as a JSON value in input order, for embedding in pages.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (name, info) in &self.types {
            map.insert(
                name.clone(),
                serde_json::to_value(info).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }
}

pub fn read_type_graph(filename: &str) -> Result<TypeGraph> {
    let file = File::open(filename)?;
    let mut reader = BufReader::new(&file);
    let value: Value = from_reader(&mut reader)?;
    let graph = TypeGraph::from_value(value)?;
    info!("Loaded {} types from [{}]", graph.len(), filename);
    Ok(graph)
}

/// Write the normalized graph as pretty-printed JSON with sorted keys so the
/// output is stable across runs.
pub fn write_type_graph(graph: &TypeGraph, writer: &mut dyn Write) -> Result<()> {
    let normalized = graph.normalized();
    serde_json::to_writer_pretty(&mut *writer, &normalized)?;
    writeln!(writer)?;
    Ok(())
}
