use serde::Serialize;

use crate::doc_render::{render, RenderedDoc};
use crate::file_format::type_graph::{split_type_name, TypeGraph};
use crate::nav_path::NavigationPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Field,
    EnumValue,
}

/// One member row of a column.  `field_name`, `type_name` and `parent_type`
/// are what a renderer exposes as addressable attributes on the row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Entry {
    pub kind: EntryKind,
    /// Field name, or the value name for enum members.
    pub field_name: String,
    /// Fully qualified target type; empty for enum members.
    pub type_name: String,
    pub parent_type: String,
    /// Decorated short type, e.g. `[]*Container`.
    pub display_type: String,
    /// Package of the target type.
    pub package: String,
    pub doc: Option<RenderedDoc>,
    /// The target type is in the graph, so selecting this opens a column.
    pub navigable: bool,
    pub selected: bool,
}

impl Entry {
    /// Only fields take part in the navigation path.
    pub fn is_selectable(&self) -> bool {
        self.kind == EntryKind::Field
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Column {
    pub type_name: String,
    pub short_name: String,
    pub package: String,
    pub entries: Vec<Entry>,
}

impl Column {
    pub fn position(&self, field_name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_selectable() && e.field_name == field_name)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.selected)
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.selected)
    }

    pub fn clear_selection(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.selected = false;
        }
    }

    pub fn first_selectable(&self) -> Option<usize> {
        self.entries.iter().position(|e| e.is_selectable())
    }

    /// Next selectable entry after (or, walking backwards, before) `from`.
    pub fn neighbor(&self, from: usize, forward: bool) -> Option<usize> {
        if forward {
            (from + 1..self.entries.len()).find(|&i| self.entries[i].is_selectable())
        } else {
            (0..from).rev().find(|&i| self.entries[i].is_selectable())
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderPlan {
    pub columns: Vec<Column>,
}

impl RenderPlan {
    /// Read the path back out of the rendered selection markers: the root
    /// column's type followed by each column's selected field, in order.
    pub fn selected_path(&self) -> Option<NavigationPath> {
        let root = self.columns.first()?;
        let mut path = NavigationPath::new(root.type_name.clone());
        for column in &self.columns {
            match column.selected() {
                Some(entry) => path.push(entry.field_name.clone()),
                None => break,
            }
        }
        Some(path)
    }

    /// The one entry keyboard movement starts from: the last selection.
    pub fn active_selection(&self) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .rev()
            .find_map(|(c, column)| column.selected_index().map(|e| (c, e)))
    }

    pub fn entry(&self, column: usize, entry: usize) -> Option<&Entry> {
        self.columns.get(column)?.entries.get(entry)
    }

    pub fn entry_mut(&mut self, column: usize, entry: usize) -> Option<&mut Entry> {
        self.columns.get_mut(column)?.entries.get_mut(entry)
    }
}

/// Build the column listing one type's members, or `None` if the type isn't
/// in the graph.
pub fn build_column(graph: &TypeGraph, type_name: &str) -> Option<Column> {
    let info = graph.get(type_name)?;
    trace!(type_name, "building column");

    let mut entries = vec![];
    for field in info.field_list() {
        let (package, _) = split_type_name(&field.type_name);
        entries.push(Entry {
            kind: EntryKind::Field,
            field_name: field.field_name.clone(),
            type_name: field.type_name.clone(),
            parent_type: type_name.to_string(),
            display_type: field.display_type(),
            package: package.to_string(),
            doc: field.doc().map(|d| render(&d)),
            navigable: graph.contains(&field.type_name),
            selected: false,
        });
    }
    for value in info.enum_list() {
        entries.push(Entry {
            kind: EntryKind::EnumValue,
            field_name: value.name.clone(),
            type_name: String::new(),
            parent_type: type_name.to_string(),
            display_type: String::new(),
            package: String::new(),
            doc: value.doc().map(|d| render(&d)),
            navigable: false,
            selected: false,
        });
    }

    Some(Column {
        type_name: type_name.to_string(),
        short_name: info.type_name.clone(),
        package: info.package.clone(),
        entries,
    })
}

/// Derive the columns for `path`.  Walks the fields in order, marking each
/// one selected and opening the column for its target; the walk stops at the
/// first field that isn't in the current column or whose target isn't in the
/// graph (that last one still shows as selected).  Returns `None` only when
/// the root itself is unknown.
pub fn plan(graph: &TypeGraph, path: &NavigationPath) -> Option<RenderPlan> {
    let mut columns = vec![build_column(graph, &path.root)?];

    for field_name in &path.fields {
        let current = match columns.last_mut() {
            Some(c) => c,
            None => break,
        };
        let idx = match current.position(field_name) {
            Some(idx) => idx,
            None => {
                warn!(
                    "Field [{}] not found in [{}]; stopping restore",
                    field_name, current.type_name
                );
                break;
            }
        };
        let entry = &mut current.entries[idx];
        entry.selected = true;
        let next_type = entry.type_name.clone();

        match build_column(graph, &next_type) {
            Some(column) => columns.push(column),
            None => {
                trace!(field_name = %field_name, "terminal selection");
                break;
            }
        }
    }

    Some(RenderPlan { columns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> TypeGraph {
        TypeGraph::from_value(json!({
            "v1.Pod": {
                "typeName": "Pod", "package": "v1", "isRoot": true,
                "fields": [
                    { "fieldName": "Metadata", "typeName": "v1.ObjectMeta" },
                    { "fieldName": "Spec", "typeName": "v1.PodSpec", "typeDecorators": ["Ptr"],
                      "docString": "Spec. More.", "parsedDocString": { "elements": [
                          { "type": "p", "content": ["Spec of the pod."] },
                          { "type": "p", "content": ["More."] } ] } }
                ]
            },
            "v1.PodSpec": {
                "typeName": "PodSpec", "package": "v1",
                "fields": [
                    { "fieldName": "Containers", "typeName": "v1.Container", "typeDecorators": ["List"] },
                    { "fieldName": "Hostname", "typeName": "string" },
                    { "fieldName": "Policy", "typeName": "v1.RestartPolicy" }
                ]
            },
            "v1.Container": {
                "typeName": "Container", "package": "v1",
                "fields": [ { "fieldName": "Image", "typeName": "string" } ]
            },
            "v1.RestartPolicy": {
                "typeName": "RestartPolicy", "package": "v1",
                "enumValues": [ { "name": "Always" }, { "name": "Never" } ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_build_column() {
        let graph = graph();
        let column = build_column(&graph, "v1.PodSpec").unwrap();
        assert_eq!(column.short_name, "PodSpec");
        assert_eq!(column.package, "v1");
        let containers = &column.entries[0];
        assert_eq!(containers.display_type, "[]Container");
        assert_eq!(containers.parent_type, "v1.PodSpec");
        assert!(containers.navigable);
        let hostname = &column.entries[1];
        assert_eq!(hostname.package, "");
        assert!(!hostname.navigable);

        let policy = build_column(&graph, "v1.RestartPolicy").unwrap();
        assert_eq!(policy.entries.len(), 2);
        assert_eq!(policy.first_selectable(), None);

        assert!(build_column(&graph, "v1.Nope").is_none());
    }

    #[test]
    fn test_plan_full_path() {
        let graph = graph();
        let path = NavigationPath::with_fields("v1.Pod", vec!["Spec", "Containers", "Image"]);
        let rendered = plan(&graph, &path).unwrap();
        let types: Vec<&str> = rendered.columns.iter().map(|c| c.type_name.as_str()).collect();
        // Image is a string, a terminal selection.
        assert_eq!(types, vec!["v1.Pod", "v1.PodSpec", "v1.Container"]);
        assert_eq!(rendered.selected_path(), Some(path));
        assert_eq!(rendered.active_selection(), Some((2, 0)));
    }

    #[test]
    fn test_plan_partial_restore() {
        let graph = graph();
        let path = NavigationPath::with_fields("v1.Pod", vec!["Bogus", "Containers"]);
        let rendered = plan(&graph, &path).unwrap();
        assert_eq!(rendered.columns.len(), 1);
        assert!(rendered.columns[0].selected().is_none());
        assert_eq!(rendered.selected_path(), Some(NavigationPath::new("v1.Pod")));
        assert_eq!(rendered.active_selection(), None);

        let path = NavigationPath::with_fields("v1.Pod", vec!["Spec", "Hostname", "Extra"]);
        let rendered = plan(&graph, &path).unwrap();
        assert_eq!(rendered.columns.len(), 2);
        assert_eq!(
            rendered.selected_path(),
            Some(NavigationPath::with_fields("v1.Pod", vec!["Spec", "Hostname"]))
        );
    }

    #[test]
    fn test_plan_unknown_root() {
        assert!(plan(&graph(), &NavigationPath::new("v1.Nope")).is_none());
    }

    #[test]
    fn test_column_neighbors_skip_nothing_in_field_columns() {
        let column = build_column(&graph(), "v1.PodSpec").unwrap();
        assert_eq!(column.neighbor(0, true), Some(1));
        assert_eq!(column.neighbor(2, true), None);
        assert_eq!(column.neighbor(0, false), None);
        assert_eq!(column.neighbor(2, false), Some(1));
    }

    #[test]
    fn test_entry_doc_is_rendered() {
        let column = build_column(&graph(), "v1.Pod").unwrap();
        let spec = &column.entries[1];
        let doc = spec.doc.as_ref().unwrap();
        assert_eq!(doc.summary_text(), "Spec of the pod.");
        assert!(doc.has_toggle);
        assert!(column.entries[0].doc.is_none());
        assert_eq!(spec.display_type, "*PodSpec");
    }
}
