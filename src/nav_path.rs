use std::fmt;

/// The drill-down state: a root type name followed by the field names selected
/// in each successive column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NavigationPath {
    pub root: String,
    pub fields: Vec<String>,
}

impl NavigationPath {
    pub fn new(root: impl Into<String>) -> NavigationPath {
        NavigationPath {
            root: root.into(),
            fields: vec![],
        }
    }

    pub fn with_fields<I, S>(root: impl Into<String>, fields: I) -> NavigationPath
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NavigationPath {
            root: root.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Root plus fields, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.root.as_str()).chain(self.fields.iter().map(|s| s.as_str()))
    }

    pub fn push(&mut self, field_name: impl Into<String>) {
        self.fields.push(field_name.into());
    }

    /// Keep only the first `count` field selections.
    pub fn truncate_fields(&mut self, count: usize) {
        self.fields.truncate(count);
    }
}

impl fmt::Display for NavigationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments: Vec<&str> = self.segments().collect();
        write!(f, "{}", segments.join("/"))
    }
}
