use itertools::Itertools;
use lexical_sort::lexical_cmp;

use crate::file_format::type_graph::{short_type_name, TypeGraph};

/// The root types offered by the quick-open overlay, pre-sorted for display.
#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
    sorted_roots: Vec<String>,
    limit: usize,
}

impl SearchIndex {
    pub fn new(graph: &TypeGraph) -> SearchIndex {
        let sorted_roots: Vec<String> = graph
            .iter()
            .filter(|(_, info)| info.is_root)
            .map(|(name, _)| name.to_string())
            .sorted_by(|a, b| {
                lexical_cmp(short_type_name(a), short_type_name(b))
                    .then_with(|| lexical_cmp(a, b))
                    .then_with(|| a.cmp(b))
            })
            .collect();
        trace!(roots = sorted_roots.len(), "built search index");
        SearchIndex {
            sorted_roots,
            limit: 0,
        }
    }

    /// Cap the number of results; 0 means no cap.
    pub fn with_limit(mut self, limit: usize) -> SearchIndex {
        self.limit = limit;
        self
    }

    pub fn len(&self) -> usize {
        self.sorted_roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_roots.is_empty()
    }

    /// Root types whose full name contains `filter`, ignoring case.  An empty
    /// filter matches everything.
    pub fn query(&self, filter: &str) -> Vec<&str> {
        let needle = filter.to_lowercase();
        let matches = self
            .sorted_roots
            .iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .map(|name| name.as_str());
        if self.limit > 0 {
            matches.take(self.limit).collect()
        } else {
            matches.collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> TypeGraph {
        TypeGraph::from_value(json!({
            "v1.Service": { "typeName": "Service", "package": "v1", "isRoot": true },
            "v1.PodList": { "typeName": "PodList", "package": "v1", "isRoot": true },
            "v1.Pod": { "typeName": "Pod", "package": "v1", "isRoot": true },
            "v1.PodSpec": { "typeName": "PodSpec", "package": "v1" },
            "apps/v1.Deployment": { "typeName": "Deployment", "package": "apps/v1", "isRoot": true },
            "batch/v1.PodTemplate": { "typeName": "PodTemplate", "package": "batch/v1", "isRoot": true }
        }))
        .unwrap()
    }

    #[test]
    fn test_query_filters_roots_case_insensitively() {
        let index = SearchIndex::new(&graph());
        assert_eq!(index.len(), 5);
        assert_eq!(index.query("POD"), vec!["v1.Pod", "v1.PodList", "batch/v1.PodTemplate"]);
        // Non-root types never show up.
        assert!(!index.query("spec").contains(&"v1.PodSpec"));
        assert!(index.query("nothing").is_empty());
    }

    #[test]
    fn test_query_sorts_by_short_name() {
        let index = SearchIndex::new(&graph());
        assert_eq!(
            index.query(""),
            vec![
                "apps/v1.Deployment",
                "v1.Pod",
                "v1.PodList",
                "batch/v1.PodTemplate",
                "v1.Service",
            ]
        );
        // The package is part of what's matched.
        assert_eq!(index.query("apps/"), vec!["apps/v1.Deployment"]);
    }

    #[test]
    fn test_same_short_name_sorts_by_package() {
        let graph = TypeGraph::from_value(json!({
            "Zeta/v1.Widget": { "typeName": "Widget", "package": "Zeta/v1", "isRoot": true },
            "alpha/v1.Widget": { "typeName": "Widget", "package": "alpha/v1", "isRoot": true }
        }))
        .unwrap();
        // Byte order would put the capitalized package first.
        assert_eq!(
            SearchIndex::new(&graph).query("widget"),
            vec!["alpha/v1.Widget", "Zeta/v1.Widget"]
        );
    }

    #[test]
    fn test_query_limit() {
        let index = SearchIndex::new(&graph()).with_limit(2);
        assert_eq!(index.query(""), vec!["apps/v1.Deployment", "v1.Pod"]);
    }
}
