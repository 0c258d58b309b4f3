use regex::Regex;

use crate::file_format::type_graph::TypeGraph;
use crate::nav_path::NavigationPath;

/// True if some `%` isn't followed by two hex digits.  `urlencoding` passes
/// those through untouched, but a browser's decoder rejects them.
fn has_malformed_escape(s: &str) -> bool {
    lazy_static! {
        static ref BAD_ESCAPE_REGEX: Regex =
            Regex::new(r"%([^0-9A-Fa-f]|[0-9A-Fa-f]([^0-9A-Fa-f]|$)|$)").unwrap();
    }
    BAD_ESCAPE_REGEX.is_match(s)
}

/// Serialize a path into a URL fragment: `#root/field/field`.  Nothing is
/// escaped; type names use `.` to separate the package and field names never
/// contain `/`.
pub fn encode(path: &NavigationPath) -> String {
    format!("#{}", path)
}

/// Split a fragment into its root type name and field names without
/// consulting the graph.  Package paths contain `/` too, so the root ends at
/// the last segment containing a `.`; with no `.` anywhere the first segment is
/// taken to be a builtin/unqualified root.
///
/// Returns `None` for an empty fragment or one that doesn't percent-decode.
pub fn split_fragment(fragment: &str) -> Option<(String, Vec<String>)> {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    if raw.is_empty() {
        return None;
    }

    if has_malformed_escape(raw) {
        warn!("Malformed percent-escape in fragment [{}]", raw);
        return None;
    }
    let decoded = match urlencoding::decode(raw) {
        Ok(s) => s.into_owned(),
        Err(err) => {
            warn!("Unable to percent-decode fragment [{}]: {}", raw, err);
            return None;
        }
    };
    if decoded.is_empty() {
        return None;
    }

    let parts: Vec<&str> = decoded.split('/').collect();
    let root_end = parts
        .iter()
        .rposition(|part| part.contains('.'))
        .unwrap_or(0);

    let root = parts[..=root_end].join("/");
    let fields = parts[root_end + 1..]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Some((root, fields))
}

/// Decode a fragment into a path whose root is known to the graph.  The field
/// names are not validated here; restoring a path stops at the first one that
/// doesn't fit.
pub fn decode(fragment: &str, graph: &TypeGraph) -> Option<NavigationPath> {
    let (root, fields) = split_fragment(fragment)?;
    if !graph.contains(&root) {
        warn!("Fragment root type [{}] not found", root);
        return None;
    }
    trace!(root = %root, fields = ?fields, "decoded fragment");
    Some(NavigationPath { root, fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph() -> TypeGraph {
        TypeGraph::from_value(json!({
            "k8s.io/api/core/v1.Pod": { "typeName": "Pod", "package": "k8s.io/api/core/v1" },
            "v1.Service": { "typeName": "Service", "package": "v1" },
            "string": { "typeName": "string", "package": "" }
        }))
        .unwrap()
    }

    #[test]
    fn test_encode() {
        assert_eq!(
            encode(&NavigationPath::new("k8s.io/api/core/v1.Pod")),
            "#k8s.io/api/core/v1.Pod"
        );
        assert_eq!(
            encode(&NavigationPath::with_fields("v1.Service", vec!["Spec", "Ports"])),
            "#v1.Service/Spec/Ports"
        );
    }

    #[test]
    fn test_decode_qualified_root() {
        let path = decode("#k8s.io/api/core/v1.Pod/Spec/Containers", &graph()).unwrap();
        assert_eq!(path.root, "k8s.io/api/core/v1.Pod");
        assert_eq!(path.fields, vec!["Spec", "Containers"]);
    }

    #[test]
    fn test_decode_unqualified_root() {
        let path = decode("#string", &graph()).unwrap();
        assert_eq!(path.root, "string");
        assert!(path.fields.is_empty());

        assert_eq!(
            split_fragment("#string/Len/Cap"),
            Some(("string".to_string(), vec!["Len".to_string(), "Cap".to_string()]))
        );
    }

    #[test]
    fn test_decode_failures() {
        let graph = graph();
        assert_eq!(decode("", &graph), None);
        assert_eq!(decode("#", &graph), None);
        assert_eq!(decode("#v1.Nope/Spec", &graph), None);
        // %FF%FE is not valid UTF-8 once decoded.
        assert_eq!(decode("#v1.Service/%FF%FE", &graph), None);
        assert_eq!(decode("#v1.Service/%zz", &graph), None);
        assert_eq!(decode("#v1.Service/Spec%", &graph), None);
        assert_eq!(decode("#v1.Service/Spec%4", &graph), None);
        assert_eq!(decode("#v1.Service/%4g", &graph), None);
    }

    #[test]
    fn test_malformed_escapes() {
        assert!(!has_malformed_escape("k8s.io%2Fapi/v1.Pod"));
        assert!(!has_malformed_escape("v1.Pod/Spec%41"));
        assert!(has_malformed_escape("%"));
        assert!(has_malformed_escape("%%41"));
        assert!(has_malformed_escape("a%2"));
    }

    #[test]
    fn test_decode_percent_encoded() {
        let path = decode("#k8s.io%2Fapi%2Fcore%2Fv1.Pod/Spec", &graph()).unwrap();
        assert_eq!(path.root, "k8s.io/api/core/v1.Pod");
        assert_eq!(path.fields, vec!["Spec"]);
    }

    #[test]
    fn test_round_trip() {
        let graph = graph();
        let paths = vec![
            NavigationPath::new("k8s.io/api/core/v1.Pod"),
            NavigationPath::with_fields("k8s.io/api/core/v1.Pod", vec!["Spec", "Containers", "Image"]),
            NavigationPath::with_fields("v1.Service", vec!["Spec"]),
            NavigationPath::with_fields("string", vec!["Whatever"]),
        ];
        for path in paths {
            assert_eq!(decode(&encode(&path), &graph), Some(path.clone()), "{}", path);
        }
    }
}
