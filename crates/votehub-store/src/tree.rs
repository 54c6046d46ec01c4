//! JSON tree operations shared by the store backends.
//!
//! The tree follows realtime-database semantics: `null` and empty objects
//! do not exist, so writing `null` removes a node and prunes any parent
//! left empty.

use serde_json::{Map, Value};

use votehub_core::types::path::StorePath;

/// Read the node at `path`; missing nodes read as `Value::Null`.
pub fn get_at(root: &Value, path: &StorePath) -> Value {
    let mut node = root;
    for segment in path.segments() {
        match node.get(segment) {
            Some(child) => node = child,
            None => return Value::Null,
        }
    }
    if is_empty_node(node) {
        Value::Null
    } else {
        node.clone()
    }
}

/// Replace the node at `path` with `value`.
pub fn set_at(root: &mut Value, path: &StorePath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    set_segments(root, &segments, value);
}

/// Apply a multi-location update relative to `path`.
///
/// Each key of `patch` may itself be a slash-separated relative path.
pub fn merge_at(root: &mut Value, path: &StorePath, patch: Map<String, Value>) {
    let base: Vec<&str> = path.segments().collect();
    for (relative, value) in patch {
        let mut segments = base.clone();
        segments.extend(relative.split('/').filter(|s| !s.is_empty()));
        set_segments(root, &segments, value);
    }
}

fn set_segments(node: &mut Value, segments: &[&str], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = normalize(value);
        return;
    };

    if !node.is_object() {
        if value.is_null() {
            return;
        }
        *node = Value::Object(Map::new());
    }

    let Value::Object(map) = node else {
        return;
    };

    let child = map.entry(first.to_string()).or_insert(Value::Null);
    set_segments(child, rest, value);
    let prune = is_empty_node(child);
    if prune {
        map.remove(*first);
    }
}

/// Strip nulls and empty objects from a value about to be stored.
fn normalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, normalize(v)))
                .filter(|(_, v)| !is_empty_node(v))
                .collect();
            if cleaned.is_empty() {
                Value::Null
            } else {
                Value::Object(cleaned)
            }
        }
        other => other,
    }
}

fn is_empty_node(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> StorePath {
        StorePath::parse(raw).unwrap()
    }

    #[test]
    fn test_set_creates_intermediate_objects() {
        let mut root = Value::Null;
        set_at(&mut root, &path("votes/Ana/speed-TurboFlow"), json!(true));
        assert_eq!(root, json!({"votes": {"Ana": {"speed-TurboFlow": true}}}));
    }

    #[test]
    fn test_null_write_prunes_empty_parents() {
        let mut root = json!({"votes": {"Ana": {"speed-TurboFlow": true}}, "activeUsers": {"Ana": 1}});
        set_at(&mut root, &path("votes/Ana/speed-TurboFlow"), Value::Null);
        assert_eq!(root, json!({"activeUsers": {"Ana": 1}}));
    }

    #[test]
    fn test_get_missing_is_null() {
        let root = json!({"votes": {}});
        assert_eq!(get_at(&root, &path("votes")), Value::Null);
        assert_eq!(get_at(&root, &path("votes/Ana/x")), Value::Null);
    }

    #[test]
    fn test_write_normalizes_nested_nulls() {
        let mut root = Value::Null;
        set_at(&mut root, &path("a"), json!({"b": null, "c": {}, "d": 1}));
        assert_eq!(root, json!({"a": {"d": 1}}));
    }

    #[test]
    fn test_merge_relative_paths() {
        let mut root = json!({"votes": {"Ana": {"x-A": true}}});
        let patch = json!({"Ana/x-B": true, "Luis": {"x-A": true}});
        let Value::Object(patch) = patch else { unreachable!() };
        merge_at(&mut root, &path("votes"), patch);
        assert_eq!(
            root,
            json!({"votes": {"Ana": {"x-A": true, "x-B": true}, "Luis": {"x-A": true}}})
        );
    }
}
