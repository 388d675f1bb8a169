//! Internal `$ref` resolution and `allOf` flattening.
//!
//! Only document-internal JSON pointers (`#/a/b/c`) are resolved; external
//! URIs pass through untouched. A `$ref` site may carry additional keys
//! (`title`, `default`, ...) which override the referenced node's keys, so
//! resolution is an overlay rather than a replacement.

use serde_json::{Map, Value};

use crate::schema::SchemaError;

/// Upper bound on chained `$ref` resolution steps.
///
/// Pointer chains inside one document are rarely more than a few hops deep;
/// hitting this bound means the chain cycles back on itself, which is
/// reported instead of recursed into.
pub const MAX_REF_DEPTH: usize = 64;

/// Resolve a schema node to its referenced target, following `$ref` chains.
///
/// Each step overlays the target's keys with the referring node's own keys
/// (except `$ref` itself), so keys written nearest the original node win.
/// A dangling or external `$ref` leaves the node as-is.
///
/// # Errors
///
/// [`SchemaError::RefDepthExceeded`] when the chain does not terminate
/// within [`MAX_REF_DEPTH`] steps.
pub fn resolve(root: &Value, node: &Value) -> Result<Value, SchemaError> {
    let mut current = node.clone();
    let mut depth = 0;
    while let Some(pointer) = current.get("$ref").and_then(Value::as_str) {
        if !pointer.starts_with("#/") {
            break;
        }
        if depth >= MAX_REF_DEPTH {
            return Err(SchemaError::RefDepthExceeded {
                pointer: pointer.to_string(),
                limit: MAX_REF_DEPTH,
            });
        }
        let Some(target) = lookup_pointer(root, pointer) else {
            // Dangling reference: degrade to the node's own keys.
            break;
        };
        current = overlay(target, &current);
        depth += 1;
    }
    Ok(current)
}

/// Resolve references and flatten `allOf` into one effective node.
///
/// Keys sitting next to `allOf` on the same node take part in the merge as
/// the last (winning) branch, the same precedence rule as a `$ref` site.
pub fn effective(root: &Value, node: &Value) -> Result<Value, SchemaError> {
    let resolved = resolve(root, node)?;
    let Some(Value::Array(branches)) = resolved.get("allOf") else {
        return Ok(resolved);
    };
    let mut parts = branches.clone();
    if let Value::Object(map) = &resolved {
        let mut carrier = map.clone();
        carrier.remove("allOf");
        if !carrier.is_empty() {
            parts.push(Value::Object(carrier));
        }
    }
    merge_all_of(root, &parts)
}

/// Merge `allOf` branches left to right into a single node.
///
/// The merge is shallow (later keys override earlier) except for two deep
/// cases: `properties` maps are unioned per key (later wins) and `required`
/// lists are unioned as a deduplicated set in first-seen order. Each branch
/// is resolved before merging.
pub fn merge_all_of(root: &Value, branches: &[Value]) -> Result<Value, SchemaError> {
    let mut merged = Map::new();
    let mut properties = Map::new();
    let mut required: Vec<Value> = Vec::new();

    for branch in branches {
        let Value::Object(map) = resolve(root, branch)? else {
            continue;
        };
        for (key, value) in map {
            match key.as_str() {
                "properties" => {
                    if let Value::Object(branch_props) = value {
                        for (name, schema) in branch_props {
                            properties.insert(name, schema);
                        }
                    }
                }
                "required" => {
                    if let Value::Array(names) = value {
                        for name in names {
                            if !required.contains(&name) {
                                required.push(name);
                            }
                        }
                    }
                }
                _ => {
                    merged.insert(key, value);
                }
            }
        }
    }

    if !properties.is_empty() {
        merged.insert("properties".to_string(), Value::Object(properties));
    }
    if !required.is_empty() {
        merged.insert("required".to_string(), Value::Array(required));
    }
    Ok(Value::Object(merged))
}

/// Walk an internal JSON pointer (`#/a/b/c`) through `root`.
///
/// Empty segments are discarded and `~1`/`~0` are unescaped per segment.
/// Returns `None` when any segment is missing.
fn lookup_pointer<'a>(root: &'a Value, pointer: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in pointer
        .trim_start_matches('#')
        .split('/')
        .filter(|s| !s.is_empty())
    {
        let key = segment.replace("~1", "/").replace("~0", "~");
        current = match current {
            Value::Object(map) => map.get(&key)?,
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Overlay `local`'s keys (except `$ref`) on top of `target`'s.
fn overlay(target: &Value, local: &Value) -> Value {
    let (Value::Object(target_map), Value::Object(local_map)) = (target, local) else {
        return target.clone();
    };
    let mut merged = target_map.clone();
    for (key, value) in local_map {
        if key != "$ref" {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_overlays_local_keys_over_target() {
        let root = json!({ "x": { "title": "X", "type": "string" } });
        let node = json!({ "$ref": "#/x", "title": "T" });
        let resolved = resolve(&root, &node).unwrap();
        assert_eq!(resolved, json!({ "title": "T", "type": "string" }));
    }

    #[test]
    fn resolve_unescapes_pointer_segments() {
        let root = json!({
            "a/b": { "type": "number" },
            "c~d": { "type": "boolean" }
        });
        let slash = resolve(&root, &json!({ "$ref": "#/a~1b" })).unwrap();
        assert_eq!(slash, json!({ "type": "number" }));
        let tilde = resolve(&root, &json!({ "$ref": "#/c~0d" })).unwrap();
        assert_eq!(tilde, json!({ "type": "boolean" }));
    }

    #[test]
    fn resolve_walks_array_indices() {
        let root = json!({ "defs": [{ "type": "integer" }] });
        let resolved = resolve(&root, &json!({ "$ref": "#/defs/0" })).unwrap();
        assert_eq!(resolved, json!({ "type": "integer" }));
    }

    #[test]
    fn dangling_ref_returns_node_unchanged() {
        let root = json!({});
        let node = json!({ "$ref": "#/missing", "description": "kept" });
        let resolved = resolve(&root, &node).unwrap();
        assert_eq!(resolved, node);
    }

    #[test]
    fn external_ref_is_left_alone() {
        let root = json!({});
        let node = json!({ "$ref": "https://example.com/s.json" });
        assert_eq!(resolve(&root, &node).unwrap(), node);
    }

    #[test]
    fn ref_chain_resolves_through_intermediate_nodes() {
        let root = json!({
            "a": { "$ref": "#/b", "title": "A" },
            "b": { "type": "string", "title": "B", "pattern": "^x" }
        });
        let resolved = resolve(&root, &json!({ "$ref": "#/a" })).unwrap();
        assert_eq!(
            resolved,
            json!({ "type": "string", "title": "A", "pattern": "^x" })
        );
    }

    #[test]
    fn self_referential_chain_is_reported() {
        let root = json!({ "loop": { "$ref": "#/loop" } });
        let err = resolve(&root, &json!({ "$ref": "#/loop" })).unwrap_err();
        assert!(matches!(err, SchemaError::RefDepthExceeded { .. }));
    }

    #[test]
    fn merge_unions_properties_and_required() {
        let root = json!({});
        let branches = [
            json!({ "properties": { "a": { "type": "string" } }, "required": ["a"] }),
            json!({ "properties": { "b": { "type": "number" } }, "required": ["b"] }),
        ];
        let merged = merge_all_of(&root, &branches).unwrap();
        assert_eq!(merged["required"], json!(["a", "b"]));
        assert_eq!(merged["properties"]["a"], json!({ "type": "string" }));
        assert_eq!(merged["properties"]["b"], json!({ "type": "number" }));
    }

    #[test]
    fn merge_later_branch_wins_per_key() {
        let root = json!({});
        let branches = [
            json!({ "type": "object", "properties": { "a": { "type": "string" } } }),
            json!({ "properties": { "a": { "type": "integer" } }, "required": ["a", "a"] }),
        ];
        let merged = merge_all_of(&root, &branches).unwrap();
        assert_eq!(merged["type"], json!("object"));
        assert_eq!(merged["properties"]["a"], json!({ "type": "integer" }));
        assert_eq!(merged["required"], json!(["a"]));
    }

    #[test]
    fn merge_resolves_each_branch_first() {
        let root = json!({ "base": { "properties": { "a": { "type": "string" } } } });
        let branches = [json!({ "$ref": "#/base" }), json!({ "required": ["a"] })];
        let merged = merge_all_of(&root, &branches).unwrap();
        assert_eq!(merged["properties"]["a"], json!({ "type": "string" }));
    }

    #[test]
    fn effective_flattens_all_of_with_carrier_keys_winning() {
        let root = json!({});
        let node = json!({
            "title": "carrier",
            "allOf": [
                { "type": "object", "title": "branch", "properties": { "a": { "type": "string" } } },
                { "properties": { "b": { "type": "number" } }, "required": ["b"] }
            ]
        });
        let node = effective(&root, &node).unwrap();
        assert_eq!(node["title"], json!("carrier"));
        assert_eq!(node["type"], json!("object"));
        assert!(node["properties"].get("a").is_some());
        assert!(node["properties"].get("b").is_some());
        assert_eq!(node["required"], json!(["b"]));
        assert!(node.get("allOf").is_none());
    }

    #[test]
    fn effective_without_all_of_is_plain_resolution() {
        let root = json!({ "s": { "type": "string" } });
        let node = effective(&root, &json!({ "$ref": "#/s" })).unwrap();
        assert_eq!(node, json!({ "type": "string" }));
    }
}
