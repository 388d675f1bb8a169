//! Default-value synthesis.
//!
//! Produces the minimal value satisfying a schema node's required shape:
//! optional fields are omitted on purpose so a freshly seeded value tree
//! exports compact JSON.

use serde_json::{Map, Number, Value};

use crate::schema::{
    SchemaError,
    resolver::effective,
    types::{SchemaType, infer_type},
};

/// Synthesize a minimal value for `node`.
///
/// Precedence: a literal `default` is returned verbatim (no type check),
/// then the first `oneOf` branch, then the first `enum` literal, then a
/// skeleton by inferred kind: objects get their `required` properties only,
/// arrays are empty, booleans are `false`, numbers take `minimum` or `0`,
/// strings are empty.
///
/// Pure; the value tree is never touched.
///
/// # Errors
///
/// Propagates [`SchemaError::RefDepthExceeded`] from resolution.
pub fn synthesize(root: &Value, node: &Value) -> Result<Value, SchemaError> {
    let node = effective(root, node)?;
    if let Some(default) = node.get("default") {
        return Ok(default.clone());
    }
    if let Some(Value::Array(branches)) = node.get("oneOf")
        && let Some(first) = branches.first()
    {
        return synthesize(root, first);
    }
    if let Some(Value::Array(literals)) = node.get("enum")
        && let Some(first) = literals.first()
    {
        return Ok(first.clone());
    }
    Ok(match infer_type(&node) {
        SchemaType::Object => synthesize_object(root, &node)?,
        SchemaType::Array => Value::Array(Vec::new()),
        SchemaType::Boolean => Value::Bool(false),
        SchemaType::Number | SchemaType::Integer => node
            .get("minimum")
            .cloned()
            .unwrap_or_else(|| Value::Number(Number::from(0))),
        SchemaType::String => Value::String(String::new()),
    })
}

/// Object skeleton: required properties only. An object with no named
/// properties but an `additionalProperties` schema stays empty.
fn synthesize_object(root: &Value, node: &Value) -> Result<Value, SchemaError> {
    let empty = Map::new();
    let properties = node
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut out = Map::new();
    if let Some(Value::Array(required)) = node.get("required") {
        for name in required.iter().filter_map(Value::as_str) {
            let schema = properties
                .get(name)
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            out.insert(name.to_string(), synthesize(root, &schema)?);
        }
    }
    Ok(Value::Object(out))
}
