//! Recursive validation of a value tree against a schema node.
//!
//! Violations are plain strings of the form `"<location> <message>"` where
//! the location starts at `$` and grows `.field` / `[index]` suffixes. The
//! list is accumulated in traversal order: object properties in
//! schema-declared order, array elements by index. Findings are data, not
//! errors; validation never halts on them.

use log::debug;
use regex::Regex;
use serde_json::{Map, Value};

use crate::data::oneof::VariantSelector;
use crate::data::path::ADDITIONAL_PROPS_KEY;
use crate::schema::{
    SchemaError,
    resolver::effective,
    types::{SchemaType, infer_type},
};

/// Root marker for violation locations.
pub const ROOT_LOCATION: &str = "$";

/// Validate `value` against `node` and collect violations.
///
/// An absent value (`None`) is valid at its own level; required-ness is
/// reported once by the owning object. `oneOf` nodes are checked only
/// against the branch currently selected for their location (index 0 when
/// unset); sibling branches are never consulted.
///
/// # Errors
///
/// Propagates [`SchemaError::RefDepthExceeded`] from resolution. Violations
/// themselves are the `Ok` payload, never an error.
pub fn validate(
    root: &Value,
    node: &Value,
    value: Option<&Value>,
    location: &str,
    variants: &VariantSelector,
) -> Result<Vec<String>, SchemaError> {
    let mut violations = Vec::new();
    check(root, node, value, location, variants, &mut violations)?;
    Ok(violations)
}

fn check(
    root: &Value,
    node: &Value,
    value: Option<&Value>,
    location: &str,
    variants: &VariantSelector,
    out: &mut Vec<String>,
) -> Result<(), SchemaError> {
    // Absence is valid here; the parent object reports missing requireds.
    let Some(value) = value else {
        return Ok(());
    };
    let node = effective(root, node)?;

    if let Some(Value::Array(branches)) = node.get("oneOf") {
        let index = variants.get(location);
        let Some(branch) = branches.get(index).or_else(|| branches.first()) else {
            return Ok(());
        };
        return check(root, branch, Some(value), location, variants, out);
    }

    match infer_type(&node) {
        SchemaType::Object => check_object(root, &node, value, location, variants, out),
        SchemaType::Array => check_array(root, &node, value, location, variants, out),
        SchemaType::Boolean => {
            if !value.is_boolean() {
                out.push(mismatch(location, SchemaType::Boolean));
            }
            Ok(())
        }
        SchemaType::Number => {
            check_number(&node, value, location, false, out);
            Ok(())
        }
        SchemaType::Integer => {
            check_number(&node, value, location, true, out);
            Ok(())
        }
        SchemaType::String => {
            check_string(&node, value, location, out);
            Ok(())
        }
    }
}

fn check_object(
    root: &Value,
    node: &Value,
    value: &Value,
    location: &str,
    variants: &VariantSelector,
    out: &mut Vec<String>,
) -> Result<(), SchemaError> {
    let Some(map) = value.as_object() else {
        out.push(mismatch(location, SchemaType::Object));
        return Ok(());
    };

    let empty = Map::new();
    let properties = node
        .get("properties")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    if let Some(Value::Array(required)) = node.get("required") {
        for name in required.iter().filter_map(Value::as_str) {
            if !map.contains_key(name) {
                out.push(format!("{location}.{name} is required"));
            }
        }
    }

    for (name, schema) in properties {
        if let Some(child) = map.get(name) {
            let child_location = format!("{location}.{name}");
            check(root, schema, Some(child), &child_location, variants, out)?;
        }
    }

    if let Some(additional) = node.get("additionalProperties")
        && additional.is_object()
    {
        for (name, child) in map {
            if properties.contains_key(name) {
                continue;
            }
            if name == ADDITIONAL_PROPS_KEY {
                // Bucketed open-ended entries validate as if they sat on
                // the parent object directly.
                if let Some(entries) = child.as_object() {
                    for (entry_name, entry) in entries {
                        let entry_location = format!("{location}.{entry_name}");
                        check(root, additional, Some(entry), &entry_location, variants, out)?;
                    }
                }
                continue;
            }
            let child_location = format!("{location}.{name}");
            check(root, additional, Some(child), &child_location, variants, out)?;
        }
    }
    Ok(())
}

fn check_array(
    root: &Value,
    node: &Value,
    value: &Value,
    location: &str,
    variants: &VariantSelector,
    out: &mut Vec<String>,
) -> Result<(), SchemaError> {
    let Some(items) = value.as_array() else {
        out.push(mismatch(location, SchemaType::Array));
        return Ok(());
    };

    // minItems/maxItems are independent checks; both may fire.
    if let Some(raw) = node.get("minItems")
        && let Some(min) = raw.as_u64()
        && (items.len() as u64) < min
    {
        out.push(format!("{location} minItems {raw}"));
    }
    if let Some(raw) = node.get("maxItems")
        && let Some(max) = raw.as_u64()
        && (items.len() as u64) > max
    {
        out.push(format!("{location} maxItems {raw}"));
    }

    if let Some(item_schema) = node.get("items") {
        for (index, element) in items.iter().enumerate() {
            let element_location = format!("{location}[{index}]");
            check(root, item_schema, Some(element), &element_location, variants, out)?;
        }
    }
    Ok(())
}

fn check_number(node: &Value, value: &Value, location: &str, integral: bool, out: &mut Vec<String>) {
    let kind = if integral {
        SchemaType::Integer
    } else {
        SchemaType::Number
    };
    let Value::Number(number) = value else {
        out.push(mismatch(location, kind));
        return;
    };
    let Some(number) = number.as_f64().filter(|f| f.is_finite()) else {
        out.push(mismatch(location, kind));
        return;
    };
    if integral && number.fract() != 0.0 {
        out.push(mismatch(location, SchemaType::Integer));
    }
    // Bound literals render from the schema's own JSON so `1` stays `1`.
    if let Some(raw) = node.get("minimum")
        && let Some(minimum) = raw.as_f64()
        && number < minimum
    {
        out.push(format!("{location} minimum {raw}"));
    }
    if let Some(raw) = node.get("maximum")
        && let Some(maximum) = raw.as_f64()
        && number > maximum
    {
        out.push(format!("{location} maximum {raw}"));
    }
    check_enum(node, value, location, out);
}

fn check_string(node: &Value, value: &Value, location: &str, out: &mut Vec<String>) {
    let Some(text) = value.as_str() else {
        out.push(mismatch(location, SchemaType::String));
        return;
    };
    if let Some(pattern) = node.get("pattern").and_then(Value::as_str) {
        match Regex::new(pattern) {
            Ok(re) => {
                if !re.is_match(text) {
                    out.push(format!("{location} does not match pattern {pattern}"));
                }
            }
            // An unparseable pattern disables the check, never fails it.
            Err(err) => debug!("skipping invalid pattern {pattern:?}: {err}"),
        }
    }
    check_enum(node, value, location, out);
}

fn check_enum(node: &Value, value: &Value, location: &str, out: &mut Vec<String>) {
    if let Some(Value::Array(literals)) = node.get("enum")
        && !literals.is_empty()
        && !literals.contains(value)
    {
        out.push(format!(
            "{location} must be one of {}",
            Value::Array(literals.clone())
        ));
    }
}

fn mismatch(location: &str, kind: SchemaType) -> String {
    format!("{location} must be {}", kind.label())
}
