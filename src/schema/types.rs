//! Value-kind inference over effective schema nodes.

use serde_json::Value;

/// The concrete value kinds the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    /// A JSON object with named and/or open-ended properties.
    Object,
    /// A JSON array.
    Array,
    /// A boolean.
    Boolean,
    /// A floating-point number.
    Number,
    /// A number constrained to integral values.
    Integer,
    /// A string. Also the fallback for nodes nothing else matches.
    String,
}

impl SchemaType {
    /// Map a `type` keyword to a kind, `None` for unrecognized keywords.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "integer" => Some(Self::Integer),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Human-readable name used in violation messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Object => "an object",
            Self::Array => "an array",
            Self::Boolean => "a boolean",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::String => "a string",
        }
    }
}

/// Infer the value kind of an effective schema node.
///
/// A node may satisfy several heuristics at once, so the first match wins:
///
/// 1. an explicit `type` (first element when it is a list);
/// 2. `properties` or `additionalProperties` present;
/// 3. `items` present;
/// 4. `enum` present (numeric first literal means number, else string);
/// 5. string as the fallback.
///
/// Pure over the node's keys; an unrecognized `type` keyword falls through
/// to the remaining heuristics so the function stays total.
pub fn infer_type(node: &Value) -> SchemaType {
    if let Some(keyword) = explicit_type(node)
        && let Some(kind) = SchemaType::from_keyword(keyword)
    {
        return kind;
    }
    if node.get("properties").is_some() || node.get("additionalProperties").is_some() {
        return SchemaType::Object;
    }
    if node.get("items").is_some() {
        return SchemaType::Array;
    }
    if let Some(Value::Array(literals)) = node.get("enum")
        && let Some(first) = literals.first()
    {
        return if first.is_number() {
            SchemaType::Number
        } else {
            SchemaType::String
        };
    }
    SchemaType::String
}

fn explicit_type(node: &Value) -> Option<&str> {
    match node.get("type")? {
        Value::String(keyword) => Some(keyword.as_str()),
        Value::Array(list) => list.first().and_then(Value::as_str),
        _ => None,
    }
}
