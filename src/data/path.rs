//! Path addressing over a sparse, JSON-serializable value tree.
//!
//! A path is an ordered sequence of [`Token`]s (property names and array
//! indices). The tree stays sparse: intermediates are only materialized by
//! [`set`], reads of unset locations return `None`, never an error, and
//! absence is distinct from an explicitly stored `null`.

use std::fmt;

use serde_json::{Map, Value};

/// Reserved object key where open-ended (`additionalProperties`) entries
/// are stashed while an object also carries named properties. Dropped on
/// export and merged into the parent, last write wins on collisions.
pub const ADDITIONAL_PROPS_KEY: &str = "__additional__";

/// One step in a value-tree path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A property name inside an object.
    Key(String),
    /// An element index inside an array.
    Index(usize),
}

impl Token {
    /// Property-name token.
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// Array-index token.
    pub fn index(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => write!(f, ".{name}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Render a path as a `$`-rooted location label (`$.a.b[0]`).
///
/// The same labels key variant selections and prefix violation messages,
/// so the two always agree on what a location is called.
pub fn location_label(path: &[Token]) -> String {
    let mut label = String::from("$");
    for token in path {
        match token {
            Token::Key(name) => {
                label.push('.');
                label.push_str(name);
            }
            Token::Index(index) => {
                label.push('[');
                label.push_str(&index.to_string());
                label.push(']');
            }
        }
    }
    label
}

/// Read the value at `path`.
///
/// Returns `None` the moment any container along the way is absent.
pub fn get<'a>(tree: &'a Value, path: &[Token]) -> Option<&'a Value> {
    let mut current = tree;
    for token in path {
        current = match (current, token) {
            (Value::Object(map), Token::Key(name)) => map.get(name)?,
            (Value::Object(map), Token::Index(index)) => map.get(&index.to_string())?,
            (Value::Array(items), Token::Index(index)) => items.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, materializing missing intermediates.
///
/// Missing intermediates become plain objects, never arrays; an index
/// token under one lands on the stringified index. Assigning past the end
/// of an existing array pads with `null`. An empty path replaces the whole
/// tree.
pub fn set(tree: &mut Value, path: &[Token], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return;
    };
    let mut current = tree;
    for token in parents {
        current = descend_or_create(current, token);
    }
    assign(current, last, value);
}

/// Remove the value at `path`.
///
/// No-op when the path is empty or its parent container is absent.
pub fn delete(tree: &mut Value, path: &[Token]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let Some(parent) = get_mut(tree, parents) else {
        return;
    };
    match (parent, last) {
        (Value::Object(map), Token::Key(name)) => {
            map.shift_remove(name);
        }
        (Value::Object(map), Token::Index(index)) => {
            map.shift_remove(&index.to_string());
        }
        (Value::Array(items), Token::Index(index)) => {
            if *index < items.len() {
                items.remove(*index);
            }
        }
        _ => {}
    }
}

/// Export a value tree as plain JSON.
///
/// Bucketed additional-properties entries are merged into their parent
/// object in place of the bucket key; a colliding entry overwrites the
/// named property (last write wins). Idempotent on already-exported input.
pub fn serialize(tree: &Value) -> Value {
    match tree {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                if key == ADDITIONAL_PROPS_KEY {
                    if let Value::Object(entries) = value {
                        for (name, entry) in entries {
                            out.insert(name.clone(), serialize(entry));
                        }
                    }
                    continue;
                }
                out.insert(key.clone(), serialize(value));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(serialize).collect()),
        scalar => scalar.clone(),
    }
}

fn get_mut<'a>(tree: &'a mut Value, path: &[Token]) -> Option<&'a mut Value> {
    let mut current = tree;
    for token in path {
        current = match (current, token) {
            (Value::Object(map), Token::Key(name)) => map.get_mut(name)?,
            (Value::Object(map), Token::Index(index)) => map.get_mut(&index.to_string())?,
            (Value::Array(items), Token::Index(index)) => items.get_mut(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

fn descend_or_create<'a>(container: &'a mut Value, token: &Token) -> &'a mut Value {
    match token {
        Token::Index(index)
            if matches!(container, Value::Array(items) if *index < items.len()) =>
        {
            match container {
                Value::Array(items) => &mut items[*index],
                _ => unreachable!("guard established an in-bounds array"),
            }
        }
        _ => {
            let key = match token {
                Token::Key(name) => name.clone(),
                Token::Index(index) => index.to_string(),
            };
            let slot = ensure_object(container).entry(key).or_insert(Value::Null);
            // A scalar in intermediate position gives way to an object.
            if !slot.is_object() && !slot.is_array() {
                *slot = Value::Object(Map::new());
            }
            slot
        }
    }
}

fn assign(container: &mut Value, token: &Token, value: Value) {
    match token {
        Token::Key(name) => {
            ensure_object(container).insert(name.clone(), value);
        }
        Token::Index(index) => {
            if let Value::Array(items) = container {
                if *index < items.len() {
                    items[*index] = value;
                } else {
                    while items.len() < *index {
                        items.push(Value::Null);
                    }
                    items.push(value);
                }
            } else {
                ensure_object(container).insert(index.to_string(), value);
            }
        }
    }
}

fn ensure_object(container: &mut Value) -> &mut Map<String, Value> {
    if !container.is_object() {
        *container = Value::Object(Map::new());
    }
    match container {
        Value::Object(map) => map,
        _ => unreachable!("container was just replaced with an object"),
    }
}
