//! # jsonforge
//!
//! A JSON Schema driven value builder, validator, and JSON exporter.
//!
//! jsonforge loads JSON Schema documents, seeds a minimal value conforming
//! to the chosen schema, lets callers edit that value at addressed paths,
//! and keeps an ordered list of validation violations plus a pretty-printed
//! JSON preview up to date as the value changes.
//!
//! ## Features
//!
//! - Internal `$ref` resolution with override-preserving overlays, and
//!   `allOf` flattening
//! - Deterministic value-kind inference for arbitrary schema nodes
//! - Minimal default-value synthesis (required fields only, so exports stay
//!   compact)
//! - Recursive validation producing `"$.path message"` violation strings
//! - A sparse, path-addressed value tree that stays JSON-serializable at
//!   every step
//! - Per-location `oneOf` branch selection, document- and field-level
//! - Debounced recomputation: a burst of edits costs one revalidation
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonforge::{Session, loader::SchemaDocument};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "properties": { "name": { "type": "string" } },
//!     "required": ["name"]
//! });
//!
//! let mut session = Session::new();
//! session.add_documents([SchemaDocument::from_value("app.schema.json", schema)]);
//! session.activate(0).unwrap();
//!
//! // The seeded skeleton is valid for its own schema.
//! assert!(session.violations().is_empty());
//! assert_eq!(session.preview(), "{\n  \"name\": \"\"\n}");
//! ```
//!
//! ## Modules
//!
//! - [`schema`] - The schema engine: resolution, inference, synthesis,
//!   validation
//! - [`data`] - Session state, value-tree paths, variant selection
//! - [`loader`] - Async per-file schema document loading
//! - [`export`] - Value-tree export and output file naming
//! - [`debounce`] - Recompute coalescing policy

/// Session state and value-tree primitives.
pub mod data;

/// Recompute coalescing policy.
pub mod debounce;

/// Value-tree export and output file naming.
pub mod export;

/// Schema document loading.
pub mod loader;

/// The schema interpretation engine.
pub mod schema;

pub use data::Session;
pub use serde_json::Value;
