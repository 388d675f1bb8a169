//! The schema interpretation engine.
//!
//! Everything that understands JSON Schema semantics lives here:
//!
//! - [`resolver`] - Internal `$ref` resolution and `allOf` merging
//! - [`types`] - Value-kind inference over schema nodes
//! - [`default`] - Minimal default-value synthesis
//! - [`validate`] - Recursive validation of a value tree
//!
//! Schema nodes are plain [`serde_json::Value`]s; a node is interpreted
//! through [`resolver::effective`] before inference or validation, and
//! resolution is re-done on each access (it is cheap and side-effect-free,
//! so nothing is memoized).

use thiserror::Error;

/// Individual configuration value synthesis and skeletons.
pub mod default;

/// Internal reference resolution and `allOf` flattening.
pub mod resolver;

/// Value-kind inference.
pub mod types;

/// Recursive validation of a value tree against a schema node.
pub mod validate;

/// Errors produced by the schema engine.
///
/// Most malformed-schema situations degrade silently (dangling `$ref`,
/// invalid `pattern`); the only hard error is a reference chain that never
/// terminates.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A `$ref` chain exceeded the resolution step bound, which almost
    /// certainly means the schema references itself.
    #[error("reference chain through {pointer:?} exceeded {limit} resolution steps")]
    RefDepthExceeded {
        /// The pointer that was about to be resolved when the bound hit.
        pointer: String,
        /// The step bound that was exceeded.
        limit: usize,
    },
}
