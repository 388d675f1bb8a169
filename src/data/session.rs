//! The editing session: loaded documents, the active schema, the value
//! tree being built against it, variant selections, and the derived
//! validation/preview state.
//!
//! All engine state lives on [`Session`] and is threaded explicitly
//! through calls; there are no process-wide singletons.

use std::time::Instant;

use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::data::oneof::VariantSelector;
use crate::data::path::{self, Token, location_label};
use crate::debounce::Debounce;
use crate::export;
use crate::loader::SchemaDocument;
use crate::schema::SchemaError;
use crate::schema::default::synthesize;
use crate::schema::validate::{ROOT_LOCATION, validate};

/// Display cap for the violation list. Cosmetic only; [`Session::violations`]
/// returns the full list.
pub const MAX_DISPLAY_VIOLATIONS: usize = 25;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested document index does not exist.
    #[error("no loaded document at index {0}")]
    UnknownDocument(usize),
    /// An operation needs an active document and none is selected.
    #[error("no active document")]
    NoActiveDocument,
    /// The schema engine gave up (unterminated reference chain).
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Preview serialization failed.
    #[error("preview serialization failed: {0}")]
    Preview(#[from] serde_json::Error),
}

/// Editing state for one set of loaded schema documents.
pub struct Session {
    documents: Vec<SchemaDocument>,
    active: Option<usize>,
    tree: Value,
    variants: VariantSelector,
    violations: Vec<String>,
    preview: String,
    debounce: Debounce,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            documents: Vec::new(),
            active: None,
            tree: Value::Object(Map::new()),
            variants: VariantSelector::new(),
            violations: Vec::new(),
            preview: String::new(),
            debounce: Debounce::default(),
        }
    }

    /// Append loaded documents to the session.
    pub fn add_documents(&mut self, documents: impl IntoIterator<Item = SchemaDocument>) {
        self.documents.extend(documents);
    }

    /// All loaded documents, in load order.
    pub fn documents(&self) -> &[SchemaDocument] {
        &self.documents
    }

    /// The currently active document, if any.
    pub fn active_document(&self) -> Option<&SchemaDocument> {
        self.active.and_then(|index| self.documents.get(index))
    }

    /// Make a loaded document the active schema.
    ///
    /// The value tree is discarded and re-seeded with the schema's default
    /// skeleton, and every variant selection is reset.
    pub fn activate(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.documents.len() {
            return Err(SessionError::UnknownDocument(index));
        }
        self.active = Some(index);
        self.variants.clear();
        self.reseed()?;
        self.recompute_now()
    }

    /// Select the document-level `oneOf` branch.
    ///
    /// Clears the whole value tree and all field-level selections, then
    /// re-seeds from the newly effective root.
    pub fn set_document_variant(&mut self, index: usize) -> Result<(), SessionError> {
        if self.active.is_none() {
            return Err(SessionError::NoActiveDocument);
        }
        self.variants.set_document(index);
        self.reseed()?;
        self.recompute_now()
    }

    /// Re-seed the value tree from the active schema's defaults.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.active.is_none() {
            return Err(SessionError::NoActiveDocument);
        }
        self.variants.clear_fields();
        self.reseed()?;
        self.recompute_now()
    }

    /// Write a value into the tree. Recompute is deferred to the debounce
    /// window; call [`Session::tick`] (or [`Session::recompute_now`]).
    pub fn set_value(&mut self, path: &[Token], value: Value) {
        path::set(&mut self.tree, path, value);
        self.debounce.touch(Instant::now());
    }

    /// Remove the value at a path (no-op when absent).
    pub fn remove_value(&mut self, path: &[Token]) {
        path::delete(&mut self.tree, path);
        self.debounce.touch(Instant::now());
    }

    /// Read the value at a path; `None` when unset.
    pub fn value_at(&self, path: &[Token]) -> Option<&Value> {
        path::get(&self.tree, path)
    }

    /// Select a field-level `oneOf` branch at a path.
    ///
    /// Switching the selection clears the value subtree at that path: the
    /// branches are not assumed to share a compatible shape.
    pub fn select_variant(&mut self, path: &[Token], index: usize) {
        let key = location_label(path);
        if self.variants.get(&key) == index {
            return;
        }
        self.variants.set(key, index);
        path::delete(&mut self.tree, path);
        self.debounce.touch(Instant::now());
    }

    /// Run the pending recompute when its debounce window has elapsed.
    ///
    /// Returns `true` when a recompute ran. The last mutation before the
    /// window closed determines the result.
    pub fn tick(&mut self, now: Instant) -> Result<bool, SessionError> {
        if !self.debounce.ready(now) {
            return Ok(false);
        }
        self.recompute_now()?;
        Ok(true)
    }

    /// Re-validate the tree and re-serialize the preview immediately.
    pub fn recompute_now(&mut self) -> Result<(), SessionError> {
        let document = self
            .active_document()
            .ok_or(SessionError::NoActiveDocument)?;
        let root = &document.schema;
        let branch = document_branch(root, self.variants.document());
        let file_name = document.file_name.clone();
        let violations = validate(root, branch, Some(&self.tree), ROOT_LOCATION, &self.variants)?;
        let preview = export::to_pretty_json(&self.tree)?;
        debug!("recomputed {file_name}: {} violation(s)", violations.len());
        self.violations = violations;
        self.preview = preview;
        self.debounce.cancel();
        Ok(())
    }

    /// The full violation list from the last recompute.
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// The violation list truncated for display.
    pub fn display_violations(&self) -> &[String] {
        let cap = self.violations.len().min(MAX_DISPLAY_VIOLATIONS);
        &self.violations[..cap]
    }

    /// Pretty-printed export of the tree from the last recompute.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Suggested output file name for the active document.
    pub fn suggested_file_name(&self) -> Option<String> {
        self.active_document()
            .map(|document| export::suggested_file_name(&document.file_name))
    }

    fn reseed(&mut self) -> Result<(), SessionError> {
        let document = self
            .active_document()
            .ok_or(SessionError::NoActiveDocument)?;
        let root = &document.schema;
        let branch = document_branch(root, self.variants.document());
        let seeded = synthesize(root, branch)?;
        self.tree = seeded;
        Ok(())
    }
}

/// The effective root schema for a document-level `oneOf` selection.
/// Falls back to the first branch on an out-of-range index, and to the
/// document itself when there is no top-level `oneOf`.
fn document_branch(schema: &Value, index: usize) -> &Value {
    match schema.get("oneOf") {
        Some(Value::Array(branches)) => branches
            .get(index)
            .or_else(|| branches.first())
            .unwrap_or(schema),
        _ => schema,
    }
}
