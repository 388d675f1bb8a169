//! `oneOf` variant selection state.

use std::collections::HashMap;

/// Tracks which `oneOf` branch is active, per schema location.
///
/// The document-level selection (which branch of a top-level `oneOf` is
/// the effective root schema) has its own slot; field-level selections are
/// keyed by the `$`-rooted location label of the value-tree path. Selection
/// state is never part of the exported value, and switching a selection
/// must be paired with clearing the value stored at that path since two
/// branches are not assumed to share a compatible shape (the session does
/// this pairing).
#[derive(Debug, Default, Clone)]
pub struct VariantSelector {
    document: usize,
    fields: HashMap<String, usize>,
}

impl VariantSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected branch for a field location, 0 when unset.
    pub fn get(&self, location: &str) -> usize {
        self.fields.get(location).copied().unwrap_or(0)
    }

    /// Select a branch for a field location.
    pub fn set(&mut self, location: impl Into<String>, index: usize) {
        self.fields.insert(location.into(), index);
    }

    /// Selected branch of the document-level `oneOf`.
    pub fn document(&self) -> usize {
        self.document
    }

    /// Select the document-level branch. Field selections are dropped,
    /// since they were made against the previous effective root.
    pub fn set_document(&mut self, index: usize) {
        self.document = index;
        self.fields.clear();
    }

    /// Drop every selection, document and field level.
    pub fn clear(&mut self) {
        self.document = 0;
        self.fields.clear();
    }

    /// Drop field selections only.
    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }
}
