//! Schema document loading.
//!
//! Each file is read fully and parsed independently; one unreadable or
//! malformed file is reported and skipped without affecting the others.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde_json::Value;
use thiserror::Error;

/// A successfully loaded schema document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// File name the document was loaded from, without directories.
    pub file_name: String,
    /// Display title: the schema's `title` when present, else the file name.
    pub title: String,
    /// The parsed schema root.
    pub schema: Value,
}

impl SchemaDocument {
    /// Build a document from an already-parsed schema value.
    pub fn from_value(file_name: impl Into<String>, schema: Value) -> Self {
        let file_name = file_name.into();
        let title = schema
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or(&file_name)
            .to_string();
        Self {
            file_name,
            title,
            schema,
        }
    }
}

/// Why one file failed to load. Other files are unaffected.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("{file_name}: {source}")]
    Read {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON.
    #[error("{file_name}: {source}")]
    Parse {
        file_name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Name of the file this failure belongs to.
    pub fn file_name(&self) -> &str {
        match self {
            Self::Read { file_name, .. } | Self::Parse { file_name, .. } => file_name,
        }
    }
}

/// Result of loading a batch of schema files.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    /// Documents that loaded and parsed.
    pub documents: Vec<SchemaDocument>,
    /// Per-file failures, in input order.
    pub failures: Vec<LoadError>,
}

/// Load zero or more schema files.
///
/// Never fails as a whole: every file is attempted and failures are
/// collected per file.
pub async fn load_documents(paths: &[PathBuf]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for path in paths {
        match load_one(path).await {
            Ok(document) => {
                info!("loaded schema {}", document.file_name);
                outcome.documents.push(document);
            }
            Err(err) => {
                warn!("skipping schema file: {err}");
                outcome.failures.push(err);
            }
        }
    }
    outcome
}

async fn load_one(path: &Path) -> Result<SchemaDocument, LoadError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Read {
            file_name: file_name.clone(),
            source,
        })?;

    let schema: Value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        file_name: file_name.clone(),
        source,
    })?;

    Ok(SchemaDocument::from_value(file_name, schema))
}
