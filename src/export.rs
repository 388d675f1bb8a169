//! Export of the value tree and output file naming.

use serde_json::Value;

use crate::data::path::serialize;

const SCHEMA_SUFFIX: &str = ".schema.json";
const FALLBACK_OUTPUT_NAME: &str = "output.json";

/// Pretty-print the exported form of a value tree (2-space indentation).
///
/// The tree is passed through [`serialize`] first, so bucketed
/// additional-properties entries land on their parent objects.
pub fn to_pretty_json(tree: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&serialize(tree))
}

/// Output name derived from a schema file name.
///
/// `app.schema.json` becomes `app.json`; a name without the suffix falls
/// back to `output.json`.
pub fn suggested_file_name(schema_file_name: &str) -> String {
    match schema_file_name.strip_suffix(SCHEMA_SUFFIX) {
        Some(stem) => format!("{stem}.json"),
        None => FALLBACK_OUTPUT_NAME.to_string(),
    }
}

/// Ensure a user-chosen download name carries a `.json` extension.
pub fn download_file_name(chosen: &str) -> String {
    if chosen.ends_with(".json") {
        chosen.to_string()
    } else {
        format!("{chosen}.json")
    }
}
