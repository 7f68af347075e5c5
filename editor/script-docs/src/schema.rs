//! Shape detection for documentation files.
//!
//! Tagged files carry `"$schemaVersion"`. Untagged files written before the
//! tag existed are classified by key heuristics: a flat object whose keys
//! look like script names is the legacy single-package shape, anything
//! keyed by manifest paths is nested.

use crate::types::{NestedDocs, ScriptDocs, ROOT_MANIFEST, SCHEMA_VERSION, SCHEMA_VERSION_KEY};
use serde_json::{Map, Value};

/// Shape of a parsed documentation file.
#[derive(Debug, Clone, PartialEq)]
pub enum DocsShape {
    /// Flat `{ "<script>": "<description>" }`
    Legacy(ScriptDocs),

    /// `{ "<relative manifest path>": { "<script>": "<description>" } }`
    Nested(NestedDocs),

    /// Neither shape; the reason is user-facing.
    Invalid(String),
}

impl DocsShape {
    pub fn name(&self) -> &'static str {
        match self {
            DocsShape::Legacy(_) => "legacy",
            DocsShape::Nested(_) => "nested",
            DocsShape::Invalid(_) => "invalid",
        }
    }
}

/// Classify a parsed documentation file.
pub fn classify(value: &Value) -> DocsShape {
    let Some(object) = value.as_object() else {
        return DocsShape::Invalid("documentation file must be a JSON object".to_string());
    };

    if let Some(version) = object.get(SCHEMA_VERSION_KEY) {
        if version.as_u64() != Some(SCHEMA_VERSION) {
            return DocsShape::Invalid(format!(
                "unsupported {} {} (expected {})",
                SCHEMA_VERSION_KEY, version, SCHEMA_VERSION
            ));
        }
        return nested_from(object);
    }

    if looks_legacy(object) {
        return legacy_from(object);
    }

    nested_from(object)
}

/// Heuristic for untagged files: at least one key, and no key that looks
/// like a manifest path.
pub fn looks_legacy(object: &Map<String, Value>) -> bool {
    !object.is_empty()
        && object
            .keys()
            .all(|key| !key.contains('/') && !key.contains('\\') && key != ROOT_MANIFEST)
}

fn legacy_from(object: &Map<String, Value>) -> DocsShape {
    match script_docs_from(object) {
        Ok(docs) => DocsShape::Legacy(docs),
        Err(key) => DocsShape::Invalid(format!("description for '{}' is not a string", key)),
    }
}

fn nested_from(object: &Map<String, Value>) -> DocsShape {
    let mut nested = NestedDocs::new();

    for (path, entry) in object {
        if path == SCHEMA_VERSION_KEY {
            continue;
        }

        let Some(entry) = entry.as_object() else {
            return DocsShape::Invalid(format!("entry for '{}' is not an object", path));
        };

        match script_docs_from(entry) {
            Ok(docs) => {
                nested.insert(path.clone(), docs);
            }
            Err(key) => {
                return DocsShape::Invalid(format!(
                    "description for '{}' in '{}' is not a string",
                    key, path
                ));
            }
        }
    }

    DocsShape::Nested(nested)
}

/// Collect string values; on failure returns the offending key.
fn script_docs_from(object: &Map<String, Value>) -> Result<ScriptDocs, String> {
    object
        .iter()
        .map(|(key, value)| match value {
            Value::String(desc) => Ok((key.clone(), desc.clone())),
            _ => Err(key.clone()),
        })
        .collect()
}
