//! Core types for script documentation.
//!
//! This module contains the data structures used throughout script-docs:
//! - [`ScriptDocs`] - Flat script name to description mapping
//! - [`NestedDocs`] - Per-manifest documentation keyed by relative path
//! - [`ScriptHover`] - The hover result for a script entry
//! - [`Range`] - Source location for highlighting

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Script name to description, for a single `package.json`.
pub type ScriptDocs = BTreeMap<String, String>;

/// Relative manifest path (e.g. `packages/web/package.json`) to its docs.
pub type NestedDocs = BTreeMap<String, ScriptDocs>;

/// Relative path of the root manifest; also the key legacy docs migrate under.
pub const ROOT_MANIFEST: &str = "package.json";

/// Shown when neither the docs file nor the defaults describe a script.
pub const NO_DESCRIPTION: &str = "No description available.";

/// Current version of the tagged documentation file format.
pub const SCHEMA_VERSION: u64 = 2;

/// Key carrying [`SCHEMA_VERSION`] in a documentation file.
pub const SCHEMA_VERSION_KEY: &str = "$schemaVersion";

/// Source range for highlighting.
///
/// All positions are 1-based (line 1, column 1 is the start). Columns count
/// characters, the end column is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// Hover result for an npm script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptHover {
    /// Script name (key under `scripts`)
    pub script: String,

    /// Literal command string from the manifest
    pub command: String,

    /// Description from the docs file, the defaults, or [`NO_DESCRIPTION`]
    pub description: String,

    /// Range of the quoted key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl ScriptHover {
    /// Shell hint for running the script.
    pub fn usage(&self) -> String {
        format!("npm run {}", self.script)
    }

    /// Render markdown for a hover tooltip.
    pub fn to_markdown(&self) -> String {
        let mut content = String::new();

        content.push_str(&format!("### npm script: `{}`\n\n", self.script));
        content.push_str(&self.description);
        content.push_str("\n\n");
        content.push_str(&format!("**Command:** `{}`\n\n", self.command));
        content.push_str(&format!("**Usage:** `{}`", self.usage()));

        content
    }
}

/// Tagged on-disk form of nested docs.
///
/// Serializes the version marker ahead of the package entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsFile {
    #[serde(rename = "$schemaVersion")]
    pub schema_version: u64,

    #[serde(flatten)]
    pub packages: NestedDocs,
}

impl DocsFile {
    pub fn new(packages: NestedDocs) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            packages,
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }
}
