//! Core hover logic

use crate::context::{key_on_line, line_text, scripts_span, LineKey};
use crate::store::DocStore;
use crate::types::{ScriptHover, NO_DESCRIPTION};
use serde_json::Value;

/// A script entry under the cursor, before its description is looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    pub key: LineKey,
    pub command: String,
}

/// Find the script named on `line` (1-based) of a `package.json` document.
///
/// Returns `None` for invalid JSON, lines without a key, and keys that are
/// not entries of the top-level `scripts` object.
pub fn script_at_line(document_text: &str, line: u32) -> Option<ScriptEntry> {
    let manifest: Value = serde_json::from_str(document_text).ok()?;
    let scripts = manifest.get("scripts")?.as_object()?;

    let key = key_on_line(line_text(document_text, line)?, line)?;
    let command = scripts.get(&key.name)?;

    let (start, end) = scripts_span(document_text)?;
    if line < start || line > end {
        return None;
    }

    let command = match command {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    Some(ScriptEntry { key, command })
}

/// Resolve a hover without a store, describing scripts with `describe`.
pub fn resolve_hover_with<F>(document_text: &str, line: u32, describe: F) -> Option<ScriptHover>
where
    F: FnOnce(&str) -> Option<String>,
{
    let entry = script_at_line(document_text, line)?;
    let description = describe(&entry.key.name).unwrap_or_else(|| NO_DESCRIPTION.to_string());

    Some(ScriptHover {
        script: entry.key.name,
        command: entry.command,
        description,
        range: Some(entry.key.range),
    })
}

/// Hover information provider backed by a [`DocStore`].
pub struct HoverProvider<'a> {
    store: &'a mut DocStore,
}

impl<'a> HoverProvider<'a> {
    pub fn new(store: &'a mut DocStore) -> Self {
        Self { store }
    }

    /// Hover for `line` (1-based) of the manifest at `package_path`
    /// (workspace-relative, e.g. `packages/web/package.json`).
    pub fn hover(
        &mut self,
        package_path: &str,
        document_text: &str,
        line: u32,
    ) -> Option<ScriptHover> {
        let store = &mut *self.store;
        resolve_hover_with(document_text, line, |script| {
            store.resolve(package_path).remove(script)
        })
    }
}
