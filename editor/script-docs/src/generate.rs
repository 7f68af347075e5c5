//! Create or update the documentation file from the workspace manifests.

use crate::loader::{load_docs, write_docs, LoadError, LoadOutcome};
use crate::types::{NestedDocs, ScriptDocs};
use crate::workspace::{default_excluded_dirs, find_package_manifests, relative_manifest_path};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The workspace root does not exist or is not a directory.
    #[error("Workspace folder not found: {0}")]
    NoWorkspace(PathBuf),

    /// No manifest was found under the workspace root.
    #[error("No package.json found in {0}")]
    NoPackageJson(PathBuf),

    /// The existing docs file is unreadable; merging would lose it.
    #[error("Existing documentation could not be loaded: {0}")]
    ExistingDocs(#[source] LoadError),

    /// Writing the merged docs failed.
    #[error(transparent)]
    Write(LoadError),
}

/// Options for [`generate`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directories skipped while scanning for manifests
    pub excluded_dirs: Vec<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

/// A manifest that could not be read or parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestFailure {
    pub path: String,
    pub reason: String,
}

/// Summary of a generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateReport {
    /// File that was written
    pub output: PathBuf,
    /// Manifests found in the workspace
    pub packages: usize,
    /// Scripts present in the written docs for scanned manifests
    pub scripts: usize,
    /// Descriptions created from the template
    pub synthesized: usize,
    /// Existing descriptions kept
    pub preserved: usize,
    /// Whether a legacy docs file was migrated first
    pub migrated: bool,
    /// Manifests skipped because of read or parse errors
    pub failures: Vec<ManifestFailure>,
}

/// Templated description for an undocumented script.
pub fn synthesize_description(script: &str, relative_path: &str, command: &str) -> String {
    format!(
        "Description for '{}' script in {}: {}",
        script, relative_path, command
    )
}

/// Build the docs entry for one manifest's `scripts`, keeping existing
/// descriptions. Returns the entry and the number of synthesized entries.
pub fn merge_entry(
    existing: Option<&ScriptDocs>,
    scripts: &Map<String, Value>,
    relative_path: &str,
) -> (ScriptDocs, usize) {
    let mut entry = ScriptDocs::new();
    let mut synthesized = 0;

    for (name, command) in scripts {
        let description = match existing.and_then(|docs| docs.get(name)) {
            Some(desc) => desc.clone(),
            None => {
                synthesized += 1;
                synthesize_description(name, relative_path, &command_text(command))
            }
        };
        entry.insert(name.clone(), description);
    }

    (entry, synthesized)
}

fn command_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read a manifest's `scripts`. `Ok(None)` when the manifest has none.
fn read_manifest_scripts(path: &Path) -> Result<Option<Map<String, Value>>, String> {
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read: {}", e))?;
    let manifest: Value =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse: {}", e))?;

    match manifest.get("scripts") {
        None => Ok(None),
        Some(Value::Object(scripts)) => Ok(Some(scripts.clone())),
        Some(_) => Err("\"scripts\" is not an object".to_string()),
    }
}

/// Scan the workspace and write merged docs to `docs_path`.
pub fn generate(
    workspace_root: &Path,
    docs_path: &Path,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    if !workspace_root.is_dir() {
        return Err(GenerateError::NoWorkspace(workspace_root.to_path_buf()));
    }

    let manifests = find_package_manifests(workspace_root, &options.excluded_dirs);
    if manifests.is_empty() {
        return Err(GenerateError::NoPackageJson(workspace_root.to_path_buf()));
    }

    let outcome = load_docs(workspace_root, docs_path, &options.excluded_dirs)
        .map_err(GenerateError::ExistingDocs)?;
    let migrated = matches!(outcome, LoadOutcome::Migrated { .. });
    let mut docs: NestedDocs = outcome.into_docs().unwrap_or_default();

    let mut report = GenerateReport {
        output: docs_path.to_path_buf(),
        packages: manifests.len(),
        migrated,
        ..Default::default()
    };

    for manifest in &manifests {
        let Some(rel) = relative_manifest_path(workspace_root, manifest) else {
            continue;
        };

        match read_manifest_scripts(manifest) {
            Ok(Some(scripts)) => {
                let (entry, synthesized) = merge_entry(docs.get(&rel), &scripts, &rel);
                report.synthesized += synthesized;
                report.preserved += entry.len() - synthesized;
                docs.insert(rel, entry);
            }
            Ok(None) => {
                docs.entry(rel).or_default();
            }
            Err(reason) => {
                tracing::warn!("Skipping {}: {}", rel, reason);
                report.failures.push(ManifestFailure { path: rel, reason });
            }
        }
    }

    report.scripts = manifests
        .iter()
        .filter_map(|m| relative_manifest_path(workspace_root, m))
        .filter_map(|rel| docs.get(&rel).map(|entry| entry.len()))
        .sum();

    write_docs(docs_path, &docs).map_err(GenerateError::Write)?;
    tracing::info!(
        "Wrote documentation for {} packages to {}",
        report.packages,
        docs_path.display()
    );

    Ok(report)
}
