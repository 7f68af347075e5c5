//! Load, migrate and persist the documentation file.
//!
//! The file lives at a configurable path (default `.vscode/script-docs.json`)
//! and holds either the legacy flat shape or the nested per-manifest shape.
//! Legacy files are migrated in place the first time they are loaded.

use crate::schema::{classify, DocsShape};
use crate::types::{DocsFile, NestedDocs, ScriptDocs, ROOT_MANIFEST};
use crate::workspace::{find_package_manifests, relative_manifest_path};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the documentation file, relative to the workspace root.
pub const DEFAULT_DOCS_PATH: &str = ".vscode/script-docs.json";

/// Errors that can occur when loading or writing the documentation file.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to read the file (other than it not existing).
    #[error("Failed to read {file}: {source}")]
    Read { file: PathBuf, source: io::Error },

    /// The file is not valid JSON.
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },

    /// Valid JSON but neither the legacy nor the nested shape.
    #[error("Invalid documentation file {file}: {reason}")]
    Invalid { file: PathBuf, reason: String },

    /// Failed to write the file or create its directory.
    #[error("Failed to write {file}: {source}")]
    Write { file: PathBuf, source: io::Error },

    /// Failed to serialize docs.
    #[error("Failed to serialize documentation: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of loading the documentation file.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// No documentation file exists.
    Absent,

    /// The file was already nested.
    Nested(NestedDocs),

    /// The file was legacy and has been rewritten as nested.
    Migrated {
        docs: NestedDocs,
        /// Manifest paths added as empty entries during migration
        added: Vec<String>,
    },
}

impl LoadOutcome {
    /// Loaded docs, if the file exists.
    pub fn docs(&self) -> Option<&NestedDocs> {
        match self {
            LoadOutcome::Absent => None,
            LoadOutcome::Nested(docs) | LoadOutcome::Migrated { docs, .. } => Some(docs),
        }
    }

    pub fn into_docs(self) -> Option<NestedDocs> {
        match self {
            LoadOutcome::Absent => None,
            LoadOutcome::Nested(docs) | LoadOutcome::Migrated { docs, .. } => Some(docs),
        }
    }
}

/// Resolve a configured docs path against the workspace root.
pub fn resolve_docs_path(workspace_root: &Path, configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        configured.to_path_buf()
    } else {
        workspace_root.join(configured)
    }
}

/// Read and parse the documentation file. `Ok(None)` when it does not exist.
pub fn read_docs_value(path: &Path) -> Result<Option<Value>, LoadError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LoadError::Read {
                file: path.to_path_buf(),
                source: e,
            })
        }
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| LoadError::Parse {
            file: path.to_path_buf(),
            source: e,
        })
}

/// Load the documentation file, migrating the legacy shape in place.
pub fn load_docs(
    workspace_root: &Path,
    docs_path: &Path,
    excluded_dirs: &[String],
) -> Result<LoadOutcome, LoadError> {
    let Some(value) = read_docs_value(docs_path)? else {
        return Ok(LoadOutcome::Absent);
    };

    match classify(&value) {
        DocsShape::Nested(docs) => Ok(LoadOutcome::Nested(docs)),
        DocsShape::Legacy(legacy) => {
            let (docs, added) = migrate_legacy(workspace_root, legacy, excluded_dirs);
            write_docs(docs_path, &docs)?;
            tracing::info!(
                "Migrated {} to nested format ({} additional manifests)",
                docs_path.display(),
                added.len()
            );
            Ok(LoadOutcome::Migrated { docs, added })
        }
        DocsShape::Invalid(reason) => Err(LoadError::Invalid {
            file: docs_path.to_path_buf(),
            reason,
        }),
    }
}

/// Wrap legacy docs under the root manifest and add an empty entry for every
/// other manifest in the workspace. Returns the added paths.
pub fn migrate_legacy(
    workspace_root: &Path,
    legacy: ScriptDocs,
    excluded_dirs: &[String],
) -> (NestedDocs, Vec<String>) {
    let mut docs = NestedDocs::new();
    docs.insert(ROOT_MANIFEST.to_string(), legacy);

    let mut added = Vec::new();
    for manifest in find_package_manifests(workspace_root, excluded_dirs) {
        let Some(rel) = relative_manifest_path(workspace_root, &manifest) else {
            continue;
        };
        if !docs.contains_key(&rel) {
            docs.insert(rel.clone(), ScriptDocs::new());
            added.push(rel);
        }
    }

    (docs, added)
}

/// Write nested docs in the tagged format, creating parent directories.
pub fn write_docs(path: &Path, docs: &NestedDocs) -> Result<(), LoadError> {
    let json = DocsFile::new(docs.clone()).to_json()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| LoadError::Write {
            file: path.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(path, json).map_err(|e| LoadError::Write {
        file: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SCHEMA_VERSION_KEY;
    use crate::workspace::default_excluded_dirs;
    use tempfile::TempDir;

    fn create_workspace() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"scripts": {"dev": "vite", "build": "vite build"}}"#,
        )
        .unwrap();

        let web = temp.path().join("packages/web");
        fs::create_dir_all(&web).unwrap();
        fs::write(web.join("package.json"), r#"{"scripts": {"start": "node ."}}"#).unwrap();

        let deps = temp.path().join("node_modules/lib");
        fs::create_dir_all(&deps).unwrap();
        fs::write(deps.join("package.json"), "{}").unwrap();

        temp
    }

    fn docs_path(temp: &TempDir) -> PathBuf {
        resolve_docs_path(temp.path(), DEFAULT_DOCS_PATH)
    }

    fn write_raw(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_absent_file() {
        let temp = create_workspace();
        let outcome = load_docs(temp.path(), &docs_path(&temp), &default_excluded_dirs()).unwrap();
        assert_eq!(outcome, LoadOutcome::Absent);
        assert!(outcome.docs().is_none());
    }

    #[test]
    fn test_migrates_legacy_file() {
        let temp = create_workspace();
        let path = docs_path(&temp);
        write_raw(&path, r#"{"dev":"x","build":"y"}"#);

        let outcome = load_docs(temp.path(), &path, &default_excluded_dirs()).unwrap();
        match &outcome {
            LoadOutcome::Migrated { docs, added } => {
                assert_eq!(docs["package.json"]["dev"], "x");
                assert_eq!(docs["package.json"]["build"], "y");
                assert!(docs["packages/web/package.json"].is_empty());
                assert_eq!(added, &vec!["packages/web/package.json".to_string()]);
                assert!(!docs.contains_key("node_modules/lib/package.json"));
            }
            other => panic!("expected migration, got {:?}", other),
        }

        // The file on disk is now nested and tagged
        let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[SCHEMA_VERSION_KEY], 2);
        assert_eq!(on_disk["package.json"]["dev"], "x");
        assert_eq!(on_disk["packages/web/package.json"], serde_json::json!({}));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let temp = create_workspace();
        let path = docs_path(&temp);
        write_raw(&path, r#"{"dev":"x","build":"y"}"#);

        let first = load_docs(temp.path(), &path, &default_excluded_dirs()).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();

        let second = load_docs(temp.path(), &path, &default_excluded_dirs()).unwrap();
        let after_second = fs::read_to_string(&path).unwrap();

        assert!(matches!(second, LoadOutcome::Nested(_)));
        assert_eq!(first.docs(), second.docs());
        assert_eq!(after_first, after_second);
    }

    #[test]
    fn test_untagged_nested_is_not_rewritten() {
        let temp = create_workspace();
        let path = docs_path(&temp);
        let content = r#"{"package.json": {"dev": "x"}}"#;
        write_raw(&path, content);

        let outcome = load_docs(temp.path(), &path, &default_excluded_dirs()).unwrap();
        assert!(matches!(outcome, LoadOutcome::Nested(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_invalid_json() {
        let temp = create_workspace();
        let path = docs_path(&temp);
        write_raw(&path, "not valid json");

        let result = load_docs(temp.path(), &path, &default_excluded_dirs());
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_invalid_shape() {
        let temp = create_workspace();
        let path = docs_path(&temp);
        write_raw(&path, r#"["dev"]"#);

        let result = load_docs(temp.path(), &path, &default_excluded_dirs());
        assert!(matches!(result, Err(LoadError::Invalid { .. })));
    }

    #[test]
    fn test_resolve_docs_path() {
        let root = Path::new("/work");
        assert_eq!(
            resolve_docs_path(root, DEFAULT_DOCS_PATH),
            PathBuf::from("/work/.vscode/script-docs.json")
        );
        assert_eq!(
            resolve_docs_path(root, "/etc/docs.json"),
            PathBuf::from("/etc/docs.json")
        );
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("deep/dir/docs.json");

        write_docs(&path, &NestedDocs::new()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_error_display() {
        let err = LoadError::Invalid {
            file: PathBuf::from("/test/docs.json"),
            reason: "bad".to_string(),
        };
        assert!(err.to_string().contains("/test/docs.json"));
        assert!(err.to_string().contains("bad"));
    }
}
