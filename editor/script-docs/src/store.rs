//! Cached documentation lookups.
//!
//! [`DocStore`] owns the loaded documentation for one workspace. It loads
//! lazily on the first lookup and stays loaded until [`DocStore::invalidate`]
//! is called (reload command, docs file change, settings change). A failed
//! load leaves the cache empty so the next lookup retries.

use crate::defaults::default_docs;
use crate::loader::{load_docs, resolve_docs_path, LoadError, LoadOutcome, DEFAULT_DOCS_PATH};
use crate::types::{NestedDocs, ScriptDocs, NO_DESCRIPTION};
use crate::workspace::default_excluded_dirs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Cache {
    Empty,
    Absent,
    Loaded(NestedDocs),
}

/// Documentation store for a workspace.
#[derive(Debug)]
pub struct DocStore {
    workspace_root: PathBuf,
    docs_path: PathBuf,
    excluded_dirs: Vec<String>,
    cache: Cache,
}

impl DocStore {
    /// Create a store for `workspace_root` using the docs file at
    /// `configured_path` (relative paths resolve against the root).
    pub fn new(workspace_root: impl Into<PathBuf>, configured_path: &str) -> Self {
        let workspace_root = workspace_root.into();
        let docs_path = resolve_docs_path(&workspace_root, configured_path);

        Self {
            workspace_root,
            docs_path,
            excluded_dirs: default_excluded_dirs(),
            cache: Cache::Empty,
        }
    }

    /// Store using the default docs location.
    pub fn with_default_path(workspace_root: impl Into<PathBuf>) -> Self {
        Self::new(workspace_root, DEFAULT_DOCS_PATH)
    }

    /// Replace the directories skipped during the migration scan.
    pub fn with_excluded_dirs(mut self, excluded_dirs: Vec<String>) -> Self {
        self.excluded_dirs = excluded_dirs;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn docs_path(&self) -> &Path {
        &self.docs_path
    }

    pub fn excluded_dirs(&self) -> &[String] {
        &self.excluded_dirs
    }

    /// Whether the cache currently holds a load result.
    pub fn is_loaded(&self) -> bool {
        self.cache != Cache::Empty
    }

    /// Drop the cached docs; the next lookup reloads from disk.
    pub fn invalidate(&mut self) {
        if self.is_loaded() {
            tracing::debug!("Documentation cache cleared");
        }
        self.cache = Cache::Empty;
    }

    /// Load the docs file if the cache is empty.
    ///
    /// Returns the outcome when a load actually happened, `None` when the
    /// cache was already populated.
    pub fn ensure_loaded(&mut self) -> Result<Option<LoadOutcome>, LoadError> {
        if self.is_loaded() {
            return Ok(None);
        }

        let outcome = load_docs(&self.workspace_root, &self.docs_path, &self.excluded_dirs)?;
        self.cache = match outcome.docs() {
            Some(docs) => Cache::Loaded(docs.clone()),
            None => Cache::Absent,
        };

        tracing::debug!("Loaded documentation from {}", self.docs_path.display());
        Ok(Some(outcome))
    }

    /// Docs for a manifest, failing if the docs file cannot be loaded.
    pub fn try_resolve(&mut self, package_path: &str) -> Result<ScriptDocs, LoadError> {
        self.ensure_loaded()?;

        let mut docs = default_docs();
        if let Cache::Loaded(nested) = &self.cache {
            if let Some(entry) = nested.get(package_path) {
                docs.extend(entry.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        Ok(docs)
    }

    /// Docs for a manifest: built-in defaults overlaid by the docs file entry.
    ///
    /// Load failures are logged and answered with the defaults alone.
    pub fn resolve(&mut self, package_path: &str) -> ScriptDocs {
        self.try_resolve(package_path).unwrap_or_else(|e| {
            tracing::warn!("Falling back to default script docs: {}", e);
            default_docs()
        })
    }

    /// Description of one script, or the "no description" message.
    pub fn describe(&mut self, package_path: &str, script: &str) -> String {
        self.resolve(package_path)
            .remove(script)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }
}
