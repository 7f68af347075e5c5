//! Per-workspace session state
//!
//! Holds the editor settings and the documentation store, and implements
//! hover and command handling independently of the LSP transport. The
//! server wraps one `Session` in an `Arc` and shares it with the debounce
//! task that clears the cache on docs file changes.
//!
//! Work that touches the file system (loading, migration, generation) runs
//! on the blocking thread pool.

use super::commands::{Notice, ScriptDocsCommand};
use super::config::{ClientSettings, EngineConfig};
use super::convert;
use script_docs::{
    default_description, generate, relative_manifest_path, resolve_hover_with, DocStore,
    GenerateOptions, GenerateReport, HoverProvider, LoadOutcome, ROOT_MANIFEST,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_lsp::lsp_types::{Hover, Position, Url};

/// Session state shared between request handlers
#[derive(Debug, Default)]
pub struct Session {
    state: Arc<Mutex<SessionState>>,
}

#[derive(Debug, Default)]
struct SessionState {
    config: EngineConfig,
    settings: ClientSettings,
    workspace_root: Option<PathBuf>,
    store: Option<DocStore>,
    /// Last load error shown to the user, to avoid repeating it on every hover
    reported_error: Option<String>,
}

impl SessionState {
    fn rebuild_store(&mut self) {
        self.store = self.workspace_root.as_ref().map(|root| {
            DocStore::new(root.clone(), self.settings.docs_path(&self.config))
                .with_excluded_dirs(self.config.docs.excluded_dirs.clone())
        });
        self.reported_error = None;
    }

    /// Load the docs file if needed and describe anything the user should know.
    fn check_docs(&mut self) -> Option<Notice> {
        let store = self.store.as_mut()?;

        match store.ensure_loaded() {
            Ok(Some(LoadOutcome::Migrated { added, .. })) => {
                self.reported_error = None;
                Some(Notice::Info(format!(
                    "Migrated {} to the multi-package format ({} packages added)",
                    store.docs_path().display(),
                    added.len()
                )))
            }
            Ok(_) => {
                self.reported_error = None;
                None
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Script docs unavailable: {}", message);
                if self.reported_error.as_deref() == Some(message.as_str()) {
                    return None;
                }
                self.reported_error = Some(message.clone());
                Some(Notice::Error(format!(
                    "Script docs could not be loaded, using built-in descriptions: {}",
                    message
                )))
            }
        }
    }

    fn package_path(&self, uri: &Url) -> String {
        let file = uri.to_file_path().ok();
        match (&self.workspace_root, file) {
            (Some(root), Some(file)) => {
                relative_manifest_path(root, &file).unwrap_or_else(|| ROOT_MANIFEST.to_string())
            }
            _ => ROOT_MANIFEST.to_string(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up the session for a workspace.
    pub async fn initialize(
        &self,
        workspace_root: Option<PathBuf>,
        config: EngineConfig,
        options: Option<&Value>,
    ) {
        let mut state = self.state.lock().await;
        state.config = config;
        state.settings = options
            .and_then(ClientSettings::from_value)
            .unwrap_or_default();
        state.workspace_root = workspace_root;
        state.rebuild_store();

        if let Some(store) = &state.store {
            tracing::info!("Using script docs at {}", store.docs_path().display());
        } else {
            tracing::info!("No workspace folder; only built-in script docs are available");
        }
    }

    /// Apply settings from `workspace/didChangeConfiguration`.
    /// Returns false when the payload holds no usable settings.
    pub async fn apply_settings(&self, value: &Value) -> bool {
        let Some(settings) = ClientSettings::from_value(value) else {
            return false;
        };

        let mut state = self.state.lock().await;
        let path_changed =
            settings.docs_path(&state.config) != state.settings.docs_path(&state.config);
        state.settings = settings;
        if path_changed {
            state.rebuild_store();
        }
        true
    }

    pub async fn settings(&self) -> ClientSettings {
        self.state.lock().await.settings.clone()
    }

    pub async fn config(&self) -> EngineConfig {
        self.state.lock().await.config.clone()
    }

    /// Absolute path of the docs file, when a workspace is open.
    pub async fn docs_path(&self) -> Option<PathBuf> {
        let state = self.state.lock().await;
        state.store.as_ref().map(|store| store.docs_path().to_path_buf())
    }

    /// Glob the client should watch for docs file changes.
    pub async fn watch_pattern(&self) -> Option<String> {
        let state = self.state.lock().await;
        if state.store.is_none() {
            return None;
        }

        let configured = state.settings.docs_path(&state.config);
        if Path::new(configured).is_absolute() {
            Some(configured.to_string())
        } else {
            Some(format!("**/{}", configured.trim_start_matches("./")))
        }
    }

    pub async fn is_docs_file(&self, path: &Path) -> bool {
        self.docs_path().await.is_some_and(|docs| docs == path)
    }

    /// Clear the docs cache.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        if let Some(store) = state.store.as_mut() {
            store.invalidate();
        }
        state.reported_error = None;
    }

    pub async fn is_loaded(&self) -> bool {
        let state = self.state.lock().await;
        state.store.as_ref().is_some_and(|store| store.is_loaded())
    }

    /// Run `f` against the state on the blocking pool.
    async fn with_state_blocking<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&mut SessionState) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let task = tokio::task::spawn_blocking(move || {
            let mut guard = state.blocking_lock();
            f(&mut *guard)
        });

        match task.await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Script docs task failed: {}", e);
                None
            }
        }
    }

    /// Hover for an open manifest. The notice, if any, should be shown to
    /// the user whether or not a hover is returned.
    pub async fn hover(
        &self,
        uri: &Url,
        content: &str,
        position: Position,
    ) -> (Option<Hover>, Option<Notice>) {
        let uri = uri.clone();
        let content = content.to_string();

        self.with_state_blocking(move |state| state.hover(&uri, &content, position))
            .await
            .unwrap_or((None, None))
    }

    /// Run a command and describe the result for the user.
    pub async fn execute(&self, command: ScriptDocsCommand) -> Notice {
        self.with_state_blocking(move |state| state.execute(command))
            .await
            .unwrap_or_else(|| Notice::Error(format!("{} failed", command.id())))
    }
}

impl SessionState {
    fn hover(
        &mut self,
        uri: &Url,
        content: &str,
        position: Position,
    ) -> (Option<Hover>, Option<Notice>) {
        if !self.settings.enabled {
            return (None, None);
        }

        let line = convert::to_doc_line(&position);
        let notice = self.check_docs();
        let package_path = self.package_path(uri);

        let info = match self.store.as_mut() {
            Some(store) => HoverProvider::new(store).hover(&package_path, content, line),
            None => resolve_hover_with(content, line, |script| {
                default_description(script).map(str::to_string)
            }),
        };

        tracing::debug!(
            "Hover {}:{} -> {:?}",
            package_path,
            line,
            info.as_ref().map(|i| &i.script)
        );
        (info.as_ref().map(convert::to_lsp_hover), notice)
    }

    fn execute(&mut self, command: ScriptDocsCommand) -> Notice {
        match command {
            ScriptDocsCommand::EnableHover => {
                self.settings.enabled = true;
                Notice::Info("Script hover enabled".to_string())
            }
            ScriptDocsCommand::DisableHover => {
                self.settings.enabled = false;
                Notice::Info("Script hover disabled".to_string())
            }
            ScriptDocsCommand::ReloadDocs => {
                let Some(store) = self.store.as_mut() else {
                    return Notice::Warning(
                        "No workspace folder open; only built-in descriptions are available"
                            .to_string(),
                    );
                };
                store.invalidate();
                self.reported_error = None;

                match self.check_docs() {
                    Some(Notice::Error(message)) => Notice::Error(message),
                    _ => Notice::Info("Script documentation reloaded".to_string()),
                }
            }
            ScriptDocsCommand::GenerateDocs => self.generate_docs(),
        }
    }

    fn generate_docs(&mut self) -> Notice {
        let Some(store) = self.store.as_mut() else {
            return Notice::Error(
                "No workspace folder open; cannot generate script documentation".to_string(),
            );
        };

        let options = GenerateOptions {
            excluded_dirs: store.excluded_dirs().to_vec(),
        };
        let result = generate(store.workspace_root(), store.docs_path(), &options);
        store.invalidate();

        match result {
            Ok(report) => generate_notice(&report),
            Err(e) => {
                tracing::warn!("Script docs generation failed: {}", e);
                Notice::Error(format!("Failed to generate script documentation: {}", e))
            }
        }
    }
}

fn generate_notice(report: &GenerateReport) -> Notice {
    let summary = format!(
        "Documented {} scripts across {} packages in {} ({} kept, {} generated)",
        report.scripts,
        report.packages,
        report.output.display(),
        report.preserved,
        report.synthesized
    );

    if report.failures.is_empty() {
        Notice::Info(summary)
    } else {
        let skipped: Vec<_> = report.failures.iter().map(|f| f.path.as_str()).collect();
        Notice::Warning(format!("{}; skipped {}", summary, skipped.join(", ")))
    }
}
