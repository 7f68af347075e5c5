//! Language server for npm script hovers
//!
//! Adapts LSP requests to the [`Session`]. Docs file change events from the
//! client are debounced before the cache is cleared.

use super::commands::{Notice, ScriptDocsCommand};
use super::config::EngineConfig;
use super::convert;
use super::debounce::Debouncer;
use super::document::{is_manifest_uri, DocumentManager};
use super::session::Session;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

const WATCHER_REGISTRATION_ID: &str = "script-docs-watcher";

/// Script docs language server
pub struct LspServer {
    /// LSP client for sending notifications
    client: Client,
    /// Open manifests
    documents: DocumentManager,
    /// Settings and documentation store
    session: Arc<Session>,
    /// Coalesces docs file change events; created on initialize
    debouncer: OnceCell<Debouncer>,
}

impl LspServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DocumentManager::new(),
            session: Arc::new(Session::new()),
            debouncer: OnceCell::new(),
        }
    }

    /// Server capabilities
    pub fn capabilities() -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: None,
                },
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: ScriptDocsCommand::ids(),
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            ..ServerCapabilities::default()
        }
    }

    fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
        if let Some(folder) = params.workspace_folders.as_ref().and_then(|f| f.first()) {
            if let Ok(path) = folder.uri.to_file_path() {
                return Some(path);
            }
        }

        #[allow(deprecated)]
        let root_uri = params.root_uri.as_ref();
        root_uri.and_then(|uri| uri.to_file_path().ok())
    }

    fn start_debouncer(&self, config: &EngineConfig) {
        let session = self.session.clone();
        let client = self.client.clone();

        let debouncer = Debouncer::spawn(config.docs.debounce(), move || {
            let session = session.clone();
            let client = client.clone();
            async move {
                session.invalidate().await;
                tracing::info!("Script docs changed on disk; cache cleared");
                client
                    .log_message(MessageType::INFO, "Script documentation changed, reloading")
                    .await;
            }
        });

        if self.debouncer.set(debouncer).is_err() {
            tracing::warn!("initialize received more than once");
        }
    }

    async fn notify(&self, notice: &Notice) {
        self.client
            .show_message(convert::to_message_type(notice), notice.text())
            .await;
    }

    async fn register_docs_watcher(&self) {
        let Some(pattern) = self.session.watch_pattern().await else {
            return;
        };

        let options = DidChangeWatchedFilesRegistrationOptions {
            watchers: vec![FileSystemWatcher {
                glob_pattern: GlobPattern::String(pattern.clone()),
                kind: None,
            }],
        };
        let register_options = match serde_json::to_value(options) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to encode watcher options: {}", e);
                return;
            }
        };

        let registration = Registration {
            id: WATCHER_REGISTRATION_ID.to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: Some(register_options),
        };

        match self.client.register_capability(vec![registration]).await {
            Ok(()) => tracing::info!("Watching {}", pattern),
            Err(e) => tracing::warn!("Client refused file watcher registration: {}", e),
        }
    }

    async fn reregister_docs_watcher(&self) {
        let unregistration = Unregistration {
            id: WATCHER_REGISTRATION_ID.to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
        };
        if let Err(e) = self
            .client
            .unregister_capability(vec![unregistration])
            .await
        {
            tracing::debug!("Unregistering file watcher failed: {}", e);
        }
        self.register_docs_watcher().await;
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = Self::workspace_root(&params);
        let config = root
            .as_deref()
            .map(EngineConfig::load_default)
            .unwrap_or_default();

        tracing::info!("{} initializing", config.engine.name);

        self.start_debouncer(&config);
        self.session
            .initialize(root, config.clone(), params.initialization_options.as_ref())
            .await;

        Ok(InitializeResult {
            capabilities: Self::capabilities(),
            server_info: Some(ServerInfo {
                name: config.engine.name,
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let name = self.session.config().await.engine.name;
        tracing::info!("{} initialized", name);

        self.register_docs_watcher().await;
        self.client
            .log_message(MessageType::INFO, format!("{} ready", name))
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        if self
            .documents
            .open(uri.clone(), params.text_document.text, params.text_document.version)
        {
            tracing::debug!("Manifest opened: {} ({} open)", uri, self.documents.count());
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        if !self.documents.is_open(&uri) {
            return;
        }

        if let Some(change) = params.content_changes.into_iter().last() {
            self.documents.update(&uri, change.text, version);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        if self.documents.close(&uri) {
            tracing::debug!("Manifest closed: {} ({} open)", uri, self.documents.count());
        }
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        let before = self.session.watch_pattern().await;

        if !self.session.apply_settings(&params.settings).await {
            tracing::debug!("Ignoring configuration change without script docs settings");
            return;
        }
        tracing::info!("Settings updated");

        if self.session.watch_pattern().await != before {
            self.reregister_docs_watcher().await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        for change in params.changes {
            let Ok(path) = change.uri.to_file_path() else {
                continue;
            };

            if self.session.is_docs_file(&path).await {
                tracing::debug!("Docs file event {:?}: {}", change.typ, path.display());
                if let Some(debouncer) = self.debouncer.get() {
                    debouncer.trigger();
                }
            }
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        if !is_manifest_uri(uri) {
            return Ok(None);
        }
        let Some(content) = self.documents.get_content(uri) else {
            return Ok(None);
        };

        let (hover, notice) = self.session.hover(uri, &content, position).await;
        if let Some(notice) = notice {
            self.notify(&notice).await;
        }

        Ok(hover)
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        let Some(command) = ScriptDocsCommand::from_id(&params.command) else {
            return Err(Error::invalid_params(format!(
                "Unknown command: {}",
                params.command
            )));
        };

        tracing::info!("Executing {}", command.id());
        let notice = self.session.execute(command).await;
        self.notify(&notice).await;

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tower_lsp::LspService;

    const MANIFEST: &str = r#"{
  "scripts": {
    "lint": "eslint ."
  }
}"#;

    fn initialize_params(root: &std::path::Path) -> InitializeParams {
        InitializeParams {
            workspace_folders: Some(vec![WorkspaceFolder {
                uri: Url::from_file_path(root).unwrap(),
                name: "test".to_string(),
            }]),
            ..InitializeParams::default()
        }
    }

    fn hover_params(uri: Url, line: u32) -> HoverParams {
        HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position { line, character: 5 },
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }

    fn open_params(uri: Url, text: &str) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri,
                language_id: "json".to_string(),
                version: 1,
                text: text.to_string(),
            },
        }
    }

    #[test]
    fn test_capabilities() {
        let caps = LspServer::capabilities();
        assert!(caps.hover_provider.is_some());
        let commands = caps.execute_command_provider.unwrap().commands;
        assert!(commands.contains(&"scriptDocs.generateDocs".to_string()));
        assert!(caps.completion_provider.is_none());
    }

    #[tokio::test]
    async fn test_initialize_and_hover() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), MANIFEST).unwrap();
        let (service, _) = LspService::new(LspServer::new);
        let server = service.inner();

        let result = server.initialize(initialize_params(temp.path())).await.unwrap();
        assert_eq!(result.server_info.unwrap().name, "script-docs-lsp");

        let uri = Url::from_file_path(temp.path().join("package.json")).unwrap();
        server.did_open(open_params(uri.clone(), MANIFEST)).await;

        let hover = server.hover(hover_params(uri.clone(), 2)).await.unwrap();
        assert!(hover.is_some());

        let hover = server.hover(hover_params(uri, 1)).await.unwrap();
        assert!(hover.is_none());
    }

    #[tokio::test]
    async fn test_hover_follows_edits_and_close() {
        let temp = TempDir::new().unwrap();
        let (service, _) = LspService::new(LspServer::new);
        let server = service.inner();
        server.initialize(initialize_params(temp.path())).await.unwrap();

        let uri = Url::from_file_path(temp.path().join("package.json")).unwrap();
        server.did_open(open_params(uri.clone(), MANIFEST)).await;
        assert!(server.hover(hover_params(uri.clone(), 2)).await.unwrap().is_some());

        server
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "{\n  \"name\": \"app\"\n}".to_string(),
                }],
            })
            .await;
        assert!(server.hover(hover_params(uri.clone(), 2)).await.unwrap().is_none());
        assert_eq!(server.documents.count(), 1);

        server
            .did_close(DidCloseTextDocumentParams {
                text_document: TextDocumentIdentifier { uri: uri.clone() },
            })
            .await;
        assert_eq!(server.documents.count(), 0);
        assert!(server.hover(hover_params(uri, 2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hover_ignores_other_json_files() {
        let temp = TempDir::new().unwrap();
        let (service, _) = LspService::new(LspServer::new);
        let server = service.inner();
        server.initialize(initialize_params(temp.path())).await.unwrap();

        let uri = Url::from_file_path(temp.path().join("tsconfig.json")).unwrap();
        server.did_open(open_params(uri.clone(), MANIFEST)).await;

        assert!(server.hover(hover_params(uri, 2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let temp = TempDir::new().unwrap();
        let (service, _) = LspService::new(LspServer::new);
        let server = service.inner();
        server.initialize(initialize_params(temp.path())).await.unwrap();

        let result = server
            .execute_command(ExecuteCommandParams {
                command: "scriptDocs.nope".to_string(),
                arguments: vec![],
                work_done_progress_params: WorkDoneProgressParams::default(),
            })
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_watched_file_events_clear_cache_once_settled() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), MANIFEST).unwrap();
        fs::write(
            temp.path().join(".script-docs-lsp.yaml"),
            "docs:\n  debounce_ms: 50\n",
        )
        .unwrap();

        let (service, _) = LspService::new(LspServer::new);
        let server = service.inner();
        server.initialize(initialize_params(temp.path())).await.unwrap();

        let uri = Url::from_file_path(temp.path().join("package.json")).unwrap();
        server.did_open(open_params(uri.clone(), MANIFEST)).await;
        server.hover(hover_params(uri, 2)).await.unwrap();
        assert!(server.session.is_loaded().await);

        let docs_uri = Url::from_file_path(temp.path().join(".vscode/script-docs.json")).unwrap();
        for typ in [FileChangeType::CREATED, FileChangeType::CHANGED, FileChangeType::CHANGED] {
            server
                .did_change_watched_files(DidChangeWatchedFilesParams {
                    changes: vec![FileEvent {
                        uri: docs_uri.clone(),
                        typ,
                    }],
                })
                .await;
        }
        assert!(server.session.is_loaded().await);

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        assert!(!server.session.is_loaded().await);
    }
}
