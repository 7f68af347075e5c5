//! npm script hover Language Server Protocol implementation
//!
//! Shows documentation when hovering a script name inside the `scripts`
//! object of any `package.json` in the workspace. Descriptions come from a
//! per-package docs file, falling back to built-in descriptions for common
//! scripts.
//!
//! # Usage
//!
//! Run the language server via stdio:
//!
//! ```bash
//! script-docs-lsp
//! ```
//!
//! # Commands
//!
//! - `scriptDocs.enableHover` / `scriptDocs.disableHover`
//! - `scriptDocs.reloadDocs`
//! - `scriptDocs.generateDocs`
//!
//! # Configuration
//!
//! Editor settings are read from `initializationOptions` and
//! `workspace/didChangeConfiguration`, flat or under `scriptDocs`:
//!
//! ```json
//! { "scriptDocs": { "enabled": true, "customDocsPath": ".vscode/script-docs.json" } }
//! ```
//!
//! Engine settings live in an optional `.script-docs-lsp.yaml` in the
//! workspace root:
//!
//! ```yaml
//! engine:
//!   name: script-docs-lsp
//!
//! docs:
//!   default_path: .vscode/script-docs.json
//!   debounce_ms: 500
//!   excluded_dirs:
//!     - node_modules
//!     - .git
//! ```

pub mod engine;

pub use engine::{ClientSettings, DocumentManager, EngineConfig, LspServer, Session};
