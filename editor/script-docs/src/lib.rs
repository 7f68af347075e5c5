//! # script-docs
//!
//! Hover documentation for npm scripts declared in `package.json` files.
//!
//! Descriptions come from a user-maintained documentation file (default
//! `.vscode/script-docs.json`) layered over a small built-in table. This
//! library is shared by editor integrations (the `script-docs-lsp` server)
//! and the `script-docs` CLI.
//!
//! ## Features
//!
//! - Script hover: description, literal command, `npm run` usage hint
//! - Per-manifest documentation for monorepos
//! - One-time migration of the legacy flat docs format
//! - Generating or updating the docs file from the workspace manifests
//!
//! ## Documentation file
//!
//! ```json
//! {
//!   "$schemaVersion": 2,
//!   "package.json": { "dev": "Starts Vite" },
//!   "packages/api/package.json": { "start": "Boots the API" }
//! }
//! ```
//!
//! Files without `$schemaVersion` are still accepted. A flat
//! `{ "<script>": "<description>" }` file is the legacy format and is
//! rewritten in the nested format on first load.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use script_docs::{DocStore, HoverProvider};
//!
//! let mut store = DocStore::with_default_path("/path/to/workspace");
//! let mut provider = HoverProvider::new(&mut store);
//!
//! let source = std::fs::read_to_string("/path/to/workspace/package.json")?;
//! if let Some(info) = provider.hover("package.json", &source, 4) {
//!     println!("{}", info.to_markdown());
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! script-docs hover package.json 4
//! script-docs generate --workspace .
//! ```

mod context;
mod defaults;
mod generate;
mod hover;
mod loader;
mod schema;
mod store;
mod types;
mod workspace;

pub use context::{key_on_line, line_text, scripts_span, LineKey};
pub use defaults::{default_description, default_docs};
pub use generate::{
    generate, merge_entry, synthesize_description, GenerateError, GenerateOptions,
    GenerateReport, ManifestFailure,
};
pub use hover::{resolve_hover_with, script_at_line, HoverProvider, ScriptEntry};
pub use loader::{
    load_docs, migrate_legacy, read_docs_value, resolve_docs_path, write_docs, LoadError,
    LoadOutcome, DEFAULT_DOCS_PATH,
};
pub use schema::{classify, looks_legacy, DocsShape};
pub use store::DocStore;
pub use types::{
    DocsFile, NestedDocs, Range, ScriptDocs, ScriptHover, NO_DESCRIPTION, ROOT_MANIFEST,
    SCHEMA_VERSION, SCHEMA_VERSION_KEY,
};
pub use workspace::{
    default_excluded_dirs, find_package_manifests, relative_manifest_path,
    DEFAULT_EXCLUDED_DIRS,
};
