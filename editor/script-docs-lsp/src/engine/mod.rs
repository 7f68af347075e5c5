//! LSP engine core
//!
//! The server adapts LSP requests to a transport-independent session that
//! owns settings and the documentation store.

pub mod commands;
pub mod config;
pub mod convert;
pub mod debounce;
pub mod document;
pub mod server;
pub mod session;

pub use commands::{Notice, ScriptDocsCommand};
pub use config::{ClientSettings, EngineConfig};
pub use debounce::Debouncer;
pub use document::DocumentManager;
pub use server::LspServer;
pub use session::Session;
