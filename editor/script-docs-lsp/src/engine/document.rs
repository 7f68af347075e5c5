//! Document management for the LSP engine
//!
//! Tracks the text of open `package.json` documents. Other documents the
//! client opens are ignored.

use dashmap::DashMap;
use tower_lsp::lsp_types::Url;

/// Whether a URI names an npm manifest.
pub fn is_manifest_uri(uri: &Url) -> bool {
    uri.path_segments()
        .and_then(|segments| segments.last())
        .is_some_and(|name| name == "package.json")
}

/// Manages open manifests in the LSP session
#[derive(Debug, Default)]
pub struct DocumentManager {
    /// Map of document URI to content
    documents: DashMap<Url, DocumentState>,
}

/// State of an open document
#[derive(Debug, Clone)]
struct DocumentState {
    content: String,
    version: i32,
}

impl DocumentManager {
    /// Create a new document manager
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Track a document if it is a manifest. Returns whether it is tracked.
    pub fn open(&self, uri: Url, content: String, version: i32) -> bool {
        if !is_manifest_uri(&uri) {
            return false;
        }
        self.documents
            .insert(uri, DocumentState { content, version });
        true
    }

    /// Replace a tracked document's content, ignoring stale versions
    pub fn update(&self, uri: &Url, content: String, version: i32) {
        if let Some(mut doc) = self.documents.get_mut(uri) {
            if version >= doc.version {
                doc.content = content;
                doc.version = version;
            }
        }
    }

    /// Stop tracking a document. Returns whether it was tracked.
    pub fn close(&self, uri: &Url) -> bool {
        self.documents.remove(uri).is_some()
    }

    /// Get document content
    pub fn get_content(&self, uri: &Url) -> Option<String> {
        self.documents.get(uri).map(|doc| doc.content.clone())
    }

    /// Check if document is tracked
    pub fn is_open(&self, uri: &Url) -> bool {
        self.documents.contains_key(uri)
    }

    /// Get number of tracked documents
    pub fn count(&self) -> usize {
        self.documents.len()
    }
}
