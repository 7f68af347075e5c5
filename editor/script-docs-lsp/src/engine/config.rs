//! Configuration loading for the LSP engine
//!
//! Engine settings come from an optional YAML file in the workspace root.
//! Editor settings (`enabled`, `customDocsPath`) arrive from the client in
//! `initializationOptions` and `workspace/didChangeConfiguration`.

use script_docs::{default_excluded_dirs, DEFAULT_DOCS_PATH};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Main engine configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine settings
    pub engine: EngineSettings,
    /// Documentation settings
    pub docs: DocsSettings,
}

/// Core engine settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Server name
    pub name: String,
}

/// Documentation file handling
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocsSettings {
    /// Docs file used when the client does not set `customDocsPath`
    pub default_path: String,
    /// Quiet period before a docs file change clears the cache
    pub debounce_ms: u64,
    /// Directories skipped when scanning for package.json files
    pub excluded_dirs: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            name: "script-docs-lsp".to_string(),
        }
    }
}

impl Default for DocsSettings {
    fn default() -> Self {
        Self {
            default_path: DEFAULT_DOCS_PATH.to_string(),
            debounce_ms: 500,
            excluded_dirs: default_excluded_dirs(),
        }
    }
}

impl DocsSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl EngineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        serde_yaml::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Load configuration from default locations
    pub fn load_default(workspace_root: &Path) -> Self {
        let candidates = [
            workspace_root.join(".script-docs-lsp.yaml"),
            workspace_root.join(".script-docs-lsp.yml"),
            workspace_root.join("script-docs-lsp.yaml"),
        ];

        for candidate in &candidates {
            if candidate.exists() {
                match Self::load(candidate) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring {}: {}", candidate.display(), e),
                }
            }
        }

        Self::default()
    }
}

/// Settings controlled from the editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientSettings {
    /// Whether script hovers are shown
    pub enabled: bool,
    /// Docs file location, overriding the engine default
    pub custom_docs_path: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            custom_docs_path: None,
        }
    }
}

impl ClientSettings {
    /// Section name when settings are nested, e.g. `{"scriptDocs": {...}}`
    pub const SECTION: &'static str = "scriptDocs";

    /// Keys recognized in the flat form
    const FLAT_KEYS: [&'static str; 2] = ["enabled", "customDocsPath"];

    /// Parse settings given either flat or under [`Self::SECTION`].
    ///
    /// A flat object must name at least one of our keys; any other object
    /// yields `None` and leaves the current settings alone.
    pub fn from_value(value: &Value) -> Option<Self> {
        let section = match value.get(Self::SECTION) {
            Some(section) => section,
            None => {
                let object = value.as_object()?;
                if !Self::FLAT_KEYS.iter().any(|key| object.contains_key(*key)) {
                    return None;
                }
                value
            }
        };
        if !section.is_object() {
            return None;
        }
        serde_json::from_value(section.clone()).ok()
    }

    /// Docs path to use, falling back to the engine default.
    pub fn docs_path<'a>(&'a self, config: &'a EngineConfig) -> &'a str {
        self.custom_docs_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .unwrap_or(config.docs.default_path.as_str())
    }
}
