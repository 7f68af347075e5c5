//! Built-in descriptions for common script names.

use crate::types::ScriptDocs;

const DEFAULT_DOCS: &[(&str, &str)] = &[
    ("dev", "Starts the development server"),
    ("build", "Builds the project for production"),
    ("preview", "Previews the production build locally"),
    ("test", "Runs tests"),
    ("lint", "Runs the linter"),
    ("format", "Formats the source code"),
];

/// The built-in description table.
pub fn default_docs() -> ScriptDocs {
    DEFAULT_DOCS
        .iter()
        .map(|(name, desc)| (name.to_string(), desc.to_string()))
        .collect()
}

/// Built-in description for a single script, if any.
pub fn default_description(script: &str) -> Option<&'static str> {
    DEFAULT_DOCS
        .iter()
        .find(|(name, _)| *name == script)
        .map(|(_, desc)| *desc)
}
