//! Commands exposed through `workspace/executeCommand`

/// Commands the client can invoke. None take arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptDocsCommand {
    EnableHover,
    DisableHover,
    ReloadDocs,
    GenerateDocs,
}

impl ScriptDocsCommand {
    pub const ALL: [ScriptDocsCommand; 4] = [
        ScriptDocsCommand::EnableHover,
        ScriptDocsCommand::DisableHover,
        ScriptDocsCommand::ReloadDocs,
        ScriptDocsCommand::GenerateDocs,
    ];

    /// Command identifier on the wire
    pub fn id(&self) -> &'static str {
        match self {
            ScriptDocsCommand::EnableHover => "scriptDocs.enableHover",
            ScriptDocsCommand::DisableHover => "scriptDocs.disableHover",
            ScriptDocsCommand::ReloadDocs => "scriptDocs.reloadDocs",
            ScriptDocsCommand::GenerateDocs => "scriptDocs.generateDocs",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }

    /// All identifiers, for the server capabilities
    pub fn ids() -> Vec<String> {
        Self::ALL.iter().map(|cmd| cmd.id().to_string()).collect()
    }
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Warning(text) | Notice::Error(text) => text,
        }
    }
}
