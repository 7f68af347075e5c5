//! Type conversions between script-docs and LSP types
//!
//! script-docs positions are 1-based character columns; LSP positions are
//! 0-based. Columns are passed through as characters, which matches UTF-16
//! offsets for manifests without astral-plane characters.

use crate::engine::commands::Notice;
use script_docs::{Range, ScriptHover};
use tower_lsp::lsp_types::{
    Hover, HoverContents, MarkupContent, MarkupKind, MessageType, Position as LspPosition,
    Range as LspRange,
};

/// 0-based LSP line to a 1-based script-docs line
pub fn to_doc_line(position: &LspPosition) -> u32 {
    position.line + 1
}

/// Convert a script-docs range to an LSP range
pub fn to_lsp_range(range: &Range) -> LspRange {
    LspRange {
        start: LspPosition {
            line: range.start_line.saturating_sub(1),
            character: range.start_col.saturating_sub(1),
        },
        end: LspPosition {
            line: range.end_line.saturating_sub(1),
            character: range.end_col.saturating_sub(1),
        },
    }
}

/// Convert a script hover to an LSP hover
pub fn to_lsp_hover(info: &ScriptHover) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: info.to_markdown(),
        }),
        range: info.range.as_ref().map(to_lsp_range),
    }
}

/// Message type for a user notice
pub fn to_message_type(notice: &Notice) -> MessageType {
    match notice {
        Notice::Info(_) => MessageType::INFO,
        Notice::Warning(_) => MessageType::WARNING,
        Notice::Error(_) => MessageType::ERROR,
    }
}
