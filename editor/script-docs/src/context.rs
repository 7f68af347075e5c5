//! Cursor context detection for hover
//!
//! Finds the quoted key on a line and the line span of the top-level
//! `scripts` object, so hovers only fire on real script entries.

use crate::types::Range;
use once_cell::sync::Lazy;
use regex::Regex;

/// A quoted key, escapes included, immediately followed by a colon.
static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""((?:[^"\\]|\\.)+)"\s*:"#).expect("key pattern is valid")
});

/// A key found on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineKey {
    pub name: String,
    /// Range of the quoted key, quotes included
    pub range: Range,
}

/// First quoted key on `line_text`. `line` is the 1-based line number used
/// for the returned range.
pub fn key_on_line(line_text: &str, line: u32) -> Option<LineKey> {
    let caps = KEY_PATTERN.captures(line_text)?;
    let whole = caps.get(0)?;
    let raw = caps.get(1)?;
    let name: String = serde_json::from_str(&format!("\"{}\"", raw.as_str())).ok()?;

    let start_col = line_text[..whole.start()].chars().count() as u32 + 1;
    // opening quote + escaped name + closing quote
    let end_col = start_col + raw.as_str().chars().count() as u32 + 2;

    Some(LineKey {
        name,
        range: Range {
            start_line: line,
            start_col,
            end_line: line,
            end_col,
        },
    })
}

/// Text of a 1-based line.
pub fn line_text(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }
    source.lines().nth(line as usize - 1)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Punct(char),
}

/// Split JSON text into strings and structural characters, with 1-based
/// line numbers. Numbers and literals are dropped.
fn tokenize(source: &str) -> Vec<(Token, u32)> {
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            '"' => {
                let start_line = line;
                let mut value = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push('\\');
                                value.push(escaped);
                            }
                        }
                        '\n' => {
                            line += 1;
                            value.push(c);
                        }
                        _ => value.push(c),
                    }
                }
                tokens.push((Token::Str(value), start_line));
            }
            '{' | '}' | '[' | ']' | ':' | ',' => tokens.push((Token::Punct(c), line)),
            _ => {}
        }
    }

    tokens
}

/// 1-based line span (opening brace, closing brace) of the top-level
/// `scripts` object.
pub fn scripts_span(source: &str) -> Option<(u32, u32)> {
    let tokens = tokenize(source);
    let mut depth = 0i32;

    for (i, (token, _)) in tokens.iter().enumerate() {
        match token {
            Token::Punct('{') | Token::Punct('[') => depth += 1,
            Token::Punct('}') | Token::Punct(']') => depth -= 1,
            Token::Str(key) if depth == 1 && key == "scripts" => {
                let is_object = matches!(tokens.get(i + 1), Some((Token::Punct(':'), _)))
                    && matches!(tokens.get(i + 2), Some((Token::Punct('{'), _)));
                if is_object {
                    return matching_close(&tokens, i + 2);
                }
            }
            _ => {}
        }
    }

    None
}

fn matching_close(tokens: &[(Token, u32)], open: usize) -> Option<(u32, u32)> {
    let start_line = tokens[open].1;
    let mut depth = 0i32;

    for (token, line) in &tokens[open..] {
        match token {
            Token::Punct('{') | Token::Punct('[') => depth += 1,
            Token::Punct('}') | Token::Punct(']') => {
                depth -= 1;
                if depth == 0 {
                    return Some((start_line, *line));
                }
            }
            _ => {}
        }
    }

    None
}
