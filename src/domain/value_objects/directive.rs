//! Source directives
//!
//! A directive is a string-literal statement in a module's prologue
//! (`"use client";`). Only three are recognized; any other `"use ..."`
//! string is reported as unrecognized instead of being ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::LayerId;

/// Marks a module as interactive browser code.
pub const CLIENT_DIRECTIVE: &str = "use client";
/// Marks a module's exports as server-callable actions.
pub const SERVER_CALLABLE_DIRECTIVE: &str = "use server";
/// Marks a server page entry whose stylesheet is emitted and linked.
pub const SERVER_ENTRY_DIRECTIVE: &str = "use server-entry";

/// Recognized directive tokens. A module without one has an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Directive {
    Client,
    ServerCallable,
    ServerEntry,
}

impl Directive {
    pub const ALL: [Directive; 3] = [
        Directive::Client,
        Directive::ServerCallable,
        Directive::ServerEntry,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            CLIENT_DIRECTIVE => Some(Directive::Client),
            SERVER_CALLABLE_DIRECTIVE => Some(Directive::ServerCallable),
            SERVER_ENTRY_DIRECTIVE => Some(Directive::ServerEntry),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Directive::Client => CLIENT_DIRECTIVE,
            Directive::ServerCallable => SERVER_CALLABLE_DIRECTIVE,
            Directive::ServerEntry => SERVER_ENTRY_DIRECTIVE,
        }
    }

    /// Layer a module carrying this directive compiles in.
    pub fn layer(self) -> LayerId {
        match self {
            Directive::Client => LayerId::Client,
            Directive::ServerCallable | Directive::ServerEntry => LayerId::ServerComponents,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.token())
    }
}

/// Directives found at the top of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectivePrologue {
    pub directives: Vec<Directive>,
    /// `"use ..."` strings that are not recognized directives
    pub unrecognized: Vec<String>,
}

/// Scan the directive prologue of a JS/TS module.
///
/// Stops at the first statement that is not a lone string literal.
/// Comments, blank lines, a BOM and a hashbang line are skipped.
pub fn scan_prologue(source: &str) -> DirectivePrologue {
    let mut prologue = DirectivePrologue::default();
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let bytes = source.as_bytes();

    let mut pos = 0;
    if source.starts_with("#!") {
        pos = source.find('\n').map(|i| i + 1).unwrap_or(bytes.len());
    }

    loop {
        pos = skip_trivia(bytes, pos);
        let Some(&quote) = bytes.get(pos) else { break };
        if quote != b'"' && quote != b'\'' {
            break;
        }

        let start = pos + 1;
        let Some(len) = bytes[start..]
            .iter()
            .position(|&b| b == quote || b == b'\\' || b == b'\n')
        else {
            break;
        };
        let end = start + len;
        if bytes[end] != quote {
            break;
        }
        let literal = &source[start..end];

        // The literal must be the whole statement.
        let after = skip_inline_space(bytes, end + 1);
        match bytes.get(after) {
            Some(b';') => pos = after + 1,
            Some(b'\n') | Some(b'\r') | Some(b'/') | None => pos = after,
            _ => break,
        }

        match Directive::from_token(literal) {
            Some(directive) => {
                if !prologue.directives.contains(&directive) {
                    prologue.directives.push(directive);
                }
            }
            None if literal == "use strict" => {}
            None if literal.starts_with("use ") => prologue.unrecognized.push(literal.to_string()),
            None => {}
        }
    }

    prologue
}

fn skip_inline_space(bytes: &[u8], mut pos: usize) -> usize {
    while matches!(bytes.get(pos), Some(b' ') | Some(b'\t')) {
        pos += 1;
    }
    pos
}

fn skip_trivia(bytes: &[u8], mut pos: usize) -> usize {
    loop {
        match bytes.get(pos) {
            Some(b) if b.is_ascii_whitespace() => pos += 1,
            Some(b'/') if bytes.get(pos + 1) == Some(&b'/') => {
                pos = bytes[pos..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map(|i| pos + i + 1)
                    .unwrap_or(bytes.len());
            }
            Some(b'/') if bytes.get(pos + 1) == Some(&b'*') => {
                pos = bytes[pos + 2..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map(|i| pos + 2 + i + 2)
                    .unwrap_or(bytes.len());
            }
            _ => return pos,
        }
    }
}
