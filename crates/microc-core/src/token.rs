//! Token kinds and the fixed numeric code table preserved for GUI compatibility.

use serde::{Deserialize, Serialize};

/// Numeric token-kind code. See the external interface table: keywords 1-18,
/// operators 20-44, identifier 45, integer 46, float 47, char 48, string 49,
/// delimiters 50-63, invalid 0.
pub type KindCode = u16;

pub const INVALID_CODE: KindCode = 0;
pub const IDENTIFIER_CODE: KindCode = 45;
pub const INTEGER_CODE: KindCode = 46;
pub const FLOAT_CODE: KindCode = 47;
pub const CHAR_CODE: KindCode = 48;
pub const STRING_CODE: KindCode = 49;

/// A scanned token: numeric kind, the exact source slice it covers, and the
/// one-based line it started on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub code: KindCode,
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(code: KindCode, lexeme: impl Into<String>, line: u32) -> Self {
        Self {
            code,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.code == INVALID_CODE
    }
}

/// Maps a scanned token to the terminal name used by the grammar.
///
/// Keywords and punctuation map to their own lexeme; identifiers to `ID`;
/// literals to their `*_LITERAL` names. Panics on a token the table was never
/// taught about — that is an internal bug, not a user-facing error.
pub fn token_to_terminal(token: &Token) -> &str {
    match token.code {
        IDENTIFIER_CODE => "ID",
        INTEGER_CODE => "INT_LITERAL",
        FLOAT_CODE => "FLOAT_LITERAL",
        STRING_CODE => "STRING_LITERAL",
        CHAR_CODE => "CHAR_LITERAL",
        INVALID_CODE => "INVALID",
        _ => token.lexeme.as_str(),
    }
}
