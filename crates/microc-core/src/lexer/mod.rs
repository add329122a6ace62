//! Lexical analysis: two backends sharing one token/diagnostics shape.

pub mod auto;
pub mod manual;
pub mod numeric;
pub mod tables;

pub use manual::LexResult;

use crate::token::{token_to_terminal, Token, INVALID_CODE};

/// Which tokenizer implementation produced a `LexResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    #[default]
    Manual,
    Auto,
}

pub fn tokenize(source: &str, backend: Backend) -> LexResult {
    match backend {
        Backend::Manual => manual::lexical_analysis(source),
        Backend::Auto => auto::lexical_analysis(source),
    }
}

/// Maps a scanned token to the terminal symbol the grammar was written
/// against, failing fast on any token kind the grammar has no mapping for.
pub fn tokens_to_terminals(tokens: &[Token]) -> Result<Vec<String>, String> {
    tokens
        .iter()
        .map(|token| {
            if token.code == INVALID_CODE {
                Err(format!(
                    "cannot map invalid token \"{}\" on line {} to a terminal",
                    token.lexeme, token.line
                ))
            } else {
                Ok(token_to_terminal(token).to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_backends_agree_on_a_clean_snippet() {
        let manual = tokenize("int x = 1;", Backend::Manual);
        let auto = tokenize("int x = 1;", Backend::Auto);
        let manual_codes: Vec<_> = manual.tokens.iter().map(|t| t.code).collect();
        let auto_codes: Vec<_> = auto.tokens.iter().map(|t| t.code).collect();
        assert_eq!(manual_codes, auto_codes);
    }

    #[test]
    fn fails_fast_on_invalid_tokens() {
        let lexed = manual::lexical_analysis("int x = @;");
        assert!(tokens_to_terminals(&lexed.tokens).is_err());
    }
}
