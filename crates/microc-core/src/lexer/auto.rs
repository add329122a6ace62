//! Secondary tokenizer backend built on a `logos`-derived regex lexer.
//!
//! This backend trades the manual scanner's exact diagnostic texture for a
//! declarative token grammar. It does not reproduce every edge case of the
//! hand-written scanner (e.g. the "record partial token, then report
//! unterminated" recovery behavior) — it is offered as an alternative
//! backend, not a byte-for-byte equivalent.

use logos::Logos;

use crate::diagnostics::{Diagnostics, Location};
use crate::token::{
    Token, CHAR_CODE, FLOAT_CODE, IDENTIFIER_CODE, INTEGER_CODE, INVALID_CODE, STRING_CODE,
};

use super::manual::LexResult;
use super::tables::{delimiter_code, keyword_code, operator_code};

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\f\r]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
enum Raw {
    #[regex(r"\n")]
    Newline,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"0[0-7]+")]
    Octal,

    #[regex(r"[0-9]+")]
    Decimal,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"'([^'\\\n]|\\.)'")]
    Char,

    #[regex(r"(==|!=|<=|>=|<<|>>|&&|\|\||\+=|-=|\*=|/=|%=|\+\+|--|[=+\-*/%<>!&])")]
    Operator,

    #[regex(r"[()\[\]{}.,;'#?\x22:]")]
    Delimiter,
}

/// Tokenizes `source` with the declarative lexer, producing the same
/// `Token`/`Diagnostics` shape the manual scanner produces.
pub fn lexical_analysis(source: &str) -> LexResult {
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut line: u32 = 1;

    let mut lexer = Raw::lexer(source);
    while let Some(result) = lexer.next() {
        let lexeme = lexer.slice();
        match result {
            Ok(Raw::Newline) => line += 1,
            Ok(Raw::Word) => {
                let code = keyword_code(lexeme).unwrap_or(IDENTIFIER_CODE);
                tokens.push(Token::new(code, lexeme.to_string(), line));
            }
            Ok(Raw::Hex | Raw::Octal | Raw::Decimal) => {
                tokens.push(Token::new(INTEGER_CODE, lexeme.to_string(), line));
            }
            Ok(Raw::Float) => {
                tokens.push(Token::new(FLOAT_CODE, lexeme.to_string(), line));
            }
            Ok(Raw::Str) => {
                tokens.push(Token::new(STRING_CODE, lexeme.to_string(), line));
            }
            Ok(Raw::Char) => {
                tokens.push(Token::new(CHAR_CODE, lexeme.to_string(), line));
            }
            Ok(Raw::Operator) => {
                if let Some(code) = operator_code(lexeme) {
                    tokens.push(Token::new(code, lexeme.to_string(), line));
                }
            }
            Ok(Raw::Delimiter) => {
                if let Some(code) = lexeme.chars().next().and_then(delimiter_code) {
                    tokens.push(Token::new(code, lexeme.to_string(), line));
                }
            }
            Err(()) => {
                diagnostics
                    .error(format!("unrecognized token \"{lexeme}\""), Location::Line(line))
                    .emit();
                tokens.push(Token::new(INVALID_CODE, lexeme.to_string(), line));
            }
        }
    }

    LexResult { tokens, diagnostics }
}
