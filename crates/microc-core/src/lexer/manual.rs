//! Hand-written, character-indexed, longest-match lexical scanner.
//!
//! Mirrors the scan policy in priority order: whitespace, block comment,
//! line comment, string/char literal, numeric literal, identifier/keyword,
//! operator, delimiter, and finally an "unrecognized character" fallback.

use crate::diagnostics::{Diagnostics, Location};
use crate::token::{Token, CHAR_CODE, FLOAT_CODE, IDENTIFIER_CODE, INTEGER_CODE, INVALID_CODE, STRING_CODE};

use super::numeric::{is_valid_decimal, is_valid_float, is_valid_hex, is_valid_octal};
use super::tables::{delimiter_code, is_operator_char, keyword_code, operator_code};

pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Diagnostics,
}

pub fn lexical_analysis(source: &str) -> LexResult {
    let src: Vec<char> = source.trim_start_matches('\u{feff}').chars().collect();
    let mut tokens = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut line: u32 = 1;
    let mut i = 0usize;

    while i < src.len() {
        let c = src[i];

        if c.is_whitespace() || (c as u32) < 32 {
            if c == '\n' {
                line += 1;
            }
            i += 1;
            continue;
        }

        if c == '/' && peek(&src, i + 1) == Some('*') {
            let start_line = line;
            i += 2;
            let mut closed = false;
            while i < src.len() {
                if src[i] == '\n' {
                    line += 1;
                } else if src[i] == '*' && peek(&src, i + 1) == Some('/') {
                    i += 2;
                    closed = true;
                    break;
                }
                i += 1;
            }
            if !closed {
                diagnostics
                    .error(
                        format!("unterminated block comment (started on line {start_line})"),
                        Location::Line(start_line),
                    )
                    .emit();
            }
            continue;
        }

        if c == '/' && peek(&src, i + 1) == Some('/') {
            while i < src.len() && src[i] != '\n' {
                i += 1;
            }
            continue;
        }

        if c == '\'' {
            let (token, new_i, new_line, err) = scan_char_literal(&src, i, line);
            tokens.push(token);
            i = new_i;
            line = new_line;
            if let Some(msg) = err {
                diagnostics.error(msg, Location::Line(line)).emit();
            }
            continue;
        }

        if c == '"' {
            let (token, new_i, new_line, err) = scan_string_literal(&src, i, line);
            tokens.push(token);
            i = new_i;
            line = new_line;
            if let Some(msg) = err {
                diagnostics.error(msg, Location::Line(line)).emit();
            }
            continue;
        }

        if c.is_ascii_digit() {
            let (token, new_i, err) = scan_number(&src, i, line);
            tokens.push(token);
            i = new_i;
            if let Some(msg) = err {
                diagnostics.error(msg, Location::Line(line)).emit();
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < src.len() && (src[i].is_alphanumeric() || src[i] == '_') {
                i += 1;
            }
            let text: String = src[start..i].iter().collect();
            let code = keyword_code(&text).unwrap_or(IDENTIFIER_CODE);
            tokens.push(Token::new(code, text, line));
            continue;
        }

        if is_operator_char(c) {
            if i + 2 < src.len() {
                let seq3: String = src[i..i + 3].iter().collect();
                if operator_code(&seq3).is_none() && seq3.chars().all(is_operator_char) {
                    diagnostics
                        .error(format!("illegal operator \"{seq3}\""), Location::Line(line))
                        .emit();
                    tokens.push(Token::new(INVALID_CODE, seq3, line));
                    i += 3;
                    continue;
                }
            }
            if i + 1 < src.len() {
                let two: String = src[i..i + 2].iter().collect();
                if let Some(code) = operator_code(&two) {
                    tokens.push(Token::new(code, two, line));
                    i += 2;
                    continue;
                }
            }
            if let Some(code) = operator_code(&c.to_string()) {
                tokens.push(Token::new(code, c.to_string(), line));
                i += 1;
                continue;
            }
        }

        if let Some(code) = delimiter_code(c) {
            tokens.push(Token::new(code, c.to_string(), line));
            i += 1;
            continue;
        }

        diagnostics
            .error(format!("unrecognized character \"{c}\""), Location::Line(line))
            .emit();
        tokens.push(Token::new(INVALID_CODE, c.to_string(), line));
        i += 1;
    }

    LexResult { tokens, diagnostics }
}

fn peek(src: &[char], i: usize) -> Option<char> {
    src.get(i).copied()
}

/// Returns `(token, next_index, next_line, error)`.
fn scan_char_literal(src: &[char], start: usize, line: u32) -> (Token, usize, u32, Option<String>) {
    let mut i = start + 1;
    let mut cur_line = line;
    let mut content = String::new();

    if i < src.len() && src[i] == '\\' {
        if i + 1 < src.len() {
            content.push(src[i]);
            content.push(src[i + 1]);
            i += 2;
        }
    } else if i < src.len() {
        content.push(src[i]);
        i += 1;
    }

    if i < src.len() && src[i] == '\'' {
        i += 1;
        let lexeme = format!("'{content}'");
        (Token::new(CHAR_CODE, lexeme, cur_line), i, cur_line, None)
    } else {
        let raw: String = src[start..i].iter().collect();
        if i < src.len() && src[i] == '\n' {
            cur_line += 1;
        }
        let msg = format!("unterminated or malformed character literal \"{raw}\"");
        (Token::new(INVALID_CODE, raw, line), i, cur_line, Some(msg))
    }
}

/// Returns `(token, next_index, next_line, error)`.
fn scan_string_literal(src: &[char], start: usize, line: u32) -> (Token, usize, u32, Option<String>) {
    let quote = src[start];
    let mut i = start + 1;
    let mut closed = false;

    while i < src.len() {
        if src[i] == '\n' {
            break;
        }
        if src[i] == quote {
            closed = true;
            i += 1;
            break;
        }
        if src[i] == '\\' {
            i += 2;
        } else {
            i += 1;
        }
    }

    let lexeme: String = src[start..i].iter().collect();
    if closed {
        (Token::new(STRING_CODE, lexeme, line), i, line, None)
    } else {
        let msg = format!("unterminated string literal \"{lexeme}\"");
        (Token::new(STRING_CODE, lexeme, line), i, line, Some(msg))
    }
}

/// Returns `(token, next_index, error)`.
fn scan_number(src: &[char], start: usize, line: u32) -> (Token, usize, Option<String>) {
    let mut i = start;
    let mut num = String::new();

    if src[i] == '0' && peek(src, i + 1).map(|c| c.eq_ignore_ascii_case(&'x')).unwrap_or(false) {
        num.push(src[i]);
        num.push(src[i + 1]);
        i += 2;
        let hex_start = i;
        while i < src.len() && (src[i].is_ascii_digit() || "abcdefABCDEF".contains(src[i])) {
            num.push(src[i]);
            i += 1;
        }

        if i < src.len() && src[i].is_alphanumeric() {
            while i < src.len() && src[i].is_alphanumeric() {
                num.push(src[i]);
                i += 1;
            }
            return invalid_number(num, line, i, "invalid hex literal");
        }
        if i == hex_start {
            return invalid_number(num, line, i, "missing hex digits");
        }
        if !is_valid_hex(&num) {
            return invalid_number(num, line, i, "illegal hex literal");
        }
        return (Token::new(INTEGER_CODE, num, line), i, None);
    }

    while i < src.len() {
        let c = src[i];
        let is_exponent_sign = (c == '+' || c == '-')
            && matches!(num.chars().last(), Some('e') | Some('E'));
        if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || is_exponent_sign {
            num.push(c);
            i += 1;
        } else {
            break;
        }
    }

    if i < src.len() && src[i].is_alphabetic() {
        while i < src.len() && src[i].is_alphanumeric() {
            num.push(src[i]);
            i += 1;
        }
        return invalid_number(num, line, i, "invalid numeric literal");
    }

    if num.starts_with('0') && num != "0" && !num.contains('.') && !num.to_ascii_lowercase().contains('e') {
        if is_valid_octal(&num) {
            return (Token::new(INTEGER_CODE, num, line), i, None);
        }
        return invalid_number(num, line, i, "illegal octal literal");
    }

    if num.contains('.') || num.to_ascii_lowercase().contains('e') {
        if is_valid_float(&num) {
            return (Token::new(FLOAT_CODE, num, line), i, None);
        }
        return invalid_number(num, line, i, "incomplete or invalid float literal");
    }

    if !is_valid_decimal(&num) {
        return invalid_number(num, line, i, "invalid decimal literal");
    }
    (Token::new(INTEGER_CODE, num, line), i, None)
}

fn invalid_number(num: String, line: u32, next_index: usize, reason: &str) -> (Token, usize, Option<String>) {
    let msg = format!("{reason} \"{num}\"");
    (Token::new(INVALID_CODE, num, line), next_index, Some(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<(u16, String)> {
        lexical_analysis(src)
            .tokens
            .into_iter()
            .map(|t| (t.code, t.lexeme))
            .collect()
    }

    #[test]
    fn whitespace_and_comments_yield_no_tokens() {
        let result = lexical_analysis("   \n /* block */ \n // line\n");
        assert!(result.tokens.is_empty());
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn unterminated_block_comment_reports_one_error() {
        let result = lexical_analysis("/* never closed");
        assert_eq!(result.diagnostics.error_count(), 1);
    }

    #[test]
    fn numeric_classification_matches_boundary_cases() {
        assert_eq!(kinds("0")[0].0, INTEGER_CODE);
        assert!(lexical_analysis("08").diagnostics.has_errors());
        assert!(lexical_analysis("0x").diagnostics.has_errors());
        assert!(lexical_analysis("1.2.3").diagnostics.has_errors());
    }

    #[test]
    fn keyword_vs_identifier() {
        let toks = kinds("int x");
        assert_eq!(toks[0], (1, "int".to_string()));
        assert_eq!(toks[1].0, IDENTIFIER_CODE);
    }

    #[test]
    fn greedy_operator_matching_and_illegal_operator_detection() {
        let toks = kinds("<<= x");
        assert_eq!(toks[0].0, INVALID_CODE);
    }

    #[test]
    fn spaceless_arithmetic_does_not_swallow_the_operator_into_the_number() {
        let result = lexical_analysis("1+2");
        assert!(!result.diagnostics.has_errors());
        let toks = kinds("1+2");
        assert_eq!(toks, vec![(INTEGER_CODE, "1".to_string()), (21, "+".to_string()), (INTEGER_CODE, "2".to_string())]);

        let result = lexical_analysis("1-2");
        assert!(!result.diagnostics.has_errors());
        let toks = kinds("1-2");
        assert_eq!(toks, vec![(INTEGER_CODE, "1".to_string()), (22, "-".to_string()), (INTEGER_CODE, "2".to_string())]);
    }

    #[test]
    fn exponent_sign_is_still_consumed_into_a_float_literal() {
        let toks = kinds("1e+2");
        assert_eq!(toks, vec![(FLOAT_CODE, "1e+2".to_string())]);

        let toks = kinds("1e-2");
        assert_eq!(toks, vec![(FLOAT_CODE, "1e-2".to_string())]);
    }
}
