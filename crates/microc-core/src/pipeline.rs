//! Orchestrates lex -> parse -> reduce -> analyze -> build-IR as a single
//! call that never panics and never returns `Result` at the boundary: every
//! stage failure is folded into `PipelineResult::status`.

use serde::Serialize;
use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::grammar::{default_grammar, Grammar};
use crate::ir::{IrBuilder, Quadruple};
use crate::lexer::{self, Backend};
use crate::parse_table::{build_parse_table, ParseTable};
use crate::parser::{parse_with_tree, Node};
use crate::semantic::{ScopedSymbolTable, SemanticAnalyzer};
use crate::token::Token;
use crate::tree_reducer::cst_to_ast;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("lexical analysis failed")]
    Lex,
    #[error("parsing failed")]
    Parse,
    #[error("internal: parse succeeded but produced no reducible tree")]
    EmptyAst,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub backend: Backend,
    pub start_symbol: String,
    pub grammar: Option<Grammar>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Manual,
            start_symbol: "Program".to_string(),
            grammar: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Ok,
    LexErrors,
    ParseError,
    SemanticErrors,
}

pub struct PipelineResult {
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<String>,
    pub cst: Option<Node>,
    pub ast: Option<Node>,
    pub symbols: Option<ScopedSymbolTable>,
    pub constants: Vec<(String, String)>,
    pub quadruples: Vec<Quadruple>,
    pub semantic_errors: Vec<String>,
    pub parse_table_is_ll1: bool,
    pub status: Status,
    pub error: Option<PipelineError>,
}

/// Runs the full pipeline over `source`. Always returns a `PipelineResult`;
/// a stage failure is recorded in `status`/`error` rather than propagated.
pub fn compile(source: &str, config: &PipelineConfig) -> PipelineResult {
    let lexed = lexer::tokenize(source, config.backend);
    let lex_errors = lexed.diagnostics.to_line_strings();

    if lexed.diagnostics.has_errors() {
        return PipelineResult {
            tokens: lexed.tokens,
            lex_errors,
            cst: None,
            ast: None,
            symbols: None,
            constants: Vec::new(),
            quadruples: Vec::new(),
            semantic_errors: Vec::new(),
            parse_table_is_ll1: true,
            status: Status::LexErrors,
            error: Some(PipelineError::Lex),
        };
    }

    let mut grammar = config.grammar.clone().unwrap_or_else(default_grammar);
    grammar.finalize(true, true);
    let table: ParseTable = build_parse_table(&grammar, &config.start_symbol);

    let cst = match parse_with_tree(&grammar, &table, &config.start_symbol, &lexed.tokens) {
        Ok(tree) => tree,
        Err(diagnostics) => {
            return PipelineResult {
                tokens: lexed.tokens,
                lex_errors,
                cst: None,
                ast: None,
                symbols: None,
                constants: Vec::new(),
                quadruples: Vec::new(),
                semantic_errors: diagnostics.to_line_strings(),
                parse_table_is_ll1: table.is_ll1,
                status: Status::ParseError,
                error: Some(PipelineError::Parse),
            };
        }
    };

    let ast = match cst_to_ast(&cst) {
        Some(ast) => ast,
        None => {
            return PipelineResult {
                tokens: lexed.tokens,
                lex_errors,
                cst: Some(cst),
                ast: None,
                symbols: None,
                constants: Vec::new(),
                quadruples: Vec::new(),
                semantic_errors: vec!["reduced tree was empty".to_string()],
                parse_table_is_ll1: table.is_ll1,
                status: Status::ParseError,
                error: Some(PipelineError::EmptyAst),
            };
        }
    };

    let (symbols, constants, semantic_diagnostics): (ScopedSymbolTable, _, Diagnostics) =
        SemanticAnalyzer::new().analyze(&ast);
    let semantic_errors = semantic_diagnostics.to_line_strings();

    let quadruples = IrBuilder::new().build(&ast);

    let status = if semantic_diagnostics.has_errors() {
        Status::SemanticErrors
    } else {
        Status::Ok
    };

    PipelineResult {
        tokens: lexed.tokens,
        lex_errors,
        cst: Some(cst),
        ast: Some(ast),
        symbols: Some(symbols),
        constants,
        quadruples,
        semantic_errors,
        parse_table_is_ll1: table.is_ll1,
        status,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_minimal_program_end_to_end() {
        let source = "int main() { int x; x = 1; return x; }";
        let result = compile(source, &PipelineConfig::default());
        assert_eq!(result.status, Status::Ok);
        assert!(!result.quadruples.is_empty());
    }

    #[test]
    fn lex_errors_stop_the_pipeline_before_parsing() {
        let source = "int x = @;";
        let result = compile(source, &PipelineConfig::default());
        assert_eq!(result.status, Status::LexErrors);
        assert!(result.cst.is_none());
    }
}
