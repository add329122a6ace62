//! LL(1) table-driven predictive parser producing a concrete syntax tree.
//!
//! Driven by a position cursor over the token stream and the non-terminal
//! currently expected; at each non-terminal the next production is looked
//! up in the table by lookahead, never by backtracking.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Location};
use crate::grammar::{Grammar, EPSILON};
use crate::parse_table::ParseTable;
use crate::token::{token_to_terminal, Token};

/// A node in either the concrete or the abstract syntax tree. The label
/// space is open (it mirrors whatever non-terminal or terminal produced the
/// node), so this is a generic labelled tree rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub label: String,
    pub value: Option<String>,
    pub line: u32,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(label: impl Into<String>, value: impl Into<String>, line: u32) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
            line,
            children: Vec::new(),
        }
    }

    pub fn interior(label: impl Into<String>, children: Vec<Node>, line: u32) -> Self {
        Self {
            label: label.into(),
            value: None,
            line,
            children,
        }
    }

    pub fn epsilon() -> Self {
        Self {
            label: EPSILON.to_string(),
            value: None,
            line: 0,
            children: Vec::new(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.label == EPSILON
    }

    /// Renders an indented outline, chiefly useful in tests and CLI `--emit tree`.
    pub fn print_tree(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        match &self.value {
            Some(v) => out.push_str(&format!("{}({v})\n", self.label)),
            None => out.push_str(&format!("{}\n", self.label)),
        }
        for child in &self.children {
            child.print_tree(depth + 1, out);
        }
    }
}

struct Cursor<'a> {
    tokens: &'a [Token],
    terminals: Vec<&'a str>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let terminals = tokens.iter().map(token_to_terminal).collect();
        Self { tokens, terminals, pos: 0 }
    }

    fn lookahead(&self) -> &str {
        self.terminals.get(self.pos).copied().unwrap_or("$")
    }

    fn current_line(&self) -> u32 {
        self.tokens.get(self.pos).map(|t| t.line).unwrap_or_else(|| {
            self.tokens.last().map(|t| t.line).unwrap_or(1)
        })
    }

    fn advance(&mut self) -> &'a Token {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// Parses `tokens` against `grammar`'s `table`, starting from `start_symbol`,
/// producing a concrete syntax tree rooted at `start_symbol`.
pub fn parse_with_tree(
    grammar: &Grammar,
    table: &ParseTable,
    start_symbol: &str,
    tokens: &[Token],
) -> Result<Node, Diagnostics> {
    let mut diagnostics = Diagnostics::new();
    let mut cursor = Cursor::new(tokens);

    let root = parse_symbol(grammar, table, start_symbol, &mut cursor, &mut diagnostics);

    if diagnostics.has_errors() {
        return Err(diagnostics);
    }
    let root = root.expect("no diagnostics were recorded but parsing still failed");

    if !cursor.at_end() {
        diagnostics
            .error("trailing input after a complete parse".to_string(), Location::Line(cursor.current_line()))
            .emit();
        return Err(diagnostics);
    }

    Ok(root)
}

fn parse_symbol(
    grammar: &Grammar,
    table: &ParseTable,
    symbol: &str,
    cursor: &mut Cursor<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<Node> {
    if symbol == EPSILON {
        return Some(Node::epsilon());
    }

    if !grammar.is_nonterminal(symbol) {
        let lookahead = cursor.lookahead();
        if symbol == lookahead {
            let line = cursor.current_line();
            let token = cursor.advance();
            return Some(Node::leaf(symbol, token.lexeme.clone(), line));
        }
        diagnostics
            .error(
                format!("expected \"{symbol}\" but found \"{lookahead}\""),
                Location::Line(cursor.current_line()),
            )
            .emit();
        return None;
    }

    let line = cursor.current_line();
    let lookahead = cursor.lookahead().to_string();
    let production = match table.get(symbol, &lookahead) {
        Some(p) => p.clone(),
        None => {
            diagnostics
                .error(
                    format!("no rule for non-terminal \"{symbol}\" on lookahead \"{lookahead}\""),
                    Location::Line(line),
                )
                .emit();
            return None;
        }
    };

    let mut children = Vec::with_capacity(production.body.len());
    for sym in &production.body {
        match parse_symbol(grammar, table, sym, cursor, diagnostics) {
            Some(child) => children.push(child),
            None => return None,
        }
    }

    Some(Node::interior(symbol, children, line))
}
