//! LL(1) predictive parse table construction.

use std::collections::HashMap;

use crate::first_follow::{compute_first, compute_follow, first_of_sequence};
use crate::grammar::{Grammar, Production, EPSILON};

pub type TableKey = (String, String);

pub struct ParseTable {
    pub table: HashMap<TableKey, Production>,
    pub is_ll1: bool,
    pub terminals: Vec<String>,
}

impl ParseTable {
    pub fn get(&self, nonterminal: &str, terminal: &str) -> Option<&Production> {
        self.table.get(&(nonterminal.to_string(), terminal.to_string()))
    }
}

/// Builds the LL(1) table for `grammar` rooted at `start_symbol`. The first
/// binding to a given (non-terminal, terminal) cell wins; any later attempt
/// to bind the same cell sets `is_ll1 = false` without overwriting it.
pub fn build_parse_table(grammar: &Grammar, start_symbol: &str) -> ParseTable {
    let first = compute_first(grammar);
    let follow = compute_follow(grammar, &first, start_symbol);

    let mut terminals: Vec<String> = grammar.terminals().iter().cloned().collect();
    terminals.push("$".to_string());

    let mut table: HashMap<TableKey, Production> = HashMap::new();
    let mut is_ll1 = true;

    let mut bind = |table: &mut HashMap<TableKey, Production>, key: TableKey, prod: &Production| {
        if table.contains_key(&key) {
            is_ll1 = false;
        } else {
            table.insert(key, prod.clone());
        }
    };

    for head in grammar.nonterminals() {
        for prod in grammar.productions_of(head) {
            let first_set = first_of_sequence(grammar, &first, &prod.body);

            for terminal in first_set.iter().filter(|t| t.as_str() != EPSILON) {
                bind(&mut table, (head.clone(), terminal.clone()), prod);
            }

            if first_set.contains(EPSILON) {
                for terminal in &follow[head] {
                    bind(&mut table, (head.clone(), terminal.clone()), prod);
                }
            }
        }
    }

    ParseTable {
        table,
        is_ll1,
        terminals,
    }
}
