//! FIRST/FOLLOW fixpoint computation over a finalized grammar.

use std::collections::{BTreeSet, HashMap};

use crate::grammar::{Grammar, EPSILON};

pub type SymbolSet = BTreeSet<String>;
pub type FirstMap = HashMap<String, SymbolSet>;
pub type FollowMap = HashMap<String, SymbolSet>;

/// Computes FIRST(A) for every non-terminal `A` by fixpoint iteration.
pub fn compute_first(grammar: &Grammar) -> FirstMap {
    let mut first: FirstMap = grammar
        .nonterminals()
        .iter()
        .map(|a| (a.clone(), SymbolSet::new()))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for head in grammar.nonterminals() {
            for prod in grammar.productions_of(head) {
                let mut all_epsilon = true;
                for symbol in &prod.body {
                    if !grammar.is_nonterminal(symbol) {
                        changed |= first.get_mut(head).unwrap().insert(symbol.clone());
                        all_epsilon = false;
                        break;
                    }
                    let sym_first = first.get(symbol).cloned().unwrap_or_default();
                    let before = first[head].len();
                    first
                        .get_mut(head)
                        .unwrap()
                        .extend(sym_first.iter().filter(|s| s.as_str() != EPSILON).cloned());
                    if first[head].len() != before {
                        changed = true;
                    }
                    if !sym_first.contains(EPSILON) {
                        all_epsilon = false;
                        break;
                    }
                }
                if all_epsilon {
                    changed |= first.get_mut(head).unwrap().insert(EPSILON.to_string());
                }
            }
        }
    }
    first
}

/// FIRST of a symbol sequence, used both internally for FOLLOW and by the
/// parse-table builder for whole production bodies.
pub fn first_of_sequence(grammar: &Grammar, first: &FirstMap, seq: &[String]) -> SymbolSet {
    let mut result = SymbolSet::new();
    for symbol in seq {
        if symbol == EPSILON {
            result.insert(EPSILON.to_string());
            return result;
        }
        if !grammar.is_nonterminal(symbol) {
            result.insert(symbol.clone());
            return result;
        }
        let sym_first = first.get(symbol).cloned().unwrap_or_default();
        result.extend(sym_first.iter().filter(|s| s.as_str() != EPSILON).cloned());
        if !sym_first.contains(EPSILON) {
            return result;
        }
    }
    result.insert(EPSILON.to_string());
    result
}

/// Computes FOLLOW(A) for every non-terminal `A` by fixpoint iteration.
pub fn compute_follow(grammar: &Grammar, first: &FirstMap, start_symbol: &str) -> FollowMap {
    let mut follow: FollowMap = grammar
        .nonterminals()
        .iter()
        .map(|a| (a.clone(), SymbolSet::new()))
        .collect();
    follow.entry(start_symbol.to_string()).or_default().insert("$".to_string());

    let mut changed = true;
    while changed {
        changed = false;
        for head in grammar.nonterminals() {
            for prod in grammar.productions_of(head) {
                let mut trailer = follow[head].clone();
                for symbol in prod.body.iter().rev() {
                    if grammar.is_nonterminal(symbol) {
                        let before = follow[symbol].len();
                        follow
                            .get_mut(symbol)
                            .unwrap()
                            .extend(trailer.iter().filter(|s| s.as_str() != EPSILON).cloned());
                        if follow[symbol].len() != before {
                            changed = true;
                        }
                        let sym_first = first.get(symbol).cloned().unwrap_or_default();
                        if sym_first.contains(EPSILON) {
                            trailer.extend(sym_first.iter().filter(|s| s.as_str() != EPSILON).cloned());
                        } else {
                            trailer = sym_first;
                        }
                    } else {
                        trailer = SymbolSet::from([symbol.clone()]);
                    }
                }
            }
        }
    }
    follow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::load_grammar_from_str;

    #[test]
    fn first_and_follow_for_classic_expr_grammar() {
        let mut g = Grammar::new();
        load_grammar_from_str(
            "E -> T E'\n\
             E' -> + T E' | ε\n\
             T -> F T'\n\
             T' -> * F T' | ε\n\
             F -> ( E ) | id\n",
            &mut g,
        );
        g.finalize(false, false);

        let first = compute_first(&g);
        assert!(first["F"].contains("("));
        assert!(first["F"].contains("id"));
        assert!(first["E"].contains("("));
        assert!(first["E"].contains("id"));

        let follow = compute_follow(&g, &first, "E");
        assert!(follow["E"].contains("$"));
        assert!(follow["E"].contains(")"));
        assert!(follow["T"].contains("+"));
    }
}
