//! Context-free grammar storage, left-recursion elimination, and
//! left-factoring.

mod default;

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;

pub use default::default_grammar;

/// The empty-body sentinel.
pub const EPSILON: &str = "ε";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub head: String,
    pub body: Vec<String>,
}

impl Production {
    pub fn new(head: impl Into<String>, body: Vec<String>) -> Self {
        Self {
            head: head.into(),
            body,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.body.len() == 1 && self.body[0] == EPSILON
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rhs = if self.body.is_empty() {
            EPSILON.to_string()
        } else {
            self.body.join(" ")
        };
        write!(f, "{} -> {}", self.head, rhs)
    }
}

/// Stores all productions, grouped by head, preserving insertion order for
/// determinism. Non-terminals and terminals are (re)classified on
/// `finalize`.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    productions: IndexMap<String, Vec<Production>>,
    nonterminals: BTreeSet<String>,
    terminals: BTreeSet<String>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a production. Does not classify terminals yet; that happens
    /// in `finalize`.
    pub fn add_production(&mut self, head: impl Into<String>, body: Vec<String>) {
        let head = head.into();
        self.nonterminals.insert(head.clone());
        self.productions
            .entry(head.clone())
            .or_default()
            .push(Production::new(head, body));
    }

    pub fn productions_of(&self, head: &str) -> &[Production] {
        self.productions.get(head).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn all_productions(&self) -> Vec<&Production> {
        self.productions.values().flatten().collect()
    }

    pub fn nonterminals(&self) -> &BTreeSet<String> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &BTreeSet<String> {
        &self.terminals
    }

    pub fn is_nonterminal(&self, symbol: &str) -> bool {
        self.nonterminals.contains(symbol)
    }

    /// Eliminates direct left recursion, then extracts left factors to
    /// fixpoint, then classifies terminals. Idempotent: a second call on an
    /// already-finalized grammar is a no-op transformation-wise (it still
    /// re-runs the classification pass, which is pure).
    pub fn finalize(&mut self, eliminate_lr: bool, factor: bool) {
        if eliminate_lr {
            self.eliminate_direct_left_recursion();
        }
        if factor {
            self.left_factor_to_fixpoint();
        }
        self.classify_terminals();
    }

    fn eliminate_direct_left_recursion(&mut self) {
        let mut rebuilt: IndexMap<String, Vec<Vec<String>>> = IndexMap::new();
        let existing_heads: BTreeSet<String> = self.productions.keys().cloned().collect();

        for (head, prods) in &self.productions {
            let mut alpha: Vec<Vec<String>> = Vec::new();
            let mut beta: Vec<Vec<String>> = Vec::new();
            for p in prods {
                if p.body.first().map(|s| s == head).unwrap_or(false) {
                    alpha.push(p.body[1..].to_vec());
                } else {
                    beta.push(p.body.clone());
                }
            }

            if alpha.is_empty() {
                rebuilt.insert(head.clone(), prods.iter().map(|p| p.body.clone()).collect());
                continue;
            }

            let mut fresh = format!("{head}'");
            while existing_heads.contains(&fresh) || rebuilt.contains_key(&fresh) {
                fresh.push('\'');
            }

            let a_bodies: Vec<Vec<String>> = beta
                .into_iter()
                .map(|mut b| {
                    b.push(fresh.clone());
                    b
                })
                .collect();
            let mut aprime_bodies: Vec<Vec<String>> = alpha
                .into_iter()
                .map(|mut a| {
                    a.push(fresh.clone());
                    a
                })
                .collect();
            aprime_bodies.push(vec![EPSILON.to_string()]);

            rebuilt.insert(head.clone(), a_bodies);
            rebuilt.insert(fresh, aprime_bodies);
        }

        self.rebuild_from_bodies(rebuilt);
    }

    fn left_factor_to_fixpoint(&mut self) {
        loop {
            let mut bodies_map: IndexMap<String, Vec<Vec<String>>> = self
                .productions
                .iter()
                .map(|(h, ps)| (h.clone(), ps.iter().map(|p| p.body.clone()).collect()))
                .collect();

            let mut changed = false;
            'outer: for head in self.productions.keys().cloned().collect::<Vec<_>>() {
                let bodies = bodies_map.get(&head).cloned().unwrap_or_default();
                let mut groups: IndexMap<String, Vec<Vec<String>>> = IndexMap::new();
                for body in &bodies {
                    let key = body.first().cloned().unwrap_or_else(|| EPSILON.to_string());
                    groups.entry(key).or_default().push(body.clone());
                }

                for (key, group) in &groups {
                    if key != EPSILON && group.len() > 1 {
                        let mut fresh = format!("{head}'");
                        while bodies_map.contains_key(&fresh) {
                            fresh.push('\'');
                        }

                        let others: Vec<Vec<String>> = bodies
                            .iter()
                            .filter(|b| b.first() != Some(key))
                            .cloned()
                            .collect();
                        let mut new_head_bodies = others;
                        new_head_bodies.push(vec![key.clone(), fresh.clone()]);

                        let tails: Vec<Vec<String>> = group
                            .iter()
                            .map(|b| {
                                let tail = b[1..].to_vec();
                                if tail.is_empty() {
                                    vec![EPSILON.to_string()]
                                } else {
                                    tail
                                }
                            })
                            .collect();

                        bodies_map.insert(head.clone(), new_head_bodies);
                        bodies_map.insert(fresh, tails);
                        changed = true;
                        break 'outer;
                    }
                }
            }

            if !changed {
                break;
            }
            self.rebuild_from_bodies(bodies_map);
        }
    }

    fn rebuild_from_bodies(&mut self, bodies_map: IndexMap<String, Vec<Vec<String>>>) {
        self.productions.clear();
        self.nonterminals.clear();
        for (head, bodies) in bodies_map {
            for body in bodies {
                self.add_production(head.clone(), body);
            }
        }
    }

    fn classify_terminals(&mut self) {
        self.terminals.clear();
        for prods in self.productions.values() {
            for prod in prods {
                for sym in &prod.body {
                    if sym != EPSILON && !self.nonterminals.contains(sym) {
                        self.terminals.insert(sym.clone());
                    }
                }
            }
        }
    }
}

/// Loads a grammar from the textual format described in the external
/// interfaces: `Head -> alt1 | alt2 | ...`, one rule per non-blank,
/// non-`#` line. Both `->` and `→` are accepted.
pub fn load_grammar_from_str(text: &str, grammar: &mut Grammar) {
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (head, rhs) = if let Some(idx) = line.find('→') {
            (&line[..idx], &line[idx + '→'.len_utf8()..])
        } else if let Some(idx) = line.find("->") {
            (&line[..idx], &line[idx + 2..])
        } else {
            continue;
        };
        let head = head.trim().to_string();
        for alt in rhs.split('|') {
            let alt = alt.trim();
            let body = if alt == EPSILON {
                Vec::new()
            } else {
                alt.split_whitespace()
                    .map(|tok| tok.trim_matches(|c| c == '\'' || c == '"').to_string())
                    .collect()
            };
            let body = if body.is_empty() {
                vec![EPSILON.to_string()]
            } else {
                body
            };
            grammar.add_production(head.clone(), body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eliminates_direct_left_recursion() {
        let mut g = Grammar::new();
        g.add_production("E", vec!["E".into(), "+".into(), "T".into()]);
        g.add_production("E", vec!["T".into()]);
        g.finalize(true, false);

        let e_prods = g.productions_of("E");
        assert!(e_prods.iter().all(|p| p.body.first() != Some(&"E".to_string())));
        assert!(g.nonterminals().contains("E'"));
    }

    #[test]
    fn left_factors_common_prefixes() {
        let mut g = Grammar::new();
        g.add_production("S", vec!["a".into(), "B".into()]);
        g.add_production("S", vec!["a".into(), "C".into()]);
        g.finalize(false, true);

        let s_prods = g.productions_of("S");
        assert_eq!(s_prods.len(), 1);
        assert_eq!(s_prods[0].body[0], "a");
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut g = Grammar::new();
        g.add_production("E", vec!["E".into(), "+".into(), "T".into()]);
        g.add_production("E", vec!["T".into()]);
        g.add_production("T", vec!["id".into()]);
        g.finalize(true, true);
        let first: Vec<String> = g.all_productions().iter().map(|p| p.to_string()).collect();
        g.finalize(true, true);
        let second: Vec<String> = g.all_productions().iter().map(|p| p.to_string()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn loads_grammar_from_text() {
        let mut g = Grammar::new();
        load_grammar_from_str("S -> a B | ε\nB -> b\n", &mut g);
        g.finalize(true, true);
        assert!(g.is_nonterminal("S"));
        assert!(g.terminals().contains("a"));
    }
}
