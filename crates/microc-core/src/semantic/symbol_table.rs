//! Scope-stack symbol table: a LIFO stack of single-scope maps, searched
//! innermost-first, with the outermost (global) scope never popped.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: String,
    pub line: u32,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            line,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScopedSymbolTable {
    scopes: Vec<HashMap<String, SymbolInfo>>,
}

impl ScopedSymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope. The outermost (global) scope can never be
    /// popped; calling this at depth 1 is a no-op.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declares `info` in the current scope. Returns the previously declared
    /// `SymbolInfo` as `Err` on redeclaration within the same scope.
    pub fn declare(&mut self, info: SymbolInfo) -> Result<(), SymbolInfo> {
        let current = self.scopes.last_mut().expect("global scope always present");
        if let Some(existing) = current.get(&info.name) {
            return Err(existing.clone());
        }
        current.insert(info.name.clone(), info);
        Ok(())
    }

    /// Looks up `name` from the innermost scope outward.
    pub fn lookup(&self, name: &str) -> Option<&SymbolInfo> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().map(|s| s.contains_key(name)).unwrap_or(false)
    }
}

impl Default for ScopedSymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redeclaration_in_same_scope_is_rejected() {
        let mut table = ScopedSymbolTable::new();
        table.declare(SymbolInfo::new("x", "variable", 1)).unwrap();
        assert!(table.declare(SymbolInfo::new("x", "variable", 2)).is_err());
    }

    #[test]
    fn inner_scope_shadows_outer_and_unwinds_on_exit() {
        let mut table = ScopedSymbolTable::new();
        table.declare(SymbolInfo::new("x", "variable", 1)).unwrap();
        table.enter_scope();
        table.declare(SymbolInfo::new("y", "variable", 2)).unwrap();
        assert!(table.lookup("x").is_some());
        assert!(table.lookup("y").is_some());
        table.exit_scope();
        assert!(table.lookup("y").is_none());
        assert!(table.lookup("x").is_some());
    }

    #[test]
    fn global_scope_never_pops_below_one() {
        let mut table = ScopedSymbolTable::new();
        table.exit_scope();
        assert_eq!(table.depth(), 1);
    }
}
