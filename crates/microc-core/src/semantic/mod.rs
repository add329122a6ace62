//! Scoped symbol table and a tree-walking semantic analyzer.

mod symbol_table;

pub use symbol_table::{ScopedSymbolTable, SymbolInfo};

use crate::diagnostics::{Diagnostics, Location};
use crate::parser::Node;

/// Interns global constant literals under synthetic names (`C1`, `C2`, ...)
/// independent of lexical scope, and walks the AST checking declaration and
/// use-before-declaration rules.
pub struct SemanticAnalyzer {
    pub symbols: ScopedSymbolTable,
    pub constants: Vec<(String, String)>,
    next_constant: u32,
    diagnostics: Diagnostics,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self {
            symbols: ScopedSymbolTable::new(),
            constants: Vec::new(),
            next_constant: 1,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn analyze(mut self, ast: &Node) -> (ScopedSymbolTable, Vec<(String, String)>, Diagnostics) {
        self.visit(ast);
        (self.symbols, self.constants, self.diagnostics)
    }

    fn intern_constant(&mut self, literal: &str) -> String {
        if let Some((name, _)) = self.constants.iter().find(|(_, v)| v == literal) {
            return name.clone();
        }
        let name = format!("C{}", self.next_constant);
        self.next_constant += 1;
        self.constants.push((name.clone(), literal.to_string()));
        name
    }

    fn visit(&mut self, node: &Node) {
        match node.label.as_str() {
            "Program" => self.visit_program(node),
            "Decl" => self.visit_decl(node),
            "CompoundStmt" => self.visit_compound_stmt(node),
            "AssignStmt" => self.visit_assign_stmt(node),
            "ForStmt" => self.visit_for_stmt(node),
            "ID" => self.visit_id_use(node),
            "INT_LITERAL" | "FLOAT_LITERAL" => {
                if let Some(v) = &node.value {
                    self.intern_constant(v);
                }
                self.visit_children(node);
            }
            _ => self.visit_children(node),
        }
    }

    fn visit_children(&mut self, node: &Node) {
        for child in &node.children {
            self.visit(child);
        }
    }

    fn visit_program(&mut self, node: &Node) {
        self.visit_children(node);
    }

    fn visit_decl(&mut self, node: &Node) {
        let Some(name_node) = node.children.get(1) else {
            self.visit_children(node);
            return;
        };
        let Some(name) = &name_node.value else {
            self.visit_children(node);
            return;
        };

        // `DeclTail` is a helper label (ends in "Tail"), so the tree reducer
        // splices its children straight into `Decl` instead of nesting them
        // one level down; `CompoundStmt` can therefore appear anywhere among
        // `node.children`, not just at a fixed index.
        let is_function = node.children.iter().any(|c| c.label == "CompoundStmt");

        let kind = if is_function { "function" } else { "variable" };
        if let Err(existing) = self.symbols.declare(SymbolInfo::new(name.clone(), kind, node.line)) {
            self.diagnostics
                .error(
                    format!("redeclaration of \"{name}\" (first declared on line {})", existing.line),
                    Location::Line(node.line),
                )
                .emit();
        }

        for child in &node.children {
            if child.label == "CompoundStmt" {
                self.visit_compound_stmt(child);
            } else if child.label != "ID" && child.label != "Type" {
                self.visit(child);
            }
        }
    }

    fn visit_compound_stmt(&mut self, node: &Node) {
        self.symbols.enter_scope();
        self.visit_children(node);
        self.symbols.exit_scope();
    }

    fn visit_assign_stmt(&mut self, node: &Node) {
        if let Some(target) = node.children.first() {
            if let Some(name) = &target.value {
                if self.symbols.lookup(name).is_none() {
                    self.diagnostics
                        .error(format!("assignment to undeclared identifier \"{name}\""), Location::Line(node.line))
                        .emit();
                }
            }
        }
        for child in node.children.iter().skip(1) {
            self.visit(child);
        }
    }

    fn visit_for_stmt(&mut self, node: &Node) {
        self.symbols.enter_scope();
        self.visit_children(node);
        self.symbols.exit_scope();
    }

    fn visit_id_use(&mut self, node: &Node) {
        if let Some(name) = &node.value {
            if self.symbols.lookup(name).is_none() {
                self.diagnostics
                    .error(format!("use of undeclared identifier \"{name}\""), Location::Line(node.line))
                    .emit();
            }
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(label: &str, value: &str, line: u32) -> Node {
        Node::leaf(label, value, line)
    }

    #[test]
    fn flags_use_before_declaration() {
        let ast = Node::interior(
            "Program",
            vec![Node::interior(
                "AssignStmt",
                vec![leaf("ID", "x", 1), leaf("INT_LITERAL", "1", 1)],
                1,
            )],
            1,
        );
        let (_, _, diagnostics) = SemanticAnalyzer::new().analyze(&ast);
        assert!(diagnostics.has_errors());
    }

    #[test]
    fn interns_distinct_literals_once_each() {
        let ast = Node::interior(
            "Program",
            vec![leaf("INT_LITERAL", "7", 1), leaf("INT_LITERAL", "7", 1), leaf("INT_LITERAL", "8", 1)],
            1,
        );
        let (_, constants, _) = SemanticAnalyzer::new().analyze(&ast);
        assert_eq!(constants.len(), 2);
    }

    #[test]
    fn function_declaration_is_classified_as_a_function_not_a_variable() {
        // `DeclTail -> "(" ParamList ")" CompoundStmt` splices straight into
        // `Decl`'s children, so `main`'s shape here is `[Type, ID, "(", ")",
        // CompoundStmt]`, exactly as the real reducer would produce it.
        let ast = Node::interior(
            "Program",
            vec![Node::interior(
                "Decl",
                vec![
                    leaf("Type", "int", 1),
                    leaf("ID", "main", 1),
                    leaf("(", "(", 1),
                    leaf(")", ")", 1),
                    Node::interior("CompoundStmt", vec![], 1),
                ],
                1,
            )],
            1,
        );
        let (symbols, _, diagnostics) = SemanticAnalyzer::new().analyze(&ast);
        assert!(!diagnostics.has_errors());
        assert_eq!(symbols.lookup("main").map(|s| s.kind.clone()), Some("function".to_string()));
    }

    #[test]
    fn declares_variable_then_allows_its_use() {
        let ast = Node::interior(
            "Program",
            vec![
                Node::interior(
                    "Decl",
                    vec![leaf("Type", "int", 1), leaf("ID", "x", 1), leaf("VarDeclPrime", ";", 1)],
                    1,
                ),
                Node::interior("AssignStmt", vec![leaf("ID", "x", 2), leaf("INT_LITERAL", "1", 2)], 2),
            ],
            1,
        );
        let (_, _, diagnostics) = SemanticAnalyzer::new().analyze(&ast);
        assert!(!diagnostics.has_errors());
    }
}
