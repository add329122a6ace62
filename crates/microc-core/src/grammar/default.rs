//! The built-in C-like subset grammar, supplemented from the original
//! sample driver's grammar construction, with an explicit `ForStmt`
//! production added so the IR builder's `for`-loop lowering is always
//! reachable from a successful parse, `Call`/`ArgList` productions
//! added so function calls parse at all (`ExprPrimary` otherwise had no
//! way to reach a call expression), and `%` added to `ExprMulTail` so
//! the `MOD` quadruple opcode is reachable from source.

use super::Grammar;

macro_rules! prod {
    ($g:expr, $head:expr, $($sym:expr),+ $(,)?) => {
        $g.add_production($head, vec![$($sym.to_string()),+])
    };
}

pub fn default_grammar() -> Grammar {
    let mut g = Grammar::new();

    prod!(g, "Program", "PPList", "DeclList", "StmtList");
    prod!(g, "PPList", "PPDirective", "PPList");
    prod!(g, "PPList", "ε");
    prod!(g, "DeclList", "Decl", "DeclList");
    prod!(g, "DeclList", "ε");

    prod!(g, "PPDirective", "#", "include", "<", "ID", ".", "ID", ">");
    prod!(g, "Decl", "Type", "ID", "DeclTail");

    prod!(g, "DeclTail", "(", "ParamList", ")", "CompoundStmt");
    prod!(g, "DeclTail", "VarDeclPrime");

    prod!(g, "VarDeclPrime", "=", "Expr", ";");
    prod!(g, "VarDeclPrime", ";");

    prod!(g, "Type", "int");
    prod!(g, "Type", "float");
    prod!(g, "Type", "void");

    prod!(g, "ParamList", "Param", "ParamListTail");
    prod!(g, "ParamList", "ε");
    prod!(g, "ParamListTail", ",", "Param", "ParamListTail");
    prod!(g, "ParamListTail", "ε");
    prod!(g, "Param", "Type", "ID");

    prod!(g, "Stmt", "Decl");
    prod!(g, "Stmt", "AssignStmt");
    prod!(g, "Stmt", "ExprStmt");
    prod!(g, "Stmt", "CompoundStmt");
    prod!(g, "Stmt", "IfStmt");
    prod!(g, "Stmt", "WhileStmt");
    prod!(g, "Stmt", "ForStmt");
    prod!(g, "Stmt", "ReturnStmt");

    prod!(g, "AssignStmt", "ID", "=", "Expr", ";");
    prod!(g, "ExprStmt", "Expr", ";");
    prod!(g, "ExprStmt", ";");

    prod!(g, "IfStmt", "if", "(", "Expr", ")", "Stmt", "ElseStmt");
    prod!(g, "ElseStmt", "else", "Stmt");
    prod!(g, "ElseStmt", "ε");

    prod!(g, "WhileStmt", "while", "(", "Expr", ")", "Stmt");

    prod!(
        g, "ForStmt", "for", "(", "ForInit", ";", "Expr", ";", "ForStep", ")", "Stmt"
    );
    prod!(g, "ForInit", "ID", "=", "Expr");
    prod!(g, "ForInit", "ε");
    prod!(g, "ForStep", "ID", "++");
    prod!(g, "ForStep", "ID", "--");
    prod!(g, "ForStep", "ID", "=", "Expr");
    prod!(g, "ForStep", "ε");

    prod!(g, "ReturnStmt", "return", "Expr", ";");

    prod!(g, "CompoundStmt", "{", "DeclList", "StmtList", "}");
    prod!(g, "StmtList", "Stmt", "StmtList");
    prod!(g, "StmtList", "ε");

    prod!(g, "Expr", "ExprOr");
    prod!(g, "ExprOr", "ExprAnd", "ExprOrTail");
    prod!(g, "ExprOrTail", "||", "ExprAnd", "ExprOrTail");
    prod!(g, "ExprOrTail", "ε");

    prod!(g, "ExprAnd", "ExprRel", "ExprAndTail");
    prod!(g, "ExprAndTail", "&&", "ExprRel", "ExprAndTail");
    prod!(g, "ExprAndTail", "ε");

    prod!(g, "ExprRel", "ExprAdd", "ExprRelTail");
    for op in ["==", "!=", "<=", ">=", "<", ">"] {
        g.add_production(
            "ExprRelTail",
            vec![op.to_string(), "ExprAdd".to_string(), "ExprRelTail".to_string()],
        );
    }
    prod!(g, "ExprRelTail", "ε");

    prod!(g, "ExprAdd", "ExprMul", "ExprAddTail");
    prod!(g, "ExprAddTail", "+", "ExprMul", "ExprAddTail");
    prod!(g, "ExprAddTail", "-", "ExprMul", "ExprAddTail");
    prod!(g, "ExprAddTail", "ε");

    prod!(g, "ExprMul", "ExprUnary", "ExprMulTail");
    prod!(g, "ExprMulTail", "*", "ExprUnary", "ExprMulTail");
    prod!(g, "ExprMulTail", "/", "ExprUnary", "ExprMulTail");
    prod!(g, "ExprMulTail", "%", "ExprUnary", "ExprMulTail");
    prod!(g, "ExprMulTail", "ε");

    prod!(g, "ExprPrimary", "Call");
    prod!(g, "ExprPrimary", "INT_LITERAL");
    prod!(g, "ExprPrimary", "FLOAT_LITERAL");

    // `Call` always starts with `ID`; a bare variable reference is the
    // `CallTail -> ε` alternative, which vanishes on reduction and leaves
    // `Call` collapsing straight down to the `ID` leaf (see tree_reducer).
    prod!(g, "Call", "ID", "CallTail");
    prod!(g, "CallTail", "(", "ArgList", ")");
    prod!(g, "CallTail", "ε");
    prod!(g, "ArgList", "Expr", "ArgListTail");
    prod!(g, "ArgList", "ε");
    prod!(g, "ArgListTail", ",", "Expr", "ArgListTail");
    prod!(g, "ArgListTail", "ε");

    prod!(g, "ExprUnary", "(", "CastOrExpr");
    prod!(g, "ExprUnary", "+", "ExprUnary");
    prod!(g, "ExprUnary", "-", "ExprUnary");
    prod!(g, "ExprUnary", "!", "ExprUnary");
    prod!(g, "ExprUnary", "ExprPrimary");

    prod!(g, "CastOrExpr", "Type", ")", "ExprUnary");
    prod!(g, "CastOrExpr", "Expr", ")");

    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grammar_finalizes_cleanly() {
        let mut g = default_grammar();
        g.finalize(true, true);
        assert!(g.is_nonterminal("Program"));
        for prod in g.all_productions() {
            assert_ne!(prod.body.first(), Some(&prod.head));
        }
    }
}
