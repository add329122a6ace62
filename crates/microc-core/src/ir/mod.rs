//! Quadruple-based intermediate representation builder.
//!
//! Targets an abstract "op, arg1, arg2, result" instruction stream meant to
//! be consumed by a downstream code generator (out of scope here). Jumps are
//! lowered with a pending-patch discipline: a jump quadruple is emitted with
//! a sentinel `"?"` result, its index recorded in a patch list, and the
//! label is filled in once the real target is known.

use serde::{Deserialize, Serialize};

use crate::parser::Node;

pub const UNPATCHED: &str = "?";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quadruple {
    pub op: String,
    pub arg1: String,
    pub arg2: String,
    pub result: String,
}

impl Quadruple {
    pub fn new(
        op: impl Into<String>,
        arg1: impl Into<String>,
        arg2: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            op: op.into(),
            arg1: arg1.into(),
            arg2: arg2.into(),
            result: result.into(),
        }
    }
}

/// Builds a flat quadruple stream from an AST, maintaining per-function
/// temporary and label counters and a pending global-initializer buffer.
pub struct IrBuilder {
    quads: Vec<Quadruple>,
    global_inits: Vec<Quadruple>,
    current_func: Option<String>,
    temp_counters: std::collections::HashMap<String, u32>,
    label_counters: std::collections::HashMap<String, u32>,
    flushed_globals: bool,
    /// Set only while generating a top-level variable initializer, so the
    /// resulting quads collect into `global_inits` instead of the main
    /// stream. Bare top-level statements (legal per the grammar's `Program
    /// -> ... StmtList`, if unusual in practice) are emitted in place, since
    /// jump/backpatch indices are only ever valid against `quads`.
    buffering: bool,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            quads: Vec::new(),
            global_inits: Vec::new(),
            current_func: None,
            temp_counters: std::collections::HashMap::new(),
            label_counters: std::collections::HashMap::new(),
            flushed_globals: false,
            buffering: false,
        }
    }

    pub fn build(mut self, ast: &Node) -> Vec<Quadruple> {
        self.r#gen(ast);
        self.quads
    }

    fn func_prefix(&self) -> &str {
        self.current_func.as_deref().unwrap_or("GLOBAL")
    }

    pub fn fresh_temp(&mut self) -> String {
        let prefix = self.func_prefix().to_string();
        let counter = self.temp_counters.entry(prefix.clone()).or_insert(0);
        let name = format!("{prefix}_t{counter}");
        *counter += 1;
        name
    }

    pub fn fresh_label(&mut self) -> String {
        let prefix = self.func_prefix().to_string();
        let counter = self.label_counters.entry(prefix.clone()).or_insert(0);
        let name = format!("{prefix}_L{counter}");
        *counter += 1;
        name
    }

    fn emit(&mut self, quad: Quadruple) -> usize {
        if self.buffering {
            self.global_inits.push(quad);
            self.global_inits.len() - 1
        } else {
            self.quads.push(quad);
            self.quads.len() - 1
        }
    }

    fn backpatch(&mut self, indices: &[usize], target: &str) {
        for &idx in indices {
            if let Some(quad) = self.quads.get_mut(idx) {
                quad.result = target.to_string();
            }
        }
    }

    fn flush_global_inits_once(&mut self) {
        if !self.flushed_globals {
            self.flushed_globals = true;
            if !self.global_inits.is_empty() {
                self.quads.push(Quadruple::new("LABEL", "", "", "GLOBAL_INIT"));
                let buffered = std::mem::take(&mut self.global_inits);
                self.quads.extend(buffered);
            }
        }
    }

    fn r#gen(&mut self, node: &Node) -> Option<String> {
        match node.label.as_str() {
            "Program" => {
                for child in &node.children {
                    self.r#gen(child);
                }
                self.flush_global_inits_once();
                None
            }
            "Decl" => self.gen_decl(node),
            "CompoundStmt" => {
                for child in &node.children {
                    self.r#gen(child);
                }
                None
            }
            "AssignStmt" => self.gen_assign(node),
            "ExprStmt" => {
                for child in &node.children {
                    self.r#gen(child);
                }
                None
            }
            "IfStmt" => self.gen_if(node),
            "WhileStmt" => self.gen_while(node),
            "ForStmt" => self.gen_for(node),
            "ForInit" => self.gen_for_init(node),
            "ForStep" => self.gen_for_step(node),
            "ReturnStmt" => self.gen_return(node),
            "ID" => {
                let name = node.value.clone()?;
                let temp = self.fresh_temp();
                self.emit(Quadruple::new("LOAD_VAR", name, "", temp.clone()));
                Some(temp)
            }
            "INT_LITERAL" | "FLOAT_LITERAL" => {
                let value = node.value.clone().unwrap_or_default();
                let temp = self.fresh_temp();
                self.emit(Quadruple::new("LOAD_CONST", value, "", temp.clone()));
                Some(temp)
            }
            "ExprAnd" => self.gen_and_chain(node),
            "ExprOr" => self.gen_or_chain(node),
            "ExprAdd" | "ExprMul" | "ExprRel" => self.gen_left_assoc_chain(node),
            "ExprUnary" => self.gen_unary(node),
            "Call" => self.gen_call(node),
            _ => {
                let mut last = None;
                for child in &node.children {
                    last = self.r#gen(child);
                }
                last
            }
        }
    }

    fn gen_decl(&mut self, node: &Node) -> Option<String> {
        let name = node.children.get(1).and_then(|n| n.value.clone())?;
        // `DeclTail` is a helper label (ends in "Tail"), so the tree reducer
        // splices its children straight into `Decl`'s own children instead of
        // nesting them one level down; `CompoundStmt`/`Param` can therefore
        // appear anywhere among `node.children`, not just at a fixed index.
        let body = node.children.iter().find(|c| c.label == "CompoundStmt");

        if let Some(body) = body {
            let prev_func = self.current_func.replace(name.clone());
            self.temp_counters.insert(name.clone(), 0);
            self.label_counters.insert(name.clone(), 0);

            self.emit(Quadruple::new("FUNC_BEGIN", "", "", name.clone()));
            // The entry label is the function's own name, not a minted
            // counter label, so a caller's `CALL` target matches directly.
            self.emit(Quadruple::new("LABEL", "", "", name.clone()));

            for (idx, param) in node.children.iter().filter(|c| c.label == "Param").enumerate() {
                if let Some(pname) = param.children.last().and_then(|n| n.value.clone()) {
                    let loaded = self.fresh_temp();
                    self.emit(Quadruple::new("LOAD_PARAM", idx.to_string(), "", loaded.clone()));
                    self.emit(Quadruple::new("STORE_VAR", loaded, "", pname));
                }
            }

            let mut saw_return = false;
            for stmt in &body.children {
                if stmt.label == "ReturnStmt" {
                    saw_return = true;
                }
                self.r#gen(stmt);
            }
            if !saw_return {
                let temp = self.fresh_temp();
                self.emit(Quadruple::new("LOAD_CONST", "0", "", temp.clone()));
                self.emit(Quadruple::new("RETURN", temp, "", ""));
            }
            self.emit(Quadruple::new("FUNC_END", "", "", name.clone()));
            self.current_func = prev_func;
        } else {
            self.emit(Quadruple::new("ALLOC", "", "", name.clone()));
            // A top-level variable's initializer is global-init code and
            // gets buffered into one aggregated block; a local variable's
            // initializer must run in place, in sequence with the rest of
            // the enclosing function body.
            let is_global = self.current_func.is_none();
            // `VarDeclPrime` is not a helper label, so it survives reduction
            // as its own node (found directly among `Decl`'s spliced
            // children); `VarDeclPrime -> "=" Expr ";"` reduces to three
            // children, while the bare `;`-only alternative collapses away
            // entirely, leaving no `VarDeclPrime` child here at all.
            if let Some(init) = node
                .children
                .iter()
                .find(|c| c.label == "VarDeclPrime")
                .and_then(|t| t.children.get(1))
            {
                if is_global {
                    self.buffering = true;
                }
                if let Some(value) = self.r#gen(init) {
                    self.emit(Quadruple::new("STORE_VAR", value, "", name.clone()));
                }
                if is_global {
                    self.buffering = false;
                }
            }
        }
        Some(name)
    }

    /// `ForInit -> ID = Expr`, reduced to `[ID, "=", Expr]`.
    fn gen_for_init(&mut self, node: &Node) -> Option<String> {
        let name = node.children.first()?.value.clone()?;
        let value = self.r#gen(node.children.get(2)?)?;
        self.emit(Quadruple::new("STORE_VAR", value, "", name.clone()));
        Some(name)
    }

    /// `ForStep -> ID ++ | ID -- | ID = Expr`, reduced to `[ID, op]` or
    /// `[ID, "=", Expr]`.
    fn gen_for_step(&mut self, node: &Node) -> Option<String> {
        let name = node.children.first()?.value.clone()?;
        match node.children.get(1)?.label.as_str() {
            "++" | "--" => {
                let op = if node.children[1].label == "--" { "SUB" } else { "ADD" };
                let loaded = self.fresh_temp();
                self.emit(Quadruple::new("LOAD_VAR", name.clone(), "", loaded.clone()));
                let updated = self.fresh_temp();
                self.emit(Quadruple::new(op, loaded, "1", updated.clone()));
                self.emit(Quadruple::new("STORE_VAR", updated, "", name.clone()));
            }
            _ => {
                let value = self.r#gen(node.children.get(2)?)?;
                self.emit(Quadruple::new("STORE_VAR", value, "", name.clone()));
            }
        }
        Some(name)
    }

    fn gen_assign(&mut self, node: &Node) -> Option<String> {
        let parts = without_markers(&node.children, &["=", ";"]);
        let target = parts.first().copied()?.value.clone()?;
        let value = self.r#gen(parts.get(1).copied()?)?;
        self.emit(Quadruple::new("STORE_VAR", value, "", target.clone()));
        Some(target)
    }

    /// Left-to-right fold over a flat `[operand, op, operand, op, ...]`
    /// chain produced by splicing an `ExprAddTail`/`ExprMulTail`/
    /// `ExprRelTail` helper into its parent: one binary quad per pair.
    fn gen_left_assoc_chain(&mut self, node: &Node) -> Option<String> {
        let mut children = node.children.iter();
        let mut acc = self.r#gen(children.next()?)?;
        while let Some(op_node) = children.next() {
            let rhs_node = children.next()?;
            let rhs = self.r#gen(rhs_node)?;
            let op = relop_or_arith(&op_node.label);
            let temp = self.fresh_temp();
            self.emit(Quadruple::new(op, acc, rhs, temp.clone()));
            acc = temp;
        }
        Some(acc)
    }

    fn gen_unary(&mut self, node: &Node) -> Option<String> {
        if node.children.len() < 2 {
            return self.r#gen(node.children.first()?);
        }
        match node.children.first()?.label.as_str() {
            // Neither a dedicated negate nor a boolean-not opcode is in the
            // quadruple vocabulary, so both fold to an arithmetic/relational
            // op already there: `-x` is `0 - x`, `!x` is `x == 0`.
            "-" => {
                let value = self.r#gen(node.children.get(1)?)?;
                let temp = self.fresh_temp();
                self.emit(Quadruple::new("SUB", "0", value, temp.clone()));
                Some(temp)
            }
            "!" => {
                let value = self.r#gen(node.children.get(1)?)?;
                let temp = self.fresh_temp();
                self.emit(Quadruple::new("EQ", value, "0", temp.clone()));
                Some(temp)
            }
            // Unary "+" and a parenthesized cast/group both pass the inner
            // value through unchanged; this IR has no cast representation.
            _ => self.r#gen(node.children.get(1)?),
        }
    }

    /// `Call -> ID "(" ArgList ")"`, reduced to `[ID, "(", arg, ",", arg,
    /// ..., ")"]` (a bare variable reference never reaches here: `CallTail
    /// -> ε` collapses `Call` down to the plain `ID` leaf instead).
    fn gen_call(&mut self, node: &Node) -> Option<String> {
        let name = node.children.first()?.value.clone()?;
        let args = without_markers(&node.children[1..], &["(", ")", ","]);
        let mut nargs = 0u32;
        for arg in args {
            let value = self.r#gen(arg)?;
            self.emit(Quadruple::new("PARAM", value, "", ""));
            nargs += 1;
        }
        let temp = self.fresh_temp();
        self.emit(Quadruple::new("CALL", name, nargs.to_string(), temp.clone()));
        Some(temp)
    }

    fn gen_return(&mut self, node: &Node) -> Option<String> {
        let value = node.children.first().and_then(|c| self.r#gen(c));
        self.emit(Quadruple::new("RETURN", value.unwrap_or_default(), "", ""));
        None
    }

    /// Single-pass backpatched if/if-else lowering: the false-branch jump is
    /// patched to the else label (or the join label with no else), and the
    /// then-branch's trailing jump is patched to the join label.
    fn gen_if(&mut self, node: &Node) -> Option<String> {
        let parts = without_markers(&node.children, &["if", "(", ")"]);
        let cond = self.r#gen(parts.first().copied()?)?;
        let idx_false = self.emit(Quadruple::new("JUMP_IF_FALSE", cond, "", UNPATCHED));

        if let Some(then_stmt) = parts.get(1).copied() {
            self.r#gen(then_stmt);
        }

        // An `ElseStmt` child survives reduction as its own 2-child node
        // (`["else", Stmt]`) when an else-branch was parsed, and is absent
        // entirely (not present-as-epsilon) otherwise.
        let else_stmt = parts.get(2).copied().and_then(|n| {
            if n.label == "ElseStmt" {
                without_markers(&n.children, &["else"]).into_iter().next()
            } else {
                Some(n)
            }
        });
        if let Some(else_node) = else_stmt {
            let idx_join = self.emit(Quadruple::new("JUMP", "", "", UNPATCHED));
            let else_label = self.fresh_label();
            self.backpatch(&[idx_false], &else_label);
            self.emit(Quadruple::new("LABEL", "", "", else_label));
            self.r#gen(else_node);
            let join_label = self.fresh_label();
            self.backpatch(&[idx_join], &join_label);
            self.emit(Quadruple::new("LABEL", "", "", join_label));
        } else {
            let join_label = self.fresh_label();
            self.backpatch(&[idx_false], &join_label);
            self.emit(Quadruple::new("LABEL", "", "", join_label));
        }
        None
    }

    fn gen_while(&mut self, node: &Node) -> Option<String> {
        let parts = without_markers(&node.children, &["while", "(", ")"]);
        let test_label = self.fresh_label();
        self.emit(Quadruple::new("LABEL", "", "", test_label.clone()));
        let cond = self.r#gen(parts.first().copied()?)?;
        let idx_exit = self.emit(Quadruple::new("JUMP_IF_FALSE", cond, "", UNPATCHED));
        if let Some(body) = parts.get(1).copied() {
            self.r#gen(body);
        }
        self.emit(Quadruple::new("JUMP", "", "", test_label));
        let exit_label = self.fresh_label();
        self.backpatch(&[idx_exit], &exit_label);
        self.emit(Quadruple::new("LABEL", "", "", exit_label));
        None
    }

    /// `for (init; cond; step) body`, lowered as init followed by a
    /// while-shaped loop with the step appended at the end of the body.
    /// `ForInit`/`ForStep` are absent entirely (not present-as-epsilon)
    /// when omitted, so they are located by label rather than position.
    fn gen_for(&mut self, node: &Node) -> Option<String> {
        let parts = without_markers(&node.children, &["for", "(", ";", ")"]);
        let mut idx = 0;

        let init = if parts.get(idx).map(|n| n.label == "ForInit").unwrap_or(false) {
            idx += 1;
            Some(parts[idx - 1])
        } else {
            None
        };
        let cond = parts.get(idx).copied();
        idx += 1;
        let step = if parts.get(idx).map(|n| n.label == "ForStep").unwrap_or(false) {
            idx += 1;
            Some(parts[idx - 1])
        } else {
            None
        };
        let body = parts.get(idx).copied();

        if let Some(init) = init {
            self.r#gen(init);
        }

        let test_label = self.fresh_label();
        self.emit(Quadruple::new("LABEL", "", "", test_label.clone()));
        let idx_exit = match cond {
            Some(cond_node) => {
                let cond_value = self.r#gen(cond_node)?;
                Some(self.emit(Quadruple::new("JUMP_IF_FALSE", cond_value, "", UNPATCHED)))
            }
            None => None,
        };

        if let Some(body) = body {
            self.r#gen(body);
        }
        if let Some(step) = step {
            self.r#gen(step);
        }
        self.emit(Quadruple::new("JUMP", "", "", test_label));

        let exit_label = self.fresh_label();
        if let Some(idx_exit) = idx_exit {
            self.backpatch(&[idx_exit], &exit_label);
        }
        self.emit(Quadruple::new("LABEL", "", "", exit_label));
        None
    }

    /// Left-to-right fold over a flat `ExprAnd` chain: `a && b && c` short
    /// circuits at the first false operand without evaluating the rest.
    fn gen_and_chain(&mut self, node: &Node) -> Option<String> {
        let mut children = node.children.iter();
        let mut acc = self.r#gen(children.next()?)?;
        while children.next().is_some() {
            let rhs_node = children.next()?;
            acc = self.gen_and_pair(acc, rhs_node)?;
        }
        Some(acc)
    }

    /// `a && b` emits: evaluate `a` to `tA`; `JUMP_IF_FALSE(tA, _, Lfalse)`;
    /// evaluate `b` to `tB`; `LABEL Lfalse`. The expression's value is `tB`
    /// on both paths — when `a` is false the jump skips straight past `b`'s
    /// evaluation, which is the accepted (if slightly informal) short-circuit
    /// shape this IR uses rather than combining into a single `AND` quad.
    fn gen_and_pair(&mut self, lhs: String, rhs_node: &Node) -> Option<String> {
        let idx_false = self.emit(Quadruple::new("JUMP_IF_FALSE", lhs, "", UNPATCHED));
        let rhs = self.r#gen(rhs_node)?;
        let false_label = self.fresh_label();
        self.backpatch(&[idx_false], &false_label);
        self.emit(Quadruple::new("LABEL", "", "", false_label));
        Some(rhs)
    }

    /// Left-to-right fold over a flat `ExprOr` chain: `a || b || c` short
    /// circuits at the first true operand without evaluating the rest.
    fn gen_or_chain(&mut self, node: &Node) -> Option<String> {
        let mut children = node.children.iter();
        let mut acc = self.r#gen(children.next()?)?;
        while children.next().is_some() {
            let rhs_node = children.next()?;
            acc = self.gen_or_pair(acc, rhs_node)?;
        }
        Some(acc)
    }

    /// `a || b`, symmetric with `gen_and_pair`: `JUMP_IF_TRUE(tA, _, Ltrue)`
    /// skips `b`'s evaluation when `a` is already true.
    fn gen_or_pair(&mut self, lhs: String, rhs_node: &Node) -> Option<String> {
        let idx_true = self.emit(Quadruple::new("JUMP_IF_TRUE", lhs, "", UNPATCHED));
        let rhs = self.r#gen(rhs_node)?;
        let true_label = self.fresh_label();
        self.backpatch(&[idx_true], &true_label);
        self.emit(Quadruple::new("LABEL", "", "", true_label));
        Some(rhs)
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drops pure-syntax leaves (keywords and punctuation) from a production's
/// reduced children, since the tree reducer only removes epsilon nodes and
/// `Tail`/`List`/primed helper non-terminals, never plain terminal leaves.
fn without_markers<'a>(children: &'a [Node], markers: &[&str]) -> Vec<&'a Node> {
    children.iter().filter(|c| !markers.contains(&c.label.as_str())).collect()
}

fn relop_or_arith(symbol: &str) -> &'static str {
    match symbol {
        "+" => "ADD",
        "-" => "SUB",
        "*" => "MUL",
        "/" => "DIV",
        "%" => "MOD",
        "==" => "EQ",
        "!=" => "NE",
        "<" => "LT",
        ">" => "GT",
        "<=" => "LE",
        ">=" => "GE",
        _ => "UNKNOWN",
    }
}

pub fn print_quads(quads: &[Quadruple]) -> String {
    quads
        .iter()
        .map(|q| format!("({}, {}, {}, {})", q.op, q.arg1, q.arg2, q.result))
        .collect::<Vec<_>>()
        .join("\n")
}
