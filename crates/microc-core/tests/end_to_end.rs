//! Literal source-to-quadruple scenarios, run through the whole pipeline.
//!
//! Expected shapes are checked structurally (opcode sequence, operand
//! threading through temporaries) rather than against exact temp/label
//! names, since those are monotonic counters and not part of the contract.

use indoc::indoc;

use microc_core::ir::Quadruple;
use microc_core::pipeline::{compile, PipelineConfig, Status};

fn compile_ok(source: &str) -> Vec<Quadruple> {
    let result = compile(source, &PipelineConfig::default());
    assert_eq!(result.status, Status::Ok, "errors: {:?} / {:?}", result.lex_errors, result.semantic_errors);
    result.quadruples
}

fn ops(quads: &[Quadruple]) -> Vec<&str> {
    quads.iter().map(|q| q.op.as_str()).collect()
}

#[test]
fn empty_main_with_explicit_return_lowers_to_the_minimal_function_shape() {
    let quads = compile_ok("int main() { return 0; }");

    assert_eq!(ops(&quads), ["FUNC_BEGIN", "LABEL", "LOAD_CONST", "RETURN", "FUNC_END"]);
    assert_eq!(quads[0].result, "main");
    assert_eq!(quads[1].result, "main");
    assert_eq!(quads[2].arg1, "0");
    assert_eq!(quads[3].arg1, quads[2].result);
    assert_eq!(quads[4].result, "main");
}

#[test]
fn truly_empty_main_body_synthesizes_the_same_default_return_shape() {
    // The boundary case from the testable-properties list: a function with
    // no statements at all still needs a well-formed return.
    let quads = compile_ok("int main() { }");

    assert_eq!(ops(&quads), ["FUNC_BEGIN", "LABEL", "LOAD_CONST", "RETURN", "FUNC_END"]);
    assert_eq!(quads[2].arg1, "0");
    assert_eq!(quads[3].arg1, quads[2].result);
}

#[test]
fn arithmetic_respects_precedence_and_threads_temporaries_left_to_right() {
    let quads = compile_ok("int main() { int x = 1 + 2 * 3; return 0; }");

    let loads: Vec<&Quadruple> = quads.iter().filter(|q| q.op == "LOAD_CONST").take(3).collect();
    assert_eq!(loads.iter().map(|q| q.arg1.as_str()).collect::<Vec<_>>(), ["1", "2", "3"]);

    let mul = quads.iter().find(|q| q.op == "MUL").expect("MUL quad");
    assert_eq!(mul.arg1, loads[1].result);
    assert_eq!(mul.arg2, loads[2].result);

    let add = quads.iter().find(|q| q.op == "ADD").expect("ADD quad");
    assert_eq!(add.arg1, loads[0].result);
    assert_eq!(add.arg2, mul.result);

    let store = quads.iter().find(|q| q.op == "STORE_VAR" && q.result == "x").expect("STORE_VAR x");
    assert_eq!(store.arg1, add.result);

    // MUL must be emitted (and thus its temp exist) before ADD consumes it.
    let mul_pos = quads.iter().position(|q| q.op == "MUL").unwrap();
    let add_pos = quads.iter().position(|q| q.op == "ADD").unwrap();
    assert!(mul_pos < add_pos);
}

#[test]
fn if_else_backpatches_both_the_false_jump_and_the_join_jump() {
    let quads = compile_ok("int main() { int x = 0; if (x > 0) x = 1; else x = 2; return 0; }");

    let gt = quads.iter().find(|q| q.op == "GT").expect("GT quad");
    let false_jump = quads.iter().find(|q| q.op == "JUMP_IF_FALSE").expect("JUMP_IF_FALSE quad");
    assert_eq!(false_jump.arg1, gt.result);
    assert_ne!(false_jump.result, microc_core::ir::UNPATCHED);

    let else_label = quads.iter().find(|q| q.op == "LABEL" && q.result == false_jump.result).expect("else label");
    let else_label_pos = quads.iter().position(|q| std::ptr::eq(q, else_label)).unwrap();

    let store_1 = quads.iter().position(|q| q.op == "STORE_VAR" && q.result == "x" && q.arg1 != "").unwrap();
    assert!(store_1 < else_label_pos, "then-branch store must precede the else label");

    let unconditional_jump = quads[..else_label_pos]
        .iter()
        .find(|q| q.op == "JUMP")
        .expect("unconditional jump out of the then-branch");
    assert_ne!(unconditional_jump.result, microc_core::ir::UNPATCHED);

    let join_label = quads.iter().find(|q| q.op == "LABEL" && q.result == unconditional_jump.result).expect("join label");
    let join_label_pos = quads.iter().position(|q| std::ptr::eq(q, join_label)).unwrap();
    assert!(join_label_pos > else_label_pos, "join label must come after the else branch");
}

#[test]
fn while_loop_jumps_back_to_a_label_preceding_the_condition() {
    let quads = compile_ok("int main() { int i=1; int s=0; while (i<=10) { s = s+i; i = i+1; } return 0; }");

    let le = quads.iter().find(|q| q.op == "LE").expect("LE quad");
    let le_pos = quads.iter().position(|q| std::ptr::eq(q, le)).unwrap();
    let start_label = &quads[..le_pos].iter().rev().find(|q| q.op == "LABEL").expect("loop start label");

    let back_jump = quads.iter().find(|q| q.op == "JUMP" && q.result == start_label.result).expect("back edge");
    let back_jump_pos = quads.iter().position(|q| std::ptr::eq(q, back_jump)).unwrap();
    assert!(back_jump_pos > le_pos, "back jump must follow the loop test");

    let exit_jump = quads.iter().find(|q| q.op == "JUMP_IF_FALSE").expect("loop exit jump");
    assert_ne!(exit_jump.result, microc_core::ir::UNPATCHED);
    let exit_label = quads.iter().find(|q| q.op == "LABEL" && q.result == exit_jump.result).expect("loop exit label");
    let exit_label_pos = quads.iter().position(|q| std::ptr::eq(q, exit_label)).unwrap();
    assert!(exit_label_pos > back_jump_pos, "exit label must come after the back edge");

    assert_eq!(quads.iter().filter(|q| q.op == "ADD").count(), 2);
}

#[test]
fn function_call_evaluates_args_then_calls_and_stores_the_result() {
    let source = indoc! {"
        int f(int n) { return n + 1; }
        int main() { int y = f(5); return y; }
    "};
    let quads = compile_ok(source);

    let f_begin = quads.iter().position(|q| q.op == "FUNC_BEGIN" && q.result == "f").unwrap();
    let f_end = quads.iter().position(|q| q.op == "FUNC_END" && q.result == "f").unwrap();
    let f_body = &quads[f_begin..=f_end];
    assert!(f_body.iter().any(|q| q.op == "ADD"));
    assert!(f_body.iter().any(|q| q.op == "RETURN"));

    let main_begin = quads.iter().position(|q| q.op == "FUNC_BEGIN" && q.result == "main").unwrap();
    let main_body = &quads[main_begin..];

    let load5 = main_body.iter().find(|q| q.op == "LOAD_CONST" && q.arg1 == "5").expect("LOAD_CONST 5");
    let param = main_body.iter().find(|q| q.op == "PARAM").expect("PARAM quad");
    assert_eq!(param.arg1, load5.result);

    let call = main_body.iter().find(|q| q.op == "CALL" && q.arg1 == "f").expect("CALL f");
    assert_eq!(call.arg2, "1", "nargs must be recorded");

    let store_y = main_body.iter().find(|q| q.op == "STORE_VAR" && q.result == "y").expect("STORE_VAR y");
    assert_eq!(store_y.arg1, call.result);

    let load_y = main_body.iter().find(|q| q.op == "LOAD_VAR" && q.arg1 == "y").expect("LOAD_VAR y");
    let ret = main_body.iter().find(|q| q.op == "RETURN").expect("RETURN quad");
    assert_eq!(ret.arg1, load_y.result);
}

#[test]
fn short_circuit_and_in_an_if_condition_jumps_past_the_right_operand() {
    let quads = compile_ok("int main() { int x=1; int y=1; if (x>0 && y>0) x=2; return 0; }");

    let gts: Vec<&Quadruple> = quads.iter().filter(|q| q.op == "GT").collect();
    assert_eq!(gts.len(), 2, "both comparisons must be evaluated eagerly");

    // Either an AND-then-single-JUMP_IF_FALSE shape or a two-jump short
    // circuit sequence is acceptable; at minimum one JUMP_IF_FALSE must gate
    // entry into the then-branch's assignment.
    let false_jumps = quads.iter().filter(|q| q.op == "JUMP_IF_FALSE").count();
    assert!(false_jumps >= 1);
    assert!(quads.iter().all(|q| q.op != "JUMP_IF_FALSE" || q.result != microc_core::ir::UNPATCHED));

    let last_store_x_pos = quads.iter().rposition(|q| q.op == "STORE_VAR" && q.result == "x").unwrap();
    let last_gt_pos = quads.iter().rposition(|q| q.op == "GT").unwrap();
    assert!(last_store_x_pos > last_gt_pos, "the if-body's assignment must follow both comparisons");
}
