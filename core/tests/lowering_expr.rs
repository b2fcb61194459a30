mod common;

use angl_core::ast::{BinaryOperator, Expr, Function, Stmt, UnaryOperator};
use angl_core::error::ErrorKind;
use common::{Evaluator, Fixture, Value};

fn counter(name: &str) -> Expr {
    Expr::raw_call(name, vec![])
}

fn truth(b: bool) -> Value {
    Value::Num(if b { 3.0 } else { 0.0 })
}

fn check_logical(op: BinaryOperator, law: fn(bool, bool) -> bool) {
    let mut fx = Fixture::new();
    let text = fx.expr_text(&Expr::binary(op, counter("a"), counter("b"))).unwrap();
    for a in [false, true] {
        for b in [false, true] {
            let mut eval = Evaluator::new().with_function("a", truth(a)).with_function("b", truth(b));
            let result = eval.eval(&text);
            assert_eq!(result.num(), if law(a, b) { 1.0 } else { 0.0 }, "{} with a={} b={}", text, a, b);
            assert!(matches!(result, Value::Num(_)), "{} must yield a number", text);
            assert_eq!(eval.calls("a"), 1, "left operand of {} evaluated once", text);
            assert_eq!(eval.calls("b"), 1, "right operand of {} evaluated once", text);
        }
    }
}

#[test]
fn or_evaluates_both_sides_and_yields_zero_or_one() {
    check_logical(BinaryOperator::Or, |a, b| a || b);
}

#[test]
fn and_evaluates_both_sides_and_yields_zero_or_one() {
    check_logical(BinaryOperator::And, |a, b| a && b);
}

#[test]
fn xor_evaluates_both_sides_and_yields_zero_or_one() {
    check_logical(BinaryOperator::Xor, |a, b| a != b);
}

#[test]
fn logical_operators_print_the_non_short_circuit_forms() {
    let mut fx = Fixture::new();
    let or = fx.expr_text(&Expr::binary(BinaryOperator::Or, Expr::raw("a"), Expr::raw("b"))).unwrap();
    assert_eq!(or, "(!!(!!( a )+!!( b ))|0)");
    let and = fx.expr_text(&Expr::binary(BinaryOperator::And, Expr::raw("a"), Expr::raw("b"))).unwrap();
    assert_eq!(and, "(!!( a )*!!( b ))");
    let xor = fx.expr_text(&Expr::binary(BinaryOperator::Xor, Expr::raw("a"), Expr::raw("b"))).unwrap();
    assert_eq!(xor, "(!((!( a )+!( b ))-1)|0)");
}

#[test]
fn integer_division_truncates_toward_zero() {
    let mut fx = Fixture::new();
    for (a, b, expected) in [(7.0, 2.0, 3.0), (-7.0, 2.0, -3.0), (7.0, -2.0, -3.0), (6.0, 3.0, 2.0)] {
        let text = fx
            .expr_text(&Expr::binary(BinaryOperator::IntDiv, Expr::number(a), Expr::number(b)))
            .unwrap();
        assert_eq!(Evaluator::new().eval(&text).num(), expected, "{}", text);
    }
    let text = fx
        .expr_text(&Expr::binary(BinaryOperator::IntDiv, Expr::number(7.0), Expr::number(2.0)))
        .unwrap();
    assert_eq!(text, "(((7) / (2))|0)");
}

#[test]
fn modulo_keeps_the_sign_of_the_dividend() {
    let mut fx = Fixture::new();
    let text = fx
        .expr_text(&Expr::binary(BinaryOperator::Mod, Expr::number(-7.0), Expr::number(2.0)))
        .unwrap();
    assert_eq!(text, "((-7) % (2))");
    assert_eq!(Evaluator::new().eval(&text).num(), -1.0);
}

#[test]
fn arithmetic_is_fully_parenthesized() {
    let mut fx = Fixture::new();
    // 1 - (2 - 3) must not collapse to 1 - 2 - 3
    let inner = Expr::binary(BinaryOperator::Sub, Expr::number(2.0), Expr::number(3.0));
    let expr = Expr::binary(BinaryOperator::Sub, Expr::number(1.0), inner);
    let text = fx.expr_text(&expr).unwrap();
    assert_eq!(text, "((1) - ((2) - (3)))");
    assert_eq!(Evaluator::new().eval(&text).num(), 2.0);

    let neg = fx.expr_text(&Expr::unary(UnaryOperator::Minus, Expr::number(4.0))).unwrap();
    assert_eq!(neg, "(-(4))");
}

#[test]
fn member_operator_prints_without_parentheses() {
    let mut fx = Fixture::new();
    let file = fx.file_scope;
    let expr = Expr::binary(BinaryOperator::Member, fx.ident(file, "self"), Expr::ident("hp", None));
    assert_eq!(fx.expr_text(&expr).unwrap(), "this.hp");
}

#[test]
fn identifiers_print_their_target_or_raw_name() {
    let mut fx = Fixture::new();
    let file = fx.file_scope;
    fx.local(file, "score");
    assert_eq!(fx.expr_text(&fx.ident(file, "score")).unwrap(), "score");
    assert_eq!(fx.expr_text(&fx.global("room_speed")).unwrap(), "$G.room_speed");
    assert_eq!(fx.expr_text(&Expr::ident("Math", None)).unwrap(), "Math");
}

#[test]
fn strings_are_json_quoted() {
    let mut fx = Fixture::new();
    let text = fx.expr_text(&Expr::string("say \"hi\"\n")).unwrap();
    assert_eq!(text, "\"say \\\"hi\\\"\\n\"");
}

#[test]
fn index_chains_follow_the_parenthesized_base() {
    let mut fx = Fixture::new();
    let file = fx.file_scope;
    fx.local(file, "grid");
    let expr = Expr::index(fx.ident(file, "grid"), vec![Expr::number(1.0), Expr::number(2.0)]);
    assert_eq!(fx.expr_text(&expr).unwrap(), "(grid)[(1)][(2)]");
}

#[test]
fn plain_calls_thread_self_and_other() {
    let mut fx = Fixture::new();
    let file = fx.file_scope;
    let call = Expr::call(fx.global("show_debug_message"), vec![Expr::string("x")], file);
    assert_eq!(fx.expr_text(&call).unwrap(), "($G.show_debug_message).call(this, this, \"x\")");
}

#[test]
fn method_calls_pass_only_other() {
    let mut fx = Fixture::new();
    let script = fx.function_scope(fx.file_scope, &[]);
    let callee = Expr::binary(BinaryOperator::Member, fx.ident(script, "self"), Expr::ident("jump", None));
    let call = Expr::method_call(callee, vec![Expr::number(3.0)], script);
    assert_eq!(fx.expr_text(&call).unwrap(), "(this.jump)(other, (3))");
}

#[test]
fn calls_without_self_in_scope_are_unresolved() {
    let mut fx = Fixture::new();
    let bare = fx.block_scope(angl_core::ScopeTree::GLOBAL);
    let call = Expr::call(fx.global("instance_destroy"), vec![], bare);
    let err = fx.expr_text(&call).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnresolvedIdentifier);
}

#[test]
fn raw_calls_and_raw_expressions_pass_through() {
    let mut fx = Fixture::new();
    let call = Expr::raw_call("Math.max", vec![Expr::number(1.0), Expr::number(2.0)]);
    assert_eq!(fx.expr_text(&call).unwrap(), "(Math.max)((1), (2))");
    assert_eq!(fx.expr_text(&Expr::raw("window.devicePixelRatio")).unwrap(), "window.devicePixelRatio");
}

#[test]
fn closures_declare_other_first_and_allocate_locals() {
    let mut fx = Fixture::new();
    let script = fx.function_scope(fx.file_scope, &["a", "b"]);
    let tmp = fx.local(script, "tmp");
    let body = Stmt::block(vec![Stmt::assign(
        angl_core::ast::Expr::ident("tmp", Some(tmp)),
        Expr::binary(BinaryOperator::Add, fx.ident(script, "a"), fx.ident(script, "b")),
    )]);
    let closure = Expr::closure(Function::new(&["a", "b"], body, script));
    let text = fx.expr_text(&closure).unwrap();
    assert_eq!(text, "function(other, a, b) {\n    var tmp;\n    tmp = (a + b);\n}");
}

#[test]
fn renamed_other_matches_between_header_and_body() {
    let mut fx = Fixture::new();
    let file = fx.file_scope;
    // `other` allocated under another name
    let scope = fx.tree.push_scope(file, angl_core::scope::ScopeKind::Function).unwrap();
    fx.tree
        .add(scope, angl_core::scope::Variable::argument("other").with_desired_target("that"))
        .unwrap();
    fx.tree.add(scope, common::self_binding()).unwrap();
    let body = Stmt::block(vec![
        angl_core::ast::StmtKind::Return { expr: fx.ident(scope, "other") }.into(),
    ]);
    let text = fx.expr_text(&Expr::closure(Function::new(&[], body, scope))).unwrap();
    assert_eq!(text, "function(that) {\n    return (that);\n}");
}
