//! Tests for the analysis context scope chain and the analyzer

use shard_ast::analysis::DeclRef;
use shard_ast::*;
use shard_common::{Location, Range};

fn range(line: u32, start: u32, end: u32) -> Range {
    Range::new(Location::new(line, start), Location::new(line, end))
}

fn var(name: &str) -> Decl {
    Decl::variable(TypeRef::Int, name, None, Range::invalid()).unwrap()
}

#[test]
fn lookup_walks_the_scope_chain() {
    let x_outer = var("x");
    let y = var("y");
    let x_inner = var("x");

    let mut outer = AnalysisContext::new();
    outer.add_decl(&x_outer).unwrap();
    outer.add_decl(&y).unwrap();

    let mut inner = outer.push();
    inner.add_decl(&x_inner).unwrap();

    // Inner scope shadows the outer `x` and inherits `y`.
    assert_eq!(inner.find_decl("x"), Some(DeclRef::from(&x_inner)));
    assert_eq!(inner.find_decl("y"), Some(DeclRef::from(&y)));
    assert_eq!(inner.find_decl("z"), None);

    assert_eq!(outer.find_decl("x"), Some(DeclRef::from(&x_outer)));
}

#[test]
fn declaration_is_invisible_below_its_scope() {
    let x = var("x");

    let c0 = AnalysisContext::new();
    let mut c1 = c0.push();
    c1.add_decl(&x).unwrap();
    let c2 = c1.push();

    assert_eq!(c2.find_decl("x"), Some(DeclRef::from(&x)));
    assert!(c0.find_decl("x").is_none());
}

#[test]
fn duplicate_in_same_scope_is_rejected_and_kept() {
    let first = var("x");
    let second = var("x");

    let mut ctx = AnalysisContext::new();
    ctx.add_decl(&first).unwrap();
    assert!(ctx.add_decl(&second).is_err());

    // The original declaration wins.
    assert_eq!(ctx.find_decl("x"), Some(DeclRef::from(&first)));
}

fn decl_stmt(decl: Decl) -> Stmt {
    let r = decl.range();
    Stmt::decl(decl, r)
}

#[test]
fn analyzer_accepts_well_scoped_source() {
    // int x; { int x; x; } x;
    let source = Source::new(
        vec![
            decl_stmt(var("x")),
            Stmt::compound(
                vec![
                    decl_stmt(var("x")),
                    Stmt::expr(
                        Some(Expr::identifier("x", range(2, 3, 4)).unwrap()),
                        range(2, 3, 5),
                    ),
                ],
                range(2, 1, 7),
            ),
            Stmt::expr(
                Some(Expr::identifier("x", range(3, 1, 2)).unwrap()),
                range(3, 1, 3),
            ),
        ],
        Range::invalid(),
    );

    let mut analyzer = Analyzer::new();
    assert!(analyzer.analyze(&source));
    assert!(analyzer.diagnostics().is_empty());
}

#[test]
fn analyzer_reports_unknown_identifier() {
    let source = Source::new(
        vec![Stmt::expr(
            Some(Expr::identifier("ghost", range(1, 1, 6)).unwrap()),
            range(1, 1, 7),
        )],
        Range::invalid(),
    );

    let mut analyzer = Analyzer::new();
    assert!(!analyzer.analyze(&source));
    assert_eq!(analyzer.diagnostics().error_count(), 1);
    assert!(analyzer.diagnostics().errors().next().unwrap().message().contains("ghost"));
}

#[test]
fn analyzer_reports_duplicate_but_continues() {
    // int x; int x; unknown;
    let source = Source::new(
        vec![
            decl_stmt(var("x")),
            decl_stmt(var("x")),
            Stmt::expr(
                Some(Expr::identifier("unknown", range(3, 1, 8)).unwrap()),
                range(3, 1, 9),
            ),
        ],
        Range::invalid(),
    );

    let mut analyzer = Analyzer::new();
    assert!(!analyzer.analyze(&source));
    // Both the redeclaration and the unknown identifier are reported.
    assert_eq!(analyzer.diagnostics().error_count(), 2);
}

#[test]
fn function_parameters_scope_over_the_body() {
    // void inc(int value) { value; }
    let body = CompoundStmt::new(vec![Stmt::expr(
        Some(Expr::identifier("value", range(1, 22, 27)).unwrap()),
        range(1, 22, 28),
    )]);
    let func = Decl::function(
        TypeRef::Void,
        "inc",
        vec![VariableDecl::new(TypeRef::Int, "value", None).unwrap()],
        body,
        range(1, 1, 30),
    )
    .unwrap();

    let source = Source::new(vec![decl_stmt(func)], Range::invalid());

    let mut analyzer = Analyzer::new();
    assert!(analyzer.analyze(&source));
}

#[test]
fn function_parameters_do_not_leak_outside() {
    // void f(int hidden) {} hidden;
    let func = Decl::function(
        TypeRef::Void,
        "f",
        vec![VariableDecl::new(TypeRef::Int, "hidden", None).unwrap()],
        CompoundStmt::default(),
        range(1, 1, 20),
    )
    .unwrap();

    let source = Source::new(
        vec![
            decl_stmt(func),
            Stmt::expr(
                Some(Expr::identifier("hidden", range(2, 1, 7)).unwrap()),
                range(2, 1, 8),
            ),
        ],
        Range::invalid(),
    );

    let mut analyzer = Analyzer::new();
    assert!(!analyzer.analyze(&source));
}

#[test]
fn for_init_scopes_over_condition_and_body() {
    // for (int i = 0; i < 10; i++) i;
    let init = decl_stmt(
        Decl::variable(
            TypeRef::Int,
            "i",
            Some(Expr::int_literal(0, range(1, 14, 15))),
            range(1, 6, 15),
        )
        .unwrap(),
    );
    let cond = Expr::binary(
        BinaryOp::Lt,
        Expr::identifier("i", range(1, 17, 18)).unwrap(),
        Expr::int_literal(10, range(1, 21, 23)),
        range(1, 17, 23),
    );
    let inc = Expr::unary(
        UnaryOp::PostInc,
        Expr::identifier("i", range(1, 25, 26)).unwrap(),
        range(1, 25, 28),
    );
    let body = Stmt::expr(
        Some(Expr::identifier("i", range(1, 30, 31)).unwrap()),
        range(1, 30, 32),
    );

    let source = Source::new(
        vec![Stmt::for_stmt(init, Some(cond), Some(inc), body, range(1, 1, 32))],
        Range::invalid(),
    );

    let mut analyzer = Analyzer::new();
    assert!(analyzer.analyze(&source));
}
