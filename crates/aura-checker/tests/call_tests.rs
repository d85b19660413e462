//! Argument matching: positional, named, defaults and variadics.

mod common;

use aura_types::ast::{Argument, Expr, ExprKind, Stmt};
use aura_types::typed_ast::{TypedCall, TypedExprKind, TypedStmtKind};
use aura_types::{ErrorCode, Span, Type};
use common::*;

/// `fn greet(name: String, greeting: String = "Hello", times: Int = 1) -> String`
fn greet_decl() -> Stmt {
    fn_stmt(
        "greet",
        vec![
            param("name", Type::String),
            param_default("greeting", Type::String, string("Hello", 2)),
            param_default("times", Type::Int, int(1, 2)),
        ],
        Some(Type::String),
        vec![ret(Some(var("greeting", 3)), 3)],
        2,
    )
}

/// The typed call in the initializer of the let at `index`.
fn let_call(stmts: &[Stmt], index: usize) -> TypedCall {
    let checked = assert_ok(stmts);
    match &checked.stmts[index].kind {
        TypedStmtKind::Let(l) => match &l.initializer.kind {
            TypedExprKind::Call(call) => call.clone(),
            other => panic!("expected a call, got {other:?}"),
        },
        other => panic!("expected a let, got {other:?}"),
    }
}

fn mixed_call(callee: Expr, positional: Vec<Expr>, named: Vec<(&str, Expr)>, line: u32) -> Expr {
    let mut arguments: Vec<Argument> = positional
        .into_iter()
        .map(|value| Argument { name: None, value })
        .collect();
    arguments.extend(named.into_iter().map(|(name, value)| Argument {
        name: Some(id(name, line)),
        value,
    }));
    Expr::new(ExprKind::Call(call_expr(callee, arguments, line)), Span::line(line))
}

// ══════════════════════════════════════════════════════════════════════════════
// Named arguments
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn named_subset_fills_defaults_in_declaration_order() {
    let stmts = module(
        "m",
        vec![
            greet_decl(),
            short_let(
                "s",
                call_named(
                    var("greet", 5),
                    vec![("times", int(3, 5)), ("name", string("Bob", 5))],
                    5,
                ),
                5,
            ),
        ],
    );
    let call = let_call(&stmts, 2);
    let kinds: Vec<&TypedExprKind> = call.arguments.iter().map(|a| &a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &TypedExprKind::String("Bob".into()),
            &TypedExprKind::String("Hello".into()),
            &TypedExprKind::Int(3),
        ]
    );
}

#[test]
fn empty_call_uses_every_default() {
    let stmts = module(
        "m",
        vec![
            fn_stmt(
                "pad",
                vec![
                    param_default("width", Type::Int, int(8, 2)),
                    param_default("fill", Type::Char, character(' ', 2)),
                ],
                None,
                vec![],
                2,
            ),
            short_let("r", call(var("pad", 4), vec![], 4), 4),
        ],
    );
    let call = let_call(&stmts, 2);
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(call.arguments[0].kind, TypedExprKind::Int(8));
    assert_eq!(call.arguments[1].ty, Type::Char);
}

#[test]
fn omitted_parameter_without_default() {
    let errors = assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(call_named(var("greet", 5), vec![("times", int(3, 5))], 5)),
            ],
        ),
        ErrorCode::MISSING_ARGUMENT,
    );
    assert!(errors.errors[0].message.contains("'name'"));

    assert_error(
        &module("m", vec![greet_decl(), expr_stmt(call(var("greet", 5), vec![], 5))]),
        ErrorCode::MISSING_ARGUMENT,
    );
}

#[test]
fn mixing_named_and_positional() {
    assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(mixed_call(
                    var("greet", 5),
                    vec![string("Bob", 5)],
                    vec![("times", int(2, 5))],
                    5,
                )),
            ],
        ),
        ErrorCode::MIXED_ARGUMENTS,
    );
}

#[test]
fn unknown_named_argument() {
    let errors = assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(call_named(var("greet", 5), vec![("nme", string("Bob", 5))], 5)),
            ],
        ),
        ErrorCode::UNKNOWN_ARGUMENT,
    );
    assert!(errors.errors[0].message.contains("nme"));
}

#[test]
fn named_argument_given_twice() {
    let errors = assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(call_named(
                    var("greet", 5),
                    vec![("name", string("Bob", 5)), ("name", string("Ann", 5))],
                    5,
                )),
            ],
        ),
        ErrorCode::DUPLICATE_ARGUMENT,
    );
    assert_eq!(errors.errors[0].message, "'name' is passed to 'greet' more than once");
}

#[test]
fn named_argument_type_is_checked() {
    assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(call_named(
                    var("greet", 5),
                    vec![("name", string("Bob", 5)), ("times", string("3", 5))],
                    5,
                )),
            ],
        ),
        ErrorCode::UNEXPECTED_TYPE,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Positional arguments
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn positional_arity_is_exact() {
    assert_ok(&module(
        "m",
        vec![
            greet_decl(),
            expr_stmt(call(
                var("greet", 5),
                vec![string("Bob", 5), string("Hi", 5), int(2, 5)],
                5,
            )),
        ],
    ));
    let errors = assert_error(
        &module(
            "m",
            vec![greet_decl(), expr_stmt(call(var("greet", 5), vec![string("Bob", 5)], 5))],
        ),
        ErrorCode::WRONG_ARG_COUNT,
    );
    assert_eq!(errors.errors[0].message, "'greet' expects 3 arguments, got 1");
}

#[test]
fn positional_types_are_checked() {
    assert_error(
        &module(
            "m",
            vec![
                greet_decl(),
                expr_stmt(call(
                    var("greet", 5),
                    vec![int(1, 5), string("Hi", 5), int(2, 5)],
                    5,
                )),
            ],
        ),
        ErrorCode::UNEXPECTED_TYPE,
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Variadics
// ══════════════════════════════════════════════════════════════════════════════

fn sum_decl() -> Stmt {
    fn_stmt(
        "sum",
        vec![param("label", Type::String), variadic("nums", Type::Int)],
        Some(Type::Int),
        vec![ret(Some(int(0, 3)), 3)],
        2,
    )
}

#[test]
fn variadic_absorbs_trailing_arguments() {
    let stmts = module(
        "m",
        vec![
            sum_decl(),
            short_let(
                "t",
                call(
                    var("sum", 5),
                    vec![string("total", 5), int(1, 5), int(2, 5), int(3, 5)],
                    5,
                ),
                5,
            ),
        ],
    );
    let call = let_call(&stmts, 2);
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(call.arguments[1].ty, list_of(Type::Int));
    match &call.arguments[1].kind {
        TypedExprKind::List(items) => assert_eq!(items.len(), 3),
        other => panic!("expected a packed list, got {other:?}"),
    }
}

#[test]
fn variadic_may_absorb_nothing() {
    let stmts = module(
        "m",
        vec![
            sum_decl(),
            short_let("t", call(var("sum", 5), vec![string("none", 5)], 5), 5),
        ],
    );
    let call = let_call(&stmts, 2);
    assert_eq!(call.arguments[1].kind, TypedExprKind::List(vec![]));
    assert_eq!(call.arguments[1].ty, list_of(Type::Int));

    let named = module(
        "m",
        vec![
            sum_decl(),
            short_let("t", call_named(var("sum", 5), vec![("label", string("x", 5))], 5), 5),
        ],
    );
    assert_eq!(let_call(&named, 2).arguments[1].ty, list_of(Type::Int));
}

#[test]
fn variadic_elements_are_checked() {
    assert_error(
        &module(
            "m",
            vec![
                sum_decl(),
                expr_stmt(call(
                    var("sum", 5),
                    vec![string("total", 5), int(1, 5), string("2", 5)],
                    5,
                )),
            ],
        ),
        ErrorCode::UNEXPECTED_TYPE,
    );
    assert_error(
        &module("m", vec![sum_decl(), expr_stmt(call(var("sum", 5), vec![], 5))]),
        ErrorCode::MISSING_ARGUMENT,
    );
}

#[test]
fn printf_accepts_any_trailing_values() {
    assert_ok(&module(
        "m",
        vec![expr_stmt(call(
            var("printf", 2),
            vec![string("%d %s", 2), int(1, 2), string("a", 2), boolean(true, 2)],
            2,
        ))],
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Declarations
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn default_must_be_a_literal() {
    assert_error(
        &module(
            "m",
            vec![fn_stmt(
                "f",
                vec![param_default("x", Type::Int, var("y", 2))],
                None,
                vec![],
                2,
            )],
        ),
        ErrorCode::DEFAULT_NOT_LITERAL,
    );
}

#[test]
fn default_must_match_parameter_type() {
    assert_error(
        &module(
            "m",
            vec![fn_stmt(
                "f",
                vec![param_default("x", Type::Int, string("one", 2))],
                None,
                vec![],
                2,
            )],
        ),
        ErrorCode::UNEXPECTED_TYPE,
    );
}

#[test]
fn constructor_calls_match_like_functions() {
    let point = || {
        class(
            "Point",
            vec![param("x", Type::Int), param_default("y", Type::Int, int(0, 2))],
            vec![],
            &[],
            2,
        )
    };
    let stmts = module(
        "m",
        vec![point(), short_let("p", call_named(var("Point", 3), vec![("x", int(4, 3))], 3), 3)],
    );
    let call = let_call(&stmts, 2);
    assert_eq!(call.arguments[1].kind, TypedExprKind::Int(0));

    assert_error(
        &module("m", vec![point(), expr_stmt(common::call(var("Point", 3), vec![int(4, 3)], 3))]),
        ErrorCode::WRONG_ARG_COUNT,
    );
}
