//! Shared AST builders and assertions for the checker integration tests.
//!
//! There is no parser in this workspace, so programs are assembled by hand.
//! Every builder takes the source line its node sits on.

#![allow(dead_code)]

use aura_checker::{CheckContext, CheckedFile};
use aura_types::ast::*;
use aura_types::{Diagnostics, ErrorCode, Span, Type, Visibility};

// ══════════════════════════════════════════════════════════════════════════════
// Checking
// ══════════════════════════════════════════════════════════════════════════════

pub fn check(stmts: &[Stmt]) -> Result<CheckedFile, Diagnostics> {
    CheckContext::default().check_file("test.aura", stmts)
}

fn render(errors: &Diagnostics) -> String {
    errors
        .errors
        .iter()
        .map(|e| format!("  [{}] line {}: {}", e.code, e.line, e.message))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn assert_ok(stmts: &[Stmt]) -> CheckedFile {
    match check(stmts) {
        Ok(checked) => checked,
        Err(errors) => panic!(
            "expected no errors, got {}:\n{}",
            errors.total_errors,
            render(&errors)
        ),
    }
}

pub fn assert_error(stmts: &[Stmt], expected_code: ErrorCode) -> Diagnostics {
    let errors = match check(stmts) {
        Ok(_) => panic!("expected error {expected_code}, but got no errors"),
        Err(errors) => errors,
    };
    assert!(
        errors.errors.iter().any(|e| e.code == expected_code),
        "expected error code {expected_code}, got:\n{}",
        render(&errors)
    );
    errors
}

pub fn assert_n_errors(stmts: &[Stmt], n: usize) -> Diagnostics {
    let errors = check(stmts).err().unwrap_or_default();
    assert_eq!(
        errors.total_errors,
        n,
        "expected {n} errors, got {}:\n{}",
        errors.total_errors,
        render(&errors)
    );
    errors
}

// ══════════════════════════════════════════════════════════════════════════════
// Types
// ══════════════════════════════════════════════════════════════════════════════

pub fn list_of(ty: Type) -> Type {
    Type::List(Box::new(ty))
}

pub fn map_of(key: Type, value: Type) -> Type {
    Type::Map(Box::new(key), Box::new(value))
}

pub fn named(name: &str) -> Type {
    Type::Unknown(name.to_string())
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

pub fn id(name: &str, line: u32) -> Ident {
    Ident::new(name, Span::line(line))
}

fn expr(kind: ExprKind, line: u32) -> Expr {
    Expr::new(kind, Span::line(line))
}

pub fn int(v: i64, line: u32) -> Expr {
    expr(ExprKind::Int(v), line)
}

pub fn float(v: f64, line: u32) -> Expr {
    expr(ExprKind::Float(v), line)
}

pub fn string(s: &str, line: u32) -> Expr {
    expr(ExprKind::String(s.to_string()), line)
}

pub fn boolean(b: bool, line: u32) -> Expr {
    expr(ExprKind::Bool(b), line)
}

pub fn character(c: char, line: u32) -> Expr {
    expr(ExprKind::Char(c), line)
}

pub fn nil(line: u32) -> Expr {
    expr(ExprKind::Nil, line)
}

pub fn list(items: Vec<Expr>, line: u32) -> Expr {
    expr(ExprKind::List(items), line)
}

pub fn map(entries: Vec<(Expr, Expr)>, line: u32) -> Expr {
    expr(ExprKind::Map(entries), line)
}

pub fn var(name: &str, line: u32) -> Expr {
    expr(ExprKind::Variable(id(name, line)), line)
}

pub fn this(line: u32) -> Expr {
    expr(ExprKind::This, line)
}

pub fn assign(name: &str, value: Expr, line: u32) -> Expr {
    expr(
        ExprKind::Assignment {
            name: id(name, line),
            value: Box::new(value),
        },
        line,
    )
}

pub fn increment(operand: Expr, line: u32) -> Expr {
    expr(ExprKind::Increment(Box::new(operand)), line)
}

pub fn decrement(operand: Expr, line: u32) -> Expr {
    expr(ExprKind::Decrement(Box::new(operand)), line)
}

pub fn binary(left: Expr, op: BinaryOp, right: Expr, line: u32) -> Expr {
    expr(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        line,
    )
}

pub fn logical(left: Expr, op: LogicalOp, right: Expr, line: u32) -> Expr {
    expr(
        ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        line,
    )
}

pub fn unary(op: UnaryOp, operand: Expr, line: u32) -> Expr {
    expr(
        ExprKind::Unary {
            op,
            operand: Box::new(operand),
        },
        line,
    )
}

pub fn is(value: Expr, interface: &str, line: u32) -> Expr {
    expr(
        ExprKind::Is {
            expr: Box::new(value),
            interface: id(interface, line),
        },
        line,
    )
}

pub fn call_expr(callee: Expr, arguments: Vec<Argument>, line: u32) -> CallExpr {
    CallExpr {
        callee: Box::new(callee),
        arguments,
        span: Span::line(line),
    }
}

/// `callee(a, b, ...)`
pub fn call(callee: Expr, args: Vec<Expr>, line: u32) -> Expr {
    let arguments = args
        .into_iter()
        .map(|value| Argument { name: None, value })
        .collect();
    expr(ExprKind::Call(call_expr(callee, arguments, line)), line)
}

/// `callee(name: a, ...)`
pub fn call_named(callee: Expr, args: Vec<(&str, Expr)>, line: u32) -> Expr {
    let arguments = args
        .into_iter()
        .map(|(name, value)| Argument {
            name: Some(id(name, line)),
            value,
        })
        .collect();
    expr(ExprKind::Call(call_expr(callee, arguments, line)), line)
}

pub fn get(object: Expr, name: &str, line: u32) -> Expr {
    expr(
        ExprKind::Get {
            object: Box::new(object),
            name: id(name, line),
        },
        line,
    )
}

pub fn set(object: Expr, name: &str, value: Expr, line: u32) -> Expr {
    expr(
        ExprKind::Set {
            object: Box::new(object),
            name: id(name, line),
            value: Box::new(value),
        },
        line,
    )
}

pub fn index(object: Expr, i: Expr, line: u32) -> Expr {
    expr(
        ExprKind::GetIndex {
            object: Box::new(object),
            index: Box::new(i),
        },
        line,
    )
}

pub fn slice(object: Expr, lower: Expr, upper: Expr, line: u32) -> Expr {
    expr(
        ExprKind::GetIndexRange {
            object: Box::new(object),
            lower: Box::new(lower),
            upper: Box::new(upper),
        },
        line,
    )
}

pub fn block_of(stmts: Vec<Stmt>, line: u32) -> Block {
    Block {
        stmts,
        span: Span::line(line),
    }
}

pub fn block(stmts: Vec<Stmt>, line: u32) -> Expr {
    expr(ExprKind::Block(block_of(stmts, line)), line)
}

pub fn if_expr(condition: Expr, then: Vec<Stmt>, otherwise: Option<Expr>, line: u32) -> Expr {
    expr(
        ExprKind::If(Box::new(IfExpr {
            condition,
            then_branch: block_of(then, line),
            else_branch: otherwise,
        })),
        line,
    )
}

pub fn lambda(params: Vec<Param>, return_type: Option<Type>, body: Vec<Stmt>, line: u32) -> Expr {
    expr(
        ExprKind::AnonymousFunction(Box::new(AnonymousFunction {
            params: on_line(params, line),
            return_type,
            body: block_of(body, line),
        })),
        line,
    )
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// `mod name` on line 1 followed by `body`.
pub fn module(name: &str, body: Vec<Stmt>) -> Vec<Stmt> {
    let mut stmts = vec![Stmt::Mod(ModStmt {
        name: id(name, 1),
        span: Span::line(1),
    })];
    stmts.extend(body);
    stmts
}

pub fn expr_stmt(e: Expr) -> Stmt {
    let span = e.span;
    Stmt::Expression(ExprStmt { expr: e, span })
}

/// `let name: ty = init`
pub fn let_stmt(name: &str, ty: Option<Type>, init: Option<Expr>, line: u32) -> Stmt {
    Stmt::Let(LetStmt {
        name: id(name, line),
        mutable: false,
        annotation: ty,
        initializer: init,
        span: Span::line(line),
    })
}

/// `name := init`
pub fn short_let(name: &str, init: Expr, line: u32) -> Stmt {
    let_stmt(name, None, Some(init), line)
}

/// `mut name := init`
pub fn mut_let(name: &str, init: Expr, line: u32) -> Stmt {
    Stmt::Let(LetStmt {
        name: id(name, line),
        mutable: true,
        annotation: None,
        initializer: Some(init),
        span: Span::line(line),
    })
}

pub fn ret(value: Option<Expr>, line: u32) -> Stmt {
    Stmt::Return(ReturnStmt {
        value,
        span: Span::line(line),
    })
}

pub fn yield_stmt(value: Expr, line: u32) -> Stmt {
    Stmt::Yield(YieldStmt {
        value,
        span: Span::line(line),
    })
}

pub fn break_stmt(line: u32) -> Stmt {
    Stmt::Break(Span::line(line))
}

pub fn continue_stmt(line: u32) -> Stmt {
    Stmt::Continue(Span::line(line))
}

pub fn comment(text: &str, line: u32) -> Stmt {
    Stmt::Comment(CommentStmt {
        text: text.to_string(),
        span: Span::line(line),
    })
}

pub fn defer(callee: Expr, args: Vec<Expr>, line: u32) -> Stmt {
    let arguments = args
        .into_iter()
        .map(|value| Argument { name: None, value })
        .collect();
    Stmt::Defer(DeferStmt {
        call: call_expr(callee, arguments, line),
        span: Span::line(line),
    })
}

pub fn while_stmt(condition: Expr, body: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::While(WhileStmt {
        condition,
        body,
        span: Span::line(line),
    })
}

pub fn for_stmt(
    init: Option<Stmt>,
    condition: Option<Expr>,
    increment: Option<Expr>,
    body: Vec<Stmt>,
    line: u32,
) -> Stmt {
    Stmt::For(ForStmt {
        init: init.map(Box::new),
        condition,
        increment,
        body,
        span: Span::line(line),
    })
}

pub fn foreach(name: &str, iterable: Expr, body: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::ForEach(ForEachStmt {
        each_name: id(name, line),
        iterable,
        body,
        span: Span::line(line),
    })
}

/// A parameter; declaration builders move it onto their own line.
pub fn param(name: &str, ty: Type) -> Param {
    Param {
        name: id(name, 0),
        ty,
        variadic: false,
        default: None,
    }
}

pub fn param_default(name: &str, ty: Type, default: Expr) -> Param {
    Param {
        default: Some(default),
        ..param(name, ty)
    }
}

pub fn variadic(name: &str, ty: Type) -> Param {
    Param {
        variadic: true,
        ..param(name, ty)
    }
}

fn on_line(params: Vec<Param>, line: u32) -> Vec<Param> {
    params
        .into_iter()
        .map(|param| Param {
            name: id(&param.name.name, line),
            ..param
        })
        .collect()
}

/// A public function declaration.
pub fn function(name: &str, params: Vec<Param>, ret: Option<Type>, body: Vec<Stmt>, line: u32) -> FunctionDecl {
    FunctionDecl {
        name: id(name, line),
        visibility: Visibility::Public,
        params: on_line(params, line),
        return_type: ret,
        body: block_of(body, line),
        span: Span::line(line),
    }
}

pub fn private(mut decl: FunctionDecl) -> FunctionDecl {
    decl.visibility = Visibility::Private;
    decl
}

pub fn fn_stmt(name: &str, params: Vec<Param>, ret: Option<Type>, body: Vec<Stmt>, line: u32) -> Stmt {
    Stmt::NamedFunction(function(name, params, ret, body, line))
}

pub fn class(name: &str, params: Vec<Param>, methods: Vec<FunctionDecl>, implements: &[&str], line: u32) -> Stmt {
    Stmt::Class(ClassDecl {
        name: id(name, line),
        visibility: Visibility::Public,
        params: on_line(params, line),
        methods,
        implements: implements.iter().map(|i| id(i, line)).collect(),
        span: Span::line(line),
    })
}

pub fn method_sig(name: &str, params: Vec<Param>, ret: Option<Type>, line: u32) -> FunctionSignature {
    FunctionSignature {
        name: id(name, line),
        visibility: Visibility::Public,
        params: on_line(params, line),
        return_type: ret,
        span: Span::line(line),
    }
}

pub fn interface(name: &str, methods: Vec<FunctionSignature>, line: u32) -> Stmt {
    Stmt::Interface(InterfaceDecl {
        name: id(name, line),
        visibility: Visibility::Public,
        methods,
        span: Span::line(line),
    })
}

pub fn import_decl(package: &str, alias: Option<&str>, line: u32) -> ImportStmt {
    ImportStmt {
        package: id(package, line),
        alias: alias.map(|a| id(a, line)),
        span: Span::line(line),
    }
}

pub fn import(package: &str, alias: Option<&str>, line: u32) -> Stmt {
    Stmt::Import(import_decl(package, alias, line))
}

pub fn import_all(imports: Vec<ImportStmt>, line: u32) -> Stmt {
    Stmt::MultipleImport(MultipleImportStmt {
        imports,
        span: Span::line(line),
    })
}
