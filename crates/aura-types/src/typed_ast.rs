//! Typed AST produced by the type checker and consumed by code generation.
//!
//! The tree mirrors [`crate::ast`] node for node. Every expression and
//! statement carries its resolved [`Type`]; statements carry [`Type::None`].

use crate::ast::{BinaryOp, Ident, LogicalOp, UnaryOp};
use crate::{ClassType, InterfaceType, NamedFunction, Param, Span, Type};

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct TypedStmt {
    pub kind: TypedStmtKind,
    pub ty: Type,
    pub span: Span,
}

impl TypedStmt {
    /// A statement node; statements have no value type.
    pub fn new(kind: TypedStmtKind, span: Span) -> Self {
        Self {
            kind,
            ty: Type::None,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmtKind {
    Defer(TypedCall),
    Expression(TypedExpr),
    For(Box<TypedFor>),
    ForEach(Box<TypedForEach>),
    NamedFunction(Box<TypedFunction>),
    Let(Box<TypedLet>),
    Mod(Ident),
    Return(Option<TypedExpr>),
    Class(Box<TypedClass>),
    While(Box<TypedWhile>),
    Import(TypedImport),
    MultipleImport(Vec<TypedImport>),
    Comment(String),
    Continue,
    Break,
    Yield(TypedExpr),
    Interface(InterfaceType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedFor {
    pub init: Option<TypedStmt>,
    pub condition: Option<TypedExpr>,
    pub increment: Option<TypedExpr>,
    pub body: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedForEach {
    pub each_name: Ident,
    pub iterable: TypedExpr,
    pub body: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedWhile {
    pub condition: TypedExpr,
    pub body: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedFunction {
    pub name: Ident,
    pub signature: NamedFunction,
    pub body: TypedBlock,
}

/// The initializer is always present: omitted ones are filled with the
/// annotated type's default.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedLet {
    pub name: Ident,
    pub mutable: bool,
    /// Whether the source carried an explicit annotation.
    pub annotated: bool,
    pub var_ty: Type,
    pub initializer: TypedExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedClass {
    pub name: Ident,
    pub signature: ClassType,
    pub methods: Vec<TypedFunction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedImport {
    pub package: String,
    pub namespace: String,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    pub ty: Type,
    pub span: Span,
}

impl TypedExpr {
    pub fn new(kind: TypedExprKind, ty: Type, span: Span) -> Self {
        Self { kind, ty, span }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            TypedExprKind::Int(_)
                | TypedExprKind::Float(_)
                | TypedExprKind::String(_)
                | TypedExprKind::Char(_)
                | TypedExprKind::Bool(_)
                | TypedExprKind::Nil
                | TypedExprKind::List(_)
                | TypedExprKind::Map(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    // ── Literals ──
    Int(i64),
    Float(f64),
    String(String),
    Char(char),
    Bool(bool),
    Nil,
    List(Vec<TypedExpr>),
    Map(Vec<(TypedExpr, TypedExpr)>),

    // ── Names ──
    Variable(Ident),
    This,
    Assignment {
        name: Ident,
        value: Box<TypedExpr>,
    },
    Increment(Box<TypedExpr>),
    Decrement(Box<TypedExpr>),

    // ── Operators ──
    Binary {
        left: Box<TypedExpr>,
        op: BinaryOp,
        right: Box<TypedExpr>,
    },
    Logical {
        left: Box<TypedExpr>,
        op: LogicalOp,
        right: Box<TypedExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TypedExpr>,
    },
    Grouping(Box<TypedExpr>),
    Is {
        expr: Box<TypedExpr>,
        interface: InterfaceType,
    },

    // ── Access ──
    Call(TypedCall),
    Get {
        object: Box<TypedExpr>,
        name: Ident,
        access: GetAccess,
    },
    Set {
        object: Box<TypedExpr>,
        name: Ident,
        value: Box<TypedExpr>,
    },
    GetIndex {
        object: Box<TypedExpr>,
        index: Box<TypedExpr>,
    },
    GetIndexRange {
        object: Box<TypedExpr>,
        lower: Box<TypedExpr>,
        upper: Box<TypedExpr>,
    },

    // ── Control Flow ──
    Block(TypedBlock),
    If(Box<TypedIf>),
    AnonymousFunction(Box<TypedAnonymousFunction>),
}

/// How a `Get` was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetAccess {
    /// `module.member` on an imported namespace.
    ModuleMember { namespace: String },
    /// A field or method of a class instance.
    Attribute,
    /// A method on a builtin value, backed by a stdlib function that takes
    /// the object as its leading receiver argument.
    BuiltinMethod { namespace: String },
}

/// The arguments are in declaration order with omitted defaults filled in.
/// For a builtin method call the receiver is the callee's object and is
/// not repeated here.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedCall {
    pub callee: Box<TypedExpr>,
    pub arguments: Vec<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedBlock {
    pub stmts: Vec<TypedStmt>,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedIf {
    pub condition: TypedExpr,
    pub then_branch: TypedBlock,
    pub else_branch: Option<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedAnonymousFunction {
    pub params: Vec<Param>,
    pub ret: Type,
    pub body: TypedBlock,
}
