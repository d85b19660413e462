//! Untyped AST node types for the Aura language, as produced by the parser.
//!
//! Every node carries a [`Span`] for error reporting. Type annotations are
//! already [`Type`] values; names of user-defined types arrive as
//! [`Type::Unknown`] and are resolved by the checker.

use crate::{Span, Type, Visibility};

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `defer f(x)`
    Defer(DeferStmt),
    Expression(ExprStmt),
    /// `for i := 0; i < n; i++ { ... }`
    For(ForStmt),
    /// `foreach item in items { ... }`
    ForEach(ForEachStmt),
    NamedFunction(FunctionDecl),
    /// `let x: T = v`, `mut x := v`
    Let(LetStmt),
    /// `mod main`
    Mod(ModStmt),
    Return(ReturnStmt),
    Class(ClassDecl),
    While(WhileStmt),
    /// `import aura/io as io`
    Import(ImportStmt),
    /// `import ( aura/io, aura/strings as s )`
    MultipleImport(MultipleImportStmt),
    Comment(CommentStmt),
    Continue(Span),
    Break(Span),
    /// `yield v`
    Yield(YieldStmt),
    Interface(InterfaceDecl),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Defer(s) => s.span,
            Stmt::Expression(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::NamedFunction(s) => s.span,
            Stmt::Let(s) => s.span,
            Stmt::Mod(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Class(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Import(s) => s.span,
            Stmt::MultipleImport(s) => s.span,
            Stmt::Comment(s) => s.span,
            Stmt::Continue(span) | Stmt::Break(span) => *span,
            Stmt::Yield(s) => s.span,
            Stmt::Interface(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeferStmt {
    pub call: CallExpr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// Every clause is optional; the body never yields a value.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub increment: Option<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForEachStmt {
    pub each_name: Ident,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `fn name(params) -> T { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    /// `None` means `Nil`.
    pub return_type: Option<Type>,
    pub body: Block,
    pub span: Span,
}

/// A function parameter: `name: T`, `name: T = literal`, `...name: T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Ident,
    pub ty: Type,
    pub variadic: bool,
    pub default: Option<Expr>,
}

/// A long-form let carries an annotation; the short form `x := v` does not
/// and always carries an initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Ident,
    pub mutable: bool,
    pub annotation: Option<Type>,
    pub initializer: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModStmt {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldStmt {
    pub value: Expr,
    pub span: Span,
}

/// `class Name(params) : Iface1, Iface2 { methods }`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: Ident,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub methods: Vec<FunctionDecl>,
    pub implements: Vec<Ident>,
    pub span: Span,
}

/// `interface Name { fn m(x: Int) -> Int }`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub visibility: Visibility,
    pub methods: Vec<FunctionSignature>,
    pub span: Span,
}

/// A bodiless function signature.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: Ident,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportStmt {
    /// Slash-separated package path, e.g. `aura/strings`.
    pub package: Ident,
    pub alias: Option<Ident>,
    pub span: Span,
}

impl ImportStmt {
    /// The namespace the import registers under: the alias, else the last
    /// path segment.
    pub fn namespace(&self) -> &str {
        match &self.alias {
            Some(alias) => &alias.name,
            None => self
                .package
                .name
                .rsplit('/')
                .next()
                .unwrap_or(&self.package.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipleImportStmt {
    pub imports: Vec<ImportStmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommentStmt {
    pub text: String,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Literal forms are the only expressions allowed as parameter defaults.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Int(_)
                | ExprKind::Float(_)
                | ExprKind::String(_)
                | ExprKind::Char(_)
                | ExprKind::Bool(_)
                | ExprKind::Nil
                | ExprKind::List(_)
                | ExprKind::Map(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    Int(i64),
    Float(f64),
    String(String),
    Char(char),
    Bool(bool),
    Nil,
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `{ k: v, ... }`
    Map(Vec<(Expr, Expr)>),

    // ── Names ──
    Variable(Ident),
    This,
    /// `x = v`
    Assignment {
        name: Ident,
        value: Box<Expr>,
    },
    /// `x++`
    Increment(Box<Expr>),
    /// `x--`
    Decrement(Box<Expr>),

    // ── Operators ──
    /// Arithmetic: `a + b`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Comparison and boolean connectives: `a < b`, `a and b`
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// `(expr)`
    Grouping(Box<Expr>),
    /// `expr is Interface`
    Is {
        expr: Box<Expr>,
        interface: Ident,
    },

    // ── Access ──
    Call(CallExpr),
    /// `obj.name`
    Get {
        object: Box<Expr>,
        name: Ident,
    },
    /// `obj.name = v`
    Set {
        object: Box<Expr>,
        name: Ident,
        value: Box<Expr>,
    },
    /// `obj[i]`
    GetIndex {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `obj[lo:hi]`
    GetIndexRange {
        object: Box<Expr>,
        lower: Box<Expr>,
        upper: Box<Expr>,
    },

    // ── Control Flow ──
    Block(Block),
    If(Box<IfExpr>),
    /// `fn(params) -> T { body }`
    AnonymousFunction(Box<AnonymousFunction>),
}

/// `callee(args)`; arguments are either all positional or all named.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Argument>,
    pub span: Span,
}

/// `value` or `name: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Option<Ident>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `if cond { ... } else <block or if>`
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnonymousFunction {
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `!x`
    Not,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
            LogicalOp::Eq => "==",
            LogicalOp::NotEq => "!=",
            LogicalOp::Less => "<",
            LogicalOp::LessEq => "<=",
            LogicalOp::Greater => ">",
            LogicalOp::GreaterEq => ">=",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}
