//! Stores for the innermost enclosing class, expression and statement.
//!
//! The checker pushes an entry when it enters a construct and a guard pops
//! it on every exit path (see [`crate::checker::Guard`]).

use aura_types::ast::ExprKind;
use aura_types::ClassType;

/// A stack where only the top entry matters to readers.
#[derive(Debug)]
pub struct EnclosingNodeStore<T> {
    stack: Vec<T>,
}

impl<T> EnclosingNodeStore<T> {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, node: T) {
        self.stack.push(node);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.stack.last()
    }
}

impl<T> Default for EnclosingNodeStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of expression being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosingExpr {
    If,
    Block,
    Other,
}

impl EnclosingExpr {
    pub fn of(kind: &ExprKind) -> Self {
        match kind {
            ExprKind::If(_) => EnclosingExpr::If,
            ExprKind::Block(_) => EnclosingExpr::Block,
            _ => EnclosingExpr::Other,
        }
    }

    /// `yield` hands a value to the innermost if or block.
    pub fn accepts_yield(self) -> bool {
        matches!(self, EnclosingExpr::If | EnclosingExpr::Block)
    }
}

/// The kind of statement being checked. Only statements that contain other
/// statements or expressions are ever pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosingStmt {
    For,
    ForEach,
    While,
    Function,
    Class,
    Let,
    Return,
    Defer,
}

impl EnclosingStmt {
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            EnclosingStmt::For | EnclosingStmt::ForEach | EnclosingStmt::While
        )
    }
}

/// A class whose signature is known while its method bodies are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct PartiallyTypedClass {
    pub signature: ClassType,
}
