//! Shared types for the Aura compiler.
//!
//! This crate defines the untyped and typed AST, the semantic type lattice,
//! source spans, and the structured diagnostics used across compiler stages.

mod error;
mod span;
mod ty;
pub mod ast;
pub mod typed_ast;

pub use error::{Diagnostic, Diagnostics, ErrorCategory, ErrorCode, MAX_ERRORS};
pub use span::Span;
pub use ty::{ClassType, FunctionSig, InterfaceType, ModuleType, NamedFunction, Param, Type, Visibility};

/// Result type for operations that report a batch of diagnostics.
pub type Result<T> = std::result::Result<T, Diagnostics>;
