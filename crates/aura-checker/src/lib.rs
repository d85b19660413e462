//! Static semantic analyzer for Aura.
//!
//! Takes the untyped AST of a module, resolves every name, checks every
//! expression and statement against the language's type rules, and produces
//! the typed AST the code generator consumes.
//!
//! # Usage
//!
//! ```ignore
//! use aura_checker::{CheckContext, CheckerConfig, InMemoryResolver};
//!
//! let mut ctx = CheckContext::new(CheckerConfig::default(), InMemoryResolver::new());
//! match ctx.check_file("src/main.aura", &stmts) {
//!     Ok(checked) => codegen(checked.stmts),
//!     Err(errors) => eprintln!("{errors}"),
//! }
//! ```

pub mod checker;
pub mod config;
pub mod enclosing;
pub mod error;
pub mod module;
pub mod prelude;
pub mod prepass;
pub mod stdlib;
pub mod symbols;

pub use checker::TypeChecker;
pub use config::CheckerConfig;
pub use error::{CheckResult, TypeCheckError};
pub use module::{CheckContext, CheckedFile, InMemoryResolver, ModuleResolver, ModuleSource, NoResolver, ResolveError};
pub use prepass::{Declared, ModuleItem};
pub use stdlib::StdlibRegistry;
pub use symbols::{Symbol, SymbolsTable};

use aura_types::ast::Stmt;

/// Check a single file that imports nothing but the standard library.
pub fn type_check(path: &str, stmts: &[Stmt]) -> aura_types::Result<CheckedFile> {
    CheckContext::default().check_file(path, stmts)
}
