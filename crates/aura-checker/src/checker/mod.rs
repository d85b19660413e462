//! Aura type checker: walks an untyped module and produces the typed AST.
//!
//! Entry points: [`TypeChecker::build_symbols_table`] (signature pre-pass)
//! followed by [`TypeChecker::check_types`]. Most callers go through
//! [`crate::CheckContext::check_file`], which runs both.
//!
//! Each top-level declaration is checked independently. A failure inside
//! one is recorded in the pass's [`Diagnostics`] and checking moves on to
//! the next declaration.

mod call;
mod decl;
mod expr;
mod stmt;

use std::ops::{Deref, DerefMut};

use aura_types::ast::{Expr, ExprKind, ImportStmt};
use aura_types::typed_ast::{TypedExpr, TypedExprKind, TypedImport, TypedStmt};
use aura_types::{Diagnostics, Type};

use crate::enclosing::{EnclosingExpr, EnclosingNodeStore, EnclosingStmt, PartiallyTypedClass};
use crate::error::{CheckResult, TypeCheckError};
use crate::module::{CheckContext, ImportFailure};
use crate::prepass::{Declared, ModuleItem};
use crate::symbols::{NamespaceHandle, Symbol};

// ══════════════════════════════════════════════════════════════════════════════
// TypeChecker
// ══════════════════════════════════════════════════════════════════════════════

/// Checks one source file against a shared [`CheckContext`].
pub struct TypeChecker<'c> {
    pub(crate) ctx: &'c mut CheckContext,
    file: String,
    /// Name from the file's `mod` statement.
    pub(crate) module: String,
    /// Symbol namespace of the module, unique per package.
    pub(crate) namespace: String,
    classes: EnclosingNodeStore<PartiallyTypedClass>,
    exprs: EnclosingNodeStore<EnclosingExpr>,
    stmts: EnclosingNodeStore<EnclosingStmt>,
    pub(crate) diagnostics: Diagnostics,
}

impl<'c> TypeChecker<'c> {
    pub fn new(ctx: &'c mut CheckContext, file: impl Into<String>) -> Self {
        let diagnostics = Diagnostics::with_limit(ctx.config.max_errors);
        Self {
            ctx,
            file: file.into(),
            module: String::new(),
            namespace: String::new(),
            classes: EnclosingNodeStore::new(),
            exprs: EnclosingNodeStore::new(),
            stmts: EnclosingNodeStore::new(),
            diagnostics,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Key of this module's namespace in the shared symbols table.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full check of every item the pre-pass produced, in source order.
    pub fn check_types(&mut self, items: Vec<ModuleItem<'_>>) -> Result<Vec<TypedStmt>, Diagnostics> {
        let mut typed = Vec::with_capacity(items.len());
        for item in items {
            let checked = match item {
                ModuleItem::Declared(Declared::Function { decl, signature }) => {
                    self.check_named_function(decl, Some(signature))
                }
                ModuleItem::Declared(Declared::Class { decl, signature }) => {
                    self.check_class(decl, Some(signature))
                }
                ModuleItem::Checked(stmt) => Ok(stmt),
                ModuleItem::Unchecked(stmt) => self.check_stmt(stmt),
            };
            match checked {
                Ok(stmt) => typed.push(stmt),
                Err(err) => self.report(err),
            }
        }
        tracing::debug!(
            module = %self.module,
            file = %self.file,
            stmts = typed.len(),
            errors = self.diagnostics.total_errors,
            "checked"
        );
        self.finish_pass()?;
        Ok(typed)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Diagnostics
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn report(&mut self, err: TypeCheckError) {
        self.diagnostics.push(err.to_diagnostic(&self.file));
    }

    /// Raise everything collected during the pass as one batch.
    pub(crate) fn finish_pass(&mut self) -> Result<(), Diagnostics> {
        if !self.diagnostics.has_errors() {
            return Ok(());
        }
        tracing::warn!(
            file = %self.file,
            errors = self.diagnostics.total_errors,
            "type checking failed"
        );
        let fresh = Diagnostics::with_limit(self.ctx.config.max_errors);
        Err(std::mem::replace(&mut self.diagnostics, fresh))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Symbols
    // ══════════════════════════════════════════════════════════════════════

    /// Bind `name` in the innermost scope of this module.
    pub(crate) fn register(&mut self, name: &str, kind: Type) {
        let symbol = Symbol::new(name, kind, self.namespace.clone());
        self.ctx.symbols.try_add_symbol(symbol);
    }

    /// Builtins first, then the module's scopes.
    pub(crate) fn find_symbol(&self, name: &str) -> Option<&Symbol> {
        let prelude = self.ctx.config.prelude_namespace.as_str();
        self.ctx
            .symbols
            .get_symbol(name, prelude)
            .or_else(|| self.ctx.symbols.get_symbol(name, &self.namespace))
    }

    pub(crate) fn find_or_throw(&self, name: &str, line: u32) -> CheckResult<Type> {
        if let Some(symbol) = self.find_symbol(name) {
            return Ok(symbol.kind.clone());
        }
        if let Some(namespace) = self.imported(name) {
            return Ok(Type::Module(namespace.to_module()));
        }
        Err(TypeCheckError::UnknownVariable {
            name: name.to_string(),
            line,
        })
    }

    /// Replace every `Unknown` placeholder with the type it names.
    /// `module.Name` looks inside an imported namespace.
    pub(crate) fn resolve_type(&self, ty: &Type, line: u32) -> CheckResult<Type> {
        Ok(match ty {
            Type::Unknown(name) => {
                let found = match name.split_once('.') {
                    Some((namespace, member)) => self
                        .imported(namespace)
                        .and_then(|ns| ns.get(member))
                        .map(|s| s.kind.clone()),
                    None => self.find_symbol(name).map(|s| s.kind.clone()),
                };
                match found {
                    Some(kind @ (Type::Class(_) | Type::Interface(_))) => kind,
                    _ => {
                        return Err(TypeCheckError::UnknownVariable {
                            name: name.clone(),
                            line,
                        })
                    }
                }
            }
            Type::List(inner) => Type::List(Box::new(self.resolve_type(inner, line)?)),
            Type::Map(k, v) => Type::Map(
                Box::new(self.resolve_type(k, line)?),
                Box::new(self.resolve_type(v, line)?),
            ),
            Type::Tuple(items) => Type::Tuple(
                items
                    .iter()
                    .map(|t| self.resolve_type(t, line))
                    .collect::<CheckResult<_>>()?,
            ),
            Type::AnonymousFunction(sig) => {
                let mut sig = sig.clone();
                for param in &mut sig.params {
                    param.ty = self.resolve_type(&param.ty, line)?;
                }
                sig.ret = Box::new(self.resolve_type(&sig.ret, line)?);
                Type::AnonymousFunction(sig)
            }
            other => other.clone(),
        })
    }

    /// The current declaration of a class or interface of this module.
    /// Types captured while the pre-pass held only a shell are completed here.
    pub(crate) fn refresh(&self, ty: &Type) -> Type {
        let name = match ty {
            Type::Class(class) => &class.name,
            Type::Interface(interface) => &interface.name,
            _ => return ty.clone(),
        };
        match self.ctx.symbols.get_symbol(name, &self.namespace).map(|s| &s.kind) {
            Some(current @ (Type::Class(_) | Type::Interface(_))) if current.is_same_type(ty) => {
                current.clone()
            }
            _ => ty.clone(),
        }
    }

    /// Check `expr` and require `expected.is_same_or_inheriting_type(actual)`.
    /// Empty `[]` and `{}` adopt the expected container type.
    pub(crate) fn expr_and_confirm(&mut self, expr: &Expr, expected: &Type) -> CheckResult<TypedExpr> {
        let typed = match (&expr.kind, expected) {
            (ExprKind::List(items), Type::List(_)) if items.is_empty() => {
                TypedExpr::new(TypedExprKind::List(Vec::new()), expected.clone(), expr.span)
            }
            (ExprKind::Map(entries), Type::Map(_, _)) if entries.is_empty() => {
                TypedExpr::new(TypedExprKind::Map(Vec::new()), expected.clone(), expr.span)
            }
            _ => self.check_expr(expr)?,
        };
        let satisfied = match (expected, &typed.ty) {
            (Type::Interface(_), Type::Class(_)) => self
                .refresh(expected)
                .is_same_or_inheriting_type(&self.refresh(&typed.ty)),
            _ => expected.is_same_or_inheriting_type(&typed.ty),
        };
        if satisfied {
            Ok(typed)
        } else {
            Err(TypeCheckError::UnexpectedType {
                expected: expected.clone(),
                found: typed.ty,
                line: expr.span.start(),
            })
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Imports
    // ══════════════════════════════════════════════════════════════════════

    /// A namespace this file imported, by alias.
    pub(crate) fn imported(&self, alias: &str) -> Option<NamespaceHandle<'_>> {
        self.ctx.symbols.get_namespace(&self.file, alias)
    }

    /// Resolve a package and register its exports under the import's
    /// namespace, visible to this file only. Re-importing replaces the
    /// earlier registration.
    pub(crate) fn import(&mut self, import: &ImportStmt) -> CheckResult<TypedImport> {
        let package = import.package.name.as_str();
        let line = import.span.start();
        let module = match self.ctx.import_package(package) {
            Ok(module) => module,
            Err(ImportFailure::Cycle) => {
                return Err(TypeCheckError::CyclicImport {
                    package: package.to_string(),
                    line,
                })
            }
            Err(ImportFailure::Unresolved(reason)) => {
                return Err(TypeCheckError::UnknownModule {
                    package: package.to_string(),
                    reason: reason.to_string(),
                    line,
                })
            }
            Err(ImportFailure::Failed(nested)) => {
                self.diagnostics.extend(nested);
                return Err(TypeCheckError::ImportedModuleFailed {
                    package: package.to_string(),
                    line,
                });
            }
        };
        let namespace = import.namespace().to_string();
        self.ctx.symbols.add_module(&self.file, &namespace, &module);
        Ok(TypedImport {
            package: package.to_string(),
            namespace,
        })
    }

    /// Make a builtin type's method package visible under its alias.
    pub(crate) fn auto_import(&mut self, package: &str, alias: &str) {
        if self.imported(alias).is_some() {
            return;
        }
        if let Some(module) = self.ctx.stdlib.try_get_module(package) {
            let module = module.clone();
            self.ctx.symbols.add_module(&self.file, alias, &module);
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Enclosing context
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn enter_scope(&mut self) -> Guard<'_, 'c> {
        self.ctx.symbols.add_scope(&self.namespace);
        Guard {
            checker: self,
            release: Release::Scope,
        }
    }

    pub(crate) fn enter_stmt(&mut self, stmt: EnclosingStmt) -> Guard<'_, 'c> {
        self.stmts.push(stmt);
        Guard {
            checker: self,
            release: Release::Stmt,
        }
    }

    pub(crate) fn enter_expr(&mut self, expr: EnclosingExpr) -> Guard<'_, 'c> {
        self.exprs.push(expr);
        Guard {
            checker: self,
            release: Release::Expr,
        }
    }

    pub(crate) fn enter_class(&mut self, class: PartiallyTypedClass) -> Guard<'_, 'c> {
        self.classes.push(class);
        Guard {
            checker: self,
            release: Release::Class,
        }
    }

    pub(crate) fn enclosing_stmt(&self) -> Option<EnclosingStmt> {
        self.stmts.peek().copied()
    }

    pub(crate) fn enclosing_expr(&self) -> Option<EnclosingExpr> {
        self.exprs.peek().copied()
    }

    pub(crate) fn enclosing_class(&self) -> Option<&PartiallyTypedClass> {
        self.classes.peek()
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Guard
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy)]
enum Release {
    Scope,
    Stmt,
    Expr,
    Class,
}

/// Undoes one `enter_*` call when dropped, on success and error paths alike.
/// Derefs to the checker so checking continues through the guard.
pub(crate) struct Guard<'g, 'c> {
    checker: &'g mut TypeChecker<'c>,
    release: Release,
}

impl<'c> Deref for Guard<'_, 'c> {
    type Target = TypeChecker<'c>;

    fn deref(&self) -> &Self::Target {
        self.checker
    }
}

impl DerefMut for Guard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.checker
    }
}

impl Drop for Guard<'_, '_> {
    fn drop(&mut self) {
        let checker = &mut *self.checker;
        match self.release {
            Release::Scope => checker.ctx.symbols.exit_scope(&checker.namespace),
            Release::Stmt => {
                checker.stmts.pop();
            }
            Release::Expr => {
                checker.exprs.pop();
            }
            Release::Class => {
                checker.classes.pop();
            }
        }
    }
}
