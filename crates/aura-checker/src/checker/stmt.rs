//! Statement checking.

use aura_types::ast::{Block, ClassDecl, FunctionDecl, LetStmt, Stmt};
use aura_types::typed_ast::{
    TypedBlock, TypedClass, TypedFor, TypedForEach, TypedFunction, TypedLet, TypedStmt,
    TypedStmtKind, TypedWhile,
};
use aura_types::{ClassType, FunctionSig, NamedFunction, Type};

use super::TypeChecker;
use crate::enclosing::{EnclosingStmt, PartiallyTypedClass};
use crate::error::{CheckResult, TypeCheckError};

impl TypeChecker<'_> {
    pub(crate) fn check_stmt(&mut self, stmt: &Stmt) -> CheckResult<TypedStmt> {
        let span = stmt.span();
        let line = span.start();
        let kind = match stmt {
            Stmt::Defer(defer) => {
                let mut this = self.enter_stmt(EnclosingStmt::Defer);
                let (call, _) = this.check_call(&defer.call)?;
                TypedStmtKind::Defer(call)
            }
            Stmt::Expression(s) => TypedStmtKind::Expression(self.check_expr(&s.expr)?),
            Stmt::For(s) => {
                let mut this = self.enter_stmt(EnclosingStmt::For);
                let mut this = this.enter_scope();
                let init = s.init.as_deref().map(|init| this.check_stmt(init)).transpose()?;
                let condition = s
                    .condition
                    .as_ref()
                    .map(|c| this.expr_and_confirm(c, &Type::Bool))
                    .transpose()?;
                let increment = s.increment.as_ref().map(|i| this.check_expr(i)).transpose()?;
                let body = this.check_body(&s.body)?;
                TypedStmtKind::For(Box::new(TypedFor {
                    init,
                    condition,
                    increment,
                    body,
                }))
            }
            Stmt::ForEach(s) => {
                let mut this = self.enter_stmt(EnclosingStmt::ForEach);
                let mut this = this.enter_scope();
                let iterable = this.check_expr(&s.iterable)?;
                let Some(element) = iterable.ty.iterated_type() else {
                    return Err(TypeCheckError::ExpectIterable {
                        found: iterable.ty,
                        line,
                    });
                };
                this.register(&s.each_name.name, element);
                let body = this.check_body(&s.body)?;
                TypedStmtKind::ForEach(Box::new(TypedForEach {
                    each_name: s.each_name.clone(),
                    iterable,
                    body,
                }))
            }
            Stmt::While(s) => {
                let mut this = self.enter_stmt(EnclosingStmt::While);
                let mut this = this.enter_scope();
                let condition = this.expr_and_confirm(&s.condition, &Type::Bool)?;
                let body = this.check_body(&s.body)?;
                TypedStmtKind::While(Box::new(TypedWhile { condition, body }))
            }
            Stmt::NamedFunction(decl) => return self.check_named_function(decl, None),
            Stmt::Let(decl) => return self.check_let(decl),
            Stmt::Mod(m) => TypedStmtKind::Mod(m.name.clone()),
            Stmt::Return(r) => {
                let mut this = self.enter_stmt(EnclosingStmt::Return);
                TypedStmtKind::Return(r.value.as_ref().map(|v| this.check_expr(v)).transpose()?)
            }
            Stmt::Class(decl) => return self.check_class(decl, None),
            Stmt::Import(import) => TypedStmtKind::Import(self.import(import)?),
            Stmt::MultipleImport(multiple) => TypedStmtKind::MultipleImport(
                multiple
                    .imports
                    .iter()
                    .map(|import| self.import(import))
                    .collect::<CheckResult<_>>()?,
            ),
            Stmt::Comment(c) => TypedStmtKind::Comment(c.text.clone()),
            Stmt::Continue(_) => match self.enclosing_stmt() {
                Some(enclosing) if enclosing.is_loop() => TypedStmtKind::Continue,
                _ => return Err(TypeCheckError::InvalidUseOfContinueKeyword { line }),
            },
            Stmt::Break(_) => match self.enclosing_stmt() {
                Some(enclosing) if enclosing.is_loop() => TypedStmtKind::Break,
                _ => return Err(TypeCheckError::InvalidUseOfBreakKeyword { line }),
            },
            Stmt::Yield(y) => match self.enclosing_expr() {
                Some(enclosing) if enclosing.accepts_yield() => {
                    TypedStmtKind::Yield(self.check_expr(&y.value)?)
                }
                _ => return Err(TypeCheckError::InvalidUseOfYieldKeyword { line }),
            },
            Stmt::Interface(decl) => {
                let interface = self.declare_interface(decl)?;
                self.register(&interface.name, Type::Interface(interface.clone()));
                for method in &interface.methods {
                    self.register(&method.name, Type::NamedFunction(method.clone()));
                }
                TypedStmtKind::Interface(interface)
            }
        };
        Ok(TypedStmt::new(kind, span))
    }

    /// Statements of a loop body or block, in order.
    pub(crate) fn check_body(&mut self, stmts: &[Stmt]) -> CheckResult<Vec<TypedStmt>> {
        stmts.iter().map(|s| self.check_stmt(s)).collect()
    }

    pub(crate) fn check_let(&mut self, decl: &LetStmt) -> CheckResult<TypedStmt> {
        let line = decl.span.start();
        let mut this = self.enter_stmt(EnclosingStmt::Let);
        let (var_ty, initializer) = match (&decl.annotation, &decl.initializer) {
            (Some(annotation), initializer) => {
                let ty = this.resolve_type(annotation, line)?;
                let value = match initializer {
                    Some(expr) => this.expr_and_confirm(expr, &ty)?,
                    None => match ty.default_value(decl.span) {
                        Some(value) => value,
                        None => {
                            return Err(TypeCheckError::MustSpecifyInitialValueForNonDefaultableType {
                                name: decl.name.name.clone(),
                                ty,
                                line,
                            })
                        }
                    },
                };
                (ty, value)
            }
            (None, Some(expr)) => {
                let value = this.check_expr(expr)?;
                (value.ty.clone(), value)
            }
            (None, None) => {
                return Err(TypeCheckError::MustSpecifyInitialValueForNonDefaultableType {
                    name: decl.name.name.clone(),
                    ty: Type::None,
                    line,
                })
            }
        };
        debug_assert!(!var_ty.contains_unknown(), "unresolved type for '{}'", decl.name.name);
        this.register(&decl.name.name, var_ty.clone());
        Ok(TypedStmt::new(
            TypedStmtKind::Let(Box::new(TypedLet {
                name: decl.name.clone(),
                mutable: decl.mutable,
                annotated: decl.annotation.is_some(),
                var_ty,
                initializer,
            })),
            decl.span,
        ))
    }

    /// Check a named function. Top-level functions arrive with the signature
    /// the pre-pass built; nested ones are declared here.
    pub(crate) fn check_named_function(
        &mut self,
        decl: &FunctionDecl,
        signature: Option<NamedFunction>,
    ) -> CheckResult<TypedStmt> {
        let signature = match signature {
            Some(signature) => signature,
            None => self.function_signature(decl)?,
        };
        self.register(&decl.name.name, Type::NamedFunction(signature.clone()));
        let function = self.check_function(decl, signature)?;
        Ok(TypedStmt::new(
            TypedStmtKind::NamedFunction(Box::new(function)),
            decl.span,
        ))
    }

    fn check_function(&mut self, decl: &FunctionDecl, signature: NamedFunction) -> CheckResult<TypedFunction> {
        let body = self.check_function_body(&signature.sig, &decl.body, decl.span.start())?;
        Ok(TypedFunction {
            name: decl.name.clone(),
            signature,
            body,
        })
    }

    /// Parameters become locals of a fresh scope; the body's type must
    /// satisfy the declared return type.
    pub(crate) fn check_function_body(
        &mut self,
        sig: &FunctionSig,
        block: &Block,
        line: u32,
    ) -> CheckResult<TypedBlock> {
        let mut this = self.enter_stmt(EnclosingStmt::Function);
        let mut this = this.enter_scope();
        for param in &sig.params {
            this.register(&param.name, param.local_type());
        }
        let body = this.check_block(block)?;
        if !sig.ret.is_same_or_inheriting_type(&body.ty) {
            return Err(TypeCheckError::TypeMismatch {
                expected: (*sig.ret).clone(),
                found: body.ty,
                line,
            });
        }
        Ok(body)
    }

    pub(crate) fn check_class(&mut self, decl: &ClassDecl, signature: Option<ClassType>) -> CheckResult<TypedStmt> {
        let signature = match signature {
            Some(signature) => signature,
            None => self.class_signature(decl)?,
        };
        self.register(&decl.name.name, Type::Class(signature.clone()));

        let methods = {
            let mut this = self.enter_stmt(EnclosingStmt::Class);
            let mut this = this.enter_scope();
            let mut this = this.enter_class(PartiallyTypedClass {
                signature: signature.clone(),
            });
            decl.methods
                .iter()
                .zip(&signature.methods)
                .map(|(method, method_sig)| this.check_function(method, method_sig.clone()))
                .collect::<CheckResult<Vec<_>>>()?
        };

        for interface in &signature.implements {
            if let Some(method) = signature.missing_method(interface) {
                return Err(TypeCheckError::MissingInterfaceMethod {
                    class: signature.name.clone(),
                    interface: interface.name.clone(),
                    method: method.name.clone(),
                    line: decl.span.start(),
                });
            }
        }

        Ok(TypedStmt::new(
            TypedStmtKind::Class(Box::new(TypedClass {
                name: decl.name.clone(),
                signature,
                methods,
            })),
            decl.span,
        ))
    }
}
