//! Signature pre-pass.
//!
//! Registers every top-level declaration before any body is checked, so a
//! function may call one declared further down and a class may implement an
//! interface declared after it. The statement list is walked once per
//! declaration kind, top to bottom each time:
//!
//! 1. imports
//! 2. nominal shells for classes and interfaces
//! 3. interfaces, plus each interface method as a standalone symbol
//! 4. class signatures
//! 5. function signatures
//! 6. top-level lets
//!
//! The result keeps the source order. Functions and classes come back as
//! [`Declared`] items for the check pass to finish. Imports, interfaces and
//! lets are already complete and come back as [`ModuleItem::Checked`].

use aura_types::ast::{ClassDecl, FunctionDecl, Stmt};
use aura_types::typed_ast::{TypedStmt, TypedStmtKind};
use aura_types::{ClassType, Diagnostics, InterfaceType, NamedFunction, Type};

use crate::checker::TypeChecker;
use crate::error::{CheckResult, TypeCheckError};

/// A top-level function or class whose signature is known and whose body
/// has not been checked yet.
#[derive(Debug)]
pub enum Declared<'s> {
    Function {
        decl: &'s FunctionDecl,
        signature: NamedFunction,
    },
    Class {
        decl: &'s ClassDecl,
        signature: ClassType,
    },
}

/// One top-level statement after the pre-pass.
#[derive(Debug)]
pub enum ModuleItem<'s> {
    Declared(Declared<'s>),
    Checked(TypedStmt),
    Unchecked(&'s Stmt),
}

impl TypeChecker<'_> {
    /// Run every pre-pass phase over a module's top-level statements.
    ///
    /// Errors are collected per declaration. If any were collected the batch
    /// is returned and the module's bodies must not be checked.
    pub fn build_symbols_table<'s>(&mut self, stmts: &'s [Stmt]) -> Result<Vec<ModuleItem<'s>>, Diagnostics> {
        self.declare_module(stmts)?;

        let mut items: Vec<Option<ModuleItem<'s>>> = stmts.iter().map(|_| None).collect();

        for (slot, stmt) in items.iter_mut().zip(stmts) {
            let imported = match stmt {
                Stmt::Import(import) => self
                    .import(import)
                    .map(|typed| TypedStmt::new(TypedStmtKind::Import(typed), import.span)),
                Stmt::MultipleImport(multiple) => multiple
                    .imports
                    .iter()
                    .map(|import| self.import(import))
                    .collect::<CheckResult<Vec<_>>>()
                    .map(|typed| TypedStmt::new(TypedStmtKind::MultipleImport(typed), multiple.span)),
                _ => continue,
            };
            self.settle(slot, imported.map(ModuleItem::Checked));
        }

        for stmt in stmts {
            match stmt {
                Stmt::Class(class) => {
                    let shell = ClassType::shell(&class.name.name, class.visibility);
                    self.register(&class.name.name, Type::Class(shell));
                }
                Stmt::Interface(interface) => {
                    let shell = InterfaceType {
                        name: interface.name.name.clone(),
                        methods: Vec::new(),
                        visibility: interface.visibility,
                    };
                    self.register(&interface.name.name, Type::Interface(shell));
                }
                _ => {}
            }
        }

        for (slot, stmt) in items.iter_mut().zip(stmts) {
            if let Stmt::Interface(decl) = stmt {
                let declared = self.declare_interface(decl).map(|interface| {
                    self.register(&interface.name, Type::Interface(interface.clone()));
                    for method in &interface.methods {
                        self.register(&method.name, Type::NamedFunction(method.clone()));
                    }
                    ModuleItem::Checked(TypedStmt::new(TypedStmtKind::Interface(interface), decl.span))
                });
                self.settle(slot, declared);
            }
        }

        for (slot, stmt) in items.iter_mut().zip(stmts) {
            if let Stmt::Class(decl) = stmt {
                let declared = self.class_signature(decl).map(|signature| {
                    self.register(&decl.name.name, Type::Class(signature.clone()));
                    ModuleItem::Declared(Declared::Class { decl, signature })
                });
                self.settle(slot, declared);
            }
        }

        for (slot, stmt) in items.iter_mut().zip(stmts) {
            if let Stmt::NamedFunction(decl) = stmt {
                let declared = self.function_signature(decl).map(|signature| {
                    self.register(&decl.name.name, Type::NamedFunction(signature.clone()));
                    ModuleItem::Declared(Declared::Function { decl, signature })
                });
                self.settle(slot, declared);
            }
        }

        for (slot, stmt) in items.iter_mut().zip(stmts) {
            if let Stmt::Let(decl) = stmt {
                let checked = self.check_let(decl).map(ModuleItem::Checked);
                self.settle(slot, checked);
            }
        }

        tracing::debug!(
            module = %self.module,
            namespace = %self.namespace,
            file = %self.file(),
            declarations = items.iter().filter(|i| matches!(i, Some(ModuleItem::Declared(_)))).count(),
            "symbols table built"
        );
        self.finish_pass()?;

        Ok(items
            .into_iter()
            .zip(stmts)
            .map(|(item, stmt)| item.unwrap_or(ModuleItem::Unchecked(stmt)))
            .collect())
    }

    /// Find the `mod` statement and make its name the current namespace.
    fn declare_module(&mut self, stmts: &[Stmt]) -> Result<(), Diagnostics> {
        let name = stmts.iter().find_map(|stmt| match stmt {
            Stmt::Mod(m) => Some(m.name.name.clone()),
            _ => None,
        });
        match name {
            Some(name) => {
                self.namespace = self.ctx.local_namespace(&name);
                self.module = name;
                Ok(())
            }
            None => {
                let line = stmts.first().map_or(1, |s| s.span().start());
                self.report(TypeCheckError::MissingModuleDeclaration { line });
                self.finish_pass()
            }
        }
    }

    fn settle<'s>(&mut self, slot: &mut Option<ModuleItem<'s>>, result: CheckResult<ModuleItem<'s>>) {
        match result {
            Ok(item) => *slot = Some(item),
            Err(err) => self.report(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::CheckContext;
    use aura_types::ast::{Block, Ident, ModStmt};
    use aura_types::{Span, Visibility};

    fn mod_stmt(name: &str) -> Stmt {
        Stmt::Mod(ModStmt {
            name: Ident::new(name, Span::line(1)),
            span: Span::line(1),
        })
    }

    fn function(name: &str, line: u32) -> Stmt {
        Stmt::NamedFunction(FunctionDecl {
            name: Ident::new(name, Span::line(line)),
            visibility: Visibility::Public,
            params: vec![],
            return_type: Some(Type::Int),
            body: Block {
                stmts: vec![],
                span: Span::line(line),
            },
            span: Span::line(line),
        })
    }

    #[test]
    fn test_missing_mod_statement_stops_the_pass() {
        let mut ctx = CheckContext::default();
        let mut checker = TypeChecker::new(&mut ctx, "main.aura");
        let stmts = vec![function("f", 2)];
        let errors = checker.build_symbols_table(&stmts).unwrap_err();
        assert_eq!(errors.total_errors, 1);
        assert_eq!(errors.errors[0].line, 2);
    }

    #[test]
    fn test_functions_are_declared_in_source_positions() {
        let mut ctx = CheckContext::default();
        let mut checker = TypeChecker::new(&mut ctx, "main.aura");
        let stmts = vec![mod_stmt("main"), function("a", 2), function("b", 3)];
        let items = checker.build_symbols_table(&stmts).unwrap();
        assert!(matches!(items[0], ModuleItem::Unchecked(Stmt::Mod(_))));
        match &items[2] {
            ModuleItem::Declared(Declared::Function { signature, .. }) => {
                assert_eq!(signature.name, "b")
            }
            other => panic!("expected a declared function, got {other:?}"),
        }
        assert!(checker.find_symbol("a").is_some());
    }
}
