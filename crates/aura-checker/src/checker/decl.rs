//! Signature construction for functions, classes and interfaces.

use aura_types::ast::{self, ClassDecl, FunctionDecl, FunctionSignature, InterfaceDecl};
use aura_types::{ClassType, FunctionSig, InterfaceType, NamedFunction, Param, Type};

use super::TypeChecker;
use crate::error::{CheckResult, TypeCheckError};

impl TypeChecker<'_> {
    /// Resolve parameter types and check literal defaults against them.
    pub(crate) fn type_params(&mut self, params: &[ast::Param]) -> CheckResult<Vec<Param>> {
        let mut typed = Vec::with_capacity(params.len());
        for param in params {
            let line = param.name.span.start();
            let ty = self.resolve_type(&param.ty, line)?;
            let mut resolved = Param {
                name: param.name.name.clone(),
                ty,
                variadic: param.variadic,
                default: None,
            };
            if let Some(default) = &param.default {
                if !default.is_literal() {
                    return Err(TypeCheckError::DefaultValueMustBeLiteral {
                        param: param.name.name.clone(),
                        line,
                    });
                }
                let value = self.expr_and_confirm(default, &resolved.local_type())?;
                resolved = resolved.with_default(value);
            }
            typed.push(resolved);
        }
        Ok(typed)
    }

    pub(crate) fn signature_of(
        &mut self,
        params: &[ast::Param],
        return_type: Option<&Type>,
        line: u32,
    ) -> CheckResult<FunctionSig> {
        let params = self.type_params(params)?;
        let ret = match return_type {
            Some(ty) => self.resolve_type(ty, line)?,
            None => Type::Nil,
        };
        Ok(FunctionSig::new(params, ret))
    }

    pub(crate) fn function_signature(&mut self, decl: &FunctionDecl) -> CheckResult<NamedFunction> {
        let sig = self.signature_of(&decl.params, decl.return_type.as_ref(), decl.span.start())?;
        Ok(NamedFunction::new(&decl.name.name, decl.visibility, sig))
    }

    fn method_signature(&mut self, decl: &FunctionSignature) -> CheckResult<NamedFunction> {
        let sig = self.signature_of(&decl.params, decl.return_type.as_ref(), decl.span.start())?;
        Ok(NamedFunction::new(&decl.name.name, decl.visibility, sig))
    }

    /// Fields, method signatures and implemented interfaces. Method bodies
    /// are not looked at.
    pub(crate) fn class_signature(&mut self, decl: &ClassDecl) -> CheckResult<ClassType> {
        let params = self.type_params(&decl.params)?;
        let methods = decl
            .methods
            .iter()
            .map(|m| self.function_signature(m))
            .collect::<CheckResult<Vec<_>>>()?;

        let mut implements = Vec::with_capacity(decl.implements.len());
        for name in &decl.implements {
            let line = name.span.start();
            match self.find_or_throw(&name.name, line)? {
                Type::Interface(interface) => implements.push(interface),
                _ => {
                    return Err(TypeCheckError::CannotImplementNonInterface {
                        name: name.name.clone(),
                        line,
                    })
                }
            }
        }

        Ok(ClassType {
            name: decl.name.name.clone(),
            params,
            methods,
            implements,
            visibility: decl.visibility,
        })
    }

    pub(crate) fn declare_interface(&mut self, decl: &InterfaceDecl) -> CheckResult<InterfaceType> {
        let methods = decl
            .methods
            .iter()
            .map(|m| self.method_signature(m))
            .collect::<CheckResult<Vec<_>>>()?;
        Ok(InterfaceType {
            name: decl.name.name.clone(),
            methods,
            visibility: decl.visibility,
        })
    }
}
