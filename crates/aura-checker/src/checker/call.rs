//! Call checking: callee resolution and argument matching.
//!
//! Arguments are either all positional or all named. The typed call always
//! carries one argument per parameter, in declaration order:
//!
//! - omitted parameters are filled with their default value
//! - a variadic parameter receives a single list of every argument it absorbed

use aura_types::ast::{Argument, CallExpr, Expr, ExprKind};
use aura_types::typed_ast::{GetAccess, TypedCall, TypedExpr, TypedExprKind};
use aura_types::{FunctionSig, Span, Type};

use super::TypeChecker;
use crate::error::{CheckResult, TypeCheckError};

impl TypeChecker<'_> {
    /// Returns the typed call and the type it evaluates to.
    pub(crate) fn check_call(&mut self, call: &CallExpr) -> CheckResult<(TypedCall, Type)> {
        let line = call.span.start();
        let name = callee_name(&call.callee);
        let callee = self.check_expr(&call.callee)?;
        let Some(mut sig) = callee.ty.callable_signature() else {
            return Err(TypeCheckError::ExpectCallable {
                found: callee.ty,
                line,
            });
        };

        // `s.f(a)` on a builtin value calls `f(s, a)`
        if let TypedExprKind::Get {
            object,
            access: GetAccess::BuiltinMethod { .. },
            ..
        } = &callee.kind
        {
            if sig.params.is_empty() {
                return Err(TypeCheckError::IncorrectNumberOfArguments {
                    callee: name,
                    expected: 0,
                    found: call.arguments.len() + 1,
                    line,
                });
            }
            let receiver = sig.params.remove(0);
            if !receiver.local_type().is_same_or_inheriting_type(&object.ty) {
                return Err(TypeCheckError::UnexpectedType {
                    expected: receiver.local_type(),
                    found: object.ty.clone(),
                    line,
                });
            }
        }

        let arguments = self.match_arguments(&name, &sig, &call.arguments, call.span)?;
        tracing::trace!(callee = %name, arguments = arguments.len(), "call");
        Ok((
            TypedCall {
                callee: Box::new(callee),
                arguments,
            },
            *sig.ret,
        ))
    }

    fn match_arguments(
        &mut self,
        callee: &str,
        sig: &FunctionSig,
        arguments: &[Argument],
        span: Span,
    ) -> CheckResult<Vec<TypedExpr>> {
        let named = arguments.iter().filter(|a| a.name.is_some()).count();
        if arguments.is_empty() {
            self.fill_omitted(callee, sig, vec![None; sig.params.len()], span)
        } else if named == 0 {
            self.positional_arguments(callee, sig, arguments, span)
        } else if named == arguments.len() {
            self.named_arguments(callee, sig, arguments, span)
        } else {
            Err(TypeCheckError::CannotMixNamedAndUnnamedArguments {
                callee: callee.to_string(),
                line: span.start(),
            })
        }
    }

    /// Exact arity, except that a trailing variadic parameter absorbs any
    /// number of extra arguments, including none.
    fn positional_arguments(
        &mut self,
        callee: &str,
        sig: &FunctionSig,
        arguments: &[Argument],
        span: Span,
    ) -> CheckResult<Vec<TypedExpr>> {
        let variadic = sig.variadic_param();
        let fixed = sig.params.len() - usize::from(variadic.is_some());
        let arity_matches = match variadic {
            Some(_) => arguments.len() >= fixed,
            None => arguments.len() == fixed,
        };
        if !arity_matches {
            return Err(TypeCheckError::IncorrectNumberOfArguments {
                callee: callee.to_string(),
                expected: fixed,
                found: arguments.len(),
                line: span.start(),
            });
        }

        let mut typed = Vec::with_capacity(sig.params.len());
        for (param, argument) in sig.params.iter().zip(&arguments[..fixed]) {
            typed.push(self.expr_and_confirm(&argument.value, &param.ty)?);
        }
        if let Some(param) = variadic {
            let absorbed = arguments[fixed..]
                .iter()
                .map(|argument| self.expr_and_confirm(&argument.value, &param.ty))
                .collect::<CheckResult<Vec<_>>>()?;
            typed.push(TypedExpr::new(
                TypedExprKind::List(absorbed),
                param.local_type(),
                span,
            ));
        }
        Ok(typed)
    }

    fn named_arguments(
        &mut self,
        callee: &str,
        sig: &FunctionSig,
        arguments: &[Argument],
        span: Span,
    ) -> CheckResult<Vec<TypedExpr>> {
        let mut slots: Vec<Option<TypedExpr>> = vec![None; sig.params.len()];
        for argument in arguments {
            let Some(name) = &argument.name else {
                continue;
            };
            let Some(index) = sig.params.iter().position(|p| p.name == name.name) else {
                return Err(TypeCheckError::UnknownNamedArgument {
                    callee: callee.to_string(),
                    name: name.name.clone(),
                    line: name.span.start(),
                });
            };
            if slots[index].is_some() {
                return Err(TypeCheckError::DuplicateNamedArgument {
                    callee: callee.to_string(),
                    name: name.name.clone(),
                    line: name.span.start(),
                });
            }
            let expected = sig.params[index].local_type();
            slots[index] = Some(self.expr_and_confirm(&argument.value, &expected)?);
        }
        self.fill_omitted(callee, sig, slots, span)
    }

    /// Defaults were checked when the callee was declared and are reused
    /// as they are.
    fn fill_omitted(
        &self,
        callee: &str,
        sig: &FunctionSig,
        slots: Vec<Option<TypedExpr>>,
        span: Span,
    ) -> CheckResult<Vec<TypedExpr>> {
        sig.params
            .iter()
            .zip(slots)
            .map(|(param, slot)| match (slot, &param.default) {
                (Some(argument), _) => Ok(argument),
                (None, Some(default)) => Ok((**default).clone()),
                (None, None) if param.variadic => Ok(TypedExpr::new(
                    TypedExprKind::List(Vec::new()),
                    param.local_type(),
                    span,
                )),
                (None, None) => Err(TypeCheckError::MustSpecifyValueForArgumentWithoutDefaultValue {
                    callee: callee.to_string(),
                    param: param.name.clone(),
                    line: span.start(),
                }),
            })
            .collect()
    }
}

fn callee_name(callee: &Expr) -> String {
    match &callee.kind {
        ExprKind::Variable(name) => name.name.clone(),
        ExprKind::Get { name, .. } => name.name.clone(),
        _ => "fn".to_string(),
    }
}
