//! Expression checking.

use aura_types::ast::{Block, Expr, ExprKind, Ident, UnaryOp};
use aura_types::typed_ast::{
    GetAccess, TypedAnonymousFunction, TypedBlock, TypedExpr, TypedExprKind, TypedIf, TypedStmt,
    TypedStmtKind,
};
use aura_types::Type;

use super::TypeChecker;
use crate::enclosing::EnclosingExpr;
use crate::error::{CheckResult, TypeCheckError};

impl TypeChecker<'_> {
    pub(crate) fn check_expr(&mut self, expr: &Expr) -> CheckResult<TypedExpr> {
        match EnclosingExpr::of(&expr.kind) {
            // blocks push their own context along with their scope
            EnclosingExpr::Block => self.check_expr_kind(expr),
            enclosing => self.enter_expr(enclosing).check_expr_kind(expr),
        }
    }

    fn check_expr_kind(&mut self, expr: &Expr) -> CheckResult<TypedExpr> {
        let span = expr.span;
        let line = span.start();
        let (kind, ty) = match &expr.kind {
            // ── Literals ──
            ExprKind::Int(v) => (TypedExprKind::Int(*v), Type::Int),
            ExprKind::Float(v) => (TypedExprKind::Float(*v), Type::Float),
            ExprKind::String(s) => (TypedExprKind::String(s.clone()), Type::String),
            ExprKind::Char(c) => (TypedExprKind::Char(*c), Type::Char),
            ExprKind::Bool(b) => (TypedExprKind::Bool(*b), Type::Bool),
            ExprKind::Nil => (TypedExprKind::Nil, Type::Nil),
            ExprKind::List(items) => {
                let mut typed = Vec::with_capacity(items.len());
                let element = match items.split_first() {
                    Some((first, rest)) => {
                        let first = self.check_expr(first)?;
                        let element = first.ty.clone();
                        typed.push(first);
                        for item in rest {
                            typed.push(self.expr_and_confirm(item, &element)?);
                        }
                        element
                    }
                    None => Type::Any,
                };
                (TypedExprKind::List(typed), Type::List(Box::new(element)))
            }
            ExprKind::Map(entries) => {
                let mut typed = Vec::with_capacity(entries.len());
                let (key_ty, value_ty) = match entries.split_first() {
                    Some(((key, value), rest)) => {
                        let key = self.check_expr(key)?;
                        let value = self.check_expr(value)?;
                        let types = (key.ty.clone(), value.ty.clone());
                        typed.push((key, value));
                        for (key, value) in rest {
                            let key = self.expr_and_confirm(key, &types.0)?;
                            let value = self.expr_and_confirm(value, &types.1)?;
                            typed.push((key, value));
                        }
                        types
                    }
                    None => (Type::Any, Type::Any),
                };
                (
                    TypedExprKind::Map(typed),
                    Type::Map(Box::new(key_ty), Box::new(value_ty)),
                )
            }

            // ── Names ──
            ExprKind::Variable(name) => {
                let ty = self.variable_type(name)?;
                (TypedExprKind::Variable(name.clone()), ty)
            }
            ExprKind::This => match self.enclosing_class() {
                Some(class) => (TypedExprKind::This, Type::Class(class.signature.clone())),
                None => return Err(TypeCheckError::InvalidUseOfThisKeyword { line }),
            },
            ExprKind::Assignment { name, value } => {
                let target = self.find_or_throw(&name.name, name.span.start())?;
                let value = self.expr_and_confirm(value, &target)?;
                let ty = value.ty.clone();
                (
                    TypedExprKind::Assignment {
                        name: name.clone(),
                        value: Box::new(value),
                    },
                    ty,
                )
            }
            ExprKind::Increment(operand) => {
                let operand = self.check_expr(operand)?;
                if !operand.ty.is_numeric() {
                    return Err(TypeCheckError::CannotIncrementNonNumber {
                        found: operand.ty,
                        line,
                    });
                }
                let ty = operand.ty.clone();
                (TypedExprKind::Increment(Box::new(operand)), ty)
            }
            ExprKind::Decrement(operand) => {
                let operand = self.check_expr(operand)?;
                if !operand.ty.is_numeric() {
                    return Err(TypeCheckError::CannotDecrementNonNumber {
                        found: operand.ty,
                        line,
                    });
                }
                let ty = operand.ty.clone();
                (TypedExprKind::Decrement(Box::new(operand)), ty)
            }

            // ── Operators ──
            ExprKind::Binary { left, op, right } => {
                let left = self.check_expr(left)?;
                let right = self.expr_and_confirm(right, &left.ty)?;
                let ty = left.ty.clone();
                (
                    TypedExprKind::Binary {
                        left: Box::new(left),
                        op: *op,
                        right: Box::new(right),
                    },
                    ty,
                )
            }
            ExprKind::Logical { left, op, right } => {
                let left = self.check_expr(left)?;
                let right = self.expr_and_confirm(right, &left.ty)?;
                (
                    TypedExprKind::Logical {
                        left: Box::new(left),
                        op: *op,
                        right: Box::new(right),
                    },
                    Type::Bool,
                )
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.check_expr(operand)?;
                let accepted = match op {
                    UnaryOp::Neg => operand.ty.is_numeric(),
                    UnaryOp::Not => operand.ty.is_bool(),
                };
                if !accepted {
                    return Err(TypeCheckError::MismatchedUnaryOperatorAndOperand {
                        op: op.symbol(),
                        operand: operand.ty,
                        line,
                    });
                }
                let ty = operand.ty.clone();
                (
                    TypedExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                )
            }
            ExprKind::Grouping(inner) => {
                let inner = self.check_expr(inner)?;
                let ty = inner.ty.clone();
                (TypedExprKind::Grouping(Box::new(inner)), ty)
            }
            ExprKind::Is { expr: inner, interface } => {
                let inner = self.check_expr(inner)?;
                let interface = match self.find_or_throw(&interface.name, interface.span.start())? {
                    Type::Interface(found) => found,
                    _ => {
                        return Err(TypeCheckError::ExpectInterface {
                            name: interface.name.clone(),
                            line,
                        })
                    }
                };
                (
                    TypedExprKind::Is {
                        expr: Box::new(inner),
                        interface,
                    },
                    Type::Bool,
                )
            }

            // ── Access ──
            ExprKind::Call(call) => {
                let (call, ty) = self.check_call(call)?;
                (TypedExprKind::Call(call), ty)
            }
            ExprKind::Get { object, name } => {
                let (object, access, ty) = self.check_get(object, name)?;
                (
                    TypedExprKind::Get {
                        object: Box::new(object),
                        name: name.clone(),
                        access,
                    },
                    ty,
                )
            }
            ExprKind::Set { object, name, value } => {
                let (object, _, attribute) = match self.check_get(object, name) {
                    Err(TypeCheckError::CannotGetFromNonClass {
                        found,
                        attribute,
                        line,
                    }) => return Err(TypeCheckError::CannotSetOnNonClass { found, attribute, line }),
                    other => other?,
                };
                let value = self.expr_and_confirm(value, &attribute)?;
                let ty = value.ty.clone();
                (
                    TypedExprKind::Set {
                        object: Box::new(object),
                        name: name.clone(),
                        value: Box::new(value),
                    },
                    ty,
                )
            }
            ExprKind::GetIndex { object, index } => {
                let object = self.check_expr(object)?;
                let Some((index_ty, element)) = object.ty.index_types() else {
                    return Err(TypeCheckError::ExpectIndexable {
                        found: object.ty,
                        line,
                    });
                };
                let index = self.check_expr(index)?;
                if !index_ty.is_same_type(&index.ty) {
                    return Err(TypeCheckError::TypeMismatch {
                        expected: index_ty,
                        found: index.ty,
                        line,
                    });
                }
                (
                    TypedExprKind::GetIndex {
                        object: Box::new(object),
                        index: Box::new(index),
                    },
                    element,
                )
            }
            ExprKind::GetIndexRange { object, lower, upper } => {
                let object = self.check_expr(object)?;
                let Some(bound) = object.ty.range_index_type() else {
                    return Err(TypeCheckError::ExpectRangeIndexable {
                        found: object.ty,
                        line,
                    });
                };
                let lower = self.check_expr(lower)?;
                let upper = self.check_expr(upper)?;
                for found in [&lower.ty, &upper.ty] {
                    if !bound.is_same_type(found) {
                        return Err(TypeCheckError::TypeMismatch {
                            expected: bound,
                            found: found.clone(),
                            line,
                        });
                    }
                }
                let ty = object.ty.clone();
                (
                    TypedExprKind::GetIndexRange {
                        object: Box::new(object),
                        lower: Box::new(lower),
                        upper: Box::new(upper),
                    },
                    ty,
                )
            }

            // ── Control Flow ──
            ExprKind::Block(block) => {
                let block = self.check_block(block)?;
                let ty = block.ty.clone();
                (TypedExprKind::Block(block), ty)
            }
            ExprKind::If(if_expr) => {
                let condition = self.expr_and_confirm(&if_expr.condition, &Type::Bool)?;
                let then_branch = self.check_block(&if_expr.then_branch)?;
                let else_branch = match &if_expr.else_branch {
                    Some(else_expr) => {
                        let else_branch = self.check_expr(else_expr)?;
                        if !then_branch.ty.is_same_type(&else_branch.ty) {
                            return Err(TypeCheckError::TypeMismatch {
                                expected: then_branch.ty,
                                found: else_branch.ty,
                                line: else_branch.span.start(),
                            });
                        }
                        Some(else_branch)
                    }
                    None => None,
                };
                let ty = then_branch.ty.clone();
                (
                    TypedExprKind::If(Box::new(TypedIf {
                        condition,
                        then_branch,
                        else_branch,
                    })),
                    ty,
                )
            }
            ExprKind::AnonymousFunction(function) => {
                let sig = self.signature_of(&function.params, function.return_type.as_ref(), line)?;
                let body = self.check_function_body(&sig, &function.body, line)?;
                (
                    TypedExprKind::AnonymousFunction(Box::new(TypedAnonymousFunction {
                        params: sig.params.clone(),
                        ret: (*sig.ret).clone(),
                        body,
                    })),
                    Type::AnonymousFunction(sig),
                )
            }
        };
        Ok(TypedExpr::new(kind, ty, span))
    }

    /// New scope; the block's type is decided by its last statement.
    pub(crate) fn check_block(&mut self, block: &Block) -> CheckResult<TypedBlock> {
        let mut this = self.enter_expr(EnclosingExpr::Block);
        let mut this = this.enter_scope();
        let stmts = this.check_body(&block.stmts)?;
        let ty = block_type(&stmts);
        Ok(TypedBlock {
            stmts,
            ty,
            span: block.span,
        })
    }

    /// A name bound to a deferred `Unknown` placeholder gets one more lookup.
    /// A type still holding a placeholder after that never reaches a typed
    /// node.
    fn variable_type(&self, name: &Ident) -> CheckResult<Type> {
        let line = name.span.start();
        let ty = match self.find_or_throw(&name.name, line)? {
            Type::Unknown(deferred) => self.find_or_throw(&deferred, line)?,
            ty => ty,
        };
        if ty.contains_unknown() {
            return Err(TypeCheckError::UnknownVariable {
                name: name.name.clone(),
                line,
            });
        }
        Ok(ty)
    }

    /// Resolve `object.name` to the checked object, how the access was
    /// resolved, and the attribute's type.
    pub(crate) fn check_get(&mut self, object: &Expr, name: &Ident) -> CheckResult<(TypedExpr, GetAccess, Type)> {
        let line = name.span.start();
        if let ExprKind::Variable(var) = &object.kind {
            if let Some(access) = self.module_member(var, name)? {
                return Ok(access);
            }
        }

        let object = self.check_expr(object)?;
        let missing = |owner: &Type| TypeCheckError::ClassAttributeDoesNotExist {
            object: owner.to_string(),
            attribute: name.name.clone(),
            line,
        };
        let (access, ty) = match &object.ty {
            Type::Class(class) => {
                let class = match self.refresh(&object.ty) {
                    Type::Class(current) => current,
                    _ => class.clone(),
                };
                let attribute = class.attribute(&name.name).ok_or_else(|| missing(&object.ty))?;
                (GetAccess::Attribute, attribute)
            }
            Type::Interface(interface) => {
                let interface = match self.refresh(&object.ty) {
                    Type::Interface(current) => current,
                    _ => interface.clone(),
                };
                let method = interface
                    .methods
                    .iter()
                    .find(|m| m.name == name.name)
                    .cloned()
                    .map(Type::NamedFunction)
                    .ok_or_else(|| missing(&object.ty))?;
                (GetAccess::Attribute, method)
            }
            Type::Module(module) => {
                let member = module.member(&name.name).ok_or_else(|| missing(&object.ty))?;
                (
                    GetAccess::ModuleMember {
                        namespace: module.name.clone(),
                    },
                    member,
                )
            }
            other => match other.builtin_module() {
                Some((package, alias)) => {
                    self.auto_import(package, alias);
                    let method = self
                        .imported(alias)
                        .and_then(|ns| ns.get(&name.name))
                        .map(|symbol| symbol.kind.clone())
                        .ok_or_else(|| missing(&object.ty))?;
                    (
                        GetAccess::BuiltinMethod {
                            namespace: alias.to_string(),
                        },
                        method,
                    )
                }
                None => {
                    return Err(TypeCheckError::CannotGetFromNonClass {
                        found: object.ty,
                        attribute: name.name.clone(),
                        line,
                    })
                }
            },
        };
        Ok((object, access, ty))
    }

    /// `ns.member` where `ns` names an imported namespace. The namespace wins
    /// over a variable of the same name.
    fn module_member(&self, var: &Ident, name: &Ident) -> CheckResult<Option<(TypedExpr, GetAccess, Type)>> {
        let Some(namespace) = self.imported(&var.name) else {
            return Ok(None);
        };
        let member = namespace
            .get(&name.name)
            .map(|symbol| symbol.kind.clone())
            .ok_or_else(|| TypeCheckError::ClassAttributeDoesNotExist {
                object: var.name.clone(),
                attribute: name.name.clone(),
                line: name.span.start(),
            })?;
        let object = TypedExpr::new(
            TypedExprKind::Variable(var.clone()),
            Type::Module(namespace.to_module()),
            var.span,
        );
        let access = GetAccess::ModuleMember {
            namespace: var.name.clone(),
        };
        Ok(Some((object, access, member)))
    }
}

fn block_type(stmts: &[TypedStmt]) -> Type {
    let Some(last) = stmts.last() else {
        return Type::Nil;
    };
    match &last.kind {
        TypedStmtKind::Return(Some(value)) | TypedStmtKind::Yield(value) => value.ty.clone(),
        TypedStmtKind::Return(None) => Type::Nil,
        _ if last.ty == Type::None => Type::Nil,
        _ => last.ty.clone(),
    }
}
