//! Semantic types for Aura.
//!
//! [`Type`] is used in two places: the parser writes annotations with it
//! (user-defined names arrive as [`Type::Unknown`]) and the type checker
//! stamps a resolved one onto every typed node.

use std::fmt;

use crate::typed_ast::{TypedExpr, TypedExprKind};
use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Type
// ══════════════════════════════════════════════════════════════════════════════

/// A semantic type in Aura.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    // ── Primitives ──
    Int,
    Float,
    String,
    Bool,
    Char,
    Nil,

    // ── Special ──
    /// Accepts every value. Only builtin signatures use it.
    Any,
    /// Statements produce no value.
    None,
    /// A user-defined name that has not been resolved yet.
    Unknown(std::string::String),
    /// The builtin error value returned by `err(...)`.
    Error,

    // ── Composites ──
    /// `[T]`
    List(Box<Type>),
    /// `{K: V}`
    Map(Box<Type>, Box<Type>),
    /// `(T1, T2, ...)`
    Tuple(Vec<Type>),

    // ── Callables ──
    NamedFunction(NamedFunction),
    /// `fn(T1, T2) -> R`
    AnonymousFunction(FunctionSig),

    // ── Structured ──
    Class(ClassType),
    Interface(InterfaceType),
    Module(ModuleType),
}

/// Declaration visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

/// A typed parameter of a function, method or class.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: std::string::String,
    /// For a variadic parameter, the element type of each absorbed argument.
    pub ty: Type,
    pub variadic: bool,
    /// Literal default value, already checked against `ty`.
    pub default: Option<Box<TypedExpr>>,
}

impl Param {
    pub fn new(name: impl Into<std::string::String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            variadic: false,
            default: None,
        }
    }

    pub fn variadic(name: impl Into<std::string::String>, ty: Type) -> Self {
        Self {
            variadic: true,
            ..Self::new(name, ty)
        }
    }

    pub fn with_default(mut self, default: TypedExpr) -> Self {
        self.default = Some(Box::new(default));
        self
    }

    /// The type the parameter has inside the function body.
    pub fn local_type(&self) -> Type {
        if self.variadic {
            Type::List(Box::new(self.ty.clone()))
        } else {
            self.ty.clone()
        }
    }
}

/// An ordered parameter list plus a return type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub params: Vec<Param>,
    pub ret: Box<Type>,
}

impl FunctionSig {
    pub fn new(params: Vec<Param>, ret: Type) -> Self {
        Self {
            params,
            ret: Box::new(ret),
        }
    }

    /// Structural equality: parameter types, variadic flags, return type.
    /// Parameter names and defaults do not take part.
    pub fn is_same_signature(&self, other: &FunctionSig) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.variadic == b.variadic && a.ty.is_same_type(&b.ty))
            && self.ret.is_same_type(&other.ret)
    }

    /// The trailing variadic parameter, if any.
    pub fn variadic_param(&self) -> Option<&Param> {
        self.params.last().filter(|p| p.variadic)
    }
}

/// A function declared with a name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFunction {
    pub name: std::string::String,
    pub visibility: Visibility,
    pub sig: FunctionSig,
}

impl NamedFunction {
    pub fn new(
        name: impl Into<std::string::String>,
        visibility: Visibility,
        sig: FunctionSig,
    ) -> Self {
        Self {
            name: name.into(),
            visibility,
            sig,
        }
    }
}

/// A class: constructor parameters double as fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassType {
    pub name: std::string::String,
    pub params: Vec<Param>,
    pub methods: Vec<NamedFunction>,
    pub implements: Vec<InterfaceType>,
    pub visibility: Visibility,
}

impl ClassType {
    /// A class known only by name. Filled in once its signature is built.
    pub fn shell(name: impl Into<std::string::String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            methods: Vec::new(),
            implements: Vec::new(),
            visibility,
        }
    }

    pub fn method(&self, name: &str) -> Option<&NamedFunction> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// A field or method by name.
    pub fn attribute(&self, name: &str) -> Option<Type> {
        if let Some(param) = self.params.iter().find(|p| p.name == name) {
            return Some(param.local_type());
        }
        self.method(name).cloned().map(Type::NamedFunction)
    }

    /// The first interface method with no public, structurally equal
    /// counterpart in this class.
    pub fn missing_method<'i>(&self, interface: &'i InterfaceType) -> Option<&'i NamedFunction> {
        interface.methods.iter().find(|required| {
            !self.methods.iter().any(|m| {
                m.visibility == Visibility::Public
                    && m.name == required.name
                    && m.sig.is_same_signature(&required.sig)
            })
        })
    }

    /// Structural interface satisfaction.
    pub fn satisfies(&self, interface: &InterfaceType) -> bool {
        self.missing_method(interface).is_none()
    }

    /// The signature used when the class is called as a constructor.
    pub fn constructor(&self) -> FunctionSig {
        FunctionSig::new(self.params.clone(), Type::Class(self.clone()))
    }
}

/// An interface: a set of method signatures.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub name: std::string::String,
    pub methods: Vec<NamedFunction>,
    pub visibility: Visibility,
}

/// The exports of an imported module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModuleType {
    pub name: std::string::String,
    pub functions: Vec<NamedFunction>,
    pub classes: Vec<ClassType>,
    pub variables: Vec<(std::string::String, Type)>,
}

impl ModuleType {
    pub fn new(name: impl Into<std::string::String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Every exported symbol as `(name, type)`.
    pub fn members(&self) -> impl Iterator<Item = (&str, Type)> + '_ {
        let functions = self
            .functions
            .iter()
            .map(|f| (f.name.as_str(), Type::NamedFunction(f.clone())));
        let classes = self
            .classes
            .iter()
            .map(|c| (c.name.as_str(), Type::Class(c.clone())));
        let variables = self
            .variables
            .iter()
            .map(|(name, ty)| (name.as_str(), ty.clone()));
        functions.chain(classes).chain(variables)
    }

    pub fn member(&self, name: &str) -> Option<Type> {
        self.members().find(|(n, _)| *n == name).map(|(_, ty)| ty)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Compatibility
// ══════════════════════════════════════════════════════════════════════════════

impl Type {
    /// Structural equality. Classes, interfaces and modules compare by name.
    pub fn is_same_type(&self, other: &Type) -> bool {
        use Type::*;
        match (self, other) {
            (Int, Int)
            | (Float, Float)
            | (String, String)
            | (Bool, Bool)
            | (Char, Char)
            | (Nil, Nil)
            | (Any, Any)
            | (None, None)
            | (Error, Error) => true,
            (Unknown(a), Unknown(b)) => a == b,
            (List(a), List(b)) => a.is_same_type(b),
            (Map(ka, va), Map(kb, vb)) => ka.is_same_type(kb) && va.is_same_type(vb),
            (Tuple(a), Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_same_type(y))
            }
            (NamedFunction(a), NamedFunction(b)) => {
                a.name == b.name && a.sig.is_same_signature(&b.sig)
            }
            (AnonymousFunction(a), AnonymousFunction(b)) => a.is_same_signature(b),
            (Class(a), Class(b)) => a.name == b.name,
            (Interface(a), Interface(b)) => a.name == b.name,
            (Module(a), Module(b)) => a.name == b.name,
            _ => false,
        }
    }

    /// Whether a value of type `actual` may be used where `self` is expected.
    ///
    /// Never fails: a mismatch is `false` and the caller decides what to do.
    pub fn is_same_or_inheriting_type(&self, actual: &Type) -> bool {
        if self.is_same_type(actual) {
            return true;
        }
        match (self, actual) {
            (Type::Any, _) => true,
            (Type::Interface(interface), Type::Class(class)) => class.satisfies(interface),
            (Type::List(expected), Type::List(actual)) => {
                expected.is_same_or_inheriting_type(actual)
            }
            (Type::Map(ek, ev), Type::Map(ak, av)) => {
                ek.is_same_or_inheriting_type(ak) && ev.is_same_or_inheriting_type(av)
            }
            (Type::AnonymousFunction(sig), Type::NamedFunction(f)) => sig.is_same_signature(&f.sig),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    /// True if an `Unknown` placeholder appears anywhere in the type.
    pub fn contains_unknown(&self) -> bool {
        match self {
            Type::Unknown(_) => true,
            Type::List(inner) => inner.contains_unknown(),
            Type::Map(k, v) => k.contains_unknown() || v.contains_unknown(),
            Type::Tuple(items) => items.iter().any(Type::contains_unknown),
            Type::AnonymousFunction(sig) => {
                sig.ret.contains_unknown() || sig.params.iter().any(|p| p.ty.contains_unknown())
            }
            _ => false,
        }
    }

    // ── Capabilities ──

    /// Builtin types whose attributes live in a stdlib package:
    /// `(package, alias)`.
    pub fn builtin_module(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Type::String => Some(("aura/strings", "strings")),
            Type::List(_) => Some(("aura/lists", "lists")),
            Type::Error => Some(("aura/errors", "errors")),
            _ => Option::None,
        }
    }

    /// IIndexable: `(index type, element type)`.
    pub fn index_types(&self) -> Option<(Type, Type)> {
        match self {
            Type::List(elem) => Some((Type::Int, (**elem).clone())),
            Type::String => Some((Type::Int, Type::Char)),
            Type::Map(key, value) => Some(((**key).clone(), (**value).clone())),
            _ => Option::None,
        }
    }

    /// IRangeIndexable: the bound type of a slice. Slicing keeps the type.
    pub fn range_index_type(&self) -> Option<Type> {
        match self {
            Type::List(_) | Type::String => Some(Type::Int),
            _ => Option::None,
        }
    }

    /// IIterable: the element type bound by `foreach`.
    pub fn iterated_type(&self) -> Option<Type> {
        match self {
            Type::List(elem) => Some((**elem).clone()),
            Type::String => Some(Type::Char),
            _ => Option::None,
        }
    }

    /// ICallable: the signature a call is matched against.
    pub fn callable_signature(&self) -> Option<FunctionSig> {
        match self {
            Type::NamedFunction(f) => Some(f.sig.clone()),
            Type::AnonymousFunction(sig) => Some(sig.clone()),
            Type::Class(class) => Some(class.constructor()),
            _ => Option::None,
        }
    }

    /// IDefaultable: the canonical zero value, tagged with `span`. `None`
    /// for types without one.
    pub fn default_value(&self, span: Span) -> Option<TypedExpr> {
        let kind = match self {
            Type::Int => TypedExprKind::Int(0),
            Type::Float => TypedExprKind::Float(0.0),
            Type::Bool => TypedExprKind::Bool(false),
            Type::List(_) => TypedExprKind::List(Vec::new()),
            Type::Map(_, _) => TypedExprKind::Map(Vec::new()),
            _ => return Option::None,
        };
        Some(TypedExpr::new(kind, self.clone(), span))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Display
// ══════════════════════════════════════════════════════════════════════════════

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if param.variadic {
            write!(f, "...")?;
        }
        write!(f, "{}", param.ty)?;
    }
    Ok(())
}

impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn(")?;
        write_params(f, &self.params)?;
        write!(f, ") -> {}", self.ret)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Float => write!(f, "Float"),
            Type::String => write!(f, "String"),
            Type::Bool => write!(f, "Bool"),
            Type::Char => write!(f, "Char"),
            Type::Nil => write!(f, "Nil"),
            Type::Any => write!(f, "Any"),
            Type::None => write!(f, "None"),
            Type::Unknown(name) => write!(f, "{name}"),
            Type::Error => write!(f, "Error"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::Map(k, v) => write!(f, "{{{k}: {v}}}"),
            Type::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Type::NamedFunction(func) => {
                write!(f, "fn {}(", func.name)?;
                write_params(f, &func.sig.params)?;
                write!(f, ") -> {}", func.sig.ret)
            }
            Type::AnonymousFunction(sig) => write!(f, "{sig}"),
            Type::Class(class) => write!(f, "{}", class.name),
            Type::Interface(interface) => write!(f, "{}", interface.name),
            Type::Module(module) => write!(f, "module {}", module.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, params: Vec<Type>, ret: Type) -> NamedFunction {
        NamedFunction::new(
            name,
            Visibility::Public,
            FunctionSig::new(
                params
                    .into_iter()
                    .enumerate()
                    .map(|(i, t)| Param::new(format!("p{i}"), t))
                    .collect(),
                ret,
            ),
        )
    }

    fn greeter() -> InterfaceType {
        InterfaceType {
            name: "Greeter".into(),
            methods: vec![method("greet", vec![Type::String], Type::String)],
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn test_same_type_is_structural_for_containers() {
        let a = Type::List(Box::new(Type::Int));
        let b = Type::List(Box::new(Type::Int));
        let c = Type::List(Box::new(Type::Float));
        assert!(a.is_same_type(&b));
        assert!(!a.is_same_type(&c));
        let m1 = Type::Map(Box::new(Type::String), Box::new(a.clone()));
        let m2 = Type::Map(Box::new(Type::String), Box::new(c));
        assert!(!m1.is_same_type(&m2));
        assert!(m1.is_same_type(&m1.clone()));
    }

    #[test]
    fn test_same_type_symmetric_for_tuples() {
        let a = Type::Tuple(vec![Type::Int, Type::String]);
        let b = Type::Tuple(vec![Type::Int, Type::String]);
        let c = Type::Tuple(vec![Type::Int]);
        assert!(a.is_same_type(&b) && b.is_same_type(&a));
        assert!(!a.is_same_type(&c) && !c.is_same_type(&a));
    }

    #[test]
    fn test_class_satisfies_interface_structurally() {
        let mut class = ClassType::shell("Person", Visibility::Public);
        class.methods.push(method("greet", vec![Type::String], Type::String));
        class.methods.push(method("age", vec![], Type::Int));

        let expected = Type::Interface(greeter());
        assert!(expected.is_same_or_inheriting_type(&Type::Class(class.clone())));
        assert!(!Type::Class(class).is_same_or_inheriting_type(&expected));
    }

    #[test]
    fn test_private_or_mismatched_method_does_not_satisfy() {
        let mut private = ClassType::shell("Shy", Visibility::Public);
        let mut m = method("greet", vec![Type::String], Type::String);
        m.visibility = Visibility::Private;
        private.methods.push(m);
        assert!(!private.satisfies(&greeter()));

        let mut wrong = ClassType::shell("Loud", Visibility::Public);
        wrong.methods.push(method("greet", vec![Type::Int], Type::String));
        assert_eq!(
            wrong.missing_method(&greeter()).map(|m| m.name.as_str()),
            Some("greet")
        );
    }

    #[test]
    fn test_any_accepts_everything_but_is_not_accepted() {
        assert!(Type::Any.is_same_or_inheriting_type(&Type::Int));
        assert!(!Type::Int.is_same_or_inheriting_type(&Type::Any));
        let any_list = Type::List(Box::new(Type::Any));
        assert!(any_list.is_same_or_inheriting_type(&Type::List(Box::new(Type::String))));
    }

    #[test]
    fn test_defaults_for_defaultable_types() {
        let span = Span::line(3);
        let zero = Type::Int.default_value(span).unwrap();
        assert_eq!(zero.kind, TypedExprKind::Int(0));
        assert_eq!(zero.span.start(), 3);
        assert_eq!(
            Type::Bool.default_value(span).unwrap().kind,
            TypedExprKind::Bool(false)
        );
        assert!(Type::String.default_value(span).is_none());
        assert!(Type::Char.default_value(span).is_none());
    }

    #[test]
    fn test_capabilities() {
        assert_eq!(
            Type::List(Box::new(Type::Char)).iterated_type(),
            Some(Type::Char)
        );
        assert_eq!(Type::String.index_types(), Some((Type::Int, Type::Char)));
        assert!(Type::Int.index_types().is_none());
        assert!(Type::Map(Box::new(Type::Int), Box::new(Type::Int))
            .range_index_type()
            .is_none());
        assert_eq!(Type::Error.builtin_module(), Some(("aura/errors", "errors")));
        assert!(Type::Bool.callable_signature().is_none());
    }

    #[test]
    fn test_class_constructor_signature_returns_instance() {
        let mut class = ClassType::shell("Point", Visibility::Public);
        class.params = vec![Param::new("x", Type::Int), Param::new("y", Type::Int)];
        let sig = Type::Class(class).callable_signature().unwrap();
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.ret.to_string(), "Point");
    }

    #[test]
    fn test_display() {
        let sig = FunctionSig::new(
            vec![Param::new("a", Type::Int), Param::variadic("rest", Type::String)],
            Type::Bool,
        );
        assert_eq!(Type::AnonymousFunction(sig).to_string(), "fn(Int, ...String) -> Bool");
        assert_eq!(
            Type::Map(Box::new(Type::String), Box::new(Type::List(Box::new(Type::Int)))).to_string(),
            "{String: [Int]}"
        );
    }
}
