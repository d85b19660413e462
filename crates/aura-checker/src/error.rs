//! Typed diagnostics raised while checking a single declaration.

use aura_types::{Diagnostic, ErrorCode, Type};
use thiserror::Error;

/// A single contract violation. Every variant carries its source line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeCheckError {
    // ── Resolution ──
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String, line: u32 },
    #[error("cannot resolve module '{package}': {reason}")]
    UnknownModule {
        package: String,
        reason: String,
        line: u32,
    },
    #[error("'{object}' has no attribute '{attribute}'")]
    ClassAttributeDoesNotExist {
        object: String,
        attribute: String,
        line: u32,
    },
    #[error("cyclic import of '{package}'")]
    CyclicImport { package: String, line: u32 },
    #[error("imported module '{package}' failed to type check")]
    ImportedModuleFailed { package: String, line: u32 },
    #[error("file does not declare its module with `mod`")]
    MissingModuleDeclaration { line: u32 },

    // ── Type ──
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        expected: Type,
        found: Type,
        line: u32,
    },
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: Type,
        found: Type,
        line: u32,
    },
    #[error("'{name}' has type {ty}, which has no default value, and must be initialized")]
    MustSpecifyInitialValueForNonDefaultableType { name: String, ty: Type, line: u32 },
    #[error("operator '{op}' cannot be applied to {operand}")]
    MismatchedUnaryOperatorAndOperand {
        op: &'static str,
        operand: Type,
        line: u32,
    },
    #[error("cannot increment a value of type {found}")]
    CannotIncrementNonNumber { found: Type, line: u32 },
    #[error("cannot decrement a value of type {found}")]
    CannotDecrementNonNumber { found: Type, line: u32 },
    #[error("default value of parameter '{param}' must be a literal")]
    DefaultValueMustBeLiteral { param: String, line: u32 },

    // ── Arity ──
    #[error("'{callee}' expects {expected} argument{}, got {found}", plural(.expected))]
    IncorrectNumberOfArguments {
        callee: String,
        expected: usize,
        found: usize,
        line: u32,
    },
    #[error("call to '{callee}' must specify a value for '{param}', which has no default")]
    MustSpecifyValueForArgumentWithoutDefaultValue {
        callee: String,
        param: String,
        line: u32,
    },
    #[error("call to '{callee}' mixes named and positional arguments")]
    CannotMixNamedAndUnnamedArguments { callee: String, line: u32 },
    #[error("'{callee}' has no parameter named '{name}'")]
    UnknownNamedArgument {
        callee: String,
        name: String,
        line: u32,
    },
    #[error("'{name}' is passed to '{callee}' more than once")]
    DuplicateNamedArgument {
        callee: String,
        name: String,
        line: u32,
    },

    // ── Structure ──
    #[error("class '{class}' does not implement method '{method}' of interface '{interface}'")]
    MissingInterfaceMethod {
        class: String,
        interface: String,
        method: String,
        line: u32,
    },
    #[error("'{name}' is not an interface and cannot be implemented")]
    CannotImplementNonInterface { name: String, line: u32 },
    #[error("a value of type {found} cannot be called")]
    ExpectCallable { found: Type, line: u32 },
    #[error("cannot get '{attribute}' from a value of type {found}")]
    CannotGetFromNonClass {
        found: Type,
        attribute: String,
        line: u32,
    },
    #[error("cannot set '{attribute}' on a value of type {found}")]
    CannotSetOnNonClass {
        found: Type,
        attribute: String,
        line: u32,
    },
    #[error("a value of type {found} cannot be indexed")]
    ExpectIndexable { found: Type, line: u32 },
    #[error("a value of type {found} cannot be sliced")]
    ExpectRangeIndexable { found: Type, line: u32 },
    #[error("a value of type {found} cannot be iterated")]
    ExpectIterable { found: Type, line: u32 },
    #[error("'{name}' is not an interface")]
    ExpectInterface { name: String, line: u32 },

    // ── Control ──
    #[error("`break` is only valid directly inside a loop")]
    InvalidUseOfBreakKeyword { line: u32 },
    #[error("`continue` is only valid directly inside a loop")]
    InvalidUseOfContinueKeyword { line: u32 },
    #[error("`yield` is only valid inside an if or block expression")]
    InvalidUseOfYieldKeyword { line: u32 },
    #[error("`this` is only valid inside a class")]
    InvalidUseOfThisKeyword { line: u32 },
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

/// Result of checking one node.
pub type CheckResult<T> = Result<T, TypeCheckError>;

impl TypeCheckError {
    pub fn line(&self) -> u32 {
        use TypeCheckError::*;
        match self {
            UnknownVariable { line, .. }
            | UnknownModule { line, .. }
            | ClassAttributeDoesNotExist { line, .. }
            | CyclicImport { line, .. }
            | ImportedModuleFailed { line, .. }
            | MissingModuleDeclaration { line }
            | UnexpectedType { line, .. }
            | TypeMismatch { line, .. }
            | MustSpecifyInitialValueForNonDefaultableType { line, .. }
            | MismatchedUnaryOperatorAndOperand { line, .. }
            | CannotIncrementNonNumber { line, .. }
            | CannotDecrementNonNumber { line, .. }
            | DefaultValueMustBeLiteral { line, .. }
            | IncorrectNumberOfArguments { line, .. }
            | MustSpecifyValueForArgumentWithoutDefaultValue { line, .. }
            | CannotMixNamedAndUnnamedArguments { line, .. }
            | UnknownNamedArgument { line, .. }
            | DuplicateNamedArgument { line, .. }
            | MissingInterfaceMethod { line, .. }
            | CannotImplementNonInterface { line, .. }
            | ExpectCallable { line, .. }
            | CannotGetFromNonClass { line, .. }
            | CannotSetOnNonClass { line, .. }
            | ExpectIndexable { line, .. }
            | ExpectRangeIndexable { line, .. }
            | ExpectIterable { line, .. }
            | ExpectInterface { line, .. }
            | InvalidUseOfBreakKeyword { line }
            | InvalidUseOfContinueKeyword { line }
            | InvalidUseOfYieldKeyword { line }
            | InvalidUseOfThisKeyword { line } => *line,
        }
    }

    pub fn code(&self) -> ErrorCode {
        use TypeCheckError::*;
        match self {
            UnknownVariable { .. } => ErrorCode::UNKNOWN_VARIABLE,
            UnknownModule { .. } => ErrorCode::UNKNOWN_MODULE,
            ClassAttributeDoesNotExist { .. } => ErrorCode::UNKNOWN_ATTRIBUTE,
            CyclicImport { .. } => ErrorCode::CYCLIC_IMPORT,
            ImportedModuleFailed { .. } => ErrorCode::IMPORT_FAILED,
            MissingModuleDeclaration { .. } => ErrorCode::MISSING_MODULE_DECLARATION,
            UnexpectedType { .. } => ErrorCode::UNEXPECTED_TYPE,
            TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            MustSpecifyInitialValueForNonDefaultableType { .. } => ErrorCode::NON_DEFAULTABLE_TYPE,
            MismatchedUnaryOperatorAndOperand { .. } => ErrorCode::UNARY_OPERAND_MISMATCH,
            CannotIncrementNonNumber { .. } | CannotDecrementNonNumber { .. } => {
                ErrorCode::NON_NUMERIC_STEP
            }
            DefaultValueMustBeLiteral { .. } => ErrorCode::DEFAULT_NOT_LITERAL,
            IncorrectNumberOfArguments { .. } => ErrorCode::WRONG_ARG_COUNT,
            MustSpecifyValueForArgumentWithoutDefaultValue { .. } => ErrorCode::MISSING_ARGUMENT,
            CannotMixNamedAndUnnamedArguments { .. } => ErrorCode::MIXED_ARGUMENTS,
            UnknownNamedArgument { .. } => ErrorCode::UNKNOWN_ARGUMENT,
            DuplicateNamedArgument { .. } => ErrorCode::DUPLICATE_ARGUMENT,
            MissingInterfaceMethod { .. } => ErrorCode::MISSING_INTERFACE_METHOD,
            CannotImplementNonInterface { .. } => ErrorCode::IMPLEMENTS_NON_INTERFACE,
            ExpectCallable { .. } => ErrorCode::NOT_CALLABLE,
            CannotGetFromNonClass { .. } => ErrorCode::NOT_GETTABLE,
            CannotSetOnNonClass { .. } => ErrorCode::NOT_SETTABLE,
            ExpectIndexable { .. } => ErrorCode::NOT_INDEXABLE,
            ExpectRangeIndexable { .. } => ErrorCode::NOT_RANGE_INDEXABLE,
            ExpectIterable { .. } => ErrorCode::NOT_ITERABLE,
            ExpectInterface { .. } => ErrorCode::NOT_AN_INTERFACE,
            InvalidUseOfBreakKeyword { .. } => ErrorCode::INVALID_BREAK,
            InvalidUseOfContinueKeyword { .. } => ErrorCode::INVALID_CONTINUE,
            InvalidUseOfYieldKeyword { .. } => ErrorCode::INVALID_YIELD,
            InvalidUseOfThisKeyword { .. } => ErrorCode::INVALID_THIS,
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        use TypeCheckError::*;
        match self {
            MustSpecifyInitialValueForNonDefaultableType { .. } => {
                Some("add an initializer to the declaration")
            }
            CannotMixNamedAndUnnamedArguments { .. } => {
                Some("pass either every argument by name or none of them")
            }
            MissingModuleDeclaration { .. } => Some("start the file with `mod <name>`"),
            InvalidUseOfYieldKeyword { .. } => {
                Some("`yield` produces the value of the enclosing if or block expression")
            }
            _ => None,
        }
    }

    /// Attach the file path, producing the record the aggregator stores.
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let diagnostic = Diagnostic::new(file, self.code(), self.to_string(), self.line());
        match self.suggestion() {
            Some(suggestion) => diagnostic.with_suggestion(suggestion),
            None => diagnostic,
        }
    }
}
