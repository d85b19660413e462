use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics stored per batch unless configured otherwise.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Resolution,
    Type,
    Arity,
    Structure,
    Control,
    Internal,
}

/// Numeric error code (E100–E699).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Resolution errors (E100–E199) ──
    pub const UNKNOWN_VARIABLE: Self = Self(100);
    pub const UNKNOWN_MODULE: Self = Self(101);
    pub const UNKNOWN_ATTRIBUTE: Self = Self(102);
    pub const CYCLIC_IMPORT: Self = Self(103);
    pub const IMPORT_FAILED: Self = Self(104);
    pub const MISSING_MODULE_DECLARATION: Self = Self(105);

    // ── Type errors (E200–E299) ──
    pub const UNEXPECTED_TYPE: Self = Self(200);
    pub const TYPE_MISMATCH: Self = Self(201);
    pub const NON_DEFAULTABLE_TYPE: Self = Self(202);
    pub const UNARY_OPERAND_MISMATCH: Self = Self(203);
    pub const NON_NUMERIC_STEP: Self = Self(204);
    pub const DEFAULT_NOT_LITERAL: Self = Self(205);

    // ── Arity errors (E300–E399) ──
    pub const WRONG_ARG_COUNT: Self = Self(300);
    pub const MISSING_ARGUMENT: Self = Self(301);
    pub const MIXED_ARGUMENTS: Self = Self(302);
    pub const UNKNOWN_ARGUMENT: Self = Self(303);
    pub const DUPLICATE_ARGUMENT: Self = Self(304);

    // ── Structure errors (E400–E499) ──
    pub const MISSING_INTERFACE_METHOD: Self = Self(400);
    pub const IMPLEMENTS_NON_INTERFACE: Self = Self(401);
    pub const NOT_CALLABLE: Self = Self(402);
    pub const NOT_GETTABLE: Self = Self(403);
    pub const NOT_SETTABLE: Self = Self(404);
    pub const NOT_INDEXABLE: Self = Self(405);
    pub const NOT_RANGE_INDEXABLE: Self = Self(406);
    pub const NOT_ITERABLE: Self = Self(407);
    pub const NOT_AN_INTERFACE: Self = Self(408);

    // ── Control errors (E500–E599) ──
    pub const INVALID_BREAK: Self = Self(500);
    pub const INVALID_CONTINUE: Self = Self(501);
    pub const INVALID_YIELD: Self = Self(502);
    pub const INVALID_THIS: Self = Self(503);

    // ── Internal errors (E600–E699) ──
    pub const INTERNAL: Self = Self(600);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Resolution,
            200..=299 => ErrorCategory::Type,
            300..=399 => ErrorCategory::Arity,
            400..=499 => ErrorCategory::Structure,
            500..=599 => ErrorCategory::Control,
            _ => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution => write!(f, "resolution"),
            Self::Type => write!(f, "type"),
            Self::Arity => write!(f, "arity"),
            Self::Structure => write!(f, "structure"),
            Self::Control => write!(f, "control"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// A structured Aura type-checking diagnostic.
///
/// The reporting layer renders these from fields; it must not parse the
/// rendered string back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Path of the source file the diagnostic belongs to.
    pub file: String,
    /// Error code (e.g., E201).
    pub code: ErrorCode,
    /// Error category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable error message.
    pub message: String,
    /// 1-based source line.
    pub line: u32,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            line,
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} line {}] {}", self.file, self.line, self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// An ordered batch of diagnostics collected over one pass.
///
/// Entries past the limit are counted in `total_errors` but not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub total_errors: usize,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    MAX_ERRORS
}

impl Diagnostics {
    /// Create an empty batch with the default limit.
    pub fn empty() -> Self {
        Self::with_limit(MAX_ERRORS)
    }

    /// Create an empty batch storing at most `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            errors: Vec::new(),
            total_errors: 0,
            limit,
        }
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Add an error, respecting the limit.
    pub fn push(&mut self, error: Diagnostic) {
        if self.errors.len() < self.limit {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Append every entry of another batch, in order.
    pub fn extend(&mut self, other: Diagnostics) {
        let dropped = other.total_errors - other.errors.len();
        for error in other.errors {
            self.push(error);
        }
        self.total_errors += dropped;
    }

    /// Iterate over the stored diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter()
    }

    /// Serialize the batch for tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Renders `[<path> line <line>] <message>` entries separated by blank lines.
impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "\n\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}
