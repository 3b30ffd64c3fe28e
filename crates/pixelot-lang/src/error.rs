use thiserror::Error;

/// Which phase of the pipeline produced a diagnostic.
///
/// Lexical and Syntax diagnostics accumulate — the lexer and parser recover
/// and keep going so one pass can surface several mistakes. Semantic and
/// Runtime diagnostics are fail-fast: the first one halts the run and is the
/// sole diagnostic returned for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Semantic => "semantic",
            Self::Runtime => "runtime",
        }
    }
}

/// Structured error record handed to the host. Never panics, never raw.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub category: Category,
}

impl Diagnostic {
    pub fn new(category: Category, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self { message: message.into(), line, column, category }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}:{} — {}", self.category.as_str(), self.line, self.column, self.message)
    }
}

/// Every way execution can fail once the program has parsed.
///
/// Variants carry the names the messages need (operator, observed types,
/// function and argument position) so call sites never format strings
/// themselves. `category()` decides whether a variant is a pre-execution
/// semantic failure or a runtime one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Semantic — raised before the first statement executes.
    #[error("duplicate label definition: `{name}`")]
    DuplicateLabel { name: String },
    #[error("GoTo target `{name}` is not a declared label")]
    UnresolvedLabel { name: String },
    #[error("the first executable statement must be `Spawn(x, y)`")]
    MissingSpawn,

    // Runtime — expression evaluation.
    #[error("operands for `{op}` must be integers, got {lhs} and {rhs}")]
    OperandType { op: &'static str, lhs: &'static str, rhs: &'static str },
    #[error("operands for `{op}` must be boolean-like (true/false or 0/1), got {lhs} and {rhs}")]
    LogicalOperandType { op: &'static str, lhs: &'static str, rhs: &'static str },
    #[error("cannot compare {lhs} with {rhs} using `==`")]
    EqualityType { lhs: &'static str, rhs: &'static str },
    #[error("unary `-` requires an integer, got {operand}")]
    NegateType { operand: &'static str },
    #[error("division by zero")]
    DivisionByZero,
    #[error("modulo by zero")]
    ModuloByZero,
    #[error("negative exponent in `**`")]
    NegativeExponent,
    #[error("integer overflow in `{op}`")]
    Overflow { op: &'static str },
    #[error("undefined variable `{name}`")]
    UndefinedVariable { name: String },
    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },
    #[error("`{function}` expects {expected} argument(s), got {got}")]
    Arity { function: &'static str, expected: usize, got: usize },
    #[error("{position} argument of `{function}` must be {expected}, got {got}")]
    ArgumentType { function: &'static str, position: &'static str, expected: &'static str, got: &'static str },
    #[error("`GoTo` condition must be boolean or integer, got {got}")]
    GotoConditionType { got: &'static str },

    // Runtime — statement execution.
    #[error("commands cannot run before the actor is spawned")]
    NotSpawned,
    #[error("spawn position ({x}, {y}) is outside the {width}x{height} canvas")]
    SpawnOutOfBounds { x: i64, y: i64, width: usize, height: usize },
    #[error("unknown color `{name}`")]
    UnknownColor { name: String },
    #[error("invalid direction ({dx}, {dy}); components must be -1, 0 or 1 and not both 0")]
    InvalidDirection { dx: i64, dy: i64 },
    #[error("distance must be positive, got {distance}")]
    InvalidDistance { distance: i64 },
    #[error("radius must be non-negative, got {radius}")]
    NegativeRadius { radius: i64 },
    #[error("rectangle width and height must be positive, got {width}x{height}")]
    InvalidRectangle { width: i64, height: i64 },
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    BadCanvasSize { width: usize, height: usize },
    #[error("execution stopped after {limit} steps")]
    StepLimitExceeded { limit: u64 },
}

impl ErrorKind {
    pub fn category(&self) -> Category {
        match self {
            Self::DuplicateLabel { .. } | Self::UnresolvedLabel { .. } | Self::MissingSpawn => {
                Category::Semantic
            }
            _ => Category::Runtime,
        }
    }

    /// Attach a source position. An error raised without one degrades to 0:0
    /// rather than crashing the host.
    pub fn at(self, line: usize, column: usize) -> Diagnostic {
        Diagnostic::new(self.category(), line, column, self.to_string())
    }
}
