/// Dynamically-typed script value. The set is closed; every operator and
/// builtin matches exhaustively and converts int↔bool only where the
/// language rules say so.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }

    /// Truthiness for `GoTo` conditions: true, or any nonzero integer.
    pub fn is_truthy(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(n) => Some(*n != 0),
            Self::Str(_) => None,
        }
    }

    /// The `&&`/`||` operand rule: a bool, or an integer restricted to 0/1.
    pub fn as_boolean_like(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            _ => None,
        }
    }
}
