/// Source location attached to every node for error attribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ─── Program ─────────────────────────────────────────────────────────────────

/// One parsed script: an ordered statement sequence the interpreter's program
/// counter walks over. The program exclusively owns its tree.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

// ─── Statements ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `x <- expr`
    Assign { name: String, value: Expr, span: Span },
    /// Bare identifier on its own line; a jump target.
    Label { name: String, span: Span },
    /// `Spawn(x, y)` — must be the first executable statement.
    Spawn { x: Expr, y: Expr, span: Span },
    /// `Color(name)`
    SetColor { color: Expr, span: Span },
    /// `Size(k)`
    SetSize { size: Expr, span: Span },
    /// `DrawLine(dirX, dirY, distance)`
    DrawLine { dx: Expr, dy: Expr, distance: Expr, span: Span },
    /// `DrawCircle(dirX, dirY, radius)`
    DrawCircle { dx: Expr, dy: Expr, radius: Expr, span: Span },
    /// `DrawRectangle(width, height)`
    DrawRectangle { width: Expr, height: Expr, span: Span },
    /// `Fill()`
    Fill { span: Span },
    /// `GoTo [label] (condition)`
    Goto { label: String, label_span: Span, condition: Expr, span: Span },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign { span, .. }
            | Stmt::Label { span, .. }
            | Stmt::Spawn { span, .. }
            | Stmt::SetColor { span, .. }
            | Stmt::SetSize { span, .. }
            | Stmt::DrawLine { span, .. }
            | Stmt::DrawCircle { span, .. }
            | Stmt::DrawRectangle { span, .. }
            | Stmt::Fill { span }
            | Stmt::Goto { span, .. } => *span,
        }
    }
}

// ─── Expressions ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Expr {
    Number(i64, Span),
    Str(String, Span),
    Variable(String, Span),

    /// `-operand`
    Unary { operand: Box<Expr>, span: Span },

    /// `left op right`
    Binary { left: Box<Expr>, op: BinOp, right: Box<Expr>, span: Span },

    /// `name(args)` — built-in query functions only.
    Call { name: String, args: Vec<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(_, s) | Expr::Str(_, s) | Expr::Variable(_, s) => *s,
            Expr::Unary { span, .. } | Expr::Binary { span, .. } | Expr::Call { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Eq => "==",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}
