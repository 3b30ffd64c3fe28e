use crate::types::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(i64),
    Str(String),
    /// An identifier that resolved to a known color name; carries the
    /// canonical spelling so `Color(Black)` behaves like `Color("Black")`.
    ColorName(String),
    Ident(String),

    // Command keywords (case-insensitive in source)
    Spawn,
    Color,
    Size,
    DrawLine,
    DrawCircle,
    DrawRectangle,
    Fill,
    Goto,

    // Operators
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    StarStar,  // **
    EqEq,      // ==
    Gt,        // >
    GtEq,      // >=
    Lt,        // <
    LtEq,      // <=
    AndAnd,    // &&
    OrOr,      // ||
    Assign,    // <-

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,

    // Control
    Eol,
    Eof,
}

impl TokenKind {
    pub fn is_command(&self) -> bool {
        matches!(
            self,
            Self::Spawn | Self::Color | Self::Size | Self::DrawLine
                | Self::DrawCircle | Self::DrawRectangle | Self::Fill | Self::Goto
        )
    }

    /// Human-readable name for syntax error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Str(_) => "string",
            Self::ColorName(_) => "color name",
            Self::Ident(_) => "identifier",
            Self::Spawn => "`Spawn`",
            Self::Color => "`Color`",
            Self::Size => "`Size`",
            Self::DrawLine => "`DrawLine`",
            Self::DrawCircle => "`DrawCircle`",
            Self::DrawRectangle => "`DrawRectangle`",
            Self::Fill => "`Fill`",
            Self::Goto => "`GoTo`",
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::StarStar => "`**`",
            Self::EqEq => "`==`",
            Self::Gt => "`>`",
            Self::GtEq => "`>=`",
            Self::Lt => "`<`",
            Self::LtEq => "`<=`",
            Self::AndAnd => "`&&`",
            Self::OrOr => "`||`",
            Self::Assign => "`<-`",
            Self::LParen => "`(`",
            Self::RParen => "`)`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::Comma => "`,`",
            Self::Eol => "end of line",
            Self::Eof => "end of input",
        }
    }
}

/// Resolves identifier text case-insensitively: command keyword first, then
/// color name, otherwise a plain identifier.
pub fn keyword_or_ident(text: String) -> TokenKind {
    match text.to_ascii_lowercase().as_str() {
        "spawn" => TokenKind::Spawn,
        "color" => TokenKind::Color,
        "size" => TokenKind::Size,
        "drawline" => TokenKind::DrawLine,
        "drawcircle" => TokenKind::DrawCircle,
        "drawrectangle" => TokenKind::DrawRectangle,
        "fill" => TokenKind::Fill,
        "goto" => TokenKind::Goto,
        _ => match Color::parse(&text) {
            Some(color) => TokenKind::ColorName(color.name().to_string()),
            None => TokenKind::Ident(text),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind, lexeme: lexeme.into(), line, column }
    }
}
