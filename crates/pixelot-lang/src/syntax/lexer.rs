use crate::error::{Category, Diagnostic};
use crate::syntax::token::{Token, TokenKind, keyword_or_ident};

/// Byte-wise scanner. Invalid input produces a Lexical diagnostic and the
/// scan moves on, so one pass reports every bad character.
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source: source.as_bytes(), pos: 0, line: 1, column: 1 }
    }

    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();

        loop {
            self.skip_blanks();

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
                break;
            }

            match self.next_token() {
                Ok(Some(tok)) => tokens.push(tok),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }

        (tokens, errors)
    }

    fn next_token(&mut self) -> Result<Option<Token>, Diagnostic> {
        let line = self.line;
        let col = self.column;
        let start = self.pos;
        let ch = self.advance();

        let kind = match ch {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'%' => TokenKind::Percent,

            b'*' => {
                if self.peek() == b'*' { self.advance(); TokenKind::StarStar }
                else { TokenKind::Star }
            }
            b'/' => {
                if self.peek() == b'/' { self.skip_line(); return Ok(None); }
                else { TokenKind::Slash }
            }
            b'<' => {
                if self.peek() == b'-' { self.advance(); TokenKind::Assign }
                else if self.peek() == b'=' { self.advance(); TokenKind::LtEq }
                else { TokenKind::Lt }
            }
            b'>' => {
                if self.peek() == b'=' { self.advance(); TokenKind::GtEq }
                else { TokenKind::Gt }
            }
            b'=' => {
                if self.peek() == b'=' { self.advance(); TokenKind::EqEq }
                else {
                    return Err(self.error(line, col,
                        "unexpected `=`; use `<-` to assign or `==` to compare"));
                }
            }
            b'&' => {
                if self.peek() == b'&' { self.advance(); TokenKind::AndAnd }
                else {
                    return Err(self.error(line, col, "unexpected `&`; did you mean `&&`?"));
                }
            }
            b'|' => {
                if self.peek() == b'|' { self.advance(); TokenKind::OrOr }
                else {
                    return Err(self.error(line, col, "unexpected `|`; did you mean `||`?"));
                }
            }

            b'"' => {
                let s = self.read_string(line, col)?;
                let lexeme = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
                return Ok(Some(Token::new(TokenKind::Str(s), lexeme, line, col)));
            }
            b'\n' => TokenKind::Eol,

            b'0'..=b'9' => self.read_number(line, col, start)?,
            b'a'..=b'z' | b'A'..=b'Z' => {
                let text = self.read_ident(ch);
                keyword_or_ident(text)
            }
            b'_' => {
                // Consume the whole run so one bad name yields one diagnostic.
                self.read_ident(ch);
                return Err(self.error(line, col,
                    "identifiers and labels cannot start with `_`"));
            }

            other => {
                // Consume the rest of a multi-byte UTF-8 sequence so one
                // character yields one readable diagnostic, not one per byte.
                if other >= 0x80 {
                    while !self.is_at_end() && self.peek() & 0xC0 == 0x80 {
                        self.advance();
                    }
                    let text = String::from_utf8_lossy(&self.source[start..self.pos]);
                    return Err(self.error(line, col,
                        format!("unexpected character `{text}`")));
                }
                return Err(self.error(line, col,
                    format!("unexpected character `{}`", other as char)));
            }
        };

        let lexeme = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        Ok(Some(Token::new(kind, lexeme, line, col)))
    }

    fn error(&self, line: usize, column: usize, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(Category::Lexical, line, column, message)
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        if ch == b'\n' { self.line += 1; self.column = 1; }
        else { self.column += 1; }
        ch
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() { 0 } else { self.source[self.pos] }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Whitespace other than `\n`, which is a token of its own.
    fn skip_blanks(&mut self) {
        while !self.is_at_end() {
            match self.peek() {
                b' ' | b'\t' | b'\r' => { self.advance(); }
                _ => break,
            }
        }
    }

    fn skip_line(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' { self.advance(); }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// Contents are sliced out as UTF-8, so multi-byte characters survive.
    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<String, Diagnostic> {
        let start = self.pos;
        while !self.is_at_end() && self.peek() != b'"' && self.peek() != b'\n' {
            self.advance();
        }
        if self.is_at_end() || self.peek() == b'\n' {
            return Err(self.error(start_line, start_col, "unterminated string literal"));
        }
        let s = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
        self.advance(); // closing quote
        Ok(s)
    }

    fn read_number(&mut self, line: usize, col: usize, start: usize) -> Result<TokenKind, Diagnostic> {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }
        if !self.is_at_end() && (self.peek().is_ascii_alphabetic() || self.peek() == b'_') {
            while !self.is_at_end()
                && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_')
            {
                self.advance();
            }
            let text = String::from_utf8_lossy(&self.source[start..self.pos]).into_owned();
            return Err(self.error(line, col,
                format!("identifier `{text}` cannot start with a digit")));
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        match text.parse::<i64>() {
            Ok(n) => Ok(TokenKind::Number(n)),
            Err(_) => Err(self.error(line, col, format!("number `{text}` is too large"))),
        }
    }

    fn read_ident(&mut self, first: u8) -> String {
        let mut s = String::new();
        s.push(first as char);
        while !self.is_at_end() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            s.push(self.advance() as char);
        }
        s
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
