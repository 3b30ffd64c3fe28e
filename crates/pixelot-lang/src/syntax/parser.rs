use crate::error::{Category, Diagnostic};
use crate::syntax::ast::*;
use crate::syntax::token::{Token, TokenKind};

/// Internal parse failure carrying the offending token's position. The top
/// loop converts it into a Syntax diagnostic and resynchronizes, so several
/// independent mistakes surface in one pass.
struct ParseFailure {
    message: String,
    line: usize,
    column: usize,
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        let mut program = Program::default();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            if self.matches(&TokenKind::Eol) {
                continue;
            }
            let pos_before = self.pos;

            match self.parse_statement() {
                Ok(Some(stmt)) => program.statements.push(stmt),
                Ok(None) => {}
                Err(e) => {
                    errors.push(Diagnostic::new(Category::Syntax, e.line, e.column, e.message));
                    self.synchronize();
                }
            }

            // Guarantee progress so an unrecognised token cannot loop forever.
            if self.pos == pos_before {
                self.advance();
            }
        }

        (program, errors)
    }

    // ─── Statements ──────────────────────────────────────────────────────────

    fn parse_statement(&mut self) -> Result<Option<Stmt>, ParseFailure> {
        match self.peek().kind {
            TokenKind::Spawn => self.parse_spawn().map(Some),
            TokenKind::Color => self.parse_color().map(Some),
            TokenKind::Size => self.parse_size().map(Some),
            TokenKind::DrawLine => self.parse_draw_line().map(Some),
            TokenKind::DrawCircle => self.parse_draw_circle().map(Some),
            TokenKind::DrawRectangle => self.parse_draw_rectangle().map(Some),
            TokenKind::Fill => self.parse_fill().map(Some),
            TokenKind::Goto => self.parse_goto().map(Some),
            TokenKind::Ident(_) => self.parse_ident_statement().map(Some),
            TokenKind::Eof => Ok(None),
            _ => {
                let tok = self.peek();
                Err(self.fail_at(
                    tok.line,
                    tok.column,
                    format!("expected a statement, found {}", tok.kind.describe()),
                ))
            }
        }
    }

    /// A bare identifier either assigns (`x <- expr`) or declares a label
    /// (identifier alone on its line). Anything else is a syntax error.
    fn parse_ident_statement(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        match self.peek_next().kind {
            TokenKind::Assign => {
                let name = self.expect_ident()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.parse_expression()?;
                Ok(Stmt::Assign { name, value, span })
            }
            TokenKind::Eol | TokenKind::Eof => {
                let name = self.expect_ident()?;
                Ok(Stmt::Label { name, span })
            }
            _ => {
                let tok = self.peek();
                Err(self.fail_at(
                    tok.line,
                    tok.column,
                    format!(
                        "`{}` does not form a valid statement; expected `<-` for assignment or end of line for a label",
                        tok.lexeme
                    ),
                ))
            }
        }
    }

    fn parse_spawn(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // Spawn
        self.expect(&TokenKind::LParen)?;
        let x = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let y = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::Spawn { x, y, span })
    }

    fn parse_color(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // Color
        self.expect(&TokenKind::LParen)?;
        let color = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::SetColor { color, span })
    }

    fn parse_size(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // Size
        self.expect(&TokenKind::LParen)?;
        let size = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::SetSize { size, span })
    }

    fn parse_draw_line(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // DrawLine
        self.expect(&TokenKind::LParen)?;
        let dx = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let dy = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let distance = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::DrawLine { dx, dy, distance, span })
    }

    fn parse_draw_circle(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // DrawCircle
        self.expect(&TokenKind::LParen)?;
        let dx = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let dy = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let radius = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::DrawCircle { dx, dy, radius, span })
    }

    fn parse_draw_rectangle(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // DrawRectangle
        self.expect(&TokenKind::LParen)?;
        let width = self.parse_expression()?;
        self.expect(&TokenKind::Comma)?;
        let height = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::DrawRectangle { width, height, span })
    }

    fn parse_fill(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // Fill
        self.expect(&TokenKind::LParen)?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::Fill { span })
    }

    fn parse_goto(&mut self) -> Result<Stmt, ParseFailure> {
        let span = self.span();
        self.advance(); // GoTo
        self.expect(&TokenKind::LBracket)?;
        let label_span = self.span();
        let label = self.expect_ident()?;
        self.expect(&TokenKind::RBracket)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        Ok(Stmt::Goto { label, label_span, condition, span })
    }

    // ─── Expressions ─────────────────────────────────────────────────────────
    // Precedence, lowest to highest:
    //   && → || → == → (> >= < <=) → (+ -) → (* / %) → ** → unary - → primary

    fn parse_expression(&mut self) -> Result<Expr, ParseFailure> {
        self.parse_logical_and()
    }

    fn parse_logical_and(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_logical_or()?;
        while self.matches(&TokenKind::AndAnd) {
            let span = node.span();
            let right = self.parse_logical_or()?;
            node = Expr::Binary { left: Box::new(node), op: BinOp::And, right: Box::new(right), span };
        }
        Ok(node)
    }

    fn parse_logical_or(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_equality()?;
        while self.matches(&TokenKind::OrOr) {
            let span = node.span();
            let right = self.parse_equality()?;
            node = Expr::Binary { left: Box::new(node), op: BinOp::Or, right: Box::new(right), span };
        }
        Ok(node)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_comparison()?;
        while self.matches(&TokenKind::EqEq) {
            let span = node.span();
            let right = self.parse_comparison()?;
            node = Expr::Binary { left: Box::new(node), op: BinOp::Eq, right: Box::new(right), span };
        }
        Ok(node)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Gt => BinOp::Gt,
                TokenKind::GtEq => BinOp::GtEq,
                TokenKind::Lt => BinOp::Lt,
                TokenKind::LtEq => BinOp::LtEq,
                _ => break,
            };
            self.advance();
            let span = node.span();
            let right = self.parse_term()?;
            node = Expr::Binary { left: Box::new(node), op, right: Box::new(right), span };
        }
        Ok(node)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let span = node.span();
            let right = self.parse_factor()?;
            node = Expr::Binary { left: Box::new(node), op, right: Box::new(right), span };
        }
        Ok(node)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseFailure> {
        let mut node = self.parse_power()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let span = node.span();
            let right = self.parse_power()?;
            node = Expr::Binary { left: Box::new(node), op, right: Box::new(right), span };
        }
        Ok(node)
    }

    /// One extra recursive call, so `2 ** 3 ** 2` parses as `2 ** (3 ** 2)`.
    fn parse_power(&mut self) -> Result<Expr, ParseFailure> {
        let node = self.parse_unary()?;
        if self.matches(&TokenKind::StarStar) {
            let span = node.span();
            let right = self.parse_power()?;
            return Ok(Expr::Binary { left: Box::new(node), op: BinOp::Pow, right: Box::new(right), span });
        }
        Ok(node)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseFailure> {
        if self.check(&TokenKind::Minus) {
            let span = self.span();
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { operand: Box::new(operand), span });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseFailure> {
        let span = self.span();
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::Number(n) => {
                self.advance();
                Ok(Expr::Number(n, span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expr::Str(s, span))
            }
            // A color name in expression position is its canonical string, so
            // `Color(Black)` and `IsBrushColor(Red)` read naturally.
            TokenKind::ColorName(name) => {
                self.advance();
                Ok(Expr::Str(name, span))
            }
            TokenKind::Ident(name) => {
                if self.peek_next().kind == TokenKind::LParen {
                    return self.parse_call(name, span);
                }
                self.advance();
                Ok(Expr::Variable(name, span))
            }
            TokenKind::LParen => {
                self.advance();
                let node = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Ok(node)
            }
            _ => Err(self.fail_at(
                tok.line,
                tok.column,
                format!(
                    "expected a number, string, variable, function call or `(`, found {}",
                    tok.kind.describe()
                ),
            )),
        }
    }

    fn parse_call(&mut self, name: String, span: Span) -> Result<Expr, ParseFailure> {
        self.advance(); // name
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            args.push(self.parse_expression()?);
            while self.matches(&TokenKind::Comma) {
                args.push(self.parse_expression()?);
            }
        }
        self.expect(&TokenKind::RParen)?;
        Ok(Expr::Call { name, args, span })
    }

    // ─── Helpers ─────────────────────────────────────────────────────────────

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_next(&self) -> &Token {
        if self.pos + 1 < self.tokens.len() {
            &self.tokens[self.pos + 1]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseFailure> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let tok = self.peek();
            Err(self.fail_at(
                tok.line,
                tok.column,
                format!("expected {}, found {}", kind.describe(), tok.kind.describe()),
            ))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseFailure> {
        let tok = self.advance();
        match tok.kind {
            TokenKind::Ident(s) => Ok(s),
            _ => Err(self.fail_at(
                tok.line,
                tok.column,
                format!("expected identifier, found {}", tok.kind.describe()),
            )),
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    fn span(&self) -> Span {
        let tok = self.peek();
        Span::new(tok.line, tok.column)
    }

    fn fail_at(&self, line: usize, column: usize, message: impl Into<String>) -> ParseFailure {
        ParseFailure { message: message.into(), line, column }
    }

    /// Discard the offending token, then everything up to a line boundary or
    /// a token that plausibly starts a new statement.
    fn synchronize(&mut self) {
        let dropped = self.advance();
        if dropped.kind == TokenKind::Eol {
            return;
        }
        while !self.is_at_end() {
            if self.matches(&TokenKind::Eol) {
                return;
            }
            let kind = &self.peek().kind;
            if kind.is_command() || matches!(kind, TokenKind::Ident(_)) {
                return;
            }
            self.advance();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
