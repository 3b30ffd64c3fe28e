//! Tree-walking execution engine. Resolves labels up front, then drives an
//! explicit program counter over the statement sequence so `GoTo` can
//! overwrite it. The first fatal error halts the run and becomes the run's
//! sole diagnostic.

use std::collections::HashMap;

use crate::error::{Diagnostic, ErrorKind};
use crate::runtime::value::Value;
use crate::syntax::ast::{BinOp, Expr, Program, Span, Stmt};
use crate::types::actor::Actor;
use crate::types::canvas::Canvas;
use crate::types::color::Color;

/// Internal failure: an error kind plus the most precise span known at the
/// raise site. The run loop fills in the statement span when none is set.
struct Fault {
    kind: ErrorKind,
    span: Option<Span>,
}

impl Fault {
    fn new(kind: ErrorKind, span: Span) -> Self {
        Self { kind, span: Some(span) }
    }
}

impl From<ErrorKind> for Fault {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, span: None }
    }
}

pub struct Interpreter<'a> {
    program: &'a Program,
    canvas: &'a mut Canvas,
    actor: &'a mut Actor,
    variables: HashMap<String, Value>,
    labels: HashMap<String, usize>,
    pc: usize,
    spawned: bool,
    step_limit: Option<u64>,
    on_repaint: Option<&'a mut dyn FnMut(&Canvas)>,
}

impl<'a> Interpreter<'a> {
    pub fn new(program: &'a Program, canvas: &'a mut Canvas, actor: &'a mut Actor) -> Self {
        Self {
            program,
            canvas,
            actor,
            variables: HashMap::new(),
            labels: HashMap::new(),
            pc: 0,
            spawned: false,
            step_limit: None,
            on_repaint: None,
        }
    }

    /// Bound the number of executed statements. A host facility for scripts
    /// with unbounded label loops; exhaustion is a Runtime diagnostic.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Called after every statement that mutated pixels, so a host can
    /// schedule a repaint without polling.
    pub fn with_repaint_hook(mut self, hook: &'a mut dyn FnMut(&Canvas)) -> Self {
        self.on_repaint = Some(hook);
        self
    }

    /// Executes to completion or first fatal diagnostic.
    pub fn run(&mut self) -> Result<(), Diagnostic> {
        self.resolve_labels()?;
        self.check_leading_spawn()?;

        let mut steps: u64 = 0;
        while self.pc < self.program.statements.len() {
            let stmt = &self.program.statements[self.pc];
            self.pc += 1;

            if let Some(limit) = self.step_limit {
                steps += 1;
                if steps > limit {
                    return Err(ErrorKind::StepLimitExceeded { limit }
                        .at(stmt.span().line, stmt.span().column));
                }
            }

            if !self.spawned && !matches!(stmt, Stmt::Spawn { .. } | Stmt::Label { .. }) {
                let span = stmt.span();
                return Err(ErrorKind::NotSpawned.at(span.line, span.column));
            }

            let before = self.canvas.revision();
            if let Err(fault) = self.exec_stmt(stmt) {
                let span = fault.span.unwrap_or_else(|| stmt.span());
                return Err(fault.kind.at(span.line, span.column));
            }
            if matches!(stmt, Stmt::Spawn { .. }) {
                self.spawned = true;
            }
            if self.canvas.revision() != before {
                if let Some(hook) = self.on_repaint.as_deref_mut() {
                    hook(self.canvas);
                }
            }
        }
        Ok(())
    }

    // ─── Pre-execution validation ─────────────────────────────────────────────

    /// One forward scan builds the label table; a second checks every jump
    /// target against it. Both failures are Semantic and precede execution.
    fn resolve_labels(&mut self) -> Result<(), Diagnostic> {
        for (index, stmt) in self.program.statements.iter().enumerate() {
            if let Stmt::Label { name, span } = stmt {
                if self.labels.insert(name.clone(), index).is_some() {
                    return Err(ErrorKind::DuplicateLabel { name: name.clone() }
                        .at(span.line, span.column));
                }
            }
        }
        for stmt in &self.program.statements {
            if let Stmt::Goto { label, label_span, .. } = stmt {
                if !self.labels.contains_key(label) {
                    return Err(ErrorKind::UnresolvedLabel { name: label.clone() }
                        .at(label_span.line, label_span.column));
                }
            }
        }
        Ok(())
    }

    fn check_leading_spawn(&self) -> Result<(), Diagnostic> {
        let first = self
            .program
            .statements
            .iter()
            .find(|s| !matches!(s, Stmt::Label { .. }));
        match first {
            None | Some(Stmt::Spawn { .. }) => Ok(()),
            Some(stmt) => {
                let span = stmt.span();
                Err(ErrorKind::MissingSpawn.at(span.line, span.column))
            }
        }
    }

    // ─── Statement execution ──────────────────────────────────────────────────

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<(), Fault> {
        match stmt {
            Stmt::Label { .. } => Ok(()),

            Stmt::Assign { name, value, .. } => {
                let val = self.eval_expr(value)?;
                self.variables.insert(name.clone(), val);
                Ok(())
            }

            Stmt::Spawn { x, y, .. } => {
                let x = self.int_arg("Spawn", "first", x)?;
                let y = self.int_arg("Spawn", "second", y)?;
                self.actor.spawn(self.canvas, x, y)?;
                Ok(())
            }

            Stmt::SetColor { color, .. } => {
                let name = self.str_arg("Color", "first", color)?;
                self.actor.set_color(&name)?;
                Ok(())
            }

            Stmt::SetSize { size, .. } => {
                let k = self.int_arg("Size", "first", size)?;
                self.actor.set_size(k);
                Ok(())
            }

            Stmt::DrawLine { dx, dy, distance, .. } => {
                let dx = self.int_arg("DrawLine", "first", dx)?;
                let dy = self.int_arg("DrawLine", "second", dy)?;
                let distance = self.int_arg("DrawLine", "third", distance)?;
                self.actor.draw_line(self.canvas, dx, dy, distance)?;
                Ok(())
            }

            Stmt::DrawCircle { dx, dy, radius, .. } => {
                let dx = self.int_arg("DrawCircle", "first", dx)?;
                let dy = self.int_arg("DrawCircle", "second", dy)?;
                let radius = self.int_arg("DrawCircle", "third", radius)?;
                self.actor.draw_circle(self.canvas, dx, dy, radius)?;
                Ok(())
            }

            Stmt::DrawRectangle { width, height, .. } => {
                let width = self.int_arg("DrawRectangle", "first", width)?;
                let height = self.int_arg("DrawRectangle", "second", height)?;
                self.actor.draw_rectangle(self.canvas, width, height)?;
                Ok(())
            }

            Stmt::Fill { .. } => {
                self.actor.fill(self.canvas);
                Ok(())
            }

            Stmt::Goto { label, condition, .. } => {
                let cond = self.eval_expr(condition)?;
                let jump = cond.is_truthy().ok_or_else(|| {
                    Fault::new(
                        ErrorKind::GotoConditionType { got: cond.type_name() },
                        condition.span(),
                    )
                })?;
                if jump {
                    // Validated by resolve_labels, so the lookup cannot miss.
                    if let Some(&index) = self.labels.get(label) {
                        self.pc = index;
                    }
                }
                Ok(())
            }
        }
    }

    /// Evaluates a command argument that must be an integer.
    fn int_arg(
        &mut self,
        function: &'static str,
        position: &'static str,
        expr: &Expr,
    ) -> Result<i64, Fault> {
        match self.eval_expr(expr)? {
            Value::Int(n) => Ok(n),
            other => Err(Fault::new(
                ErrorKind::ArgumentType {
                    function,
                    position,
                    expected: "an integer",
                    got: other.type_name(),
                },
                expr.span(),
            )),
        }
    }

    fn str_arg(
        &mut self,
        function: &'static str,
        position: &'static str,
        expr: &Expr,
    ) -> Result<String, Fault> {
        match self.eval_expr(expr)? {
            Value::Str(s) => Ok(s),
            other => Err(Fault::new(
                ErrorKind::ArgumentType {
                    function,
                    position,
                    expected: "a string",
                    got: other.type_name(),
                },
                expr.span(),
            )),
        }
    }

    // ─── Expression evaluation ────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, Fault> {
        match expr {
            Expr::Number(n, _) => Ok(Value::Int(*n)),
            Expr::Str(s, _) => Ok(Value::Str(s.clone())),

            Expr::Variable(name, span) => self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| {
                    Fault::new(ErrorKind::UndefinedVariable { name: name.clone() }, *span)
                }),

            Expr::Unary { operand, span } => match self.eval_expr(operand)? {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| Fault::new(ErrorKind::Overflow { op: "-" }, *span)),
                other => Err(Fault::new(
                    ErrorKind::NegateType { operand: other.type_name() },
                    *span,
                )),
            },

            Expr::Binary { left, op, right, span } => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                eval_binary(*op, l, r).map_err(|kind| Fault::new(kind, *span))
            }

            Expr::Call { name, args, span } => self.eval_call(name, args, *span),
        }
    }

    // ─── Built-in query functions ─────────────────────────────────────────────

    fn eval_call(&mut self, name: &str, args: &[Expr], span: Span) -> Result<Value, Fault> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        let at = |kind: ErrorKind| Fault::new(kind, span);

        match name.to_ascii_lowercase().as_str() {
            "getactualx" => {
                check_arity("GetActualX", &values, 0).map_err(at)?;
                self.require_spawned().map_err(at)?;
                Ok(Value::Int(self.actor.x()))
            }
            "getactualy" => {
                check_arity("GetActualY", &values, 0).map_err(at)?;
                self.require_spawned().map_err(at)?;
                Ok(Value::Int(self.actor.y()))
            }
            "getbrushsize" => {
                check_arity("GetBrushSize", &values, 0).map_err(at)?;
                Ok(Value::Int(self.actor.brush_size()))
            }
            // Canvases are square in the reference host; width is the size.
            "getcanvassize" => {
                check_arity("GetCanvasSize", &values, 0).map_err(at)?;
                Ok(Value::Int(self.canvas.width() as i64))
            }
            "getcolorcount" => {
                const F: &str = "GetColorCount";
                check_arity(F, &values, 5).map_err(at)?;
                let color = color_value(F, "first", &values[0]).map_err(at)?;
                let x1 = int_value(F, "second", &values[1]).map_err(at)?;
                let y1 = int_value(F, "third", &values[2]).map_err(at)?;
                let x2 = int_value(F, "fourth", &values[3]).map_err(at)?;
                let y2 = int_value(F, "fifth", &values[4]).map_err(at)?;
                Ok(Value::Int(self.canvas.count_color(color, x1, y1, x2, y2)))
            }
            "isbrushcolor" => {
                const F: &str = "IsBrushColor";
                check_arity(F, &values, 1).map_err(at)?;
                let color = color_value(F, "first", &values[0]).map_err(at)?;
                Ok(Value::Bool(self.actor.brush_color() == color))
            }
            "isbrushsize" => {
                const F: &str = "IsBrushSize";
                check_arity(F, &values, 1).map_err(at)?;
                let k = int_value(F, "first", &values[0]).map_err(at)?;
                Ok(Value::Bool(self.actor.brush_size() == k))
            }
            "iscanvascolor" => {
                const F: &str = "IsCanvasColor";
                check_arity(F, &values, 3).map_err(at)?;
                let color = color_value(F, "first", &values[0]).map_err(at)?;
                let dx = int_value(F, "second", &values[1]).map_err(at)?;
                let dy = int_value(F, "third", &values[2]).map_err(at)?;
                // An offset leaving the canvas, by any amount, is false —
                // not an error. Saturated coordinates stay outside.
                let px = self.actor.x().saturating_add(dx);
                let py = self.actor.y().saturating_add(dy);
                match self.canvas.get(px, py) {
                    Some(pixel) => Ok(Value::Bool(pixel == color)),
                    None => Ok(Value::Bool(false)),
                }
            }
            _ => Err(at(ErrorKind::UndefinedFunction { name: name.to_string() })),
        }
    }

    fn require_spawned(&self) -> Result<(), ErrorKind> {
        if self.spawned { Ok(()) } else { Err(ErrorKind::NotSpawned) }
    }
}

// ─── Builtin argument validation ─────────────────────────────────────────────

fn check_arity(function: &'static str, values: &[Value], expected: usize) -> Result<(), ErrorKind> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(ErrorKind::Arity { function, expected, got: values.len() })
    }
}

fn int_value(
    function: &'static str,
    position: &'static str,
    value: &Value,
) -> Result<i64, ErrorKind> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(ErrorKind::ArgumentType {
            function,
            position,
            expected: "an integer",
            got: other.type_name(),
        }),
    }
}

fn color_value(
    function: &'static str,
    position: &'static str,
    value: &Value,
) -> Result<Color, ErrorKind> {
    let name = match value {
        Value::Str(s) => s,
        other => {
            return Err(ErrorKind::ArgumentType {
                function,
                position,
                expected: "a color name string",
                got: other.type_name(),
            });
        }
    };
    Color::parse(name).ok_or_else(|| ErrorKind::UnknownColor { name: name.clone() })
}

// ─── Operators ───────────────────────────────────────────────────────────────

fn eval_binary(op: BinOp, l: Value, r: Value) -> Result<Value, ErrorKind> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Pow => {
            let (a, b) = int_operands(op, &l, &r)?;
            eval_arithmetic(op, a, b)
        }
        BinOp::Gt | BinOp::GtEq | BinOp::Lt | BinOp::LtEq => {
            let (a, b) = int_operands(op, &l, &r)?;
            Ok(Value::Bool(match op {
                BinOp::Gt => a > b,
                BinOp::GtEq => a >= b,
                BinOp::Lt => a < b,
                BinOp::LtEq => a <= b,
                _ => unreachable!(),
            }))
        }
        BinOp::Eq => values_equal(&l, &r).map(Value::Bool),
        BinOp::And | BinOp::Or => {
            // Both sides are already evaluated — no short-circuit, by the
            // documented language rule.
            let (a, b) = match (l.as_boolean_like(), r.as_boolean_like()) {
                (Some(a), Some(b)) => (a, b),
                _ => {
                    return Err(ErrorKind::LogicalOperandType {
                        op: op.symbol(),
                        lhs: l.type_name(),
                        rhs: r.type_name(),
                    });
                }
            };
            Ok(Value::Bool(if op == BinOp::And { a && b } else { a || b }))
        }
    }
}

fn int_operands(op: BinOp, l: &Value, r: &Value) -> Result<(i64, i64), ErrorKind> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok((*a, *b)),
        _ => Err(ErrorKind::OperandType {
            op: op.symbol(),
            lhs: l.type_name(),
            rhs: r.type_name(),
        }),
    }
}

fn eval_arithmetic(op: BinOp, a: i64, b: i64) -> Result<Value, ErrorKind> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(ErrorKind::DivisionByZero);
            }
            a.checked_div(b)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(ErrorKind::ModuloByZero);
            }
            a.checked_rem(b)
        }
        BinOp::Pow => {
            if b < 0 {
                return Err(ErrorKind::NegativeExponent);
            }
            u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp))
        }
        _ => unreachable!(),
    };
    result
        .map(Value::Int)
        .ok_or(ErrorKind::Overflow { op: op.symbol() })
}

/// `==`: identical types compare by value; mixed int/bool compares through
/// the nonzero-is-true rule; any other pairing is a type error.
fn values_equal(l: &Value, r: &Value) -> Result<bool, ErrorKind> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(n), Value::Bool(b)) | (Value::Bool(b), Value::Int(n)) => {
            Ok((*n != 0) == *b)
        }
        _ => Err(ErrorKind::EqualityType { lhs: l.type_name(), rhs: r.type_name() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_requires_integers() {
        let err = eval_binary(BinOp::Add, Value::Str("a".into()), Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::OperandType { op: "+", lhs: "string", rhs: "integer" }
        );
    }

    #[test]
    fn division_checks_the_divisor() {
        assert_eq!(
            eval_binary(BinOp::Div, Value::Int(0), Value::Int(5)).unwrap(),
            Value::Int(0)
        );
        assert_eq!(
            eval_binary(BinOp::Div, Value::Int(5), Value::Int(0)).unwrap_err(),
            ErrorKind::DivisionByZero
        );
    }

    #[test]
    fn power_is_exponentiation() {
        assert_eq!(
            eval_binary(BinOp::Pow, Value::Int(2), Value::Int(10)).unwrap(),
            Value::Int(1024)
        );
        assert_eq!(
            eval_binary(BinOp::Pow, Value::Int(2), Value::Int(-1)).unwrap_err(),
            ErrorKind::NegativeExponent
        );
    }

    #[test]
    fn overflow_is_an_error_not_a_panic() {
        assert_eq!(
            eval_binary(BinOp::Mul, Value::Int(i64::MAX), Value::Int(2)).unwrap_err(),
            ErrorKind::Overflow { op: "*" }
        );
        assert_eq!(
            eval_binary(BinOp::Div, Value::Int(i64::MIN), Value::Int(-1)).unwrap_err(),
            ErrorKind::Overflow { op: "/" }
        );
    }

    #[test]
    fn equality_coerces_int_and_bool() {
        assert_eq!(
            eval_binary(BinOp::Eq, Value::Int(1), Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_binary(BinOp::Eq, Value::Int(7), Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_binary(BinOp::Eq, Value::Int(0), Value::Bool(true)).unwrap(),
            Value::Bool(false)
        );
        assert!(eval_binary(BinOp::Eq, Value::Str("1".into()), Value::Int(1)).is_err());
    }

    #[test]
    fn logical_operands_must_be_boolean_like() {
        assert_eq!(
            eval_binary(BinOp::And, Value::Int(1), Value::Bool(true)).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            eval_binary(BinOp::Or, Value::Int(0), Value::Int(0)).unwrap(),
            Value::Bool(false)
        );
        assert!(eval_binary(BinOp::And, Value::Int(2), Value::Bool(true)).is_err());
    }
}
