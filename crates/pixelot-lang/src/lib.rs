//! Pixelot: a small pixel-drawing language and its interpreter.
//!
//! A script spawns a drawing actor on a bounded color canvas, then drives it
//! with drawing commands, variables, label jumps and built-in query
//! functions. The pipeline is the classic three stages — lexer, parser,
//! tree-walking interpreter — with diagnostics instead of panics at every
//! stage.
//!
//! ```
//! use pixelot_lang::{Color, Session};
//!
//! let mut session = Session::new(32, 32).unwrap();
//! let diagnostics = session.run(
//!     "Spawn(4, 4)\n\
//!      Color(\"Red\")\n\
//!      DrawLine(1, 0, 8)\n",
//! );
//! assert!(diagnostics.is_empty());
//! assert_eq!(session.canvas().get(10, 4), Some(Color::Red));
//! ```

pub mod error;
pub mod runtime;
pub mod syntax;
pub mod types;

pub use error::{Category, Diagnostic, ErrorKind};
pub use runtime::interpreter::Interpreter;
pub use runtime::value::Value;
pub use syntax::ast::{BinOp, Expr, Program, Span, Stmt};
pub use types::actor::Actor;
pub use types::canvas::Canvas;
pub use types::color::Color;

use syntax::lexer::Lexer;
use syntax::parser::Parser;

/// Lexes and parses a script. Lexical and Syntax diagnostics accumulate
/// across both stages; any at all means no program is produced.
pub fn compile(source: &str) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, mut diagnostics) = Lexer::new(source).tokenize();
    let (program, parse_diagnostics) = Parser::new(tokens).parse();
    diagnostics.extend(parse_diagnostics);
    if diagnostics.is_empty() {
        Ok(program)
    } else {
        Err(diagnostics)
    }
}

/// Everything a one-shot run leaves behind.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub canvas: Canvas,
    pub actor: Actor,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutcome {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Compiles and runs a script on a fresh canvas. The convenience entry
/// point; hosts that re-run scripts or want repaint callbacks use [`Session`].
pub fn run(source: &str, width: usize, height: usize) -> RunOutcome {
    match Session::new(width, height) {
        Ok(mut session) => {
            let diagnostics = session.run(source);
            RunOutcome { canvas: session.canvas, actor: session.actor, diagnostics }
        }
        Err(diagnostic) => RunOutcome {
            canvas: Canvas::new(0, 0),
            actor: Actor::new(),
            diagnostics: vec![diagnostic],
        },
    }
}

/// A reusable host-side execution context. Every `run` starts from a fresh
/// white canvas and a fresh unspawned actor of the same dimensions, so
/// re-running a script is deterministic.
pub struct Session {
    canvas: Canvas,
    actor: Actor,
    step_limit: Option<u64>,
}

impl Session {
    pub fn new(width: usize, height: usize) -> Result<Self, Diagnostic> {
        if width == 0 || height == 0 {
            return Err(ErrorKind::BadCanvasSize { width, height }.at(0, 0));
        }
        Ok(Self { canvas: Canvas::new(width, height), actor: Actor::new(), step_limit: None })
    }

    /// Bound every run to at most `limit` executed statements. Scripts with
    /// unbounded `GoTo` loops then halt with a Runtime diagnostic instead of
    /// hanging the host.
    pub fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Compiles and executes `source`. Returns every diagnostic produced;
    /// empty means the run completed. Compile errors leave the canvas as it
    /// was; a runtime error leaves whatever was drawn before it struck.
    pub fn run(&mut self, source: &str) -> Vec<Diagnostic> {
        self.execute(source, None)
    }

    /// Like [`Session::run`], but invokes `hook` after every statement that
    /// changed at least one pixel.
    pub fn run_with_hook(
        &mut self,
        source: &str,
        hook: &mut dyn FnMut(&Canvas),
    ) -> Vec<Diagnostic> {
        self.execute(source, Some(hook))
    }

    fn execute(
        &mut self,
        source: &str,
        hook: Option<&mut dyn FnMut(&Canvas)>,
    ) -> Vec<Diagnostic> {
        let program = match compile(source) {
            Ok(program) => program,
            Err(diagnostics) => return diagnostics,
        };

        self.canvas = Canvas::new(self.canvas.width(), self.canvas.height());
        self.actor = Actor::new();

        let mut interpreter = Interpreter::new(&program, &mut self.canvas, &mut self.actor);
        if let Some(limit) = self.step_limit {
            interpreter = interpreter.with_step_limit(limit);
        }
        if let Some(hook) = hook {
            interpreter = interpreter.with_repaint_hook(hook);
        }
        match interpreter.run() {
            Ok(()) => Vec::new(),
            Err(diagnostic) => vec![diagnostic],
        }
    }
}
