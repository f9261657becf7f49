//! Lowers a parsed [`Script`] into flat bytecode.
//!
//! Variable names are resolved at compile time: first against the speaker's
//! locals (to a slot index), then against the known globals. A name that is
//! neither is a compile error, so a script that compiles never references an
//! undeclared variable.

use parley_core::{GameState, Locals, Value};

use crate::ast::{BinOp, Expr, Script, Spanned, Stmt};
use crate::diagnostics::Diagnostic;

/// Names a script may refer to.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileScope<'a> {
    locals: Option<&'a Locals>,
    globals: Option<&'a GameState>,
}

impl<'a> CompileScope<'a> {
    /// A scope with no variables at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve local names against the speaker's locals.
    pub fn with_locals(mut self, locals: &'a Locals) -> Self {
        self.locals = Some(locals);
        self
    }

    /// Resolve global names against this game state.
    pub fn with_globals(mut self, globals: &'a GameState) -> Self {
        self.globals = Some(globals);
        self
    }

    fn resolve(&self, name: &str) -> Option<Target> {
        if let Some(slot) = self.locals.and_then(|l| l.index_of(name)) {
            return Some(Target::Local(slot));
        }
        match self.globals {
            Some(game) if game.has_global(name) => Some(Target::Global(name.to_lowercase())),
            _ => None,
        }
    }
}

enum Target {
    Local(usize),
    Global(String),
}

/// A single bytecode instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Push a constant.
    Push(Value),
    /// Push a local by slot.
    LoadLocal(usize),
    /// Pop into a local slot.
    StoreLocal(usize),
    /// Push a global by lower-cased name.
    LoadGlobal(String),
    /// Pop into a global.
    StoreGlobal(String),
    /// Negate the top of the stack.
    Neg,
    /// Pop two operands, push the result.
    Binary(BinOp),
    /// Jump to an absolute instruction index.
    Jump(usize),
    /// Pop; jump when the value is zero.
    JumpUnless(usize),
    /// Make a topic known to the player.
    AddTopic(String),
    /// Offer answers to a forced question.
    Choice(Vec<(String, i32)>),
    /// End the conversation.
    Goodbye,
    /// Pop; change the temporary disposition by that amount.
    ModDisposition,
    /// Set a quest's journal index.
    Journal(String, i64),
}

/// Compiled bytecode for one effect script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    ops: Vec<Op>,
}

impl Program {
    /// The instruction stream.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the program does nothing.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl From<Vec<Op>> for Program {
    fn from(ops: Vec<Op>) -> Self {
        Self { ops }
    }
}

struct Compiler<'s> {
    scope: &'s CompileScope<'s>,
    ops: Vec<Op>,
    diagnostics: Vec<Diagnostic>,
}

impl Compiler<'_> {
    fn emit(&mut self, op: Op) -> usize {
        self.ops.push(op);
        self.ops.len() - 1
    }

    fn patch(&mut self, at: usize) {
        let target = self.ops.len();
        if let Op::Jump(t) | Op::JumpUnless(t) = &mut self.ops[at] {
            *t = target;
        }
    }

    fn undeclared(&mut self, name: &Spanned<String>) {
        self.diagnostics.push(
            Diagnostic::error(name.span.clone(), format!("undeclared variable: \"{}\"", name.node))
                .with_label("not a local of the speaker or a known global"),
        );
    }

    fn block(&mut self, statements: &[Spanned<Stmt>]) {
        for stmt in statements {
            self.statement(&stmt.node);
        }
    }

    fn statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Set { name, value } => {
                self.expr(value);
                match self.scope.resolve(&name.node) {
                    Some(Target::Local(slot)) => {
                        self.emit(Op::StoreLocal(slot));
                    }
                    Some(Target::Global(global)) => {
                        self.emit(Op::StoreGlobal(global));
                    }
                    None => self.undeclared(name),
                }
            }
            Stmt::AddTopic(topic) => {
                self.emit(Op::AddTopic(topic.clone()));
            }
            Stmt::Choice(pairs) => {
                self.emit(Op::Choice(pairs.clone()));
            }
            Stmt::Goodbye => {
                self.emit(Op::Goodbye);
            }
            Stmt::ModDisposition(amount) => {
                self.expr(amount);
                self.emit(Op::ModDisposition);
            }
            Stmt::Journal { id, index } => {
                self.emit(Op::Journal(id.clone(), *index));
            }
            Stmt::If {
                branches,
                otherwise,
            } => {
                let mut exits = Vec::with_capacity(branches.len());
                for (cond, body) in branches {
                    self.expr(cond);
                    let skip = self.emit(Op::JumpUnless(0));
                    self.block(body);
                    exits.push(self.emit(Op::Jump(0)));
                    self.patch(skip);
                }
                self.block(otherwise);
                for exit in exits {
                    self.patch(exit);
                }
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Integer(n) => {
                self.emit(Op::Push(Value::Integer(*n)));
            }
            Expr::Float(x) => {
                self.emit(Op::Push(Value::Float(*x)));
            }
            Expr::Var(name) => match self.scope.resolve(&name.node) {
                Some(Target::Local(slot)) => {
                    self.emit(Op::LoadLocal(slot));
                }
                Some(Target::Global(global)) => {
                    self.emit(Op::LoadGlobal(global));
                }
                None => self.undeclared(name),
            },
            Expr::Neg(inner) => {
                self.expr(inner);
                self.emit(Op::Neg);
            }
            Expr::Binary { op, lhs, rhs } => {
                self.expr(lhs);
                self.expr(rhs);
                self.emit(Op::Binary(*op));
            }
        }
    }
}

/// Compile a parsed script against `scope`.
///
/// Fails closed: any diagnostic means no program is produced.
pub fn compile(script: &Script, scope: &CompileScope<'_>) -> Result<Program, Vec<Diagnostic>> {
    let mut compiler = Compiler {
        scope,
        ops: Vec::new(),
        diagnostics: Vec::new(),
    };
    compiler.block(&script.statements);

    if compiler.diagnostics.is_empty() {
        Ok(Program { ops: compiler.ops })
    } else {
        Err(compiler.diagnostics)
    }
}
