//! Stack interpreter for compiled effect scripts.

use parley_core::Value;
use thiserror::Error;

use crate::ast::BinOp;
use crate::compiler::{Op, Program};

/// Faults raised while running a compiled program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// An instruction needed more operands than the stack held.
    #[error("stack underflow at instruction {0}")]
    StackUnderflow(usize),

    /// The execution context has no local at this slot.
    #[error("unknown local slot {0}")]
    UnknownLocal(usize),

    /// The execution context has no global of this name.
    #[error("unknown global: {0}")]
    UnknownGlobal(String),

    /// The program ran longer than its step budget.
    #[error("step budget of {0} instructions exhausted")]
    StepLimit(usize),
}

/// Everything a running script can read or change.
///
/// Implementors decide how effects are applied; the interpreter only calls
/// these hooks in program order.
pub trait ExecutionContext {
    /// Read a local by slot.
    fn local(&self, slot: usize) -> Option<Value>;
    /// Write a local by slot. Returns false for an unknown slot.
    fn set_local(&mut self, slot: usize, value: Value) -> bool;
    /// Read a global by lower-cased name.
    fn global(&self, name: &str) -> Option<Value>;
    /// Write a global by lower-cased name. Returns false for an unknown global.
    fn set_global(&mut self, name: &str, value: Value) -> bool;
    /// Make a topic known to the player.
    fn add_topic(&mut self, topic: &str);
    /// Offer one answer of a forced question.
    fn choice(&mut self, text: &str, code: i32);
    /// End the conversation.
    fn goodbye(&mut self);
    /// Change the temporary disposition.
    fn mod_disposition(&mut self, delta: i32);
    /// Set a quest's journal index.
    fn set_journal_index(&mut self, id: &str, index: i64);
}

fn pop(stack: &mut Vec<Value>, pc: usize) -> Result<Value, RuntimeError> {
    stack.pop().ok_or(RuntimeError::StackUnderflow(pc))
}

fn flag(b: bool) -> Value {
    Value::Integer(i64::from(b))
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    if let (Value::Integer(a), Value::Integer(b)) = (lhs, rhs) {
        return Ok(match op {
            BinOp::Add => Value::Integer(a.wrapping_add(b)),
            BinOp::Sub => Value::Integer(a.wrapping_sub(b)),
            BinOp::Mul => Value::Integer(a.wrapping_mul(b)),
            BinOp::Div => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Value::Integer(a.wrapping_div(b))
            }
            BinOp::Eq => flag(a == b),
            BinOp::Ne => flag(a != b),
            BinOp::Lt => flag(a < b),
            BinOp::Le => flag(a <= b),
            BinOp::Gt => flag(a > b),
            BinOp::Ge => flag(a >= b),
        });
    }

    let (a, b) = (lhs.as_f64(), rhs.as_f64());
    Ok(match op {
        BinOp::Add => Value::Float(a + b),
        BinOp::Sub => Value::Float(a - b),
        BinOp::Mul => Value::Float(a * b),
        BinOp::Div => {
            if b == 0.0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Float(a / b)
        }
        BinOp::Eq => flag(a == b),
        BinOp::Ne => flag(a != b),
        BinOp::Lt => flag(a < b),
        BinOp::Le => flag(a <= b),
        BinOp::Gt => flag(a > b),
        BinOp::Ge => flag(a >= b),
    })
}

/// Run `program` against `ctx`, executing at most `step_limit` instructions.
///
/// Effects reach `ctx` as they execute; on error the caller decides whether
/// to keep or discard them.
pub fn run(
    program: &Program,
    ctx: &mut dyn ExecutionContext,
    step_limit: usize,
) -> Result<(), RuntimeError> {
    let ops = program.ops();
    let mut stack: Vec<Value> = Vec::new();
    let mut pc = 0;
    let mut steps = 0;

    while pc < ops.len() {
        steps += 1;
        if steps > step_limit {
            return Err(RuntimeError::StepLimit(step_limit));
        }

        let mut next = pc + 1;
        match &ops[pc] {
            Op::Push(v) => stack.push(*v),
            Op::LoadLocal(slot) => {
                let v = ctx.local(*slot).ok_or(RuntimeError::UnknownLocal(*slot))?;
                stack.push(v);
            }
            Op::StoreLocal(slot) => {
                let v = pop(&mut stack, pc)?;
                if !ctx.set_local(*slot, v) {
                    return Err(RuntimeError::UnknownLocal(*slot));
                }
            }
            Op::LoadGlobal(name) => {
                let v = ctx
                    .global(name)
                    .ok_or_else(|| RuntimeError::UnknownGlobal(name.clone()))?;
                stack.push(v);
            }
            Op::StoreGlobal(name) => {
                let v = pop(&mut stack, pc)?;
                if !ctx.set_global(name, v) {
                    return Err(RuntimeError::UnknownGlobal(name.clone()));
                }
            }
            Op::Neg => {
                let v = match pop(&mut stack, pc)? {
                    Value::Integer(n) => Value::Integer(n.wrapping_neg()),
                    Value::Float(x) => Value::Float(-x),
                };
                stack.push(v);
            }
            Op::Binary(op) => {
                let rhs = pop(&mut stack, pc)?;
                let lhs = pop(&mut stack, pc)?;
                stack.push(apply(*op, lhs, rhs)?);
            }
            Op::Jump(target) => next = *target,
            Op::JumpUnless(target) => {
                if !pop(&mut stack, pc)?.is_truthy() {
                    next = *target;
                }
            }
            Op::AddTopic(topic) => ctx.add_topic(topic),
            Op::Choice(pairs) => {
                for (text, code) in pairs {
                    ctx.choice(text, *code);
                }
            }
            Op::Goodbye => ctx.goodbye(),
            Op::ModDisposition => {
                let delta = pop(&mut stack, pc)?.as_i64();
                let delta = delta.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
                ctx.mod_disposition(delta);
            }
            Op::Journal(id, index) => ctx.set_journal_index(id, *index),
        }
        pc = next;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Recorder {
        locals: Vec<Value>,
        globals: BTreeMap<String, Value>,
        effects: Vec<String>,
    }

    impl ExecutionContext for Recorder {
        fn local(&self, slot: usize) -> Option<Value> {
            self.locals.get(slot).copied()
        }
        fn set_local(&mut self, slot: usize, value: Value) -> bool {
            match self.locals.get_mut(slot) {
                Some(v) => {
                    *v = value;
                    true
                }
                None => false,
            }
        }
        fn global(&self, name: &str) -> Option<Value> {
            self.globals.get(name).copied()
        }
        fn set_global(&mut self, name: &str, value: Value) -> bool {
            match self.globals.get_mut(name) {
                Some(v) => {
                    *v = value;
                    true
                }
                None => false,
            }
        }
        fn add_topic(&mut self, topic: &str) {
            self.effects.push(format!("addtopic {topic}"));
        }
        fn choice(&mut self, text: &str, code: i32) {
            self.effects.push(format!("choice {text} {code}"));
        }
        fn goodbye(&mut self) {
            self.effects.push("goodbye".to_string());
        }
        fn mod_disposition(&mut self, delta: i32) {
            self.effects.push(format!("moddisposition {delta}"));
        }
        fn set_journal_index(&mut self, id: &str, index: i64) {
            self.effects.push(format!("journal {id} {index}"));
        }
    }

    fn run_source(source: &str, ctx: &mut Recorder) -> Result<(), RuntimeError> {
        let locals = parley_core::Locals::new()
            .with("a", parley_core::VarKind::Long)
            .with("f", parley_core::VarKind::Float);
        let mut game = parley_core::GameState::new();
        for name in ctx.globals.keys() {
            game.set_global(name, Value::Integer(0));
        }
        let scope = crate::compiler::CompileScope::new()
            .with_locals(&locals)
            .with_globals(&game);
        let program = crate::compile_source(source, &scope).unwrap();
        run(&program, ctx, 1000)
    }

    #[test]
    fn arithmetic_and_store() {
        let mut ctx = Recorder {
            locals: vec![Value::Integer(0), Value::Float(0.0)],
            ..Default::default()
        };
        run_source("set a to (2 + 3) * 4 - 6 / 2\nset f to 1 / 4.0", &mut ctx).unwrap();
        assert_eq!(ctx.locals[0], Value::Integer(17));
        assert_eq!(ctx.locals[1], Value::Float(0.25));
    }

    #[test]
    fn comparisons_yield_one_or_zero() {
        let mut ctx = Recorder {
            locals: vec![Value::Integer(0), Value::Float(0.0)],
            ..Default::default()
        };
        run_source("set a to 3 >= 2.5", &mut ctx).unwrap();
        assert_eq!(ctx.locals[0], Value::Integer(1));
        run_source("set a to 3 != 3", &mut ctx).unwrap();
        assert_eq!(ctx.locals[0], Value::Integer(0));
    }

    #[test]
    fn effects_in_program_order() {
        let mut ctx = Recorder {
            locals: vec![Value::Integer(2), Value::Float(0.0)],
            ..Default::default()
        };
        let source = "\
if a == 1
    goodbye
elseif a == 2
    addtopic \"Latest Rumors\"
    choice \"Yes\" 1 \"No\" 2
else
    journal \"q\" 5
endif
moddisposition -a * 5
";
        run_source(source, &mut ctx).unwrap();
        assert_eq!(
            ctx.effects,
            vec![
                "addtopic Latest Rumors",
                "choice Yes 1",
                "choice No 2",
                "moddisposition -10",
            ]
        );
    }

    #[test]
    fn globals_are_read_and_written() {
        let mut ctx = Recorder {
            locals: vec![Value::Integer(0), Value::Float(0.0)],
            ..Default::default()
        };
        ctx.globals.insert("rent".to_string(), Value::Integer(0));
        run_source("set Rent to Rent + 10", &mut ctx).unwrap();
        assert_eq!(ctx.globals["rent"], Value::Integer(10));
    }

    #[test]
    fn division_by_zero_faults() {
        let mut ctx = Recorder {
            locals: vec![Value::Integer(0), Value::Float(0.0)],
            ..Default::default()
        };
        assert_eq!(
            run_source("addtopic \"x\"\nset a to 1 / a", &mut ctx),
            Err(RuntimeError::DivisionByZero)
        );
        assert_eq!(ctx.effects, vec!["addtopic x"]);
    }

    #[test]
    fn missing_local_faults() {
        let mut ctx = Recorder::default();
        assert_eq!(
            run_source("set a to 1", &mut ctx),
            Err(RuntimeError::UnknownLocal(0))
        );
    }

    #[test]
    fn underflow_is_reported() {
        let p = Program::from(vec![Op::Binary(BinOp::Add)]);
        let mut ctx = Recorder::default();
        assert_eq!(run(&p, &mut ctx, 10), Err(RuntimeError::StackUnderflow(0)));
    }

    #[test]
    fn step_budget_stops_loops() {
        let p = Program::from(vec![Op::Jump(0)]);
        let mut ctx = Recorder::default();
        assert_eq!(run(&p, &mut ctx, 50), Err(RuntimeError::StepLimit(50)));
    }
}
