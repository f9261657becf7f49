//! Bridge between response effect scripts and the conversation.
//!
//! Scripts run against a scratch copy of the speaker's locals and the game
//! state; the copy is committed only when the run completes. Effects that
//! touch the session itself come back as [`ScriptCommand`]s for the session
//! to apply afterwards. Nothing here returns an error: failures are logged
//! and reported as a [`ScriptOutcome`].

use parley_core::{Actor, ActorId, GameState, Locals, Value, World};
use parley_script::{CompileScope, ExecutionContext, Program, render_diagnostics};
use tracing::{debug, warn};

use crate::config::DialogueConfig;

/// How an effect-script run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptOutcome {
    /// The response has no script.
    Skipped,
    /// The script did not compile; nothing ran.
    CompileFailed,
    /// The script faulted; its effects were discarded.
    Faulted,
    /// The script ran to completion and its effects were committed.
    Completed,
}

/// A session-level effect requested by a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    /// Make a topic known to the player.
    AddTopic(String),
    /// Pose a forced question answer.
    Choice {
        /// Answer text.
        text: String,
        /// Choice code the answer selects.
        code: i32,
    },
    /// The actor ends the conversation.
    Goodbye,
    /// Change the temporary disposition.
    ModDisposition(i32),
}

/// Result of one script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    /// How the run ended.
    pub outcome: ScriptOutcome,
    /// Session effects to apply, empty unless the run completed.
    pub commands: Vec<ScriptCommand>,
}

impl ScriptRun {
    fn empty(outcome: ScriptOutcome) -> Self {
        Self {
            outcome,
            commands: Vec::new(),
        }
    }
}

struct Scratch {
    locals: Option<Locals>,
    game: GameState,
    commands: Vec<ScriptCommand>,
}

impl ExecutionContext for Scratch {
    fn local(&self, slot: usize) -> Option<Value> {
        self.locals.as_ref().and_then(|l| l.get(slot))
    }

    fn set_local(&mut self, slot: usize, value: Value) -> bool {
        self.locals.as_mut().is_some_and(|l| l.set(slot, value))
    }

    fn global(&self, name: &str) -> Option<Value> {
        self.game.global(name)
    }

    fn set_global(&mut self, name: &str, value: Value) -> bool {
        if !self.game.has_global(name) {
            return false;
        }
        self.game.set_global(name, value);
        true
    }

    fn add_topic(&mut self, topic: &str) {
        self.commands.push(ScriptCommand::AddTopic(topic.to_string()));
    }

    fn choice(&mut self, text: &str, code: i32) {
        self.commands.push(ScriptCommand::Choice {
            text: text.to_string(),
            code,
        });
    }

    fn goodbye(&mut self) {
        self.commands.push(ScriptCommand::Goodbye);
    }

    fn mod_disposition(&mut self, delta: i32) {
        self.commands.push(ScriptCommand::ModDisposition(delta));
    }

    fn set_journal_index(&mut self, id: &str, index: i64) {
        self.game.set_journal_index(id, index);
    }
}

/// Compiles and runs response effect scripts on behalf of the session.
#[derive(Debug, Clone)]
pub struct ScriptBridge {
    verbose: bool,
    step_limit: usize,
}

impl ScriptBridge {
    /// Create a bridge from the manager configuration.
    pub fn new(config: &DialogueConfig) -> Self {
        Self {
            verbose: config.script_verbose,
            step_limit: config.max_script_steps,
        }
    }

    /// Compile `source` against the actor's locals and the known globals.
    ///
    /// Returns `None` on any diagnostic.
    pub fn compile(&self, source: &str, actor: &Actor, game: &GameState, label: &str) -> Option<Program> {
        let mut scope = CompileScope::new().with_globals(game);
        if let Some(locals) = actor.locals.as_ref() {
            scope = scope.with_locals(locals);
        }

        match parley_script::compile_source(source, &scope) {
            Ok(program) => Some(program),
            Err(diagnostics) => {
                for diag in &diagnostics {
                    warn!(script = label, actor = %actor.name, "{diag}");
                }
                if self.verbose {
                    warn!(
                        script = label,
                        "compiling failed (dialogue script)\n{source}\n{}",
                        render_diagnostics(source, label, &diagnostics)
                    );
                }
                None
            }
        }
    }

    /// Run a compiled program for `actor`, committing its effects on success.
    pub fn execute(&self, program: &Program, actor: &mut Actor, game: &mut GameState, label: &str) -> ScriptRun {
        let mut scratch = Scratch {
            locals: actor.locals.clone(),
            game: game.clone(),
            commands: Vec::new(),
        };

        match parley_script::run(program, &mut scratch, self.step_limit) {
            Ok(()) => {
                actor.locals = scratch.locals;
                *game = scratch.game;
                debug!(script = label, commands = scratch.commands.len(), "script completed");
                ScriptRun {
                    outcome: ScriptOutcome::Completed,
                    commands: scratch.commands,
                }
            }
            Err(e) => {
                warn!(script = label, actor = %actor.name, "dialogue script fault: {e}");
                ScriptRun::empty(ScriptOutcome::Faulted)
            }
        }
    }

    /// Compile and execute a response script for the actor `actor_id`.
    ///
    /// Blank scripts are skipped without compiling.
    pub fn run(&self, source: Option<&str>, actor_id: ActorId, world: &mut World, label: &str) -> ScriptRun {
        let Some(source) = source.filter(|s| !s.trim().is_empty()) else {
            return ScriptRun::empty(ScriptOutcome::Skipped);
        };

        let program = {
            let Some(actor) = world.actor(actor_id) else {
                warn!(script = label, actor = %actor_id, "script speaker missing");
                return ScriptRun::empty(ScriptOutcome::Skipped);
            };
            match self.compile(source, actor, &world.game, label) {
                Some(program) => program,
                None => return ScriptRun::empty(ScriptOutcome::CompileFailed),
            }
        };

        let mut game = std::mem::take(&mut world.game);
        let run = match world.actor_mut(actor_id) {
            Some(actor) => self.execute(&program, actor, &mut game, label),
            None => ScriptRun::empty(ScriptOutcome::Skipped),
        };
        world.game = game;
        run
    }
}

impl Default for ScriptBridge {
    fn default() -> Self {
        Self::new(&DialogueConfig::default())
    }
}
