//! Configuration for a dialogue manager.

/// Configuration for a dialogue manager.
#[derive(Debug, Clone)]
pub struct DialogueConfig {
    /// Log the full source of effect scripts that fail to compile.
    pub script_verbose: bool,
    /// RNG seed for the reference reputation model.
    pub persuasion_seed: u64,
    /// Instruction budget for a single effect-script run.
    pub max_script_steps: usize,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            script_verbose: false,
            persuasion_seed: 42,
            max_script_steps: 10_000,
        }
    }
}

impl DialogueConfig {
    /// Enable or disable verbose script failure logging.
    pub fn with_script_verbose(mut self, verbose: bool) -> Self {
        self.script_verbose = verbose;
        self
    }

    /// Set the persuasion RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.persuasion_seed = seed;
        self
    }

    /// Set the script step budget (at least 1).
    pub fn with_max_script_steps(mut self, steps: usize) -> Self {
        self.max_script_steps = steps.max(1);
        self
    }
}
