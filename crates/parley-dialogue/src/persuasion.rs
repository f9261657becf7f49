//! Persuasion: admire, intimidate, taunt and bribe.
//!
//! The reputation model decides success and raw deltas; the engine owns the
//! running totals, keeps the displayed disposition inside 0..=100 and
//! records skill practice.

use std::fmt;

use parley_core::{Actor, Player, Skill};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{DialogueError, DialogueResult};

/// Persuasion actions available in the dialogue window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersuasionKind {
    /// Flatter the actor.
    Admire,
    /// Threaten the actor.
    Intimidate,
    /// Provoke the actor.
    Taunt,
    /// Offer 10 gold.
    BribeTen,
    /// Offer 100 gold.
    BribeHundred,
    /// Offer 1000 gold.
    BribeThousand,
}

impl PersuasionKind {
    /// The bribe for a gold amount, if it is one of the offered sums.
    pub fn bribe(amount: i64) -> Option<Self> {
        match amount {
            10 => Some(Self::BribeTen),
            100 => Some(Self::BribeHundred),
            1000 => Some(Self::BribeThousand),
            _ => None,
        }
    }

    /// Gold a bribe costs; `None` for the other actions.
    pub fn bribe_amount(self) -> Option<i64> {
        match self {
            Self::BribeTen => Some(10),
            Self::BribeHundred => Some(100),
            Self::BribeThousand => Some(1000),
            Self::Admire | Self::Intimidate | Self::Taunt => None,
        }
    }

    fn message_stem(self) -> &'static str {
        match self {
            Self::Admire => "sAdmire",
            Self::Taunt => "sTaunt",
            Self::Intimidate => "sIntimidate",
            Self::BribeTen | Self::BribeHundred | Self::BribeThousand => "sBribe",
        }
    }
}

impl fmt::Display for PersuasionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admire => write!(f, "admire"),
            Self::Intimidate => write!(f, "intimidate"),
            Self::Taunt => write!(f, "taunt"),
            Self::BribeTen => write!(f, "bribe 10"),
            Self::BribeHundred => write!(f, "bribe 100"),
            Self::BribeThousand => write!(f, "bribe 1000"),
        }
    }
}

/// Game-setting key of the status message for an attempt.
pub fn message_key(kind: PersuasionKind, success: bool) -> String {
    format!("{}{}", kind.message_stem(), if success { "Success" } else { "Fail" })
}

/// Everything a reputation model may consult.
#[derive(Debug, Clone, Copy)]
pub struct PersuasionRequest<'a> {
    /// The actor being persuaded.
    pub actor: &'a Actor,
    /// The persuading player.
    pub player: &'a Player,
    /// What the player attempts.
    pub kind: PersuasionKind,
    /// The actor's displayed disposition before the attempt.
    pub disposition: i32,
}

/// Raw result of a persuasion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersuasionChange {
    /// Whether the attempt worked.
    pub success: bool,
    /// Session-scoped disposition delta.
    pub temporary: i32,
    /// Delta committed to base disposition at goodbye.
    pub permanent: i32,
}

/// Decides how a persuasion attempt turns out.
pub trait ReputationModel {
    /// Roll one attempt.
    fn persuasion_change(&mut self, request: &PersuasionRequest<'_>) -> PersuasionChange;
}

/// Seeded reference model: speechcraft and disposition against a d100.
#[derive(Debug, Clone)]
pub struct RolledReputation {
    rng: StdRng,
}

impl RolledReputation {
    /// Create a model with a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReputationModel for RolledReputation {
    fn persuasion_change(&mut self, request: &PersuasionRequest<'_>) -> PersuasionChange {
        let skill = request.player.speechcraft.clamp(0, 100);
        let base = match request.kind {
            PersuasionKind::Admire => 35,
            PersuasionKind::Intimidate => 25,
            PersuasionKind::Taunt => 30,
            PersuasionKind::BribeTen => 40,
            PersuasionKind::BribeHundred => 60,
            PersuasionKind::BribeThousand => 85,
        };
        let target = (base + skill / 2 + (request.disposition - 50) / 5).clamp(5, 95);
        let roll: i32 = self.rng.random_range(0..100);
        let success = roll < target;
        let magnitude = 5 + skill / 10 + (target - roll).abs() / 10;

        let (temporary, permanent) = match (request.kind, success) {
            (PersuasionKind::Admire, true) => (magnitude, 1),
            (PersuasionKind::Admire, false) => (-1, 0),
            (PersuasionKind::Intimidate, true) => (magnitude, -1),
            (PersuasionKind::Intimidate, false) => (-(magnitude / 2), -1),
            (PersuasionKind::Taunt, true) => (-magnitude, 0),
            (PersuasionKind::Taunt, false) => (0, 0),
            (PersuasionKind::BribeTen, true) => (magnitude, 0),
            (PersuasionKind::BribeHundred, true) => (magnitude + 5, 1),
            (PersuasionKind::BribeThousand, true) => (magnitude + 10, 2),
            (_, false) => (0, 0),
        };

        PersuasionChange {
            success,
            temporary,
            permanent,
        }
    }
}

/// Disposition deltas accumulated during one conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispositionState {
    /// Session-scoped delta, discarded at goodbye.
    pub temporary: i32,
    /// Delta added to base disposition at goodbye.
    pub permanent: i32,
}

impl DispositionState {
    /// Reset both deltas.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Keep `current + temporary` within 0..=100.
pub fn clamp_temporary(current: i32, temporary: i32) -> i32 {
    let total = current.saturating_add(temporary);
    if total < 0 {
        current.saturating_neg()
    } else if total > 100 {
        100_i32.saturating_sub(current)
    } else {
        temporary
    }
}

/// Result of one persuasion attempt, after clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersuasionOutcome {
    /// What was attempted.
    pub kind: PersuasionKind,
    /// Whether it worked.
    pub success: bool,
    /// Status message key shown as a title.
    pub message_key: String,
    /// Running temporary delta after the attempt.
    pub temporary: i32,
    /// Running permanent delta after the attempt.
    pub permanent: i32,
}

/// Applies reputation-model results to a conversation's disposition state.
pub struct PersuasionEngine {
    model: Box<dyn ReputationModel>,
}

impl PersuasionEngine {
    /// Create an engine around `model`.
    pub fn new(model: Box<dyn ReputationModel>) -> Self {
        Self { model }
    }

    /// Attempt a persuasion of `actor`.
    ///
    /// Bribes are paid up front and fail with
    /// [`DialogueError::InsufficientGold`] if the player cannot afford them.
    pub fn persuade(
        &mut self,
        actor: &Actor,
        player: &mut Player,
        kind: PersuasionKind,
        state: &mut DispositionState,
    ) -> DialogueResult<PersuasionOutcome> {
        if let Some(amount) = kind.bribe_amount() {
            if player.gold < amount {
                return Err(DialogueError::InsufficientGold {
                    needed: amount,
                    available: player.gold,
                });
            }
            player.gold -= amount;
        }

        let current = actor.base_disposition;
        let change = self.model.persuasion_change(&PersuasionRequest {
            actor,
            player,
            kind,
            disposition: current.saturating_add(state.temporary).clamp(0, 100),
        });

        state.temporary = clamp_temporary(current, state.temporary.saturating_add(change.temporary));
        state.permanent = state.permanent.saturating_add(change.permanent);

        if change.success {
            player.practice(Skill::Speechcraft);
        }

        Ok(PersuasionOutcome {
            kind,
            success: change.success,
            message_key: message_key(kind, change.success),
            temporary: state.temporary,
            permanent: state.permanent,
        })
    }
}

impl Default for PersuasionEngine {
    fn default() -> Self {
        Self::new(Box::new(RolledReputation::new(42)))
    }
}

impl fmt::Debug for PersuasionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersuasionEngine").finish_non_exhaustive()
    }
}
