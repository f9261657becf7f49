//! Error types for the conversation engine.

use parley_core::{ActorId, CoreError};
use thiserror::Error;

/// Result type for dialogue operations.
pub type DialogueResult<T> = Result<T, DialogueError>;

/// Errors a caller of the session can observe.
///
/// Script failures and unmatched topics are not errors: they are logged and
/// the conversation carries on.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// A session operation was called while no conversation is active.
    #[error("no active conversation")]
    NoActiveConversation,

    /// The actor to talk to does not exist in the world.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// The player cannot pay for a bribe.
    #[error("not enough gold: need {needed}, have {available}")]
    InsufficientGold {
        /// Bribe amount.
        needed: i64,
        /// Gold carried.
        available: i64,
    },

    /// Data-model error.
    #[error("{0}")]
    Core(#[from] CoreError),
}
