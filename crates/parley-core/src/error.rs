use std::path::PathBuf;

use crate::actor::ActorId;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or loading dialogue data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Two dialogue groups share the same (case-insensitive) id.
    #[error("dialogue already exists: \"{0}\"")]
    DuplicateDialogue(String),

    /// Two actors share the same (case-insensitive) name.
    #[error("actor already exists: \"{0}\"")]
    DuplicateActor(String),

    /// The requested actor does not exist in the world.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// The database file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The database document is not valid JSON for the expected schema.
    #[error("invalid database: {0}")]
    Json(#[from] serde_json::Error),
}
