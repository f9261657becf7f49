//! Core types for parley: dialogue records, actors, and the world they live in.
//!
//! This crate defines the data the conversation engine reads and writes. It
//! is independent of the script language and of the session state machine;
//! you can construct a [`DialogueStore`] and a [`World`] programmatically or
//! load both from a JSON [`Database`].

/// Actors, their raw service flags and identifiers.
pub mod actor;
/// Response conditions evaluated by a matcher.
pub mod condition;
/// JSON database loading.
pub mod database;
/// Dialogue groups and response infos.
pub mod dialogue;
/// Error types used throughout the crate.
pub mod error;
/// The player record.
pub mod player;
/// Ordered, case-insensitive store of dialogue groups.
pub mod store;
/// Case-insensitive topic identifiers.
pub mod topic;
/// Script values and actor-local variable storage.
pub mod value;
/// Actors, globals and journal state.
pub mod world;

pub use actor::{Actor, ActorId, ActorKind, ServiceFlags};
pub use condition::{Comparison, Condition};
pub use database::Database;
pub use dialogue::{DialogueGroup, DialogueKind, ResponseInfo};
pub use error::{CoreError, CoreResult};
pub use player::{Player, Skill};
pub use store::DialogueStore;
pub use topic::TopicId;
pub use value::{LocalVar, Locals, Value, VarKind};
pub use world::{GameState, World};
