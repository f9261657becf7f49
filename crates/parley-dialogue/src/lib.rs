//! The conversation session engine.
//!
//! A [`DialogueManager`] runs one conversation at a time between the player
//! and an actor. It resolves topics and greetings through a
//! [`ResponseMatcher`], keeps the player's topic knowledge in a
//! [`TopicKnowledgeStore`], runs response effect scripts through the
//! [`ScriptBridge`], handles persuasion, and pushes everything it wants to
//! show to a [`DialogueView`].
//!
//! ```
//! use parley_core::{Actor, ActorKind, DialogueGroup, DialogueKind, DialogueStore, Player, ResponseInfo, World};
//! use parley_dialogue::{DialogueConfig, DialogueManager, RecordingView};
//!
//! let store = DialogueStore::from_groups([DialogueGroup::new("Greeting 0", DialogueKind::Greeting)
//!     .with_info(ResponseInfo::new("g1", "What is it, outlander?"))])
//! .unwrap();
//! let mut world = World::new(Player::default());
//! let fargoth = world.add_actor(Actor::new("Fargoth", ActorKind::Npc)).unwrap();
//!
//! let mut manager = DialogueManager::new(store, RecordingView::new(), &DialogueConfig::default());
//! manager.start_dialogue(&mut world, fargoth).unwrap();
//! assert_eq!(manager.view().texts(), vec!["What is it, outlander?"]);
//! ```

/// Session configuration.
pub mod config;
/// Error types.
pub mod error;
/// Response selection.
pub mod filter;
/// Persuasion attempts and disposition bookkeeping.
pub mod persuasion;
/// Effect-script execution on behalf of a conversation.
pub mod script;
/// Services offered in the dialogue window.
pub mod services;
/// The conversation state machine.
pub mod session;
/// Known topics and the current actor's topic list.
pub mod topics;
/// Presentation interface.
pub mod view;

pub use config::DialogueConfig;
pub use error::{DialogueError, DialogueResult};
pub use filter::{ConditionFilter, FilterContext, ResponseMatcher};
pub use persuasion::{
    DispositionState, PersuasionChange, PersuasionEngine, PersuasionKind, PersuasionOutcome, PersuasionRequest,
    ReputationModel, RolledReputation,
};
pub use script::{ScriptBridge, ScriptCommand, ScriptOutcome, ScriptRun};
pub use services::ServiceSet;
pub use session::{DialogueManager, LastResponse, SessionState};
pub use topics::{KnownTopics, TopicKnowledgeStore};
pub use view::{DialogueView, RecordingView, ViewEvent};
