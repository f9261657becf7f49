//! JSON dialogue databases.
//!
//! A database bundles everything a conversation needs: dialogue groups in
//! load order, the actors, initial globals and the player record.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::dialogue::DialogueGroup;
use crate::error::{CoreError, CoreResult};
use crate::player::Player;
use crate::store::DialogueStore;
use crate::value::Value;
use crate::world::World;

/// On-disk form of a dialogue database.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    /// Dialogue groups in load order.
    #[serde(default)]
    pub dialogues: Vec<DialogueGroup>,
    /// Actors available for conversation.
    #[serde(default)]
    pub actors: Vec<Actor>,
    /// Initial global variables.
    #[serde(default)]
    pub globals: BTreeMap<String, Value>,
    /// The player record.
    #[serde(default)]
    pub player: Player,
    /// Topics the player already knows when the session starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_topics: Vec<String>,
}

impl Database {
    /// Parse a database from JSON text.
    pub fn from_json(source: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and parse a database file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Split into the read-only dialogue store and the mutable world.
    pub fn into_parts(self) -> CoreResult<(DialogueStore, World)> {
        let store = DialogueStore::from_groups(self.dialogues)?;

        let mut world = World::new(self.player);
        for (name, value) in &self.globals {
            world.game.set_global(name, *value);
        }
        for actor in self.actors {
            world.add_actor(actor)?;
        }

        Ok((store, world))
    }
}
