pub mod check;
pub mod list;
pub mod talk;

use std::path::Path;

use parley_core::{Database, DialogueKind};

/// Load a dialogue database, mapping failures to a printable message.
fn load_database(path: &Path) -> Result<Database, String> {
    Database::load(path).map_err(|e| e.to_string())
}

/// Parse a dialogue kind name as used on the command line.
fn parse_kind(name: &str) -> Result<DialogueKind, String> {
    match name.to_lowercase().as_str() {
        "topic" | "topics" => Ok(DialogueKind::Topic),
        "greeting" | "greetings" => Ok(DialogueKind::Greeting),
        "voice" => Ok(DialogueKind::Voice),
        "persuasion" => Ok(DialogueKind::Persuasion),
        "journal" => Ok(DialogueKind::Journal),
        other => Err(format!(
            "unknown dialogue kind '{other}' (expected topic, greeting, voice, persuasion or journal)"
        )),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
