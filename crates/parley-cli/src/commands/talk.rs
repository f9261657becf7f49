use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use parley_core::{ActorId, TopicId, World};
use parley_dialogue::{
    DialogueConfig, DialogueError, DialogueManager, DialogueView, KnownTopics, PersuasionKind, PersuasionOutcome,
    ServiceSet, SessionState,
};
use tracing::debug;

/// Prints dialogue output to the terminal as it happens.
#[derive(Debug, Default)]
struct TerminalView {
    keywords: Vec<String>,
    services: ServiceSet,
    goodbye_only: bool,
    closed: bool,
}

impl DialogueView for TerminalView {
    fn start_dialogue(&mut self, actor_name: &str) {
        self.goodbye_only = false;
        self.closed = false;
        println!("  {} {}", "Talking to".bold(), actor_name.cyan().bold());
        println!("  Type a topic, or /help for commands.\n");
    }

    fn add_title(&mut self, text: &str) {
        println!("{}", text.yellow().bold());
    }

    fn add_text(&mut self, text: &str) {
        println!("{text}");
    }

    fn set_keywords(&mut self, keywords: &[String]) {
        self.keywords = keywords.to_vec();
    }

    fn set_services(&mut self, services: ServiceSet) {
        self.services = services;
    }

    fn ask_question(&mut self, question: &str) {
        println!("  {} {}", "?".cyan(), question.cyan());
    }

    fn goodbye(&mut self) {
        self.goodbye_only = true;
    }

    fn play_sound(&mut self, sound: &str) {
        println!("{}", format!("[sound: {sound}]").dimmed());
    }

    fn close(&mut self) {
        self.closed = true;
        println!("  {}", "Goodbye.".bold());
    }
}

/// One line of player input.
#[derive(Debug, PartialEq)]
enum Input {
    /// A topic, or an answer while a question is open.
    Say(String),
    Persuade(PersuasionKind),
    Goodbye,
    Status,
    Help,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Say(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().map(str::to_lowercase);
    let arg = parts.next();
    if parts.next().is_some() {
        return Input::Unknown(line.to_string());
    }

    match (name.as_deref(), arg) {
        (Some("admire"), None) => Input::Persuade(PersuasionKind::Admire),
        (Some("intimidate"), None) => Input::Persuade(PersuasionKind::Intimidate),
        (Some("taunt"), None) => Input::Persuade(PersuasionKind::Taunt),
        (Some("bribe"), Some(amount)) => match amount.parse().ok().and_then(PersuasionKind::bribe) {
            Some(kind) => Input::Persuade(kind),
            None => Input::Unknown(line.to_string()),
        },
        (Some("goodbye" | "bye"), None) => Input::Goodbye,
        (Some("status"), None) => Input::Status,
        (Some("help"), None) => Input::Help,
        _ => Input::Unknown(line.to_string()),
    }
}

fn print_help() {
    println!("  <topic>            ask about a topic (or answer an open question)");
    println!("  /admire            /intimidate    /taunt");
    println!("  /bribe 10|100|1000 offer gold");
    println!("  /status            show disposition and player state");
    println!("  /goodbye           end the conversation");
}

fn print_options(manager: &DialogueManager<TerminalView>) {
    let view = manager.view();
    if manager.state() == SessionState::AwaitingChoice {
        println!("{}", "  (choose one of the answers above)".dimmed());
    } else if view.goodbye_only {
        println!("{}", "  (the conversation is over, type /goodbye)".dimmed());
    } else {
        let topics = if view.keywords.is_empty() {
            "-".to_string()
        } else {
            view.keywords.join(", ")
        };
        println!("  {} {topics}", "Topics:".bold());
        if !view.services.is_empty() {
            println!("  {} {}", "Services:".bold(), view.services);
        }
    }
}

fn print_persuasion(manager: &DialogueManager<TerminalView>, world: &World, outcome: &PersuasionOutcome) {
    let verdict = if outcome.success {
        "success".green()
    } else {
        "failure".red()
    };
    let disposition = manager
        .derived_disposition(world)
        .map_or_else(|| "-".to_string(), |d| d.to_string());
    println!(
        "  {} {verdict} {}",
        outcome.kind.to_string().bold(),
        format!(
            "(disposition {disposition}, temporary {:+}, permanent {:+})",
            outcome.temporary, outcome.permanent
        )
        .dimmed()
    );
}

fn print_status(manager: &DialogueManager<TerminalView>, world: &World, actor_id: ActorId) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some(actor) = world.actor(actor_id) {
        table.add_row(vec!["Actor".to_string(), actor.name.clone()]);
        table.add_row(vec!["Base disposition".to_string(), actor.base_disposition.to_string()]);
    }
    if let Some(disposition) = manager.derived_disposition(world) {
        table.add_row(vec!["Disposition".to_string(), disposition.to_string()]);
    }
    table.add_row(vec![
        "Pending change".to_string(),
        format!(
            "temporary {:+}, permanent {:+}",
            manager.temporary_disposition_change(),
            manager.permanent_disposition_change()
        ),
    ]);
    table.add_row(vec!["Gold".to_string(), world.player.gold.to_string()]);
    table.add_row(vec!["Speechcraft".to_string(), world.player.speechcraft.to_string()]);
    table.add_row(vec!["Known topics".to_string(), manager.known_topics().len().to_string()]);
    table.add_row(vec!["State".to_string(), format!("{:?}", manager.state())]);

    println!("{table}");
}

pub fn run(db: &Path, actor: &str, seed: u64, script_verbose: bool) -> Result<(), String> {
    let database = super::load_database(db)?;
    let known: KnownTopics = database.known_topics.iter().map(|t| TopicId::new(t)).collect();
    let (store, mut world) = database.into_parts().map_err(|e| e.to_string())?;
    let actor_id = world
        .find_actor_id(actor)
        .ok_or_else(|| format!("no actor named '{actor}'"))?;

    let config = DialogueConfig::default()
        .with_seed(seed)
        .with_script_verbose(script_verbose);
    let mut manager = DialogueManager::new(store, TerminalView::default(), &config).with_known_topics(known);
    manager
        .start_dialogue(&mut world, actor_id)
        .map_err(|e| e.to_string())?;

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        println!();
        print_options(&manager);
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        debug!(input, "player input");

        match parse_input(input) {
            Input::Say(text) => {
                let result = if manager.state() == SessionState::AwaitingChoice {
                    manager.question_answered(&mut world, &text)
                } else {
                    manager.keyword_selected(&mut world, &text)
                };
                result.map_err(|e| e.to_string())?;
            }
            Input::Persuade(kind) => match manager.persuade(&mut world, kind) {
                Ok(outcome) => print_persuasion(&manager, &world, &outcome),
                Err(DialogueError::InsufficientGold { needed, available }) => {
                    println!("{}", format!("  You need {needed} gold but carry {available}.").yellow());
                }
                Err(e) => return Err(e.to_string()),
            },
            Input::Goodbye => {
                manager
                    .goodbye_selected(&mut world)
                    .map_err(|e| e.to_string())?;
            }
            Input::Status => print_status(&manager, &world, actor_id),
            Input::Help => print_help(),
            Input::Unknown(command) => {
                println!("{}", format!("  unknown command: {command} (try /help)").yellow());
            }
        }

        if manager.view().closed {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_topic() {
        assert_eq!(parse_input("  Latest Rumors "), Input::Say("Latest Rumors".into()));
    }

    #[test]
    fn persuasion_commands() {
        assert_eq!(parse_input("/Admire"), Input::Persuade(PersuasionKind::Admire));
        assert_eq!(parse_input("/bribe 100"), Input::Persuade(PersuasionKind::BribeHundred));
        assert_eq!(parse_input("/bribe 50"), Input::Unknown("/bribe 50".into()));
        assert_eq!(parse_input("/taunt now"), Input::Unknown("/taunt now".into()));
    }

    #[test]
    fn session_commands() {
        assert_eq!(parse_input("/bye"), Input::Goodbye);
        assert_eq!(parse_input("/status"), Input::Status);
        assert_eq!(parse_input("/dance"), Input::Unknown("/dance".into()));
    }
}
