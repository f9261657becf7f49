//! CLI frontend for the parley conversation engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "parley",
    about = "parley - talk to the characters of a dialogue database",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every response script and report diagnostics
    Check {
        /// Dialogue database (JSON)
        db: PathBuf,
    },

    /// List dialogue groups in load order
    List {
        /// Dialogue database (JSON)
        db: PathBuf,

        /// Filter by kind (topic, greeting, voice, persuasion, journal)
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Start an interactive conversation with an actor
    Talk {
        /// Dialogue database (JSON)
        db: PathBuf,

        /// Actor name (case-insensitive)
        actor: String,

        /// RNG seed for persuasion rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Log the source of scripts that fail to compile
        #[arg(long)]
        script_verbose: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("PARLEY_LOG")
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check { db } => commands::check::run(&db),
        Commands::List { db, kind } => commands::list::run(&db, kind.as_deref()),
        Commands::Talk {
            db,
            actor,
            seed,
            script_verbose,
        } => commands::talk::run(&db, &actor, seed, script_verbose),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
