//! CLI frontend for the Dzintaru Dziesmas character creator.

mod commands;
mod shell;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dd",
    about = "Dzintaru Dziesmas — step-by-step character creation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a character interactively, one step at a time
    Create {
        /// RNG seed for the starting gold roll
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Rulebook JSON to use instead of the standard tables
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Print the finished sheet as JSON when the session ends
        #[arg(long)]
        json: bool,
    },

    /// Print reference tables (abilities, ages, skills, talents, spells, equipment)
    Tables {
        /// Table to print (default: all)
        kind: Option<String>,

        /// Rulebook JSON to use instead of the standard tables
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Create { seed, rules, json } => {
            commands::create::run(seed, rules.as_deref(), json)
        }
        Commands::Tables { kind, rules } => {
            commands::tables::run(kind.as_deref(), rules.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
