//! stubforge CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use stubforge::observability::{self, ObservabilityConfig};
use stubforge_cli_lib::{MakeCommand, Project, StubsCommand};

#[derive(Parser)]
#[command(name = "stubforge")]
#[command(version)]
#[command(about = "Scaffold Laravel models and migrations from field definitions", long_about = None)]
struct Cli {
    /// Configuration file (defaults to `stubforge.toml` in the project root)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Project root generated paths are relative to
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    path: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate models and migrations
    Make {
        #[command(subcommand)]
        command: MakeCommand,
    },
    /// Publish and inspect stubs
    Stubs {
        #[command(subcommand)]
        command: StubsCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init_with(
        &ObservabilityConfig::new("stubforge")
            .with_verbosity(cli.verbose)
            .with_json(false),
    )?;

    let project = Project::load(&cli.path, cli.config.as_deref())?;

    match cli.command {
        Commands::Make { command } => {
            command.execute(&project)?;
        }
        Commands::Stubs { command } => {
            command.execute(&project)?;
        }
    }

    Ok(())
}
