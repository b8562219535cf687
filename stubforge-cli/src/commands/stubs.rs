//! Stub management commands
//!
//! - `publish` - copy the built-in stubs into the project for customization
//! - `list` - show every stub and whether the project overrides it

use crate::project::Project;
use crate::writer::{FileWriter, WriteMode, WriteOutcome};
use anyhow::{Context, Result};
use clap::Subcommand;
use console::{style, Emoji};
use std::path::PathBuf;
use stubforge::scaffold::stubs::placeholders;
use stubforge::scaffold::{GeneratedFile, StubRenderer};

static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");
static CUSTOM: Emoji<'_, '_> = Emoji("✨ ", "* ");
static DEFAULT: Emoji<'_, '_> = Emoji("  ", "  ");

/// Stub subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StubsCommand {
    /// Copy the built-in stubs into the project
    Publish {
        /// Target directory (defaults to `scaffold.stub_dir`, then `stubs`)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Overwrite stubs that were already published
        #[arg(long)]
        force: bool,
    },
    /// List stubs and their override status
    List,
}

impl StubsCommand {
    /// Execute the stubs command
    ///
    /// # Errors
    ///
    /// Returns error if stubs cannot be written or an override fails to parse.
    pub fn execute(self, project: &Project) -> Result<()> {
        match self {
            Self::Publish { dir, force } => publish(project, dir, force).map(|_| ()),
            Self::List => list(project),
        }
    }
}

/// Write every built-in stub into the stub directory
///
/// # Errors
///
/// Returns error if a stub cannot be written.
pub fn publish(project: &Project, dir: Option<PathBuf>, force: bool) -> Result<Vec<WriteOutcome>> {
    let target = project.stub_dir(dir);
    println!("{FOLDER}Publishing stubs to {}", style(target.display()).cyan());

    let mode = if force { WriteMode::Force } else { WriteMode::Prompt };
    let writer = FileWriter::new(&target, mode);

    let outcomes = StubRenderer::builtin_stubs()
        .into_iter()
        .map(|(name, source)| {
            writer.write(&GeneratedFile {
                path: PathBuf::from(name),
                content: source.to_string(),
                description: "built-in stub".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if project.config.scaffold.stub_dir.as_ref() != Some(&target) {
        println!(
            "\nSet {} in stubforge.toml to use them.",
            style(format!("scaffold.stub_dir = \"{}\"", target.display())).yellow()
        );
    }
    Ok(outcomes)
}

fn list(project: &Project) -> Result<()> {
    let stub_dir = project.config.scaffold.stub_dir.as_deref();
    let renderer = StubRenderer::with_overrides(stub_dir).context("Failed to load stubs")?;

    println!("{FOLDER}Stubs");
    match stub_dir {
        Some(dir) => println!("  Overrides: {}", style(dir.display()).cyan()),
        None => println!("  Overrides: {}", style("none configured").dim()),
    }
    println!();

    let mut customized = 0;
    let ids = renderer.stub_ids();
    for id in &ids {
        let vars = placeholders(id).join(", ");
        if renderer.is_overridden(id) {
            println!("  {CUSTOM}{} {}", style(id).yellow(), style(vars).dim());
            customized += 1;
        } else {
            println!("  {DEFAULT}{} {}", style(id).dim(), style(vars).dim());
        }
    }

    println!();
    println!(
        "  {} customized, {} built-in",
        style(customized).yellow(),
        style(ids.len() - customized).dim()
    );
    Ok(())
}
