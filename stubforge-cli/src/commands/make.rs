//! Model and migration generation commands
//!
//! ```bash
//! stubforge make model Blog/Post \
//!   title:string:text:200 \
//!   published_at:dateTime \
//!   author_id:foreignId:select:users \
//!   --migration
//! ```

use crate::project::Project;
use crate::writer::{FileWriter, WriteMode, WriteOutcome};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use std::path::{Path, PathBuf};
use stubforge::scaffold::{FieldSpec, GeneratedFile, MigrationGenerator, ModelGenerator, ModelSpec};

/// Where the model name and fields come from
#[derive(Args, Debug, Clone)]
pub struct ModelInput {
    /// Model name, optionally namespaced (e.g. `Post`, `Blog/Post`)
    #[arg(required_unless_present = "spec")]
    pub model: Option<String>,

    /// Field definitions: `name:columnType[:inputType[:constraint[:foreignIdColumn]]]`
    pub fields: Vec<String>,

    /// Read the model and its fields from a TOML or JSON spec file
    #[arg(long, value_name = "FILE")]
    pub spec: Option<PathBuf>,
}

impl ModelInput {
    /// Resolve the model name and ordered fields
    ///
    /// Spec-file fields come first, command-line fields after them. A model
    /// name on the command line wins over the one in the spec file.
    ///
    /// # Errors
    ///
    /// Returns error if the spec file or a field token is invalid.
    pub fn resolve(&self, root: &Path) -> Result<(String, Vec<FieldSpec>)> {
        let (spec_model, mut fields) = match &self.spec {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.clone()
                } else {
                    root.join(path)
                };
                let spec = ModelSpec::from_file(&path)
                    .with_context(|| format!("Failed to read model spec {}", path.display()))?;
                (Some(spec.model), spec.fields)
            }
            None => (None, Vec::new()),
        };

        for token in &self.fields {
            fields.push(FieldSpec::parse(token)?);
        }

        let model = self
            .model
            .clone()
            .or(spec_model)
            .context("A model name is required")?;
        Ok((model, fields))
    }
}

/// Overwrite behaviour
#[derive(Args, Debug, Clone, Copy)]
pub struct WriteFlags {
    /// Overwrite existing files without asking
    #[arg(long)]
    pub force: bool,

    /// Show what would be written without touching any file
    #[arg(long)]
    pub dry_run: bool,
}

impl WriteFlags {
    const fn mode(self) -> WriteMode {
        WriteMode::from_flags(self.force, self.dry_run)
    }
}

/// Code generation subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum MakeCommand {
    /// Generate an Eloquent model
    Model {
        #[command(flatten)]
        input: ModelInput,

        /// Also generate the create-table migration
        #[arg(long)]
        migration: bool,

        #[command(flatten)]
        write: WriteFlags,
    },
    /// Generate a create-table migration
    Migration {
        #[command(flatten)]
        input: ModelInput,

        #[command(flatten)]
        write: WriteFlags,
    },
}

impl MakeCommand {
    /// Execute the make command
    ///
    /// # Errors
    ///
    /// Returns error if fields are invalid, rendering fails or a file
    /// cannot be written.
    pub fn execute(self, project: &Project) -> Result<Vec<WriteOutcome>> {
        let (input, with_model, with_migration, write) = match self {
            Self::Model { input, migration, write } => (input, true, migration, write),
            Self::Migration { input, write } => (input, false, true, write),
        };

        let (model, fields) = input.resolve(&project.root)?;
        println!(
            "\n{} {} {}",
            style("Generating").cyan().bold(),
            style(&model).green().bold(),
            style(format!("({} fields)", fields.len())).dim()
        );

        let files = generate(project, &model, &fields, with_model, with_migration)?;
        let writer = FileWriter::new(&project.root, write.mode());

        let outcomes = files
            .iter()
            .map(|file| writer.write(file))
            .collect::<Result<Vec<_>>>()?;

        if write.dry_run {
            println!("\n{}", style("Dry run: no files were written.").yellow());
        }
        Ok(outcomes)
    }
}

fn generate(
    project: &Project,
    model: &str,
    fields: &[FieldSpec],
    with_model: bool,
    with_migration: bool,
) -> Result<Vec<GeneratedFile>> {
    let mut files = Vec::with_capacity(2);

    if with_model {
        let generator =
            ModelGenerator::new(&project.config).context("Failed to load model stubs")?;
        files.push(
            generator
                .generate(model, fields)
                .with_context(|| format!("Failed to generate model {model}"))?,
        );
    }

    if with_migration {
        let generator =
            MigrationGenerator::new(&project.config).context("Failed to load migration stubs")?;
        files.push(
            generator
                .generate(model, fields)
                .with_context(|| format!("Failed to generate migration for {model}"))?,
        );
    }

    Ok(files)
}
