//! Writing generated files into a project
//!
//! New files are created directly. An existing file is never replaced
//! silently: identical content is skipped, otherwise a unified diff is
//! printed and the user is asked before overwriting (unless `--force`).

use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::Confirm;
use similar::TextDiff;
use std::fs;
use std::path::{Path, PathBuf};
use stubforge::scaffold::GeneratedFile;

static CHECK: Emoji<'_, '_> = Emoji("✓ ", "+ ");
static SAME: Emoji<'_, '_> = Emoji("= ", "= ");
static SKIP: Emoji<'_, '_> = Emoji("✗ ", "- ");

/// How existing files are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Show a diff and ask before overwriting
    Prompt,
    /// Overwrite without asking
    Force,
    /// Print what would happen, write nothing
    DryRun,
}

impl WriteMode {
    /// Mode selected by the `--force` and `--dry-run` flags
    #[must_use]
    pub const fn from_flags(force: bool, dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else if force {
            Self::Force
        } else {
            Self::Prompt
        }
    }
}

/// What happened to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file did not exist and was written
    Created,
    /// The file existed with different content and was replaced
    Overwritten,
    /// The file already had this content
    Unchanged,
    /// The user declined to overwrite
    Declined,
    /// Dry run; nothing written
    Planned,
}

/// Writes generated files relative to a project root
#[derive(Debug, Clone)]
pub struct FileWriter {
    root: PathBuf,
    mode: WriteMode,
}

impl FileWriter {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// Project root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one file, reporting the outcome on stdout
    ///
    /// # Errors
    ///
    /// Fails on I/O errors, or when an existing file differs, `--force` was
    /// not given and stdin/stdout is not a terminal to ask on.
    pub fn write(&self, file: &GeneratedFile) -> Result<WriteOutcome> {
        let full_path = self.root.join(&file.path);
        let existing = match fs::read_to_string(&full_path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", full_path.display()))
            }
        };

        let outcome = match (existing, self.mode) {
            (Some(current), _) if current == file.content => WriteOutcome::Unchanged,
            (None, WriteMode::DryRun) => WriteOutcome::Planned,
            (None, _) => {
                Self::persist(&full_path, &file.content)?;
                WriteOutcome::Created
            }
            (Some(current), WriteMode::DryRun) => {
                print_diff(&file.path, &current, &file.content);
                WriteOutcome::Planned
            }
            (Some(_), WriteMode::Force) => {
                Self::persist(&full_path, &file.content)?;
                WriteOutcome::Overwritten
            }
            (Some(current), WriteMode::Prompt) => {
                if !console::user_attended() {
                    anyhow::bail!(
                        "{} already exists with different content; re-run with --force to overwrite",
                        file.path.display()
                    );
                }
                print_diff(&file.path, &current, &file.content);
                let confirmed = Confirm::new()
                    .with_prompt(format!("Overwrite {}?", file.path.display()))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if confirmed {
                    Self::persist(&full_path, &file.content)?;
                    WriteOutcome::Overwritten
                } else {
                    WriteOutcome::Declined
                }
            }
        };

        report(file, outcome);
        Ok(outcome)
    }

    fn persist(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote file");
        Ok(())
    }
}

/// Unified diff from the file on disk to the generated content
#[must_use]
pub fn unified_diff(path: &Path, current: &str, generated: &str) -> String {
    let name = path.display().to_string();
    let diff = TextDiff::from_lines(current, generated);
    let mut unified = diff.unified_diff();
    unified
        .context_radius(3)
        .header(&format!("a/{name}"), &format!("b/{name}"));
    unified.to_string()
}

fn print_diff(path: &Path, current: &str, generated: &str) {
    for line in unified_diff(path, current, generated).lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", style(line).bold());
        } else if line.starts_with('+') {
            println!("{}", style(line).green());
        } else if line.starts_with('-') {
            println!("{}", style(line).red());
        } else if line.starts_with("@@") {
            println!("{}", style(line).cyan());
        } else {
            println!("{line}");
        }
    }
}

fn report(file: &GeneratedFile, outcome: WriteOutcome) {
    let path = style(file.path.display()).dim();
    match outcome {
        WriteOutcome::Created => println!("  {CHECK}{path} ({})", style(&file.description).dim()),
        WriteOutcome::Overwritten => {
            println!("  {CHECK}{path} {}", style("(overwritten)").yellow());
        }
        WriteOutcome::Unchanged => println!("  {SAME}{path} {}", style("(unchanged)").dim()),
        WriteOutcome::Declined => println!("  {SKIP}{path} {}", style("(kept existing)").yellow()),
        WriteOutcome::Planned => println!("  {} {path}", style("would write").cyan()),
    }
}
