//! The project a command runs against

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stubforge::config::{StubforgeConfig, DEFAULT_CONFIG_FILE};

/// Project root plus its loaded configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory generated paths are relative to
    pub root: PathBuf,
    /// Configuration with relative directories rebased onto `root`
    pub config: StubforgeConfig,
}

impl Project {
    /// Load configuration for the project at `root`
    ///
    /// An explicit `config_file` must exist. Without one,
    /// `<root>/stubforge.toml` is used when present; the working directory
    /// is never consulted.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration cannot be loaded.
    pub fn load(root: &Path, config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => StubforgeConfig::load_from(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => {
                let default = root.join(DEFAULT_CONFIG_FILE);
                StubforgeConfig::figment(&default)
                    .extract::<StubforgeConfig>()
                    .with_context(|| format!("Failed to load configuration for {}", root.display()))?
            }
        };

        if let Some(dir) = config.scaffold.stub_dir.take() {
            config.scaffold.stub_dir = Some(rebase(root, dir));
        }
        tracing::debug!(root = %root.display(), stub_dir = ?config.scaffold.stub_dir, "loaded project");

        Ok(Self {
            root: root.to_path_buf(),
            config,
        })
    }

    /// Directory stubs are published to: `dir`, else the configured
    /// `stub_dir`, else `<root>/stubs`
    #[must_use]
    pub fn stub_dir(&self, dir: Option<PathBuf>) -> PathBuf {
        dir.map(|d| rebase(&self.root, d))
            .or_else(|| self.config.scaffold.stub_dir.clone())
            .unwrap_or_else(|| self.root.join("stubs"))
    }
}

fn rebase(root: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        root.join(dir)
    }
}
