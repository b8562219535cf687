//! Configuration management for stubforge
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `STUBFORGE_` prefix, `__` for nesting)
//! 2. An explicit file passed with `--config`, or `./stubforge.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # stubforge.toml
//! [scaffold]
//! models_dir = "app/Models"
//! migrations_dir = "database/migrations"
//! base_namespace = "App\\Models"
//! stub_dir = "stubs"
//!
//! [formats]
//! date = "Y-m-d"
//! datetime = "Y-m-d H:i:s"
//!
//! [uploads]
//! public_root = "public"
//! process_images = true
//! target_format = "webp"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use stubforge::config::StubforgeConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = StubforgeConfig::load()?;
//! let datetime_format = &config.formats.datetime;
//! # Ok(())
//! # }
//! ```

use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "stubforge.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "STUBFORGE_";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A provider failed to parse or a value has the wrong shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Code generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    /// Directory generated models are written to, relative to the project root
    pub models_dir: PathBuf,

    /// Directory generated migrations are written to
    pub migrations_dir: PathBuf,

    /// Root namespace of generated models
    pub base_namespace: String,

    /// Optional directory of `<id>.stub` files overriding the built-in stubs
    pub stub_dir: Option<PathBuf>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("app/Models"),
            migrations_dir: PathBuf::from("database/migrations"),
            base_namespace: "App\\Models".to_string(),
            stub_dir: None,
        }
    }
}

/// Date and time formats embedded in generated casts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormats {
    /// Format for `date` columns
    pub date: String,

    /// Format for `time` columns
    pub time: String,

    /// Format for `dateTime` columns and the timestamp columns
    pub datetime: String,

    /// Format for fields edited through a `month` input
    pub month: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            date: "Y-m-d".to_string(),
            time: "H:i".to_string(),
            datetime: "Y-m-d H:i:s".to_string(),
            month: "Y-m".to_string(),
        }
    }
}

/// Target encoding for processed uploads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageTarget {
    /// WebP (lossless)
    Webp,
    /// PNG
    Png,
    /// JPEG
    Jpeg,
}

impl ImageTarget {
    /// File extension written for this target
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// MIME type written for this target
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Webp => "image/webp",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Upload and disk settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Web root used by the public-path pseudo-disk
    pub public_root: PathBuf,

    /// URL prefix for files under the web root
    pub public_url: String,

    /// Root of the `local` disk
    pub local_root: PathBuf,

    /// Root of the `public` disk
    pub public_disk_root: PathBuf,

    /// URL prefix of the `public` disk
    pub public_disk_url: String,

    /// Re-encode and resize images instead of storing raw bytes
    pub process_images: bool,

    /// Encoding used when `process_images` is on
    pub target_format: ImageTarget,

    /// Secret used to sign temporary URLs of local disks
    pub signing_key: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            public_root: PathBuf::from("public"),
            public_url: "/".to_string(),
            local_root: PathBuf::from("storage/app"),
            public_disk_root: PathBuf::from("storage/app/public"),
            public_disk_url: "/storage".to_string(),
            process_images: true,
            target_format: ImageTarget::Webp,
            signing_key: None,
        }
    }
}

/// Complete stubforge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StubforgeConfig {
    /// Code generation settings
    #[serde(default)]
    pub scaffold: ScaffoldSettings,

    /// Cast formats
    #[serde(default)]
    pub formats: DateFormats,

    /// Upload settings
    #[serde(default)]
    pub uploads: UploadSettings,
}

impl StubforgeConfig {
    /// Load configuration from `./stubforge.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Path::new(DEFAULT_CONFIG_FILE))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Load configuration from a specific file, which must exist
    ///
    /// Files ending in `.json` are read as JSON, everything else as TOML.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::figment(path)
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// Build the layered provider stack without extracting it
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        let figment = Figment::from(Serialized::defaults(Self::default()));
        let figment = if path.extension().is_some_and(|ext| ext == "json") {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StubforgeConfig::default();
        assert_eq!(config.scaffold.models_dir, PathBuf::from("app/Models"));
        assert_eq!(config.scaffold.base_namespace, "App\\Models");
        assert_eq!(config.formats.datetime, "Y-m-d H:i:s");
        assert!(config.uploads.process_images);
        assert_eq!(config.uploads.target_format, ImageTarget::Webp);
    }

    #[test]
    fn test_load_from_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [scaffold]
                base_namespace = "Domain\\Models"

                [formats]
                date = "d/m/Y"

                [uploads]
                process_images = false
                target_format = "png"
                "#,
            )?;

            let config = StubforgeConfig::load_from(Path::new("custom.toml")).unwrap();
            assert_eq!(config.scaffold.base_namespace, "Domain\\Models");
            assert_eq!(config.formats.date, "d/m/Y");
            assert_eq!(config.formats.time, "H:i");
            assert!(!config.uploads.process_images);
            assert_eq!(config.uploads.target_format, ImageTarget::Png);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("stubforge.toml", "[formats]\ndatetime = \"Y-m-d H:i\"\n")?;
            jail.set_env("STUBFORGE_FORMATS__DATETIME", "d.m.Y H:i");

            let config = StubforgeConfig::load().unwrap();
            assert_eq!(config.formats.datetime, "d.m.Y H:i");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = StubforgeConfig::load_from(Path::new("/nonexistent/stubforge.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_image_target_metadata() {
        assert_eq!(ImageTarget::Webp.extension(), "webp");
        assert_eq!(ImageTarget::Jpeg.extension(), "jpg");
        assert_eq!(ImageTarget::Png.mime_type(), "image/png");
    }
}
