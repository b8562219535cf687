//! Stub renderer
//!
//! Stubs are registered by id in a strict, non-escaping Handlebars registry.
//! Rendering is plain placeholder substitution: a placeholder the stub
//! references but the context does not provide is an error, and so is an
//! id that was never registered.

use super::stubs::BUILTIN_STUBS;
use handlebars::Handlebars;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Placeholder → replacement map for one render
pub type RenderContext = BTreeMap<String, String>;

/// File extension of stub overrides
pub const STUB_EXTENSION: &str = "stub";

/// Errors raised while loading or rendering stubs
#[derive(Debug, Error)]
pub enum StubError {
    /// No stub is registered under this id
    #[error("Unknown stub: {0}")]
    UnknownStub(String),

    /// A stub failed to parse
    #[error("Failed to parse stub '{id}': {source}")]
    Parse {
        /// Stub id
        id: String,
        /// Parser error
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// Substitution failed, usually because a placeholder has no value
    #[error("Failed to render stub '{id}': {source}")]
    Render {
        /// Stub id
        id: String,
        /// Render error
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// The override directory could not be read
    #[error("Failed to read stubs from {path}: {source}")]
    Io {
        /// Directory or file being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Named stub storage plus substitution
pub struct StubRenderer {
    registry: Handlebars<'static>,
    overridden: BTreeSet<String>,
}

impl std::fmt::Debug for StubRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubRenderer")
            .field("stubs", &self.stub_ids())
            .field("overridden", &self.overridden)
            .finish()
    }
}

impl StubRenderer {
    /// Create a renderer holding only the built-in stubs
    pub fn new() -> Result<Self, StubError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        let mut renderer = Self {
            registry,
            overridden: BTreeSet::new(),
        };
        for (id, source) in BUILTIN_STUBS {
            renderer.register(id, source)?;
        }
        Ok(renderer)
    }

    /// Create a renderer and apply overrides from `dir`, if given
    ///
    /// Every `<id>.stub` file in the directory replaces (or adds) the stub
    /// with that id. A directory that does not exist is ignored.
    pub fn with_overrides(dir: Option<&Path>) -> Result<Self, StubError> {
        let mut renderer = Self::new()?;
        if let Some(dir) = dir {
            renderer.load_dir(dir)?;
        }
        Ok(renderer)
    }

    /// Register or replace a stub from source text
    pub fn register(&mut self, id: &str, source: &str) -> Result<(), StubError> {
        self.registry
            .register_template_string(id, source)
            .map_err(|e| StubError::Parse {
                id: id.to_string(),
                source: Box::new(e),
            })
    }

    fn load_dir(&mut self, dir: &Path) -> Result<(), StubError> {
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "stub override directory not found, using built-ins");
            return Ok(());
        }

        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StubError::Io { path, source }
        };

        let entries = std::fs::read_dir(dir).map_err(io_err(dir))?;
        for entry in entries {
            let path = entry.map_err(io_err(dir))?.path();
            if path.extension().is_none_or(|ext| ext != STUB_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let source = std::fs::read_to_string(&path).map_err(io_err(&path))?;
            self.register(id, &source)?;
            self.overridden.insert(id.to_string());
            tracing::debug!(stub = id, path = %path.display(), "loaded stub override");
        }
        Ok(())
    }

    /// Render the stub `id` with `context`
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::{RenderContext, StubRenderer};
    /// let mut renderer = StubRenderer::new().unwrap();
    /// renderer.register("greeting", "Hello {{name}}!").unwrap();
    ///
    /// let mut context = RenderContext::new();
    /// context.insert("name".to_string(), "<World>".to_string());
    /// assert_eq!(renderer.render("greeting", &context).unwrap(), "Hello <World>!");
    /// ```
    ///
    /// # Errors
    ///
    /// [`StubError::UnknownStub`] when no stub has this id, or
    /// [`StubError::Render`] when a referenced placeholder is missing.
    pub fn render(&self, id: &str, context: &RenderContext) -> Result<String, StubError> {
        if !self.registry.has_template(id) {
            return Err(StubError::UnknownStub(id.to_string()));
        }
        self.registry
            .render(id, context)
            .map_err(|e| StubError::Render {
                id: id.to_string(),
                source: Box::new(e),
            })
    }

    /// Whether a stub with this id is registered
    #[must_use]
    pub fn has_stub(&self, id: &str) -> bool {
        self.registry.has_template(id)
    }

    /// Registered stub ids, sorted
    #[must_use]
    pub fn stub_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.registry.get_templates().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Whether the stub was loaded from the override directory
    #[must_use]
    pub fn is_overridden(&self, id: &str) -> bool {
        self.overridden.contains(id)
    }

    /// Built-in stubs as `(file name, source)` pairs, for publishing
    #[must_use]
    pub fn builtin_stubs() -> Vec<(String, &'static str)> {
        BUILTIN_STUBS
            .iter()
            .map(|(id, source)| (format!("{id}.{STUB_EXTENSION}"), *source))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> RenderContext {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_builtins_registered() {
        let renderer = StubRenderer::new().unwrap();
        assert!(renderer.has_stub("model"));
        assert!(renderer.has_stub("migration"));
        assert_eq!(renderer.stub_ids(), vec!["migration", "model"]);
        assert!(!renderer.is_overridden("model"));
    }

    #[test]
    fn test_unknown_stub_is_fatal() {
        let renderer = StubRenderer::new().unwrap();
        let err = renderer.render("controller", &RenderContext::new()).unwrap_err();
        assert!(matches!(err, StubError::UnknownStub(ref id) if id == "controller"));
    }

    #[test]
    fn test_substitution_is_verbatim() {
        let mut renderer = StubRenderer::new().unwrap();
        renderer.register("line", "'{{key}}' => '{{value}}',").unwrap();
        let out = renderer
            .render("line", &context(&[("key", "when"), ("value", r"date:o-\WW & <b>")]))
            .unwrap();
        assert_eq!(out, r"'when' => 'date:o-\WW & <b>',");
    }

    #[test]
    fn test_missing_placeholder_fails() {
        let renderer = StubRenderer::new().unwrap();
        let err = renderer
            .render("migration", &context(&[("table", "posts")]))
            .unwrap_err();
        assert!(matches!(err, StubError::Render { .. }));
    }

    #[test]
    fn test_empty_value_is_not_missing() {
        let renderer = StubRenderer::new().unwrap();
        let out = renderer
            .render("migration", &context(&[("table", "posts"), ("columns", "")]))
            .unwrap();
        assert!(out.contains("Schema::create('posts'"));
        assert!(out.contains("Schema::dropIfExists('posts');"));
    }

    #[test]
    fn test_overrides_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("model.stub"), "class {{class}} {}").unwrap();
        std::fs::write(dir.path().join("policy.stub"), "policy for {{class}}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored {{").unwrap();

        let renderer = StubRenderer::with_overrides(Some(dir.path())).unwrap();
        assert!(renderer.is_overridden("model"));
        assert!(renderer.is_overridden("policy"));
        assert!(!renderer.is_overridden("migration"));
        assert!(!renderer.has_stub("notes"));

        let out = renderer.render("model", &context(&[("class", "Post")])).unwrap();
        assert_eq!(out, "class Post {}");
    }

    #[test]
    fn test_missing_override_directory_is_ignored() {
        let renderer = StubRenderer::with_overrides(Some(Path::new("/nonexistent/stubs"))).unwrap();
        assert_eq!(renderer.stub_ids().len(), 2);
    }

    #[test]
    fn test_builtin_stub_file_names() {
        let names: Vec<String> = StubRenderer::builtin_stubs().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["model.stub", "migration.stub"]);
    }
}
