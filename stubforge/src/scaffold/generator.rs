//! Model and migration generators
//!
//! Generators are pure: they return [`GeneratedFile`]s and never touch the
//! filesystem. Writing (and asking before overwriting) is the caller's job.

use super::casts::{CastCompiler, Relation};
use super::field_type::{ColumnType, FieldSpec};
use super::helpers::TemplateHelpers;
use super::templates::{RenderContext, StubRenderer};
use super::ScaffoldError;
use crate::config::{ScaffoldSettings, StubforgeConfig};
use chrono::{DateTime, Utc};
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Imports every generated model carries
const MODEL_IMPORTS: [&str; 2] = [
    "Illuminate\\Database\\Eloquent\\Factories\\HasFactory",
    "Illuminate\\Database\\Eloquent\\Model",
];

/// Import added when the model has relations
const BELONGS_TO_IMPORT: &str = "Illuminate\\Database\\Eloquent\\Relations\\BelongsTo";

/// Indentation of one column line inside the migration closure
const COLUMN_INDENT: &str = "            ";

/// A generated file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// Human-readable description
    pub description: String,
}

/// Where a model input lands: class, namespace, file and table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelTarget {
    /// Sub-namespace segments, `StudlyCase`
    pub segments: Vec<String>,
    /// Class name
    pub class: String,
    /// Full namespace of the class
    pub namespace: String,
    /// Model file path relative to the project root
    pub path: PathBuf,
    /// Database table
    pub table: String,
}

impl ModelTarget {
    /// Resolve a (possibly slash-separated) model input
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::config::ScaffoldSettings;
    /// # use stubforge::scaffold::ModelTarget;
    /// let target = ModelTarget::resolve(&ScaffoldSettings::default(), "admin/blog_post").unwrap();
    /// assert_eq!(target.class, "BlogPost");
    /// assert_eq!(target.namespace, "App\\Models\\Admin");
    /// assert_eq!(target.path, std::path::PathBuf::from("app/Models/Admin/BlogPost.php"));
    /// assert_eq!(target.table, "blog_posts");
    /// ```
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::InvalidModelName`] when the input has no class segment
    /// or a segment is not a valid identifier.
    pub fn resolve(settings: &ScaffoldSettings, model_input: &str) -> Result<Self, ScaffoldError> {
        let allowed = |c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ' ' | '/' | '\\');
        if !model_input.chars().all(allowed) {
            return Err(ScaffoldError::InvalidModelName(model_input.to_string()));
        }
        let (segments, class) = TemplateHelpers::split_model_path(model_input);

        let valid = |segment: &String| {
            segment.chars().next().is_some_and(char::is_alphabetic)
                && segment.chars().all(char::is_alphanumeric)
        };
        if !valid(&class) || !segments.iter().all(valid) {
            return Err(ScaffoldError::InvalidModelName(model_input.to_string()));
        }

        let mut namespace = settings.base_namespace.trim_matches('\\').to_string();
        let mut path = settings.models_dir.clone();
        for segment in &segments {
            namespace.push('\\');
            namespace.push_str(segment);
            path.push(segment);
        }
        path.push(format!("{class}.php"));

        Ok(Self {
            table: TemplateHelpers::to_table_name(&class),
            segments,
            class,
            namespace,
            path,
        })
    }
}

/// Generates model classes
#[derive(Debug)]
pub struct ModelGenerator {
    settings: ScaffoldSettings,
    compiler: CastCompiler,
    renderer: StubRenderer,
}

impl ModelGenerator {
    /// Create a generator from configuration, loading stub overrides
    pub fn new(config: &StubforgeConfig) -> Result<Self, ScaffoldError> {
        Ok(Self {
            settings: config.scaffold.clone(),
            compiler: CastCompiler::new(config.formats.clone(), &config.scaffold.base_namespace),
            renderer: StubRenderer::with_overrides(config.scaffold.stub_dir.as_deref())?,
        })
    }

    /// Replace the stub renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: StubRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Resolve where `model_input` would be generated
    pub fn target(&self, model_input: &str) -> Result<ModelTarget, ScaffoldError> {
        ModelTarget::resolve(&self.settings, model_input)
    }

    /// Generate the model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `fields` is empty
    /// - The model name is invalid
    /// - The `model` stub is missing or references an unknown placeholder
    pub fn generate(
        &self,
        model_input: &str,
        fields: &[FieldSpec],
    ) -> Result<GeneratedFile, ScaffoldError> {
        if fields.is_empty() {
            return Err(ScaffoldError::NoFields);
        }
        let target = self.target(model_input)?;
        let compiled = self.compiler.compile(fields);

        let mut imports: Vec<&str> = MODEL_IMPORTS.to_vec();
        if !compiled.relation_list.is_empty() {
            imports.push(BELONGS_TO_IMPORT);
        }
        let imports = imports
            .iter()
            .map(|import| format!("use {import};"))
            .collect::<Vec<_>>()
            .join("\n");

        let context: RenderContext = [
            ("namespace", target.namespace.clone()),
            ("imports", imports),
            ("class", target.class.clone()),
            ("table", target.table.clone()),
            ("fillable", compiled.fillable),
            ("hidden", compiled.hidden),
            ("casts", compiled.casts),
            ("relations", compiled.relations),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let content = self.renderer.render("model", &context)?;
        tracing::debug!(
            class = %target.class,
            path = %target.path.display(),
            fields = fields.len(),
            relations = compiled.relation_list.len(),
            "generated model"
        );

        Ok(GeneratedFile {
            description: format!("Model {}\\{}", target.namespace, target.class),
            path: target.path,
            content,
        })
    }
}

/// Generates create-table migrations
#[derive(Debug)]
pub struct MigrationGenerator {
    settings: ScaffoldSettings,
    base_namespace: String,
    renderer: StubRenderer,
}

impl MigrationGenerator {
    /// Create a generator from configuration, loading stub overrides
    pub fn new(config: &StubforgeConfig) -> Result<Self, ScaffoldError> {
        Ok(Self {
            settings: config.scaffold.clone(),
            base_namespace: config.scaffold.base_namespace.clone(),
            renderer: StubRenderer::with_overrides(config.scaffold.stub_dir.as_deref())?,
        })
    }

    /// Replace the stub renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: StubRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Generate a migration stamped with the current time
    pub fn generate(
        &self,
        model_input: &str,
        fields: &[FieldSpec],
    ) -> Result<GeneratedFile, ScaffoldError> {
        self.generate_at(model_input, fields, Utc::now())
    }

    /// Generate a migration stamped with `timestamp`
    ///
    /// # Errors
    ///
    /// Returns an error if `fields` is empty, the model name is invalid, a
    /// constraint does not fit its column type, or rendering fails.
    pub fn generate_at(
        &self,
        model_input: &str,
        fields: &[FieldSpec],
        timestamp: DateTime<Utc>,
    ) -> Result<GeneratedFile, ScaffoldError> {
        if fields.is_empty() {
            return Err(ScaffoldError::NoFields);
        }
        let target = ModelTarget::resolve(&self.settings, model_input)?;

        let columns = fields
            .iter()
            .map(|field| self.column_line(field))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let context: RenderContext = [
            ("table".to_string(), target.table.clone()),
            ("columns".to_string(), columns),
        ]
        .into_iter()
        .collect();

        let content = self.renderer.render("migration", &context)?;
        let file_name = format!(
            "{}_create_{}_table.php",
            timestamp.format("%Y_%m_%d_%H%M%S"),
            target.table
        );

        Ok(GeneratedFile {
            path: self.settings.migrations_dir.join(file_name),
            content,
            description: format!("Migration for {} table", target.table),
        })
    }

    /// Render the schema builder line for one field
    fn column_line(&self, field: &FieldSpec) -> Result<String, ScaffoldError> {
        let column = TemplateHelpers::php_string(&field.column_name());
        let method = field.column_type.as_str();
        let constraint = field.constraint.as_deref();

        let invalid = |reason: &str| ScaffoldError::InvalidConstraint {
            field: field.name.clone(),
            constraint: constraint.unwrap_or_default().to_string(),
            reason: reason.to_string(),
        };

        let call = match field.column_type {
            ColumnType::String | ColumnType::Char => match constraint {
                Some(length) => {
                    let length: NonZeroU32 = length
                        .trim()
                        .parse()
                        .map_err(|_| invalid("length must be a positive integer"))?;
                    format!("{method}({column}, {length})")
                }
                None => format!("{method}({column})"),
            },
            ColumnType::Decimal | ColumnType::Double | ColumnType::Float => match constraint {
                Some(spec) => {
                    let numbers = spec
                        .split(',')
                        .map(|n| n.trim().parse::<u32>())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|_| invalid("expected precision or precision,scale"))?;
                    if numbers.len() > 2 {
                        return Err(invalid("expected precision or precision,scale"));
                    }
                    let args = numbers
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{method}({column}, {args})")
                }
                None => format!("{method}({column})"),
            },
            ColumnType::Enum => {
                let values: Vec<&str> = constraint
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .collect();
                if values.is_empty() {
                    return Err(invalid("enum columns need comma-separated allowed values"));
                }
                format!("{method}({column}, [{}])", TemplateHelpers::php_list(values))
            }
            ColumnType::ForeignId => {
                let relation = Relation::for_field(field, &self.base_namespace);
                format!(
                    "{method}({column})->constrained({})",
                    TemplateHelpers::php_string(&relation.referenced_table())
                )
            }
            _ => {
                if constraint.is_some() {
                    tracing::warn!(
                        field = %field.name,
                        column_type = %field.column_type,
                        "constraint ignored for this column type"
                    );
                }
                format!("{method}({column})")
            }
        };

        Ok(format!("{COLUMN_INDENT}$table->{call};"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> StubforgeConfig {
        StubforgeConfig::default()
    }

    fn field(token: &str) -> FieldSpec {
        FieldSpec::parse(token).unwrap()
    }

    #[test]
    fn test_target_root_namespace() {
        let target = ModelTarget::resolve(&ScaffoldSettings::default(), "Post").unwrap();
        assert!(target.segments.is_empty());
        assert_eq!(target.namespace, "App\\Models");
        assert_eq!(target.path, PathBuf::from("app/Models/Post.php"));
        assert_eq!(target.table, "posts");
    }

    #[test]
    fn test_target_rejects_invalid_names() {
        let settings = ScaffoldSettings::default();
        for input in ["", "/", "9Lives", "Admin/Post$", "Blog Post!"] {
            assert!(
                matches!(
                    ModelTarget::resolve(&settings, input),
                    Err(ScaffoldError::InvalidModelName(_))
                ),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_generate_model() {
        let generator = ModelGenerator::new(&config()).unwrap();
        let fields = vec![
            field("title:string"),
            field("password:string:password"),
            field("published_at:dateTime:datetime-local"),
            field("user_id:foreignId:select:users"),
        ];

        let file = generator.generate("Blog/Post", &fields).unwrap();
        assert_eq!(file.path, PathBuf::from("app/Models/Blog/Post.php"));
        assert!(file.content.contains("namespace App\\Models\\Blog;"));
        assert!(file.content.contains("class Post extends Model"));
        assert!(file.content.contains("protected $table = 'posts';"));
        assert!(file
            .content
            .contains("protected $fillable = ['title', 'password', 'published_at', 'user_id'];"));
        assert!(file.content.contains("protected $hidden = ['password'];"));
        assert!(file.content.contains("'published_at' => 'datetime:Y-m-d H:i:s',"));
        assert!(file.content.contains("use Illuminate\\Database\\Eloquent\\Relations\\BelongsTo;"));
        assert!(file.content.contains("public function user(): BelongsTo"));
        assert!(file.content.contains("$this->belongsTo(\\App\\Models\\User::class);"));
    }

    #[test]
    fn test_generate_model_without_relations_skips_import() {
        let generator = ModelGenerator::new(&config()).unwrap();
        let file = generator.generate("Tag", &[field("name:string")]).unwrap();
        assert!(!file.content.contains("BelongsTo"));
        assert!(file.content.contains("protected $hidden = [];"));
    }

    #[test]
    fn test_generate_model_requires_fields() {
        let generator = ModelGenerator::new(&config()).unwrap();
        assert!(matches!(generator.generate("Post", &[]), Err(ScaffoldError::NoFields)));
    }

    #[test]
    fn test_generate_model_with_custom_renderer() {
        let mut renderer = StubRenderer::new().unwrap();
        renderer.register("model", "{{class}}:{{fillable}}").unwrap();
        let generator = ModelGenerator::new(&config()).unwrap().with_renderer(renderer);

        let file = generator.generate("Post", &[field("title:string")]).unwrap();
        assert_eq!(file.content, "Post:'title'");
    }

    #[test]
    fn test_generate_model_with_broken_override_reports_stub_error() {
        let mut renderer = StubRenderer::new().unwrap();
        renderer.register("model", "{{class}} {{author}}").unwrap();
        let generator = ModelGenerator::new(&config()).unwrap().with_renderer(renderer);

        let err = generator.generate("Post", &[field("title:string")]).unwrap_err();
        assert!(matches!(err, ScaffoldError::Stub(_)));
    }

    #[test]
    fn test_generate_migration() {
        let generator = MigrationGenerator::new(&config()).unwrap();
        let fields = vec![
            field("title:string::120"),
            field("price:decimal::8,2"),
            field("status:enum:select:draft, published"),
            field("author_id:foreignId"),
            field("owner_id:foreignId::admin/staff_members"),
            field("published_at:dateTime"),
        ];
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let file = generator.generate_at("Post", &fields, timestamp).unwrap();
        assert_eq!(
            file.path,
            PathBuf::from("database/migrations/2024_03_09_140507_create_posts_table.php")
        );
        for line in [
            "$table->string('title', 120);",
            "$table->decimal('price', 8, 2);",
            "$table->enum('status', ['draft', 'published']);",
            "$table->foreignId('author_id')->constrained('authors');",
            "$table->foreignId('owner_id')->constrained('staff_members');",
            "$table->dateTime('published_at');",
        ] {
            assert!(file.content.contains(line), "missing {line}");
        }
    }

    #[test]
    fn test_migration_rejects_bad_constraints() {
        let generator = MigrationGenerator::new(&config()).unwrap();
        for token in [
            "title:string::long",
            "title:string::0",
            "code:char::-3",
            "price:decimal::8,2,1",
            "status:enum",
        ] {
            let err = generator.generate("Post", &[field(token)]).unwrap_err();
            assert!(
                matches!(err, ScaffoldError::InvalidConstraint { .. }),
                "accepted {token}"
            );
        }
    }
}
