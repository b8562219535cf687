//! Field-to-cast compilation
//!
//! Cast selection is a table lookup keyed by `(ColumnType, InputType)`. The
//! table is built once from [`CastRule::derive`] and every compile reads from
//! it, so identical pairs always produce identical casts.
//!
//! Input-driven rules (`month`, `week`) take precedence over column-driven
//! ones, and foreign keys never receive a cast: they become relations.

use super::field_type::{ColumnType, FieldSpec, InputType};
use super::helpers::TemplateHelpers;
use crate::config::DateFormats;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Cast pattern for fields edited through a `week` input (ISO year and week)
pub const WEEK_CAST: &str = r"date:o-\WW";

/// Timestamp columns that always receive a datetime cast
pub const TIMESTAMP_COLUMNS: [&str; 2] = ["created_at", "updated_at"];

/// Indentation of one cast line inside the generated `casts()` method
const CAST_INDENT: &str = "            ";

/// Cast applied to a model attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastRule {
    /// `date:<date format>`
    Date,
    /// `datetime:<time format>`
    Time,
    /// `datetime:<datetime format>`
    DateTime,
    /// `date:<month format>`
    Month,
    /// Fixed ISO-week pattern
    Week,
    /// `integer`
    Integer,
    /// `float`
    Float,
    /// `double`
    Double,
    /// `boolean`
    Boolean,
    /// `string`
    String,
}

impl CastRule {
    /// Rule for a column/input pair, evaluated without the table
    #[must_use]
    pub fn derive(column: ColumnType, input: InputType) -> Option<Self> {
        if column == ColumnType::ForeignId {
            return None;
        }

        match input {
            InputType::Month => return Some(Self::Month),
            InputType::Week => return Some(Self::Week),
            _ => {}
        }

        match column {
            ColumnType::Date => Some(Self::Date),
            ColumnType::Time => Some(Self::Time),
            ColumnType::Year => Some(Self::Integer),
            ColumnType::DateTime => Some(Self::DateTime),
            ColumnType::Float => Some(Self::Float),
            ColumnType::Double => Some(Self::Double),
            ColumnType::Boolean => Some(Self::Boolean),
            c if c.is_integer_family() => Some(Self::Integer),
            ColumnType::String | ColumnType::Text | ColumnType::Char
                if input != InputType::File =>
            {
                Some(Self::String)
            }
            _ => None,
        }
    }

    /// Render the rule as the cast string written to the model
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::config::DateFormats;
    /// # use stubforge::scaffold::CastRule;
    /// let formats = DateFormats::default();
    /// assert_eq!(CastRule::DateTime.render(&formats), "datetime:Y-m-d H:i:s");
    /// assert_eq!(CastRule::Boolean.render(&formats), "boolean");
    /// ```
    #[must_use]
    pub fn render(self, formats: &DateFormats) -> String {
        match self {
            Self::Date => format!("date:{}", formats.date),
            Self::Time => format!("datetime:{}", formats.time),
            Self::DateTime => format!("datetime:{}", formats.datetime),
            Self::Month => format!("date:{}", formats.month),
            Self::Week => WEEK_CAST.to_string(),
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Double => "double".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::String => "string".to_string(),
        }
    }
}

static CAST_TABLE: Lazy<HashMap<(ColumnType, InputType), CastRule>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for column in ColumnType::ALL {
        for input in InputType::ALL {
            if let Some(rule) = CastRule::derive(column, input) {
                table.insert((column, input), rule);
            }
        }
    }
    table
});

/// Look up the cast for a column/input pair
#[must_use]
pub fn cast_for(column: ColumnType, input: InputType) -> Option<CastRule> {
    CAST_TABLE.get(&(column, input)).copied()
}

/// A `belongsTo` association generated for a foreign key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Method name on the model
    pub method: String,
    /// Fully qualified class of the referenced model, leading backslash included
    pub model_path: String,
    /// Explicit foreign key argument
    pub foreign_key: Option<String>,
}

impl Relation {
    /// Resolve the relation for a foreign key field
    ///
    /// The referenced model comes from the constraint when present
    /// (`users`, `Admin/Category`, `shop/order_items`), otherwise from the
    /// field name with its `_id` suffix removed.
    #[must_use]
    pub fn for_field(field: &FieldSpec, base_namespace: &str) -> Self {
        let column = field.column_name();
        let method = TemplateHelpers::to_relation_name(&column);

        let reference = field
            .constraint
            .clone()
            .unwrap_or_else(|| TemplateHelpers::to_snake_case(&method));
        let (segments, noun) = TemplateHelpers::split_model_path(&reference);
        let class = TemplateHelpers::to_class_name(&noun);

        let mut model_path = format!("\\{}", base_namespace.trim_matches('\\'));
        for segment in segments {
            model_path.push('\\');
            model_path.push_str(&segment);
        }
        model_path.push('\\');
        model_path.push_str(&class);

        Self {
            method,
            model_path,
            foreign_key: field.foreign_id_column.clone(),
        }
    }

    /// Referenced table, used by migrations
    #[must_use]
    pub fn referenced_table(&self) -> String {
        let class = self.model_path.rsplit('\\').next().unwrap_or_default();
        TemplateHelpers::to_table_name(class)
    }

    /// Render the method body
    #[must_use]
    pub fn render(&self) -> String {
        let target = self.foreign_key.as_ref().map_or_else(
            || format!("{}::class", self.model_path),
            |fk| format!("{}::class, {}", self.model_path, TemplateHelpers::php_string(fk)),
        );
        format!(
            "\n    public function {}(): BelongsTo\n    {{\n        return $this->belongsTo({target});\n    }}",
            self.method
        )
    }
}

/// Output of [`CastCompiler::compile`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledModel {
    /// Fillable literal: `'a', 'b'`, one entry per field in input order
    pub fillable: String,
    /// Hidden literal, one entry per password field
    pub hidden: String,
    /// Cast map lines in first-seen column order; `created_at` and
    /// `updated_at` are upserted, so a declared one keeps its position
    pub casts: String,
    /// Relation method bodies, one per foreign key
    pub relations: String,
    /// Structured relations, for callers that need more than text
    pub relation_list: Vec<Relation>,
}

/// Compiles field lists into model fragments
#[derive(Debug, Clone)]
pub struct CastCompiler {
    formats: DateFormats,
    base_namespace: String,
}

impl CastCompiler {
    /// Create a compiler for the given formats and model namespace
    #[must_use]
    pub fn new(formats: DateFormats, base_namespace: impl Into<String>) -> Self {
        Self {
            formats,
            base_namespace: base_namespace.into(),
        }
    }

    /// Formats used when rendering casts
    #[must_use]
    pub const fn formats(&self) -> &DateFormats {
        &self.formats
    }

    /// Compile an ordered field list
    ///
    /// Cast entries are keyed by column name; a repeated name overwrites the
    /// earlier entry in place. The timestamp casts are upserted the same
    /// way: appended when undeclared, otherwise replaced where they stand.
    #[must_use]
    pub fn compile(&self, fields: &[FieldSpec]) -> CompiledModel {
        let columns: Vec<String> = fields.iter().map(FieldSpec::column_name).collect();

        let hidden: Vec<&str> = fields
            .iter()
            .zip(&columns)
            .filter(|(field, _)| field.input_type == InputType::Password)
            .map(|(_, column)| column.as_str())
            .collect();

        let mut casts: Vec<(String, String)> = Vec::new();
        let mut relations = Vec::new();

        for (field, column) in fields.iter().zip(&columns) {
            if field.column_type == ColumnType::ForeignId {
                relations.push(Relation::for_field(field, &self.base_namespace));
                continue;
            }
            if let Some(rule) = cast_for(field.column_type, field.input_type) {
                upsert(&mut casts, column, rule.render(&self.formats));
            } else {
                tracing::trace!(field = %column, column_type = %field.column_type, "no cast");
            }
        }

        for column in TIMESTAMP_COLUMNS {
            upsert(&mut casts, column, CastRule::DateTime.render(&self.formats));
        }

        let mut cast_lines = String::new();
        for (idx, (column, cast)) in casts.iter().enumerate() {
            if idx > 0 {
                cast_lines.push('\n');
            }
            let _ = write!(
                cast_lines,
                "{CAST_INDENT}{} => {},",
                TemplateHelpers::php_string(column),
                TemplateHelpers::php_string(cast)
            );
        }

        CompiledModel {
            fillable: TemplateHelpers::php_list(&columns),
            hidden: TemplateHelpers::php_list(hidden),
            casts: cast_lines,
            relations: relations
                .iter()
                .map(Relation::render)
                .collect::<Vec<_>>()
                .join("\n"),
            relation_list: relations,
        }
    }
}

fn upsert(casts: &mut Vec<(String, String)>, column: &str, cast: String) {
    if let Some(entry) = casts.iter_mut().find(|(existing, _)| existing == column) {
        entry.1 = cast;
    } else {
        casts.push((column.to_string(), cast));
    }
}
