//! Field type definitions and parser for CRUD scaffolding
//!
//! A field pairs a database column type with the HTML input used to edit it.
//! Both matter: the column decides the migration line, and the pair decides
//! the cast emitted on the model.
//!
//! # Token Format
//!
//! `name:columnType[:inputType[:constraint[:foreignIdColumn]]]`
//!
//! Empty segments fall back to defaults, so a constraint can be given without
//! naming the input type.
//!
//! # Examples
//!
//! ```text
//! title:string                         → string column, text input
//! body:text                            → text column, textarea input
//! published_at:dateTime:datetime-local → dateTime column
//! period:date:month                    → date column edited month by month
//! price:decimal::8,2                   → decimal(8, 2)
//! status:enum:select:draft,published   → enum column
//! author_id:foreignId::users           → foreign key to users, author() relation
//! password:string:password             → hidden on the model
//! ```

use super::ScaffoldError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Database column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnType {
    /// VARCHAR
    String,
    /// INTEGER
    Integer,
    /// TEXT
    Text,
    /// BIGINT
    #[serde(alias = "biginteger")]
    BigInteger,
    /// BOOLEAN
    Boolean,
    /// CHAR
    Char,
    /// DATE
    Date,
    /// TIME
    Time,
    /// YEAR
    Year,
    /// DATETIME
    #[serde(alias = "datetime")]
    DateTime,
    /// DECIMAL
    Decimal,
    /// DOUBLE
    Double,
    /// ENUM
    Enum,
    /// FLOAT
    Float,
    /// Unsigned BIGINT referencing another table
    #[serde(alias = "foreignid")]
    ForeignId,
    /// TINYINT
    #[serde(alias = "tinyinteger")]
    TinyInteger,
    /// MEDIUMINT
    #[serde(alias = "mediuminteger")]
    MediumInteger,
    /// TINYTEXT
    #[serde(alias = "tinytext")]
    TinyText,
    /// MEDIUMTEXT
    #[serde(alias = "mediumtext")]
    MediumText,
    /// LONGTEXT
    #[serde(alias = "longtext")]
    LongText,
}

impl ColumnType {
    /// Every column type, in declaration order
    pub const ALL: [Self; 20] = [
        Self::String,
        Self::Integer,
        Self::Text,
        Self::BigInteger,
        Self::Boolean,
        Self::Char,
        Self::Date,
        Self::Time,
        Self::Year,
        Self::DateTime,
        Self::Decimal,
        Self::Double,
        Self::Enum,
        Self::Float,
        Self::ForeignId,
        Self::TinyInteger,
        Self::MediumInteger,
        Self::TinyText,
        Self::MediumText,
        Self::LongText,
    ];

    /// Schema builder method name, which doubles as the canonical spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::BigInteger => "bigInteger",
            Self::Boolean => "boolean",
            Self::Char => "char",
            Self::Date => "date",
            Self::Time => "time",
            Self::Year => "year",
            Self::DateTime => "dateTime",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Enum => "enum",
            Self::Float => "float",
            Self::ForeignId => "foreignId",
            Self::TinyInteger => "tinyInteger",
            Self::MediumInteger => "mediumInteger",
            Self::TinyText => "tinyText",
            Self::MediumText => "mediumText",
            Self::LongText => "longText",
        }
    }

    /// Whether the type name contains `integer` (any width)
    #[must_use]
    pub fn is_integer_family(self) -> bool {
        self.as_str().to_ascii_lowercase().contains("integer")
    }

    /// Input type used when a field does not name one
    #[must_use]
    pub const fn default_input(self) -> InputType {
        match self {
            Self::String | Self::Char => InputType::Text,
            Self::Text | Self::TinyText | Self::MediumText | Self::LongText => InputType::Textarea,
            Self::Integer
            | Self::BigInteger
            | Self::TinyInteger
            | Self::MediumInteger
            | Self::Year
            | Self::Decimal
            | Self::Double
            | Self::Float => InputType::Number,
            Self::Boolean => InputType::Checkbox,
            Self::Date => InputType::Date,
            Self::Time => InputType::Time,
            Self::DateTime => InputType::DatetimeLocal,
            Self::Enum | Self::ForeignId => InputType::Select,
        }
    }
}

impl FromStr for ColumnType {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ScaffoldError::UnknownColumnType(needle.to_string()))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTML input used to edit a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    /// `text`
    Text,
    /// `textarea`
    Textarea,
    /// `email`
    Email,
    /// `password`
    Password,
    /// `number`
    Number,
    /// `range`
    Range,
    /// `date`
    Date,
    /// `time`
    Time,
    /// `datetime-local`
    DatetimeLocal,
    /// `month`
    Month,
    /// `week`
    Week,
    /// `color`
    Color,
    /// `tel`
    Tel,
    /// `url`
    Url,
    /// `search`
    Search,
    /// `file`
    File,
    /// `checkbox`
    Checkbox,
    /// `radio`
    Radio,
    /// `select`
    Select,
    /// `hidden`
    Hidden,
}

impl InputType {
    /// Every input type, in declaration order
    pub const ALL: [Self; 20] = [
        Self::Text,
        Self::Textarea,
        Self::Email,
        Self::Password,
        Self::Number,
        Self::Range,
        Self::Date,
        Self::Time,
        Self::DatetimeLocal,
        Self::Month,
        Self::Week,
        Self::Color,
        Self::Tel,
        Self::Url,
        Self::Search,
        Self::File,
        Self::Checkbox,
        Self::Radio,
        Self::Select,
        Self::Hidden,
    ];

    /// HTML attribute value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Password => "password",
            Self::Number => "number",
            Self::Range => "range",
            Self::Date => "date",
            Self::Time => "time",
            Self::DatetimeLocal => "datetime-local",
            Self::Month => "month",
            Self::Week => "week",
            Self::Color => "color",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Search => "search",
            Self::File => "file",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Hidden => "hidden",
        }
    }
}

impl FromStr for InputType {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|input| input.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ScaffoldError::UnknownInputType(needle.to_string()))
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a model, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSpec")]
pub struct FieldSpec {
    /// Field name as submitted; see [`FieldSpec::column_name`]
    pub name: String,
    /// Database column type
    pub column_type: ColumnType,
    /// Input used to edit the field
    pub input_type: InputType,
    /// Column-type specific argument (length, precision, enum values, referenced table)
    pub constraint: Option<String>,
    /// Explicit foreign key passed to the generated relation
    pub foreign_id_column: Option<String>,
}

/// Deserialization shape where the input type may be omitted
#[derive(Deserialize)]
struct RawFieldSpec {
    name: String,
    column_type: ColumnType,
    #[serde(default)]
    input_type: Option<InputType>,
    #[serde(default)]
    constraint: Option<String>,
    #[serde(default)]
    foreign_id_column: Option<String>,
}

impl TryFrom<RawFieldSpec> for FieldSpec {
    type Error = ScaffoldError;

    fn try_from(raw: RawFieldSpec) -> Result<Self, Self::Error> {
        let name = raw.name.trim();
        validate_name(name).map_err(|reason| ScaffoldError::InvalidField {
            input: raw.name.clone(),
            reason,
        })?;
        Ok(Self {
            name: name.to_string(),
            column_type: raw.column_type,
            input_type: raw.input_type.unwrap_or_else(|| raw.column_type.default_input()),
            constraint: non_empty(raw.constraint.as_deref()),
            foreign_id_column: non_empty(raw.foreign_id_column.as_deref()),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

impl FieldSpec {
    /// Create a field with the column type's default input
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            input_type: column_type.default_input(),
            constraint: None,
            foreign_id_column: None,
        }
    }

    /// Set the input type
    #[must_use]
    pub const fn with_input(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    /// Set the column constraint
    #[must_use]
    pub fn with_constraint(mut self, constraint: impl Into<String>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    /// Set the explicit foreign key of the generated relation
    #[must_use]
    pub fn with_foreign_id_column(mut self, column: impl Into<String>) -> Self {
        self.foreign_id_column = Some(column.into());
        self
    }

    /// Parse a field token
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::{ColumnType, FieldSpec, InputType};
    /// let field = FieldSpec::parse("published_at:dateTime").unwrap();
    /// assert_eq!(field.column_type, ColumnType::DateTime);
    /// assert_eq!(field.input_type, InputType::DatetimeLocal);
    ///
    /// let field = FieldSpec::parse("author_id:foreignId::users:writer_id").unwrap();
    /// assert_eq!(field.constraint.as_deref(), Some("users"));
    /// assert_eq!(field.foreign_id_column.as_deref(), Some("writer_id"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token has fewer than 2 or more than 5 segments
    /// - The name is empty or contains characters other than letters, digits,
    ///   underscores and spaces
    /// - The column or input type is unknown
    pub fn parse(input: &str) -> Result<Self, ScaffoldError> {
        let parts: Vec<&str> = input.split(':').collect();

        if parts.len() < 2 || parts.len() > 5 {
            return Err(ScaffoldError::InvalidField {
                input: input.to_string(),
                reason: "expected name:columnType[:inputType[:constraint[:foreignIdColumn]]]"
                    .to_string(),
            });
        }

        let name = parts[0].trim();
        validate_name(name).map_err(|reason| ScaffoldError::InvalidField {
            input: input.to_string(),
            reason,
        })?;

        let column_type: ColumnType = parts[1].parse()?;
        let input_type = match parts.get(2).map(|s| s.trim()) {
            Some(s) if !s.is_empty() => s.parse()?,
            _ => column_type.default_input(),
        };

        Ok(Self {
            name: name.to_string(),
            column_type,
            input_type,
            constraint: non_empty(parts.get(3).copied()),
            foreign_id_column: non_empty(parts.get(4).copied()),
        })
    }

    /// Build fields from the parallel arrays of a submitted form
    ///
    /// `constraints` and `foreign_id_columns` may be empty; when non-empty they
    /// must line up with `names` like the type lists do. Empty entries mean
    /// "not given" (and an empty input type means the column default).
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::LengthMismatch`] when the lists disagree in
    /// length, or any parse error for an individual entry.
    pub fn from_parallel(
        names: &[String],
        column_types: &[String],
        input_types: &[String],
        constraints: &[String],
        foreign_id_columns: &[String],
    ) -> Result<Vec<Self>, ScaffoldError> {
        let expected = names.len();
        check_len("column_types", expected, column_types.len(), false)?;
        check_len("input_types", expected, input_types.len(), false)?;
        check_len("constraints", expected, constraints.len(), true)?;
        check_len("foreign_id_columns", expected, foreign_id_columns.len(), true)?;

        names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = name.trim();
                validate_name(name).map_err(|reason| ScaffoldError::InvalidField {
                    input: name.to_string(),
                    reason,
                })?;
                let column_type: ColumnType = column_types[idx].parse()?;
                let input_type = match input_types[idx].trim() {
                    "" => column_type.default_input(),
                    s => s.parse()?,
                };
                Ok(Self {
                    name: name.to_string(),
                    column_type,
                    input_type,
                    constraint: non_empty(constraints.get(idx).map(String::as_str)),
                    foreign_id_column: non_empty(foreign_id_columns.get(idx).map(String::as_str)),
                })
            })
            .collect()
    }

    /// Snake-cased column name used in every generated artifact
    #[must_use]
    pub fn column_name(&self) -> String {
        super::helpers::TemplateHelpers::to_snake_case(&self.name)
    }
}

fn check_len(
    list: &'static str,
    expected: usize,
    actual: usize,
    may_be_empty: bool,
) -> Result<(), ScaffoldError> {
    if actual == expected || (may_be_empty && actual == 0) {
        Ok(())
    } else {
        Err(ScaffoldError::LengthMismatch {
            list,
            expected,
            actual,
        })
    }
}

fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("field name cannot be empty".to_string());
    }
    if !name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_') {
        return Err("field name must start with a letter or underscore".to_string());
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ' ') {
        return Err("field name may only contain letters, digits, underscores and spaces".to_string());
    }
    Ok(())
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.column_type, self.input_type)?;
        match (&self.constraint, &self.foreign_id_column) {
            (Some(c), Some(fk)) => write!(f, ":{c}:{fk}"),
            (None, Some(fk)) => write!(f, "::{fk}"),
            (Some(c), None) => write!(f, ":{c}"),
            (None, None) => Ok(()),
        }
    }
}

/// A model and its fields, as loaded from a spec file
///
/// ```toml
/// model = "Blog/Post"
///
/// [[fields]]
/// name = "title"
/// column_type = "string"
///
/// [[fields]]
/// name = "author_id"
/// column_type = "foreignId"
/// constraint = "users"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Model name, optionally slash-separated into a sub-namespace
    pub model: String,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl ModelSpec {
    /// Load a spec from a `.toml` or `.json` file
    pub fn from_file(path: &Path) -> Result<Self, ScaffoldError> {
        let raw = std::fs::read_to_string(path)?;
        let invalid = |reason: String| ScaffoldError::InvalidSpec {
            path: path.to_path_buf(),
            reason,
        };

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))
        } else {
            toml::from_str(&raw).map_err(|e| invalid(e.to_string()))
        }
    }
}
