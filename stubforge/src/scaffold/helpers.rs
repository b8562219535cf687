//! Naming helpers for code generation
//!
//! Case conversion and pluralization come from `Inflector`; the rest derives
//! class names, namespaces and table names the way the target framework
//! expects them.

use inflector::Inflector;

/// Naming helpers shared by the generators
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `snake_case`
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_snake_case("BlogPost"), "blog_post");
    /// assert_eq!(TemplateHelpers::to_snake_case("Published At"), "published_at");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to `StudlyCase` (`PascalCase`)
    #[must_use]
    pub fn to_studly_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Convert string to camelCase
    #[must_use]
    pub fn to_camel_case(input: &str) -> String {
        input.to_camel_case()
    }

    /// Pluralize a word
    ///
    /// The inflector has known gaps with irregular plurals; model names are
    /// expected to be regular nouns.
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Singularize a word
    #[must_use]
    pub fn singularize(input: &str) -> String {
        input.to_singular()
    }

    /// Convert a class name to its table name (`snake_case` plural)
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_table_name("Post"), "posts");
    /// assert_eq!(TemplateHelpers::to_table_name("UserProfile"), "user_profiles");
    /// assert_eq!(TemplateHelpers::to_table_name("Category"), "categories");
    /// ```
    #[must_use]
    pub fn to_table_name(class: &str) -> String {
        Self::pluralize(&Self::to_snake_case(class))
    }

    /// Convert a table name (or any noun) back to a class name
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_class_name("users"), "User");
    /// assert_eq!(TemplateHelpers::to_class_name("blog_posts"), "BlogPost");
    /// assert_eq!(TemplateHelpers::to_class_name("Category"), "Category");
    /// ```
    #[must_use]
    pub fn to_class_name(noun: &str) -> String {
        let snake = Self::to_snake_case(noun);
        let (head, last) = snake.rsplit_once('_').map_or(("", snake.as_str()), |(h, l)| (h, l));
        let singular_last = Self::singularize(last);
        let joined = if head.is_empty() {
            singular_last
        } else {
            format!("{head}_{singular_last}")
        };
        Self::to_studly_case(&joined)
    }

    /// Split a slash-separated model input into namespace segments and class
    ///
    /// Backslashes are accepted as separators too. Empty segments are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// let (segments, class) = TemplateHelpers::split_model_path("admin/blog_post");
    /// assert_eq!(segments, vec!["Admin".to_string()]);
    /// assert_eq!(class, "BlogPost");
    /// ```
    #[must_use]
    pub fn split_model_path(input: &str) -> (Vec<String>, String) {
        let mut segments: Vec<String> = input
            .split(['/', '\\'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::to_studly_case)
            .collect();
        let class = segments.pop().unwrap_or_default();
        (segments, class)
    }

    /// Relation method name for a foreign key column
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_relation_name("author_id"), "author");
    /// assert_eq!(TemplateHelpers::to_relation_name("parent_category_id"), "parentCategory");
    /// assert_eq!(TemplateHelpers::to_relation_name("owner"), "owner");
    /// ```
    #[must_use]
    pub fn to_relation_name(column: &str) -> String {
        let snake = Self::to_snake_case(column);
        let base = snake.strip_suffix("_id").unwrap_or(&snake);
        Self::to_camel_case(base)
    }

    /// Quote a value as a single-quoted PHP string literal
    ///
    /// # Examples
    ///
    /// ```
    /// # use stubforge::scaffold::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::php_string("title"), "'title'");
    /// assert_eq!(TemplateHelpers::php_string("o'clock"), r"'o\'clock'");
    /// assert_eq!(TemplateHelpers::php_string(r"date:o-\WW"), r"'date:o-\\WW'");
    /// ```
    #[must_use]
    pub fn php_string(value: &str) -> String {
        let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
        format!("'{escaped}'")
    }

    /// Join items as a PHP array body: `'a', 'b'`
    #[must_use]
    pub fn php_list<I, S>(items: I) -> String
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|item| Self::php_string(item.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
