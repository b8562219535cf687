//! Integration tests for field compilation and model/migration generation

use proptest::prelude::*;
use stubforge::config::{DateFormats, StubforgeConfig};
use stubforge::scaffold::{
    CastCompiler, ColumnType, FieldSpec, InputType, MigrationGenerator, ModelGenerator, ModelSpec,
    StubError, StubRenderer, TemplateHelpers,
};

fn compiler() -> CastCompiler {
    CastCompiler::new(DateFormats::default(), "App\\Models")
}

fn arb_field() -> impl Strategy<Value = FieldSpec> {
    (
        "[a-z]{1,8}(_[a-z]{4,8})?",
        0..ColumnType::ALL.len(),
        0..InputType::ALL.len(),
    )
        .prop_map(|(name, column, input)| {
            FieldSpec::new(name, ColumnType::ALL[column]).with_input(InputType::ALL[input])
        })
}

proptest! {
    #[test]
    fn fillable_has_one_entry_per_field_in_order(fields in prop::collection::vec(arb_field(), 1..12)) {
        let compiled = compiler().compile(&fields);
        let entries: Vec<&str> = compiled.fillable.split(", ").collect();

        prop_assert_eq!(entries.len(), fields.len());
        for (entry, field) in entries.iter().zip(&fields) {
            prop_assert_eq!(entry.to_string(), format!("'{}'", field.column_name()));
        }
    }

    #[test]
    fn compilation_is_deterministic(fields in prop::collection::vec(arb_field(), 0..8)) {
        prop_assert_eq!(compiler().compile(&fields), compiler().compile(&fields));
    }

    #[test]
    fn timestamps_are_always_cast(fields in prop::collection::vec(arb_field(), 0..8)) {
        let compiled = compiler().compile(&fields);
        let last_two: Vec<&str> = compiled.casts.lines().rev().take(2).collect();
        prop_assert_eq!(
            last_two,
            vec![
                "            'updated_at' => 'datetime:Y-m-d H:i:s',",
                "            'created_at' => 'datetime:Y-m-d H:i:s',",
            ]
        );
    }
}

#[test]
fn test_datetime_local_cast_uses_configured_format() {
    let fields = vec![FieldSpec::new("published_at", ColumnType::DateTime).with_input(InputType::DatetimeLocal)];
    let compiled = compiler().compile(&fields);
    assert!(compiled
        .casts
        .contains("'published_at' => 'datetime:Y-m-d H:i:s',"));
}

#[test]
fn test_month_input_overrides_date_column() {
    let fields = vec![FieldSpec::parse("period:date:month").unwrap()];
    let compiled = compiler().compile(&fields);
    assert!(compiled.casts.contains("'period' => 'date:Y-m',"));
    assert!(!compiled.casts.contains("'period' => 'date:Y-m-d',"));
}

#[test]
fn test_full_model_from_spec_file() {
    let dir = tempfile::tempdir().unwrap();
    let spec_path = dir.path().join("post.toml");
    std::fs::write(
        &spec_path,
        r#"
        model = "Blog/Post"

        [[fields]]
        name = "title"
        column_type = "string"
        constraint = "200"

        [[fields]]
        name = "body"
        column_type = "text"

        [[fields]]
        name = "cover"
        column_type = "string"
        input_type = "file"

        [[fields]]
        name = "author_id"
        column_type = "foreignId"
        constraint = "users"
        foreign_id_column = "author_id"
        "#,
    )
    .unwrap();

    let spec = ModelSpec::from_file(&spec_path).unwrap();
    let config = StubforgeConfig::default();

    let model = ModelGenerator::new(&config)
        .unwrap()
        .generate(&spec.model, &spec.fields)
        .unwrap();
    assert_eq!(model.path, std::path::PathBuf::from("app/Models/Blog/Post.php"));
    assert!(model
        .content
        .contains("protected $fillable = ['title', 'body', 'cover', 'author_id'];"));
    assert!(model.content.contains("'body' => 'string',"));
    assert!(!model.content.contains("'cover' =>"));
    assert!(model
        .content
        .contains("return $this->belongsTo(\\App\\Models\\User::class, 'author_id');"));

    let migration = MigrationGenerator::new(&config)
        .unwrap()
        .generate(&spec.model, &spec.fields)
        .unwrap();
    assert!(migration
        .path
        .to_string_lossy()
        .ends_with("_create_posts_table.php"));
    assert!(migration.content.contains("$table->string('title', 200);"));
    assert!(migration
        .content
        .contains("$table->foreignId('author_id')->constrained('users');"));
}

#[test]
fn test_stub_override_directory_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("model.stub"),
        "<?php // {{namespace}}::{{class}} [{{fillable}}]\n",
    )
    .unwrap();

    let mut config = StubforgeConfig::default();
    config.scaffold.stub_dir = Some(dir.path().to_path_buf());

    let file = ModelGenerator::new(&config)
        .unwrap()
        .generate("Tag", &[FieldSpec::parse("name:string").unwrap()])
        .unwrap();
    assert_eq!(file.content, "<?php // App\\Models::Tag ['name']\n");
}

#[test]
fn test_unknown_stub_propagates() {
    let renderer = StubRenderer::new().unwrap();
    let err = renderer
        .render("controller", &std::collections::BTreeMap::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown stub: controller");
    assert!(matches!(err, StubError::UnknownStub(_)));
}

#[test]
fn test_parallel_arrays_feed_the_generator() {
    let names: Vec<String> = ["Title", "Is Active", "category_id"].map(String::from).to_vec();
    let columns: Vec<String> = ["string", "boolean", "foreignId"].map(String::from).to_vec();
    let inputs: Vec<String> = ["text", "checkbox", "select"].map(String::from).to_vec();

    let fields = FieldSpec::from_parallel(&names, &columns, &inputs, &[], &[]).unwrap();
    let compiled = compiler().compile(&fields);

    assert_eq!(compiled.fillable, "'title', 'is_active', 'category_id'");
    assert!(compiled.casts.contains("'is_active' => 'boolean',"));
    assert_eq!(compiled.relation_list.len(), 1);
    assert_eq!(compiled.relation_list[0].method, "category");
    assert_eq!(TemplateHelpers::to_table_name("Category"), "categories");
}
