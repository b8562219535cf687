//! Integration tests for the make and stubs commands

use std::fs;
use std::path::PathBuf;
use stubforge_cli_lib::commands::make::{ModelInput, WriteFlags};
use stubforge_cli_lib::commands::stubs::publish;
use stubforge_cli_lib::{MakeCommand, Project, WriteOutcome};
use tempfile::TempDir;

fn model_command(dir: &TempDir, fields: &[&str], force: bool, dry_run: bool) -> (Project, MakeCommand) {
    let project = Project::load(dir.path(), None).unwrap();
    let command = MakeCommand::Model {
        input: ModelInput {
            model: Some("Blog/Post".to_string()),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            spec: None,
        },
        migration: true,
        write: WriteFlags { force, dry_run },
    };
    (project, command)
}

fn migration_files(dir: &TempDir) -> Vec<PathBuf> {
    fs::read_dir(dir.path().join("database/migrations"))
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

#[test]
fn test_make_model_with_migration_writes_both_files() {
    let dir = TempDir::new().unwrap();
    let (project, command) = model_command(
        &dir,
        &["title:string:text:120", "published_at:dateTime", "author_id:foreignId:select:users"],
        false,
        false,
    );

    let outcomes = command.execute(&project).unwrap();
    assert_eq!(outcomes, vec![WriteOutcome::Created, WriteOutcome::Created]);

    let model = fs::read_to_string(dir.path().join("app/Models/Blog/Post.php")).unwrap();
    assert!(model.contains("namespace App\\Models\\Blog;"));
    assert!(model.contains("protected $fillable = ['title', 'published_at', 'author_id'];"));
    assert!(model.contains("'published_at' => 'datetime:Y-m-d H:i:s',"));
    assert!(model.contains("public function author(): BelongsTo"));

    let migrations = migration_files(&dir);
    assert_eq!(migrations.len(), 1);
    let migration = fs::read_to_string(&migrations[0]).unwrap();
    assert!(migration.contains("$table->string('title', 120);"));
    assert!(migration.contains("$table->foreignId('author_id')->constrained('users');"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let (project, command) = model_command(&dir, &["title:string"], false, true);

    let outcomes = command.execute(&project).unwrap();
    assert!(outcomes.iter().all(|o| *o == WriteOutcome::Planned));
    assert!(!dir.path().join("app").exists());
    assert!(migration_files(&dir).is_empty());
}

#[test]
fn test_force_replaces_changed_model() {
    let dir = TempDir::new().unwrap();
    let model_path = dir.path().join("app/Models/Blog/Post.php");
    fs::create_dir_all(model_path.parent().unwrap()).unwrap();
    fs::write(&model_path, "<?php // hand edited\n").unwrap();

    let (project, command) = model_command(&dir, &["title:string"], true, false);
    let outcomes = command.execute(&project).unwrap();

    assert_eq!(outcomes[0], WriteOutcome::Overwritten);
    assert!(fs::read_to_string(&model_path).unwrap().contains("class Post extends Model"));
}

#[test]
fn test_invalid_field_token_fails_before_writing() {
    let dir = TempDir::new().unwrap();
    let (project, command) = model_command(&dir, &["title:varchar"], false, false);

    assert!(command.execute(&project).is_err());
    assert!(!dir.path().join("app").exists());
}

#[test]
fn test_published_stub_override_is_used_for_generation() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("stubforge.toml"), "[scaffold]\nstub_dir = \"stubs\"\n").unwrap();

    let project = Project::load(dir.path(), None).unwrap();
    publish(&project, None, false).unwrap();
    fs::write(
        dir.path().join("stubs/model.stub"),
        "<?php // {{class}} in {{namespace}}: {{fillable}}\n",
    )
    .unwrap();

    let (project, command) = model_command(&dir, &["title:string"], false, false);
    let MakeCommand::Model { input, write, .. } = command else {
        unreachable!()
    };
    MakeCommand::Model {
        input,
        migration: false,
        write,
    }
    .execute(&project)
    .unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("app/Models/Blog/Post.php")).unwrap(),
        "<?php // Post in App\\Models\\Blog: 'title'\n"
    );
}

#[test]
fn test_config_comes_from_project_root_not_working_directory() {
    let launch_dir = TempDir::new().unwrap();
    let project_dir = TempDir::new().unwrap();
    fs::write(
        launch_dir.path().join("stubforge.toml"),
        "[scaffold]\nbase_namespace = \"Leaked\\\\Ns\"\n",
    )
    .unwrap();

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(launch_dir.path()).unwrap();
    let loaded = Project::load(project_dir.path(), None);
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().config.scaffold.base_namespace, "App\\Models");
}
