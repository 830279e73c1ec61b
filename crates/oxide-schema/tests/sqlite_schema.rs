//! End-to-end tests against an in-memory SQLite database.

use std::io::Write;

use oxide_schema::prelude::*;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

async fn create_test_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

async fn column_names(pool: &SqlitePool, table: &str) -> Vec<String> {
    sqlx::query_scalar(&format!("SELECT name FROM pragma_table_info('{table}') ORDER BY cid"))
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_create_alter_drop_lifecycle() {
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite);

    assert!(!schema.has_table("users").await);

    schema
        .create("users", |t| {
            t.id();
            t.string("email", None).unique();
            t.string("name", 100);
            t.boolean("active").default(true);
            t.timestamps();
        })
        .await
        .unwrap();
    assert!(schema.has_table("users").await);

    schema
        .table("users", |t| {
            t.add_string("phone", 20).nullable();
            t.rename_column("name", "full_name");
        })
        .await
        .unwrap();
    assert_eq!(
        column_names(&pool, "users").await,
        [
            "id",
            "email",
            "full_name",
            "active",
            "created_at",
            "updated_at",
            "phone"
        ]
    );

    schema.rename("users", "members").await.unwrap();
    assert!(!schema.has_table("users").await);
    assert!(schema.has_table("members").await);

    schema.drop("members").await.unwrap();
    assert!(!schema.has_table("members").await);
    schema.drop_if_exists("members").await.unwrap();
}

#[tokio::test]
async fn test_defaults_are_applied_by_sqlite() {
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite);

    schema
        .create("notes", |t| {
            t.increments("id");
            t.string("title", None).default("it's untitled");
            t.boolean("pinned").default(false);
        })
        .await
        .unwrap();

    sqlx::query("INSERT INTO notes DEFAULT VALUES")
        .execute(&pool)
        .await
        .unwrap();
    let (title, pinned): (String, bool) = sqlx::query_as("SELECT title, pinned FROM notes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(title, "it's untitled");
    assert!(!pinned);
}

#[tokio::test]
async fn test_failure_keeps_earlier_statements() {
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite);

    schema
        .create("users", |t| {
            t.id();
        })
        .await
        .unwrap();

    let err = schema
        .table("users", |t| {
            t.add_text("bio").nullable();
            t.drop_column(&["missing"]);
            t.add_text("motto").nullable();
        })
        .await
        .unwrap_err();

    assert_eq!(err.failed_position(), Some(1));
    assert_eq!(column_names(&pool, "users").await, ["id", "bio"]);
}

#[tokio::test]
async fn test_unsupported_alteration_runs_nothing() {
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite);
    schema
        .create("users", |t| {
            t.id();
        })
        .await
        .unwrap();

    let err = schema
        .table("users", |t| {
            t.add_text("bio").nullable();
            t.drop_unique(&["email"]);
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SchemaError::Compile(_)));
    assert_eq!(column_names(&pool, "users").await, ["id"]);
}

#[tokio::test]
async fn test_dry_run_leaves_database_untouched() {
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite).dry_run(true);

    let statements = schema
        .create("users", |t| {
            t.id();
        })
        .await
        .unwrap();

    assert_eq!(
        statements,
        ["CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT)"]
    );
    assert!(!schema.has_table("users").await);
}

#[tokio::test]
async fn test_manifest_file_is_applied_in_order() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{
                "table": "teams",
                "columns": [{{ "name": "id", "type": "id" }}, {{ "name": "name", "type": "string" }}]
            }},
            {{
                "table": "users",
                "columns": [
                    {{ "name": "id", "type": "id" }},
                    {{ "name": "team_id", "type": "foreign_id", "index": true,
                       "references": {{ "table": "teams", "on_delete": "cascade" }} }}
                ]
            }},
            {{
                "table": "users",
                "mode": "alter",
                "commands": [{{ "op": "add", "column": {{ "name": "nickname", "type": "string", "length": 30, "nullable": true }} }}]
            }}
        ]"#
    )
    .unwrap();

    let manifest = Manifest::load(file.path()).unwrap();
    let pool = create_test_pool().await;
    let schema = SchemaBuilder::new(pool.clone(), Dialect::Sqlite);

    let mut executed = Vec::new();
    for blueprint in manifest.blueprints().unwrap() {
        executed.extend(schema.apply(&blueprint).await.unwrap());
    }

    assert_eq!(
        executed,
        [
            "CREATE TABLE \"teams\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"name\" VARCHAR(255) NOT NULL)",
            "CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"team_id\" BIGINT NOT NULL REFERENCES \"teams\" (\"id\") ON DELETE CASCADE)",
            "CREATE INDEX \"users_team_id_index\" ON \"users\" (\"team_id\")",
            "ALTER TABLE \"users\" ADD COLUMN \"nickname\" VARCHAR(30)",
        ]
    );
    assert_eq!(
        column_names(&pool, "users").await,
        ["id", "team_id", "nickname"]
    );
}

#[test]
fn test_missing_manifest_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::load(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, SchemaError::Io(_)));
}
