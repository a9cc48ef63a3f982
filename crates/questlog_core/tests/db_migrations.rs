use questlog_core::db::migrations::{apply_migrations, latest_version};
use questlog_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "profiles");
    assert_table_exists(&conn, "tasks");
    assert_table_exists(&conn, "task_completions");
    assert_index_exists(&conn, "idx_tasks_user_created");
}

#[test]
fn reopening_file_database_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("questlog.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO task_completions (task_id, user_id, xp_awarded, completed_at)
         VALUES ('t', 'u', 10, 0);",
        [],
    )
    .unwrap();
    drop(conn);

    let reopened = open_db(&path).unwrap();
    assert_eq!(schema_version(&reopened), latest_version());
    let count: i64 = reopened
        .query_row("SELECT COUNT(*) FROM task_completions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn failing_migration_reports_version_and_rolls_back() {
    let mut conn = Connection::open_in_memory().unwrap();
    // `CREATE TABLE IF NOT EXISTS tasks` skips over the view, then the
    // owner index in version 2 cannot be built on it.
    conn.execute_batch("CREATE VIEW tasks AS SELECT 'u' AS user_id, 0 AS created_at;")
        .unwrap();

    match apply_migrations(&mut conn).unwrap_err() {
        DbError::Migration { version, .. } => assert_eq!(version, 2),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(schema_version(&conn), 0);
    assert!(!sqlite_object_exists(&conn, "table", "profiles"));
    assert!(!sqlite_object_exists(&conn, "table", "task_completions"));
}

#[test]
fn schema_rejects_unknown_category_text() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO tasks (id, user_id, title, type, difficulty, active, created_at)
         VALUES ('a', 'b', 'c', 'weekly', 'easy', 1, 0);",
        [],
    );
    assert!(result.is_err());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "table", name), "table {name} does not exist");
}

fn assert_index_exists(conn: &Connection, name: &str) {
    assert!(sqlite_object_exists(conn, "index", name), "index {name} does not exist");
}

fn sqlite_object_exists(conn: &Connection, kind: &str, name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = ?1 AND name = ?2
        );",
        [kind, name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
