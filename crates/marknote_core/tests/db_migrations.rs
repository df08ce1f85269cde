use marknote_core::db::migrations::latest_version;
use marknote_core::db::{open_db, open_db_in_memory, DbError};
use marknote_core::{KeyValueStore, SqliteStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_kv_table() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_kv_table(&conn);
}

#[test]
fn reopening_a_store_file_keeps_schema_and_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("marknote.sqlite3");

    let mut first = SqliteStore::open(&path).unwrap();
    first.set("theme-storage", r#"{"isDark":false}"#).unwrap();
    drop(first);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let second = SqliteStore::from_connection(conn).unwrap();
    assert_eq!(
        second.get("theme-storage").unwrap().as_deref(),
        Some(r#"{"isDark":false}"#)
    );
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteStore::open(&path).err().unwrap() {
        StoreError::Db(DbError::SchemaTooNew { found, supported }) => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_kv_table(conn: &Connection) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table kv_entries does not exist");
}
