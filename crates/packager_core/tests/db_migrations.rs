use packager_core::db::migrations::latest_version;
use packager_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

const TABLES: [&str; 7] = [
    "package_lists",
    "inventory_categories",
    "inventory_items",
    "trips",
    "trip_types",
    "trips_to_trip_types",
    "trip_items",
];

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("packager.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO package_lists (id, name, description) VALUES ('x', 'EDC', NULL);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM package_lists;", [], |row| row.get(0))
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

    let err = open_db(&path).unwrap_err();
    match err {
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
fn upgrading_trip_schema_adds_ready_flag_to_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trips_v3.db");

    let conn = Connection::open(&path).unwrap();
    for sql in [
        include_str!("../src/db/migrations/0001_package_lists.sql"),
        include_str!("../src/db/migrations/0002_inventory.sql"),
        include_str!("../src/db/migrations/0003_trips.sql"),
    ] {
        conn.execute_batch(sql).unwrap();
    }
    conn.execute_batch(
        "PRAGMA user_version = 3;
         INSERT INTO inventory_categories (id, name) VALUES ('c', 'Sleep');
         INSERT INTO inventory_items (id, name, weight, category_id) VALUES ('i', 'Bag', 900, 'c');
         INSERT INTO trips (id, name, start_date, end_date, state)
             VALUES ('t', 'Alps', '2024-07-01', '2024-07-03', 'planning');
         INSERT INTO trip_items (trip_id, item_id, pick, pack) VALUES ('t', 'i', 1, 1);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    let (pick, pack, ready): (i64, i64, i64) = conn
        .query_row(
            "SELECT pick, pack, ready FROM trip_items WHERE trip_id = 't' AND item_id = 'i';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!((pick, pack, ready), (1, 1, 0));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
