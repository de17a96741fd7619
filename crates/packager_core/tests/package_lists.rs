use packager_core::db::{open_db, open_db_in_memory};
use packager_core::{
    Mutation, PackageListRepository, PackageListService, RepoError, ServiceError,
    SqlitePackageListRepository,
};
use rusqlite::Connection;
use std::sync::Barrier;
use std::thread;
use uuid::Uuid;

fn list_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM package_lists;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_valid_list_is_applied() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));

    let created = service.create_list("EDC", "").unwrap().applied().unwrap();

    assert_eq!(created.name, "EDC");
    assert_eq!(created.description, None);
    let loaded = service.get_list(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn empty_and_whitespace_names_are_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));

    let empty = service.create_list("", "").unwrap();
    assert_eq!(empty.rejection(), Some("Name cannot be empty"));

    let blank = service.create_list("   ", "").unwrap();
    assert_eq!(blank.rejection(), Some("Name cannot be only whitespace"));

    assert_eq!(list_count(&conn), 0);
}

#[test]
fn duplicate_create_is_rejected_and_keeps_single_row() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));

    assert!(service.create_list("Camping", "").unwrap().is_applied());
    let second = service.create_list("Camping", "other").unwrap();

    assert_eq!(
        second,
        Mutation::Rejected("Name \"Camping\" already exists".to_string())
    );
    assert_eq!(list_count(&conn), 1);
}

#[test]
fn rename_to_existing_name_leaves_original_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));

    service.create_list("Camping", "").unwrap();
    let edc = service
        .create_list("EDC", "pocket")
        .unwrap()
        .applied()
        .unwrap();

    let outcome = service.rename_list(edc.id, "Camping", "").unwrap();
    assert_eq!(outcome.rejection(), Some("Name \"Camping\" already exists"));

    let loaded = service.get_list(edc.id).unwrap().unwrap();
    assert_eq!(loaded.name, "EDC");
    assert_eq!(loaded.description.as_deref(), Some("pocket"));
}

#[test]
fn rename_updates_name_and_description() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));
    let list = service.create_list("EDC", "").unwrap().applied().unwrap();

    let renamed = service
        .rename_list(list.id, "Everyday carry", "keys and knife")
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(renamed.id, list.id);
    assert_eq!(renamed.name, "Everyday carry");
    assert_eq!(renamed.description.as_deref(), Some("keys and knife"));
}

#[test]
fn rename_validates_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));

    let invalid = service.rename_list(Uuid::new_v4(), " ", "").unwrap();
    assert_eq!(invalid.rejection(), Some("Name cannot be only whitespace"));

    let missing = service.rename_list(Uuid::new_v4(), "Valid", "");
    assert!(matches!(missing, Err(ServiceError::NotFound(_))));
}

#[test]
fn delete_removes_exactly_one_row() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));
    let first = service.create_list("A", "").unwrap().applied().unwrap();
    service.create_list("B", "").unwrap();

    service.delete_list(first.id).unwrap();

    assert_eq!(list_count(&conn), 1);
    assert!(service.get_list(first.id).unwrap().is_none());
}

#[test]
fn delete_missing_list_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePackageListRepository::new(&conn);
    let id = Uuid::new_v4();

    let err = repo.delete_list(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(missing) if missing == id));
}

#[test]
fn lists_are_ordered_by_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));
    for name in ["camping", "Alpine", "Beach"] {
        service.create_list(name, "").unwrap();
    }

    let names = service
        .list_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Alpine", "Beach", "camping"]);
}

#[test]
fn check_new_name_reports_duplicates_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));
    service.create_list("EDC", "").unwrap();

    assert_eq!(
        service.check_new_name("EDC").unwrap().as_deref(),
        Some("Name \"EDC\" already exists")
    );
    assert_eq!(service.check_new_name("Hiking").unwrap(), None);
    assert_eq!(
        service.check_new_name("").unwrap().as_deref(),
        Some("Name cannot be empty")
    );
    assert_eq!(list_count(&conn), 1);
}

#[test]
fn concurrent_creates_with_same_name_commit_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("packager.db");
    drop(open_db(&path).unwrap());
    let barrier = Barrier::new(2);

    let outcomes: Vec<Mutation<_>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    let conn = open_db(&path).unwrap();
                    let service = PackageListService::new(SqlitePackageListRepository::new(&conn));
                    barrier.wait();
                    service.create_list("EDC", "").unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(outcomes.iter().filter(|outcome| outcome.is_applied()).count(), 1);
    let rejected: Vec<_> = outcomes.iter().filter_map(Mutation::rejection).collect();
    assert_eq!(rejected, vec!["Name \"EDC\" already exists"]);
    assert_eq!(list_count(&open_db(&path).unwrap()), 1);
}
