use packager_core::db::open_db_in_memory;
use packager_core::{
    Category, InventoryRepository, InventoryService, ItemInput, ServiceError,
    SqliteInventoryRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn item_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM inventory_items;", [], |row| row.get(0))
        .unwrap()
}

fn input(name: &str, weight: &str, category: &Category) -> ItemInput {
    ItemInput {
        name: name.to_string(),
        description: String::new(),
        weight: weight.to_string(),
        category_id: category.id,
    }
}

fn seed_category(service: &InventoryService<SqliteInventoryRepository<'_>>, name: &str) -> Category {
    service
        .create_category(name, "")
        .unwrap()
        .applied()
        .unwrap()
}

#[test]
fn create_item_in_category() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");

    let tent = service
        .create_item(&input("Tent", "1200", &shelter))
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(tent.weight, 1200);
    let loaded = service.get_item(tent.id).unwrap().unwrap();
    assert_eq!(loaded, tent);
    assert_eq!(service.total_weight().unwrap(), 1200);
}

#[test]
fn invalid_item_input_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");

    let blank = service.create_item(&input("  ", "10", &shelter)).unwrap();
    assert_eq!(blank.rejection(), Some("Name cannot be only whitespace"));

    let negative = service.create_item(&input("Tent", "-5", &shelter)).unwrap();
    assert_eq!(
        negative.rejection(),
        Some("Weight must be a non-negative integer")
    );

    let both = service.create_item(&input("", "heavy", &shelter)).unwrap();
    assert_eq!(both.rejection(), Some("Name cannot be empty"));

    assert_eq!(item_count(&conn), 0);
}

#[test]
fn duplicate_item_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");
    let sleep = seed_category(&service, "Sleep");

    service.create_item(&input("Tent", "1200", &shelter)).unwrap();
    let second = service.create_item(&input("Tent", "900", &sleep)).unwrap();

    assert_eq!(second.rejection(), Some("Name \"Tent\" already exists"));
    assert_eq!(item_count(&conn), 1);
}

#[test]
fn create_item_in_missing_category_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let ghost = Category::new("Ghost", None);

    let result = service.create_item(&input("Tent", "1", &ghost));

    assert!(matches!(result, Err(ServiceError::NotFound(id)) if id == ghost.id));
    assert_eq!(item_count(&conn), 0);
}

#[test]
fn edit_item_moves_it_between_categories() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");
    let sleep = seed_category(&service, "Sleep");
    let pad = service
        .create_item(&input("Pad", "400", &shelter))
        .unwrap()
        .applied()
        .unwrap();

    let edited = service
        .edit_item(pad.id, &input("Sleeping pad", "380", &sleep))
        .unwrap()
        .applied()
        .unwrap();

    assert_eq!(edited.name, "Sleeping pad");
    assert_eq!(edited.category_id, sleep.id);
    assert!(service.list_items(shelter.id).unwrap().is_empty());
    assert_eq!(service.list_items(sleep.id).unwrap(), vec![edited]);
}

#[test]
fn edit_to_existing_name_keeps_item_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");
    service.create_item(&input("Tent", "1200", &shelter)).unwrap();
    let tarp = service
        .create_item(&input("Tarp", "300", &shelter))
        .unwrap()
        .applied()
        .unwrap();

    let outcome = service
        .edit_item(tarp.id, &input("Tent", "300", &shelter))
        .unwrap();

    assert_eq!(outcome.rejection(), Some("Name \"Tent\" already exists"));
    assert_eq!(service.get_item(tarp.id).unwrap().unwrap().name, "Tarp");
}

#[test]
fn category_with_items_cannot_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");
    let tent = service
        .create_item(&input("Tent", "1200", &shelter))
        .unwrap()
        .applied()
        .unwrap();

    let blocked = service.delete_category(shelter.id).unwrap();
    assert_eq!(blocked.rejection(), Some("Category still contains items"));
    assert!(service.get_category(shelter.id).unwrap().is_some());

    service.delete_item(tent.id).unwrap();
    assert!(service.delete_category(shelter.id).unwrap().is_applied());
    assert!(service.get_category(shelter.id).unwrap().is_none());
}

#[test]
fn categories_are_listed_with_their_items_and_weights() {
    let conn = open_db_in_memory().unwrap();
    let service = InventoryService::new(SqliteInventoryRepository::new(&conn));
    let shelter = seed_category(&service, "Shelter");
    let empty = seed_category(&service, "Electronics");
    service.create_item(&input("Tent", "1200", &shelter)).unwrap();
    service.create_item(&input("Tarp", "300", &shelter)).unwrap();

    let listed = service.list_categories().unwrap();

    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].category, empty);
    assert!(listed[0].items.is_empty());
    assert_eq!(listed[1].category, shelter);
    assert_eq!(listed[1].items.len(), 2);
    assert_eq!(listed[1].total_weight(), 1500);
}

#[test]
fn delete_missing_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteInventoryRepository::new(&conn);

    assert!(repo.delete_item(Uuid::new_v4()).is_err());
    assert!(!repo.item_name_exists("Tent").unwrap());
}
