use chrono::NaiveDate;
use packager_core::db::open_db_in_memory;
use packager_core::{
    Category, InventoryItem, InventoryRepository, NewTripInput, RepoError, ServiceError,
    SqliteInventoryRepository, SqliteTripRepository, Trip, TripAttribute, TripItemFlag,
    TripRepository, TripService, TripState,
};
use rusqlite::Connection;
use uuid::Uuid;

fn trip_item_rows(conn: &Connection, trip: &Trip) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM trip_items WHERE trip_id = ?1;",
        [trip.id.to_string()],
        |row| row.get(0),
    )
    .unwrap()
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn new_trip(name: &str, start: &str, end: &str) -> NewTripInput {
    NewTripInput {
        name: name.to_string(),
        start_date: start.to_string(),
        end_date: end.to_string(),
    }
}

fn seed_trip(conn: &Connection) -> Trip {
    TripService::new(SqliteTripRepository::new(conn))
        .create_trip(&new_trip("Alps", "2024-07-01", "2024-07-10"))
        .unwrap()
        .applied()
        .unwrap()
}

fn seed_items(conn: &Connection, names: &[(&str, u32)]) -> Vec<InventoryItem> {
    let inventory = SqliteInventoryRepository::new(conn);
    let category = Category::new("Gear", None);
    inventory.create_category(&category).unwrap();
    names
        .iter()
        .map(|(name, weight)| {
            let item = InventoryItem::new(*name, None, *weight, category.id);
            inventory.create_item(&item).unwrap();
            item
        })
        .collect()
}

#[test]
fn create_trip_starts_in_planning() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);

    assert_eq!(trip.state, TripState::Planning);
    assert_eq!(trip.start_date, date("2024-07-01"));
    assert_eq!(trip.duration_days(), 10);
    let loaded = SqliteTripRepository::new(&conn)
        .get_trip(trip.id)
        .unwrap()
        .unwrap();
    assert_eq!(loaded, trip);
}

#[test]
fn create_trip_rejects_reversed_dates() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));

    let outcome = service
        .create_trip(&new_trip("Alps", "2024-07-10", "2024-07-01"))
        .unwrap();

    assert_eq!(
        outcome.rejection(),
        Some("End date must not be before start date")
    );
    assert!(service.list_trips().unwrap().is_empty());
}

#[test]
fn duplicate_trip_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    seed_trip(&conn);

    let outcome = service
        .create_trip(&new_trip("Alps", "2025-01-01", "2025-01-02"))
        .unwrap();

    assert_eq!(outcome.rejection(), Some("Name \"Alps\" already exists"));
    assert_eq!(service.list_trips().unwrap().len(), 1);
}

#[test]
fn edit_attribute_updates_one_field() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let trip = seed_trip(&conn);

    let edited = service
        .edit_attribute(trip.id, TripAttribute::Location, "Chamonix")
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(edited.location.as_deref(), Some("Chamonix"));
    assert_eq!(edited.name, "Alps");

    let cooled = service
        .edit_attribute(trip.id, TripAttribute::TempMin, "-4")
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(cooled.temp_min, Some(-4));
    assert_eq!(cooled.location.as_deref(), Some("Chamonix"));
}

#[test]
fn edit_attribute_rejects_end_before_start() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let trip = seed_trip(&conn);

    let outcome = service
        .edit_attribute(trip.id, TripAttribute::EndDate, "2024-06-30")
        .unwrap();

    assert!(outcome.rejection().is_some());
    let loaded = service.get_trip(trip.id).unwrap().unwrap();
    assert_eq!(loaded.end_date, date("2024-07-10"));
}

#[test]
fn edit_attribute_on_missing_trip_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));

    let result = service.edit_attribute(Uuid::new_v4(), TripAttribute::Name, "x");
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[test]
fn state_can_be_advanced() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let trip = seed_trip(&conn);

    let next = trip.state.next().unwrap();
    service.set_state(trip.id, next).unwrap();

    assert_eq!(
        service.get_trip(trip.id).unwrap().unwrap().state,
        TripState::Planned
    );
}

#[test]
fn backfill_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    seed_items(&conn, &[("Tent", 1200), ("Stove", 300)]);
    let repo = SqliteTripRepository::new(&conn);

    assert_eq!(repo.ensure_trip_items(trip.id).unwrap(), 2);
    assert_eq!(repo.ensure_trip_items(trip.id).unwrap(), 0);
    assert_eq!(trip_item_rows(&conn, &trip), 2);
}

#[test]
fn overview_picks_up_items_added_later() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let trip = seed_trip(&conn);

    let before = service.overview(trip.id).unwrap();
    assert!(before.categories.is_empty());

    seed_items(&conn, &[("Tent", 1200)]);
    let after = service.overview(trip.id).unwrap();

    assert_eq!(after.categories.len(), 1);
    assert_eq!(after.categories[0].items.len(), 1);
    assert!(!after.categories[0].items[0].pick);
    assert_eq!(after.total_picked_weight, 0);
}

#[test]
fn toggle_without_prior_view_creates_single_row() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    let items = seed_items(&conn, &[("Tent", 1200)]);
    let service = TripService::new(SqliteTripRepository::new(&conn));

    let picked = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Pick, true)
        .unwrap();
    assert!(picked.pick);

    let unpicked = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Pick, false)
        .unwrap();
    assert!(!unpicked.pick);
    assert_eq!(trip_item_rows(&conn, &trip), 1);
}

#[test]
fn packing_picks_and_unpicking_unpacks() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    let items = seed_items(&conn, &[("Tent", 1200), ("Stove", 300)]);
    let service = TripService::new(SqliteTripRepository::new(&conn));

    let packed = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Pack, true)
        .unwrap();
    assert!(packed.pick && packed.pack);
    assert_eq!(service.total_picked_weight(trip.id).unwrap(), 1200);

    let unpicked = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Pick, false)
        .unwrap();
    assert!(!unpicked.pick);
    assert!(!unpicked.pack);
    assert_eq!(service.total_picked_weight(trip.id).unwrap(), 0);
}

#[test]
fn toggle_for_unknown_item_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    let repo = SqliteTripRepository::new(&conn);
    let ghost = Uuid::new_v4();

    let err = repo
        .set_trip_item_flag(trip.id, ghost, TripItemFlag::Pick, true)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost));
}

#[test]
fn trip_types_attach_once_and_detach() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let trip = seed_trip(&conn);
    let hiking = service
        .create_trip_type("Hiking")
        .unwrap()
        .applied()
        .unwrap();
    service.create_trip_type("Beach").unwrap();

    service.attach_type(trip.id, hiking.id).unwrap();
    service.attach_type(trip.id, hiking.id).unwrap();

    let selection = service.overview(trip.id).unwrap().types;
    let active = selection
        .iter()
        .filter(|entry| entry.active)
        .map(|entry| entry.trip_type.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(selection.len(), 2);
    assert_eq!(active, vec!["Hiking"]);

    service.detach_type(trip.id, hiking.id).unwrap();
    assert!(matches!(
        service.detach_type(trip.id, hiking.id),
        Err(ServiceError::NotFound(_))
    ));
}

#[test]
fn trip_type_rename_to_existing_name_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    service.create_trip_type("Hiking").unwrap();
    let beach = service
        .create_trip_type("Beach")
        .unwrap()
        .applied()
        .unwrap();

    let outcome = service.rename_trip_type(beach.id, "Hiking").unwrap();
    assert_eq!(outcome.rejection(), Some("Name \"Hiking\" already exists"));

    let renamed = service
        .rename_trip_type(beach.id, "Seaside")
        .unwrap()
        .applied()
        .unwrap();
    assert_eq!(renamed.name, "Seaside");
}

#[test]
fn deleting_trip_cascades_to_trip_items() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    seed_items(&conn, &[("Tent", 1200)]);
    let service = TripService::new(SqliteTripRepository::new(&conn));
    service.overview(trip.id).unwrap();

    service.delete_trip(trip.id).unwrap();

    assert_eq!(trip_item_rows(&conn, &trip), 0);
    assert!(service.get_trip(trip.id).unwrap().is_none());
}

#[test]
fn ready_picks_and_unpicking_clears_ready() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    let items = seed_items(&conn, &[("Tent", 1200)]);
    let service = TripService::new(SqliteTripRepository::new(&conn));

    let ready = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Ready, true)
        .unwrap();
    assert!(ready.pick && ready.ready);
    assert!(!ready.pack);

    let unready = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Ready, false)
        .unwrap();
    assert!(unready.pick && !unready.ready);

    service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Ready, true)
        .unwrap();
    let unpicked = service
        .set_item_flag(trip.id, items[0].id, TripItemFlag::Pick, false)
        .unwrap();
    assert!(!unpicked.pick && !unpicked.ready);

    let overview = service.overview(trip.id).unwrap();
    assert_eq!(overview.categories[0].unready_items().count(), 0);
}

#[test]
fn rejected_trip_edit_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let trip = seed_trip(&conn);
    let repo = SqliteTripRepository::new(&conn);

    let outcome = repo
        .edit_trip(trip.id, |trip| {
            trip.name = "Dolomites".to_string();
            Err("no".to_string())
        })
        .unwrap();

    assert_eq!(outcome, Err("no".to_string()));
    assert_eq!(repo.get_trip(trip.id).unwrap().unwrap().name, "Alps");
}

#[test]
fn trip_rename_to_existing_name_is_rejected_inline() {
    let conn = open_db_in_memory().unwrap();
    let service = TripService::new(SqliteTripRepository::new(&conn));
    let alps = seed_trip(&conn);
    let coast = service
        .create_trip(&new_trip("Coast", "2024-08-01", "2024-08-03"))
        .unwrap()
        .applied()
        .unwrap();

    let outcome = service
        .edit_attribute(coast.id, TripAttribute::Name, &alps.name)
        .unwrap();

    assert_eq!(outcome.rejection(), Some("Name \"Alps\" already exists"));
    assert_eq!(service.get_trip(coast.id).unwrap().unwrap().name, "Coast");
}
