//! Trip, trip type and trip item repository contract and SQLite
//! implementation.
//!
//! # Responsibility
//! - Persist trips and their many-to-many trip types.
//! - Keep exactly one `trip_items` row per `(trip, inventory item)` pair.
//!
//! # Invariants
//! - Backfill uses `INSERT OR IGNORE`; an existing trip item row is never
//!   overwritten.
//! - A flag write always runs the backfill first, in the same transaction,
//!   so no write can observe a missing trip item row.
//! - Clearing `pick` also clears `pack` and `ready`; setting `pack` or
//!   `ready` also sets `pick`.
//! - A trip edit reads and writes the row inside one immediate transaction.

use crate::model::inventory::ItemId;
use crate::model::trip::{
    Trip, TripCategory, TripId, TripItem, TripItemFlag, TripState, TripType, TripTypeId,
    TripTypeSelection,
};
use crate::repo::{bool_to_int, parse_bool, parse_uuid, parse_weight, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const TRIP_SELECT_SQL: &str = "SELECT
    id,
    name,
    start_date,
    end_date,
    location,
    temp_min,
    temp_max,
    comment,
    state
FROM trips";

const TRIP_ITEM_SELECT_SQL: &str = "SELECT
    t_item.trip_id AS trip_id,
    t_item.item_id AS item_id,
    t_item.pick AS pick,
    t_item.pack AS pack,
    t_item.ready AS ready,
    i_item.name AS name,
    i_item.weight AS weight,
    i_item.category_id AS category_id
FROM trip_items AS t_item
INNER JOIN inventory_items AS i_item
    ON i_item.id = t_item.item_id";

/// Repository interface for trips and everything hanging off a trip.
pub trait TripRepository {
    fn create_trip(&self, trip: &Trip) -> RepoResult<TripId>;
    /// Loads trip `id`, lets `edit` change it and writes it back, all in one
    /// transaction.
    ///
    /// When `edit` returns `Err(message)` nothing is written and the message
    /// is passed through as `Ok(Err(message))`.
    fn edit_trip<F>(&self, id: TripId, edit: F) -> RepoResult<Result<Trip, String>>
    where
        F: FnOnce(&mut Trip) -> Result<(), String>;
    fn set_trip_state(&self, id: TripId, state: TripState) -> RepoResult<()>;
    fn get_trip(&self, id: TripId) -> RepoResult<Option<Trip>>;
    /// Lists trips ordered by start date, newest first.
    fn list_trips(&self) -> RepoResult<Vec<Trip>>;
    fn delete_trip(&self, id: TripId) -> RepoResult<()>;

    fn create_trip_type(&self, trip_type: &TripType) -> RepoResult<TripTypeId>;
    fn rename_trip_type(&self, id: TripTypeId, name: &str) -> RepoResult<TripType>;
    fn list_trip_types(&self) -> RepoResult<Vec<TripType>>;
    /// Lists all trip types, marking those attached to `trip_id`.
    fn list_trip_type_selection(&self, trip_id: TripId) -> RepoResult<Vec<TripTypeSelection>>;
    /// Attaches a type to a trip; attaching twice is a no-op.
    fn attach_trip_type(&self, trip_id: TripId, type_id: TripTypeId) -> RepoResult<()>;
    /// Detaches a type from a trip; `NotFound` when it was not attached.
    fn detach_trip_type(&self, trip_id: TripId, type_id: TripTypeId) -> RepoResult<()>;

    /// Inserts missing trip item rows for every inventory item.
    ///
    /// Returns the number of rows inserted.
    fn ensure_trip_items(&self, trip_id: TripId) -> RepoResult<usize>;
    /// Sets one flag on a trip item, backfilling first.
    fn set_trip_item_flag(
        &self,
        trip_id: TripId,
        item_id: ItemId,
        flag: TripItemFlag,
        value: bool,
    ) -> RepoResult<TripItem>;
    fn get_trip_item(&self, trip_id: TripId, item_id: ItemId) -> RepoResult<Option<TripItem>>;
    /// Lists trip items grouped by inventory category, including empty
    /// categories.
    fn list_trip_categories(&self, trip_id: TripId) -> RepoResult<Vec<TripCategory>>;
    /// Sum of weights of all picked items, in grams.
    fn total_picked_weight(&self, trip_id: TripId) -> RepoResult<u64>;
}

/// SQLite-backed trip repository.
pub struct SqliteTripRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTripRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TripRepository for SqliteTripRepository<'_> {
    fn create_trip(&self, trip: &Trip) -> RepoResult<TripId> {
        self.conn
            .execute(
                "INSERT INTO trips (
                    id,
                    name,
                    start_date,
                    end_date,
                    location,
                    temp_min,
                    temp_max,
                    comment,
                    state
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    trip.id.to_string(),
                    trip.name.as_str(),
                    trip.start_date,
                    trip.end_date,
                    trip.location.as_deref(),
                    trip.temp_min,
                    trip.temp_max,
                    trip.comment.as_deref(),
                    trip.state.as_str(),
                ],
            )
            .map_err(|err| RepoError::from_write(err, &trip.name))?;
        Ok(trip.id)
    }

    fn edit_trip<F>(&self, id: TripId, edit: F) -> RepoResult<Result<Trip, String>>
    where
        F: FnOnce(&mut Trip) -> Result<(), String>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut trip = load_trip(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        if let Err(message) = edit(&mut trip) {
            return Ok(Err(message));
        }

        tx.execute(
            "UPDATE trips
             SET
                name = ?2,
                start_date = ?3,
                end_date = ?4,
                location = ?5,
                temp_min = ?6,
                temp_max = ?7,
                comment = ?8,
                state = ?9
             WHERE id = ?1;",
            params![
                trip.id.to_string(),
                trip.name.as_str(),
                trip.start_date,
                trip.end_date,
                trip.location.as_deref(),
                trip.temp_min,
                trip.temp_max,
                trip.comment.as_deref(),
                trip.state.as_str(),
            ],
        )
        .map_err(|err| RepoError::from_write(err, &trip.name))?;
        tx.commit()?;
        Ok(Ok(trip))
    }

    fn set_trip_state(&self, id: TripId, state: TripState) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE trips SET state = ?2 WHERE id = ?1;",
            params![id.to_string(), state.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn get_trip(&self, id: TripId) -> RepoResult<Option<Trip>> {
        load_trip(self.conn, id)
    }

    fn list_trips(&self) -> RepoResult<Vec<Trip>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRIP_SELECT_SQL} ORDER BY start_date DESC, name COLLATE NOCASE ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut trips = Vec::new();
        while let Some(row) = rows.next()? {
            trips.push(parse_trip_row(row)?);
        }
        Ok(trips)
    }

    fn delete_trip(&self, id: TripId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trips WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn create_trip_type(&self, trip_type: &TripType) -> RepoResult<TripTypeId> {
        self.conn
            .execute(
                "INSERT INTO trip_types (id, name) VALUES (?1, ?2);",
                params![trip_type.id.to_string(), trip_type.name.as_str()],
            )
            .map_err(|err| RepoError::from_write(err, &trip_type.name))?;
        Ok(trip_type.id)
    }

    fn rename_trip_type(&self, id: TripTypeId, name: &str) -> RepoResult<TripType> {
        let changed = self
            .conn
            .execute(
                "UPDATE trip_types SET name = ?2 WHERE id = ?1;",
                params![id.to_string(), name],
            )
            .map_err(|err| RepoError::from_write(err, name))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(TripType {
            id,
            name: name.to_string(),
        })
    }

    fn list_trip_types(&self) -> RepoResult<Vec<TripType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM trip_types ORDER BY name COLLATE NOCASE ASC, id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut types = Vec::new();
        while let Some(row) = rows.next()? {
            types.push(parse_trip_type_row(row)?);
        }
        Ok(types)
    }

    fn list_trip_type_selection(&self, trip_id: TripId) -> RepoResult<Vec<TripTypeSelection>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                tt.id AS id,
                tt.name AS name,
                ttt.trip_id IS NOT NULL AS active
             FROM trip_types AS tt
             LEFT JOIN trips_to_trip_types AS ttt
                ON ttt.trip_type_id = tt.id
               AND ttt.trip_id = ?1
             ORDER BY tt.name COLLATE NOCASE ASC, tt.id ASC;",
        )?;
        let mut rows = stmt.query([trip_id.to_string()])?;
        let mut selection = Vec::new();
        while let Some(row) = rows.next()? {
            selection.push(TripTypeSelection {
                trip_type: parse_trip_type_row(row)?,
                active: parse_bool(row.get("active")?, "trips_to_trip_types")?,
            });
        }
        Ok(selection)
    }

    fn attach_trip_type(&self, trip_id: TripId, type_id: TripTypeId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_row_exists(&tx, "trips", trip_id)?;
        ensure_row_exists(&tx, "trip_types", type_id)?;
        tx.execute(
            "INSERT OR IGNORE INTO trips_to_trip_types (trip_id, trip_type_id) VALUES (?1, ?2);",
            params![trip_id.to_string(), type_id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn detach_trip_type(&self, trip_id: TripId, type_id: TripTypeId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM trips_to_trip_types WHERE trip_id = ?1 AND trip_type_id = ?2;",
            params![trip_id.to_string(), type_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(type_id));
        }
        Ok(())
    }

    fn ensure_trip_items(&self, trip_id: TripId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_row_exists(&tx, "trips", trip_id)?;
        let inserted = backfill_trip_items(&tx, trip_id)?;
        tx.commit()?;
        Ok(inserted)
    }

    fn set_trip_item_flag(
        &self,
        trip_id: TripId,
        item_id: ItemId,
        flag: TripItemFlag,
        value: bool,
    ) -> RepoResult<TripItem> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_row_exists(&tx, "trips", trip_id)?;
        backfill_trip_items(&tx, trip_id)?;

        let sql = match (flag, value) {
            (TripItemFlag::Pick, true) => "UPDATE trip_items SET pick = 1",
            (TripItemFlag::Pick, false) => "UPDATE trip_items SET pick = 0, pack = 0, ready = 0",
            (TripItemFlag::Pack, true) => "UPDATE trip_items SET pick = 1, pack = 1",
            (TripItemFlag::Pack, false) => "UPDATE trip_items SET pack = 0",
            (TripItemFlag::Ready, true) => "UPDATE trip_items SET pick = 1, ready = 1",
            (TripItemFlag::Ready, false) => "UPDATE trip_items SET ready = 0",
        };
        let changed = tx.execute(
            &format!("{sql} WHERE trip_id = ?1 AND item_id = ?2;"),
            params![trip_id.to_string(), item_id.to_string()],
        )?;
        if changed == 0 {
            // After the backfill a missing row means the item does not exist.
            return Err(RepoError::NotFound(item_id));
        }

        let trip_item = load_trip_item(&tx, trip_id, item_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "trip item ({trip_id}, {item_id}) vanished after update"
            ))
        })?;
        tx.commit()?;
        debug!(
            "event=trip_item_flag module=repo status=ok flag={} value={}",
            flag.column(),
            bool_to_int(value)
        );
        Ok(trip_item)
    }

    fn get_trip_item(&self, trip_id: TripId, item_id: ItemId) -> RepoResult<Option<TripItem>> {
        load_trip_item(self.conn, trip_id, item_id)
    }

    fn list_trip_categories(&self, trip_id: TripId) -> RepoResult<Vec<TripCategory>> {
        let mut categories: Vec<TripCategory> = Vec::new();
        let mut stmt = self.conn.prepare(
            "SELECT id, name FROM inventory_categories ORDER BY name COLLATE NOCASE ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_text: String = row.get("id")?;
            categories.push(TripCategory {
                category_id: parse_uuid(&id_text, "inventory_categories.id")?,
                name: row.get("name")?,
                items: Vec::new(),
            });
        }

        let mut stmt = self.conn.prepare(&format!(
            "{TRIP_ITEM_SELECT_SQL}
             WHERE t_item.trip_id = ?1
             ORDER BY i_item.name COLLATE NOCASE ASC, i_item.id ASC;"
        ))?;
        let mut rows = stmt.query([trip_id.to_string()])?;
        while let Some(row) = rows.next()? {
            let item = parse_trip_item_row(row)?;
            let category = categories
                .iter_mut()
                .find(|category| category.category_id == item.category_id)
                .ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "item {} references unknown category {}",
                        item.item_id, item.category_id
                    ))
                })?;
            category.items.push(item);
        }

        Ok(categories)
    }

    fn total_picked_weight(&self, trip_id: TripId) -> RepoResult<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(i_item.weight), 0)
             FROM trip_items AS t_item
             INNER JOIN inventory_items AS i_item
                ON i_item.id = t_item.item_id
             WHERE t_item.trip_id = ?1
               AND t_item.pick = 1;",
            [trip_id.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative picked weight `{total}`")))
    }
}

fn backfill_trip_items(tx: &Transaction<'_>, trip_id: TripId) -> RepoResult<usize> {
    let inserted = tx.execute(
        "INSERT OR IGNORE INTO trip_items (trip_id, item_id, pick, pack)
         SELECT ?1, i_item.id, 0, 0
         FROM inventory_items AS i_item;",
        [trip_id.to_string()],
    )?;
    if inserted > 0 {
        debug!("event=trip_items_backfill module=repo status=ok inserted={inserted}");
    }
    Ok(inserted)
}

fn ensure_row_exists(conn: &Connection, table: &'static str, id: uuid::Uuid) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id.to_string()],
        |row| row.get(0),
    )?;
    if exists == 1 {
        Ok(())
    } else {
        Err(RepoError::NotFound(id))
    }
}

fn load_trip(conn: &Connection, id: TripId) -> RepoResult<Option<Trip>> {
    let mut stmt = conn.prepare(&format!("{TRIP_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_trip_row(row)?));
    }
    Ok(None)
}

fn load_trip_item(
    conn: &Connection,
    trip_id: TripId,
    item_id: ItemId,
) -> RepoResult<Option<TripItem>> {
    let mut stmt = conn.prepare(&format!(
        "{TRIP_ITEM_SELECT_SQL} WHERE t_item.trip_id = ?1 AND t_item.item_id = ?2;"
    ))?;
    let mut rows = stmt.query(params![trip_id.to_string(), item_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_trip_item_row(row)?));
    }
    Ok(None)
}

fn parse_trip_row(row: &Row<'_>) -> RepoResult<Trip> {
    let id_text: String = row.get("id")?;
    let state_text: String = row.get("state")?;
    let state = TripState::parse(&state_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid trip state `{state_text}` in trips.state"))
    })?;
    Ok(Trip {
        id: parse_uuid(&id_text, "trips.id")?,
        name: row.get("name")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        location: row.get("location")?,
        temp_min: row.get("temp_min")?,
        temp_max: row.get("temp_max")?,
        comment: row.get("comment")?,
        state,
    })
}

fn parse_trip_type_row(row: &Row<'_>) -> RepoResult<TripType> {
    let id_text: String = row.get("id")?;
    Ok(TripType {
        id: parse_uuid(&id_text, "trip_types.id")?,
        name: row.get("name")?,
    })
}

fn parse_trip_item_row(row: &Row<'_>) -> RepoResult<TripItem> {
    let trip_text: String = row.get("trip_id")?;
    let item_text: String = row.get("item_id")?;
    let category_text: String = row.get("category_id")?;
    Ok(TripItem {
        trip_id: parse_uuid(&trip_text, "trip_items.trip_id")?,
        item_id: parse_uuid(&item_text, "trip_items.item_id")?,
        name: row.get("name")?,
        weight: parse_weight(row.get("weight")?, "inventory_items.weight")?,
        category_id: parse_uuid(&category_text, "inventory_items.category_id")?,
        pick: parse_bool(row.get("pick")?, "trip_items.pick")?,
        pack: parse_bool(row.get("pack")?, "trip_items.pack")?,
        ready: parse_bool(row.get("ready")?, "trip_items.ready")?,
    })
}
