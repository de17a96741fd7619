//! Packager schema history.
//!
//! | Version | Adds |
//! |---|---|
//! | 1 | `package_lists` |
//! | 2 | `inventory_categories`, `inventory_items` |
//! | 3 | `trips`, `trip_types`, `trips_to_trip_types`, `trip_items` |
//! | 4 | `trip_items.ready` |
//!
//! A database is brought to the latest version in one transaction when it
//! is opened. `PRAGMA user_version` holds the applied version; a database
//! stamped with a newer version than [`latest_version`] is refused so an
//! old binary never writes to a schema it does not know.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_package_lists.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_inventory.sql"),
    },
    Migration {
        version: 3,
        sql: include_str!("0003_trips.sql"),
    },
    Migration {
        version: 4,
        sql: include_str!("0004_trip_item_ready.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
///
/// All pending steps run in one transaction; a failing step leaves the
/// schema at its previous version. Trip databases created before the
/// `ready` flag existed get it here with every item not ready.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={current_version} to_version={latest}");
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
