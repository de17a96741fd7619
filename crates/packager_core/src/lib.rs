//! Core domain logic for the packing manager.
//! Owns the schema, the validators and every mutation rule; the web layer only dispatches.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use db::{open_db, open_db_in_memory, DbError};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::inventory::{Category, CategoryWithItems, InventoryItem};
pub use model::package_list::PackageList;
pub use model::trip::{
    Trip, TripAttribute, TripCategory, TripItem, TripItemFlag, TripState, TripType,
    TripTypeSelection,
};
pub use repo::inventory_repo::{InventoryRepository, SqliteInventoryRepository};
pub use repo::package_list_repo::{PackageListRepository, SqlitePackageListRepository};
pub use repo::trip_repo::{SqliteTripRepository, TripRepository};
pub use repo::{RepoError, RepoResult};
pub use service::inventory_service::{InventoryService, ItemInput};
pub use service::package_list_service::PackageListService;
pub use service::trip_service::{NewTripInput, TripOverview, TripService};
pub use service::{Mutation, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
