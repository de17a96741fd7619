//! Domain model for package lists, inventory and trips.
//!
//! # Responsibility
//! - Define the canonical records persisted by the entity store.
//! - Keep transport/display concerns out of persisted shapes.
//!
//! # Invariants
//! - Every entity is identified by a stable UUID v4 and a unique name.
//! - Display state (edit mode, inline errors) never lives on these records.

pub mod inventory;
pub mod package_list;
pub mod trip;
