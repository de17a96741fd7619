//! Shared store handle injected into every handler.
//!
//! # Invariants
//! - The connection is only borrowed for one store round-trip at a time.
//! - The lock is never held across an `.await`.

use crate::error::WebError;
use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, WebError>,
    ) -> Result<T, WebError> {
        let guard = self.conn.lock().map_err(|_| {
            error!("event=store_lock module=web status=error reason=poisoned");
            WebError::StoreUnavailable
        })?;
        f(&guard)
    }
}
