//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define entity-oriented data access contracts.
//! - Isolate SQL details from the mutation handlers in `service`.
//! - Translate constraint violations into semantic errors.
//!
//! # Invariants
//! - Multi-statement writes run inside one `IMMEDIATE` transaction; an error
//!   drops the transaction, which rolls it back.
//! - A UNIQUE violation on a name column surfaces as `DuplicateName`, never
//!   as a raw database error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::{is_foreign_key_violation, is_unique_violation, DbError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod inventory_repo;
pub mod package_list_repo;
pub mod trip_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// No row with this id.
    NotFound(Uuid),
    /// Another row already uses this name.
    DuplicateName(String),
    /// Row cannot be removed while other rows reference it.
    StillReferenced(Uuid),
    InvalidData(String),
}

impl RepoError {
    /// Maps a failed write: UNIQUE violations become `DuplicateName(name)`.
    pub(crate) fn from_write(err: rusqlite::Error, name: &str) -> Self {
        if is_unique_violation(&err) {
            Self::DuplicateName(name.to_string())
        } else {
            Self::Db(DbError::Sqlite(err))
        }
    }

    /// Maps a failed delete: foreign key violations become `StillReferenced(id)`.
    pub(crate) fn from_delete(err: rusqlite::Error, id: Uuid) -> Self {
        if is_foreign_key_violation(&err) {
            Self::StillReferenced(id)
        } else {
            Self::Db(DbError::Sqlite(err))
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "row not found: {id}"),
            Self::DuplicateName(name) => write!(f, "name already exists: {name}"),
            Self::StillReferenced(id) => write!(f, "row is still referenced: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::DuplicateName(_) => None,
            Self::StillReferenced(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn parse_weight(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid weight `{value}` in {column}")))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
