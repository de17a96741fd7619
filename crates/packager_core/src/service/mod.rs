//! Mutation handlers and read use-cases.
//!
//! # Responsibility
//! - Validate input before any store access.
//! - Orchestrate repository calls into one atomic write per operation.
//! - Convert validation and uniqueness failures into inline rejections.
//!
//! # Invariants
//! - A rejected mutation leaves the store unchanged.
//! - Only `NotFound` and store faults escape as `ServiceError`.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod inventory_service;
pub mod package_list_service;
pub mod trip_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of a mutation whose failure is rendered next to the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    Applied(T),
    /// Nothing was written; the message is meant for the user.
    Rejected(String),
}

impl<T> Mutation<T> {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutation<U> {
        match self {
            Self::Applied(value) => Mutation::Applied(f(value)),
            Self::Rejected(message) => Mutation::Rejected(message),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected(message) => Some(message.as_str()),
        }
    }
}

/// Failures that are not shown inline.
#[derive(Debug)]
pub enum ServiceError {
    /// Target row does not exist.
    NotFound(Uuid),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Converts a repository write result into a mutation outcome.
///
/// `DuplicateName` becomes an inline rejection, everything else propagates.
fn inline_duplicates<T>(result: Result<T, RepoError>) -> ServiceResult<Mutation<T>> {
    match result {
        Ok(value) => Ok(Mutation::Applied(value)),
        Err(RepoError::DuplicateName(name)) => Ok(Mutation::Rejected(
            crate::validate::duplicate_name_message(&name),
        )),
        Err(err) => Err(err.into()),
    }
}
