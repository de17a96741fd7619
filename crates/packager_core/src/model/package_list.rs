//! Package list record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PackageListId = Uuid;

/// Named list of things to pack, e.g. "EDC" or "Camping".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageList {
    pub id: PackageListId,
    /// Unique, never empty or whitespace-only.
    pub name: String,
    pub description: Option<String>,
}

impl PackageList {
    /// Creates a package list with a freshly generated id.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
        }
    }
}
