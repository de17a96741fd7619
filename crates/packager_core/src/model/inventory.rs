//! Inventory categories and items.
//!
//! # Invariants
//! - An item always references an existing category.
//! - Item weight is a non-negative number of grams.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;
pub type ItemId = Uuid;

/// Grouping of inventory items, e.g. "Sleeping" or "Cooking".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
        }
    }
}

/// One physical thing the user owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    /// Grams.
    pub weight: u32,
    pub category_id: CategoryId,
}

impl InventoryItem {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        weight: u32,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            weight,
            category_id,
        }
    }
}

/// A category together with the items it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithItems {
    pub category: Category,
    pub items: Vec<InventoryItem>,
}

impl CategoryWithItems {
    pub fn total_weight(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.weight)).sum()
    }
}
