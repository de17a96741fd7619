//! Inventory use-case service.
//!
//! # Invariants
//! - Item name is validated before weight; the first failing rule wins.
//! - Items are only written into existing categories.

use crate::model::inventory::{Category, CategoryId, CategoryWithItems, InventoryItem, ItemId};
use crate::repo::inventory_repo::InventoryRepository;
use crate::repo::RepoError;
use crate::service::{inline_duplicates, Mutation, ServiceResult};
use crate::validate::{duplicate_name_message, optional_text, parse_weight, validate_name};
use log::info;

const CATEGORY_NOT_EMPTY_MESSAGE: &str = "Category still contains items";

/// Raw form input for creating or editing an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInput {
    pub name: String,
    pub description: String,
    /// Unparsed weight in grams.
    pub weight: String,
    pub category_id: CategoryId,
}

/// Inventory service facade over repository implementations.
pub struct InventoryService<R: InventoryRepository> {
    repo: R,
}

impl<R: InventoryRepository> InventoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_categories(&self) -> ServiceResult<Vec<CategoryWithItems>> {
        Ok(self.repo.list_categories_with_items()?)
    }

    pub fn get_category(&self, id: CategoryId) -> ServiceResult<Option<Category>> {
        Ok(self.repo.get_category(id)?)
    }

    pub fn create_category(
        &self,
        name: &str,
        description: &str,
    ) -> ServiceResult<Mutation<Category>> {
        if let Err(err) = validate_name(name) {
            return Ok(Mutation::rejected(err.to_string()));
        }

        let category = Category::new(name, optional_text(description));
        let outcome = inline_duplicates(self.repo.create_category(&category))?.map(|_| category);
        if let Mutation::Applied(category) = &outcome {
            info!(
                "event=category_create module=service status=ok id={}",
                category.id
            );
        }
        Ok(outcome)
    }

    /// Deletes an empty category; a category with items is rejected inline.
    pub fn delete_category(&self, id: CategoryId) -> ServiceResult<Mutation<()>> {
        match self.repo.delete_category(id) {
            Ok(()) => {
                info!("event=category_delete module=service status=ok id={id}");
                Ok(Mutation::Applied(()))
            }
            Err(RepoError::StillReferenced(_)) => {
                Ok(Mutation::rejected(CATEGORY_NOT_EMPTY_MESSAGE))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn create_item(&self, input: &ItemInput) -> ServiceResult<Mutation<InventoryItem>> {
        let weight = match check_item_input(input) {
            Ok(weight) => weight,
            Err(message) => return Ok(Mutation::Rejected(message)),
        };

        let item = InventoryItem::new(
            input.name.as_str(),
            optional_text(&input.description),
            weight,
            input.category_id,
        );
        let outcome = inline_duplicates(self.repo.create_item(&item))?.map(|_| item);
        if let Mutation::Applied(item) = &outcome {
            info!("event=item_create module=service status=ok id={}", item.id);
        }
        Ok(outcome)
    }

    /// Replaces name, description, weight and category of item `id`.
    pub fn edit_item(
        &self,
        id: ItemId,
        input: &ItemInput,
    ) -> ServiceResult<Mutation<InventoryItem>> {
        let weight = match check_item_input(input) {
            Ok(weight) => weight,
            Err(message) => return Ok(Mutation::Rejected(message)),
        };

        let item = InventoryItem {
            id,
            name: input.name.clone(),
            description: optional_text(&input.description),
            weight,
            category_id: input.category_id,
        };
        let outcome = inline_duplicates(self.repo.update_item(&item))?.map(|()| item);
        if outcome.is_applied() {
            info!("event=item_edit module=service status=ok id={id}");
        }
        Ok(outcome)
    }

    pub fn get_item(&self, id: ItemId) -> ServiceResult<Option<InventoryItem>> {
        Ok(self.repo.get_item(id)?)
    }

    pub fn list_items(&self, category_id: CategoryId) -> ServiceResult<Vec<InventoryItem>> {
        Ok(self.repo.list_items(Some(category_id))?)
    }

    pub fn delete_item(&self, id: ItemId) -> ServiceResult<()> {
        self.repo.delete_item(id)?;
        info!("event=item_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Read-only check of a prospective item name, including uniqueness.
    pub fn check_new_item_name(&self, name: &str) -> ServiceResult<Option<String>> {
        if let Err(err) = validate_name(name) {
            return Ok(Some(err.to_string()));
        }
        if self.repo.item_name_exists(name)? {
            return Ok(Some(duplicate_name_message(name)));
        }
        Ok(None)
    }

    pub fn total_weight(&self) -> ServiceResult<u64> {
        Ok(self.repo.total_weight()?)
    }
}

fn check_item_input(input: &ItemInput) -> Result<u32, String> {
    validate_name(&input.name).map_err(|err| err.to_string())?;
    parse_weight(&input.weight).map_err(str::to_string)
}
