//! Package list use-case service.
//!
//! # Invariants
//! - Names are validated before any store access.
//! - Uniqueness is enforced by the store; a duplicate leaves the previous
//!   row untouched.

use crate::model::package_list::{PackageList, PackageListId};
use crate::repo::package_list_repo::PackageListRepository;
use crate::service::{inline_duplicates, Mutation, ServiceResult};
use crate::validate::{duplicate_name_message, optional_text, validate_name};
use log::info;

/// Package list service facade over repository implementations.
pub struct PackageListService<R: PackageListRepository> {
    repo: R,
}

impl<R: PackageListRepository> PackageListService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_lists(&self) -> ServiceResult<Vec<PackageList>> {
        Ok(self.repo.list_lists()?)
    }

    pub fn get_list(&self, id: PackageListId) -> ServiceResult<Option<PackageList>> {
        Ok(self.repo.get_list(id)?)
    }

    /// Creates a list; blank description is stored as `None`.
    pub fn create_list(&self, name: &str, description: &str) -> ServiceResult<Mutation<PackageList>> {
        if let Err(err) = validate_name(name) {
            return Ok(Mutation::rejected(err.to_string()));
        }

        let list = PackageList::new(name, optional_text(description));
        let outcome = inline_duplicates(self.repo.create_list(&list))?.map(|_| list);
        if let Mutation::Applied(list) = &outcome {
            info!(
                "event=package_list_create module=service status=ok id={}",
                list.id
            );
        }
        Ok(outcome)
    }

    /// Replaces name and description of list `id`.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` when `id` does not resolve, checked after
    ///   name validation.
    pub fn rename_list(
        &self,
        id: PackageListId,
        name: &str,
        description: &str,
    ) -> ServiceResult<Mutation<PackageList>> {
        if let Err(err) = validate_name(name) {
            return Ok(Mutation::rejected(err.to_string()));
        }

        let description = optional_text(description);
        let outcome = inline_duplicates(self.repo.rename_list(id, name, description.as_deref()))?;
        if outcome.is_applied() {
            info!("event=package_list_rename module=service status=ok id={id}");
        }
        Ok(outcome)
    }

    pub fn delete_list(&self, id: PackageListId) -> ServiceResult<()> {
        self.repo.delete_list(id)?;
        info!("event=package_list_delete module=service status=ok id={id}");
        Ok(())
    }

    /// Read-only check of a prospective name, including uniqueness.
    ///
    /// Returns the message to show, or `None` when the name is usable.
    pub fn check_new_name(&self, name: &str) -> ServiceResult<Option<String>> {
        if let Err(err) = validate_name(name) {
            return Ok(Some(err.to_string()));
        }
        if self.repo.list_name_exists(name)? {
            return Ok(Some(duplicate_name_message(name)));
        }
        Ok(None)
    }
}
