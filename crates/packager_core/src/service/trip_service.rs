//! Trip use-case service.
//!
//! # Responsibility
//! - Create trips and edit one attribute at a time.
//! - Manage trip types and their attachment to trips.
//! - Assemble the trip overview, backfilling trip items first.
//!
//! # Invariants
//! - `end_date >= start_date` holds after every successful write.
//! - Trip item flags are only written through the backfilling repository
//!   path; a toggle can never hit a missing row.

use crate::model::inventory::ItemId;
use crate::model::trip::{
    Trip, TripAttribute, TripCategory, TripId, TripItem, TripItemFlag, TripState, TripType,
    TripTypeId, TripTypeSelection,
};
use crate::repo::trip_repo::TripRepository;
use crate::service::{inline_duplicates, Mutation, ServiceError, ServiceResult};
use crate::validate::{
    optional_text, parse_date, parse_temperature, validate_date_range, validate_name,
};
use log::info;

/// Raw form input for a new trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTripInput {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
}

/// Everything the trip detail view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripOverview {
    pub trip: Trip,
    pub types: Vec<TripTypeSelection>,
    pub categories: Vec<TripCategory>,
    pub total_picked_weight: u64,
}

impl TripOverview {
    pub fn category(&self, id: crate::model::inventory::CategoryId) -> Option<&TripCategory> {
        self.categories
            .iter()
            .find(|category| category.category_id == id)
    }
}

/// Trip service facade over repository implementations.
pub struct TripService<R: TripRepository> {
    repo: R,
}

impl<R: TripRepository> TripService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_trips(&self) -> ServiceResult<Vec<Trip>> {
        Ok(self.repo.list_trips()?)
    }

    pub fn get_trip(&self, id: TripId) -> ServiceResult<Option<Trip>> {
        Ok(self.repo.get_trip(id)?)
    }

    pub fn create_trip(&self, input: &NewTripInput) -> ServiceResult<Mutation<Trip>> {
        if let Err(err) = validate_name(&input.name) {
            return Ok(Mutation::rejected(err.to_string()));
        }
        let (start_date, end_date) = match parse_date(&input.start_date)
            .and_then(|start| parse_date(&input.end_date).map(|end| (start, end)))
        {
            Ok(dates) => dates,
            Err(message) => return Ok(Mutation::rejected(message)),
        };
        if let Err(message) = validate_date_range(start_date, end_date) {
            return Ok(Mutation::rejected(message));
        }

        let trip = Trip::new(input.name.as_str(), start_date, end_date);
        let outcome = inline_duplicates(self.repo.create_trip(&trip))?.map(|_| trip);
        if let Mutation::Applied(trip) = &outcome {
            info!("event=trip_create module=service status=ok id={}", trip.id);
        }
        Ok(outcome)
    }

    /// Sets one attribute of trip `id` from raw input.
    ///
    /// Blank input clears optional attributes; name and dates are required.
    /// Dates are checked against the stored trip inside the same
    /// transaction that writes the change.
    pub fn edit_attribute(
        &self,
        id: TripId,
        attribute: TripAttribute,
        value: &str,
    ) -> ServiceResult<Mutation<Trip>> {
        let written = self
            .repo
            .edit_trip(id, |trip| apply_attribute(trip, attribute, value));
        let outcome = match inline_duplicates(written)? {
            Mutation::Applied(Ok(trip)) => Mutation::Applied(trip),
            Mutation::Applied(Err(message)) | Mutation::Rejected(message) => {
                Mutation::Rejected(message)
            }
        };
        if outcome.is_applied() {
            info!(
                "event=trip_edit module=service status=ok id={id} attribute={}",
                attribute.as_str()
            );
        }
        Ok(outcome)
    }

    pub fn set_state(&self, id: TripId, state: TripState) -> ServiceResult<()> {
        self.repo.set_trip_state(id, state)?;
        info!(
            "event=trip_state module=service status=ok id={id} state={}",
            state.as_str()
        );
        Ok(())
    }

    pub fn delete_trip(&self, id: TripId) -> ServiceResult<()> {
        self.repo.delete_trip(id)?;
        info!("event=trip_delete module=service status=ok id={id}");
        Ok(())
    }

    pub fn list_trip_types(&self) -> ServiceResult<Vec<TripType>> {
        Ok(self.repo.list_trip_types()?)
    }

    pub fn create_trip_type(&self, name: &str) -> ServiceResult<Mutation<TripType>> {
        if let Err(err) = validate_name(name) {
            return Ok(Mutation::rejected(err.to_string()));
        }
        let trip_type = TripType::new(name);
        let outcome =
            inline_duplicates(self.repo.create_trip_type(&trip_type))?.map(|_| trip_type);
        if let Mutation::Applied(trip_type) = &outcome {
            info!(
                "event=trip_type_create module=service status=ok id={}",
                trip_type.id
            );
        }
        Ok(outcome)
    }

    pub fn rename_trip_type(
        &self,
        id: TripTypeId,
        name: &str,
    ) -> ServiceResult<Mutation<TripType>> {
        if let Err(err) = validate_name(name) {
            return Ok(Mutation::rejected(err.to_string()));
        }
        inline_duplicates(self.repo.rename_trip_type(id, name))
    }

    pub fn attach_type(&self, trip_id: TripId, type_id: TripTypeId) -> ServiceResult<()> {
        Ok(self.repo.attach_trip_type(trip_id, type_id)?)
    }

    pub fn detach_type(&self, trip_id: TripId, type_id: TripTypeId) -> ServiceResult<()> {
        Ok(self.repo.detach_trip_type(trip_id, type_id)?)
    }

    /// Loads the trip with its types and per-category items.
    ///
    /// # Side effects
    /// - Backfills missing trip item rows for inventory items added since
    ///   the trip was last viewed.
    pub fn overview(&self, id: TripId) -> ServiceResult<TripOverview> {
        let trip = self.repo.get_trip(id)?.ok_or(ServiceError::NotFound(id))?;
        self.repo.ensure_trip_items(id)?;
        Ok(TripOverview {
            types: self.repo.list_trip_type_selection(id)?,
            categories: self.repo.list_trip_categories(id)?,
            total_picked_weight: self.repo.total_picked_weight(id)?,
            trip,
        })
    }

    /// Sets `flag` on the trip item of `item_id`.
    pub fn set_item_flag(
        &self,
        trip_id: TripId,
        item_id: ItemId,
        flag: TripItemFlag,
        value: bool,
    ) -> ServiceResult<TripItem> {
        Ok(self.repo.set_trip_item_flag(trip_id, item_id, flag, value)?)
    }

    pub fn total_picked_weight(&self, trip_id: TripId) -> ServiceResult<u64> {
        Ok(self.repo.total_picked_weight(trip_id)?)
    }
}

fn apply_attribute(trip: &mut Trip, attribute: TripAttribute, value: &str) -> Result<(), String> {
    match attribute {
        TripAttribute::Name => validate_name(value)
            .map(|()| trip.name = value.to_string())
            .map_err(|err| err.to_string()),
        TripAttribute::Location => {
            trip.location = optional_text(value);
            Ok(())
        }
        TripAttribute::Comment => {
            trip.comment = optional_text(value);
            Ok(())
        }
        TripAttribute::StartDate => parse_date(value)
            .and_then(|date| validate_date_range(date, trip.end_date).map(|()| date))
            .map(|date| trip.start_date = date)
            .map_err(str::to_string),
        TripAttribute::EndDate => parse_date(value)
            .and_then(|date| validate_date_range(trip.start_date, date).map(|()| date))
            .map(|date| trip.end_date = date)
            .map_err(str::to_string),
        TripAttribute::TempMin => parse_temperature(value)
            .map(|temp| trip.temp_min = temp)
            .map_err(str::to_string),
        TripAttribute::TempMax => parse_temperature(value)
            .map(|temp| trip.temp_max = temp)
            .map_err(str::to_string),
    }
}
