//! Trip, trip type and per-trip item state.
//!
//! # Invariants
//! - `end_date` is never before `start_date`.
//! - There is at most one `TripItem` per `(trip_id, item_id)` pair.
//! - A packed or ready item is always picked.

use crate::model::inventory::{CategoryId, ItemId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type TripId = Uuid;
pub type TripTypeId = Uuid;

/// Lifecycle of a trip, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripState {
    Planning,
    Planned,
    Active,
    Review,
    Done,
}

impl TripState {
    pub const ALL: [TripState; 5] = [
        Self::Planning,
        Self::Planned,
        Self::Active,
        Self::Review,
        Self::Done,
    ];

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Planning => Some(Self::Planned),
            Self::Planned => Some(Self::Active),
            Self::Active => Some(Self::Review),
            Self::Review => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub fn prev(self) -> Option<Self> {
        match self {
            Self::Planning => None,
            Self::Planned => Some(Self::Planning),
            Self::Active => Some(Self::Planned),
            Self::Review => Some(Self::Active),
            Self::Done => Some(Self::Review),
        }
    }

    /// Storage and URL form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Planned => "planned",
            Self::Active => "active",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == value)
    }
}

impl Display for TripState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Planning => "Planning",
            Self::Planned => "Planned",
            Self::Active => "Active",
            Self::Review => "Review",
            Self::Done => "Done",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location: Option<String>,
    /// Degrees Celsius.
    pub temp_min: Option<i64>,
    /// Degrees Celsius.
    pub temp_max: Option<i64>,
    pub comment: Option<String>,
    pub state: TripState,
}

impl Trip {
    /// Creates a trip in `Planning` state with no optional details.
    pub fn new(name: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_date,
            end_date,
            location: None,
            temp_min: None,
            temp_max: None,
            comment: None,
            state: TripState::Planning,
        }
    }

    /// Number of days, counting both the start and the end day.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Trip attributes that can be edited one at a time on the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripAttribute {
    Name,
    Location,
    StartDate,
    EndDate,
    TempMin,
    TempMax,
    Comment,
}

impl TripAttribute {
    pub const ALL: [TripAttribute; 7] = [
        Self::Name,
        Self::Location,
        Self::StartDate,
        Self::EndDate,
        Self::TempMin,
        Self::TempMax,
        Self::Comment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "location",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::TempMin => "temp_min",
            Self::TempMax => "temp_max",
            Self::Comment => "comment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Location => "Location",
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::TempMin => "Temp (min)",
            Self::TempMax => "Temp (max)",
            Self::Comment => "Comment",
        }
    }

    /// HTML input type used when the attribute is edited.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::StartDate | Self::EndDate => "date",
            Self::TempMin | Self::TempMax => "number",
            Self::Name | Self::Location | Self::Comment => "text",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.as_str() == value)
    }

    /// Current value of this attribute on `trip`, formatted for display.
    pub fn value_of(self, trip: &Trip) -> String {
        match self {
            Self::Name => trip.name.clone(),
            Self::Location => trip.location.clone().unwrap_or_default(),
            Self::StartDate => trip.start_date.format("%Y-%m-%d").to_string(),
            Self::EndDate => trip.end_date.format("%Y-%m-%d").to_string(),
            Self::TempMin => trip.temp_min.map(|t| t.to_string()).unwrap_or_default(),
            Self::TempMax => trip.temp_max.map(|t| t.to_string()).unwrap_or_default(),
            Self::Comment => trip.comment.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripType {
    pub id: TripTypeId,
    pub name: String,
}

impl TripType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

/// A trip type together with whether it is attached to a given trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripTypeSelection {
    pub trip_type: TripType,
    pub active: bool,
}

/// Per-trip boolean flags on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripItemFlag {
    /// "Shall I bring this?"
    Pick,
    /// "Have I packed this?"
    Pack,
    /// "Have I got this out and laid it ready?"
    Ready,
}

impl TripItemFlag {
    pub fn column(self) -> &'static str {
        match self {
            Self::Pick => "pick",
            Self::Pack => "pack",
            Self::Ready => "ready",
        }
    }
}

/// Per-trip state row of one inventory item, joined with the item itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripItem {
    pub trip_id: TripId,
    pub item_id: ItemId,
    pub name: String,
    pub weight: u32,
    pub category_id: CategoryId,
    pub pick: bool,
    pub pack: bool,
    pub ready: bool,
}

/// Items of one category for one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripCategory {
    pub category_id: CategoryId,
    pub name: String,
    pub items: Vec<TripItem>,
}

impl TripCategory {
    pub fn picked_weight(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| item.pick)
            .map(|item| u64::from(item.weight))
            .sum()
    }

    /// Whether every picked item of this category is packed.
    pub fn fully_packed(&self) -> bool {
        self.picked_items().all(|item| item.pack)
    }

    pub fn picked_items(&self) -> impl Iterator<Item = &TripItem> {
        self.items.iter().filter(|item| item.pick)
    }

    /// Picked items that still have to be fetched.
    pub fn unready_items(&self) -> impl Iterator<Item = &TripItem> {
        self.picked_items().filter(|item| !item.ready)
    }
}

#[cfg(test)]
mod tests {
    use super::{Trip, TripAttribute, TripCategory, TripItem, TripState};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn trip_state_walks_forward_and_back() {
        assert_eq!(TripState::Planning.next(), Some(TripState::Planned));
        assert_eq!(TripState::Done.next(), None);
        assert_eq!(TripState::Planning.prev(), None);
        assert_eq!(TripState::Review.prev(), Some(TripState::Active));
    }

    #[test]
    fn trip_state_parses_storage_form_only() {
        assert_eq!(TripState::parse("active"), Some(TripState::Active));
        assert_eq!(TripState::parse("Active"), None);
        assert_eq!(TripState::parse("init"), None);
    }

    #[test]
    fn attribute_values_are_formatted_for_inputs() {
        let mut trip = Trip::new(
            "Alps",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 3).unwrap(),
        );
        trip.temp_min = Some(-4);

        assert_eq!(TripAttribute::StartDate.value_of(&trip), "2024-07-01");
        assert_eq!(TripAttribute::TempMin.value_of(&trip), "-4");
        assert_eq!(TripAttribute::Location.value_of(&trip), "");
        assert_eq!(trip.duration_days(), 3);
    }

    #[test]
    fn packing_helpers_only_consider_picked_items() {
        let category_id = Uuid::new_v4();
        let item = |pick: bool, pack: bool, ready: bool| TripItem {
            trip_id: Uuid::nil(),
            item_id: Uuid::new_v4(),
            name: "Stove".to_string(),
            weight: 350,
            category_id,
            pick,
            pack,
            ready,
        };
        let category = TripCategory {
            category_id,
            name: "Cooking".to_string(),
            items: vec![
                item(true, true, true),
                item(true, false, false),
                item(false, false, false),
            ],
        };

        assert_eq!(category.picked_items().count(), 2);
        assert_eq!(category.unready_items().count(), 1);
        assert!(!category.fully_packed());
        assert_eq!(category.picked_weight(), 700);
    }
}
