use crate::forms::trip_location;
use crate::view_state::ViewState;
use crate::views::{attribute_state, format_weight, AttributeRow, NewEntityForm};
use askama::Template;
use packager_core::{Trip, TripAttribute, TripItem, TripItemFlag, TripOverview, TripState};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRow {
    pub id: Uuid,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub days: i64,
    pub state: String,
}

impl TripRow {
    pub fn new(trip: &Trip) -> Self {
        Self {
            id: trip.id,
            name: trip.name.clone(),
            start_date: trip.start_date.format("%Y-%m-%d").to_string(),
            end_date: trip.end_date.format("%Y-%m-%d").to_string(),
            days: trip.duration_days(),
            state: trip.state.to_string(),
        }
    }
}

/// New-trip form echoing rejected input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTripForm {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub error: Option<String>,
}

impl NewTripForm {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateButton {
    pub value: &'static str,
    pub label: String,
    pub current: bool,
}

impl StateButton {
    fn new(state: TripState, current: TripState) -> Self {
        Self {
            value: state.as_str(),
            label: state.to_string(),
            current: state == current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeToggle {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripCategoryEntry {
    pub id: Uuid,
    pub name: String,
    pub picked_weight: String,
    pub item_count: usize,
    pub fully_packed: bool,
    pub active: bool,
}

/// One item row with its pick, pack and ready toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripItemRow {
    pub trip_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub weight: String,
    pub pick: bool,
    pub pack: bool,
    pub ready: bool,
    /// `&category=<id>` suffix keeping the active category on redirect.
    pub category_query: String,
}

impl TripItemRow {
    pub fn new(item: &TripItem, active_category: Option<Uuid>) -> Self {
        Self {
            trip_id: item.trip_id,
            item_id: item.item_id,
            name: item.name.clone(),
            weight: format_weight(u64::from(item.weight)),
            pick: item.pick,
            pack: item.pack,
            ready: item.ready,
            category_query: active_category
                .map(|id| format!("&category={id}"))
                .unwrap_or_default(),
        }
    }

    pub fn pick_action(&self) -> &'static str {
        if self.pick {
            "unpick"
        } else {
            "pick"
        }
    }

    pub fn pack_action(&self) -> &'static str {
        if self.pack {
            "unpack"
        } else {
            "pack"
        }
    }

    pub fn ready_action(&self) -> &'static str {
        if self.ready {
            "unready"
        } else {
            "ready"
        }
    }
}

/// Builds the detail page from an overview.
///
/// `edit` names the attribute requested for editing; `state` applies to it.
pub fn trip_page(
    overview: &TripOverview,
    edit: Option<&str>,
    state: &ViewState,
    active_category: Option<Uuid>,
) -> TripPage {
    let trip = &overview.trip;
    let base = format!("/trips/{}/", trip.id);
    let attributes = TripAttribute::ALL
        .into_iter()
        .map(|attribute| {
            let key = attribute.as_str();
            AttributeRow {
                key,
                label: attribute.label(),
                display: attribute.value_of(trip),
                field: "value",
                input_type: attribute.input_type(),
                input_value: attribute.value_of(trip),
                options: Vec::new(),
                hidden: Vec::new(),
                action: format!("{base}edit/{key}/submit/"),
                edit_href: format!("{base}?edit={key}"),
                cancel_href: base.clone(),
                state: attribute_state(key, edit, state),
            }
        })
        .collect();

    let categories = overview
        .categories
        .iter()
        .map(|category| TripCategoryEntry {
            id: category.category_id,
            name: category.name.clone(),
            picked_weight: format_weight(category.picked_weight()),
            item_count: category.items.len(),
            fully_packed: category.fully_packed(),
            active: active_category == Some(category.category_id),
        })
        .collect();

    let active = active_category.and_then(|id| overview.category(id));
    let items = active
        .map(|category| {
            category
                .items
                .iter()
                .map(|item| TripItemRow::new(item, active_category))
                .collect()
        })
        .unwrap_or_default();

    TripPage {
        trip_id: trip.id,
        name: trip.name.clone(),
        days: trip.duration_days(),
        state_label: trip.state.to_string(),
        prev_state: trip
            .state
            .prev()
            .map(|prev| StateButton::new(prev, trip.state)),
        next_state: trip
            .state
            .next()
            .map(|next| StateButton::new(next, trip.state)),
        states: TripState::ALL
            .into_iter()
            .map(|candidate| StateButton::new(candidate, trip.state))
            .collect(),
        attributes,
        types: overview
            .types
            .iter()
            .map(|selection| TypeToggle {
                id: selection.trip_type.id,
                name: selection.trip_type.name.clone(),
                active: selection.active,
            })
            .collect(),
        categories,
        summary_href: trip_location(trip.id, active_category),
        active_category_name: active.map(|category| category.name.clone()),
        items,
        total_picked_weight: format_weight(overview.total_picked_weight),
    }
}

#[derive(Template)]
#[template(path = "trips.html")]
pub struct TripsPage {
    pub rows: Vec<TripRow>,
    pub form: NewTripForm,
}

#[derive(Template)]
#[template(path = "trip_form.html")]
pub struct TripFormFragment {
    pub form: NewTripForm,
}

#[derive(Template)]
#[template(path = "trip.html")]
pub struct TripPage {
    pub trip_id: Uuid,
    pub name: String,
    pub days: i64,
    pub state_label: String,
    pub prev_state: Option<StateButton>,
    pub next_state: Option<StateButton>,
    pub states: Vec<StateButton>,
    pub attributes: Vec<AttributeRow>,
    pub types: Vec<TypeToggle>,
    pub categories: Vec<TripCategoryEntry>,
    /// Page URL the summary re-selects itself from after an item edit.
    pub summary_href: String,
    pub active_category_name: Option<String>,
    pub items: Vec<TripItemRow>,
    pub total_picked_weight: String,
}

#[derive(Template)]
#[template(path = "trip_item_row.html")]
pub struct TripItemRowFragment {
    pub row: TripItemRow,
}

/// The two passes of the package list: first fetch, then pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackingStep {
    Fetch,
    Pack,
}

impl PackingStep {
    /// Step a flag belongs to; picking happens on the trip page.
    pub fn from_flag(flag: TripItemFlag) -> Option<Self> {
        match flag {
            TripItemFlag::Ready => Some(Self::Fetch),
            TripItemFlag::Pack => Some(Self::Pack),
            TripItemFlag::Pick => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingRow {
    pub trip_id: Uuid,
    pub item_id: Uuid,
    pub name: String,
    pub weight: String,
    pub step: PackingStep,
    pub done: bool,
}

impl PackingRow {
    pub fn new(item: &TripItem, step: PackingStep) -> Self {
        Self {
            trip_id: item.trip_id,
            item_id: item.item_id,
            name: item.name.clone(),
            weight: format_weight(u64::from(item.weight)),
            step,
            done: match step {
                PackingStep::Fetch => item.ready,
                PackingStep::Pack => item.pack,
            },
        }
    }

    pub fn action(&self) -> &'static str {
        match (self.step, self.done) {
            (PackingStep::Fetch, true) => "unready",
            (PackingStep::Fetch, false) => "ready",
            (PackingStep::Pack, true) => "unpack",
            (PackingStep::Pack, false) => "pack",
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.step, self.done) {
            (PackingStep::Fetch, true) => "Ready",
            (PackingStep::Fetch, false) => "Get it",
            (PackingStep::Pack, true) => "Packed",
            (PackingStep::Pack, false) => "Pack",
        }
    }

    pub fn dom_id(&self) -> String {
        let step = match self.step {
            PackingStep::Fetch => "fetch",
            PackingStep::Pack => "pack",
        };
        format!("packing-{step}-{}", self.item_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingCategory {
    pub name: String,
    pub rows: Vec<PackingRow>,
}

/// Builds the package list: picked items still to fetch, then every picked
/// item to pack, both grouped by category.
pub fn packing_page(overview: &TripOverview) -> TripPackingPage {
    let unready = overview
        .categories
        .iter()
        .filter_map(|category| {
            let rows: Vec<PackingRow> = category
                .unready_items()
                .map(|item| PackingRow::new(item, PackingStep::Fetch))
                .collect();
            (!rows.is_empty()).then(|| PackingCategory {
                name: category.name.clone(),
                rows,
            })
        })
        .collect();

    let categories = overview
        .categories
        .iter()
        .map(|category| PackingCategory {
            name: category.name.clone(),
            rows: category
                .picked_items()
                .map(|item| PackingRow::new(item, PackingStep::Pack))
                .collect(),
        })
        .collect();

    TripPackingPage {
        trip_id: overview.trip.id,
        name: overview.trip.name.clone(),
        unready,
        categories,
    }
}

#[derive(Template)]
#[template(path = "trip_packing.html")]
pub struct TripPackingPage {
    pub trip_id: Uuid,
    pub name: String,
    pub unready: Vec<PackingCategory>,
    pub categories: Vec<PackingCategory>,
}

#[derive(Template)]
#[template(path = "trip_packing_row.html")]
pub struct PackingRowFragment {
    pub row: PackingRow,
}

impl From<&NewEntityForm> for NewTripForm {
    fn from(value: &NewEntityForm) -> Self {
        Self {
            name: value.name.clone(),
            error: value.error.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PackingRow, PackingStep};
    use packager_core::{TripItem, TripItemFlag};
    use uuid::Uuid;

    fn item(pack: bool, ready: bool) -> TripItem {
        TripItem {
            trip_id: Uuid::new_v4(),
            item_id: Uuid::new_v4(),
            name: "Stove".to_string(),
            weight: 350,
            category_id: Uuid::new_v4(),
            pick: true,
            pack,
            ready,
        }
    }

    #[test]
    fn packing_row_offers_the_opposite_action() {
        let fetched = PackingRow::new(&item(false, true), PackingStep::Fetch);
        assert!(fetched.done);
        assert_eq!(fetched.action(), "unready");
        assert!(fetched.dom_id().starts_with("packing-fetch-"));

        let unpacked = PackingRow::new(&item(false, true), PackingStep::Pack);
        assert!(!unpacked.done);
        assert_eq!(unpacked.action(), "pack");
        assert_eq!(unpacked.weight, "350 g");
    }

    #[test]
    fn picking_is_not_a_packing_step() {
        assert_eq!(PackingStep::from_flag(TripItemFlag::Pick), None);
        assert_eq!(
            PackingStep::from_flag(TripItemFlag::Ready),
            Some(PackingStep::Fetch)
        );
    }
}
