//! Form bodies and query strings accepted by the routes.
//!
//! Text fields default to empty so a missing field reaches the validator
//! instead of failing extraction.

use packager_core::TripItemFlag;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub category_id: String,
    /// Detail-view attribute the submit came from, if any.
    #[serde(default)]
    pub attribute: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValueForm {
    #[serde(default)]
    pub value: String,
}

/// `?edit=<id>&error=1&msg=...` on collection views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditQuery {
    pub edit: Option<Uuid>,
    pub error: Option<u8>,
    pub msg: Option<String>,
}

/// Which inventory form a redirected error belongs to.
pub const FORM_CATEGORY: &str = "category";
pub const FORM_ITEM: &str = "item";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryQuery {
    pub edit: Option<Uuid>,
    pub error: Option<u8>,
    pub msg: Option<String>,
    pub form: Option<String>,
}

impl InventoryQuery {
    /// Error message addressed to the form named `form`.
    pub fn form_error(&self, form: &str) -> Option<String> {
        if self.edit.is_some() || self.form.as_deref() != Some(form) {
            return None;
        }
        match (self.error, self.msg.as_deref()) {
            (Some(flag), Some(message)) if flag != 0 => Some(message.to_string()),
            _ => None,
        }
    }
}

/// `?edit=<attribute>&error=1&msg=...` on detail views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttributeQuery {
    pub edit: Option<String>,
    pub error: Option<u8>,
    pub msg: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripQuery {
    pub edit: Option<String>,
    pub error: Option<u8>,
    pub msg: Option<String>,
    pub category: Option<Uuid>,
    pub item_pick: Option<Uuid>,
    pub item_unpick: Option<Uuid>,
    pub item_pack: Option<Uuid>,
    pub item_unpack: Option<Uuid>,
    pub item_ready: Option<Uuid>,
    pub item_unready: Option<Uuid>,
}

impl TripQuery {
    /// The requested flag change, if any; the first present parameter wins.
    pub fn toggle(&self) -> Option<(Uuid, TripItemFlag, bool)> {
        [
            (self.item_pick, TripItemFlag::Pick, true),
            (self.item_unpick, TripItemFlag::Pick, false),
            (self.item_pack, TripItemFlag::Pack, true),
            (self.item_unpack, TripItemFlag::Pack, false),
            (self.item_ready, TripItemFlag::Ready, true),
            (self.item_unready, TripItemFlag::Ready, false),
        ]
        .into_iter()
        .find_map(|(item, flag, value)| item.map(|id| (id, flag, value)))
    }

    /// Trip page URL without toggle parameters, keeping the active category.
    pub fn stripped_location(&self, trip_id: Uuid) -> String {
        trip_location(trip_id, self.category)
    }
}

/// Trip page URL, with the active category when there is one.
pub fn trip_location(trip_id: Uuid, category: Option<Uuid>) -> String {
    match category {
        Some(category) => format!("/trips/{trip_id}/?category={category}"),
        None => format!("/trips/{trip_id}/"),
    }
}

/// Parses the `<pick|unpick|pack|unpack|ready|unready>` path segment.
pub fn parse_toggle_action(action: &str) -> Option<(TripItemFlag, bool)> {
    match action {
        "pick" => Some((TripItemFlag::Pick, true)),
        "unpick" => Some((TripItemFlag::Pick, false)),
        "pack" => Some((TripItemFlag::Pack, true)),
        "unpack" => Some((TripItemFlag::Pack, false)),
        "ready" => Some((TripItemFlag::Ready, true)),
        "unready" => Some((TripItemFlag::Ready, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_toggle_action, InventoryQuery, TripQuery, FORM_CATEGORY, FORM_ITEM};
    use packager_core::TripItemFlag;
    use uuid::Uuid;

    #[test]
    fn toggle_is_read_from_first_present_parameter() {
        let item = Uuid::new_v4();
        let query = TripQuery {
            item_unpack: Some(item),
            ..TripQuery::default()
        };
        assert_eq!(query.toggle(), Some((item, TripItemFlag::Pack, false)));
        assert_eq!(TripQuery::default().toggle(), None);
    }

    #[test]
    fn stripped_location_keeps_category() {
        let trip = Uuid::new_v4();
        let category = Uuid::new_v4();
        let query = TripQuery {
            category: Some(category),
            item_pick: Some(Uuid::new_v4()),
            ..TripQuery::default()
        };
        assert_eq!(
            query.stripped_location(trip),
            format!("/trips/{trip}/?category={category}")
        );
    }

    #[test]
    fn unknown_toggle_action_is_rejected() {
        assert_eq!(parse_toggle_action("pack"), Some((TripItemFlag::Pack, true)));
        assert_eq!(
            parse_toggle_action("unready"),
            Some((TripItemFlag::Ready, false))
        );
        assert_eq!(parse_toggle_action("wear"), None);
    }

    #[test]
    fn inventory_error_is_routed_to_named_form() {
        let query = InventoryQuery {
            error: Some(1),
            msg: Some("Name cannot be empty".to_string()),
            form: Some(FORM_ITEM.to_string()),
            ..InventoryQuery::default()
        };
        assert_eq!(
            query.form_error(FORM_ITEM).as_deref(),
            Some("Name cannot be empty")
        );
        assert_eq!(query.form_error(FORM_CATEGORY), None);
    }
}
