//! View models and askama templates.
//!
//! View models are plain values computed per request from core entities and
//! a `ViewState`; templates only branch on their helper methods.

pub mod inventory;
pub mod package_list;
pub mod trip;
pub mod trip_type;

use crate::view_state::ViewState;

/// Form for creating a named entity, echoing rejected input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntityForm {
    pub name: String,
    pub description: String,
    pub error: Option<String>,
}

impl NewEntityForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn rejected(name: &str, description: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            error: Some(message.into()),
        }
    }

    /// Form after a read-only name check; `message` is `None` when usable.
    pub fn checked(name: &str, description: &str, message: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            error: message,
        }
    }

    /// Form reconstructed from `?error=1&msg=...` without an edit target.
    pub fn from_query(error: Option<u8>, message: Option<&str>) -> Self {
        match (error, message) {
            (Some(flag), Some(message)) if flag != 0 => Self {
                error: Some(message.to_string()),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

/// One attribute of a detail view, editable on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub key: &'static str,
    pub label: &'static str,
    pub display: String,
    /// Form field name submitted for this attribute.
    pub field: &'static str,
    pub input_type: &'static str,
    pub input_value: String,
    /// Non-empty for attributes chosen from a fixed set.
    pub options: Vec<SelectOption>,
    /// Other fields the submit endpoint needs alongside this one.
    pub hidden: Vec<HiddenField>,
    pub action: String,
    pub edit_href: String,
    pub cancel_href: String,
    pub state: ViewState,
}

impl AttributeRow {
    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn has_error(&self) -> bool {
        self.state.message().is_some()
    }

    pub fn error_text(&self) -> &str {
        self.state.message().unwrap_or_default()
    }

    pub fn is_select(&self) -> bool {
        !self.options.is_empty()
    }
}

/// State for attribute `key` when the page was requested with `?edit=<edit>`.
pub(crate) fn attribute_state(key: &str, edit: Option<&str>, state: &ViewState) -> ViewState {
    if edit == Some(key) {
        state.clone()
    } else {
        ViewState::Normal
    }
}

/// Formats grams for display.
pub(crate) fn format_weight(grams: u64) -> String {
    if grams >= 1000 {
        format!("{}.{:03} kg", grams / 1000, grams % 1000)
    } else {
        format!("{grams} g")
    }
}

#[cfg(test)]
mod tests {
    use super::{attribute_state, format_weight, NewEntityForm};
    use crate::view_state::ViewState;

    #[test]
    fn weights_switch_to_kilograms() {
        assert_eq!(format_weight(950), "950 g");
        assert_eq!(format_weight(1200), "1.200 kg");
    }

    #[test]
    fn only_requested_attribute_is_editable() {
        let state = ViewState::error("bad");
        assert_eq!(attribute_state("name", Some("name"), &state), state);
        assert_eq!(
            attribute_state("comment", Some("name"), &state),
            ViewState::Normal
        );
        assert_eq!(attribute_state("name", None, &state), ViewState::Normal);
    }

    #[test]
    fn form_error_comes_from_query_flag() {
        assert!(!NewEntityForm::from_query(None, Some("x")).has_error());
        assert_eq!(
            NewEntityForm::from_query(Some(1), Some("x")).error_text(),
            "x"
        );
    }
}
