use crate::view_state::ViewState;
use crate::views::NewEntityForm;
use askama::Template;
use packager_core::PackageList;
use uuid::Uuid;

/// A package list row in normal or edit variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub state: ViewState,
}

impl ListRow {
    pub fn new(list: &PackageList, state: ViewState) -> Self {
        Self {
            id: list.id,
            name: list.name.clone(),
            description: list.description.clone().unwrap_or_default(),
            state,
        }
    }

    /// Edit row echoing input that failed to apply to row `id`.
    pub fn rejected(id: Uuid, name: &str, description: &str, message: String) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            state: ViewState::error(message),
        }
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn has_error(&self) -> bool {
        self.state.message().is_some()
    }

    pub fn error_text(&self) -> &str {
        self.state.message().unwrap_or_default()
    }
}

/// Rows for the manager; only `edit` gets `state`.
pub fn rows(lists: &[PackageList], edit: Option<Uuid>, state: &ViewState) -> Vec<ListRow> {
    lists
        .iter()
        .map(|list| {
            let row_state = if edit == Some(list.id) {
                state.clone()
            } else {
                ViewState::Normal
            };
            ListRow::new(list, row_state)
        })
        .collect()
}

#[derive(Template)]
#[template(path = "package_lists.html")]
pub struct PackageListsPage {
    pub rows: Vec<ListRow>,
    pub form: NewEntityForm,
}

#[derive(Template)]
#[template(path = "package_list_manager.html")]
pub struct PackageListManager {
    pub rows: Vec<ListRow>,
    pub form: NewEntityForm,
}

#[derive(Template)]
#[template(path = "package_list_row.html")]
pub struct PackageListRow {
    pub row: ListRow,
}

#[derive(Template)]
#[template(path = "package_list_form.html")]
pub struct NewPackageListForm {
    pub form: NewEntityForm,
}
