use crate::view_state::ViewState;
use crate::views::NewEntityForm;
use askama::Template;
use packager_core::TripType;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRow {
    pub id: Uuid,
    pub name: String,
    pub state: ViewState,
}

impl TypeRow {
    pub fn new(trip_type: &TripType, state: ViewState) -> Self {
        Self {
            id: trip_type.id,
            name: trip_type.name.clone(),
            state,
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

pub fn rows(types: &[TripType], edit: Option<Uuid>, state: &ViewState) -> Vec<TypeRow> {
    types
        .iter()
        .map(|trip_type| {
            let row_state = if edit == Some(trip_type.id) {
                state.clone()
            } else {
                ViewState::Normal
            };
            TypeRow::new(trip_type, row_state)
        })
        .collect()
}

#[derive(Template)]
#[template(path = "trip_types.html")]
pub struct TripTypesPage {
    pub rows: Vec<TypeRow>,
    pub form: NewEntityForm,
}

#[derive(Template)]
#[template(path = "trip_types_manager.html")]
pub struct TripTypesManager {
    pub rows: Vec<TypeRow>,
    pub form: NewEntityForm,
}

#[derive(Template)]
#[template(path = "trip_type_row.html")]
pub struct TripTypeRowFragment {
    pub row: TypeRow,
}
