//! Trip type manager routes.

use crate::error::WebResult;
use crate::forms::{EditQuery, NameForm};
use crate::htmx::{created, error_location, ok, see_other, Transport};
use crate::routes::trip::service;
use crate::view_state::ViewState;
use crate::views::trip_type::{rows, TripTypeRowFragment, TripTypesManager, TripTypesPage, TypeRow};
use crate::views::NewEntityForm;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use packager_core::{Mutation, TripType};
use uuid::Uuid;

const TYPES_PATH: &str = "/trips/types/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(TYPES_PATH, get(manager).post(create))
        .route("/trips/types/:id/edit/submit/", post(rename))
}

async fn manager(
    State(state): State<AppState>,
    Query(query): Query<EditQuery>,
) -> WebResult<Response> {
    let types = state
        .store
        .with_conn(|conn| Ok(service(conn).list_trip_types()?))?;

    let row_state = ViewState::from_query(query.error, query.msg.as_deref());
    let form = match query.edit {
        Some(_) => NewEntityForm::blank(),
        None => NewEntityForm::from_query(query.error, query.msg.as_deref()),
    };
    ok(&TripTypesPage {
        rows: rows(&types, query.edit, &row_state),
        form,
    })
}

async fn create(
    State(state): State<AppState>,
    transport: Transport,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let (outcome, types) = state.store.with_conn(|conn| {
        let service = service(conn);
        let outcome = service.create_trip_type(&form.name)?;
        Ok((outcome, service.list_trip_types()?))
    })?;

    let rows = rows(&types, None, &ViewState::Normal);
    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(_)) => created(&TripTypesManager {
            rows,
            form: NewEntityForm::blank(),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => ok(&TripTypesManager {
            rows,
            form: NewEntityForm::rejected(&form.name, "", message),
        }),
        (Transport::Full, Mutation::Applied(_)) => Ok(see_other(TYPES_PATH)),
        (Transport::Full, Mutation::Rejected(message)) => {
            Ok(see_other(&error_location(TYPES_PATH, None, &message)))
        }
    }
}

async fn rename(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let outcome = state
        .store
        .with_conn(|conn| Ok(service(conn).rename_trip_type(id, &form.name)?))?;

    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(trip_type)) => ok(&TripTypeRowFragment {
            row: TypeRow::new(&trip_type, ViewState::Normal),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => ok(&TripTypeRowFragment {
            row: TypeRow::new(
                &TripType {
                    id,
                    name: form.name.clone(),
                },
                ViewState::error(message),
            ),
        }),
        (Transport::Full, Mutation::Applied(_)) => Ok(see_other(TYPES_PATH)),
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&error_location(
            TYPES_PATH,
            Some(&id.to_string()),
            &message,
        ))),
    }
}
