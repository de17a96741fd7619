//! Trip routes: trip manager, detail view, attributes, state, types, item
//! toggles and the package list.

use crate::error::{WebError, WebResult};
use crate::forms::{parse_toggle_action, AttributeQuery, TripForm, TripQuery, ValueForm};
use crate::htmx::{
    created_redirect, error_location, ok, see_other, with_trigger, Event, Transport,
};
use crate::view_state::ViewState;
use crate::views::trip::{
    packing_page, trip_page, NewTripForm, PackingRow, PackingRowFragment, PackingStep,
    TripFormFragment, TripItemRow, TripItemRowFragment, TripRow, TripsPage,
};
use crate::views::NewEntityForm;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Router};
use log::info;
use packager_core::{
    Mutation, NewTripInput, SqliteTripRepository, TripAttribute, TripService, TripState,
};
use rusqlite::Connection;
use uuid::Uuid;

const TRIPS_PATH: &str = "/trips/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(TRIPS_PATH, get(manager).post(create))
        .route("/trips/:id/", get(detail).post(toggle_and_return))
        .route("/trips/:id/edit/:attribute/submit/", post(edit_attribute))
        .route("/trips/:id/state/:state", post(set_state))
        .route("/trips/:id/delete", post(remove))
        .route("/trips/:id/type/:type_id/add", post(attach_type))
        .route("/trips/:id/type/:type_id/remove", post(detach_type))
        .route("/trips/:id/items/:item_id/:action", post(toggle_item))
        .route(
            "/trips/:id/packagelist/",
            get(packing).post(packing_toggle_and_return),
        )
        .route(
            "/trips/:id/packagelist/item/:item_id/:action",
            post(toggle_packing_item),
        )
}

pub(crate) fn service(conn: &Connection) -> TripService<SqliteTripRepository<'_>> {
    TripService::new(SqliteTripRepository::new(conn))
}

fn trip_href(id: Uuid) -> String {
    format!("{TRIPS_PATH}{id}/")
}

fn packing_href(id: Uuid) -> String {
    format!("{TRIPS_PATH}{id}/packagelist/")
}

async fn manager(
    State(state): State<AppState>,
    Query(query): Query<AttributeQuery>,
) -> WebResult<Response> {
    let trips = state
        .store
        .with_conn(|conn| Ok(service(conn).list_trips()?))?;

    let form = NewTripForm::from(&NewEntityForm::from_query(query.error, query.msg.as_deref()));
    ok(&TripsPage {
        rows: trips.iter().map(TripRow::new).collect(),
        form,
    })
}

async fn create(
    State(state): State<AppState>,
    transport: Transport,
    Form(form): Form<TripForm>,
) -> WebResult<Response> {
    let input = NewTripInput {
        name: form.name.clone(),
        start_date: form.start_date.clone(),
        end_date: form.end_date.clone(),
    };
    let outcome = state
        .store
        .with_conn(|conn| Ok(service(conn).create_trip(&input)?))?;

    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(trip)) => {
            Ok(created_redirect(&trip_href(trip.id)))
        }
        (Transport::Partial, Mutation::Rejected(message)) => ok(&TripFormFragment {
            form: NewTripForm {
                name: form.name,
                start_date: form.start_date,
                end_date: form.end_date,
                error: Some(message),
            },
        }),
        (Transport::Full, Mutation::Applied(trip)) => Ok(see_other(&trip_href(trip.id))),
        (Transport::Full, Mutation::Rejected(message)) => {
            Ok(see_other(&error_location(TRIPS_PATH, None, &message)))
        }
    }
}

/// Applies the toggle carried in `query`, if any.
///
/// Returns whether a toggle was applied.
fn apply_toggle(state: &AppState, trip_id: Uuid, query: &TripQuery) -> WebResult<bool> {
    let Some((item_id, flag, value)) = query.toggle() else {
        return Ok(false);
    };
    state.store.with_conn(|conn| {
        service(conn).set_item_flag(trip_id, item_id, flag, value)?;
        Ok(())
    })?;
    info!(
        "event=trip_item_toggle module=web status=ok trip_id={trip_id} item_id={item_id} flag={} value={value}",
        flag.column()
    );
    Ok(true)
}

async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TripQuery>,
) -> WebResult<Response> {
    if apply_toggle(&state, id, &query)? {
        return Ok(see_other(&query.stripped_location(id)));
    }

    let overview = state
        .store
        .with_conn(|conn| Ok(service(conn).overview(id)?))?;
    let attribute_state = ViewState::from_query(query.error, query.msg.as_deref());
    ok(&trip_page(
        &overview,
        query.edit.as_deref(),
        &attribute_state,
        query.category,
    ))
}

async fn toggle_and_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TripQuery>,
) -> WebResult<Response> {
    redirect_after_toggle(&state, id, &query, &query.stripped_location(id))
}

/// Applies the toggle in `query` and answers 303 to `location`.
///
/// Without a toggle the trip still has to exist.
fn redirect_after_toggle(
    state: &AppState,
    id: Uuid,
    query: &TripQuery,
    location: &str,
) -> WebResult<Response> {
    if !apply_toggle(state, id, query)? {
        state.store.with_conn(|conn| {
            service(conn).get_trip(id)?.ok_or(WebError::NotFound)?;
            Ok(())
        })?;
    }
    Ok(see_other(location))
}

async fn edit_attribute(
    State(state): State<AppState>,
    Path((id, attribute)): Path<(Uuid, String)>,
    Form(form): Form<ValueForm>,
) -> WebResult<Response> {
    let attribute = TripAttribute::parse(&attribute)
        .ok_or_else(|| WebError::BadRequest(format!("unknown attribute `{attribute}`")))?;
    let outcome = state
        .store
        .with_conn(|conn| Ok(service(conn).edit_attribute(id, attribute, &form.value)?))?;

    match outcome {
        Mutation::Applied(_) => Ok(see_other(&trip_href(id))),
        Mutation::Rejected(message) => Ok(see_other(&error_location(
            &trip_href(id),
            Some(attribute.as_str()),
            &message,
        ))),
    }
}

async fn set_state(
    State(state): State<AppState>,
    Path((id, trip_state)): Path<(Uuid, String)>,
) -> WebResult<Response> {
    let trip_state = TripState::parse(&trip_state)
        .ok_or_else(|| WebError::BadRequest(format!("unknown state `{trip_state}`")))?;
    state
        .store
        .with_conn(|conn| Ok(service(conn).set_state(id, trip_state)?))?;
    Ok(see_other(&trip_href(id)))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> WebResult<Response> {
    state
        .store
        .with_conn(|conn| Ok(service(conn).delete_trip(id)?))?;
    Ok(see_other(TRIPS_PATH))
}

async fn attach_type(
    State(state): State<AppState>,
    Path((id, type_id)): Path<(Uuid, Uuid)>,
) -> WebResult<Response> {
    state
        .store
        .with_conn(|conn| Ok(service(conn).attach_type(id, type_id)?))?;
    Ok(see_other(&trip_href(id)))
}

async fn detach_type(
    State(state): State<AppState>,
    Path((id, type_id)): Path<(Uuid, Uuid)>,
) -> WebResult<Response> {
    state
        .store
        .with_conn(|conn| Ok(service(conn).detach_type(id, type_id)?))?;
    Ok(see_other(&trip_href(id)))
}

async fn toggle_item(
    State(state): State<AppState>,
    Path((id, item_id, action)): Path<(Uuid, Uuid, String)>,
) -> WebResult<Response> {
    let (flag, value) = parse_toggle_action(&action)
        .ok_or_else(|| WebError::BadRequest(format!("unknown action `{action}`")))?;
    let item = state
        .store
        .with_conn(|conn| Ok(service(conn).set_item_flag(id, item_id, flag, value)?))?;

    let row = TripItemRow::new(&item, Some(item.category_id));
    Ok(with_trigger(
        ok(&TripItemRowFragment { row })?,
        Event::TripItemEdited,
    ))
}

async fn packing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TripQuery>,
) -> WebResult<Response> {
    if apply_toggle(&state, id, &query)? {
        return Ok(see_other(&packing_href(id)));
    }

    let overview = state
        .store
        .with_conn(|conn| Ok(service(conn).overview(id)?))?;
    ok(&packing_page(&overview))
}

async fn packing_toggle_and_return(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<TripQuery>,
) -> WebResult<Response> {
    redirect_after_toggle(&state, id, &query, &packing_href(id))
}

async fn toggle_packing_item(
    State(state): State<AppState>,
    Path((id, item_id, action)): Path<(Uuid, Uuid, String)>,
) -> WebResult<Response> {
    let (flag, value, step) = parse_toggle_action(&action)
        .and_then(|(flag, value)| PackingStep::from_flag(flag).map(|step| (flag, value, step)))
        .ok_or_else(|| WebError::BadRequest(format!("unknown packing action `{action}`")))?;
    let item = state
        .store
        .with_conn(|conn| Ok(service(conn).set_item_flag(id, item_id, flag, value)?))?;
    info!(
        "event=packing_item_toggle module=web status=ok trip_id={id} item_id={item_id} flag={} value={value}",
        flag.column()
    );

    ok(&PackingRowFragment {
        row: PackingRow::new(&item, step),
    })
}
