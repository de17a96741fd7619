//! Package list manager routes.

use crate::error::{WebError, WebResult};
use crate::forms::{EditQuery, NameForm};
use crate::htmx::{created, error_location, ok, see_other, Transport};
use crate::view_state::ViewState;
use crate::views::package_list::{
    rows, ListRow, NewPackageListForm, PackageListManager, PackageListRow, PackageListsPage,
};
use crate::views::NewEntityForm;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Form, Router};
use packager_core::{Mutation, PackageListService, SqlitePackageListRepository};
use rusqlite::Connection;
use uuid::Uuid;

const LISTS_PATH: &str = "/list/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(LISTS_PATH, get(manager).post(create))
        .route("/list/name/validate", post(validate_name))
        .route("/list/:id", delete(remove))
        .route("/list/:id/edit", post(start_edit))
        .route("/list/:id/edit/submit/", post(submit_edit))
        .route("/list/:id/edit/cancel", post(cancel_edit))
}

fn service(conn: &Connection) -> PackageListService<SqlitePackageListRepository<'_>> {
    PackageListService::new(SqlitePackageListRepository::new(conn))
}

async fn manager(
    State(state): State<AppState>,
    Query(query): Query<EditQuery>,
) -> WebResult<Response> {
    let lists = state
        .store
        .with_conn(|conn| Ok(service(conn).list_lists()?))?;

    let row_state = ViewState::from_query(query.error, query.msg.as_deref());
    let form = match query.edit {
        Some(_) => NewEntityForm::blank(),
        None => NewEntityForm::from_query(query.error, query.msg.as_deref()),
    };
    ok(&PackageListsPage {
        rows: rows(&lists, query.edit, &row_state),
        form,
    })
}

async fn create(
    State(state): State<AppState>,
    transport: Transport,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let (outcome, lists) = state.store.with_conn(|conn| {
        let service = service(conn);
        let outcome = service.create_list(&form.name, &form.description)?;
        Ok((outcome, service.list_lists()?))
    })?;

    let rows = rows(&lists, None, &ViewState::Normal);
    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(_)) => created(&PackageListManager {
            rows,
            form: NewEntityForm::blank(),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => ok(&PackageListManager {
            rows,
            form: NewEntityForm::rejected(&form.name, &form.description, message),
        }),
        (Transport::Full, Mutation::Applied(_)) => Ok(see_other(LISTS_PATH)),
        (Transport::Full, Mutation::Rejected(message)) => {
            Ok(see_other(&error_location(LISTS_PATH, None, &message)))
        }
    }
}

async fn validate_name(
    State(state): State<AppState>,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let message = state
        .store
        .with_conn(|conn| Ok(service(conn).check_new_name(&form.name)?))?;
    ok(&NewPackageListForm {
        form: NewEntityForm::checked(&form.name, &form.description, message),
    })
}

async fn start_edit(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let list = state
        .store
        .with_conn(|conn| Ok(service(conn).get_list(id)?))?
        .ok_or(WebError::NotFound)?;

    match transport {
        Transport::Partial => ok(&PackageListRow {
            row: ListRow::new(&list, ViewState::Editing),
        }),
        Transport::Full => Ok(see_other(&format!("{LISTS_PATH}?edit={id}"))),
    }
}

async fn submit_edit(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let outcome = state.store.with_conn(|conn| {
        Ok(service(conn).rename_list(id, &form.name, &form.description)?)
    })?;

    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(list)) => ok(&PackageListRow {
            row: ListRow::new(&list, ViewState::Normal),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => ok(&PackageListRow {
            row: ListRow::rejected(id, &form.name, &form.description, message),
        }),
        (Transport::Full, Mutation::Applied(_)) => Ok(see_other(LISTS_PATH)),
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&error_location(
            LISTS_PATH,
            Some(&id.to_string()),
            &message,
        ))),
    }
}

async fn cancel_edit(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let list = state
        .store
        .with_conn(|conn| Ok(service(conn).get_list(id)?))?
        .ok_or(WebError::NotFound)?;

    match transport {
        Transport::Partial => ok(&PackageListRow {
            row: ListRow::new(&list, ViewState::Normal),
        }),
        Transport::Full => Ok(see_other(LISTS_PATH)),
    }
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> WebResult<Response> {
    state
        .store
        .with_conn(|conn| Ok(service(conn).delete_list(id)?))?;
    Ok(StatusCode::OK.into_response())
}
