//! Inventory routes: categories, item tables and item detail.

use crate::error::{WebError, WebResult};
use crate::forms::{AttributeQuery, InventoryQuery, ItemForm, NameForm, FORM_CATEGORY, FORM_ITEM};
use crate::htmx::{created, error_location, ok, see_other, Transport};
use crate::routes::parse_form_id;
use crate::view_state::ViewState;
use crate::views::inventory::{
    item_attributes, InventoryCategories, InventoryItemPage, InventoryItemRow, InventoryItems,
    InventoryPage, InventorySnapshot, ItemRow, NewItemForm,
};
use crate::views::{format_weight, NewEntityForm};
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use packager_core::{InventoryService, ItemInput, Mutation, SqliteInventoryRepository};
use rusqlite::Connection;
use uuid::Uuid;

const INVENTORY_PATH: &str = "/inventory/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(INVENTORY_PATH, get(overview))
        .route("/inventory/category/", post(create_category))
        .route("/inventory/category/:id/", get(category))
        .route("/inventory/category/:id/delete", post(delete_category))
        .route("/inventory/item/", post(create_item))
        .route("/inventory/item/name/validate", post(validate_item_name))
        .route("/inventory/item/:id/", get(item_detail))
        .route("/inventory/item/:id/edit", post(edit_item))
        .route("/inventory/item/:id/delete", post(delete_item))
}

fn service(conn: &Connection) -> InventoryService<SqliteInventoryRepository<'_>> {
    InventoryService::new(SqliteInventoryRepository::new(conn))
}

fn snapshot(conn: &Connection) -> WebResult<InventorySnapshot> {
    let service = service(conn);
    Ok(InventorySnapshot {
        categories: service.list_categories()?,
        total_weight: service.total_weight()?,
    })
}

fn category_href(id: Uuid) -> String {
    format!("/inventory/category/{id}/")
}

fn with_form(location: String, form: &str) -> String {
    format!("{location}&form={form}")
}

fn categories_fragment(snapshot: &InventorySnapshot, form: NewEntityForm) -> InventoryCategories {
    InventoryCategories {
        categories: snapshot.entries(None),
        total_weight: format_weight(snapshot.total_weight),
        category_form: form,
    }
}

fn page(snapshot: &InventorySnapshot, active: Option<Uuid>, query: &InventoryQuery) -> InventoryPage {
    let row_state = ViewState::from_query(query.error, query.msg.as_deref());
    let categories = snapshot.plain_categories();
    let item_form =
        NewItemForm::new(&categories, active).with_error(query.form_error(FORM_ITEM));
    let category_form = NewEntityForm {
        error: query.form_error(FORM_CATEGORY),
        ..NewEntityForm::blank()
    };
    InventoryPage {
        categories: snapshot.entries(active),
        total_weight: format_weight(snapshot.total_weight),
        category_form,
        panel: snapshot.panel(active, query.edit, &row_state, item_form),
    }
}

async fn overview(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> WebResult<Response> {
    let snapshot = state.store.with_conn(snapshot)?;
    ok(&page(&snapshot, None, &query))
}

async fn category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<InventoryQuery>,
) -> WebResult<Response> {
    let snapshot = state.store.with_conn(|conn| {
        service(conn).get_category(id)?.ok_or(WebError::NotFound)?;
        snapshot(conn)
    })?;
    ok(&page(&snapshot, Some(id), &query))
}

async fn create_category(
    State(state): State<AppState>,
    transport: Transport,
    Form(form): Form<NameForm>,
) -> WebResult<Response> {
    let (outcome, snapshot) = state.store.with_conn(|conn| {
        let outcome = service(conn).create_category(&form.name, &form.description)?;
        Ok((outcome, snapshot(conn)?))
    })?;

    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(_)) => {
            created(&categories_fragment(&snapshot, NewEntityForm::blank()))
        }
        (Transport::Partial, Mutation::Rejected(message)) => ok(&categories_fragment(
            &snapshot,
            NewEntityForm::rejected(&form.name, &form.description, message),
        )),
        (Transport::Full, Mutation::Applied(category)) => {
            Ok(see_other(&category_href(category.id)))
        }
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&with_form(
            error_location(INVENTORY_PATH, None, &message),
            FORM_CATEGORY,
        ))),
    }
}

async fn delete_category(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let (outcome, snapshot) = state.store.with_conn(|conn| {
        let outcome = service(conn).delete_category(id)?;
        Ok((outcome, snapshot(conn)?))
    })?;

    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(())) => {
            ok(&categories_fragment(&snapshot, NewEntityForm::blank()))
        }
        (Transport::Partial, Mutation::Rejected(message)) => ok(&categories_fragment(
            &snapshot,
            NewEntityForm::rejected("", "", message),
        )),
        (Transport::Full, Mutation::Applied(())) => Ok(see_other(INVENTORY_PATH)),
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&with_form(
            error_location(&category_href(id), None, &message),
            FORM_CATEGORY,
        ))),
    }
}

fn item_input(form: &ItemForm) -> WebResult<ItemInput> {
    Ok(ItemInput {
        name: form.name.clone(),
        description: form.description.clone(),
        weight: form.weight.clone(),
        category_id: parse_form_id(&form.category_id, "category_id")?,
    })
}

async fn create_item(
    State(state): State<AppState>,
    transport: Transport,
    Form(form): Form<ItemForm>,
) -> WebResult<Response> {
    let input = item_input(&form)?;
    let (outcome, snapshot) = state.store.with_conn(|conn| {
        let outcome = service(conn).create_item(&input)?;
        Ok((outcome, snapshot(conn)?))
    })?;

    let active = Some(input.category_id);
    let categories = snapshot.plain_categories();
    let blank_form = NewItemForm::new(&categories, active);
    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(_)) => created(&InventoryItems {
            panel: snapshot.panel(active, None, &ViewState::Normal, blank_form),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => {
            let form = blank_form
                .with_input(&form.name, &form.description, &form.weight)
                .with_error(Some(message));
            ok(&InventoryItems {
                panel: snapshot.panel(active, None, &ViewState::Normal, form),
            })
        }
        (Transport::Full, Mutation::Applied(_)) => {
            Ok(see_other(&category_href(input.category_id)))
        }
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&with_form(
            error_location(&category_href(input.category_id), None, &message),
            FORM_ITEM,
        ))),
    }
}

async fn validate_item_name(
    State(state): State<AppState>,
    Form(form): Form<ItemForm>,
) -> WebResult<Response> {
    let active = Uuid::parse_str(form.category_id.trim()).ok();
    let (message, snapshot) = state.store.with_conn(|conn| {
        let message = service(conn).check_new_item_name(&form.name)?;
        Ok((message, snapshot(conn)?))
    })?;

    let item_form = NewItemForm::new(&snapshot.plain_categories(), active)
        .with_input(&form.name, &form.description, &form.weight)
        .with_error(message);
    ok(&InventoryItems {
        panel: snapshot.panel(active, None, &ViewState::Normal, item_form),
    })
}

async fn item_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AttributeQuery>,
) -> WebResult<Response> {
    let (item, categories) = state.store.with_conn(|conn| {
        let service = service(conn);
        let item = service.get_item(id)?.ok_or(WebError::NotFound)?;
        Ok((item, snapshot(conn)?.plain_categories()))
    })?;

    let attribute_state = ViewState::from_query(query.error, query.msg.as_deref());
    let category_name = categories
        .iter()
        .find(|category| category.id == item.category_id)
        .map(|category| category.name.clone())
        .unwrap_or_default();
    ok(&InventoryItemPage {
        item_id: item.id,
        name: item.name.clone(),
        category_href: category_href(item.category_id),
        category_name,
        attributes: item_attributes(&item, &categories, query.edit.as_deref(), &attribute_state),
    })
}

async fn edit_item(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
    Form(form): Form<ItemForm>,
) -> WebResult<Response> {
    let input = item_input(&form)?;
    let outcome = state
        .store
        .with_conn(|conn| Ok(service(conn).edit_item(id, &input)?))?;

    let detail = form.attribute.as_deref();
    match (transport, outcome) {
        (Transport::Partial, Mutation::Applied(item)) => ok(&InventoryItemRow {
            row: ItemRow::new(&item, ViewState::Normal),
        }),
        (Transport::Partial, Mutation::Rejected(message)) => ok(&InventoryItemRow {
            row: ItemRow::rejected(
                id,
                &form.name,
                &form.description,
                &form.weight,
                input.category_id,
                message,
            ),
        }),
        (Transport::Full, Mutation::Applied(item)) => Ok(see_other(&match detail {
            Some(_) => format!("/inventory/item/{id}/"),
            None => category_href(item.category_id),
        })),
        (Transport::Full, Mutation::Rejected(message)) => Ok(see_other(&match detail {
            Some(attribute) => {
                error_location(&format!("/inventory/item/{id}/"), Some(attribute), &message)
            }
            None => error_location(
                &category_href(input.category_id),
                Some(&id.to_string()),
                &message,
            ),
        })),
    }
}

async fn delete_item(
    State(state): State<AppState>,
    transport: Transport,
    Path(id): Path<Uuid>,
) -> WebResult<Response> {
    let category_id = state.store.with_conn(|conn| {
        let service = service(conn);
        let item = service.get_item(id)?.ok_or(WebError::NotFound)?;
        service.delete_item(id)?;
        Ok(item.category_id)
    })?;

    match transport {
        Transport::Partial => Ok(StatusCode::OK.into_response()),
        Transport::Full => Ok(see_other(&category_href(category_id))),
    }
}
