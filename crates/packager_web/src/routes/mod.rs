//! HTTP handlers, one module per entity.

pub mod inventory;
pub mod package_list;
pub mod trip;
pub mod trip_type;

use crate::error::{WebError, WebResult};
use crate::htmx::see_other;
use axum::response::Response;
use uuid::Uuid;

pub(crate) async fn root() -> Response {
    see_other("/list/")
}

/// Parses an id submitted as a form field.
pub(crate) fn parse_form_id(value: &str, field: &str) -> WebResult<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|_| WebError::BadRequest(format!("invalid `{field}`")))
}
