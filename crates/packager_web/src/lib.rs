//! HTTP surface of the packing manager.
//!
//! # Responsibility
//! - Map routes onto core services through an injected `Store`.
//! - Pick fragment or page responses per request (`htmx::Transport`).
//! - Log one metadata line per request.

pub mod error;
mod forms;
pub mod htmx;
mod routes;
pub mod store;
pub mod view_state;
mod views;

pub use error::{WebError, WebResult};
pub use store::Store;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use std::time::Instant;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

/// Builds the application router over `store`.
pub fn router(store: Store) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .merge(routes::package_list::routes())
        .merge(routes::inventory::routes())
        .merge(routes::trip::routes())
        .merge(routes::trip_type::routes())
        .layer(middleware::from_fn(log_requests))
        .with_state(AppState { store })
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    if status.is_server_error() {
        warn!(
            "event=http_request module=web status=error method={method} path={path} code={} duration_ms={elapsed_ms}",
            status.as_u16()
        );
    } else {
        info!(
            "event=http_request module=web status=ok method={method} path={path} code={} duration_ms={elapsed_ms}",
            status.as_u16()
        );
    }
    response
}
