//! Failures that end a request without an inline render.

use askama::Error as TemplateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use packager_core::ServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug)]
pub enum WebError {
    NotFound,
    BadRequest(String),
    Service(ServiceError),
    Render(TemplateError),
    /// The connection mutex was poisoned by a panicking handler.
    StoreUnavailable,
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Service(_) | Self::Render(_) | Self::StoreUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl Display for WebError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::BadRequest(reason) => write!(f, "bad request: {reason}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "template render failed: {err}"),
            Self::StoreUnavailable => write!(f, "store unavailable"),
        }
    }
}

impl Error for WebError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Render(err) => Some(err),
            Self::NotFound | Self::BadRequest(_) | Self::StoreUnavailable => None,
        }
    }
}

impl From<ServiceError> for WebError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::NotFound(_) => Self::NotFound,
            other => Self::Service(other),
        }
    }
}

impl From<TemplateError> for WebError {
    fn from(value: TemplateError) -> Self {
        Self::Render(value)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=request_failed module=web status=error code={} error={self}",
                status.as_u16()
            );
            return (status, "internal error").into_response();
        }
        (status, self.to_string()).into_response()
    }
}
