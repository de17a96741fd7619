//! Partial-update transport selection.
//!
//! # Responsibility
//! - Decide per request whether the caller wants a fragment or a page.
//! - Build the response shapes shared by every handler.
//!
//! # Invariants
//! - Full-page writes always answer `303 See Other`.
//! - Partial inline errors answer `200 OK` so the fragment is swapped in.

use crate::error::WebResult;
use askama::Template;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{HeaderName, HeaderValue, LOCATION};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::convert::Infallible;

pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
pub const HX_REDIRECT: HeaderName = HeaderName::from_static("hx-redirect");

/// Client-side events announced through `HX-Trigger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    TripItemEdited,
}

impl Event {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TripItemEdited => "TripItemEdited",
        }
    }
}

/// How the response to this request is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// `HX-Request: true`; answer with the affected fragment.
    Partial,
    /// Classic navigation; answer with a page or a redirect.
    Full,
}

impl Transport {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let partial = headers
            .get(HX_REQUEST)
            .is_some_and(|value| value.as_bytes() == b"true");
        if partial {
            Self::Partial
        } else {
            Self::Full
        }
    }

    pub fn is_partial(self) -> bool {
        self == Self::Partial
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Transport {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Renders a template into an HTML body with `status`.
pub fn render(status: StatusCode, template: &impl Template) -> WebResult<Response> {
    Ok((status, Html(template.render()?)).into_response())
}

pub fn ok(template: &impl Template) -> WebResult<Response> {
    render(StatusCode::OK, template)
}

pub fn created(template: &impl Template) -> WebResult<Response> {
    render(StatusCode::CREATED, template)
}

/// `303 See Other` to `location`.
pub fn see_other(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::SEE_OTHER, [(LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// `201 Created` telling the client to navigate to `location` itself.
pub fn created_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::CREATED, [(HX_REDIRECT, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// Appends the failed-edit markers to `base`.
///
/// `edit` is the id or attribute that was being edited, if any.
pub fn error_location(base: &str, edit: Option<&str>, message: &str) -> String {
    let mut location = format!("{base}?");
    if let Some(edit) = edit {
        location.push_str("edit=");
        location.push_str(&urlencoding::encode(edit));
        location.push('&');
    }
    location.push_str("error=1&msg=");
    location.push_str(&urlencoding::encode(message));
    location
}

/// Attaches an `HX-Trigger` header to `response`.
pub fn with_trigger(mut response: Response, event: Event) -> Response {
    response
        .headers_mut()
        .insert(HX_TRIGGER, HeaderValue::from_static(event.as_str()));
    response
}

#[cfg(test)]
mod tests {
    use super::{error_location, Transport, HX_REQUEST};
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn only_true_header_selects_partial() {
        let mut headers = HeaderMap::new();
        assert_eq!(Transport::from_headers(&headers), Transport::Full);

        headers.insert(HX_REQUEST, HeaderValue::from_static("false"));
        assert_eq!(Transport::from_headers(&headers), Transport::Full);

        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert_eq!(Transport::from_headers(&headers), Transport::Partial);
    }

    #[test]
    fn error_location_encodes_message() {
        let location = error_location("/list/", Some("abc"), "Name \"A\" already exists");
        assert_eq!(
            location,
            "/list/?edit=abc&error=1&msg=Name%20%22A%22%20already%20exists"
        );
        assert_eq!(
            error_location("/list/", None, "x"),
            "/list/?error=1&msg=x"
        );
    }
}
