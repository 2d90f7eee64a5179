//! Outbound response contract.
//!
//! # Responsibilities
//! - Represent a handler result (status, headers, body)
//! - Provide constructors for the common statuses
//! - Convert into an axum response at the transport edge
//!
//! # Design Decisions
//! - Status stored as a plain integer; invalid codes map to 500 on the wire
//! - Handler-level errors pass through untouched

use axum::body::{Body, Bytes};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// A response produced by a handler.
#[derive(Debug, Clone)]
pub struct ServerResponse {
    pub status_code: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ServerResponse {
    pub fn new(status_code: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// 200 with the given body.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self::new(200, body)
    }

    pub fn not_found(body: impl Into<Bytes>) -> Self {
        Self::new(404, body)
    }

    pub fn internal_error(body: impl Into<Bytes>) -> Self {
        Self::new(500, body)
    }

    /// 200 with a JSON body. Serialization failures become a 500.
    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::ok(bytes).with_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                Self::internal_error("response serialization failed")
            }
        }
    }

    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Body as UTF-8 text, lossy.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl IntoResponse for ServerResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;
        *response.headers_mut() = self.headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_sets_content_type() {
        let res = ServerResponse::json(&serde_json::json!({ "path": "get" }));
        assert_eq!(res.status_code, 200);
        assert_eq!(res.headers.get(header::CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(res.text(), r#"{"path":"get"}"#);
    }

    #[test]
    fn test_into_response_keeps_status_and_headers() {
        let res = ServerResponse::not_found("post")
            .with_header(HeaderName::from_static("x-scope"), HeaderValue::from_static("post"))
            .into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(res.headers().get("x-scope").unwrap(), "post");
    }

    #[test]
    fn test_invalid_status_maps_to_500() {
        let res = ServerResponse::new(42, "").into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
