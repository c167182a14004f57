//! HTTP request handlers for the ocean API.

pub mod datasets;
pub mod health;
pub mod map_points;
pub mod stats;
pub mod zones;

use axum::{
    http::{header, StatusCode},
    response::Response,
};
use serde::Serialize;

/// Error body shared by every endpoint. Optional fields are omitted from
/// the JSON when unset.
#[derive(Debug, Default, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erddap_query: Option<String>,
}

pub(crate) fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let json = serde_json::to_string(body).unwrap_or_default();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(json.into())
        .unwrap()
}

pub(crate) fn error_response(status: StatusCode, body: &ApiErrorBody) -> Response {
    json_response(status, body)
}
