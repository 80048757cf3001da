//! HTTP request handlers.

/// Health endpoint.
pub mod health;
/// HTML paste view.
pub mod page;
/// Paste JSON endpoints.
pub mod paste;

use crate::{AppError, Config};
use axum::{
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Utc};
use pastelite_core::constants::TEST_NOW_HEADER;
use serde_json::{json, Value};

/// JSON 404 for any `/api` path without a route.
pub async fn api_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

/// Resolve the instant a request is evaluated at.
///
/// In test mode a request may pin the clock with the `x-test-now-ms` header
/// (unix milliseconds); otherwise the wall clock is used.
///
/// # Errors
/// Returns [`AppError::InvalidArgument`] when the header is present in test
/// mode but is not a valid millisecond timestamp.
pub(crate) fn request_now(config: &Config, headers: &HeaderMap) -> Result<DateTime<Utc>, AppError> {
    if !config.test_mode {
        return Ok(Utc::now());
    }
    let Some(raw) = headers.get(TEST_NOW_HEADER) else {
        return Ok(Utc::now());
    };
    raw.to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| {
            AppError::InvalidArgument(format!("{} must be unix milliseconds", TEST_NOW_HEADER))
        })
}

/// Public link to the HTML view of a paste.
pub(crate) fn share_url(config: &Config, headers: &HeaderMap, id: &str) -> String {
    if let Some(base) = config.public_url.as_deref() {
        return format!("{}/p/{}", base, id);
    }
    match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("http://{}/p/{}", host, id),
        None => format!("/p/{}", id),
    }
}
