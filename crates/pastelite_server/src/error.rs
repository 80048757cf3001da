//! HTTP error mapping for [`AppError`].

use crate::AppError;
use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Seconds clients should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "1";

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<JsonRejection> for HttpError {
    fn from(value: JsonRejection) -> Self {
        Self(AppError::InvalidArgument(value.body_text()))
    }
}

impl HttpError {
    /// Status code and client-facing message for the wrapped error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match &self.0 {
            AppError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFoundOrExpired => (
                StatusCode::NOT_FOUND,
                "Paste not found or expired".to_string(),
            ),
            AppError::StoreUnavailable(_) | AppError::StoreMessage(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage temporarily unavailable".to_string(),
            ),
            AppError::ExhaustedRetries { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not allocate a paste id, please retry".to_string(),
            ),
            AppError::Serialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        let mut response = (status, Json(json!({ "error": message }))).into_response();
        if self.0.is_retryable() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_matches_error_taxonomy() {
        let cases = [
            (AppError::InvalidArgument("bad".to_string()), StatusCode::BAD_REQUEST),
            (AppError::NotFoundOrExpired, StatusCode::NOT_FOUND),
            (
                AppError::StoreMessage("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::ExhaustedRetries { attempts: 8 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, expected) in cases {
            let (status, _) = HttpError(err).status_and_message();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn retryable_errors_carry_retry_after() {
        let response = HttpError(AppError::StoreMessage("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from_static("1"))
        );

        let response = HttpError(AppError::NotFoundOrExpired).into_response();
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn held_database_maps_to_503_with_retry_after() {
        let temp = tempfile::TempDir::new().expect("temp dir");
        let db_path = temp.path().join("db");
        let db_path = db_path.to_str().expect("db path");
        let _held = crate::Database::new(db_path).expect("first open");

        let err = match crate::Database::new(db_path) {
            Ok(_) => panic!("second open must fail"),
            Err(err) => err,
        };
        assert!(matches!(err, AppError::StoreUnavailable(_)));

        let response = HttpError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER),
            Some(&HeaderValue::from_static("1"))
        );
    }
}
