//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use travelog_core::TravelogError;

/// Error returned by record handlers, rendered as `{"error": message}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 with a fixed message; the cause is logged, never returned
    pub fn internal(message: &str, cause: impl std::fmt::Display) -> Self {
        tracing::error!("{}: {}", message, cause);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }

    /// Map a core error: caller mistakes become 400, everything else a
    /// generic 500 carrying `message`
    pub fn from_core(err: TravelogError, message: &str) -> Self {
        match err {
            TravelogError::Validation(msg) => Self::bad_request(msg),
            TravelogError::InvalidRecordId(_) => Self::bad_request("invalid record id"),
            TravelogError::AttachmentTooLarge { limit } => {
                Self::bad_request(format!("attachment exceeds {} bytes", limit))
            }
            TravelogError::InvalidDataUri(msg) => Self::bad_request(msg),
            other => Self::internal(message, other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
