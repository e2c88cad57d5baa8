pub mod builders;
pub mod diagrams;
pub mod options;
pub mod reference;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::builder::store::NotFoundError;
use crate::builder::EditorError;

/// Error response body: {"error": "message"}
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API error type
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{} not found", resource),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!("{}: {}", self.status, self.message);
        }
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Typed errors first, no string matching
        if let Some(nf) = err.downcast_ref::<NotFoundError>() {
            return Self::not_found(&nf.to_string());
        }
        if let Some(editor) = err.downcast_ref::<EditorError>() {
            return editor.clone().into();
        }
        Self::internal(err.to_string())
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::Invalid(msg) => Self::bad_request(msg),
            missing => Self {
                status: StatusCode::NOT_FOUND,
                message: missing.to_string(),
            },
        }
    }
}

/// Response helper: return 201 Created with JSON body
pub fn created<T: Serialize>(item: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(item))
}

/// Healthcheck endpoint, returns 200 OK with status
pub async fn healthcheck() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rackdiagram-config",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_downcast() {
        let err: anyhow::Error = NotFoundError::new("builder", "abc").into();
        let api: ApiError = err.into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.message, "builder abc not found");
    }

    #[test]
    fn test_editor_error_mapping() {
        let invalid: ApiError = anyhow::Error::from(EditorError::Invalid("FM count must be at least 1".into())).into();
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message, "FM count must be at least 1");

        let missing: ApiError = EditorError::NoSuchContainer(4).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_errors_are_internal() {
        let api: ApiError = anyhow::anyhow!("boom").into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
