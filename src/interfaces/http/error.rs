//! HTTP error mapping
//!
//! `ApiError` is the one place where domain errors become status codes
//! and response bodies. Handlers return `Result<_, ApiError>` and use
//! `?`; nothing else decides an error status.
//!
//! Validation maps to 400 with a field-to-messages object, NotFound to
//! 404 with a `detail` body, Forbidden to 403 with an `error` body, and
//! Storage to a sanitized 500. Failed logins arrive here as NotFound,
//! so their response never reveals whether the username exists.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::domain::DomainError;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::Validation(fields) => {
                // {"email": ["..."], "username": ["..."]}
                let mut body: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
                for field_error in fields {
                    body.entry(field_error.field)
                        .or_default()
                        .push(field_error.message);
                }
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            DomainError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({"detail": "Not found."})),
            )
                .into_response(),
            DomainError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({"error": message}))).into_response()
            }
            DomainError::Storage(message) => {
                error!(error = %message, "Storage failure while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "Internal server error."})),
                )
                    .into_response()
            }
        }
    }
}
