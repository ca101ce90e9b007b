//! Authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::router::AppState;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    MalformedHeader,
    InvalidToken,
}

/// The account a valid bearer key resolved to. Inserted as a request
/// extension for the protected handlers.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    if auth_header.starts_with("Bearer ") {
        Some(&auth_header[7..])
    } else {
        None
    }
}

/// Bearer-token authentication middleware
///
/// Resolves `Authorization: Bearer <key>` through the account service.
/// A key whose owner was deleted resolves to nothing, so cascade
/// deletion revokes access here with no extra bookkeeping.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from);

    let Some(auth_header) = auth_header else {
        return auth_error_response(AuthError::MissingToken);
    };

    let Some(key) = extract_token(&auth_header) else {
        return auth_error_response(AuthError::MalformedHeader);
    };

    match state.accounts.resolve_token(key).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser {
                id: user.id,
                username: user.username,
            });
            next.run(request).await
        }
        Ok(None) => auth_error_response(AuthError::InvalidToken),
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        ),
        AuthError::MalformedHeader => (StatusCode::UNAUTHORIZED, "Invalid authorization header."),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token."),
    };

    (status, Json(json!({"detail": message}))).into_response()
}
