//! Signup and login API handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{LoginRequest, SignupRequest, TokenResponse};
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::modules::users::UserDto;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/signup/",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserDto),
        (status = 400, description = "Field-level validation errors")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state
        .accounts
        .register(&request.username, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserDto::from(user))))
}

#[utoipa::path(
    post,
    path = "/login/",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Existing or freshly minted token", body = TokenResponse),
        (status = 404, description = "Unknown username or wrong password; the two are identical")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .accounts
        .authenticate(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse { token: token.key }))
}
