//! User listing and owner-only profile management handlers
//!
//! Listing is public. Update and delete sit behind the bearer-token
//! middleware and are further gated to the account itself: a missing
//! target answers 404 before ownership is even considered, a foreign
//! target answers 403.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{UpdateUserRequest, UserDto};
use crate::application::UpdateAccountDto;
use crate::interfaces::http::common::ValidatedJson;
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::middleware::CurrentUser;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/users/",
    tag = "Users",
    responses(
        (status = 200, description = "All accounts in id order", body = Vec<UserDto>)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, ApiError> {
    let users = state.accounts.list_users().await?;

    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated account", body = UserDto),
        (status = 400, description = "Field-level validation errors"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not this user"),
        (status = 404, description = "No such user")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let changes = UpdateAccountDto {
        username: request.username,
        email: request.email,
        password: request.password,
    };

    let user = state.accounts.update_user(id, caller.id, changes).await?;

    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "Account and its token deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not this user"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<CurrentUser>,
) -> Result<StatusCode, ApiError> {
    state.accounts.delete_user(id, caller.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
