//! User CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, Json, JsonRejection, ListUsersParams, ListUsersResponse, MessageResponse,
    UserPayload, UserResponse,
};
use crate::domain::{PageRequest, UserId};
use crate::infrastructure::user::{UserRequest, USER_NOT_FOUND};

/// An ID that is not a non-negative integer cannot match any user
fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse::<UserId>()
        .map_err(|_| ApiError::not_found(USER_NOT_FOUND))
}

/// A body that is absent or not a JSON object is treated as carrying no fields
fn into_request(body: Result<Json<UserPayload>, JsonRejection>) -> Option<UserRequest> {
    match body {
        Ok(Json(payload)) => Some(payload.into()),
        Err(rejection) => {
            debug!(reason = %rejection.message(), "Unreadable user payload");
            None
        }
    }
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let params = ListUsersParams::from_pairs(pairs);
    let request = PageRequest::new(params.page(), params.per_page());
    debug!(page = request.page(), per_page = request.per_page(), "Listing users");

    let page = state.user_service.list(request).await?;

    Ok(Json(ListUsersResponse::from(page)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    debug!(user_id = %id, "Getting user");

    let user = state.user_service.get(id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!("Creating user");

    let user = state.user_service.create(into_request(body)).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// PUT /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<UserPayload>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    debug!(user_id = %id, "Updating user");

    let user = state.user_service.update(id, into_request(body)).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_user_id(&raw_id)?;
    debug!(user_id = %id, "Deleting user");

    state.user_service.delete(id).await?;

    Ok(Json(MessageResponse::new("User deleted")))
}
