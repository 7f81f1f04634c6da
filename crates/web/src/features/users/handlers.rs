use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::ListParams,
    dto::user::{CreateUserRequest, ParticipantUser, UserResponse},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/users",
    params(ListParams),
    responses(
        (status = 200, description = "Users with their current weights", body = Vec<ParticipantUser>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn list_users(
    State(db): State<Database>,
    Query(params): Query<ListParams>,
) -> Result<Response, WebError> {
    let users = services::list_participants(db.pool(), params.skip, params.limit).await?;

    Ok(Json(users).into_response())
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or e-mail already taken")
    ),
    tag = "users"
)]
pub async fn create_user(
    State(db): State<Database>,
    Json(req): Json<CreateUserRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let user = services::create_user(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}
