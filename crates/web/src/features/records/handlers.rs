use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::common::ListParams,
    dto::record::{CreateRecordRequest, RecordListParams, RecordResponse, RecordWithOwner},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    get,
    path = "/records",
    params(RecordListParams),
    responses(
        (status = 200, description = "Records from all users with owner names", body = Vec<RecordWithOwner>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "records"
)]
pub async fn list_records(
    State(db): State<Database>,
    Query(params): Query<RecordListParams>,
) -> Result<Response, WebError> {
    let records =
        services::list_records(db.pool(), params.include_used, params.skip, params.limit).await?;

    Ok(Json(records).into_response())
}

#[utoipa::path(
    get,
    path = "/records/my",
    params(ListParams),
    responses(
        (status = 200, description = "The caller's own records", body = Vec<RecordResponse>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "records"
)]
pub async fn my_records(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<ListParams>,
) -> Result<Response, WebError> {
    let records =
        services::list_owned_records(db.pool(), current.0.user_id, params.skip, params.limit)
            .await?;

    let response: Vec<RecordResponse> = records.into_iter().map(RecordResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/records/history",
    params(ListParams),
    responses(
        (status = 200, description = "Records already played in past selections", body = Vec<RecordWithOwner>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "records"
)]
pub async fn record_history(
    State(db): State<Database>,
    Query(params): Query<ListParams>,
) -> Result<Response, WebError> {
    let records = services::list_used_records(db.pool(), params.skip, params.limit).await?;

    Ok(Json(records).into_response())
}

#[utoipa::path(
    post,
    path = "/records",
    request_body = CreateRecordRequest,
    responses(
        (status = 201, description = "Record created successfully", body = RecordResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "records"
)]
pub async fn create_record(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CreateRecordRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let record = services::create_record(db.pool(), &req, current.0.user_id).await?;

    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))).into_response())
}

#[utoipa::path(
    delete,
    path = "/records/{id}",
    params(
        ("id" = Uuid, Path, description = "Record id")
    ),
    responses(
        (status = 200, description = "Record deleted, echoed back", body = RecordResponse),
        (status = 400, description = "Record has been used in a selection"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Record not found")
    ),
    tag = "records"
)]
pub async fn delete_record(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(record_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let record = services::get_record(db.pool(), record_id).await?;

    if record.owner_id != current.0.user_id && !current.0.is_admin {
        return Err(WebError::Forbidden(
            "Not authorized to delete this record".to_string(),
        ));
    }

    let deleted = services::delete_record(db.pool(), record_id).await?;

    Ok(Json(RecordResponse::from(deleted)).into_response())
}
