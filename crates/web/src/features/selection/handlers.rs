use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query as MultiQuery;
use storage::{
    Database,
    dto::selection::{
        HistoryParams, RateParams, SelectionParams, SelectionResponse, SelectionResult,
    },
    dto::stats::{SelectionStats, StatsParams},
    models::Rating,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::CurrentUser;

use super::services;

#[utoipa::path(
    post,
    path = "/selection",
    params(SelectionParams),
    responses(
        (status = 200, description = "Selection performed", body = SelectionResult),
        (status = 400, description = "No eligible participants"),
        (status = 403, description = "Unknown participant id"),
        (status = 409, description = "Selection raced with a concurrent request")
    ),
    tag = "selection"
)]
pub async fn perform_selection(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    MultiQuery(params): MultiQuery<SelectionParams>,
) -> Result<Response, WebError> {
    let result =
        services::perform_selection(&db, &params.participant_ids, current.0.user_id).await?;

    Ok(Json(result).into_response())
}

#[utoipa::path(
    get,
    path = "/selection/history",
    params(HistoryParams),
    responses(
        (status = 200, description = "Selection history, newest first", body = Vec<SelectionResponse>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "selection"
)]
pub async fn selection_history(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<HistoryParams>,
) -> Result<Response, WebError> {
    let initiated_by = params.my_selections_only.then_some(current.0.user_id);

    let history = services::selection_history(
        db.pool(),
        initiated_by,
        params.sort_by_rating,
        params.skip,
        params.limit,
    )
    .await?;

    Ok(Json(history).into_response())
}

#[utoipa::path(
    get,
    path = "/selection/stats",
    params(StatsParams),
    responses(
        (status = 200, description = "Selection distribution report", body = SelectionStats),
        (status = 401, description = "Not authenticated")
    ),
    tag = "selection"
)]
pub async fn selection_stats(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Query(params): Query<StatsParams>,
) -> Result<Response, WebError> {
    let initiated_by = params.my_stats_only.then_some(current.0.user_id);

    let stats = services::selection_stats(db.pool(), initiated_by).await?;

    Ok(Json(stats).into_response())
}

#[utoipa::path(
    post,
    path = "/selections/{id}/rate",
    params(
        ("id" = Uuid, Path, description = "Selection id"),
        RateParams
    ),
    responses(
        (status = 200, description = "Rating stored", body = Rating),
        (status = 400, description = "Rating outside [0, 10]"),
        (status = 404, description = "Selection not found")
    ),
    tag = "selection"
)]
pub async fn rate_selection(
    State(db): State<Database>,
    Extension(current): Extension<CurrentUser>,
    Path(selection_id): Path<Uuid>,
    Query(params): Query<RateParams>,
) -> Result<Response, WebError> {
    // Reject out-of-range values at the boundary, before the engine runs.
    if !(0.0..=10.0).contains(&params.rating) {
        return Err(WebError::BadRequest(
            "Rating must be between 0 and 10".to_string(),
        ));
    }

    let rating =
        services::rate_selection(db.pool(), selection_id, current.0.user_id, params.rating)
            .await?;

    Ok(Json(rating).into_response())
}
