use sqlx::SqlitePool;
use storage::{
    Database,
    dto::selection::{SelectionResponse, SelectionResult},
    dto::stats::SelectionStats,
    error::Result,
    models::Rating,
    services,
};
use uuid::Uuid;

/// Run one weighted selection for the given present users.
pub async fn perform_selection(
    db: &Database,
    participant_ids: &[Uuid],
    initiated_by: Uuid,
) -> Result<SelectionResult> {
    services::selection::run_selection(db, participant_ids, initiated_by).await
}

pub async fn selection_history(
    pool: &SqlitePool,
    initiated_by: Option<Uuid>,
    sort_by_rating: bool,
    skip: i64,
    limit: i64,
) -> Result<Vec<SelectionResponse>> {
    storage::repository::selection::SelectionRepository::new(pool)
        .list_history(initiated_by, sort_by_rating, skip, limit)
        .await
}

pub async fn selection_stats(
    pool: &SqlitePool,
    initiated_by: Option<Uuid>,
) -> Result<SelectionStats> {
    services::stats::distribution(pool, initiated_by).await
}

pub async fn rate_selection(
    pool: &SqlitePool,
    selection_id: Uuid,
    rater_id: Uuid,
    value: f64,
) -> Result<Rating> {
    services::rating::rate(pool, selection_id, rater_id, value).await
}
