use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Rating;
use crate::repository::rating::RatingRepository;
use crate::repository::selection::SelectionRepository;

/// Record a rating for a past selection, overwriting the rater's previous
/// rating for it if one exists. Values are clamped to two decimals and must
/// lie in [0, 10]; any authenticated user may rate any selection.
pub async fn rate(
    pool: &SqlitePool,
    selection_id: Uuid,
    rater_id: Uuid,
    value: f64,
) -> Result<Rating> {
    if !(0.0..=10.0).contains(&value) {
        return Err(StorageError::RatingOutOfRange(value));
    }
    let value = (value * 100.0).round() / 100.0;

    let ledger = SelectionRepository::new(pool);
    if ledger.get(selection_id).await?.is_none() {
        return Err(StorageError::SelectionNotFound(selection_id));
    }

    RatingRepository::new(pool)
        .upsert(selection_id, rater_id, value, Utc::now().naive_utc())
        .await
}
