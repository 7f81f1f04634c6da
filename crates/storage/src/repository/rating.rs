use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::dto::selection::RatingResponse;
use crate::error::Result;
use crate::models::Rating;

/// Ratings keyed by (selection, rater). Writes are independent upserts;
/// last write wins per key.
pub struct RatingRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RatingRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a rating, or overwrite the rater's previous rating for the same
    /// selection.
    pub async fn upsert(
        &self,
        selection_id: Uuid,
        user_id: Uuid,
        rating: f64,
        timestamp: NaiveDateTime,
    ) -> Result<Rating> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (rating_id, selection_id, user_id, rating, timestamp)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (selection_id, user_id)
            DO UPDATE SET rating = excluded.rating, timestamp = excluded.timestamp
            RETURNING rating_id, selection_id, user_id, rating, timestamp
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(selection_id)
        .bind(user_id)
        .bind(rating)
        .bind(timestamp)
        .fetch_one(self.pool)
        .await?;

        Ok(rating)
    }

    pub async fn list_for_selection(&self, selection_id: Uuid) -> Result<Vec<RatingResponse>> {
        let ratings = sqlx::query_as::<_, RatingResponse>(
            r#"
            SELECT r.rating_id, r.selection_id, r.user_id, r.rating, r.timestamp,
                   u.username
            FROM ratings r
            INNER JOIN users u ON r.user_id = u.user_id
            WHERE r.selection_id = ?
            ORDER BY r.timestamp, r.rating_id
            "#,
        )
        .bind(selection_id)
        .fetch_all(self.pool)
        .await?;

        Ok(ratings)
    }

    /// Arithmetic mean of all ratings for a selection, `None` when unrated.
    pub async fn average_for_selection(&self, selection_id: Uuid) -> Result<Option<f64>> {
        let average: Option<f64> =
            sqlx::query_scalar("SELECT AVG(rating) FROM ratings WHERE selection_id = ?")
                .bind(selection_id)
                .fetch_one(self.pool)
                .await?;

        Ok(average)
    }
}
