use chrono::NaiveDateTime;
use sqlx::{FromRow, QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::dto::record::RecordResponse;
use crate::dto::selection::SelectionResponse;
use crate::dto::user::ParticipantUser;
use crate::error::Result;
use crate::models::{Record, Selection};
use crate::repository::rating::RatingRepository;

const SELECTION_COLUMNS: &str = "selection_id, timestamp, chosen_user_id, record_id, \
                                 initiated_by, participants, weights_before, weight_changes";

pub struct NewSelection {
    pub selection_id: Uuid,
    pub timestamp: NaiveDateTime,
    pub chosen_user_id: Uuid,
    pub record_id: Uuid,
    pub initiated_by: Option<Uuid>,
    pub participants: String,
    pub weights_before: String,
    pub weight_changes: String,
}

#[derive(FromRow)]
struct HistoryRow {
    selection_id: Uuid,
    timestamp: NaiveDateTime,
    chosen_user_id: Uuid,
    record_id: Uuid,
    initiated_by: Option<Uuid>,
    participants: String,
    weight_changes: String,
    average_rating: Option<f64>,
}

/// Append-only ledger of past selections.
///
/// Ordering contract: history is primarily ordered by timestamp (or average
/// rating when requested), descending, with ties broken by insertion order.
/// Clients layer their own stable secondary sorts on top and rely on the
/// primary order being deterministic.
pub struct SelectionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SelectionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Takes an explicit executor so selection can append inside the same
    /// transaction as the claim and the weight writes.
    pub async fn append(
        executor: impl sqlx::SqliteExecutor<'_>,
        new: NewSelection,
    ) -> Result<Selection> {
        let query = format!(
            r#"
            INSERT INTO selections (selection_id, timestamp, chosen_user_id, record_id,
                                    initiated_by, participants, weights_before, weight_changes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {SELECTION_COLUMNS}
            "#
        );

        let selection = sqlx::query_as::<_, Selection>(&query)
            .bind(new.selection_id)
            .bind(new.timestamp)
            .bind(new.chosen_user_id)
            .bind(new.record_id)
            .bind(new.initiated_by)
            .bind(&new.participants)
            .bind(&new.weights_before)
            .bind(&new.weight_changes)
            .fetch_one(executor)
            .await?;

        Ok(selection)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Selection>> {
        let query = format!("SELECT {SELECTION_COLUMNS} FROM selections WHERE selection_id = ?");

        let selection = sqlx::query_as::<_, Selection>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(selection)
    }

    /// History listing with related entities expanded. Unrated selections sort
    /// as rating zero when ordering by rating, matching the observed client.
    pub async fn list_history(
        &self,
        initiated_by: Option<Uuid>,
        sort_by_rating: bool,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<SelectionResponse>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT s.selection_id, s.timestamp, s.chosen_user_id, s.record_id,
                   s.initiated_by, s.participants, s.weight_changes,
                   AVG(r.rating) AS average_rating
            FROM selections s
            LEFT JOIN ratings r ON r.selection_id = s.selection_id
            "#,
        );

        if let Some(user_id) = initiated_by {
            query.push(" WHERE s.initiated_by = ");
            query.push_bind(user_id);
        }

        query.push(" GROUP BY s.seq ORDER BY ");
        if sort_by_rating {
            query.push("COALESCE(AVG(r.rating), 0) DESC, ");
        }
        query.push("s.timestamp DESC, s.seq DESC LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(skip);

        let rows: Vec<HistoryRow> = query.build_query_as().fetch_all(self.pool).await?;

        let ratings_repo = RatingRepository::new(self.pool);
        let mut history = Vec::with_capacity(rows.len());

        for row in rows {
            let chosen_user = sqlx::query_as::<_, ParticipantUser>(
                "SELECT user_id, username, weight FROM users WHERE user_id = ?",
            )
            .bind(row.chosen_user_id)
            .fetch_one(self.pool)
            .await?;

            let record = sqlx::query_as::<_, Record>(
                "SELECT record_id, title, artist, cover_url, reference_url, \
                 owner_id, used, used_at, created_at FROM records WHERE record_id = ?",
            )
            .bind(row.record_id)
            .fetch_one(self.pool)
            .await?;

            let ratings = ratings_repo.list_for_selection(row.selection_id).await?;

            history.push(SelectionResponse {
                selection_id: row.selection_id,
                timestamp: row.timestamp,
                chosen_user_id: row.chosen_user_id,
                record_id: row.record_id,
                initiated_by: row.initiated_by,
                participants: row.participants,
                weight_changes: row.weight_changes,
                chosen_user,
                record: RecordResponse::from(record),
                average_rating: row.average_rating,
                ratings,
            });
        }

        Ok(history)
    }

    /// (chosen_user_id, record_id) pairs for the stats fold, optionally
    /// restricted to selections initiated by one user.
    pub async fn chosen_pairs(&self, initiated_by: Option<Uuid>) -> Result<Vec<(Uuid, Uuid)>> {
        let mut query = QueryBuilder::new("SELECT chosen_user_id, record_id FROM selections");

        if let Some(user_id) = initiated_by {
            query.push(" WHERE initiated_by = ");
            query.push_bind(user_id);
        }

        let pairs = query
            .build_query_as::<(Uuid, Uuid)>()
            .fetch_all(self.pool)
            .await?;

        Ok(pairs)
    }
}
