use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::dto::record::{CreateRecordRequest, RecordWithOwner};
use crate::error::{Result, StorageError};
use crate::models::Record;

const RECORD_COLUMNS: &str = "record_id, title, artist, cover_url, reference_url, \
                              owner_id, used, used_at, created_at";

/// Pool of nominated records. Claiming flips `used` from false to true exactly
/// once per record; the flip is a conditional update so a lost race is
/// detected rather than silently double-claimed.
pub struct RecordRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RecordRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &CreateRecordRequest, owner_id: Uuid) -> Result<Record> {
        let query = format!(
            r#"
            INSERT INTO records (record_id, title, artist, cover_url, reference_url,
                                 owner_id, used, used_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, NULL, ?)
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, Record>(&query)
            .bind(Uuid::new_v4())
            .bind(&req.title)
            .bind(&req.artist)
            .bind(&req.cover_url)
            .bind(&req.reference_url)
            .bind(owner_id)
            .bind(Utc::now().naive_utc())
            .fetch_one(self.pool)
            .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Record> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM records WHERE record_id = ?");

        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// List records from all users with owner names. By default only unused
    /// records are shown; `include_used` widens to the full pool.
    pub async fn list_with_owner(
        &self,
        include_used: bool,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<RecordWithOwner>> {
        let records = sqlx::query_as::<_, RecordWithOwner>(
            r#"
            SELECT r.record_id, r.title, r.artist, r.cover_url,
                   u.username AS owner_name, r.used
            FROM records r
            INNER JOIN users u ON r.owner_id = u.user_id
            WHERE (? OR r.used = 0)
            ORDER BY u.username, r.artist, r.title
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(include_used)
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid, skip: i64, limit: i64) -> Result<Vec<Record>> {
        let query = format!(
            r#"
            SELECT {RECORD_COLUMNS} FROM records
            WHERE owner_id = ?
            ORDER BY artist, title
            LIMIT ? OFFSET ?
            "#
        );

        let records = sqlx::query_as::<_, Record>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(skip)
            .fetch_all(self.pool)
            .await?;

        Ok(records)
    }

    /// Records already played in a past selection, with owner names.
    pub async fn list_used_with_owner(&self, skip: i64, limit: i64) -> Result<Vec<RecordWithOwner>> {
        let records = sqlx::query_as::<_, RecordWithOwner>(
            r#"
            SELECT r.record_id, r.title, r.artist, r.cover_url,
                   u.username AS owner_name, r.used
            FROM records r
            INNER JOIN users u ON r.owner_id = u.user_id
            WHERE r.used = 1
            ORDER BY r.used_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    pub async fn has_unused(&self, owner_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM records WHERE owner_id = ? AND used = 0)",
        )
        .bind(owner_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    async fn unused_record_ids(conn: &mut SqliteConnection, owner_id: Uuid) -> Result<Vec<Uuid>> {
        let ids: Vec<(Uuid,)> =
            sqlx::query_as("SELECT record_id FROM records WHERE owner_id = ? AND used = 0")
                .bind(owner_id)
                .fetch_all(&mut *conn)
                .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Flip `used` for a single record, but only if it is still unclaimed.
    /// Returns false when another claim got there first.
    async fn try_claim(
        conn: &mut SqliteConnection,
        record_id: Uuid,
        claimed_at: NaiveDateTime,
    ) -> Result<bool> {
        let result =
            sqlx::query("UPDATE records SET used = 1, used_at = ? WHERE record_id = ? AND used = 0")
                .bind(claimed_at)
                .bind(record_id)
                .execute(&mut *conn)
                .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Claim one unused record of the given owner, picked uniformly at random.
    /// Returns `None` when the owner has no unused records left. A lost race
    /// is retried once against a fresh snapshot before surfacing
    /// `ClaimConflict`.
    ///
    /// Runs on the caller's connection so the claim rolls back with the
    /// transaction it is part of.
    pub async fn claim_random_unused(
        conn: &mut SqliteConnection,
        owner_id: Uuid,
        claimed_at: NaiveDateTime,
    ) -> Result<Option<Record>> {
        for _ in 0..2 {
            let candidates = Self::unused_record_ids(&mut *conn, owner_id).await?;
            if candidates.is_empty() {
                return Ok(None);
            }

            let pick = {
                let mut rng = rand::thread_rng();
                candidates[rng.gen_range(0..candidates.len())]
            };

            if Self::try_claim(&mut *conn, pick, claimed_at).await? {
                let query = format!("SELECT {RECORD_COLUMNS} FROM records WHERE record_id = ?");
                let record = sqlx::query_as::<_, Record>(&query)
                    .bind(pick)
                    .fetch_one(&mut *conn)
                    .await?;
                return Ok(Some(record));
            }
        }

        Err(StorageError::ClaimConflict)
    }

    /// Delete a never-used record and return it. Used records are referenced
    /// by the ledger and must stay dereferenceable.
    pub async fn delete(&self, record_id: Uuid) -> Result<Record> {
        let record = self.find_by_id(record_id).await?;

        if record.used {
            return Err(StorageError::RecordInUse);
        }

        sqlx::query("DELETE FROM records WHERE record_id = ?")
            .bind(record_id)
            .execute(self.pool)
            .await?;

        Ok(record)
    }

    /// Map of record id -> "Artist - Title" label, used by the stats fold.
    pub async fn label_map(&self) -> Result<std::collections::HashMap<Uuid, String>> {
        let rows: Vec<(Uuid, String, String)> =
            sqlx::query_as("SELECT record_id, artist, title FROM records")
                .fetch_all(self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, artist, title)| (id, format!("{artist} - {title}")))
            .collect())
    }
}
