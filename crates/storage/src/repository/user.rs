use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool};
use uuid::Uuid;

use crate::dto::user::{CreateUserRequest, ParticipantUser};
use crate::error::{Result, StorageError};
use crate::models::User;

const USER_COLUMNS: &str =
    "user_id, username, email, weight, is_active, is_admin, created_at";

/// Starting weight for newly registered users.
pub const DEFAULT_WEIGHT: f64 = 100.0;

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default starting weight.
    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username, email, weight, is_active, is_admin, created_at)
            VALUES (?, ?, ?, ?, 1, 0, ?)
            RETURNING user_id, username, email, weight, is_active, is_admin, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.email)
        .bind(DEFAULT_WEIGHT)
        .bind(Utc::now().naive_utc())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A user with that username or e-mail already exists".to_string(),
                )
            } else {
                err
            }
        })?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Fetch all users matching the given ids. Missing ids are simply absent
    /// from the result; callers decide whether that is an error.
    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE user_id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        query.push(")");

        let users = query.build_query_as::<User>().fetch_all(self.pool).await?;

        Ok(users)
    }

    /// List users with their current weights for the selection page.
    pub async fn list_participants(&self, skip: i64, limit: i64) -> Result<Vec<ParticipantUser>> {
        let participants = sqlx::query_as::<_, ParticipantUser>(
            r#"
            SELECT user_id, username, weight
            FROM users
            ORDER BY username
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// Takes an explicit executor so selection can batch its weight writes
    /// into one transaction.
    pub async fn update_weight(
        executor: impl sqlx::SqliteExecutor<'_>,
        id: Uuid,
        new_weight: f64,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE users SET weight = ? WHERE user_id = ?")
            .bind(new_weight)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Map of user id -> username, used by the stats fold.
    pub async fn username_map(&self) -> Result<std::collections::HashMap<Uuid, String>> {
        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT user_id, username FROM users")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().collect())
    }
}
