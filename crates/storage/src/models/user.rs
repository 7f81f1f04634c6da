use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    /// Selection weight. Mutated only by a completed selection.
    pub weight: f64,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: chrono::NaiveDateTime,
}
