use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Record {
    pub record_id: Uuid,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub reference_url: Option<String>,
    /// Never changes after creation.
    pub owner_id: Uuid,
    /// Terminal once true; a record is claimed by at most one selection.
    pub used: bool,
    pub used_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
}
