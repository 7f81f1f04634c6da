use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rating {
    pub rating_id: Uuid,
    pub selection_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub timestamp: chrono::NaiveDateTime,
}
