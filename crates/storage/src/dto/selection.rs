use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::record::RecordResponse;
use super::user::ParticipantUser;

/// Result of one completed selection, as returned to the requesting client.
/// `new_weights` is aligned index-for-index with the submitted participant
/// ids; the front-end renders the two side by side.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionResult {
    pub chosen_username: String,
    /// Formatted as "Artist - Title".
    pub chosen_record: String,
    pub new_weights: Vec<f64>,
    pub timestamp: chrono::NaiveDateTime,
}

/// One history entry with its related entities expanded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SelectionResponse {
    pub selection_id: Uuid,
    pub timestamp: chrono::NaiveDateTime,
    pub chosen_user_id: Uuid,
    pub record_id: Uuid,
    pub initiated_by: Option<Uuid>,
    pub participants: String,
    pub weight_changes: String,
    pub chosen_user: ParticipantUser,
    pub record: RecordResponse,
    pub average_rating: Option<f64>,
    pub ratings: Vec<RatingResponse>,
}

/// A rating with its rater expanded for display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RatingResponse {
    pub rating_id: Uuid,
    pub selection_id: Uuid,
    pub user_id: Uuid,
    pub rating: f64,
    pub timestamp: chrono::NaiveDateTime,
    pub username: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SelectionParams {
    #[serde(default)]
    pub participant_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryParams {
    #[serde(default, deserialize_with = "super::common::flag")]
    pub my_selections_only: bool,
    #[serde(default, deserialize_with = "super::common::flag")]
    pub sort_by_rating: bool,
    #[serde(default = "super::common::default_skip")]
    pub skip: i64,
    #[serde(default = "super::common::default_limit")]
    pub limit: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RateParams {
    pub rating: f64,
}
