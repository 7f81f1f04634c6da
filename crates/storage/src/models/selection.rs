use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One entry of the append-only selection ledger. Immutable once written,
/// except for the ratings attached to it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Selection {
    pub selection_id: Uuid,
    pub timestamp: chrono::NaiveDateTime,
    pub chosen_user_id: Uuid,
    pub record_id: Uuid,
    pub initiated_by: Option<Uuid>,
    /// Comma-joined participant ids, in request order.
    pub participants: String,
    /// JSON map of user id -> weight before the selection.
    pub weights_before: String,
    /// JSON map of user id -> weight after the selection.
    pub weight_changes: String,
}
