use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::Record;

/// Response containing one record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordResponse {
    pub record_id: Uuid,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub reference_url: Option<String>,
    pub owner_id: Uuid,
    pub used: bool,
    pub used_at: Option<chrono::NaiveDateTime>,
}

/// Record joined with its owner's username, for the shared pool views.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct RecordWithOwner {
    pub record_id: Uuid,
    pub title: String,
    pub artist: String,
    pub cover_url: Option<String>,
    pub owner_name: String,
    pub used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRecordRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Artist must be between 1 and 255 characters"
    ))]
    pub artist: String,

    #[validate(url, length(max = 500))]
    pub cover_url: Option<String>,

    #[validate(url, length(max = 500))]
    pub reference_url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecordListParams {
    #[serde(default, deserialize_with = "super::common::flag")]
    pub include_used: bool,
    #[serde(default = "super::common::default_skip")]
    pub skip: i64,
    #[serde(default = "super::common::default_limit")]
    pub limit: i64,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            record_id: record.record_id,
            title: record.title,
            artist: record.artist,
            cover_url: record.cover_url,
            reference_url: record.reference_url,
            owner_id: record.owner_id,
            used: record.used,
            used_at: record.used_at,
        }
    }
}
