use sqlx::SqlitePool;
use storage::{
    dto::record::{CreateRecordRequest, RecordWithOwner},
    error::Result,
    models::Record,
    repository::record::RecordRepository,
};
use uuid::Uuid;

/// All records with owner names; unused only unless `include_used` is set.
pub async fn list_records(
    pool: &SqlitePool,
    include_used: bool,
    skip: i64,
    limit: i64,
) -> Result<Vec<RecordWithOwner>> {
    RecordRepository::new(pool)
        .list_with_owner(include_used, skip, limit)
        .await
}

pub async fn list_owned_records(
    pool: &SqlitePool,
    owner_id: Uuid,
    skip: i64,
    limit: i64,
) -> Result<Vec<Record>> {
    RecordRepository::new(pool)
        .list_by_owner(owner_id, skip, limit)
        .await
}

/// Records already played in a past selection.
pub async fn list_used_records(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<RecordWithOwner>> {
    RecordRepository::new(pool).list_used_with_owner(skip, limit).await
}

pub async fn create_record(
    pool: &SqlitePool,
    req: &CreateRecordRequest,
    owner_id: Uuid,
) -> Result<Record> {
    RecordRepository::new(pool).create(req, owner_id).await
}

pub async fn get_record(pool: &SqlitePool, record_id: Uuid) -> Result<Record> {
    RecordRepository::new(pool).find_by_id(record_id).await
}

pub async fn delete_record(pool: &SqlitePool, record_id: Uuid) -> Result<Record> {
    RecordRepository::new(pool).delete(record_id).await
}
