use sqlx::SqlitePool;
use storage::{
    dto::user::{CreateUserRequest, ParticipantUser},
    error::Result,
    models::User,
    repository::user::UserRepository,
};

/// List users with their current selection weights.
pub async fn list_participants(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<ParticipantUser>> {
    UserRepository::new(pool).list_participants(skip, limit).await
}

/// Register a new user with the default starting weight.
pub async fn create_user(pool: &SqlitePool, req: &CreateUserRequest) -> Result<User> {
    UserRepository::new(pool).create(req).await
}
