#![allow(dead_code)]

use storage::Database;
use storage::dto::record::CreateRecordRequest;
use storage::dto::user::CreateUserRequest;
use storage::models::User;
use storage::repository::record::RecordRepository;
use storage::repository::user::UserRepository;

/// Fresh in-memory database with migrations applied. The shared-cache URI
/// keeps one database across the pool's connections; `name` must be unique
/// per test so parallel tests stay isolated.
pub async fn setup_db(name: &str) -> Database {
    let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
    let db = Database::new(&url)
        .await
        .expect("failed to open test database");
    db.run_migrations().await.expect("failed to run migrations");
    db
}

pub async fn create_user(db: &Database, username: &str) -> User {
    UserRepository::new(db.pool())
        .create(&CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        })
        .await
        .expect("failed to create user")
}

pub async fn add_records(db: &Database, owner: &User, count: usize) {
    let repo = RecordRepository::new(db.pool());
    for i in 0..count {
        repo.create(
            &CreateRecordRequest {
                title: format!("Album {i}"),
                artist: format!("{} Band", owner.username),
                cover_url: None,
                reference_url: None,
            },
            owner.user_id,
        )
        .await
        .expect("failed to create record");
    }
}

pub async fn current_weight(db: &Database, user: &User) -> f64 {
    UserRepository::new(db.pool())
        .find_by_id(user.user_id)
        .await
        .expect("user disappeared")
        .weight
}
