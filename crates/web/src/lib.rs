use axum::{Json, Router, routing::get};
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

pub mod config;
pub mod error;
pub mod features;
pub mod middleware;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::users::handlers::list_users,
        features::users::handlers::create_user,
        features::records::handlers::list_records,
        features::records::handlers::my_records,
        features::records::handlers::record_history,
        features::records::handlers::create_record,
        features::records::handlers::delete_record,
        features::selection::handlers::perform_selection,
        features::selection::handlers::selection_history,
        features::selection::handlers::selection_stats,
        features::selection::handlers::rate_selection,
    ),
    components(
        schemas(
            storage::dto::user::UserResponse,
            storage::dto::user::ParticipantUser,
            storage::dto::user::CreateUserRequest,
            storage::dto::record::RecordResponse,
            storage::dto::record::RecordWithOwner,
            storage::dto::record::CreateRecordRequest,
            storage::dto::selection::SelectionResult,
            storage::dto::selection::SelectionResponse,
            storage::dto::selection::RatingResponse,
            storage::dto::stats::SelectionStats,
            storage::models::User,
            storage::models::Record,
            storage::models::Selection,
            storage::models::Rating,
        )
    ),
    tags(
        (name = "users", description = "Participant endpoints"),
        (name = "records", description = "Record pool endpoints"),
        (name = "selection", description = "Selection, rating and stats endpoints"),
    )
)]
pub struct ApiDoc;

/// Build the full application router around a database handle.
pub fn app(db: Database) -> Router {
    Router::new()
        .nest("/users", features::users::routes(db.clone()))
        .nest("/records", features::records::routes(db.clone()))
        .merge(features::selection::routes(db.clone()))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .with_state(db)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
