use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use storage::Database;

use super::handlers::{create_record, delete_record, list_records, my_records, record_history};
use crate::middleware::auth::require_user;

pub fn routes(db: Database) -> Router<Database> {
    Router::new()
        .route("/", get(list_records))
        .route("/", post(create_record))
        .route("/my", get(my_records))
        .route("/history", get(record_history))
        .route("/:id", delete(delete_record))
        .route_layer(middleware::from_fn_with_state(db, require_user))
}
