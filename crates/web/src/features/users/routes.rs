use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{create_user, list_users};
use crate::middleware::auth::require_user;

pub fn routes(db: Database) -> Router<Database> {
    let protected = Router::new()
        .route("/", get(list_users))
        .route_layer(middleware::from_fn_with_state(db, require_user));

    Router::new().route("/", post(create_user)).merge(protected)
}
