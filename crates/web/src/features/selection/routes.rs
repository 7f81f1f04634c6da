use axum::{
    Router, middleware,
    routing::{get, post},
};
use storage::Database;

use super::handlers::{perform_selection, rate_selection, selection_history, selection_stats};
use crate::middleware::auth::require_user;

// Each path is also registered with a trailing slash; the deployed front-end
// sends both forms.
pub fn routes(db: Database) -> Router<Database> {
    Router::new()
        .route("/selection", post(perform_selection))
        .route("/selection/", post(perform_selection))
        .route("/selection/history", get(selection_history))
        .route("/selection/history/", get(selection_history))
        .route("/selection/stats", get(selection_stats))
        .route("/selection/stats/", get(selection_stats))
        .route("/selections/:id/rate", post(rate_selection))
        .route("/selections/:id/rate/", post(rate_selection))
        .route_layer(middleware::from_fn_with_state(db, require_user))
}
