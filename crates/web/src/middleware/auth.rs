use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use storage::{Database, error::StorageError, models::User, repository::user::UserRepository};
use uuid::Uuid;

use crate::error::WebError;

/// Header carrying the caller's identity. Session handling lives upstream;
/// this layer only resolves the asserted id to a known, active user.
pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

pub async fn require_user(
    State(db): State<Database>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(WebError::Unauthorized)?;

    // Only an unknown id is an auth failure; database errors stay 500s.
    let user = UserRepository::new(db.pool())
        .find_by_id(user_id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::Unauthorized,
            other => WebError::Storage(other),
        })?;

    if !user.is_active {
        return Err(WebError::Unauthorized);
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}
