use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::User;

/// Response containing a user's public profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub weight: f64,
    pub is_active: bool,
    pub is_admin: bool,
}

/// Slim user view shown on the selection page.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ParticipantUser {
    pub user_id: Uuid,
    pub username: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 1,
        max = 50,
        message = "Username must be between 1 and 50 characters"
    ))]
    pub username: String,

    #[validate(email(message = "A valid e-mail address is required"))]
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            weight: user.weight,
            is_active: user.is_active,
            is_admin: user.is_admin,
        }
    }
}

impl From<User> for ParticipantUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            weight: user.weight,
        }
    }
}
