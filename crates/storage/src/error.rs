use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("At least two distinct participants are required")]
    InsufficientParticipants,

    #[error("User with ID {0} not found")]
    UnknownUser(Uuid),

    // The exact wording is load-bearing: clients match on this message.
    #[error("None of the selected users have unused records available")]
    NoEligibleUsers,

    #[error("No unused records found for user {0}")]
    NoUnusedRecords(String),

    #[error("Selection raced with a concurrent request, please try again")]
    ClaimConflict,

    #[error("Rating must be between 0 and 10")]
    RatingOutOfRange(f64),

    #[error("Selection with ID {0} not found")]
    SelectionNotFound(Uuid),

    #[error("Cannot delete a record that has been used in a selection")]
    RecordInUse,
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if matches!(e.code().as_deref(), Some("2067") | Some("1555"))
        )
    }
}
