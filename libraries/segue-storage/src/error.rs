/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violated
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Map a unique-constraint violation to `Duplicate`, anything else to `Database`.
    pub(crate) fn from_insert(err: sqlx::Error, what: impl Into<String>) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Self::Duplicate(what.into());
            }
        }
        Self::Database(err)
    }
}

impl From<StorageError> for segue_core::SegueError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => segue_core::SegueError::not_found(entity, id),
            StorageError::Duplicate(msg) => segue_core::SegueError::Duplicate(msg),
            other => segue_core::SegueError::storage(other.to_string()),
        }
    }
}
