//! Store error types.

/// Errors from the document store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver or connection failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed at startup
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored document could not be encoded or decoded
    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    /// An update targeted a record that does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// A unique key is already taken
    #[error("{kind} {id} already exists")]
    Conflict { kind: &'static str, id: String },
}
