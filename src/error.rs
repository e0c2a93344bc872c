use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Crate-wide error taxonomy.
///
/// `NotFound` is the only client-facing "soft" failure; everything else is
/// either a rejected input (`Validation`, `Integrity`) or corrupt
/// state/data (`Decode`, `Store`). None of these are retried internally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("integrity violation: {0}")]
    Integrity(String),

    #[error("corrupt stored vector: {0}")]
    Decode(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
