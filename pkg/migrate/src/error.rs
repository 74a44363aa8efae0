use thiserror::Error;

/// Outcome of a failed migrate action, classified by whether retrying may help.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Presumed transient (sync lag, server load). Rechecking later may succeed.
    #[error(transparent)]
    Retriable(anyhow::Error),

    /// Needs manual intervention.
    #[error(transparent)]
    NotRetriable(anyhow::Error),
}

impl MigrateError {
    pub fn retriable(err: impl Into<anyhow::Error>) -> Self {
        MigrateError::Retriable(err.into())
    }

    pub fn not_retriable(err: impl Into<anyhow::Error>) -> Self {
        MigrateError::NotRetriable(err.into())
    }

    pub fn is_retriable(&self) -> bool {
        matches!(self, MigrateError::Retriable(_))
    }

    pub fn inner(&self) -> &anyhow::Error {
        match self {
            MigrateError::Retriable(e) | MigrateError::NotRetriable(e) => e,
        }
    }
}
