use thiserror::Error;

/// Failure to read an object from the API server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// `resource` is qualified with its group, e.g. `roles.rbac.authorization.k8s.io`.
    #[error("{resource} {name:?} not found")]
    NotFound { resource: String, name: String },

    #[error("the server was unable to return a response in the time allotted: {0}")]
    ServerTimeout(String),

    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }

    pub fn is_server_timeout(&self) -> bool {
        matches!(self, FetchError::ServerTimeout(_))
    }
}
