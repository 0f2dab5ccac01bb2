use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgoraError {
    /// Network failure, rate limit or server-side outage. Worth retrying.
    #[error("Transient model error: {0}")]
    Transient(String),

    /// The model endpoint rejected the request as malformed.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Other(String),
}

impl AgoraError {
    /// True for failures raised by the remote model boundary.
    pub fn is_boundary_failure(&self) -> bool {
        matches!(self, AgoraError::Transient(_) | AgoraError::InvalidRequest(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, AgoraError::Transient(_))
    }
}

impl From<serde_json::Error> for AgoraError {
    fn from(e: serde_json::Error) -> Self {
        AgoraError::Serialization(e.to_string())
    }
}
