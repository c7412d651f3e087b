//! Error type shared by the HTTP collaborators.

use cerp_agentic::{ExtractionError, KnowledgeError};

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Api {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Deserialization { endpoint: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ClientError> for ExtractionError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Deserialization { .. } => Self::InvalidResponse(err.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

impl From<ClientError> for KnowledgeError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Deserialization { .. } => Self::InvalidResponse(err.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
