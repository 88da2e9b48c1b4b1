use thiserror::Error;

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum AdClientError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    /// Connection, timeout or body read failure.
    #[error("request to /{endpoint} failed: {source}")]
    Transport {
        /// Endpoint path.
        endpoint: &'static str,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("/{endpoint} returned status {status}: {body}")]
    Status {
        /// Endpoint path.
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        body: String,
    },
    /// The request body could not be encoded.
    #[error("failed to encode /{endpoint} request: {source}")]
    Encode {
        /// Endpoint path.
        endpoint: &'static str,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// The response body was not the expected JSON.
    #[error("failed to decode /{endpoint} response: {source}")]
    Decode {
        /// Endpoint path.
        endpoint: &'static str,
        /// Parser error.
        #[source]
        source: serde_json::Error,
    },
}

impl AdClientError {
    /// Endpoint the failing call targeted, if any.
    pub fn endpoint(&self) -> Option<&'static str> {
        match self {
            Self::Build(_) => None,
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Encode { endpoint, .. }
            | Self::Decode { endpoint, .. } => Some(*endpoint),
        }
    }
}
