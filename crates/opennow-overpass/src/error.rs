use thiserror::Error;

/// Why a single request to one mirror failed.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// The mirror answered with a non-2xx status.
    #[error("HTTP {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// Timeout, refused connection, reset, or a body that could not be read.
    #[error("network error contacting {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body arrived but is not the expected JSON document.
    #[error("malformed response body from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AttemptError {
    /// Returns `true` when the same request may succeed if sent again later.
    ///
    /// Network failures and undecodable bodies are always transient. Of the
    /// HTTP statuses only 429, 502, 503 and 504 are.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            AttemptError::Status { status, .. } => is_transient_status(*status),
            AttemptError::Network { .. } | AttemptError::Decode { .. } => true,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            AttemptError::Status { endpoint, .. }
            | AttemptError::Network { endpoint, .. }
            | AttemptError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// HTTP status, when the failure was a status response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::Status { status, .. } => Some(*status),
            AttemptError::Network { source, .. } => source.status().map(|s| s.as_u16()),
            AttemptError::Decode { .. } => None,
        }
    }
}

/// Rate limiting and gateway overload statuses that Overpass mirrors return
/// under load.
#[must_use]
pub fn is_transient_status(status: u16) -> bool {
    matches!(status, 429 | 502 | 503 | 504)
}

/// Errors returned by [`crate::MirrorClient`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("no Overpass endpoints configured")]
    NoEndpoints,

    #[error("invalid Overpass endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Every attempt failed with a retryable condition.
    #[error("Overpass request failed after {attempts} attempt(s); last error: {last}")]
    Transient {
        attempts: u32,
        #[source]
        last: AttemptError,
    },

    /// A mirror rejected the request in a way retrying will not fix.
    #[error("Overpass request rejected: {cause}")]
    Fatal {
        #[source]
        cause: AttemptError,
    },
}
