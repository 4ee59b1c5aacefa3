use http::StatusCode;
use pod_common::IriError;
use thiserror::Error;

/// Errors that can occur while fetching from a pod
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server could not be reached
    #[error("Failed to connect to the pod: {0}")]
    ConnectionFailed(String),

    /// The request was sent but did not complete
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The request could not be assembled
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The resource does not exist
    #[error("Resource {0} not found")]
    NotFound(String),

    /// The server answered with a status the caller did not expect
    #[error("Unexpected status {status} from {iri}")]
    UnexpectedStatus {
        /// The IRI that was requested
        iri: String,
        /// The status the server answered with
        status: StatusCode,
    },

    /// A header or link target did not hold a usable IRI
    #[error(transparent)]
    Iri(#[from] IriError),
}

impl FetchError {
    /// Classify a non-success status received from `iri`
    pub fn from_status(iri: impl Into<String>, status: StatusCode) -> Self {
        let iri = iri.into();
        if status == StatusCode::NOT_FOUND {
            FetchError::NotFound(iri)
        } else {
            FetchError::UnexpectedStatus { iri, status }
        }
    }

    /// The HTTP status behind this error, when there is one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            FetchError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_builder() {
            FetchError::InvalidRequest(error.to_string())
        } else if is_connect(&error) {
            FetchError::ConnectionFailed(error.to_string())
        } else {
            FetchError::RequestFailed(error.to_string())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn is_connect(error: &reqwest::Error) -> bool {
    error.is_connect()
}

#[cfg(target_arch = "wasm32")]
fn is_connect(_error: &reqwest::Error) -> bool {
    false
}

impl From<http::Error> for FetchError {
    fn from(error: http::Error) -> Self {
        FetchError::InvalidRequest(error.to_string())
    }
}
