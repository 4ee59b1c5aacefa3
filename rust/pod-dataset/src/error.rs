use pod_common::IriError;
use pod_fetch::FetchError;
use thiserror::Error;

/// Errors that can occur while reading or writing linked-data documents
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The document does not exist
    #[error("Linked-data document {0} not found")]
    NotFound(String),

    /// The document could not be fetched or stored
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The document is not JSON-LD this crate understands
    #[error("Malformed JSON-LD in {document}: {reason}")]
    Malformed {
        /// The document being parsed
        document: String,
        /// What was wrong with it
        reason: String,
    },

    /// A subject or object could not be resolved to an absolute IRI
    #[error(transparent)]
    Iri(#[from] IriError),
}

impl DatasetError {
    /// Whether this error means the document is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DatasetError::NotFound(_) | DatasetError::Fetch(FetchError::NotFound(_))
        )
    }
}
