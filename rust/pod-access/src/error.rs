use http::StatusCode;
use pod_common::IriError;
use pod_dataset::DatasetError;
use pod_fetch::FetchError;
use thiserror::Error;

/// Message of [AccessControlError::NoAccessPolicy], reported when a resource
/// advertises neither an ACR nor an ACL
pub const NO_ACCESS_POLICY_ERROR: &str = "No access policy found";

/// Errors that can occur while managing access to a resource
#[derive(Error, Debug)]
pub enum AccessControlError {
    /// The resource links to neither an ACR nor an ACL, so its permissions
    /// cannot be managed
    #[error("{}", NO_ACCESS_POLICY_ERROR)]
    NoAccessPolicy,

    /// A WAC strategy was requested for a resource without an ACL link
    #[error("Resource {0} does not link to an ACL")]
    MissingAcl(String),

    /// An ACP strategy was requested for a resource without an ACR link
    #[error("Resource {0} does not link to an Access Control Resource")]
    MissingAcr(String),

    /// No policies container was given and the pod root of the resource
    /// could not be discovered
    #[error("No policies container for {0}: the root of its pod could not be found")]
    MissingPoliciesContainer(String),

    /// The policies container is not a container of the resource's pod
    #[error("{container} cannot hold policies for {resource}")]
    InvalidPoliciesContainer {
        /// The rejected container
        container: String,
        /// The resource being managed
        resource: String,
    },

    /// A request failed, or the server answered with an error status
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An ACL, ACR, policy or profile document could not be read or written
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// An agent or resource IRI was invalid
    #[error(transparent)]
    InvalidIri(#[from] IriError),
}

impl AccessControlError {
    /// The HTTP status behind this error, when a server rejected a request
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AccessControlError::Fetch(error) => error.status(),
            AccessControlError::Dataset(DatasetError::Fetch(error)) => error.status(),
            AccessControlError::Dataset(DatasetError::NotFound(_)) => Some(StatusCode::NOT_FOUND),
            _ => None,
        }
    }

    /// Whether this error means access control cannot be managed at all for
    /// the resource
    pub fn is_no_access_policy(&self) -> bool {
        matches!(self, AccessControlError::NoAccessPolicy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_reports_the_no_access_policy_message() {
        assert_eq!(
            AccessControlError::NoAccessPolicy.to_string(),
            NO_ACCESS_POLICY_ERROR
        );
        assert!(AccessControlError::NoAccessPolicy.is_no_access_policy());
    }

    #[test]
    fn it_exposes_statuses_of_failed_requests() {
        let error = AccessControlError::from(DatasetError::Fetch(FetchError::from_status(
            "https://pod.example/.acl",
            StatusCode::FORBIDDEN,
        )));

        assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(AccessControlError::NoAccessPolicy.status(), None);
    }
}
