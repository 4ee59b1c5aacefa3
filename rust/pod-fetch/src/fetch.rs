use std::sync::Arc;

use async_trait::async_trait;
use http::header::{ACCEPT, CONTENT_TYPE, IF_NONE_MATCH, LINK};
use http::{Method, StatusCode};
use pod_common::{ConditionalSync, Iri};

use crate::FetchError;

/// A request to a pod. Bodies are small linked-data documents, so they are
/// buffered whole.
pub type Request = http::Request<Vec<u8>>;

/// A pod's response to a [Request]
pub type Response = http::Response<Vec<u8>>;

/// Media type of expanded JSON-LD documents
pub const JSON_LD: &str = "application/ld+json";

/// Media type of Turtle documents
pub const TURTLE: &str = "text/turtle";

/// A `fetch`-compatible function bound to the caller's session.
///
/// Every network operation in the pod access crates is performed through an
/// injected [Fetch], never through ambient state. Implementations decide how
/// requests are authenticated; they should only fail for transport problems
/// and hand every HTTP status back as a [Response].
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Fetch: ConditionalSync {
    /// Perform a single request
    async fn fetch(&self, request: Request) -> Result<Response, FetchError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> Fetch for Arc<T>
where
    T: Fetch + ?Sized,
{
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        self.as_ref().fetch(request).await
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl<T> Fetch for &T
where
    T: Fetch + ?Sized,
{
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        (**self).fetch(request).await
    }
}

/// Build a `HEAD` request
pub fn head(iri: &Iri) -> Result<Request, FetchError> {
    Ok(http::Request::builder()
        .method(Method::HEAD)
        .uri(iri.as_str())
        .body(Vec::new())?)
}

/// Build a `GET` request accepting `accept`
pub fn get(iri: &Iri, accept: &str) -> Result<Request, FetchError> {
    Ok(http::Request::builder()
        .method(Method::GET)
        .uri(iri.as_str())
        .header(ACCEPT, accept)
        .body(Vec::new())?)
}

/// Build a `PUT` request replacing the resource with `body`
pub fn put(iri: &Iri, content_type: &str, body: Vec<u8>) -> Result<Request, FetchError> {
    Ok(http::Request::builder()
        .method(Method::PUT)
        .uri(iri.as_str())
        .header(CONTENT_TYPE, content_type)
        .body(body)?)
}

/// Build a `PUT` request that only succeeds when nothing exists at `iri`,
/// typed as a basic container
pub fn put_container(iri: &Iri) -> Result<Request, FetchError> {
    Ok(http::Request::builder()
        .method(Method::PUT)
        .uri(iri.as_str())
        .header(CONTENT_TYPE, TURTLE)
        .header(IF_NONE_MATCH, "*")
        .header(
            LINK,
            format!(
                "<{}>; rel=\"type\"",
                pod_common::vocab::ldp::BASIC_CONTAINER
            ),
        )
        .body(Vec::new())?)
}

/// Build a `DELETE` request
pub fn delete(iri: &Iri) -> Result<Request, FetchError> {
    Ok(http::Request::builder()
        .method(Method::DELETE)
        .uri(iri.as_str())
        .body(Vec::new())?)
}

/// Turn a non-success response into a [FetchError]
pub fn ensure_success(iri: &Iri, response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::from_status(iri.as_str(), status))
    }
}

/// Whether the response status means the resource does not exist
pub fn is_not_found(response: &Response) -> bool {
    matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE)
}
