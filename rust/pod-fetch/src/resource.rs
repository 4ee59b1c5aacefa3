use http::header::{CONTENT_TYPE, LINK};
use http::{HeaderMap, StatusCode};
use pod_common::Iri;
use pod_common::vocab::{acl, acp, ldp, pim};
use tracing::{debug, warn};

use crate::{
    Fetch, FetchError, Link, Response, WacAllow, delete, ensure_success, get, head,
    parse_link_header, parse_wac_allow, put_container,
};

/// Name of the header advertising the modes held on a resource
pub const WAC_ALLOW: &str = "wac-allow";

/// What a server advertises about a resource, gathered from the headers of a
/// single `HEAD` (or `GET`) exchange.
///
/// The access-control capability probes operate on this value alone, so it
/// must be fetched before access control can be managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// The resource
    pub iri: Iri,
    /// Its media type, when the server reported one
    pub content_type: Option<String>,
    /// Whether the resource is a container
    pub is_container: bool,
    /// Whether the resource is the root container of a pod
    pub is_storage_root: bool,
    /// Web Access Control document governing the resource
    pub acl: Option<Iri>,
    /// Access Control Resource governing the resource
    pub acr: Option<Iri>,
    /// Modes the requesting user and the public hold
    pub wac_allow: Option<WacAllow>,
    /// Every link the server advertised
    pub links: Vec<Link>,
}

impl ResourceInfo {
    /// Metadata for a resource about which nothing has been advertised
    pub fn new(iri: Iri) -> Self {
        let is_container = iri.is_container();
        Self {
            iri,
            content_type: None,
            is_container,
            is_storage_root: false,
            acl: None,
            acr: None,
            wac_allow: None,
            links: Vec::new(),
        }
    }

    /// Record the resource's ACL
    pub fn with_acl(mut self, acl: Iri) -> Self {
        self.acl = Some(acl);
        self
    }

    /// Record the resource's ACR
    pub fn with_acr(mut self, acr: Iri) -> Self {
        self.acr = Some(acr);
        self
    }

    /// Record the resource's media type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read the metadata of `iri` out of the headers of `response`
    pub fn from_headers(iri: Iri, headers: &HeaderMap) -> Self {
        let mut info = ResourceInfo::new(iri);

        info.content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        for value in headers.get_all(LINK) {
            let Ok(value) = value.to_str() else {
                warn!("Ignoring non-text Link header on {}", info.iri);
                continue;
            };
            match parse_link_header(value) {
                Ok(links) => info.links.extend(links),
                Err(error) => warn!("Ignoring link on {}: {}", info.iri, error),
            }
        }

        for link in &info.links {
            if link.has_rel(acl::LINK_REL) && info.acl.is_none() {
                info.acl = resolve(&info.iri, &link.target);
            } else if link.has_rel(acp::LINK_REL) && info.acr.is_none() {
                info.acr = resolve(&info.iri, &link.target);
            } else if link.has_rel("type") {
                match link.target.as_str() {
                    pim::STORAGE => info.is_storage_root = true,
                    ldp::CONTAINER | ldp::BASIC_CONTAINER => info.is_container = true,
                    _ => {}
                }
            }
        }

        info.wac_allow = headers
            .get(WAC_ALLOW)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| match parse_wac_allow(value) {
                Ok(allow) => Some(allow),
                Err(error) => {
                    warn!("Ignoring WAC-Allow on {}: {}", info.iri, error);
                    None
                }
            });

        info
    }
}

fn resolve(base: &Iri, target: &str) -> Option<Iri> {
    match base.join(target) {
        Ok(iri) => Some(iri),
        Err(error) => {
            warn!("Ignoring unresolvable link target '{}': {}", target, error);
            None
        }
    }
}

/// Fetch the metadata of `iri`.
///
/// Uses `HEAD`, falling back to `GET` for servers that refuse it.
pub async fn get_resource_info<F>(iri: &Iri, fetch: &F) -> Result<ResourceInfo, FetchError>
where
    F: Fetch + ?Sized,
{
    let mut response: Response = fetch.fetch(head(iri)?).await?;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        debug!("HEAD refused for {}, retrying with GET", iri);
        response = fetch.fetch(get(iri, "*/*")?).await?;
    }

    let response = ensure_success(iri, response)?;
    Ok(ResourceInfo::from_headers(iri.clone(), response.headers()))
}

/// Delete the resource at `iri`
pub async fn delete_resource<F>(iri: &Iri, fetch: &F) -> Result<(), FetchError>
where
    F: Fetch + ?Sized,
{
    let response = fetch.fetch(delete(iri)?).await?;
    ensure_success(iri, response)?;
    Ok(())
}

/// Create a container at `iri` unless one already exists.
///
/// Relies on the server's `If-None-Match: *` handling, so concurrent callers
/// racing to create the same container all succeed and only one of them
/// creates it. Returns whether this call created the container.
pub async fn create_container_at<F>(iri: &Iri, fetch: &F) -> Result<bool, FetchError>
where
    F: Fetch + ?Sized,
{
    let response = fetch.fetch(put_container(iri)?).await?;

    match response.status() {
        StatusCode::PRECONDITION_FAILED => Ok(false),
        status if status.is_success() => {
            debug!("Created container {}", iri);
            Ok(true)
        }
        status => Err(FetchError::from_status(iri.as_str(), status)),
    }
}

/// Find the root container of the pod holding `iri`, by walking up the
/// container hierarchy until a container advertises itself as storage.
pub async fn find_storage_root<F>(iri: &Iri, fetch: &F) -> Result<Option<Iri>, FetchError>
where
    F: Fetch + ?Sized,
{
    let mut candidate = if iri.is_container() {
        Some(iri.without_fragment())
    } else {
        iri.parent()
    };

    while let Some(container) = candidate {
        match get_resource_info(&container, fetch).await {
            Ok(info) if info.is_storage_root => return Ok(Some(container)),
            Ok(_) => {}
            Err(error @ (FetchError::NotFound(_) | FetchError::UnexpectedStatus { .. })) => {
                debug!("Skipping {} while looking for storage: {}", container, error);
            }
            Err(error) => return Err(error),
        }
        candidate = container.parent();
    }

    Ok(None)
}
