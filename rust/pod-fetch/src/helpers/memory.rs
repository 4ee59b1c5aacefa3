use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE, IF_NONE_MATCH, LINK};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use pod_common::Iri;
use pod_common::vocab::{acp, ldp, pim};
use tokio::sync::RwLock;

use crate::{Fetch, FetchError, JSON_LD, Request, Response, TURTLE, WAC_ALLOW};

/// Suffix naming the ACL document of a resource in a [MemoryPod]
pub const ACL_SUFFIX: &str = ".acl";

/// Suffix naming the ACR of a resource in a [MemoryPod]
pub const ACR_SUFFIX: &str = ".acr";

/// Which access control protocol a [MemoryPod] advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessProtocol {
    /// Resources link to an ACL document
    Wac,
    /// Resources link to an Access Control Resource
    Acp,
    /// Resources advertise both an ACL and an ACR
    Both,
    /// Resources advertise no access control at all
    Neither,
}

impl AccessProtocol {
    fn wac(&self) -> bool {
        matches!(self, AccessProtocol::Wac | AccessProtocol::Both)
    }

    fn acp(&self) -> bool {
        matches!(self, AccessProtocol::Acp | AccessProtocol::Both)
    }
}

/// A resource held by a [MemoryPod]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResource {
    /// Media type it was stored with
    pub content_type: String,
    /// Its bytes
    pub body: Vec<u8>,
}

impl StoredResource {
    fn container() -> Self {
        Self {
            content_type: TURTLE.to_string(),
            body: Vec::new(),
        }
    }
}

/// A request a [MemoryPod] has answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request method
    pub method: Method,
    /// Requested IRI
    pub iri: String,
    /// Value of the `Authorization` header, if any
    pub authorization: Option<String>,
}

#[derive(Debug)]
struct InjectedFailure {
    method: Method,
    iri: Option<String>,
    status: StatusCode,
}

#[derive(Debug, Default)]
struct PodState {
    resources: BTreeMap<String, StoredResource>,
    requests: Vec<RecordedRequest>,
    failures: Vec<InjectedFailure>,
}

impl PodState {
    fn take_failure(&mut self, method: &Method, iri: &str) -> Option<StatusCode> {
        let position = self.failures.iter().position(|failure| {
            &failure.method == method && failure.iri.as_deref().is_none_or(|target| target == iri)
        })?;
        Some(self.failures.remove(position).status)
    }

    fn store(&mut self, root: &Iri, iri: &str, content_type: &str, body: Vec<u8>) {
        self.resources.insert(
            iri.to_string(),
            StoredResource {
                content_type: content_type.to_string(),
                body,
            },
        );

        if is_auxiliary(iri) {
            return;
        }

        let mut parent = Iri::parse(iri).ok().and_then(|iri| iri.parent());
        while let Some(container) = parent {
            if !container.is_within(root) {
                break;
            }
            self.resources
                .entry(container.to_string())
                .or_insert_with(StoredResource::container);
            parent = container.parent();
        }
    }

    fn has_members(&self, container: &str) -> bool {
        self.resources.keys().any(|key| {
            key != container
                && key.starts_with(container)
                && !(is_auxiliary(key) && key[..key.len() - 4] == *container)
        })
    }
}

fn is_auxiliary(iri: &str) -> bool {
    iri.ends_with(ACL_SUFFIX) || iri.ends_with(ACR_SUFFIX)
}

fn respond(status: StatusCode) -> Response {
    let mut response = Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

fn append_header(headers: &mut HeaderMap, name: http::HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.append(name, value);
    }
}

/// An in-memory Solid pod.
///
/// Resources are kept in a shared map, so clones of a [MemoryPod] all see the
/// same pod. It advertises access control the way Solid servers do: an
/// `acl` link to `<resource>.acl`, an ACP `accessControl` link to
/// `<resource>.acr`, or both, depending on its [AccessProtocol]. Every
/// resource in a pod has an ACR, so reading an ACR that was never written
/// yields an empty document rather than a `404`.
///
/// ```
/// use pod_fetch::helpers::{AccessProtocol, MemoryPod};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pod = MemoryPod::new("https://pod.example/", AccessProtocol::Wac)?;
/// pod.initialize("https://pod.example/photos/cat.jpg", "image/jpeg", vec![1, 2, 3])
///     .await?;
///
/// // Parent containers are created along the way
/// assert!(pod.resource("https://pod.example/photos/").await.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct MemoryPod {
    root: Iri,
    protocol: AccessProtocol,
    state: Arc<RwLock<PodState>>,
}

impl MemoryPod {
    /// Create an empty pod rooted at the container `root`
    pub fn new(root: &str, protocol: AccessProtocol) -> Result<Self, FetchError> {
        let root = Iri::parse(root)?;
        if !root.is_container() {
            return Err(FetchError::InvalidRequest(format!(
                "Pod root {root} is not a container"
            )));
        }

        let mut state = PodState::default();
        state
            .resources
            .insert(root.to_string(), StoredResource::container());

        Ok(Self {
            root,
            protocol,
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// The root container of the pod
    pub fn root(&self) -> &Iri {
        &self.root
    }

    /// The protocol this pod advertises
    pub fn protocol(&self) -> AccessProtocol {
        self.protocol
    }

    /// Store a resource directly, bypassing request handling
    pub async fn initialize(
        &self,
        iri: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<(), FetchError> {
        let iri = Iri::parse(iri)?;
        let mut state = self.state.write().await;
        state.store(&self.root, iri.as_str(), content_type, body);
        Ok(())
    }

    /// The resource stored at `iri`, if any
    pub async fn resource(&self, iri: &str) -> Option<StoredResource> {
        self.state.read().await.resources.get(iri).cloned()
    }

    /// Every request answered so far, oldest first
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    /// Forget the recorded requests
    pub async fn clear_requests(&self) {
        self.state.write().await.requests.clear();
    }

    /// Answer the next `method` request with `status`, whatever its target
    pub async fn fail_next(&self, method: Method, status: StatusCode) {
        self.state.write().await.failures.push(InjectedFailure {
            method,
            iri: None,
            status,
        });
    }

    /// Answer the next `method` request to `iri` with `status`
    pub async fn fail_at(&self, method: Method, iri: &str, status: StatusCode) {
        self.state.write().await.failures.push(InjectedFailure {
            method,
            iri: Some(iri.to_string()),
            status,
        });
    }

    /// IRI of the ACL document of `iri`
    pub fn acl_of(iri: &str) -> String {
        format!("{iri}{ACL_SUFFIX}")
    }

    /// IRI of the ACR of `iri`
    pub fn acr_of(iri: &str) -> String {
        format!("{iri}{ACR_SUFFIX}")
    }

    fn describe(&self, iri: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();

        append_header(
            &mut headers,
            LINK,
            &format!("<{}>; rel=\"type\"", ldp::RESOURCE),
        );
        if iri.ends_with('/') {
            append_header(
                &mut headers,
                LINK,
                &format!("<{}>; rel=\"type\"", ldp::BASIC_CONTAINER),
            );
        }
        if iri == self.root.as_str() {
            append_header(
                &mut headers,
                LINK,
                &format!("<{}>; rel=\"type\"", pim::STORAGE),
            );
        }
        if self.protocol.wac() {
            let name = iri.rsplit('/').next().unwrap_or_default();
            append_header(
                &mut headers,
                LINK,
                &format!("<{name}{ACL_SUFFIX}>; rel=\"acl\""),
            );
        }
        if self.protocol.acp() {
            append_header(
                &mut headers,
                LINK,
                &format!("<{iri}{ACR_SUFFIX}>; rel=\"{}\"", acp::LINK_REL),
            );
        }
        append_header(
            &mut headers,
            http::HeaderName::from_static(WAC_ALLOW),
            "user=\"read write append control\",public=\"\"",
        );

        headers
    }

    fn read(&self, state: &PodState, iri: &str, with_body: bool) -> Response {
        let (stored, mut headers) = if let Some(subject) = iri.strip_suffix(ACR_SUFFIX) {
            if !self.protocol.acp() {
                return respond(StatusCode::NOT_FOUND);
            }
            match state.resources.get(iri) {
                Some(stored) => (stored.clone(), HeaderMap::new()),
                None if state.resources.contains_key(subject) => (
                    StoredResource {
                        content_type: JSON_LD.to_string(),
                        body: b"[]".to_vec(),
                    },
                    HeaderMap::new(),
                ),
                None => return respond(StatusCode::NOT_FOUND),
            }
        } else if iri.ends_with(ACL_SUFFIX) {
            match state.resources.get(iri) {
                Some(stored) if self.protocol.wac() => (stored.clone(), HeaderMap::new()),
                _ => return respond(StatusCode::NOT_FOUND),
            }
        } else {
            match state.resources.get(iri) {
                Some(stored) => (stored.clone(), self.describe(iri)),
                None => return respond(StatusCode::NOT_FOUND),
            }
        };

        append_header(&mut headers, CONTENT_TYPE, &stored.content_type);

        let mut response = respond(StatusCode::OK);
        *response.headers_mut() = headers;
        if with_body {
            *response.body_mut() = stored.body;
        }
        response
    }

    fn write(&self, state: &mut PodState, iri: &str, headers: &HeaderMap, body: Vec<u8>) -> Response {
        if (iri.ends_with(ACR_SUFFIX) && !self.protocol.acp())
            || (iri.ends_with(ACL_SUFFIX) && !self.protocol.wac())
        {
            return respond(StatusCode::NOT_FOUND);
        }

        let exists = state.resources.contains_key(iri);
        let create_only = headers
            .get(IF_NONE_MATCH)
            .is_some_and(|value| value.as_bytes() == b"*");
        if exists && create_only {
            return respond(StatusCode::PRECONDITION_FAILED);
        }

        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        state.store(&self.root, iri, &content_type, body);

        respond(if exists {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::CREATED
        })
    }

    fn remove(&self, state: &mut PodState, iri: &str) -> Response {
        if iri == self.root.as_str() {
            return respond(StatusCode::METHOD_NOT_ALLOWED);
        }
        if !state.resources.contains_key(iri) {
            return respond(StatusCode::NOT_FOUND);
        }
        if iri.ends_with('/') && state.has_members(iri) {
            return respond(StatusCode::CONFLICT);
        }

        state.resources.remove(iri);
        state.resources.remove(&Self::acl_of(iri));
        state.resources.remove(&Self::acr_of(iri));

        respond(StatusCode::NO_CONTENT)
    }

    async fn handle(&self, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let iri = parts.uri.to_string();

        let mut state = self.state.write().await;
        state.requests.push(RecordedRequest {
            method: parts.method.clone(),
            iri: iri.clone(),
            authorization: parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string()),
        });

        if let Some(status) = state.take_failure(&parts.method, &iri) {
            return respond(status);
        }

        if !iri.starts_with(self.root.as_str()) {
            return respond(StatusCode::NOT_FOUND);
        }

        match parts.method {
            Method::HEAD => self.read(&state, &iri, false),
            Method::GET => self.read(&state, &iri, true),
            Method::PUT => self.write(&mut state, &iri, &parts.headers, body),
            Method::DELETE => self.remove(&mut state, &iri),
            _ => respond(StatusCode::METHOD_NOT_ALLOWED),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Fetch for MemoryPod {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        Ok(self.handle(request).await)
    }
}
