use std::convert::Infallible;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use pod_common::{Iri, IriError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::{AccessProtocol, MemoryPod};
use crate::Fetch;

/// A local HTTP server answering requests with a [MemoryPod].
///
/// The pod is rooted at the server's own address, so IRIs handed out by
/// [PodServer::iri] can be fetched with any HTTP client. The server stops
/// when this value is dropped.
pub struct PodServer {
    endpoint: String,
    pod: MemoryPod,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl PodServer {
    /// Bind to an ephemeral local port and start serving a fresh pod
    pub async fn start(protocol: AccessProtocol) -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let endpoint = format!("http://{}", addr);

        let pod = MemoryPod::new(&format!("{endpoint}/"), protocol)?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let served = pod.clone();
        let base = endpoint.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            let pod = served.clone();
                            let base = base.clone();
                            tokio::spawn(async move {
                                let service = hyper::service::service_fn(move |req| {
                                    let pod = pod.clone();
                                    let base = base.clone();
                                    async move { handle_request(req, pod, base).await }
                                });
                                let _ = http1::Builder::new()
                                    .serve_connection(TokioIo::new(stream), service)
                                    .await;
                            });
                        }
                    }
                }
            }
        });

        Ok(PodServer {
            endpoint,
            pod,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Base URL of the server, without a trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The pod being served
    pub fn pod(&self) -> &MemoryPod {
        &self.pod
    }

    /// IRI of `path` within the served pod
    pub fn iri(&self, path: &str) -> Result<Iri, IriError> {
        self.pod.root().join(path)
    }
}

impl Drop for PodServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

fn plain(status: StatusCode) -> hyper::Response<Full<Bytes>> {
    let mut response = hyper::Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

/// Translate a hyper request into a pod request and back.
async fn handle_request(
    req: hyper::Request<Incoming>,
    pod: MemoryPod,
    base: String,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes().to_vec(),
        Err(_) => return Ok(plain(StatusCode::BAD_REQUEST)),
    };

    let path = parts
        .uri
        .path_and_query()
        .map(|path| path.as_str())
        .unwrap_or("/");
    let Ok(uri) = format!("{base}{path}").parse::<http::Uri>() else {
        return Ok(plain(StatusCode::BAD_REQUEST));
    };

    let mut request = http::Request::new(body);
    *request.method_mut() = parts.method;
    *request.uri_mut() = uri;
    *request.headers_mut() = parts.headers;

    let response = match pod.fetch(request).await {
        Ok(response) => response,
        Err(_) => return Ok(plain(StatusCode::INTERNAL_SERVER_ERROR)),
    };

    let (parts, body) = response.into_parts();
    Ok(hyper::Response::from_parts(parts, Full::new(Bytes::from(body))))
}
