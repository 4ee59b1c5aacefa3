use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{Fetch, FetchError, Request, Response};

/// Authentication methods for [HttpFetch]
#[derive(Clone, Debug)]
pub enum AuthMethod {
    /// Requests are sent anonymously
    None,

    /// Every request carries `Authorization: Bearer {token}`
    Bearer(String),
}

/// Configuration for [HttpFetch]
#[derive(Clone, Debug)]
pub struct HttpFetchConfig {
    /// Authentication method
    pub auth_method: AuthMethod,

    /// Optional timeout for requests in seconds (default: 30)
    pub timeout_seconds: Option<u64>,

    /// Custom headers sent with each request
    pub headers: Vec<(String, String)>,
}

impl Default for HttpFetchConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::None,
            timeout_seconds: Some(30),
            headers: Vec::new(),
        }
    }
}

impl HttpFetchConfig {
    /// Create a configuration for anonymous access
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the authentication method
    pub fn with_auth(mut self, auth_method: AuthMethod) -> Self {
        self.auth_method = auth_method;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

/// [Fetch] implementation backed by a `reqwest` client.
///
/// ```no_run
/// use pod_common::Iri;
/// use pod_fetch::{AuthMethod, HttpFetch, HttpFetchConfig, get_resource_info};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = HttpFetchConfig::new()
///     .with_auth(AuthMethod::Bearer("my-token".to_string()))
///     .with_timeout(60);
/// let fetch = HttpFetch::new(config);
///
/// let iri = Iri::parse("https://pod.example/photos/cat.jpg")?;
/// let info = get_resource_info(&iri, &fetch).await?;
/// println!("ACL lives at {:?}", info.acl);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpFetch {
    config: HttpFetchConfig,
    client: Client,
}

impl HttpFetch {
    /// Create a new fetch with the given configuration
    pub fn new(config: HttpFetchConfig) -> Self {
        let client = Self::build_client(&config);
        Self { config, client }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn build_client(config: &HttpFetchConfig) -> Client {
        let mut client_builder = Client::builder();

        if let Some(timeout) = config.timeout_seconds {
            client_builder = client_builder.timeout(std::time::Duration::from_secs(timeout));
        }

        client_builder.build().unwrap_or_else(|_| Client::new())
    }

    // Browsers own request timeouts
    #[cfg(target_arch = "wasm32")]
    fn build_client(_config: &HttpFetchConfig) -> Client {
        Client::new()
    }

    /// The active configuration
    pub fn config(&self) -> &HttpFetchConfig {
        &self.config
    }

    /// Add authentication and custom headers to a request
    fn build_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let mut builder = builder;

        match &self.config.auth_method {
            AuthMethod::None => {}
            AuthMethod::Bearer(token) => {
                builder = builder.bearer_auth(token);
            }
        }

        for (key, value) in &self.config.headers {
            builder = builder.header(key, value);
        }

        builder
    }
}

impl Default for HttpFetch {
    fn default() -> Self {
        Self::new(HttpFetchConfig::default())
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Fetch for HttpFetch {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        let (parts, body) = request.into_parts();
        let url = parts.uri.to_string();

        debug!("{} {}", parts.method, url);

        let builder = self
            .client
            .request(parts.method, &url)
            .headers(parts.headers)
            .body(body);
        let response = self.build_request(builder).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(%status, "{}", url);

        let mut converted = Response::new(body);
        *converted.status_mut() = status;
        *converted.headers_mut() = headers;

        Ok(converted)
    }
}
