use std::fmt::Debug;

use http::Uri;
use http::uri::{PathAndQuery, Scheme};
use url::Url;

use super::{ReqwestTransport, TransportBuildError};

/// How response bodies are decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// Parse the body as JSON; an undecodable body is a transport failure.
    #[default]
    Json,
    /// Keep the body as a JSON string.
    Text,
}

/// Builder for [`ReqwestTransport`].
///
/// # Default Configuration
///
/// - **Scheme**: HTTP
/// - **Host**: `localhost`
/// - **Port**: 8080
/// - **Base path**: `/api`
/// - **Response type**: [`ResponseType::Json`]
///
/// # Headers
///
/// The transport sets no header besides `Content-Type: application/json` on
/// requests with a body. Default headers (API keys, user agent, ...) and
/// timeouts are configured on the [`reqwest::Client`] given to
/// [`with_client`](Self::with_client), see
/// [`reqwest::ClientBuilder::default_headers`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use http::uri::Scheme;
/// use specfetch_core::ReqwestTransport;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = reqwest::Client::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let transport = ReqwestTransport::builder()
///     .with_client(client)
///     .with_scheme(Scheme::HTTPS)
///     .with_host("api.example.com")
///     .with_port(443)
///     .with_base_path("/v1")?
///     .build()?;
///
/// assert_eq!(transport.base_url().as_str(), "https://api.example.com/v1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransportBuilder {
    client: reqwest::Client,
    scheme: Scheme,
    host: String,
    port: u16,
    base_path: PathAndQuery,
    response_type: ResponseType,
}

impl ReqwestTransportBuilder {
    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Fails if the scheme, host, port and base path do not form a valid URL.
    pub fn build(self) -> Result<ReqwestTransport, TransportBuildError> {
        let Self {
            client,
            scheme,
            host,
            port,
            base_path,
            response_type,
        } = self;

        let base_uri = Uri::builder()
            .scheme(scheme)
            .authority(format!("{host}:{port}"))
            .path_and_query(base_path.path())
            .build()?;
        let base_url = base_uri.to_string().parse::<Url>()?;

        Ok(ReqwestTransport {
            client,
            base_url,
            response_type,
        })
    }

    /// Uses a preconfigured client, e.g. with a timeout or default headers.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets the HTTP scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the hostname or IP address of the API server.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port of the API server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the path prepended to every resource.
    ///
    /// # Errors
    ///
    /// Returns [`TransportBuildError::InvalidBasePath`] if the path contains
    /// invalid characters (such as spaces).
    pub fn with_base_path<P>(mut self, base_path: P) -> Result<Self, TransportBuildError>
    where
        P: TryInto<PathAndQuery>,
        P::Error: Debug + 'static,
    {
        let base_path = base_path
            .try_into()
            .map_err(|err| TransportBuildError::InvalidBasePath {
                error: format!("{err:?}"),
            })?;
        self.base_path = base_path;
        Ok(self)
    }

    /// Sets how response bodies are decoded.
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            scheme: Scheme::HTTP,
            host: "localhost".to_string(),
            port: 8080,
            base_path: PathAndQuery::from_static("/api"),
            response_type: ResponseType::default(),
        }
    }
}
