/// Errors raised while configuring a [`ReqwestTransport`](super::ReqwestTransport).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum TransportBuildError {
    /// The base URL could not be assembled from the configured parts.
    UrlError(url::ParseError),

    /// HTTP protocol constraints were violated while building the base URI.
    HttpError(http::Error),

    /// Invalid base path configuration.
    #[display("Invalid base path: {error}")]
    #[from(skip)]
    InvalidBasePath {
        /// Description of why the base path is invalid.
        error: String,
    },
}
