//! The HTTP transport seam.
//!
//! A [`Transport`] performs exactly one HTTP exchange and never fails: every
//! transport-level problem (unreachable host, timeout, undecodable body, ...)
//! comes back as an [`HttpResponse`] with status
//! [`TRANSPORT_FAILURE_STATUS`] and the error message as payload.
//!
//! - [`ReqwestTransport`] is the default implementation, built with
//!   [`ReqwestTransport::builder`].
//! - [`StubTransport`] replays canned responses and records requests, for tests.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::endpoint::HttpMethod;

mod builder;
pub use self::builder::{ReqwestTransportBuilder, ResponseType};

mod client;
pub use self::client::ReqwestTransport;

mod error;
pub use self::error::TransportBuildError;

mod stub;
pub use self::stub::StubTransport;

/// Status reported for transport-level failures.
///
/// Real servers never answer with it.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

/// One HTTP request, relative to the transport base URL.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpRequest {
    /// `GET resource`.
    Get {
        /// Path and query, e.g. `/messages/bob?limit=10`.
        resource: String,
    },
    /// `POST resource` with an optional JSON body.
    Post {
        /// Path and query.
        resource: String,
        /// JSON body, none when the request has no body field.
        body: Option<Value>,
    },
    /// `PUT resource` with an optional JSON body.
    Put {
        /// Path and query.
        resource: String,
        /// JSON body, none when the request has no body field.
        body: Option<Value>,
    },
    /// `DELETE resource`.
    Delete {
        /// Path and query.
        resource: String,
    },
}

impl HttpRequest {
    /// The verb of the request.
    pub fn method(&self) -> HttpMethod {
        match self {
            Self::Get { .. } => HttpMethod::Get,
            Self::Post { .. } => HttpMethod::Post,
            Self::Put { .. } => HttpMethod::Put,
            Self::Delete { .. } => HttpMethod::Delete,
        }
    }

    /// The path and query of the request.
    pub fn resource(&self) -> &str {
        match self {
            Self::Get { resource }
            | Self::Post { resource, .. }
            | Self::Put { resource, .. }
            | Self::Delete { resource } => resource,
        }
    }

    /// The JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Post { body, .. } | Self::Put { body, .. } => body.as_ref(),
            Self::Get { .. } | Self::Delete { .. } => None,
        }
    }
}

/// Status and decoded payload of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status, [`TRANSPORT_FAILURE_STATUS`] on transport failure.
    pub status: u16,
    /// Decoded payload, or the error message on transport failure.
    pub response: Value,
}

impl HttpResponse {
    /// A response received from a server.
    pub fn new(status: u16, response: Value) -> Self {
        Self { status, response }
    }

    /// A transport failure carrying its error message.
    pub fn transport_failure(message: impl Display) -> Self {
        Self {
            status: TRANSPORT_FAILURE_STATUS,
            response: Value::String(message.to_string()),
        }
    }

    /// Whether the exchange failed before a server answered.
    pub fn is_transport_failure(&self) -> bool {
        self.status == TRANSPORT_FAILURE_STATUS
    }

    /// Whether the status is within `200..=299`.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Performs HTTP exchanges without ever failing.
///
/// Implementations map every error to [`HttpResponse::transport_failure`].
/// Only [`request`](Transport::request) is required; the verb helpers build
/// the matching [`HttpRequest`].
///
/// # Example
///
/// ```rust
/// use std::future::Future;
/// use serde_json::json;
/// use specfetch_core::{HttpRequest, HttpResponse, Transport};
///
/// struct Teapot;
///
/// impl Transport for Teapot {
///     fn request(&self, _request: HttpRequest) -> impl Future<Output = HttpResponse> + Send {
///         async { HttpResponse::new(418, json!({ "errorCode": 418, "errorDescription": "teapot" })) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Performs one exchange.
    fn request(&self, request: HttpRequest) -> impl Future<Output = HttpResponse> + Send;

    /// `GET resource`.
    fn get(&self, resource: impl Into<String>) -> impl Future<Output = HttpResponse> + Send {
        self.request(HttpRequest::Get {
            resource: resource.into(),
        })
    }

    /// `POST resource` with a body.
    fn post(
        &self,
        resource: impl Into<String>,
        body: Option<Value>,
    ) -> impl Future<Output = HttpResponse> + Send {
        self.request(HttpRequest::Post {
            resource: resource.into(),
            body,
        })
    }

    /// `PUT resource` with a body.
    fn put(
        &self,
        resource: impl Into<String>,
        body: Option<Value>,
    ) -> impl Future<Output = HttpResponse> + Send {
        self.request(HttpRequest::Put {
            resource: resource.into(),
            body,
        })
    }

    /// `DELETE resource`.
    fn delete(&self, resource: impl Into<String>) -> impl Future<Output = HttpResponse> + Send {
        self.request(HttpRequest::Delete {
            resource: resource.into(),
        })
    }
}

impl<T> Transport for Arc<T>
where
    T: Transport,
{
    fn request(&self, request: HttpRequest) -> impl Future<Output = HttpResponse> + Send {
        T::request(self, request)
    }
}
