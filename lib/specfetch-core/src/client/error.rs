use serde_json::Value;

use crate::schema::ValidationReasons;

/// Errors caused by the calling code, raised before any network activity.
///
/// Server and network problems are never reported here: they come back as
/// [`ApiResponse::NotOk`](crate::ApiResponse::NotOk). An `ApiRequestError`
/// means the request itself is wrong and the call site needs fixing.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ApiRequestError {
    /// The parameter fields of the request do not match the params schema.
    #[display(
        "[Client] Invalid request params received from caller ({params}) for {url} using schema {}: {reasons}",
        schema.unwrap_or("<none>")
    )]
    InvalidRequestParams {
        /// The URL template of the endpoint.
        url: &'static str,
        /// The params schema name.
        schema: Option<&'static str>,
        /// The parameter fields extracted from the request.
        params: Value,
        /// Why the parameters were rejected.
        reasons: ValidationReasons,
    },

    /// The request did not serialize to a JSON object.
    #[display("[Client] Request for {url} must serialize to a JSON object, got {value}")]
    RequestNotAnObject {
        /// The URL template of the endpoint.
        url: &'static str,
        /// What the request serialized to.
        value: Value,
    },

    /// The request could not be serialized.
    #[display("[Client] Failed to serialize request for {url}: {error}")]
    RequestSerialization {
        /// The URL template of the endpoint.
        url: &'static str,
        /// The underlying serialization error.
        error: serde_json::Error,
    },
}
