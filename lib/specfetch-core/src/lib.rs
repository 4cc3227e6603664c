//! # Specfetch Core
//!
//! Turn declarative endpoint specifications into typed, schema-validated
//! request functions.
//!
//! An endpoint is plain data: a URL template with `:name` placeholders, an HTTP
//! verb and the names of its schemas. From it and a [`SchemaRegistry`], an
//! [`ApiRequestFn`] is built once and called many times:
//!
//! - the request is one merged object; fields declared by the params schema
//!   fill the path placeholders or the query string, the others form the body;
//! - the parameters are validated before anything is sent;
//! - the response is validated against the success or failure schema, and
//!   always comes back as an [`ApiResponse`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use specfetch_core::{
//!     ApiRequestFn, ApiResponse, EndpointSpecification, GenericNotOkResponse, HttpMethod,
//!     ReqwestTransport, SchemaRegistry,
//! };
//! use utoipa::ToSchema;
//!
//! #[derive(Serialize, Deserialize, ToSchema)]
//! #[serde(rename_all = "camelCase")]
//! struct GetMessagesParams {
//!     contact_id: String,
//!     limit: Option<u32>,
//! }
//!
//! #[derive(Debug, Deserialize, ToSchema)]
//! struct Message {
//!     text: String,
//! }
//!
//! #[derive(Debug, Deserialize, ToSchema)]
//! struct GetMessagesResponse {
//!     messages: Vec<Message>,
//! }
//!
//! const GET_MESSAGES: EndpointSpecification = EndpointSpecification::new(
//!     "/messages/:contactId",
//!     HttpMethod::Get,
//!     "GetMessagesResponse",
//!     "GenericNotOkResponse",
//! )
//! .with_params_schema("GetMessagesParams");
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SchemaRegistry::builder()
//!     .register::<GetMessagesParams>()
//!     .register::<GetMessagesResponse>()
//!     .register::<GenericNotOkResponse>()
//!     .build()?;
//! let transport = ReqwestTransport::builder().with_host("chat.example.com").build()?;
//!
//! let get_messages = ApiRequestFn::<GetMessagesParams, GetMessagesResponse, _>::new(
//!     GET_MESSAGES,
//!     &registry,
//!     transport,
//! )?;
//!
//! // GET http://chat.example.com:8080/api/messages/bob?limit=20
//! let params = GetMessagesParams {
//!     contact_id: "bob".to_string(),
//!     limit: Some(20),
//! };
//! match get_messages.call(&params).await? {
//!     ApiResponse::Ok { response, .. } => println!("{} messages", response.messages.len()),
//!     ApiResponse::NotOk { http_status_code, response } => {
//!         eprintln!("{http_status_code}: {}", response.error_description);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Calls only fail for problems of the caller:
//! - [`ApiRequestError`] - the request is not an object, or its parameters do
//!   not match the params schema. Nothing is sent.
//!
//! Server and network problems are values, not errors:
//! - a non-2xx status gives [`ApiResponse::NotOk`] with the server payload;
//! - a payload that does not match its schema gives [`ApiResponse::NotOk`]
//!   with a [`GenericNotOkResponse`] whose code is [`INVALID_PAYLOAD_ERROR_CODE`];
//! - a transport failure (refused connection, undecodable body, ...) has the
//!   status [`TRANSPORT_FAILURE_STATUS`].
//!
//! Misconfiguration fails at startup with [`SchemaError`] or
//! [`TransportBuildError`].
//!
//! ## Testing
//!
//! [`StubTransport`] replays canned responses and records the requests it
//! receives, so request functions can be tested without a server.

mod client;
mod endpoint;
mod schema;
mod transport;

pub use self::client::{
    ApiRequestError, ApiRequestFn, ApiResponse, BuiltRequest, GenericNotOkResponse,
    INVALID_PAYLOAD_ERROR_CODE, RequestBuilder, SplitRequest,
};
pub use self::endpoint::{EndpointSpecification, HttpMethod};
pub use self::schema::{
    SchemaError, SchemaRegistry, SchemaRegistryBuilder, UNDEFINED_REASON, ValidationReasons,
    ValidationResult, Validator,
};
pub use self::transport::{
    HttpRequest, HttpResponse, ReqwestTransport, ReqwestTransportBuilder, ResponseType,
    StubTransport, TRANSPORT_FAILURE_STATUS, Transport, TransportBuildError,
};
