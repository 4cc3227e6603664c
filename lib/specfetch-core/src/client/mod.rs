//! Typed, schema-validated request functions.
//!
//! An [`ApiRequestFn`] binds an [`EndpointSpecification`] to a
//! [`SchemaRegistry`] and a [`Transport`]. Calling it:
//!
//! 1. serializes the request into one JSON object and splits it into
//!    parameters and body;
//! 2. validates the parameters, rejecting the call before any network
//!    activity when they do not conform;
//! 3. renders the URL and dispatches the verb;
//! 4. validates the response against the success schema (2xx) or the failure
//!    schema (anything else), synthesizing a [`GenericNotOkResponse`] with
//!    [`INVALID_PAYLOAD_ERROR_CODE`] when the payload does not conform.
//!
//! Data received from the network never makes a call fail.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::endpoint::EndpointSpecification;
use crate::schema::{SchemaError, SchemaRegistry, ValidationResult, Validator};
use crate::transport::{HttpResponse, Transport};

mod builder;
pub use self::builder::{BuiltRequest, RequestBuilder, SplitRequest};

mod error;
pub use self::error::ApiRequestError;

mod path;
mod query;

mod response;
pub use self::response::{ApiResponse, GenericNotOkResponse, INVALID_PAYLOAD_ERROR_CODE};

/// A request function for one endpoint.
///
/// - `Req`: the merged request, serializing to a JSON object holding both
///   parameter and body fields.
/// - `TOk`: the success payload, deserialized once it passed the success schema.
/// - `T`: the transport.
///
/// Failure payloads are always [`GenericNotOkResponse`].
///
/// The function is built once at startup and shared: [`call`](Self::call)
/// takes `&self` and calls are independent of each other.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
/// use specfetch_core::{
///     ApiRequestFn, ApiResponse, EndpointSpecification, GenericNotOkResponse, HttpMethod,
///     HttpResponse, SchemaRegistry, StubTransport,
/// };
/// use utoipa::ToSchema;
///
/// #[derive(Debug, Serialize, Deserialize, ToSchema)]
/// #[serde(rename_all = "camelCase")]
/// struct SendMessageParams {
///     contact_id: String,
/// }
///
/// #[derive(Debug, Serialize)]
/// #[serde(rename_all = "camelCase")]
/// struct SendMessageRequest {
///     contact_id: String,
///     message: String,
/// }
///
/// #[derive(Debug, Deserialize, ToSchema)]
/// struct SendMessageResponse {
///     id: u64,
/// }
///
/// const SEND_MESSAGE: EndpointSpecification = EndpointSpecification::new(
///     "/messages/:contactId",
///     HttpMethod::Post,
///     "SendMessageResponse",
///     "GenericNotOkResponse",
/// )
/// .with_params_schema("SendMessageParams");
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = SchemaRegistry::builder()
///     .register::<SendMessageParams>()
///     .register::<SendMessageResponse>()
///     .register::<GenericNotOkResponse>()
///     .build()?;
/// let transport = StubTransport::replying(HttpResponse::new(201, json!({ "id": 7 })));
///
/// let send_message =
///     ApiRequestFn::<SendMessageRequest, SendMessageResponse, _>::new(SEND_MESSAGE, &registry, transport)?;
///
/// let request = SendMessageRequest {
///     contact_id: "bob".to_string(),
///     message: "Hello!".to_string(),
/// };
/// match send_message.call(&request).await? {
///     ApiResponse::Ok { response, .. } => assert_eq!(response.id, 7),
///     ApiResponse::NotOk { response, .. } => panic!("unexpected failure {response:?}"),
/// }
/// # Ok(())
/// # }
/// ```
pub struct ApiRequestFn<Req, TOk, T> {
    builder: RequestBuilder,
    params_validator: Validator,
    ok_validator: Validator,
    not_ok_validator: Validator,
    transport: T,
    _marker: PhantomData<fn(&Req) -> TOk>,
}

impl<Req, TOk, T> ApiRequestFn<Req, TOk, T>
where
    Req: Serialize,
    TOk: DeserializeOwned,
    T: Transport,
{
    /// Resolves the schemas of the endpoint and binds it to a transport.
    ///
    /// Endpoints without a params schema accept any request and send every
    /// field in the body.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSchema`] if a schema name of the endpoint
    /// is not registered.
    pub fn new(
        specification: EndpointSpecification,
        registry: &SchemaRegistry,
        transport: T,
    ) -> Result<Self, SchemaError> {
        let params_validator = match specification.params_schema_name() {
            Some(name) => registry.compile(name)?,
            None => Validator::always_valid(),
        };
        let ok_validator = registry.compile(specification.ok_response_schema_name())?;
        let not_ok_validator = registry.compile(specification.not_ok_response_schema_name())?;
        let builder = RequestBuilder::from_registry(specification, registry)?;

        Ok(Self {
            builder,
            params_validator,
            ok_validator,
            not_ok_validator,
            transport,
            _marker: PhantomData,
        })
    }

    /// The endpoint this function calls.
    pub fn specification(&self) -> &EndpointSpecification {
        self.builder.specification()
    }

    /// The request builder of the endpoint.
    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// The transport the function sends requests with.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs the call.
    ///
    /// # Errors
    ///
    /// Only errors of the caller are returned: a request that does not
    /// serialize to a JSON object, or whose parameters do not match the params
    /// schema. Nothing is sent in that case. Every server or network problem
    /// is reported as [`ApiResponse::NotOk`].
    pub async fn call(&self, request: &Req) -> Result<ApiResponse<TOk>, ApiRequestError> {
        let url = self.specification().url();
        let input = match serde_json::to_value(request) {
            Ok(Value::Object(input)) => input,
            Ok(value) => return Err(ApiRequestError::RequestNotAnObject { url, value }),
            Err(error) => return Err(ApiRequestError::RequestSerialization { url, error }),
        };

        let split = self.builder.split(input);
        self.check_params(&split.params)?;

        let resource = self.builder.url(&split.params);
        let http_request = self.builder.to_http_request(resource, split.body);
        debug!(?http_request, "calling endpoint");

        let response = self.transport.request(http_request).await;

        Ok(self.classify(response))
    }

    fn check_params(&self, params: &Map<String, Value>) -> Result<(), ApiRequestError> {
        let params = Value::Object(params.clone());
        self.params_validator
            .check(Some(&params))
            .map_err(|reasons| ApiRequestError::InvalidRequestParams {
                url: self.specification().url(),
                schema: self.specification().params_schema_name(),
                params,
                reasons,
            })
    }

    fn classify(&self, response: HttpResponse) -> ApiResponse<TOk> {
        let success = response.is_success();
        let HttpResponse { status, response } = response;
        let specification = self.specification();

        if success {
            return match self.ok_validator.validate::<TOk>(Some(&response)) {
                ValidationResult::Valid(ok) => ApiResponse::Ok {
                    http_status_code: status,
                    response: ok,
                },
                ValidationResult::Invalid(reasons) => {
                    error!(
                        url = specification.url(),
                        method = %specification.method(),
                        status,
                        schema = specification.ok_response_schema_name(),
                        %response,
                        %reasons,
                        "[Client] Invalid OK payload received from server"
                    );
                    ApiResponse::NotOk {
                        http_status_code: status,
                        response: GenericNotOkResponse::invalid_payload(&reasons),
                    }
                }
            };
        }

        let not_ok = match self
            .not_ok_validator
            .validate::<GenericNotOkResponse>(Some(&response))
        {
            ValidationResult::Valid(not_ok) => not_ok,
            ValidationResult::Invalid(reasons) => {
                error!(
                    url = specification.url(),
                    method = %specification.method(),
                    status,
                    schema = specification.not_ok_response_schema_name(),
                    %response,
                    %reasons,
                    "[Client] Invalid NOT OK payload received from server"
                );
                GenericNotOkResponse::invalid_payload(&reasons)
            }
        };

        ApiResponse::NotOk {
            http_status_code: status,
            response: not_ok,
        }
    }
}

impl<Req, TOk, T> Debug for ApiRequestFn<Req, TOk, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequestFn")
            .field("specification", self.builder.specification())
            .field("params_validator", &self.params_validator)
            .field("ok_validator", &self.ok_validator)
            .field("not_ok_validator", &self.not_ok_validator)
            .finish_non_exhaustive()
    }
}
