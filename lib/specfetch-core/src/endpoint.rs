use derive_more::Display;

/// HTTP verbs an endpoint can be declared with.
///
/// The set is closed: the request builder and the transports match on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum HttpMethod {
    /// `GET`, sent without a body.
    #[display("GET")]
    Get,
    /// `POST`, sent with the body fields of the request.
    #[display("POST")]
    Post,
    /// `PUT`, sent with the body fields of the request.
    #[display("PUT")]
    Put,
    /// `DELETE`, sent without a body.
    #[display("DELETE")]
    Delete,
}

impl HttpMethod {
    /// Whether requests with this verb carry a body.
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl From<HttpMethod> for http::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// Static description of one API operation.
///
/// A specification only holds data: the URL template, the verb and the names of
/// the schemas bound to the operation. Schema names are resolved against a
/// [`SchemaRegistry`](crate::SchemaRegistry) when an
/// [`ApiRequestFn`](crate::ApiRequestFn) is built.
///
/// # URL templates
///
/// Placeholders are written `:name` and must be followed by `/` or the end of
/// the template. Parameter fields matching a placeholder are substituted into
/// the path, the others end up in the query string.
///
/// # Example
///
/// ```rust
/// use specfetch_core::{EndpointSpecification, HttpMethod};
///
/// const GET_MESSAGES: EndpointSpecification = EndpointSpecification::new(
///     "/messages/:contactId",
///     HttpMethod::Get,
///     "GetMessagesOkResponse",
///     "NotOkResponse",
/// )
/// .with_params_schema("GetMessagesRequestParams")
/// .with_body_schema("GetMessagesRequestBody");
///
/// assert_eq!(GET_MESSAGES.params_schema_name(), Some("GetMessagesRequestParams"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointSpecification {
    url: &'static str,
    method: HttpMethod,
    params_schema_name: Option<&'static str>,
    body_schema_name: Option<&'static str>,
    ok_response_schema_name: &'static str,
    not_ok_response_schema_name: &'static str,
}

impl EndpointSpecification {
    /// Declares an endpoint without parameters: every request field is body.
    pub const fn new(
        url: &'static str,
        method: HttpMethod,
        ok_response_schema_name: &'static str,
        not_ok_response_schema_name: &'static str,
    ) -> Self {
        Self {
            url,
            method,
            params_schema_name: None,
            body_schema_name: None,
            ok_response_schema_name,
            not_ok_response_schema_name,
        }
    }

    /// Sets the schema listing which request fields are path or query parameters.
    #[must_use]
    pub const fn with_params_schema(mut self, name: &'static str) -> Self {
        self.params_schema_name = Some(name);
        self
    }

    /// Sets the schema describing the request body.
    ///
    /// The body schema is declarative: request bodies are sent as given.
    #[must_use]
    pub const fn with_body_schema(mut self, name: &'static str) -> Self {
        self.body_schema_name = Some(name);
        self
    }

    /// The URL template, e.g. `/messages/:contactId`.
    pub const fn url(&self) -> &'static str {
        self.url
    }

    /// The HTTP verb.
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// The parameters schema name, if the endpoint declares parameters.
    pub const fn params_schema_name(&self) -> Option<&'static str> {
        self.params_schema_name
    }

    /// The body schema name, if declared.
    pub const fn body_schema_name(&self) -> Option<&'static str> {
        self.body_schema_name
    }

    /// The schema a 2xx response payload must match.
    pub const fn ok_response_schema_name(&self) -> &'static str {
        self.ok_response_schema_name
    }

    /// The schema any other response payload is checked against.
    pub const fn not_ok_response_schema_name(&self) -> &'static str {
        self.not_ok_response_schema_name
    }
}
