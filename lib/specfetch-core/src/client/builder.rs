use indexmap::IndexSet;
use serde_json::{Map, Value};
use tracing::warn;

use super::path::PathTemplate;
use super::query::to_query_string;
use crate::endpoint::{EndpointSpecification, HttpMethod};
use crate::schema::{SchemaError, SchemaRegistry};
use crate::transport::HttpRequest;

/// The merged input of a call, split into parameters and body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SplitRequest {
    /// Fields declared by the params schema, in input order.
    pub params: Map<String, Value>,
    /// Remaining fields, `None` when there are none.
    pub body: Option<Map<String, Value>>,
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRequest {
    /// Fields declared by the params schema, in input order.
    pub params: Map<String, Value>,
    /// Remaining fields, `None` when there are none.
    pub body: Option<Map<String, Value>>,
    /// Path and query, e.g. `/messages/bob?limit=10`.
    pub url: String,
}

/// Splits merged inputs and renders URLs for one endpoint.
///
/// A field is a parameter when its name is declared by the params schema;
/// every other field belongs to the body. Parameters whose `:name` placeholder
/// appears in the URL template fill it, the others become the query string.
/// The classification is resolved once, at construction.
///
/// ```rust
/// use serde_json::json;
/// use specfetch_core::{EndpointSpecification, HttpMethod, RequestBuilder};
///
/// const SEND_MESSAGE: EndpointSpecification = EndpointSpecification::new(
///     "/messages/:contactId",
///     HttpMethod::Post,
///     "SendMessageResponse",
///     "GenericNotOkResponse",
/// )
/// .with_params_schema("SendMessageParams");
///
/// let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId", "notify"]);
/// let input = json!({ "contactId": "bob", "notify": true, "message": "Hello!" });
///
/// let request = builder.build(input.as_object().cloned().unwrap_or_default());
///
/// assert_eq!(request.url, "/messages/bob?notify=true");
/// assert_eq!(request.body, json!({ "message": "Hello!" }).as_object().cloned());
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    specification: EndpointSpecification,
    template: PathTemplate,
    param_names: IndexSet<String>,
    path_param_names: IndexSet<String>,
}

impl RequestBuilder {
    /// Creates a builder with the given parameter field names.
    pub fn new<I, S>(specification: EndpointSpecification, param_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let template = PathTemplate::new(specification.url());
        let param_names = param_names
            .into_iter()
            .map(Into::into)
            .collect::<IndexSet<_>>();
        let path_param_names = param_names
            .iter()
            .filter(|name| template.has_placeholder(name))
            .cloned()
            .collect::<IndexSet<_>>();

        for placeholder in template.placeholders() {
            if !path_param_names.contains(placeholder) {
                warn!(
                    url = %template,
                    placeholder,
                    params_schema = specification.params_schema_name(),
                    "no parameter can fill this placeholder, it stays as is"
                );
            }
        }

        Self {
            specification,
            template,
            param_names,
            path_param_names,
        }
    }

    /// Creates a builder whose parameter fields are the properties of the
    /// params schema, if the endpoint declares one.
    ///
    /// # Errors
    ///
    /// Fails if the params schema is not registered.
    pub fn from_registry(
        specification: EndpointSpecification,
        registry: &SchemaRegistry,
    ) -> Result<Self, SchemaError> {
        let param_names = match specification.params_schema_name() {
            Some(name) => registry.property_names(name)?,
            None => IndexSet::new(),
        };

        Ok(Self::new(specification, param_names))
    }

    /// The endpoint this builder renders.
    pub fn specification(&self) -> &EndpointSpecification {
        &self.specification
    }

    /// The parameter field names, in schema order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.param_names.iter().map(String::as_str)
    }

    /// Whether `name` is a parameter filling a path placeholder.
    pub fn is_path_param(&self, name: &str) -> bool {
        self.path_param_names.contains(name)
    }

    /// Splits the merged input into parameters and body.
    ///
    /// `null` fields are absent values: they are dropped from both sides, so
    /// they are neither validated, rendered nor sent.
    pub fn split(&self, input: Map<String, Value>) -> SplitRequest {
        let (params, body): (Map<_, _>, Map<_, _>) = input
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .partition(|(name, _)| self.param_names.contains(name));
        let body = (!body.is_empty()).then_some(body);

        SplitRequest { params, body }
    }

    /// Renders the path and query string for the given parameters.
    ///
    /// Fields that are not parameters are ignored.
    pub fn url(&self, params: &Map<String, Value>) -> String {
        let path = self.template.render(
            params
                .iter()
                .filter(|(name, _)| self.is_path_param(name))
                .map(|(name, value)| (name.as_str(), value)),
        );
        let query = to_query_string(
            params
                .iter()
                .filter(|(name, _)| self.param_names.contains(*name) && !self.is_path_param(name))
                .map(|(name, value)| (name.as_str(), value)),
        );

        format!("{path}{query}")
    }

    /// Splits the merged input and renders its URL.
    pub fn build(&self, input: Map<String, Value>) -> BuiltRequest {
        let SplitRequest { params, body } = self.split(input);
        let url = self.url(&params);

        BuiltRequest { params, body, url }
    }

    /// The transport request for a rendered URL and body.
    ///
    /// `GET` and `DELETE` never carry a body.
    pub fn to_http_request(&self, url: String, body: Option<Map<String, Value>>) -> HttpRequest {
        let method = self.specification.method();
        let body = body.filter(|_| method.has_body()).map(Value::Object);
        match method {
            HttpMethod::Get => HttpRequest::Get { resource: url },
            HttpMethod::Post => HttpRequest::Post {
                resource: url,
                body,
            },
            HttpMethod::Put => HttpRequest::Put {
                resource: url,
                body,
            },
            HttpMethod::Delete => HttpRequest::Delete { resource: url },
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    const GET_MESSAGES: EndpointSpecification = EndpointSpecification::new(
        "/messages/:contactId",
        HttpMethod::Get,
        "GetMessagesResponse",
        "GenericNotOkResponse",
    )
    .with_params_schema("GetMessagesParams");

    const SEARCH: EndpointSpecification = EndpointSpecification::new(
        "/search",
        HttpMethod::Get,
        "SearchResponse",
        "GenericNotOkResponse",
    )
    .with_params_schema("SearchParams");

    const SEND_MESSAGE: EndpointSpecification = EndpointSpecification::new(
        "/messages/:contactId",
        HttpMethod::Post,
        "SendMessageResponse",
        "GenericNotOkResponse",
    )
    .with_params_schema("SendMessageParams")
    .with_body_schema("SendMessageBody");

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn should_split_params_from_body() {
        let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId"]);
        let input = object(json!({ "contactId": "bob", "message": "Hello!", "urgent": true }));

        let split = builder.split(input.clone());

        assert_eq!(split.params, object(json!({ "contactId": "bob" })));
        assert_eq!(
            split.body,
            Some(object(json!({ "message": "Hello!", "urgent": true })))
        );

        // partition: every field lands in exactly one side
        let body = split.body.unwrap_or_default();
        assert_eq!(split.params.len() + body.len(), input.len());
        assert!(split.params.keys().all(|name| !body.contains_key(name)));
    }

    #[test]
    fn should_not_create_empty_body() {
        let builder = RequestBuilder::new(GET_MESSAGES, ["contactId"]);

        let split = builder.split(object(json!({ "contactId": "bob" })));

        assert_eq!(split.body, None);
    }

    #[test]
    fn should_drop_null_fields_from_params_and_body() {
        let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId", "notify"]);

        let split = builder.split(object(json!({
            "contactId": "bob",
            "notify": null,
            "message": "Hello!",
            "replyTo": null,
        })));

        assert_eq!(split.params, object(json!({ "contactId": "bob" })));
        assert_eq!(split.body, Some(object(json!({ "message": "Hello!" }))));
    }

    #[test]
    fn should_not_create_body_from_null_fields() {
        let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId"]);

        let split = builder.split(object(json!({ "contactId": "bob", "replyTo": null })));

        assert_eq!(split.body, None);
    }

    #[test]
    fn should_put_everything_in_body_without_params() {
        let endpoint = EndpointSpecification::new(
            "/contacts",
            HttpMethod::Post,
            "Contact",
            "GenericNotOkResponse",
        );
        let builder = RequestBuilder::new(endpoint, Vec::<String>::new());

        let request = builder.build(object(json!({ "name": "Bob" })));

        assert!(request.params.is_empty());
        assert_eq!(request.body, Some(object(json!({ "name": "Bob" }))));
        assert_eq!(request.url, "/contacts");
    }

    #[rstest]
    #[case::path_encoded(GET_MESSAGES, json!({ "contactId": "a b" }), "/messages/a%20b")]
    #[case::path_and_query(GET_MESSAGES, json!({ "contactId": "bob", "limit": 10 }), "/messages/bob?limit=10")]
    #[case::null_query_dropped(SEARCH, json!({ "q": "x", "page": null }), "/search?q=x")]
    #[case::no_query(SEARCH, json!({ "page": null }), "/search")]
    #[case::query_encoded(SEARCH, json!({ "q": "rust & co" }), "/search?q=rust%20%26%20co")]
    #[case::null_path_value_is_absent(GET_MESSAGES, json!({ "contactId": null }), "/messages/:contactId")]
    fn should_render_url(
        #[case] endpoint: EndpointSpecification,
        #[case] input: Value,
        #[case] expected: &str,
    ) {
        let builder = RequestBuilder::new(endpoint, ["contactId", "limit", "q", "page"]);

        let request = builder.build(object(input));

        assert_eq!(request.url, expected);
    }

    #[test]
    fn should_not_duplicate_path_param_in_query() {
        let builder = RequestBuilder::new(GET_MESSAGES, ["contactId", "limit"]);

        let request = builder.build(object(json!({ "limit": 5, "contactId": "bob" })));

        insta::assert_snapshot!(request.url, @"/messages/bob?limit=5");
        assert!(builder.is_path_param("contactId"));
        assert!(!builder.is_path_param("limit"));
    }

    #[test]
    fn should_ignore_body_fields_when_rendering_url() {
        let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId"]);

        let url = builder.url(&object(json!({ "contactId": "bob", "message": "Hello!" })));

        assert_eq!(url, "/messages/bob");
    }

    #[test]
    fn should_keep_unfillable_placeholder() {
        let builder = RequestBuilder::new(GET_MESSAGES, ["limit"]);

        let request = builder.build(object(json!({ "limit": 1 })));

        assert_eq!(request.url, "/messages/:contactId?limit=1");
    }

    #[test]
    fn should_be_idempotent() {
        let builder = RequestBuilder::new(SEND_MESSAGE, ["contactId", "notify"]);
        let input = object(json!({
            "notify": [1, 2],
            "contactId": "b/o b",
            "message": "Hello!",
        }));

        let first = builder.build(input.clone());
        let second = builder.build(input);

        assert_eq!(first, second);
        insta::assert_snapshot!(first.url, @"/messages/b%2Fo%20b?notify=1%2C2");
    }

    #[test]
    fn should_drop_body_for_get_and_delete() {
        let body = Some(object(json!({ "x": 1 })));

        let get = RequestBuilder::new(GET_MESSAGES, ["contactId"]);
        assert_eq!(
            get.to_http_request("/messages/bob".to_string(), body.clone()),
            HttpRequest::Get {
                resource: "/messages/bob".to_string()
            }
        );

        let delete = EndpointSpecification::new(
            "/messages/:contactId",
            HttpMethod::Delete,
            "Empty",
            "GenericNotOkResponse",
        );
        let delete = RequestBuilder::new(delete, ["contactId"]);
        assert_eq!(
            delete.to_http_request("/messages/bob".to_string(), body),
            HttpRequest::Delete {
                resource: "/messages/bob".to_string()
            }
        );
    }

    #[test]
    fn should_keep_body_for_post_and_put() {
        let post = RequestBuilder::new(SEND_MESSAGE, ["contactId"]);
        assert_eq!(
            post.to_http_request("/messages/bob".to_string(), None),
            HttpRequest::Post {
                resource: "/messages/bob".to_string(),
                body: None,
            }
        );

        let put = EndpointSpecification::new(
            "/contacts/:id",
            HttpMethod::Put,
            "Contact",
            "GenericNotOkResponse",
        );
        let put = RequestBuilder::new(put, ["id"]);
        assert_eq!(
            put.to_http_request("/contacts/1".to_string(), Some(object(json!({ "name": "Bob" })))),
            HttpRequest::Put {
                resource: "/contacts/1".to_string(),
                body: Some(json!({ "name": "Bob" })),
            }
        );
    }

    #[test]
    fn should_resolve_param_names_from_registry() {
        let registry = SchemaRegistry::builder()
            .register_json(
                "GetMessagesParams",
                json!({
                    "type": "object",
                    "properties": {
                        "contactId": { "type": "string" },
                        "limit": { "type": "integer" }
                    },
                    "required": ["contactId"]
                }),
            )
            .build()
            .expect("valid registry");

        let builder = RequestBuilder::from_registry(GET_MESSAGES, &registry).expect("known schema");

        assert_eq!(builder.param_names().collect::<Vec<_>>(), ["contactId", "limit"]);
        assert_eq!(builder.specification(), &GET_MESSAGES);
    }

    #[test]
    fn should_fail_with_unknown_params_schema() {
        let registry = SchemaRegistry::default();

        let result = RequestBuilder::from_registry(GET_MESSAGES, &registry);

        assert!(matches!(result, Err(SchemaError::UnknownSchema { .. })));
    }
}
