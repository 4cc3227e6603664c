use std::future::Future;

use reqwest::{Method, Response};
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use super::{HttpRequest, HttpResponse, ReqwestTransportBuilder, ResponseType, Transport};

/// [`Transport`] backed by a [`reqwest::Client`].
///
/// Resources are appended to the base URL. Bodies are sent as JSON with a
/// `Content-Type: application/json` header, and every failure is logged and
/// turned into [`HttpResponse::transport_failure`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    pub(super) client: reqwest::Client,
    pub(super) base_url: Url,
    pub(super) response_type: ResponseType,
}

impl ReqwestTransport {
    /// Starts a builder with the default configuration.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// The URL every resource is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// How response bodies are decoded.
    pub fn response_type(&self) -> ResponseType {
        self.response_type
    }

    fn build_url(&self, resource: &str) -> Result<Url, url::ParseError> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            resource.trim_start_matches('/')
        );
        url.parse::<Url>()
    }

    async fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let url = self
            .build_url(request.resource())
            .map_err(|err| format!("invalid URL for '{}': {err}", request.resource()))?;

        let method = Method::from(request.method());
        let mut builder = self.client.request(method, url);
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        debug!(?request, "sending...");
        let response = builder.send().await.map_err(|err| err.to_string())?;
        debug!(?response, "...receiving");

        let status = response.status().as_u16();
        let payload = self.decode(response).await?;

        Ok(HttpResponse::new(status, payload))
    }

    async fn decode(&self, response: Response) -> Result<Value, String> {
        match self.response_type {
            ResponseType::Text => {
                let text = response.text().await.map_err(|err| err.to_string())?;
                Ok(Value::String(text))
            }
            ResponseType::Json => {
                let bytes = response.bytes().await.map_err(|err| err.to_string())?;
                serde_json::from_slice(&bytes).map_err(|err| err.to_string())
            }
        }
    }
}

impl Transport for ReqwestTransport {
    fn request(&self, request: HttpRequest) -> impl Future<Output = HttpResponse> + Send {
        async move {
            match self.exchange(&request).await {
                Ok(response) => response,
                Err(message) => {
                    error!(base_url = %self.base_url, ?request, %message, "HTTP request failed");
                    HttpResponse::transport_failure(message)
                }
            }
        }
    }
}
