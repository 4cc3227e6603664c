#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use serde_json::json;
use specfetch_core::{
    ApiRequestFn, ApiResponse, EndpointSpecification, GenericNotOkResponse, HttpMethod,
    HttpResponse, SchemaRegistry, StubTransport,
};
use utoipa::ToSchema;

const SEND_MESSAGE: EndpointSpecification = EndpointSpecification::new(
    "/messages/:contactId",
    HttpMethod::Post,
    "SendMessageOkResponse",
    "GenericNotOkResponse",
)
.with_params_schema("SendMessageParams")
.with_body_schema("SendMessageBody");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = SchemaRegistry::builder()
        .register::<SendMessageParams>()
        .register::<SendMessageBody>()
        .register::<SendMessageOkResponse>()
        .register::<GenericNotOkResponse>()
        .build()?;

    // Canned answers: a valid one, then a payload missing `id`
    let transport = StubTransport::new();
    transport.push_response(HttpResponse::new(201, json!({ "id": 1, "sentAt": "12:00" })));
    transport.push_response(HttpResponse::new(201, json!({ "sentAt": "12:01" })));

    let send_message = ApiRequestFn::<SendMessageRequest, SendMessageOkResponse, _>::new(
        SEND_MESSAGE,
        &registry,
        transport.clone(),
    )?;

    for message in ["Hello!", "Are you there?"] {
        let request = SendMessageRequest {
            contact_id: "bob".to_string(),
            message: message.to_string(),
        };
        match send_message.call(&request).await? {
            ApiResponse::Ok { response, .. } => println!("sent #{} at {}", response.id, response.sent_at),
            ApiResponse::NotOk {
                http_status_code,
                response,
            } => println!(
                "failed with {http_status_code}: [{}] {}",
                response.error_code, response.error_description
            ),
        }
    }

    for request in transport.requests() {
        println!("{} {}", request.method(), request.resource());
    }

    Ok(())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SendMessageParams {
    contact_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
struct SendMessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest {
    contact_id: String,
    message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct SendMessageOkResponse {
    id: u64,
    sent_at: String,
}
