use std::collections::VecDeque;
use std::future::{self, Future};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{HttpRequest, HttpResponse, Transport};

/// In-memory [`Transport`] replaying canned responses.
///
/// Responses pushed with [`push_response`](Self::push_response) are served in
/// order; once they are exhausted the default response is used, and without
/// one the request ends as a transport failure. Every request is recorded, so
/// tests can assert what was (or was not) sent.
///
/// Clones share the same queue and records.
///
/// ```rust
/// use serde_json::json;
/// use specfetch_core::{HttpResponse, StubTransport, Transport};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = StubTransport::replying(HttpResponse::new(200, json!({ "ok": true })));
///
/// let response = transport.get("/health").await;
///
/// assert_eq!(response.status, 200);
/// assert_eq!(transport.request_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
}

#[derive(Debug, Default)]
struct StubState {
    queued: VecDeque<HttpResponse>,
    default_response: Option<HttpResponse>,
    requests: Vec<HttpRequest>,
}

impl StubTransport {
    /// A stub without any response: requests end as transport failures.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub answering every request with `response`.
    pub fn replying(response: HttpResponse) -> Self {
        let stub = Self::default();
        stub.state().default_response = Some(response);
        stub
    }

    /// Queues a response for the next unanswered request.
    pub fn push_response(&self, response: HttpResponse) {
        self.state().queued.push_back(response);
    }

    /// The requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    /// How many requests were received.
    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Transport for StubTransport {
    fn request(&self, request: HttpRequest) -> impl Future<Output = HttpResponse> + Send {
        let mut state = self.state();
        state.requests.push(request);
        let response = state
            .queued
            .pop_front()
            .or_else(|| state.default_response.clone())
            .unwrap_or_else(|| HttpResponse::transport_failure("no stub response available"));

        future::ready(response)
    }
}
