//! Integration test support for the Open Service Broker multiplexer
//!
//! Provides a mock backend broker that records every request it receives
//! and answers with canned replies, plus a helper that starts the proxy in
//! front of it. Both run on ephemeral local ports.
//!
//! # Test Structure
//!
//! - `relay_e2e_test.rs` - every broker operation through the proxy
//! - `catalog_e2e_test.rs` - catalog rewriting and catalog error paths

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::Response;
use axum::Router;
use bytes::Bytes;
use osbmux_api::{create_router, AppState, RelayOptions};
use osbmux_client::testing::TestServer;
use osbmux_client::BrokerClient;
use osbmux_core::BackendBroker;
use parking_lot::Mutex;

/// A request as seen by the mock backend broker
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Body decoded as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Canned backend reply
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<&'static str>,
    pub body: Bytes,
}

impl Reply {
    /// JSON reply with the given status
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json"),
            body: Bytes::from(body.to_string()),
        }
    }

    /// Reply with raw bytes, as-is
    pub fn raw(status: StatusCode, content_type: Option<&'static str>, body: &'static [u8]) -> Self {
        Self {
            status,
            content_type,
            body: Bytes::from_static(body),
        }
    }
}

#[derive(Default)]
struct MockState {
    requests: Vec<RecordedRequest>,
    replies: HashMap<(Method, String), Reply>,
}

/// Mock backend broker
#[derive(Clone, Default)]
pub struct MockBroker {
    inner: Arc<Mutex<MockState>>,
}

impl MockBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `reply`. Unconfigured routes answer
    /// `200 {}`.
    pub fn reply(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.inner
            .lock()
            .replies
            .insert((method, path.to_string()), reply);
        self
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().requests.clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.inner.lock().requests.last().cloned()
    }

    /// Router serving this mock
    pub fn router(&self) -> Router {
        Router::new().fallback(record).with_state(self.clone())
    }
}

async fn record(
    State(mock): State<MockBroker>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let reply = {
        let mut state = mock.inner.lock();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            query: uri.query().map(str::to_string),
            headers,
            body,
        });
        state
            .replies
            .get(&(method, path))
            .cloned()
            .unwrap_or_else(|| Reply::json(StatusCode::OK, serde_json::json!({})))
    };

    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() = reply.status;
    if let Some(content_type) = reply.content_type {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    response
}

/// A mock backend with the proxy running in front of it
pub struct Harness {
    pub broker: MockBroker,
    pub backend: TestServer,
    pub proxy: TestServer,
}

impl Harness {
    /// Start a mock backend and a proxy with default relay options
    pub async fn start() -> Self {
        Self::start_with(RelayOptions::default(), "").await
    }

    /// Start a mock backend and a proxy whose backend URL carries
    /// `base_path` after the authority
    pub async fn start_with(options: RelayOptions, base_path: &str) -> Self {
        let broker = MockBroker::new();
        let backend = TestServer::start(broker.router())
            .await
            .expect("Failed to start mock backend broker");

        let url = format!("{}{}", backend.base_url(), base_path);
        let proxy = start_proxy(&url, options).await;

        Self {
            broker,
            backend,
            proxy,
        }
    }

    /// Absolute proxy URL for `path`
    pub fn url(&self, path: &str) -> String {
        self.proxy.url(path)
    }

    /// HTTP client for talking to the proxy
    pub fn client(&self) -> &reqwest::Client {
        &self.proxy.client
    }
}

/// Start the proxy relaying to `backend_url`
pub async fn start_proxy(backend_url: &str, options: RelayOptions) -> TestServer {
    let backend = BackendBroker::parse(backend_url).expect("Invalid backend URL");
    let client = BrokerClient::new(backend).expect("Failed to build broker client");
    let router = create_router(AppState::with_options(client, options));

    TestServer::start(router)
        .await
        .expect("Failed to start proxy")
}
