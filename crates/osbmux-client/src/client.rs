//! Backend broker HTTP client implementation

use std::time::Duration;

use bytes::Bytes;
use osbmux_core::{BackendBroker, ProvisionRequest};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{BrokerClientError, Result};
use crate::headers::forwardable_headers;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const API_VERSION: &str = "v2";
const SERVICE_INSTANCES: &str = "service_instances";
const SERVICE_BINDINGS: &str = "service_bindings";

/// One outbound call to the backend broker
#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub method: Method,
    /// Path segments relative to the backend base URL
    pub segments: Vec<String>,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl RelayRequest {
    /// Create a request with no query, headers or body
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: None,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Forward the platform's query string
    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    /// Forward the platform's headers, minus connection-scoped ones
    pub fn with_headers(mut self, inbound: &HeaderMap) -> Self {
        self.headers = forwardable_headers(inbound);
        self
    }

    /// Attach a body. Empty bodies are not sent.
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    /// Backend-relative path, for logging
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// What the backend answered: status, content type and raw body bytes
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl BackendResponse {
    /// Whether the backend returned a 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| BrokerClientError::ParseError(e.to_string()))
    }
}

/// Client for the backend broker
///
/// Holds a pooled reqwest client and the resolved backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BrokerClient {
    client: Client,
    backend: BackendBroker,
}

impl BrokerClient {
    /// Create a client with the default timeouts
    pub fn new(backend: BackendBroker) -> Result<Self> {
        Self::with_config(backend, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with explicit request and connect timeouts
    pub fn with_config(
        backend: BackendBroker,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        Ok(Self { client, backend })
    }

    // =========================================================================
    // Relay
    // =========================================================================

    /// Execute one request against the backend and collect its response.
    ///
    /// Any non-transport outcome, including 4xx/5xx from the backend, is
    /// returned as `Ok`.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path()))]
    pub async fn relay(&self, request: RelayRequest) -> Result<BackendResponse> {
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let url = self.backend.endpoint(&segments, request.query.as_deref());
        debug!(%url, "Relaying to backend broker");

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(BrokerClientError::from_transport)?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(BrokerClientError::from_transport)?;

        debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");

        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }

    // =========================================================================
    // Broker operations
    // =========================================================================

    /// `GET /v2/catalog`
    pub async fn catalog(&self, headers: &HeaderMap) -> Result<BackendResponse> {
        let request = RelayRequest::new(Method::GET, [API_VERSION, "catalog"]).with_headers(headers);
        self.relay(request).await
    }

    /// `PUT /v2/service_instances/{instance_id}` with a re-encoded body
    pub async fn provision(
        &self,
        instance_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
        details: &ProvisionRequest,
    ) -> Result<BackendResponse> {
        let body =
            serde_json::to_vec(details).map_err(|e| BrokerClientError::EncodeError(e.to_string()))?;

        let mut request = RelayRequest::new(Method::PUT, instance_path(instance_id))
            .with_query(query)
            .with_headers(headers)
            .with_body(Bytes::from(body));
        if !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        self.relay(request).await
    }

    /// `DELETE /v2/service_instances/{instance_id}`
    pub async fn deprovision(
        &self,
        instance_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<BackendResponse> {
        let request = RelayRequest::new(Method::DELETE, instance_path(instance_id))
            .with_query(query)
            .with_headers(headers)
            .with_body(body);
        self.relay(request).await
    }

    /// `PATCH /v2/service_instances/{instance_id}`
    pub async fn update(
        &self,
        instance_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<BackendResponse> {
        let request = RelayRequest::new(Method::PATCH, instance_path(instance_id))
            .with_query(query)
            .with_headers(headers)
            .with_body(body);
        self.relay(request).await
    }

    /// `GET /v2/service_instances/{instance_id}/last_operation`
    pub async fn last_operation(
        &self,
        instance_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
    ) -> Result<BackendResponse> {
        let mut segments = instance_path(instance_id);
        segments.push("last_operation".to_string());

        let request = RelayRequest::new(Method::GET, segments)
            .with_query(query)
            .with_headers(headers);
        self.relay(request).await
    }

    /// `PUT /v2/service_instances/{instance_id}/service_bindings/{binding_id}`
    pub async fn bind(
        &self,
        instance_id: &str,
        binding_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<BackendResponse> {
        let request = RelayRequest::new(Method::PUT, binding_path(instance_id, binding_id))
            .with_query(query)
            .with_headers(headers)
            .with_body(body);
        self.relay(request).await
    }

    /// `DELETE /v2/service_instances/{instance_id}/service_bindings/{binding_id}`
    pub async fn unbind(
        &self,
        instance_id: &str,
        binding_id: &str,
        query: Option<String>,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<BackendResponse> {
        let request = RelayRequest::new(Method::DELETE, binding_path(instance_id, binding_id))
            .with_query(query)
            .with_headers(headers)
            .with_body(body);
        self.relay(request).await
    }
}

fn instance_path(instance_id: &str) -> Vec<String> {
    vec![
        API_VERSION.to_string(),
        SERVICE_INSTANCES.to_string(),
        instance_id.to_string(),
    ]
}

fn binding_path(instance_id: &str, binding_id: &str) -> Vec<String> {
    let mut segments = instance_path(instance_id);
    segments.push(SERVICE_BINDINGS.to_string());
    segments.push(binding_id.to_string());
    segments
}
