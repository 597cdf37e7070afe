//! Response emission
//!
//! Bodies produced by the proxy are JSON. Bodies coming back from the
//! backend are emitted exactly as received, with the backend's status and
//! content type.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::response::Response;
use osbmux_client::BackendResponse;

/// Relay a backend response to the caller unchanged
pub fn passthrough(backend: BackendResponse) -> Response {
    let mut response = Response::new(Body::from(backend.body));
    *response.status_mut() = backend.status;
    if let Some(content_type) = backend.content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::{HeaderValue, StatusCode};
    use bytes::Bytes;

    #[tokio::test]
    async fn passthrough_keeps_status_type_and_bytes() {
        let raw = br#"{ "operation" :"task-1" }"#;
        let response = passthrough(BackendResponse {
            status: StatusCode::ACCEPTED,
            content_type: Some(HeaderValue::from_static("application/json;charset=utf-8")),
            body: Bytes::from_static(raw),
        });

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "application/json;charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], &raw[..]);
    }

    #[tokio::test]
    async fn passthrough_without_content_type() {
        let response = passthrough(BackendResponse {
            status: StatusCode::GONE,
            content_type: None,
            body: Bytes::from_static(b"{}"),
        });
        assert_eq!(response.status(), StatusCode::GONE);
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }
}
