//! API error types and conversions

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use osbmux_client::BrokerClientError;
use osbmux_core::{ErrorResponse, SuffixError};

/// Hint returned for any path that does not carry a registration suffix
pub const NOT_FOUND_HINT: &str = "Please provide a suffix in url";

/// Description used when the backend rejects the catalog request
pub const NOT_AUTHORIZED: &str = "Not authorized";

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found, plain-text hint
    NotFound,
    /// 401 Unauthorized, fixed description
    Unauthorized,
    /// 422 Unprocessable Entity (inbound body did not decode)
    UnprocessableEntity(String),
    /// 500 Internal Server Error (transport failure, bad backend body)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, description) = match self {
            ApiError::NotFound => {
                tracing::debug!("Request without suffix segment");
                return (StatusCode::NOT_FOUND, NOT_FOUND_HINT).into_response();
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, NOT_AUTHORIZED.to_string()),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %description, "API error");
        } else {
            tracing::debug!(status = status.as_u16(), %description, "API client error");
        }

        (status, Json(ErrorResponse::new(description))).into_response()
    }
}

impl From<BrokerClientError> for ApiError {
    fn from(err: BrokerClientError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<SuffixError> for ApiError {
    fn from(_: SuffixError) -> Self {
        ApiError::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_has_fixed_description() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_json(response).await, json!({ "description": "Not authorized" }));
    }

    #[tokio::test]
    async fn unprocessable_carries_description() {
        let response = ApiError::UnprocessableEntity("missing field `plan_id`".into()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({ "description": "missing field `plan_id`" })
        );
    }

    #[tokio::test]
    async fn transport_error_maps_to_500() {
        let err: ApiError = BrokerClientError::ConnectionFailed("refused".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["description"].as_str().unwrap().contains("refused"));
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn not_found_is_plain_text() {
        let response = ApiError::from(SuffixError::Empty).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], NOT_FOUND_HINT.as_bytes());
    }
}
