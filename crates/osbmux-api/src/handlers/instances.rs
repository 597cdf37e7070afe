//! Service instance handlers (provision, update, deprovision, last operation)

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::Response;
use bytes::Bytes;
use osbmux_core::{ProvisionRequest, Suffix};

use super::InstancePath;
use crate::error::ApiError;
use crate::response::passthrough;
use crate::state::AppState;

/// PUT /{suffix}/v2/service_instances/{instance_id}
///
/// Strips the suffix from `service_id` and `plan_id` and relays the
/// re-encoded body. A body that is not a provision request is rejected
/// with 422 before anything reaches the backend.
pub async fn provision(
    State(state): State<AppState>,
    Path(path): Path<InstancePath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;

    let mut details: ProvisionRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::UnprocessableEntity(e.to_string()))?;
    details.decode_identifiers(&suffix);

    tracing::info!(
        %suffix,
        instance_id = %path.instance_id,
        service_id = %details.service_id,
        plan_id = %details.plan_id,
        "Provisioning service instance"
    );

    let backend = state
        .client()
        .provision(&path.instance_id, query, &headers, &details)
        .await?;
    Ok(passthrough(backend))
}

/// DELETE /{suffix}/v2/service_instances/{instance_id}
pub async fn deprovision(
    State(state): State<AppState>,
    Path(path): Path<InstancePath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;
    let query = state.identifier_query(query, &suffix);

    tracing::info!(%suffix, instance_id = %path.instance_id, "Deprovisioning service instance");

    let backend = state
        .client()
        .deprovision(&path.instance_id, query, &headers, body)
        .await?;
    Ok(passthrough(backend))
}

/// PATCH /{suffix}/v2/service_instances/{instance_id}
///
/// Body is relayed verbatim.
pub async fn update(
    State(state): State<AppState>,
    Path(path): Path<InstancePath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;

    tracing::info!(%suffix, instance_id = %path.instance_id, "Updating service instance");

    let backend = state
        .client()
        .update(&path.instance_id, query, &headers, body)
        .await?;
    Ok(passthrough(backend))
}

/// GET /{suffix}/v2/service_instances/{instance_id}/last_operation
pub async fn last_operation(
    State(state): State<AppState>,
    Path(path): Path<InstancePath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;

    tracing::debug!(%suffix, instance_id = %path.instance_id, "Polling last operation");

    let backend = state
        .client()
        .last_operation(&path.instance_id, query, &headers)
        .await?;
    Ok(passthrough(backend))
}
