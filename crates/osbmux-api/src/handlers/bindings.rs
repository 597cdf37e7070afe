//! Service binding handlers

use axum::extract::{Path, RawQuery, State};
use axum::http::HeaderMap;
use axum::response::Response;
use bytes::Bytes;
use osbmux_core::Suffix;

use super::BindingPath;
use crate::error::ApiError;
use crate::response::passthrough;
use crate::state::AppState;

/// PUT /{suffix}/v2/service_instances/{instance_id}/service_bindings/{binding_id}
///
/// Body is relayed verbatim.
pub async fn bind(
    State(state): State<AppState>,
    Path(path): Path<BindingPath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;

    tracing::info!(
        %suffix,
        instance_id = %path.instance_id,
        binding_id = %path.binding_id,
        "Creating service binding"
    );

    let backend = state
        .client()
        .bind(&path.instance_id, &path.binding_id, query, &headers, body)
        .await?;
    Ok(passthrough(backend))
}

/// DELETE /{suffix}/v2/service_instances/{instance_id}/service_bindings/{binding_id}
pub async fn unbind(
    State(state): State<AppState>,
    Path(path): Path<BindingPath>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;
    let query = state.identifier_query(query, &suffix);

    tracing::info!(
        %suffix,
        instance_id = %path.instance_id,
        binding_id = %path.binding_id,
        "Deleting service binding"
    );

    let backend = state
        .client()
        .unbind(&path.instance_id, &path.binding_id, query, &headers, body)
        .await?;
    Ok(passthrough(backend))
}
