//! Catalog handler

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use osbmux_core::{Catalog, Suffix};

use super::SuffixPath;
use crate::error::ApiError;
use crate::response::passthrough;
use crate::state::AppState;

/// GET /{suffix}/v2/catalog
///
/// Fetches the backend catalog and appends the suffix to every service id,
/// service name and plan id. A 401 from the backend becomes a fixed
/// "Not authorized" body; other non-2xx answers are relayed unchanged.
pub async fn get_catalog(
    State(state): State<AppState>,
    Path(path): Path<SuffixPath>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let suffix = Suffix::from_segment(&path.suffix)?;

    let backend = state.client().catalog(&headers).await?;

    if backend.status == StatusCode::UNAUTHORIZED {
        tracing::warn!(%suffix, "Backend broker rejected catalog credentials");
        return Err(ApiError::Unauthorized);
    }
    if !backend.is_success() {
        tracing::debug!(%suffix, status = backend.status.as_u16(), "Relaying catalog failure");
        return Ok(passthrough(backend));
    }

    let mut catalog: Catalog = backend.json()?;
    catalog.encode_identifiers(&suffix);

    tracing::info!(
        %suffix,
        services = catalog.services.len(),
        plans = catalog.plan_count(),
        "Served catalog"
    );

    Ok((StatusCode::OK, Json(catalog)).into_response())
}
