//! HTTP request handlers for the broker API
//!
//! Each handler relays one Open Service Broker operation to the backend.
//! Path parameters are typed; the `{suffix}` segment is turned into a
//! [`Suffix`](osbmux_core::Suffix) and never forwarded.

pub mod bindings;
pub mod catalog;
pub mod instances;

use serde::Deserialize;

/// `/{suffix}/v2/...`
#[derive(Debug, Deserialize)]
pub struct SuffixPath {
    pub suffix: String,
}

/// `/{suffix}/v2/service_instances/{instance_id}`
#[derive(Debug, Deserialize)]
pub struct InstancePath {
    pub suffix: String,
    pub instance_id: String,
}

/// `/{suffix}/v2/service_instances/{instance_id}/service_bindings/{binding_id}`
#[derive(Debug, Deserialize)]
pub struct BindingPath {
    pub suffix: String,
    pub instance_id: String,
    pub binding_id: String,
}

/// Fallback for every unrouted path
pub async fn not_found() -> crate::ApiError {
    crate::ApiError::NotFound
}
