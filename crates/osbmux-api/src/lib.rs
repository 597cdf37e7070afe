//! osbmux-api - Open Service Broker multiplexing REST layer
//!
//! Exposes one backend broker under any number of virtual registrations.
//! Every route starts with a `{suffix}` segment; catalog identifiers are
//! suffixed on the way out and provision identifiers are stripped on the way
//! in. Everything else is relayed to the backend as-is.
//!
//! # Usage
//!
//! ```ignore
//! use osbmux_api::{create_router, AppState};
//! use osbmux_client::BrokerClient;
//! use osbmux_core::BackendBroker;
//!
//! let client = BrokerClient::new(BackendBroker::from_env()?)?;
//! let router = create_router(AppState::new(client));
//! ```

pub mod error;
pub mod handlers;
pub mod response;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, RelayOptions};

use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Create the broker API router with the given application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Catalog
        .route("/{suffix}/v2/catalog", get(handlers::catalog::get_catalog))
        // Service instances
        .route(
            "/{suffix}/v2/service_instances/{instance_id}",
            put(handlers::instances::provision)
                .delete(handlers::instances::deprovision)
                .patch(handlers::instances::update),
        )
        .route(
            "/{suffix}/v2/service_instances/{instance_id}/last_operation",
            get(handlers::instances::last_operation),
        )
        // Service bindings
        .route(
            "/{suffix}/v2/service_instances/{instance_id}/service_bindings/{binding_id}",
            put(handlers::bindings::bind).delete(handlers::bindings::unbind),
        )
        .fallback(handlers::not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
