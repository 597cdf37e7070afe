//! Application state for the broker API

use std::sync::Arc;

use osbmux_client::BrokerClient;
use osbmux_core::{decode_query_identifiers, Suffix};

/// Relay behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOptions {
    /// Strip the suffix from `plan_id`/`service_id` query parameters on
    /// deprovision and unbind
    pub strip_query_suffix: bool,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            strip_query_suffix: true,
        }
    }
}

/// Application state shared across all handlers.
///
/// Built once at startup; read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    client: Arc<BrokerClient>,
    options: RelayOptions,
}

impl AppState {
    /// Create state relaying through the given client
    pub fn new(client: BrokerClient) -> Self {
        Self::with_options(client, RelayOptions::default())
    }

    /// Create state with explicit relay options
    pub fn with_options(client: BrokerClient, options: RelayOptions) -> Self {
        Self {
            client: Arc::new(client),
            options,
        }
    }

    /// The backend broker client
    pub fn client(&self) -> &BrokerClient {
        &self.client
    }

    /// Query string to forward on deprovision/unbind
    pub fn identifier_query(&self, query: Option<String>, suffix: &Suffix) -> Option<String> {
        match query {
            Some(q) if self.options.strip_query_suffix => Some(decode_query_identifiers(&q, suffix)),
            other => other,
        }
    }
}
