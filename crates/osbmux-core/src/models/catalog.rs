//! Catalog models
//!
//! Only the fields the proxy rewrites are typed. Everything else a backend
//! advertises (descriptions, metadata, dashboard clients, maintenance info,
//! schemas...) is kept in `extra` and serialized back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::suffix::Suffix;

/// `GET /v2/catalog` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub services: Vec<Service>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A service offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub plans: Vec<Plan>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plan of a service offering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Catalog {
    /// Append the suffix to every service id, service name and plan id
    pub fn encode_identifiers(&mut self, suffix: &Suffix) {
        for service in &mut self.services {
            suffix.encode_in_place(&mut service.id);
            suffix.encode_in_place(&mut service.name);
            for plan in &mut service.plans {
                suffix.encode_in_place(&mut plan.id);
            }
        }
    }

    /// Total number of plans across all services
    pub fn plan_count(&self) -> usize {
        self.services.iter().map(|s| s.plans.len()).sum()
    }
}
