//! Typed Open Service Broker API bodies the proxy inspects or produces

pub mod catalog;
pub mod error;
pub mod provision;

pub use catalog::{Catalog, Plan, Service};
pub use error::ErrorResponse;
pub use provision::ProvisionRequest;
