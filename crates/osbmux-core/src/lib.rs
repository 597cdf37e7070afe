//! osbmux-core - Core types for the Open Service Broker multiplexing proxy
//!
//! This crate holds the pieces of the proxy that do not touch the network:
//! the identifier suffix codec, the backend broker resolver, and the typed
//! broker API bodies that the relay rewrites.

pub mod backend;
pub mod error;
pub mod models;
pub mod suffix;

pub use backend::{BackendBroker, BACKEND_BROKER_ENV};
pub use error::{ConfigError, SuffixError};
pub use models::*;
pub use suffix::{decode_query_identifiers, Suffix, SUFFIX_SEPARATOR};
