//! Backend broker client
//!
//! Relays Open Service Broker operations to the single backend broker and
//! hands back the raw status, content type and body.
//!
//! # Example
//!
//! ```rust,no_run
//! use osbmux_client::BrokerClient;
//! use osbmux_core::BackendBroker;
//! use reqwest::header::HeaderMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = BackendBroker::parse("http://localhost:8080")?;
//!     let client = BrokerClient::new(backend)?;
//!
//!     let response = client.catalog(&HeaderMap::new()).await?;
//!     println!("{} {} bytes", response.status, response.body.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
pub mod headers;
pub mod testing;

pub use client::{
    BackendResponse, BrokerClient, RelayRequest, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use error::{BrokerClientError, Result};
