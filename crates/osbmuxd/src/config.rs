//! Daemon configuration
//!
//! Settings come from command-line flags (or their environment variables)
//! first, then an optional TOML file, then built-in defaults. The backend
//! broker URL has no default: without it the daemon refuses to start.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [backend]
//! url = "http://localhost:8080"
//! timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [relay]
//! strip_query_suffix = true
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use osbmux_api::RelayOptions;
use osbmux_client::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use osbmux_core::{BackendBroker, ConfigError, BACKEND_BROKER_ENV};
use serde::Deserialize;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(
    name = "osbmuxd",
    version,
    about = "Expose one Open Service Broker under many suffixed registrations"
)]
pub struct Args {
    /// TOML config file
    #[arg(short = 'c', long, env = "OSBMUX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend broker base URL
    #[arg(short = 'b', long, env = BACKEND_BROKER_ENV)]
    pub backend_url: Option<String>,

    /// Listen port [default: 3000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Listen address [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Backend request timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Backend connect timeout in seconds [default: 10]
    #[arg(long)]
    pub connect_timeout_secs: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

/// `[server]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
}

/// `[backend]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendSection {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

/// `[relay]` table
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelaySection {
    pub strip_query_suffix: Option<bool>,
}

/// Contents of the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub backend: BackendSection,
    #[serde(default)]
    pub relay: RelaySection,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Fully resolved daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen: SocketAddr,
    pub backend: BackendBroker,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub relay: RelayOptions,
}

impl Config {
    /// Merge arguments, the optional config file and defaults.
    ///
    /// Fails when no backend broker URL is available from any source.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => {
                tracing::info!("Loading config from: {}", path.display());
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        let backend_url = args.backend_url.as_deref().or(file.backend.url.as_deref());
        let backend = BackendBroker::resolve(backend_url)?;

        let host = args
            .host
            .or(file.server.host)
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port = args.port.or(file.server.port).unwrap_or(DEFAULT_PORT);

        let timeout = args
            .timeout_secs
            .or(file.backend.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let connect_timeout = args
            .connect_timeout_secs
            .or(file.backend.connect_timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);

        let relay = RelayOptions {
            strip_query_suffix: file
                .relay
                .strip_query_suffix
                .unwrap_or(RelayOptions::default().strip_query_suffix),
        };

        Ok(Self {
            listen: SocketAddr::new(host, port),
            backend,
            timeout,
            connect_timeout,
            relay,
        })
    }
}
