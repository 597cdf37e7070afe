//! Backend broker resolver
//!
//! The proxy relays to exactly one backend broker. Its base URL is resolved
//! once at startup and handed to the relay as an immutable value.

use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the backend broker base URL
pub const BACKEND_BROKER_ENV: &str = "BACKEND_BROKER";

/// The single backend broker all operations are relayed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendBroker {
    url: Url,
}

impl BackendBroker {
    /// Parse and validate a backend base URL.
    ///
    /// The URL must be absolute and use `http` or `https`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::MissingBackendUrl(BACKEND_BROKER_ENV));
        }

        let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBackendUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::InvalidBackendUrl {
                    url: trimmed.to_string(),
                    reason: format!("unsupported scheme '{}'", other),
                })
            }
        }

        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ConfigError::InvalidBackendUrl {
                url: trimmed.to_string(),
                reason: "URL has no host".to_string(),
            });
        }

        Ok(Self { url })
    }

    /// Resolve the backend from [`BACKEND_BROKER_ENV`]
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(BACKEND_BROKER_ENV) {
            Ok(raw) => Self::parse(&raw),
            Err(_) => Err(ConfigError::MissingBackendUrl(BACKEND_BROKER_ENV)),
        }
    }

    /// Resolve from an explicit value if one was given, otherwise from the
    /// environment
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ConfigError> {
        let backend = match explicit {
            Some(raw) => Self::parse(raw)?,
            None => Self::from_env()?,
        };
        tracing::debug!(url = %backend.url, "Resolved backend broker");
        Ok(backend)
    }

    /// The backend base URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Build the backend URL for a sequence of path segments, keeping any
    /// path prefix the base URL already carries.
    ///
    /// ```
    /// # use osbmux_core::BackendBroker;
    /// let backend = BackendBroker::parse("http://broker.local/prefix/").unwrap();
    /// let url = backend.endpoint(&["v2", "catalog"], None);
    /// assert_eq!(url.as_str(), "http://broker.local/prefix/v2/catalog");
    /// ```
    pub fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Url {
        let mut url = self.url.clone();
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.set_query(query.filter(|q| !q.is_empty()));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_accepts_http_and_https() {
        assert!(BackendBroker::parse("http://localhost:8080").is_ok());
        assert!(BackendBroker::parse("https://broker.example.com").is_ok());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!(matches!(
            BackendBroker::parse("  "),
            Err(ConfigError::MissingBackendUrl(_))
        ));
    }

    #[test]
    fn parse_rejects_garbage_and_other_schemes() {
        assert!(matches!(
            BackendBroker::parse("not a url"),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
        assert!(matches!(
            BackendBroker::parse("ftp://broker.local"),
            Err(ConfigError::InvalidBackendUrl { .. })
        ));
    }

    #[test]
    fn endpoint_without_prefix() {
        let backend = BackendBroker::parse("http://localhost:8080").unwrap();
        let url = backend.endpoint(&["v2", "service_instances", "i1"], None);
        assert_eq!(url.as_str(), "http://localhost:8080/v2/service_instances/i1");
    }

    #[test]
    fn endpoint_keeps_prefix_without_trailing_slash() {
        let backend = BackendBroker::parse("http://localhost:8080/broker").unwrap();
        let url = backend.endpoint(&["v2", "catalog"], None);
        assert_eq!(url.as_str(), "http://localhost:8080/broker/v2/catalog");
    }

    #[test]
    fn endpoint_encodes_segments_and_sets_query() {
        let backend = BackendBroker::parse("http://localhost:8080").unwrap();
        let url = backend.endpoint(
            &["v2", "service_instances", "a b/c"],
            Some("plan_id=p&service_id=s"),
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v2/service_instances/a%20b%2Fc?plan_id=p&service_id=s"
        );
    }

    #[test]
    fn endpoint_drops_empty_query() {
        let backend = BackendBroker::parse("http://localhost:8080").unwrap();
        let url = backend.endpoint(&["v2", "catalog"], Some(""));
        assert_eq!(url.query(), None);
    }

    #[test]
    #[serial]
    fn from_env_reads_backend_broker() {
        std::env::set_var(BACKEND_BROKER_ENV, "https://localhost");
        let backend = BackendBroker::from_env().unwrap();
        assert_eq!(backend.url().as_str(), "https://localhost/");
        std::env::remove_var(BACKEND_BROKER_ENV);
    }

    #[test]
    #[serial]
    fn from_env_missing_fails_fast() {
        std::env::remove_var(BACKEND_BROKER_ENV);
        assert!(matches!(
            BackendBroker::from_env(),
            Err(ConfigError::MissingBackendUrl(BACKEND_BROKER_ENV))
        ));
    }

    #[test]
    #[serial]
    fn resolve_prefers_explicit_value() {
        std::env::set_var(BACKEND_BROKER_ENV, "http://from-env");
        let backend = BackendBroker::resolve(Some("http://explicit")).unwrap();
        assert_eq!(backend.url().host_str(), Some("explicit"));
        std::env::remove_var(BACKEND_BROKER_ENV);
    }
}
