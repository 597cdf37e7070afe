//! Header forwarding rules
//!
//! Platform headers (`Authorization`, `X-Broker-API-Version`,
//! `X-Broker-API-Originating-Identity`, ...) are copied to the backend as
//! they arrived. Connection-scoped headers are not: the outbound transport
//! owns its own connection, host and framing. `Accept-Encoding` is dropped
//! too so the backend answers with an identity body the relay can rewrite
//! and pass through without re-labelling.

use reqwest::header::{HeaderMap, HeaderName};

/// Headers that describe the inbound hop and must not be copied outbound
fn is_hop_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "accept-encoding"
            | "connection"
            | "host"
            | "content-length"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Copy the inbound headers that may be forwarded to the backend.
///
/// Repeated headers keep every value.
pub fn forwardable_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound {
        if !is_hop_header(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{self, HeaderValue};

    fn inbound() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("proxy.local"));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("42"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        headers.insert("x-broker-api-version", HeaderValue::from_static("2.13"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.append("x-custom", HeaderValue::from_static("one"));
        headers.append("x-custom", HeaderValue::from_static("two"));
        headers
    }

    #[test]
    fn broker_headers_are_forwarded() {
        let out = forwardable_headers(&inbound());
        assert_eq!(out[header::AUTHORIZATION], "Basic dXNlcjpwYXNz");
        assert_eq!(out["x-broker-api-version"], "2.13");
        assert_eq!(out[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn hop_headers_are_dropped() {
        let out = forwardable_headers(&inbound());
        assert!(!out.contains_key(header::HOST));
        assert!(!out.contains_key(header::CONTENT_LENGTH));
        assert!(!out.contains_key(header::CONNECTION));
        assert!(!out.contains_key("keep-alive"));
        assert!(!out.contains_key(header::ACCEPT_ENCODING));
    }

    #[test]
    fn repeated_headers_keep_all_values() {
        let out = forwardable_headers(&inbound());
        let values: Vec<_> = out.get_all("x-custom").iter().collect();
        assert_eq!(values, vec!["one", "two"]);
    }
}
