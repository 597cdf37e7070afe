//! Identifier suffix codec.
//!
//! Every virtual broker registration is distinguished by a suffix taken from
//! the first path segment of the request URL. Catalog identifiers leaving the
//! proxy get the suffix appended; identifiers coming in from the platform get
//! it stripped again before they reach the backend broker.

use std::borrow::Cow;
use std::fmt;

use url::form_urlencoded;

use crate::error::SuffixError;

/// Separator placed between an identifier and the registration name
pub const SUFFIX_SEPARATOR: char = '-';

/// Query parameters that carry catalog identifiers on deprovision/unbind
const QUERY_ID_KEYS: [&str; 2] = ["plan_id", "service_id"];

/// A registration suffix, always non-empty and starting with [`SUFFIX_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Suffix(String);

impl Suffix {
    /// Build a suffix from the `{suffix}` path segment.
    ///
    /// ```
    /// # use osbmux_core::Suffix;
    /// let suffix = Suffix::from_segment("acme").unwrap();
    /// assert_eq!(suffix.as_str(), "-acme");
    /// assert!(Suffix::from_segment("").is_err());
    /// ```
    pub fn from_segment(segment: &str) -> Result<Self, SuffixError> {
        if segment.is_empty() {
            return Err(SuffixError::Empty);
        }
        Ok(Self(format!("{}{}", SUFFIX_SEPARATOR, segment)))
    }

    /// The suffix including its leading separator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append the suffix to an identifier.
    ///
    /// ```
    /// # use osbmux_core::Suffix;
    /// let suffix = Suffix::from_segment("acme").unwrap();
    /// assert_eq!(suffix.encode("mysql"), "mysql-acme");
    /// ```
    pub fn encode(&self, id: &str) -> String {
        format!("{}{}", id, self.0)
    }

    /// Remove a trailing suffix from an identifier. Identifiers that do not
    /// end with the suffix are returned unchanged.
    ///
    /// ```
    /// # use osbmux_core::Suffix;
    /// let suffix = Suffix::from_segment("acme").unwrap();
    /// assert_eq!(suffix.decode("mysql-acme"), "mysql");
    /// assert_eq!(suffix.decode("mysql"), "mysql");
    /// assert_eq!(suffix.decode("my-acme-sql"), "my-acme-sql");
    /// ```
    pub fn decode(&self, id: &str) -> String {
        id.strip_suffix(self.0.as_str()).unwrap_or(id).to_string()
    }

    /// Rewrite an identifier in place, stripping the suffix if present
    pub fn decode_in_place(&self, id: &mut String) {
        if id.ends_with(self.0.as_str()) {
            id.truncate(id.len() - self.0.len());
        }
    }

    /// Rewrite an identifier in place, appending the suffix
    pub fn encode_in_place(&self, id: &mut String) {
        id.push_str(&self.0);
    }
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip the suffix from the `plan_id` and `service_id` values of a raw URL
/// query string. Every other pair is copied byte for byte and in order.
///
/// ```
/// # use osbmux_core::{decode_query_identifiers, Suffix};
/// let suffix = Suffix::from_segment("acme").unwrap();
/// assert_eq!(
///     decode_query_identifiers("plan_id=small-acme&accepts_incomplete=true", &suffix),
///     "plan_id=small&accepts_incomplete=true"
/// );
/// ```
pub fn decode_query_identifiers(query: &str, suffix: &Suffix) -> String {
    query
        .split('&')
        .map(|pair| decode_query_pair(pair, suffix))
        .collect::<Vec<_>>()
        .join("&")
}

fn decode_query_pair<'a>(pair: &'a str, suffix: &Suffix) -> Cow<'a, str> {
    let Some((key, raw_value)) = pair.split_once('=') else {
        return Cow::Borrowed(pair);
    };
    if !QUERY_ID_KEYS.contains(&key) {
        return Cow::Borrowed(pair);
    }

    // Percent-decoding follows application/x-www-form-urlencoded rules
    let value: String = form_urlencoded::parse(format!("v={}", raw_value).as_bytes())
        .map(|(_, v)| v.into_owned())
        .next()
        .unwrap_or_default();
    match value.strip_suffix(suffix.as_str()) {
        Some(stripped) => Cow::Owned(format!(
            "{}={}",
            key,
            form_urlencoded::byte_serialize(stripped.as_bytes()).collect::<String>()
        )),
        None => Cow::Borrowed(pair),
    }
}
