//! Provision request body

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::suffix::Suffix;

/// `PUT /v2/service_instances/{instance_id}` request body.
///
/// `service_id` and `plan_id` are mandatory. The remaining well-known
/// fields are optional: `None` means the platform did not send the key and
/// `Some(None)` means it sent an explicit `null`, which is relayed as such.
/// Unknown fields ride along in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvisionRequest {
    pub service_id: String,
    pub plan_id: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub organization_guid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub space_guid: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parameters: Option<Option<Value>>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub context: Option<Option<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProvisionRequest {
    /// Strip the suffix from `service_id` and `plan_id`
    pub fn decode_identifiers(&mut self, suffix: &Suffix) {
        suffix.decode_in_place(&mut self.service_id);
        suffix.decode_in_place(&mut self.plan_id);
    }
}

/// Any key that is present, `null` included, becomes `Some`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
