//! Helm value entries: `named`, `mapping` and `raw`

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Recognized `type` discriminants
pub const VALID_VALUE_TYPES: &[&str] = &["named", "mapping", "raw"];

/// One unit of template-parameter input
///
/// The payload shape is checked while decoding, so a constructed entry is
/// always well formed:
/// - `named` carries no data and expands the caller's active named-values
///   scope at resolution time
/// - `mapping` is a flat string map, kept in document order
/// - `raw` is an arbitrary object overlaid verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawValueEntry", into = "RawValueEntry")]
pub enum ValueEntry {
    Named,
    Mapping(IndexMap<String, String>),
    Raw(serde_json::Map<String, JsonValue>),
}

impl ValueEntry {
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueEntry::Named => "named",
            ValueEntry::Mapping(_) => "mapping",
            ValueEntry::Raw(_) => "raw",
        }
    }

    pub fn mapping<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        ValueEntry::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Wire shape of a value entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawValueEntry {
    #[serde(rename = "type")]
    value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl TryFrom<RawValueEntry> for ValueEntry {
    type Error = String;

    fn try_from(raw: RawValueEntry) -> Result<Self, Self::Error> {
        match (raw.value_type.as_str(), raw.data) {
            ("named", None) => Ok(ValueEntry::Named),
            ("named", Some(_)) => Err("named values must not have data".to_string()),
            ("mapping", Some(data)) => serde_json::from_value(data)
                .map(ValueEntry::Mapping)
                .map_err(|e| format!("invalid mappings format: {}", e)),
            ("raw", Some(JsonValue::Object(map))) => Ok(ValueEntry::Raw(map)),
            ("raw", Some(other)) => Err(format!(
                "invalid raw format: expected an object, found {}",
                json_type_name(&other)
            )),
            (value_type @ ("mapping" | "raw"), None) => Err(format!(
                "spec.values[*].data must be provided when type: {}",
                value_type
            )),
            (other, _) => Err(format!(
                "unknown Helm values type '{}', spec.values[*].type must be one of: {}",
                other,
                VALID_VALUE_TYPES.join(", ")
            )),
        }
    }
}

impl From<ValueEntry> for RawValueEntry {
    fn from(entry: ValueEntry) -> Self {
        let value_type = entry.type_name().to_string();
        let data = match entry {
            ValueEntry::Named => None,
            ValueEntry::Mapping(map) => Some(JsonValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, JsonValue::String(v)))
                    .collect(),
            )),
            ValueEntry::Raw(map) => Some(JsonValue::Object(map)),
        };
        RawValueEntry { value_type, data }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
