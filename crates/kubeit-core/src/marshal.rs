//! Serialization of a resource collection back to a multi-document stream,
//! and the image label encoding built on it

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CoreError, Result};
use crate::meta::{RESOURCES_LABEL, VERSION_LABEL};
use crate::resources::{AnyResource, Resource};

/// Serialize resources as YAML documents, each prefixed with `---`
///
/// Output order is the iteration order; the loader hands resources in
/// registry order, then decode order.
pub fn marshal<'a>(resources: impl IntoIterator<Item = &'a AnyResource>) -> Result<String> {
    let mut out = String::new();

    for resource in resources {
        let yaml = serde_yaml::to_string(resource).map_err(|e| CoreError::Marshal {
            kind: resource.kind().to_string(),
            name: resource.name().to_string(),
            message: e.to_string(),
        })?;
        out.push_str("---\n");
        out.push_str(&yaml);
    }

    Ok(out)
}

/// Base64 (standard alphabet) value for the resources label
pub fn encode_label(stream: &str) -> String {
    STANDARD.encode(stream.as_bytes())
}

/// Inverse of [`encode_label`]; the payload must be UTF-8
pub fn decode_label(label: &str) -> Result<String> {
    let bytes = STANDARD.decode(label.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// `docker build` arguments embedding a marshalled stream
pub fn docker_label_args(stream: &str) -> Vec<String> {
    vec![
        "--label".to_string(),
        format!("{}={}", VERSION_LABEL, env!("CARGO_PKG_VERSION")),
        "--label".to_string(),
        format!("{}={}", RESOURCES_LABEL, encode_label(stream)),
    ]
}
