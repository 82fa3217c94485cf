//! Type, object and provenance metadata shared by every resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Group used by every built-in kind
pub const API_GROUP: &str = "kubeit.io";

/// The only API version currently served
pub const API_VERSION_V1ALPHA1: &str = "kubeit.io/v1alpha1";

/// Image label carrying the base64-encoded resource stream
pub const RESOURCES_LABEL: &str = "kubeit.io/resources";

/// Image label carrying the version of the tool that produced the stream
pub const VERSION_LABEL: &str = "kubeit.io/version";

/// Minimal envelope read from every document before dispatch
///
/// Unknown fields are ignored here on purpose: the strict pass happens once
/// the concrete kind is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectMeta {
    pub name: String,
}

/// Where a load (or a single resource) came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    File,
    Docker,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::Docker => "docker",
        }
    }

    /// Parse a URI scheme, `None` when it is not one we load from
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "file" => Some(Scheme::File),
            "docker" => Some(Scheme::Docker),
            _ => None,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a resource
///
/// For directory loads `source` is the absolute path of the file holding the
/// document; for image loads it is the normalized image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMeta {
    pub scheme: Scheme,
    pub source: String,
    #[serde(rename = "sourceURI")]
    pub source_uri: String,
}

impl SourceMeta {
    pub fn new(scheme: Scheme, source: impl Into<String>, source_uri: impl Into<String>) -> Self {
        Self {
            scheme,
            source: source.into(),
            source_uri: source_uri.into(),
        }
    }

    /// Same scheme and URI, different concrete source
    pub fn with_source(&self, source: impl Into<String>) -> Self {
        Self {
            scheme: self.scheme,
            source: source.into(),
            source_uri: self.source_uri.clone(),
        }
    }
}

/// Metadata about one load operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderMeta {
    #[serde(flatten)]
    pub source: SourceMeta,
    pub loaded_on: DateTime<Utc>,
}

impl LoaderMeta {
    pub fn new(source: SourceMeta) -> Self {
        Self {
            source,
            loaded_on: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_meta_ignores_other_fields() {
        let meta: TypeMeta = serde_yaml::from_str(
            "apiVersion: kubeit.io/v1alpha1\nkind: NamedValues\nspec: {}\n",
        )
        .unwrap();
        assert_eq!(meta.kind, "NamedValues");
        assert_eq!(meta.api_version, API_VERSION_V1ALPHA1);
    }

    #[test]
    fn test_type_meta_defaults_missing_fields() {
        let meta: TypeMeta = serde_yaml::from_str("metadata:\n  name: x\n").unwrap();
        assert!(meta.kind.is_empty());
        assert!(meta.api_version.is_empty());
    }

    #[test]
    fn test_type_meta_rejects_non_string_kind() {
        let result: std::result::Result<TypeMeta, _> =
            serde_yaml::from_str("apiVersion: v1\nkind: [a, b]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_scheme_names() {
        assert_eq!(Scheme::from_name("docker"), Some(Scheme::Docker));
        assert_eq!(Scheme::from_name("s3"), None);
        assert_eq!(Scheme::File.to_string(), "file");
    }

    #[test]
    fn test_with_source_keeps_uri() {
        let meta = SourceMeta::new(Scheme::File, "/cfg", "file://cfg");
        let file = meta.with_source("/cfg/app.yaml");
        assert_eq!(file.source, "/cfg/app.yaml");
        assert_eq!(file.source_uri, "file://cfg");
        assert_eq!(file.scheme, Scheme::File);
    }
}
