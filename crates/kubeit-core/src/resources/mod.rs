//! Resource kinds understood by the loader
//!
//! Every kind is an [`Object`] wrapping a kind-specific spec. The set of
//! kinds is closed: [`AnyResource`] has one variant per kind, and the
//! [`TypeRegistry`](crate::registry::TypeRegistry) maps `(kind, apiVersion)`
//! strings to a strict decoder producing that variant.

pub mod helm_application;
pub mod named_values;
pub mod service;
pub mod service_application;
pub mod value_entry;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::meta::{ObjectMeta, SourceMeta};

pub use helm_application::{ChartSpec, HelmApplication, HelmApplicationSpec};
pub use named_values::{NamedValues, NamedValuesSpec};
pub use service::{Service, ServiceSpec};
pub use service_application::{ServiceApplication, ServiceApplicationSpec};
pub use value_entry::ValueEntry;

/// Common capability of every decoded resource
pub trait Resource {
    fn api_version(&self) -> &str;

    fn kind(&self) -> &str;

    fn metadata(&self) -> &ObjectMeta;

    fn name(&self) -> &str {
        &self.metadata().name
    }

    fn source_meta(&self) -> &SourceMeta;

    /// Structural and semantic checks; an empty list means valid
    fn validate(&self) -> Vec<FieldViolation>;
}

/// Kind-specific payload of an [`Object`]
pub trait Spec: Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq {
    /// Kind name as written in documents
    const KIND: &'static str;

    fn validate(&self) -> Vec<FieldViolation> {
        Vec::new()
    }

    fn into_any(object: Object<Self>) -> AnyResource;

    fn from_any(any: &AnyResource) -> Option<&Object<Self>>;
}

/// A full document: envelope, metadata and spec
///
/// Unknown fields anywhere in the document are rejected during decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Object<S> {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    pub spec: S,
    /// Assigned once at decode time, never serialized
    #[serde(skip)]
    pub source_meta: SourceMeta,
}

impl<S: Spec> Object<S> {
    pub fn new(api_version: impl Into<String>, name: impl Into<String>, spec: S) -> Self {
        Self {
            api_version: api_version.into(),
            kind: S::KIND.to_string(),
            metadata: ObjectMeta { name: name.into() },
            spec,
            source_meta: SourceMeta::default(),
        }
    }
}

impl<S: Spec> Resource for Object<S> {
    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn source_meta(&self) -> &SourceMeta {
        &self.source_meta
    }

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();
        if self.metadata.name.trim().is_empty() {
            violations.push(FieldViolation::required("metadata.name"));
        }
        violations.extend(self.spec.validate());
        violations
    }
}

/// One variant per supported kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnyResource {
    HelmApplication(HelmApplication),
    NamedValues(NamedValues),
    Service(Service),
    ServiceApplication(ServiceApplication),
}

impl AnyResource {
    pub fn as_resource(&self) -> &dyn Resource {
        match self {
            AnyResource::HelmApplication(r) => r,
            AnyResource::NamedValues(r) => r,
            AnyResource::Service(r) => r,
            AnyResource::ServiceApplication(r) => r,
        }
    }

    pub(crate) fn set_source_meta(&mut self, meta: SourceMeta) {
        match self {
            AnyResource::HelmApplication(r) => r.source_meta = meta,
            AnyResource::NamedValues(r) => r.source_meta = meta,
            AnyResource::Service(r) => r.source_meta = meta,
            AnyResource::ServiceApplication(r) => r.source_meta = meta,
        }
    }
}

impl Resource for AnyResource {
    fn api_version(&self) -> &str {
        self.as_resource().api_version()
    }

    fn kind(&self) -> &str {
        self.as_resource().kind()
    }

    fn metadata(&self) -> &ObjectMeta {
        self.as_resource().metadata()
    }

    fn source_meta(&self) -> &SourceMeta {
        self.as_resource().source_meta()
    }

    fn validate(&self) -> Vec<FieldViolation> {
        self.as_resource().validate()
    }
}

/// A failed field-level check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `spec.chart.url`
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }

    /// Check enum membership, returning a violation when `value` is not allowed
    pub fn one_of(field: impl Into<String>, value: &str, allowed: &[&str]) -> Option<Self> {
        if allowed.contains(&value) {
            return None;
        }
        Some(Self::new(
            field,
            format!("invalid value '{}', must be one of: {}", value, allowed.join(", ")),
        ))
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::API_VERSION_V1ALPHA1;

    #[test]
    fn test_empty_name_is_reported() {
        let values = NamedValues::new(
            API_VERSION_V1ALPHA1,
            "",
            NamedValuesSpec {
                values: vec![ValueEntry::Named],
            },
        );

        let violations = values.validate();
        assert_eq!(violations, vec![FieldViolation::required("metadata.name")]);
    }

    #[test]
    fn test_one_of() {
        assert!(FieldViolation::one_of("spec.x", "a", &["a", "b"]).is_none());

        let violation = FieldViolation::one_of("spec.x", "c", &["a", "b"]).unwrap();
        assert_eq!(violation.to_string(), "spec.x: invalid value 'c', must be one of: a, b");
    }

    #[test]
    fn test_any_resource_delegates() {
        let any = NamedValues::new(
            API_VERSION_V1ALPHA1,
            "staging",
            NamedValuesSpec {
                values: vec![ValueEntry::Named],
            },
        );
        let any = NamedValuesSpec::into_any(any);

        assert_eq!(any.kind(), "NamedValues");
        assert_eq!(any.name(), "staging");
        assert!(any.validate().is_empty());
        assert!(NamedValuesSpec::from_any(&any).is_some());
        assert!(HelmApplicationSpec::from_any(&any).is_none());
    }
}
