//! ServiceApplication: a deployable unit of a Service on a cluster role

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldViolation, Object, Spec};

pub const VALID_CLUSTER_ROLES: &[&str] = &["internal-services", "core", "edge", "data-engineering"];

pub type ServiceApplication = Object<ServiceApplicationSpec>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceApplicationSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chart_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub chart_version: String,

    #[serde(default)]
    pub cluster_role: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jurisdiction: String,

    #[serde(default)]
    pub service_name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values_files: Vec<String>,

    #[serde(default)]
    pub values_repository: String,
}

impl Spec for ServiceApplicationSpec {
    const KIND: &'static str = "ServiceApplication";

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.cluster_role.is_empty() {
            violations.push(FieldViolation::required("spec.clusterRole"));
        } else {
            violations.extend(FieldViolation::one_of(
                "spec.clusterRole",
                &self.cluster_role,
                VALID_CLUSTER_ROLES,
            ));
        }

        if self.cluster_role == "edge" && self.jurisdiction.is_empty() {
            violations.push(FieldViolation::new(
                "spec.jurisdiction",
                "is required when cluster role is 'edge'",
            ));
        }

        if self.service_name.is_empty() {
            violations.push(FieldViolation::required("spec.serviceName"));
        }
        if self.values_repository.is_empty() {
            violations.push(FieldViolation::required("spec.valuesRepository"));
        }

        violations
    }

    fn into_any(object: Object<Self>) -> AnyResource {
        AnyResource::ServiceApplication(object)
    }

    fn from_any(any: &AnyResource) -> Option<&Object<Self>> {
        match any {
            AnyResource::ServiceApplication(r) => Some(r),
            _ => None,
        }
    }
}
