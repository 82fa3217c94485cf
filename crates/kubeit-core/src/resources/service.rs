//! Service: ownership and deployment targets of a service

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldViolation, Object, Spec};

pub const VALID_ORGANIZATIONS: &[&str] = &["bet", "data-eng", "infra", "media"];

pub const VALID_ENVIRONMENTS: &[&str] = &[
    "audit1",
    "demo",
    "internal-services",
    "production",
    "ps",
    "staging",
    "uat",
];

const PRODUCTION_ENVIRONMENTS: &[&str] = &["production"];

pub type Service = Object<ServiceSpec>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceSpec {
    #[serde(default)]
    pub environments: Vec<String>,

    #[serde(default, rename = "organization")]
    pub org: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub regulated: bool,

    #[serde(default, rename = "sourceRepository")]
    pub source_repo: String,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ServiceSpec {
    pub fn is_prod(env: &str) -> bool {
        PRODUCTION_ENVIRONMENTS.contains(&env)
    }
}

impl Spec for ServiceSpec {
    const KIND: &'static str = "Service";

    fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if self.environments.is_empty() {
            violations.push(FieldViolation::required("spec.environments"));
        }
        for (i, env) in self.environments.iter().enumerate() {
            violations.extend(FieldViolation::one_of(
                format!("spec.environments[{}]", i),
                env,
                VALID_ENVIRONMENTS,
            ));
        }

        if self.org.is_empty() {
            violations.push(FieldViolation::required("spec.organization"));
        } else {
            violations.extend(FieldViolation::one_of(
                "spec.organization",
                &self.org,
                VALID_ORGANIZATIONS,
            ));
        }

        if self.source_repo.is_empty() {
            violations.push(FieldViolation::required("spec.sourceRepository"));
        }

        violations
    }

    fn into_any(object: Object<Self>) -> AnyResource {
        AnyResource::Service(object)
    }

    fn from_any(any: &AnyResource) -> Option<&Object<Self>> {
        match any {
            AnyResource::Service(r) => Some(r),
            _ => None,
        }
    }
}
