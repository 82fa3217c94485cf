//! NamedValues: a reusable list of value entries

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldViolation, Object, Spec, ValueEntry};

pub type NamedValues = Object<NamedValuesSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NamedValuesSpec {
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

impl Spec for NamedValuesSpec {
    const KIND: &'static str = "NamedValues";

    fn validate(&self) -> Vec<FieldViolation> {
        if self.values.is_empty() {
            return vec![FieldViolation::required("spec.values")];
        }
        Vec::new()
    }

    fn into_any(object: Object<Self>) -> AnyResource {
        AnyResource::NamedValues(object)
    }

    fn from_any(any: &AnyResource) -> Option<&Object<Self>> {
        match any {
            AnyResource::NamedValues(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_required() {
        let spec = NamedValuesSpec { values: Vec::new() };
        assert_eq!(spec.validate(), vec![FieldViolation::required("spec.values")]);
    }

    #[test]
    fn test_decode() {
        let spec: NamedValuesSpec = serde_yaml::from_str(
            "values:\n- type: mapping\n  data:\n    X: $dockerImageTag\n- type: named\n",
        )
        .unwrap();
        assert_eq!(spec.values.len(), 2);
        assert!(spec.validate().is_empty());
    }
}
