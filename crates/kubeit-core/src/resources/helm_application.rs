//! HelmApplication: a chart reference plus the values used to render it

use serde::{Deserialize, Serialize};

use super::{AnyResource, FieldViolation, Object, Spec, ValueEntry};

pub type HelmApplication = Object<HelmApplicationSpec>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HelmApplicationSpec {
    pub chart: ChartSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ValueEntry>,
}

/// Where to pull the chart from
///
/// Either `url`, or both `repository` and `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub release_name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ChartSpec {
    /// Reference handed to the chart puller: the URL when set, else the name
    pub fn reference(&self) -> &str {
        if self.url.is_empty() {
            &self.name
        } else {
            &self.url
        }
    }
}

impl Spec for HelmApplicationSpec {
    const KIND: &'static str = "HelmApplication";

    fn validate(&self) -> Vec<FieldViolation> {
        let chart = &self.chart;
        let mut violations = Vec::new();

        // A URL on its own is enough; the pair is only checked without one
        if chart.url.is_empty() {
            match (chart.repository.is_empty(), chart.name.is_empty()) {
                (true, true) => violations.push(FieldViolation::new(
                    "spec.chart",
                    "either spec.chart.url must be provided or both spec.chart.repository and spec.chart.name must be provided",
                )),
                (true, false) => violations.push(FieldViolation::new(
                    "spec.chart.repository",
                    "must be provided when using spec.chart.name",
                )),
                (false, true) => violations.push(FieldViolation::new(
                    "spec.chart.name",
                    "must be provided when using spec.chart.repository",
                )),
                (false, false) => {}
            }
        }

        violations
    }

    fn into_any(object: Object<Self>) -> AnyResource {
        AnyResource::HelmApplication(object)
    }

    fn from_any(any: &AnyResource) -> Option<&Object<Self>> {
        match any {
            AnyResource::HelmApplication(r) => Some(r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(chart: ChartSpec) -> HelmApplicationSpec {
        HelmApplicationSpec {
            chart,
            values: Vec::new(),
        }
    }

    #[test]
    fn test_url_only_is_valid() {
        let s = spec(ChartSpec {
            url: "oci://registry.example.com/charts/app".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        });
        assert!(s.validate().is_empty());
        assert_eq!(s.chart.reference(), "oci://registry.example.com/charts/app");
    }

    #[test]
    fn test_repository_and_name_is_valid() {
        let s = spec(ChartSpec {
            repository: "https://charts.bitnami.com/bitnami".to_string(),
            name: "redis".to_string(),
            ..Default::default()
        });
        assert!(s.validate().is_empty());
        assert_eq!(s.chart.reference(), "redis");
    }

    #[test]
    fn test_neither_is_invalid() {
        let violations = spec(ChartSpec::default()).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "spec.chart");
    }

    #[test]
    fn test_half_pair_is_invalid_without_url() {
        let violations = spec(ChartSpec {
            name: "redis".to_string(),
            ..Default::default()
        })
        .validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "spec.chart.repository");

        let violations = spec(ChartSpec {
            repository: "https://charts.example.com".to_string(),
            ..Default::default()
        })
        .validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "spec.chart.name");
    }

    #[test]
    fn test_url_with_half_pair_is_valid() {
        let with_name = spec(ChartSpec {
            url: "oci://registry.example.com/charts/web".to_string(),
            name: "web".to_string(),
            ..Default::default()
        });
        assert!(with_name.validate().is_empty());
        assert_eq!(with_name.chart.reference(), "oci://registry.example.com/charts/web");

        let with_repository = spec(ChartSpec {
            url: "oci://registry.example.com/charts/web".to_string(),
            repository: "https://charts.example.com".to_string(),
            ..Default::default()
        });
        assert!(with_repository.validate().is_empty());
    }

    #[test]
    fn test_strict_decode_rejects_typo() {
        let result: Result<HelmApplicationSpec, _> =
            serde_yaml::from_str("chart:\n  url: oci://x/y\n  relaseName: app\n");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("relaseName"), "{}", err);
    }
}
