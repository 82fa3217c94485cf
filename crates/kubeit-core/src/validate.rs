//! Resource validation
//!
//! Runs after a clean decode:
//! 1. each resource checks its own fields
//! 2. `(kind, name)` pairs must be unique across the whole load

use indexmap::IndexMap;
use tracing::debug;

use crate::error::LoadError;
use crate::report::LoadReport;
use crate::resources::{AnyResource, Resource};

/// Validate every resource, in enumeration order
pub fn validate_resources<'a>(resources: impl IntoIterator<Item = &'a AnyResource>) -> LoadReport {
    let resources: Vec<&AnyResource> = resources.into_iter().collect();
    let mut report = LoadReport::new();

    for resource in &resources {
        let errors: Vec<LoadError> = resource
            .validate()
            .into_iter()
            .map(|violation| LoadError::FieldValidation {
                kind: resource.kind().to_string(),
                name: resource.name().to_string(),
                field: violation.field,
                message: violation.message,
            })
            .collect();

        if !errors.is_empty() {
            debug!(
                "{} {} has {} validation errors",
                resource.kind(),
                resource.name(),
                errors.len()
            );
        }
        report.add_errors(&resource.source_meta().source, errors);
    }

    report.merge(check_uniqueness(resources));
    report
}

/// Report every repeated `(kind, name)` against the source that repeats it
///
/// The message names the source of the first occurrence.
pub fn check_uniqueness<'a>(resources: impl IntoIterator<Item = &'a AnyResource>) -> LoadReport {
    let mut report = LoadReport::new();
    let mut seen: IndexMap<(&str, &str), &str> = IndexMap::new();

    for resource in resources {
        let key = (resource.kind(), resource.name());
        let source = resource.source_meta().source.as_str();

        match seen.get(&key) {
            Some(first_source) => report.add_error(
                source,
                LoadError::Uniqueness {
                    kind: key.0.to_string(),
                    name: key.1.to_string(),
                    first_source: first_source.to_string(),
                },
            ),
            None => {
                seen.insert(key, source);
            }
        }
    }

    report
}
