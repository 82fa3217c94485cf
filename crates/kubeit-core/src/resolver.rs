//! Value resolution
//!
//! Turns a list of [`ValueEntry`] into the flat `key=value` assignments and
//! raw overlays handed to Helm. Mapping values go through variable
//! substitution; `named` entries expand the caller's active NamedValues
//! scope, recursively and in order.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{LoadError, Result};
use crate::image_ref::parse_docker_image;
use crate::meta::{Scheme, SourceMeta};
use crate::registry::ResourceSet;
use crate::resources::{NamedValuesSpec, ValueEntry};
use crate::values::Values;

/// Stand-in for `dockerImageRepository` outside docker loads
pub const REPOSITORY_SENTINEL: &str = "$dockerImageRepository!!NOT_GENERATED_FROM_DOCKER_IMAGE!!";

/// Stand-in for `dockerImageTag` outside docker loads
pub const TAG_SENTINEL: &str = "$dockerImageTag!!NOT_GENERATED_FROM_DOCKER_IMAGE!!";

/// `${VAR}` or `$VAR`
static VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}]+)\}|\$([a-zA-Z_][a-zA-Z0-9_]*)").expect("valid variable regex")
});

/// Output of a resolution, in input entry order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedValues {
    /// `key=value` assignments, one per mapping key
    pub set_values: Vec<String>,
    /// Raw overlays, verbatim
    pub raw: Vec<JsonValue>,
}

impl ResolvedValues {
    pub fn is_empty(&self) -> bool {
        self.set_values.is_empty() && self.raw.is_empty()
    }

    /// All raw overlays deep-merged in order
    pub fn merged_raw(&self) -> Values {
        Values::merge_all(&self.raw)
    }

    /// Raw overlays as a multi-document YAML stream, one document each
    pub fn raw_values_yaml(&self) -> Result<String> {
        let mut out = String::new();
        for overlay in &self.raw {
            out.push_str("---\n");
            out.push_str(&serde_yaml::to_string(overlay)?);
        }
        Ok(out)
    }

    /// The tree Helm would see: raw overlays first, assignments on top
    pub fn effective(&self) -> Values {
        let mut values = self.merged_raw();
        for assignment in &self.set_values {
            values.apply_assignment(assignment);
        }
        values
    }
}

/// Values substituted into mapping entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbols {
    pub docker_image_repository: String,
    pub docker_image_tag: String,
    pub kubeit_version: String,
}

impl Symbols {
    /// Symbols for a load; docker sources are split into repository and tag
    pub fn for_source(source: &SourceMeta) -> std::result::Result<Self, LoadError> {
        let (repository, tag) = match source.scheme {
            Scheme::Docker => parse_docker_image(&source.source).map_err(|e| {
                LoadError::value_resolution(format!("failed to parse Docker image: {}", e))
            })?,
            Scheme::File => (REPOSITORY_SENTINEL.to_string(), TAG_SENTINEL.to_string()),
        };

        Ok(Self {
            docker_image_repository: repository,
            docker_image_tag: tag,
            kubeit_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "dockerImageRepository" => Some(&self.docker_image_repository),
            "dockerImageTag" => Some(&self.docker_image_tag),
            "kubeitVersion" => Some(&self.kubeit_version),
            _ => None,
        }
    }

    /// Replace known variables; unknown ones are kept as written
    pub fn substitute(&self, input: &str) -> String {
        VARIABLE
            .replace_all(input, |caps: &Captures| {
                let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                self.lookup(name)
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Resolves value entries against a loaded resource set
///
/// Every `named` entry expands the whole caller scope, including one found
/// inside a NamedValues resource, so such an entry there always resolves to
/// a `CyclicReference`; scopes do not nest.
#[derive(Debug, Clone)]
pub struct ValueResolver<'a> {
    resources: &'a ResourceSet,
    source: &'a SourceMeta,
    named: &'a [String],
}

impl<'a> ValueResolver<'a> {
    pub fn new(resources: &'a ResourceSet, source: &'a SourceMeta) -> Self {
        Self {
            resources,
            source,
            named: &[],
        }
    }

    /// NamedValues resources a `named` entry expands to, in order
    pub fn with_named(mut self, named: &'a [String]) -> Self {
        self.named = named;
        self
    }

    pub fn resolve(&self, entries: &[ValueEntry]) -> std::result::Result<ResolvedValues, LoadError> {
        let symbols = Symbols::for_source(self.source)?;
        let mut resolved = ResolvedValues::default();
        let mut stack = Vec::new();
        self.expand(entries, &symbols, &mut stack, &mut resolved)?;
        debug!(
            "Resolved {} set values and {} raw overlays",
            resolved.set_values.len(),
            resolved.raw.len()
        );
        Ok(resolved)
    }

    fn expand(
        &self,
        entries: &[ValueEntry],
        symbols: &Symbols,
        stack: &mut Vec<String>,
        out: &mut ResolvedValues,
    ) -> std::result::Result<(), LoadError> {
        for entry in entries {
            match entry {
                ValueEntry::Raw(data) => out.raw.push(JsonValue::Object(data.clone())),
                ValueEntry::Mapping(data) => {
                    out.set_values.extend(
                        data.iter()
                            .map(|(key, value)| format!("{}={}", key, symbols.substitute(value))),
                    );
                }
                ValueEntry::Named => {
                    for name in self.named {
                        self.expand_named(name, symbols, stack, out)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn expand_named(
        &self,
        name: &str,
        symbols: &Symbols,
        stack: &mut Vec<String>,
        out: &mut ResolvedValues,
    ) -> std::result::Result<(), LoadError> {
        if stack.iter().any(|seen| seen == name) {
            let mut chain = stack.clone();
            chain.push(name.to_string());
            return Err(LoadError::CyclicReference { chain });
        }

        let named = self
            .resources
            .find::<NamedValuesSpec>(name)
            .ok_or_else(|| {
                LoadError::value_resolution(format!("named values '{}' not found", name))
            })?;

        debug!("Expanding named values {}", name);
        stack.push(name.to_string());
        self.expand(&named.spec.values, symbols, stack, out)?;
        stack.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::meta::API_VERSION_V1ALPHA1;
    use crate::resources::NamedValues;
    use serde_json::json;

    fn named(name: &str, values: Vec<ValueEntry>) -> crate::resources::AnyResource {
        use crate::resources::Spec;
        NamedValuesSpec::into_any(NamedValues::new(
            API_VERSION_V1ALPHA1,
            name,
            NamedValuesSpec { values },
        ))
    }

    fn docker(image: &str) -> SourceMeta {
        SourceMeta::new(Scheme::Docker, image, image)
    }

    fn file() -> SourceMeta {
        SourceMeta::new(Scheme::File, "/cfg", "/cfg")
    }

    fn scope(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_substitution_forms() {
        let symbols = Symbols::for_source(&docker("myrepo/app:v1.2.3")).unwrap();
        assert_eq!(symbols.substitute("$dockerImageTag"), "v1.2.3");
        assert_eq!(symbols.substitute("${dockerImageRepository}:x"), "docker.io/myrepo/app:x");
        assert_eq!(symbols.substitute("$HOME/${unknownVar}"), "$HOME/${unknownVar}");
        assert_eq!(symbols.substitute("v$kubeitVersion"), format!("v{}", env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_file_source_uses_sentinels() {
        let symbols = Symbols::for_source(&file()).unwrap();
        assert_eq!(symbols.substitute("$dockerImageTag"), TAG_SENTINEL);
        assert_eq!(symbols.substitute("${dockerImageRepository}"), REPOSITORY_SENTINEL);
    }

    #[test]
    fn test_unparsable_docker_source() {
        let err = Symbols::for_source(&docker("!!invalid!!")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueResolution);
    }

    #[test]
    fn test_output_follows_entry_order() {
        let resources = ResourceSet::new();
        let source = file();
        let entries = vec![
            ValueEntry::mapping([("b", "2"), ("a", "1")]),
            ValueEntry::Raw(json!({"replicas": 2}).as_object().cloned().unwrap()),
            ValueEntry::mapping([("c", "3")]),
        ];

        let resolved = ValueResolver::new(&resources, &source).resolve(&entries).unwrap();
        assert_eq!(resolved.set_values, vec!["b=2", "a=1", "c=3"]);
        assert_eq!(resolved.raw, vec![json!({"replicas": 2})]);
    }

    #[test]
    fn test_named_expands_scope_in_order() {
        let mut resources = ResourceSet::new();
        resources.push(named("base", vec![ValueEntry::mapping([("X", "1")])]));
        resources.push(named("staging", vec![ValueEntry::mapping([("Y", "$dockerImageTag")])]));

        let source = docker("myrepo/app:v1.2.3");
        let names = scope(&["staging", "base"]);
        let entries = vec![
            ValueEntry::mapping([("first", "yes")]),
            ValueEntry::Named,
            ValueEntry::mapping([("last", "yes")]),
        ];

        let resolved = ValueResolver::new(&resources, &source)
            .with_named(&names)
            .resolve(&entries)
            .unwrap();
        assert_eq!(resolved.set_values, vec!["first=yes", "Y=v1.2.3", "X=1", "last=yes"]);
    }

    #[test]
    fn test_named_without_scope_expands_nothing() {
        let resources = ResourceSet::new();
        let source = file();
        let resolved = ValueResolver::new(&resources, &source)
            .resolve(&[ValueEntry::Named])
            .unwrap();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_unknown_named_reference() {
        let resources = ResourceSet::new();
        let source = file();
        let names = scope(&["missing"]);

        let err = ValueResolver::new(&resources, &source)
            .with_named(&names)
            .resolve(&[ValueEntry::Named])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueResolution);
        assert!(err.to_string().contains("'missing' not found"));
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut resources = ResourceSet::new();
        resources.push(named("loop", vec![ValueEntry::mapping([("A", "1")]), ValueEntry::Named]));

        let source = file();
        let names = scope(&["loop"]);
        let err = ValueResolver::new(&resources, &source)
            .with_named(&names)
            .resolve(&[ValueEntry::Named])
            .unwrap_err();

        assert_eq!(
            err,
            LoadError::CyclicReference {
                chain: vec!["loop".to_string(), "loop".to_string()]
            }
        );
    }

    #[test]
    fn test_effective_values() {
        let resolved = ResolvedValues {
            set_values: vec!["image.tag=v2".to_string()],
            raw: vec![
                json!({"image": {"repository": "nginx", "tag": "v1"}}),
                json!({"replicas": 3}),
            ],
        };

        let effective = resolved.effective();
        assert_eq!(effective.get("image.repository").unwrap(), "nginx");
        assert_eq!(effective.get("image.tag").unwrap(), "v2");
        assert_eq!(effective.get("replicas").unwrap(), 3);

        let yaml = resolved.raw_values_yaml().unwrap();
        assert_eq!(yaml.matches("---\n").count(), 2);
    }
}
