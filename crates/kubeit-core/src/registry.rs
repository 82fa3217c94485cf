//! Type registry and typed resource collection
//!
//! The registry maps `(kind, apiVersion)` to a decode function producing the
//! matching [`AnyResource`] variant. It is an ordinary value built by the
//! [`Loader`](crate::loader::Loader), so independent loads never share state.

use indexmap::IndexMap;
use std::fmt;

use crate::document::Document;
use crate::error::LoadError;
use crate::meta::API_VERSION_V1ALPHA1;
use crate::resources::{
    AnyResource, HelmApplicationSpec, NamedValuesSpec, Object, Resource, ServiceApplicationSpec,
    ServiceSpec, Spec,
};

/// Maximum edit distance for "did you mean" hints on unknown kinds
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Strictly decode a document into one resource variant
pub type DecodeFn = fn(&Document) -> Result<AnyResource, String>;

/// Decode function for a spec type, usable as a [`DecodeFn`]
pub fn decode_as<S: Spec>(document: &Document) -> Result<AnyResource, String> {
    document.decode::<Object<S>>().map(S::into_any)
}

#[derive(Clone, Default)]
pub struct TypeRegistry {
    kinds: IndexMap<String, IndexMap<String, DecodeFn>>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.kinds.iter().map(|(kind, versions)| (kind, versions.keys().collect::<Vec<_>>())))
            .finish()
    }
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in kind, in their canonical order
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        registry.register_spec::<HelmApplicationSpec>(API_VERSION_V1ALPHA1);
        registry.register_spec::<NamedValuesSpec>(API_VERSION_V1ALPHA1);
        registry.register_spec::<ServiceSpec>(API_VERSION_V1ALPHA1);
        registry.register_spec::<ServiceApplicationSpec>(API_VERSION_V1ALPHA1);
        registry
    }

    /// Associate a `(kind, version)` pair with a decoder
    ///
    /// Registering the same pair again replaces the previous decoder; the
    /// kind keeps its original position in the enumeration order.
    pub fn register(&mut self, kind: impl Into<String>, version: impl Into<String>, decode: DecodeFn) {
        self.kinds
            .entry(kind.into())
            .or_default()
            .insert(version.into(), decode);
    }

    pub fn register_spec<S: Spec>(&mut self, version: &str) {
        self.register(S::KIND, version, decode_as::<S>);
    }

    /// Find the decoder for a `(kind, version)` pair
    pub fn lookup(&self, kind: &str, version: &str) -> Result<DecodeFn, LoadError> {
        let Some(versions) = self.kinds.get(kind) else {
            return Err(LoadError::KindUnknown {
                kind: kind.to_string(),
                help: self.suggest_kind(kind),
            });
        };

        versions.get(version).copied().ok_or_else(|| {
            let supported: Vec<&str> = versions.keys().map(String::as_str).collect();
            LoadError::VersionUnsupported {
                kind: kind.to_string(),
                version: version.to_string(),
                help: Some(format!("supported versions: {}", supported.join(", "))),
            }
        })
    }

    /// Registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    pub fn versions(&self, kind: &str) -> Vec<&str> {
        self.kinds
            .get(kind)
            .map(|v| v.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn suggest_kind(&self, kind: &str) -> Option<String> {
        let lowered = kind.to_lowercase();
        self.kinds
            .keys()
            .map(|candidate| (strsim::levenshtein(&lowered, &candidate.to_lowercase()), candidate))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| format!("did you mean `{}`?", candidate))
    }
}

/// Decoded resources, grouped per kind in decode order
#[derive(Debug, Clone, Default)]
pub struct ResourceSet {
    by_kind: IndexMap<String, Vec<AnyResource>>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource to the collection of its kind
    pub fn push(&mut self, resource: AnyResource) {
        self.by_kind
            .entry(resource.kind().to_string())
            .or_default()
            .push(resource);
    }

    /// All resources of one kind, in decode order
    pub fn of_kind(&self, kind: &str) -> &[AnyResource] {
        self.by_kind.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All resources of one spec type, in decode order
    pub fn of_type<'a, S: Spec + 'a>(&'a self) -> impl Iterator<Item = &'a Object<S>> {
        self.of_kind(S::KIND).iter().filter_map(S::from_any)
    }

    pub fn find<'a, S: Spec + 'a>(&'a self, name: &str) -> Option<&'a Object<S>> {
        self.of_type::<S>().find(|r| r.metadata.name == name)
    }

    pub fn len(&self) -> usize {
        self.by_kind.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
