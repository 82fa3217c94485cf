//! Loading resources from a directory tree or an image label
//!
//! A [`Loader`] owns its type registry and the resources it decoded, so every
//! load is isolated from any other. Per-document problems never abort a
//! load; they are collected into a [`LoadReport`] keyed by source.

use indexmap::IndexMap;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::document::split_documents;
use crate::error::{LoadError, Result};
use crate::marshal::{decode_label, marshal};
use crate::meta::{LoaderMeta, RESOURCES_LABEL, Scheme, SourceMeta};
use crate::registry::{ResourceSet, TypeRegistry};
use crate::report::LoadReport;
use crate::resolver::{ResolvedValues, ValueResolver};
use crate::resources::{AnyResource, Resource, ValueEntry};
use crate::source::{ImageLabelSource, parse_source_uri};
use crate::validate::validate_resources;

/// File extensions picked up during a directory walk
pub const RESOURCE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

#[derive(Debug, Clone)]
pub struct Loader {
    registry: TypeRegistry,
    resources: ResourceSet,
    meta: Option<LoaderMeta>,
    kinds_count: IndexMap<String, usize>,
    resource_count: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Loader knowing every built-in kind
    pub fn new() -> Self {
        Self::with_registry(TypeRegistry::with_builtin_kinds())
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            resources: ResourceSet::new(),
            meta: None,
            kinds_count: IndexMap::new(),
            resource_count: 0,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Metadata of the last load started through [`Loader::load`]
    pub fn meta(&self) -> Option<&LoaderMeta> {
        self.meta.as_ref()
    }

    pub fn resource_set(&self) -> &ResourceSet {
        &self.resources
    }

    pub fn resource_count(&self) -> usize {
        self.resource_count
    }

    pub fn kinds_count(&self) -> &IndexMap<String, usize> {
        &self.kinds_count
    }

    /// Resources in registry order of kinds, then decode order
    pub fn resources(&self) -> impl Iterator<Item = &AnyResource> {
        self.registry
            .kinds()
            .flat_map(move |kind| self.resources.of_kind(kind).iter())
    }

    /// Decode every document of a stream
    ///
    /// Each document is decoded on its own; the returned errors are in
    /// document order and successfully decoded documents are kept.
    pub fn decode_stream(&mut self, bytes: &[u8], source: &SourceMeta) -> Vec<LoadError> {
        let text = match std::str::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                return vec![LoadError::MetadataDecode {
                    message: format!("input is not valid UTF-8: {}", e),
                }];
            }
        };

        let mut errors = Vec::new();
        for document in split_documents(text) {
            let decoded = document.and_then(|document| {
                let type_meta = document.type_meta()?;

                if type_meta.api_version.is_empty() {
                    return Err(LoadError::MissingTypeMetadata {
                        field: "apiVersion".to_string(),
                    });
                }
                if type_meta.kind.is_empty() {
                    return Err(LoadError::MissingTypeMetadata {
                        field: "kind".to_string(),
                    });
                }

                let decode = self.registry.lookup(&type_meta.kind, &type_meta.api_version)?;
                decode(&document).map_err(|message| LoadError::StrictDecode {
                    kind: type_meta.kind.clone(),
                    message,
                })
            });

            match decoded {
                Ok(mut resource) => {
                    resource.set_source_meta(source.clone());
                    debug!(
                        "Decoded {} {} from {}",
                        resource.kind(),
                        resource.name(),
                        source.source
                    );
                    *self
                        .kinds_count
                        .entry(resource.kind().to_string())
                        .or_default() += 1;
                    self.resource_count += 1;
                    self.resources.push(resource);
                }
                Err(e) => {
                    debug!("Failed to decode document from {}: {}", source.source, e);
                    errors.push(e);
                }
            }
        }

        errors
    }

    /// Load every resource file below `base.source`
    ///
    /// The walk is sorted by file name. Hidden top-level directories and
    /// hidden files are skipped.
    pub fn load_dir(&mut self, base: &SourceMeta) -> LoadReport {
        let mut report = LoadReport::new();
        let root = Path::new(&base.source);

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden_top_level_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .unwrap_or(root)
                        .to_string_lossy()
                        .into_owned();
                    warn!("Failed to access {}: {}", path, e);
                    report.add_error(
                        path.clone(),
                        LoadError::source_access(path, format!("error accessing file: {}", e)),
                    );
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }
            if !is_resource_file(&entry) {
                debug!("Skipping {}", entry.path().display());
                continue;
            }

            let path = entry.path().to_string_lossy().into_owned();
            info!("Loading file: {}", path);

            match std::fs::read(entry.path()) {
                Ok(bytes) => {
                    let errors = self.decode_stream(&bytes, &base.with_source(path.clone()));
                    report.add_errors(path, errors);
                }
                Err(e) => report.add_error(
                    path.clone(),
                    LoadError::source_access(path, format!("failed to read file: {}", e)),
                ),
            }
        }

        report
    }

    /// Load the resources embedded in an image label
    pub fn load_image(&mut self, images: &dyn ImageLabelSource, base: &SourceMeta) -> LoadReport {
        let mut report = LoadReport::new();
        let image = base.source.as_str();
        info!("Loading image: {}", image);

        let labels = match images.labels(image) {
            Ok(labels) => labels,
            Err(message) => {
                report.add_error(image, LoadError::source_access(image, message));
                return report;
            }
        };

        let Some(encoded) = labels.get(RESOURCES_LABEL) else {
            report.add_error(
                image,
                LoadError::source_access(
                    image,
                    format!("image has no {} label", RESOURCES_LABEL),
                ),
            );
            return report;
        };

        match decode_label(encoded) {
            Ok(stream) => {
                let errors = self.decode_stream(stream.as_bytes(), base);
                report.add_errors(image, errors);
            }
            Err(e) => report.add_error(
                image,
                LoadError::source_access(image, format!("failed to decode {} label: {}", RESOURCES_LABEL, e)),
            ),
        }

        report
    }

    /// Parse a source URI and load from it
    ///
    /// A malformed URI is returned as an error since nothing can be located;
    /// everything else ends up in the report.
    pub fn from_source_uri(
        &mut self,
        uri: &str,
        images: &dyn ImageLabelSource,
    ) -> std::result::Result<LoadReport, LoadError> {
        let source = parse_source_uri(uri)?;
        Ok(self.load(source, images))
    }

    /// Load from an already parsed source, then validate
    ///
    /// Validation only runs when decoding produced no errors.
    pub fn load(&mut self, source: SourceMeta, images: &dyn ImageLabelSource) -> LoadReport {
        info!("Loading kubeit resources from {}", source.source_uri);

        let mut report = match source.scheme {
            Scheme::File => self.load_dir(&source),
            Scheme::Docker => self.load_image(images, &source),
        };
        self.meta = Some(LoaderMeta::new(source));

        if report.has_errors() {
            debug!("Skipping validation: {}", report.summary());
        } else {
            report.merge(self.validate());
        }

        report
    }

    pub fn validate(&self) -> LoadReport {
        validate_resources(self.resources())
    }

    /// Serialize every loaded resource as one multi-document stream
    pub fn marshal(&self) -> Result<String> {
        marshal(self.resources())
    }

    /// Resolve value entries against this load
    ///
    /// `named` is the active NamedValues scope expanded by `type: named`.
    pub fn resolve_values(
        &self,
        entries: &[ValueEntry],
        named: &[String],
    ) -> std::result::Result<ResolvedValues, LoadError> {
        let default_source = SourceMeta::default();
        let source = self.meta.as_ref().map_or(&default_source, |m| &m.source);

        ValueResolver::new(&self.resources, source)
            .with_named(named)
            .resolve(entries)
    }

    pub fn log_resources(&self) {
        if self.resource_count == 0 {
            return;
        }
        for (kind, count) in &self.kinds_count {
            info!("{}: {}", kind, count);
        }
        info!("Found {} kubeit resources", self.resource_count);
    }
}

fn is_hidden_top_level_dir(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_type().is_dir() && is_hidden(entry)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// A walk started on a single file loads it whatever its extension
fn is_resource_file(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if is_hidden(entry) {
        return false;
    }
    entry
        .path()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RESOURCE_EXTENSIONS.contains(&ext))
}
