//! Source URIs and image label access
//!
//! A load starts from a URI such as `file://./config`, `docker://app:1.2` or
//! a bare path/reference whose scheme is guessed.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::LoadError;
use crate::image_ref::ImageReference;
use crate::meta::{Scheme, SourceMeta};

static SCHEME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z][a-zA-Z0-9+.-]*)://(.*)$").expect("valid scheme regex")
});

/// Resolve a source URI into its scheme and concrete source
///
/// `file` sources are made absolute and `docker` sources are normalized.
/// Without an explicit scheme, an existing path is a file and a reference
/// carrying a tag or digest is an image.
pub fn parse_source_uri(uri: &str) -> Result<SourceMeta, LoadError> {
    if let Some(captures) = SCHEME_PREFIX.captures(uri) {
        let scheme_name = &captures[1];
        let rest = &captures[2];

        let scheme = Scheme::from_name(scheme_name).ok_or_else(|| {
            LoadError::invalid_source_uri(uri, format!("unknown scheme {}", scheme_name))
        })?;

        let source = match scheme {
            Scheme::File => absolute_path(Path::new(rest))
                .map_err(|e| LoadError::invalid_source_uri(uri, e.to_string()))?,
            Scheme::Docker => ImageReference::parse(rest)
                .map_err(|e| LoadError::invalid_source_uri(uri, e.to_string()))?
                .to_string(),
        };

        return Ok(SourceMeta::new(scheme, source, uri));
    }

    let path = Path::new(uri);
    if !uri.is_empty() && path.exists() {
        debug!("URI {} is an existing path, using the file scheme", uri);
        let source =
            absolute_path(path).map_err(|e| LoadError::invalid_source_uri(uri, e.to_string()))?;
        return Ok(SourceMeta::new(Scheme::File, source, uri));
    }

    match ImageReference::parse(uri) {
        Ok(reference) if reference.tag.is_some() || reference.digest.is_some() => {
            debug!("URI {} looks like an image reference, using the docker scheme", uri);
            Ok(SourceMeta::new(Scheme::Docker, reference.to_string(), uri))
        }
        _ => Err(LoadError::invalid_source_uri(
            uri,
            format!("URI {} is not guessable", uri),
        )),
    }
}

fn absolute_path(path: &Path) -> std::io::Result<String> {
    let absolute: PathBuf = if path.as_os_str().is_empty() {
        std::env::current_dir()?
    } else {
        std::path::absolute(path)?
    };
    Ok(absolute.to_string_lossy().into_owned())
}

/// Access to container image labels
///
/// Implementations fetch the image when it is not available locally.
pub trait ImageLabelSource {
    /// All labels of an image, or a human-readable reason it is unavailable
    fn labels(&self, image: &str) -> Result<IndexMap<String, String>, String>;
}

/// In-memory image label store for tests and offline use
#[derive(Debug, Clone, Default)]
pub struct MockImageLabels {
    images: IndexMap<String, IndexMap<String, String>>,
}

impl MockImageLabels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image; the reference is normalized when it parses
    pub fn with_image<I, K, V>(mut self, image: &str, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let key = normalize_key(image);
        self.images.insert(
            key,
            labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }
}

impl ImageLabelSource for MockImageLabels {
    fn labels(&self, image: &str) -> Result<IndexMap<String, String>, String> {
        self.images
            .get(&normalize_key(image))
            .cloned()
            .ok_or_else(|| "failed to find image".to_string())
    }
}

fn normalize_key(image: &str) -> String {
    ImageReference::parse(image)
        .map(|r| r.to_string())
        .unwrap_or_else(|_| image.to_string())
}
