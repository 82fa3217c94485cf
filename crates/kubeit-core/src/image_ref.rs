//! Container image reference parsing and normalization
//!
//! Parsing is delegated to `oci_distribution::Reference`, which applies the
//! Docker distribution rules: a missing registry becomes `docker.io`,
//! `index.docker.io` is folded into it and single-component names on
//! `docker.io` live under `library/`.
//!
//! ```text
//! alpine:latest                  -> docker.io/library/alpine:latest
//! myrepo/app:v1.2.3              -> docker.io/myrepo/app:v1.2.3
//! registry.local:5000/team/app   -> registry.local:5000/team/app
//! ```

use oci_distribution::Reference;
use std::fmt;

use crate::error::{CoreError, Result};

/// A normalized image reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    pub domain: String,
    pub path: String,
    /// Only set when the reference spelled out a tag
    pub tag: Option<String>,
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse and normalize a reference such as `nginx:1.25` or
    /// `ghcr.io/org/app@sha256:...`
    pub fn parse(input: &str) -> Result<Self> {
        let reference =
            Reference::try_from(input).map_err(|e| CoreError::InvalidImageReference {
                reference: input.to_string(),
                message: e.to_string(),
            })?;

        // `Reference` falls back to `latest`; keep only a tag that was written
        let tag = if has_explicit_tag(input) {
            reference.tag().map(str::to_string)
        } else {
            None
        };

        Ok(Self {
            domain: reference.registry().to_string(),
            path: reference.repository().to_string(),
            tag,
            digest: reference.digest().map(str::to_string),
        })
    }

    /// Repository without tag or digest, e.g. `docker.io/library/nginx`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.domain, self.path)
    }

    /// Tag, or an empty string when the reference has none
    pub fn tag_or_empty(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.path)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

/// A tag colon sits after the last `/`; earlier colons belong to a port
fn has_explicit_tag(input: &str) -> bool {
    let name = input.split_once('@').map_or(input, |(name, _)| name);
    let last_component = name.rsplit_once('/').map_or(name, |(_, last)| last);
    last_component.contains(':')
}

/// Split an image reference into `(repository, tag)`
///
/// The tag is empty when the reference does not carry one.
pub fn parse_docker_image(input: &str) -> Result<(String, String)> {
    let reference = ImageReference::parse(input)?;
    Ok((reference.repository(), reference.tag_or_empty().to_string()))
}
