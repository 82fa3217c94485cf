//! Kubeit Core - loading, validation and value resolution for kubeit resources
//!
//! This crate provides the pieces behind the `kubeit` CLI:
//! - `TypeRegistry`: `(kind, apiVersion)` dispatch to strict decoders
//! - `Loader`: directory and image label loading with per-source error reports
//! - `ValueResolver`: named/mapping/raw value expansion with variable substitution
//! - `marshal`: the inverse of decoding, used for image labels

pub mod document;
pub mod error;
pub mod image_ref;
pub mod loader;
pub mod marshal;
pub mod meta;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod resources;
pub mod source;
pub mod validate;
pub mod values;

pub use error::{CoreError, ErrorKind, LoadError};
pub use image_ref::{ImageReference, parse_docker_image};
pub use loader::Loader;
pub use marshal::{decode_label, docker_label_args, encode_label, marshal};
pub use meta::{
    API_GROUP, API_VERSION_V1ALPHA1, LoaderMeta, RESOURCES_LABEL, Scheme, SourceMeta,
    VERSION_LABEL,
};
pub use registry::{ResourceSet, TypeRegistry};
pub use report::LoadReport;
pub use resolver::{REPOSITORY_SENTINEL, ResolvedValues, Symbols, TAG_SENTINEL, ValueResolver};
pub use resources::{
    AnyResource, HelmApplication, HelmApplicationSpec, NamedValues, NamedValuesSpec, Resource,
    Service, ServiceApplication, ServiceApplicationSpec, ServiceSpec, Spec, ValueEntry,
};
pub use source::{ImageLabelSource, MockImageLabels, parse_source_uri};
pub use values::Values;
