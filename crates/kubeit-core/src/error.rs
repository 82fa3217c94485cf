//! Core error types
//!
//! Two families live here:
//! - [`CoreError`]: fatal library errors returned through `Result`
//! - [`LoadError`]: per-document and per-resource diagnostics that are
//!   collected into a [`LoadReport`](crate::report::LoadReport) instead of
//!   aborting a load

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid image reference '{reference}': {message}")]
    InvalidImageReference { reference: String, message: String },

    #[error("Failed to serialize {kind} {name}: {message}")]
    Marshal {
        kind: String,
        name: String,
        message: String,
    },

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// Discriminant of a [`LoadError`], handy for matching in tests and for
/// machine-readable output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MetadataDecode,
    MissingTypeMetadata,
    KindUnknown,
    VersionUnsupported,
    StrictDecode,
    FieldValidation,
    Uniqueness,
    ValueResolution,
    CyclicReference,
    SourceAccess,
    InvalidSourceUri,
}

impl ErrorKind {
    /// Stable code string used in JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetadataDecode => "metadata_decode",
            Self::MissingTypeMetadata => "missing_type_metadata",
            Self::KindUnknown => "kind_unknown",
            Self::VersionUnsupported => "version_unsupported",
            Self::StrictDecode => "strict_decode",
            Self::FieldValidation => "field_validation",
            Self::Uniqueness => "uniqueness",
            Self::ValueResolution => "value_resolution",
            Self::CyclicReference => "cyclic_reference",
            Self::SourceAccess => "source_access",
            Self::InvalidSourceUri => "invalid_source_uri",
        }
    }
}

/// A single load, validation or resolution failure
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The `apiVersion`/`kind` envelope could not be parsed
    #[error("failed to decode type metadata: {message}")]
    #[diagnostic(code(kubeit::load::metadata_decode))]
    MetadataDecode { message: String },

    #[error("document has an empty {field}")]
    #[diagnostic(
        code(kubeit::load::missing_type_metadata),
        help("every document needs both `apiVersion` and `kind`")
    )]
    MissingTypeMetadata { field: String },

    #[error("unknown kind: {kind}")]
    #[diagnostic(code(kubeit::load::kind_unknown))]
    KindUnknown {
        kind: String,
        #[help]
        help: Option<String>,
    },

    #[error("unknown version {version} for kind {kind}")]
    #[diagnostic(code(kubeit::load::version_unsupported))]
    VersionUnsupported {
        kind: String,
        version: String,
        #[help]
        help: Option<String>,
    },

    /// Unknown field or type mismatch in the full document
    #[error("failed to unmarshal {kind}: {message}")]
    #[diagnostic(code(kubeit::load::strict_decode))]
    StrictDecode { kind: String, message: String },

    #[error("Resource of kind {kind} with name {name} has errors: {field}: {message}")]
    #[diagnostic(code(kubeit::validate::field))]
    FieldValidation {
        kind: String,
        name: String,
        field: String,
        message: String,
    },

    #[error("Resource of kind {kind} with name {name} is not unique. Already seen in: {first_source}")]
    #[diagnostic(code(kubeit::validate::uniqueness))]
    Uniqueness {
        kind: String,
        name: String,
        first_source: String,
    },

    #[error("failed to resolve values: {message}")]
    #[diagnostic(code(kubeit::values::resolution))]
    ValueResolution { message: String },

    #[error("cyclic named values reference: {}", .chain.join(" -> "))]
    #[diagnostic(
        code(kubeit::values::cycle),
        help("a NamedValues resource must not reach itself through `type: named` entries")
    )]
    CyclicReference { chain: Vec<String> },

    /// Unreadable file, unwalkable directory, missing image or label
    #[error("{message}: {path}")]
    #[diagnostic(code(kubeit::source::access))]
    SourceAccess { path: String, message: String },

    #[error("invalid source URI '{uri}': {message}")]
    #[diagnostic(code(kubeit::source::uri))]
    InvalidSourceUri { uri: String, message: String },
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MetadataDecode { .. } => ErrorKind::MetadataDecode,
            Self::MissingTypeMetadata { .. } => ErrorKind::MissingTypeMetadata,
            Self::KindUnknown { .. } => ErrorKind::KindUnknown,
            Self::VersionUnsupported { .. } => ErrorKind::VersionUnsupported,
            Self::StrictDecode { .. } => ErrorKind::StrictDecode,
            Self::FieldValidation { .. } => ErrorKind::FieldValidation,
            Self::Uniqueness { .. } => ErrorKind::Uniqueness,
            Self::ValueResolution { .. } => ErrorKind::ValueResolution,
            Self::CyclicReference { .. } => ErrorKind::CyclicReference,
            Self::SourceAccess { .. } => ErrorKind::SourceAccess,
            Self::InvalidSourceUri { .. } => ErrorKind::InvalidSourceUri,
        }
    }

    pub fn source_access(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceAccess {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn value_resolution(message: impl Into<String>) -> Self {
        Self::ValueResolution {
            message: message.into(),
        }
    }

    pub fn invalid_source_uri(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSourceUri {
            uri: uri.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniqueness_message_names_first_source() {
        let err = LoadError::Uniqueness {
            kind: "NamedValues".to_string(),
            name: "staging".to_string(),
            first_source: "/cfg/a.yaml".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Resource of kind NamedValues with name staging is not unique. Already seen in: /cfg/a.yaml"
        );
        assert_eq!(err.kind(), ErrorKind::Uniqueness);
    }

    #[test]
    fn test_cyclic_reference_joins_chain() {
        let err = LoadError::CyclicReference {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(err.to_string(), "cyclic named values reference: a -> b -> a");
    }

    #[test]
    fn test_kind_codes_are_snake_case() {
        assert_eq!(ErrorKind::KindUnknown.as_str(), "kind_unknown");
        assert_eq!(ErrorKind::StrictDecode.as_str(), "strict_decode");
    }
}
