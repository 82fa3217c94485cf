//! CLI error types with exit code handling

use kubeit_core::{CoreError, ErrorKind, LoadError, LoadReport};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Resources failed to decode or validate
    #[error("Validation failed: {message}")]
    #[diagnostic(code(kubeit::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The source could not be located or read
    #[error("Load failed: {message}")]
    #[diagnostic(code(kubeit::cli::load))]
    Load {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error: {message}")]
    #[diagnostic(code(kubeit::cli::io))]
    Io { message: String },

    #[error("{message}")]
    #[diagnostic(code(kubeit::cli::error))]
    Other { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Load { .. } => exit_codes::LOAD_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Other { .. } => exit_codes::ERROR,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: None,
        }
    }

    pub fn validation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::Load {
            message: message.into(),
            help: None,
        }
    }

    /// Error for a failed load, classified by what went wrong
    ///
    /// Any source access problem makes it a load failure; otherwise the
    /// documents were readable but wrong.
    pub fn from_report(report: &LoadReport) -> Self {
        if report.count_kind(ErrorKind::SourceAccess) > 0 {
            Self::load(report.summary())
        } else {
            Self::validation(report.summary())
        }
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let help = err.help().map(|h| h.to_string());
        match err.kind() {
            ErrorKind::InvalidSourceUri | ErrorKind::SourceAccess => CliError::Load {
                message: err.to_string(),
                help,
            },
            _ => CliError::Validation {
                message: err.to_string(),
                help,
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => e.into(),
            other => CliError::Other {
                message: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Other {
            message: format!("Failed to serialize JSON output: {}", err),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::validation("x").exit_code(), 2);
        assert_eq!(CliError::load("x").exit_code(), 4);
        assert_eq!(
            CliError::from(std::io::Error::other("closed")).exit_code(),
            5
        );
    }

    #[test]
    fn test_load_error_classification() {
        let err: CliError = LoadError::invalid_source_uri("s3://x", "unknown scheme s3").into();
        assert!(matches!(err, CliError::Load { .. }));

        let err: CliError = LoadError::value_resolution("named values 'x' not found").into();
        assert!(matches!(err, CliError::Validation { .. }));
    }

    #[test]
    fn test_report_classification() {
        let mut report = LoadReport::new();
        report.add_error(
            "/cfg/a.yaml",
            LoadError::MetadataDecode {
                message: "bad".to_string(),
            },
        );
        assert_eq!(CliError::from_report(&report).exit_code(), 2);

        report.add_error("/cfg", LoadError::source_access("/cfg", "error accessing file"));
        assert_eq!(CliError::from_report(&report).exit_code(), 4);
    }
}
