//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - documents decoded badly or failed validation
pub const VALIDATION_ERROR: i32 = 2;

/// Load error - bad source URI, unreadable file, missing image or label
pub const LOAD_ERROR: i32 = 4;

/// IO error - writing output failed
pub const IO_ERROR: i32 = 5;
