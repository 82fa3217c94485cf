//! CLI commands

pub mod docker_labels;
pub mod export;
pub mod validate;
pub mod values;
pub mod version;

use console::style;
use kubeit_core::{LoadReport, Loader};

use crate::display::display_load_report;
use crate::docker::DockerCli;
use crate::error::{CliError, Result};

/// Load a source, returning the loader and its report as is
pub(crate) fn load(source: &str) -> Result<(Loader, LoadReport)> {
    let mut loader = Loader::new();
    let report = loader.from_source_uri(source, &DockerCli::new())?;
    Ok((loader, report))
}

/// Load a source that must be free of errors
///
/// Problems are displayed on stdout before failing, so the caller only
/// proceeds with a clean, validated resource set.
pub(crate) fn load_clean(source: &str) -> Result<Loader> {
    let (loader, report) = load(source)?;

    if report.has_errors() {
        display_load_report(&report);
        return Err(CliError::from_report(&report));
    }

    loader.log_resources();
    Ok(loader)
}

pub(crate) fn step(message: impl std::fmt::Display) {
    eprintln!("{} {}", style("→").blue(), message);
}
