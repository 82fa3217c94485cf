//! Validate command - load a source and report every problem found

use console::style;

use crate::display::{display_load_report, display_resource_counts, pluralize, report_json};
use crate::error::{CliError, Result};

pub fn run(source: &str, json_output: bool) -> Result<()> {
    if !json_output {
        println!("{} Validating kubeit resources from {}", style("→").blue(), source);
    }

    let (loader, report) = super::load(source)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report_json(&loader, &report))?);
    } else if report.has_errors() {
        println!();
        display_load_report(&report);
    } else {
        println!(
            "  {} Loaded {}",
            style("✓").green(),
            pluralize(loader.resource_count(), "resource", "resources")
        );
        display_resource_counts(&loader);
        println!();
        println!("{} Validation passed!", style("✓").green().bold());
    }

    if report.has_errors() {
        return Err(CliError::from_report(&report));
    }
    Ok(())
}
