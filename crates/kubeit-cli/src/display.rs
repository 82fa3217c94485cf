//! Display formatting for CLI output
//!
//! Load reports are shown grouped by source, either coloured for a terminal
//! or as JSON for tooling.

use console::style;
use kubeit_core::{LoadError, LoadReport, Loader};
use miette::Diagnostic;
use serde_json::{Value as JsonValue, json};

/// Display a load report with errors grouped per source
pub fn display_load_report(report: &LoadReport) {
    println!(
        "  {} Loading failed: {}",
        style("✗").red(),
        style(report.summary()).bold()
    );
    println!();

    for (source, errors) in &report.errors_by_source {
        println!(
            "  {} {} ({})",
            style("→").blue(),
            style(source).yellow(),
            pluralize(errors.len(), "error", "errors")
        );

        for error in errors {
            println!("    {} {}", style("✗").red(), error);

            if let Some(help) = error.help() {
                println!("      {} {}", style("hint:").blue(), help);
            }
        }
        println!();
    }
}

/// Per-kind resource counts after a clean load
pub fn display_resource_counts(loader: &Loader) {
    for (kind, count) in loader.kinds_count() {
        println!("    {} {}", style(format!("{:>3}", count)).bold(), kind);
    }
}

/// JSON document describing the outcome of a load
pub fn report_json(loader: &Loader, report: &LoadReport) -> JsonValue {
    json!({
        "valid": !report.has_errors(),
        "source": loader.meta(),
        "resources": loader.resource_count(),
        "kinds": loader.kinds_count(),
        "errors": report.iter().map(|(source, error)| error_json(source, error)).collect::<Vec<_>>(),
    })
}

fn error_json(source: &str, error: &LoadError) -> JsonValue {
    json!({
        "source": source,
        "code": error.kind().as_str(),
        "message": error.to_string(),
        "help": error.help().map(|h| h.to_string()),
    })
}

/// Format a count with the matching noun
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "error", "errors"), "1 error");
        assert_eq!(pluralize(3, "error", "errors"), "3 errors");
    }

    #[test]
    fn test_report_json() {
        let loader = Loader::new();
        let mut report = LoadReport::new();
        report.add_error(
            "/cfg/a.yaml",
            LoadError::KindUnknown {
                kind: "NamedValue".to_string(),
                help: Some("did you mean `NamedValues`?".to_string()),
            },
        );

        let value = report_json(&loader, &report);
        assert_eq!(value["valid"], false);
        assert_eq!(value["resources"], 0);
        assert_eq!(value["errors"][0]["source"], "/cfg/a.yaml");
        assert_eq!(value["errors"][0]["code"], "kind_unknown");
        assert_eq!(value["errors"][0]["help"], "did you mean `NamedValues`?");
    }
}
