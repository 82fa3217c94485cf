//! Values command - resolve the Helm values of a HelmApplication

use console::style;
use kubeit_core::HelmApplicationSpec;

use crate::error::{CliError, Result};

pub fn run(source: &str, application: &str, named: &[String], effective: bool) -> Result<()> {
    super::step(format!("Resolving values of {} from {}", application, source));

    let loader = super::load_clean(source)?;
    let resources = loader.resource_set();

    let Some(app) = resources.find::<HelmApplicationSpec>(application) else {
        let available: Vec<&str> = resources
            .of_type::<HelmApplicationSpec>()
            .map(|r| r.metadata.name.as_str())
            .collect();
        return Err(CliError::validation_with_help(
            format!("HelmApplication {} not found", application),
            if available.is_empty() {
                "no HelmApplication resources were loaded".to_string()
            } else {
                format!("available applications: {}", available.join(", "))
            },
        ));
    };

    let resolved = loader.resolve_values(&app.spec.values, named)?;

    if effective {
        print!("{}", resolved.effective().to_yaml()?);
        return Ok(());
    }

    for assignment in &resolved.set_values {
        println!("--set {}", assignment);
    }
    if !resolved.raw.is_empty() {
        eprintln!(
            "{} {} raw values overlay(s)",
            style("→").blue(),
            resolved.raw.len()
        );
        print!("{}", resolved.raw_values_yaml()?);
    }

    Ok(())
}
