//! Docker labels command - embed the resources into `docker build` labels

use kubeit_core::docker_label_args;

use crate::error::{CliError, Result};

pub fn run(source: &str) -> Result<()> {
    super::step(format!("Generating Docker labels from {}", source));

    let loader = super::load_clean(source)?;
    if loader.resource_count() == 0 {
        return Err(CliError::validation_with_help(
            format!("no kubeit resources found when traversing: {}", source),
            "resource files need a .yaml, .yml or .json extension",
        ));
    }

    let stream = loader.marshal()?;
    println!("{}", docker_label_args(&stream).join(" "));
    Ok(())
}
