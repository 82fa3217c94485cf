//! Export command - print the loaded resources as one YAML stream

use crate::error::Result;

pub fn run(source: &str) -> Result<()> {
    let loader = super::load_clean(source)?;
    print!("{}", loader.marshal()?);
    Ok(())
}
