use anyhow::Result;
use therapy_core::THERAPY_METHODS;

pub(crate) fn run_methods() -> Result<()> {
    for method in THERAPY_METHODS {
        println!("{:<18} {}", method.key, method.name);
    }
    Ok(())
}
