use std::path::Path;

use crate::load;

pub fn execute(catalog_path: Option<&Path>, config_path: Option<&Path>) -> anyhow::Result<()> {
    let catalog = load::catalog(catalog_path)?;
    let config = load::config(config_path)?;
    let report = pmsim_catalog::validate(&catalog, &config.phases);

    for w in &report.warnings {
        println!("warning: {w}");
    }
    for e in &report.errors {
        println!("error: {e}");
    }
    if !report.is_ok() {
        anyhow::bail!("catalog has {} error(s)", report.errors.len());
    }
    println!(
        "ok: {} decision(s), {} warning(s)",
        catalog.len(),
        report.warnings.len()
    );
    Ok(())
}
