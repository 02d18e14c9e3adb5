use std::path::Path;

use crate::{load, render};

/// Print the effective config as YAML, followed by the starting snapshot it yields.
pub fn execute(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load::config(config_path)?;
    print!("{}", serde_yaml::to_string(&config)?);
    println!("# initial metrics: {}", render::metrics_line(&config.initial_metrics()));
    Ok(())
}
