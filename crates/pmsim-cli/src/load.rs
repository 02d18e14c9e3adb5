use anyhow::Context;
use pmsim_catalog::JsonCatalog;
use pmsim_core::SimConfig;
use std::path::Path;

/// `--catalog`, or the bundled scenario.
pub fn catalog(path: Option<&Path>) -> anyhow::Result<JsonCatalog> {
    match path {
        Some(p) => JsonCatalog::load(p),
        None => JsonCatalog::bundled(),
    }
}

/// `--config`, or the built-in defaults.
pub fn config(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    match path {
        Some(p) => SimConfig::load(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(SimConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_paths() {
        assert!(!catalog(None).unwrap().is_empty());
        assert_eq!(config(None).unwrap(), SimConfig::default());
    }

    #[test]
    fn bad_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sim.yaml");
        std::fs::write(&path, "defaults:\n  happiness: 10\n").unwrap();
        let err = config(Some(&path)).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("sim.yaml"));
        assert!(msg.contains("happiness"));
    }
}
