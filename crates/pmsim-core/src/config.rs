//! Simulation configuration: starting metric values and the phase list.
//!
//! Read once at startup from YAML or JSON (picked by file extension). The
//! metric *set* itself is the closed [`Metric`] enum; configuration can only
//! move its starting values.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::content::PhaseDef;
use crate::metric::{clamp_metric, Metric, MetricSnapshot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown metric in config defaults: {0}")]
    UnknownMetric(String),
    #[error("config must declare at least one phase")]
    NoPhases,
    #[error("duplicate phase key: {0}")]
    DuplicatePhase(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting value per metric; omitted metrics keep their reference default.
    #[serde(default)]
    pub defaults: BTreeMap<String, f64>,
    /// Ordered lifecycle phases. The first one is in effect before any decision.
    #[serde(default = "default_phases")]
    pub phases: Vec<PhaseDef>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            defaults: BTreeMap::new(),
            phases: default_phases(),
        }
    }
}

fn default_phases() -> Vec<PhaseDef> {
    vec![
        PhaseDef::new("setup", "Setup"),
        PhaseDef::new("mvp", "MVP"),
        PhaseDef::new("growth", "Growth"),
        PhaseDef::new("scale", "Scale"),
        PhaseDef::new("crisis", "Crisis"),
    ]
}

impl SimConfig {
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        let config: SimConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = self
            .defaults
            .keys()
            .find(|name| Metric::from_name(name).is_none())
        {
            return Err(ConfigError::UnknownMetric(name.clone()));
        }
        if self.phases.is_empty() {
            return Err(ConfigError::NoPhases);
        }
        for (i, phase) in self.phases.iter().enumerate() {
            if self.phases[..i].iter().any(|p| p.key == phase.key) {
                return Err(ConfigError::DuplicatePhase(phase.key.clone()));
            }
        }
        Ok(())
    }

    /// The snapshot a freshly initialized project starts from.
    pub fn initial_metrics(&self) -> MetricSnapshot {
        MetricSnapshot::from_fn(|metric| match self.defaults.get(metric.name()) {
            Some(value) => clamp_metric(*value),
            None => metric.reference_default(),
        })
    }

    /// Key of the phase in effect before any decision is taken.
    pub fn setup_phase(&self) -> &str {
        self.phases.first().map(|p| p.key.as_str()).unwrap_or("setup")
    }

    pub fn phase_label(&self, key: &str) -> Option<&str> {
        self.phases
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.label.as_str())
    }
}
