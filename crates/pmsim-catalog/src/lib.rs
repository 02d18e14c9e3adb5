//! File-backed content catalog.
//!
//! A catalog document is `{ "startDecisionId": ..., "decisions": [...] }`,
//! in JSON or YAML. Lookups go through an id index built at load time.

mod validate;

use anyhow::{Context, Result};
use pmsim_core::{ContentCatalog, Decision};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use validate::{validate, CatalogError, CatalogWarning, ValidationReport};

const BUNDLED_SCENARIO: &str = include_str!("../data/scenario.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    start_decision_id: String,
    decisions: Vec<Decision>,
}

#[derive(Debug, Clone)]
pub struct JsonCatalog {
    doc: CatalogDocument,
    /// Decision id -> position in `doc.decisions`. First occurrence wins.
    index: HashMap<String, usize>,
}

impl JsonCatalog {
    fn from_document(doc: CatalogDocument) -> Self {
        let mut index = HashMap::new();
        for (i, d) in doc.decisions.iter().enumerate() {
            index.entry(d.id.clone()).or_insert(i);
        }
        Self { doc, index }
    }

    pub fn new(start_decision_id: &str, decisions: Vec<Decision>) -> Self {
        Self::from_document(CatalogDocument {
            start_decision_id: start_decision_id.to_string(),
            decisions,
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let doc: CatalogDocument =
            serde_json::from_str(content).context("catalog schema validation failed")?;
        Ok(Self::from_document(doc))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let doc: CatalogDocument =
            serde_yaml::from_str(content).context("catalog schema validation failed")?;
        Ok(Self::from_document(doc))
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
        .with_context(|| format!("loading catalog {}", path.display()))?;
        tracing::debug!(path = %path.display(), decisions = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// The scenario shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_SCENARIO).context("bundled scenario is malformed")
    }

    pub fn len(&self) -> usize {
        self.doc.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc.decisions.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }
}

impl ContentCatalog for JsonCatalog {
    fn start_decision_id(&self) -> &str {
        &self.doc.start_decision_id
    }

    fn decision(&self, id: &str) -> Option<&Decision> {
        self.index.get(id).map(|&i| &self.doc.decisions[i])
    }

    fn decisions(&self) -> Vec<&Decision> {
        self.doc.decisions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmsim_core::Metric;

    #[test]
    fn bundled_scenario_loads() {
        let c = JsonCatalog::bundled().unwrap();
        assert!(!c.is_empty());
        let start = c.decision(c.start_decision_id()).unwrap();
        assert_eq!(start.phase, "mvp");
        assert!(start.options.len() >= 2);
    }

    #[test]
    fn bundled_chain_terminates() {
        let c = JsonCatalog::bundled().unwrap();
        let mut id = Some(c.start_decision_id().to_string());
        let mut hops = 0;
        while let Some(current) = id {
            let d = c.decision(&current).unwrap();
            id = d.next_decision_id.clone();
            hops += 1;
            assert!(hops <= c.len());
        }
        assert_eq!(hops, c.len());
    }

    #[test]
    fn yaml_and_json_agree() {
        let yaml = r#"
startDecisionId: a
decisions:
  - id: a
    phase: mvp
    title: First
    options:
      - id: x
        label: X
        effects: { velocity: 3 }
        availableIf:
          technicalDebt: { lte: 50 }
"#;
        let json = r#"{
  "startDecisionId": "a",
  "decisions": [{
    "id": "a", "phase": "mvp", "title": "First",
    "options": [{ "id": "x", "label": "X", "effects": { "velocity": 3 },
                  "availableIf": { "technicalDebt": { "lte": 50 } } }]
  }]
}"#;
        let from_yaml = JsonCatalog::from_yaml_str(yaml).unwrap();
        let from_json = JsonCatalog::from_json_str(json).unwrap();
        assert_eq!(from_yaml.decision("a"), from_json.decision("a"));
        let opt = from_yaml.decision("a").unwrap().option("x").unwrap();
        assert_eq!(opt.effects.get(Metric::Velocity), 3);
    }

    #[test]
    fn lookups_miss_cleanly() {
        let c = JsonCatalog::bundled().unwrap();
        assert!(c.decision("no-such-decision").is_none());
        let start = c.decision(c.start_decision_id()).unwrap();
        assert!(c.option(start, "no-such-option").is_none());
        assert_eq!(c.decision_title("no-such-decision"), "no-such-decision");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yml");
        std::fs::write(
            &path,
            "startDecisionId: a\ndecisions:\n  - { id: a, phase: mvp, options: [{ id: x, label: X }] }\n",
        )
        .unwrap();
        let c = JsonCatalog::load(&path).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.start_decision_id(), "a");
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonCatalog::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn json_round_trip() {
        let c = JsonCatalog::bundled().unwrap();
        let again = JsonCatalog::from_json_str(&c.to_json_pretty().unwrap()).unwrap();
        assert_eq!(c.decisions(), again.decisions());
    }
}
