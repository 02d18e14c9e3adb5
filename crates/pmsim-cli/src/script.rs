//! Playthrough scripts.
//!
//! ```yaml
//! project: { name: Atlas, team_size: 6, domain: fintech }
//! actions:
//!   - apply: { decision: mvp-architecture, option: monolith }
//!   - revise: { step: 1, decision: mvp-architecture, option: serverless }
//! ```

use anyhow::Context;
use pmsim_engine::ProjectMeta;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub project: ProjectInfo,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub team_size: u32,
    pub domain: String,
}

impl ProjectInfo {
    pub fn meta(&self) -> ProjectMeta {
        ProjectMeta::new(&self.name, self.team_size, &self.domain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Apply {
        decision: String,
        option: String,
    },
    Revise {
        step: usize,
        decision: String,
        option: String,
    },
}

impl Script {
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        // Go through a JSON value so actions parse as single-key maps, the
        // same shape as the JSON form.
        let value: serde_json::Value = serde_yaml::from_str(content)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
        .with_context(|| format!("parsing script {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_actions() {
        let yaml = r#"
project:
  name: Atlas
  team_size: 6
  domain: fintech
actions:
  - apply: { decision: a, option: x }
  - revise: { step: 1, decision: a, option: y }
"#;
        let s = Script::from_yaml_str(yaml).unwrap();
        assert_eq!(s.project.meta(), ProjectMeta::new("Atlas", 6, "fintech"));
        assert_eq!(
            s.actions,
            vec![
                Action::Apply {
                    decision: "a".into(),
                    option: "x".into()
                },
                Action::Revise {
                    step: 1,
                    decision: "a".into(),
                    option: "y".into()
                },
            ]
        );
    }

    #[test]
    fn parses_json_without_actions() {
        let json = serde_json::json!({
            "project": { "name": "Solo", "team_size": 1, "domain": "games" }
        });
        let s = Script::from_json_str(&json.to_string()).unwrap();
        assert!(s.actions.is_empty());
    }

    #[test]
    fn rejects_unknown_action() {
        let yaml = "project: { name: A, team_size: 1, domain: d }\nactions:\n  - undo: {}\n";
        assert!(Script::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{"project":{"name":"A","team_size":2,"domain":"d"},"actions":[{"apply":{"decision":"a","option":"x"}}]}"#,
        )
        .unwrap();
        let s = Script::load(&path).unwrap();
        assert_eq!(s.actions.len(), 1);
    }
}
