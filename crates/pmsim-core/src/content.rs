//! Decision content as the engine sees it, and the catalog it is read from.

use serde::{Deserialize, Serialize};

use crate::availability::AvailabilityRule;
use crate::effect::EffectSet;

/// One choice within a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    /// Unique within the parent decision.
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub effects: EffectSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_if: Option<AvailabilityRule>,
}

/// A staged decision the player has to make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub id: String,
    /// Key of the lifecycle phase this decision belongs to.
    pub phase: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub options: Vec<DecisionOption>,
    /// Successor decision; `None` marks the end of the project.
    #[serde(default)]
    pub next_decision_id: Option<String>,
}

impl Decision {
    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_decision_id.is_none()
    }
}

/// An ordered lifecycle stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub key: String,
    pub label: String,
}

impl PhaseDef {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Read-only source of decisions, queried by id.
///
/// Assumed static for the lifetime of a session. Lookups that miss return
/// `None`; the engine decides whether that is an error or a stop condition.
pub trait ContentCatalog {
    fn start_decision_id(&self) -> &str;

    fn decision(&self, id: &str) -> Option<&Decision>;

    fn option<'d>(&self, decision: &'d Decision, option_id: &str) -> Option<&'d DecisionOption> {
        decision.option(option_id)
    }

    /// All decisions, in catalog order.
    fn decisions(&self) -> Vec<&Decision>;

    /// Display title of a decision, falling back to its id.
    fn decision_title(&self, id: &str) -> String {
        match self.decision(id) {
            Some(d) if !d.title.is_empty() => d.title.clone(),
            _ => id.to_string(),
        }
    }
}

impl<T: ContentCatalog + ?Sized> ContentCatalog for &T {
    fn start_decision_id(&self) -> &str {
        (**self).start_decision_id()
    }

    fn decision(&self, id: &str) -> Option<&Decision> {
        (**self).decision(id)
    }

    fn option<'d>(&self, decision: &'d Decision, option_id: &str) -> Option<&'d DecisionOption> {
        (**self).option(decision, option_id)
    }

    fn decisions(&self) -> Vec<&Decision> {
        (**self).decisions()
    }

    fn decision_title(&self, id: &str) -> String {
        (**self).decision_title(id)
    }
}
