use pmsim_core::MetricSnapshot;
use pmsim_ledger::HistoryLedger;
use serde::{Deserialize, Serialize};

/// Metadata fixed when the project is initialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub team_size: u32,
    pub domain: String,
}

impl ProjectMeta {
    pub fn new(name: &str, team_size: u32, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            team_size,
            domain: domain.to_string(),
        }
    }
}

/// Everything one simulated project owns.
///
/// Read freely through the accessors; mutated only by [`crate::Session`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    /// `Some` once the project is initialized.
    pub(crate) project: Option<ProjectMeta>,
    pub(crate) metrics: MetricSnapshot,
    /// Frozen at init; the origin of every replay.
    pub(crate) baseline: MetricSnapshot,
    pub(crate) history: HistoryLedger,
    /// Decision the player must re-make after a replay stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) override_next: Option<String>,
}

impl ProjectState {
    /// The uninitialized state, holding `metrics` as both current and baseline.
    pub fn empty(metrics: MetricSnapshot) -> Self {
        Self {
            project: None,
            metrics,
            baseline: metrics,
            history: HistoryLedger::new(),
            override_next: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.project.is_some()
    }

    pub fn project(&self) -> Option<&ProjectMeta> {
        self.project.as_ref()
    }

    pub fn metrics(&self) -> &MetricSnapshot {
        &self.metrics
    }

    pub fn baseline(&self) -> &MetricSnapshot {
        &self.baseline
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn override_next(&self) -> Option<&str> {
        self.override_next.as_deref()
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::empty(MetricSnapshot::reference_defaults())
    }
}
