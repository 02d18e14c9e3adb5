use pmsim_core::MetricSnapshot;
use serde::{Deserialize, Serialize};

/// What produced a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// Step 0: the project as it stood before any decision.
    Baseline,
    /// A decision applied with the given option.
    Applied {
        decision_id: String,
        option_id: String,
    },
}

/// One snapshot in the project timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Position in the ledger; 0 is the baseline.
    pub step: usize,
    pub phase: String,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub option_label: String,
    /// Metrics after this step, owned by the entry.
    pub metrics: MetricSnapshot,
    /// RFC3339 creation time.
    pub at: String,
}

impl HistoryEntry {
    pub fn is_baseline(&self) -> bool {
        matches!(self.kind, EntryKind::Baseline)
    }

    pub fn decision_id(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Baseline => None,
            EntryKind::Applied { decision_id, .. } => Some(decision_id),
        }
    }

    pub fn option_id(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Baseline => None,
            EntryKind::Applied { option_id, .. } => Some(option_id),
        }
    }

    /// The stored choice behind this entry; `None` for the baseline.
    pub fn selection(&self) -> Option<Selection> {
        match &self.kind {
            EntryKind::Baseline => None,
            EntryKind::Applied {
                decision_id,
                option_id,
            } => Some(Selection {
                step: self.step,
                decision_id: decision_id.clone(),
                option_id: option_id.clone(),
            }),
        }
    }
}

/// A user's choice at one step, the minimum needed to replay it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub step: usize,
    pub decision_id: String,
    pub option_id: String,
}
