use pmsim_core::MetricSnapshot;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::entry::{EntryKind, HistoryEntry, Selection};

/// Label recorded on the step-0 entry.
pub const BASELINE_LABEL: &str = "Project kickoff";

/// A step-0 entry stamped with the current time.
pub fn baseline_entry(phase: &str, metrics: &MetricSnapshot) -> HistoryEntry {
    HistoryEntry {
        step: 0,
        phase: phase.to_string(),
        kind: EntryKind::Baseline,
        option_label: BASELINE_LABEL.to_string(),
        metrics: *metrics,
        at: crate::now_rfc3339(),
    }
}

/// Parameters for appending an applied decision.
pub struct AppendParams<'a> {
    pub phase: &'a str,
    pub decision_id: &'a str,
    pub option_id: &'a str,
    pub option_label: &'a str,
    pub metrics: &'a MetricSnapshot,
}

/// Ordered timeline of snapshots: baseline at step 0, one entry per decision after.
///
/// Steps are positional. The ledger assigns them on append and renumbers
/// them on load, so they always read 0, 1, 2, ... with no gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

/// Stored step numbers are ignored. The baseline must come first and only once.
impl<'de> Deserialize<'de> for HistoryLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut entries = Vec::<HistoryEntry>::deserialize(deserializer)?;
        for (position, entry) in entries.iter_mut().enumerate() {
            if position == 0 && !entry.is_baseline() {
                return Err(de::Error::custom("first history entry must be the baseline"));
            }
            if position > 0 && entry.is_baseline() {
                return Err(de::Error::custom(format!(
                    "baseline entry at position {position}"
                )));
            }
            entry.step = position;
        }
        Ok(Self { entries })
    }
}

impl HistoryLedger {
    /// An empty ledger, as held by an uninitialized project.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger holding only a fresh baseline entry.
    pub fn seeded(phase: &str, metrics: &MetricSnapshot) -> Self {
        Self::from_baseline(baseline_entry(phase, metrics))
    }

    /// A ledger starting from an existing baseline entry, kept as-is apart
    /// from its step.
    pub fn from_baseline(mut baseline: HistoryEntry) -> Self {
        baseline.step = 0;
        baseline.kind = EntryKind::Baseline;
        Self {
            entries: vec![baseline],
        }
    }

    /// Append an applied decision stamped with the current time.
    pub fn append(&mut self, params: &AppendParams<'_>) -> &HistoryEntry {
        self.append_at(params, crate::now_rfc3339())
    }

    /// Append an applied decision with an explicit timestamp.
    pub fn append_at(&mut self, params: &AppendParams<'_>, at: String) -> &HistoryEntry {
        let step = self.entries.len();
        self.entries.push(HistoryEntry {
            step,
            phase: params.phase.to_string(),
            kind: EntryKind::Applied {
                decision_id: params.decision_id.to_string(),
                option_id: params.option_id.to_string(),
            },
            option_label: params.option_label.to_string(),
            metrics: *params.metrics,
            at,
        });
        &self.entries[step]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, step: usize) -> Option<&HistoryEntry> {
        self.entries.get(step)
    }

    pub fn baseline(&self) -> Option<&HistoryEntry> {
        self.entries.first().filter(|e| e.is_baseline())
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Most recent entry that records a real decision.
    pub fn last_applied(&self) -> Option<&HistoryEntry> {
        self.entries.iter().rev().find(|e| !e.is_baseline())
    }

    /// Entries without the baseline.
    pub fn decisions(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter().filter(|e| !e.is_baseline())
    }

    /// Stored choices in step order.
    pub fn selections(&self) -> Vec<Selection> {
        let mut selections: Vec<Selection> =
            self.entries.iter().filter_map(HistoryEntry::selection).collect();
        selections.sort_by_key(|s| s.step);
        selections
    }

    /// Swap in a fully built ledger, returning the previous one.
    pub fn replace(&mut self, next: HistoryLedger) -> HistoryLedger {
        std::mem::replace(self, next)
    }
}
