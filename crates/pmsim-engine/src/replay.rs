//! Deterministic rebuild of the ledger from the baseline and a selection list.
//!
//! The walk is a full rebuild rather than a patch: availability can depend on
//! any earlier metric, so an edit at step k can change what is legal at any
//! later step.

use pmsim_core::{apply_effects, is_available, ContentCatalog, MetricSnapshot};
use pmsim_ledger::{AppendParams, HistoryEntry, HistoryLedger, Selection};
use serde::Serialize;

/// Why a replay stopped before the end of the selection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// The decision is no longer in the catalog.
    MissingDecision,
    /// The decision exists but the stored option does not.
    MissingOption,
    /// The stored option fails its availability rule on the new timeline.
    Unavailable,
}

/// Terminal state of a revision. Truncation is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RevisionOutcome {
    /// Every selection was re-applied.
    Complete,
    /// The walk stopped at `decision_id`; it and every later selection were dropped.
    Truncated {
        /// Step the stopped decision would have occupied.
        at_step: usize,
        decision_id: String,
        reason: TruncationReason,
        /// Selections discarded, the stopped one included.
        dropped: usize,
    },
}

impl RevisionOutcome {
    pub fn is_truncated(&self) -> bool {
        matches!(self, RevisionOutcome::Truncated { .. })
    }

    /// Decision the player must re-make, if any.
    pub fn stopped_at(&self) -> Option<&str> {
        match self {
            RevisionOutcome::Complete => None,
            RevisionOutcome::Truncated { decision_id, .. } => Some(decision_id),
        }
    }
}

/// A fully rebuilt (ledger, snapshot) pair, ready to be committed.
pub(crate) struct Replay {
    pub ledger: HistoryLedger,
    pub metrics: MetricSnapshot,
    pub outcome: RevisionOutcome,
}

/// Rebuild from `baseline_entry` by walking `selections` in step order.
///
/// An entry identical to the one `prior` holds at the same step keeps its
/// original timestamp, so replaying an unchanged timeline reproduces it exactly.
pub(crate) fn replay<C: ContentCatalog + ?Sized>(
    catalog: &C,
    baseline_entry: HistoryEntry,
    baseline_metrics: MetricSnapshot,
    selections: &[Selection],
    prior: &HistoryLedger,
) -> Replay {
    let mut baseline_entry = baseline_entry;
    baseline_entry.metrics = baseline_metrics;
    let mut ledger = HistoryLedger::from_baseline(baseline_entry);
    let mut working = baseline_metrics;

    for (i, sel) in selections.iter().enumerate() {
        let stop = |reason: TruncationReason| {
            tracing::info!(
                step = sel.step,
                decision_id = %sel.decision_id,
                option_id = %sel.option_id,
                ?reason,
                "replay truncated"
            );
            RevisionOutcome::Truncated {
                at_step: ledger.len(),
                decision_id: sel.decision_id.clone(),
                reason,
                dropped: selections.len() - i,
            }
        };

        let Some(decision) = catalog.decision(&sel.decision_id) else {
            let outcome = stop(TruncationReason::MissingDecision);
            return Replay { ledger, metrics: working, outcome };
        };
        let Some(option) = catalog.option(decision, &sel.option_id) else {
            let outcome = stop(TruncationReason::MissingOption);
            return Replay { ledger, metrics: working, outcome };
        };
        if !is_available(option, &working) {
            let outcome = stop(TruncationReason::Unavailable);
            return Replay { ledger, metrics: working, outcome };
        }

        let next = apply_effects(&working, &option.effects);
        let params = AppendParams {
            phase: &decision.phase,
            decision_id: &decision.id,
            option_id: &option.id,
            option_label: &option.label,
            metrics: &next,
        };
        let at = prior
            .get(ledger.len())
            .filter(|old| same_entry(old, &params))
            .map(|old| old.at.clone())
            .unwrap_or_else(pmsim_ledger::now_rfc3339);
        let entry = ledger.append_at(&params, at);
        tracing::debug!(step = entry.step, decision_id = %decision.id, option_id = %option.id, "replayed step");
        working = next;
    }

    Replay {
        ledger,
        metrics: working,
        outcome: RevisionOutcome::Complete,
    }
}

fn same_entry(old: &HistoryEntry, params: &AppendParams<'_>) -> bool {
    old.decision_id() == Some(params.decision_id)
        && old.option_id() == Some(params.option_id)
        && old.phase == params.phase
        && old.option_label == params.option_label
        && old.metrics == *params.metrics
}
