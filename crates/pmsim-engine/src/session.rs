use pmsim_core::{
    apply_effects, is_available, ContentCatalog, Decision, DecisionOption, EngineError,
    MetricSnapshot, PhaseDef, SimConfig,
};
use pmsim_ledger::{baseline_entry, AppendParams, HistoryEntry, HistoryLedger, Selection};
use tracing::{debug, info, warn};

use crate::replay::{replay, RevisionOutcome};
use crate::state::{ProjectMeta, ProjectState};

/// An option together with whether it can be chosen right now.
#[derive(Debug, Clone, Copy)]
pub struct OptionView<'a> {
    pub option: &'a DecisionOption,
    pub available: bool,
}

/// One simulated project played against a content catalog.
///
/// The single owner of a [`ProjectState`]. Every mutation goes through
/// [`Session::apply_decision`] or [`Session::revise_decision`] (plus init and
/// reset), and each one either commits a consistent (ledger, metrics) pair or
/// fails before touching anything.
pub struct Session<C> {
    catalog: C,
    config: SimConfig,
    state: ProjectState,
}

impl<C: ContentCatalog> Session<C> {
    pub fn new(catalog: C, config: SimConfig) -> Self {
        let state = ProjectState::empty(config.initial_metrics());
        Self {
            catalog,
            config,
            state,
        }
    }

    /// Resume from a previously captured state.
    pub fn with_state(catalog: C, config: SimConfig, state: ProjectState) -> Self {
        Self {
            catalog,
            config,
            state,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &ProjectState {
        &self.state
    }

    pub fn into_state(self) -> ProjectState {
        self.state
    }

    // ── Lifecycle ──

    /// Return to the empty, uninitialized state.
    pub fn reset(&mut self) {
        self.state = ProjectState::empty(self.config.initial_metrics());
        info!("project reset");
    }

    /// Start a new project: metadata, default metrics, and the step-0 baseline.
    pub fn init_project(&mut self, project: ProjectMeta) {
        let metrics = self.config.initial_metrics();
        info!(name = %project.name, team_size = project.team_size, domain = %project.domain, "project initialized");
        self.state = ProjectState {
            project: Some(project),
            metrics,
            baseline: metrics,
            history: HistoryLedger::seeded(self.config.setup_phase(), &metrics),
            override_next: None,
        };
    }

    // ── Forward path ──

    /// Apply `option_id` of `decision_id` on top of the current metrics.
    ///
    /// Availability is not re-checked here; callers are expected to offer only
    /// available options (see [`Session::available_options`]). The replay path
    /// does check it.
    pub fn apply_decision(
        &mut self,
        decision_id: &str,
        option_id: &str,
    ) -> Result<&HistoryEntry, EngineError> {
        self.require_initialized()?;
        let decision = self
            .catalog
            .decision(decision_id)
            .ok_or_else(|| EngineError::DecisionNotFound(decision_id.to_string()))?;
        let option = self.catalog.option(decision, option_id).ok_or_else(|| {
            EngineError::OptionNotFound {
                decision_id: decision_id.to_string(),
                option_id: option_id.to_string(),
            }
        })?;

        if !is_available(option, &self.state.metrics) {
            warn!(decision_id, option_id, "applying an option that is not currently available");
        }

        let next = apply_effects(&self.state.metrics, &option.effects);
        self.state.override_next = None;
        self.state.metrics = next;
        let entry = self.state.history.append(&AppendParams {
            phase: &decision.phase,
            decision_id: &decision.id,
            option_id: &option.id,
            option_label: &option.label,
            metrics: &next,
        });
        debug!(step = entry.step, decision_id, option_id, "applied decision");
        Ok(entry)
    }

    // ── Replay path ──

    /// Change the option chosen at `step` and rebuild every later snapshot.
    ///
    /// `decision_id` must match the decision recorded at `step`. The rebuild
    /// stops at the first selection that no longer resolves or is no longer
    /// available; that decision becomes the next one to make.
    pub fn revise_decision(
        &mut self,
        step: usize,
        decision_id: &str,
        option_id: &str,
    ) -> Result<RevisionOutcome, EngineError> {
        self.require_initialized()?;
        if step == 0 {
            return Err(EngineError::InvalidStep(step));
        }

        let mut selections = self.state.history.selections();
        let target = selections
            .iter_mut()
            .find(|s| s.step == step)
            .ok_or(EngineError::StepNotFound(step))?;
        if target.decision_id != decision_id {
            return Err(EngineError::DecisionMismatch {
                step,
                expected: decision_id.to_string(),
                recorded: target.decision_id.clone(),
            });
        }
        target.option_id = option_id.to_string();

        let origin = match self.state.history.baseline() {
            Some(entry) => entry.clone(),
            None => baseline_entry(self.config.setup_phase(), &self.state.baseline),
        };
        let rebuilt = replay(
            &self.catalog,
            origin,
            self.state.baseline,
            &selections,
            &self.state.history,
        );

        let previous = self.state.history.replace(rebuilt.ledger);
        debug!(
            step,
            decision_id,
            option_id,
            steps = self.state.history.len(),
            previous_steps = previous.len(),
            "revision rebuilt ledger"
        );
        self.state.metrics = rebuilt.metrics;
        self.state.override_next = rebuilt.outcome.stopped_at().map(str::to_string);
        Ok(rebuilt.outcome)
    }

    // ── Queries ──

    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    pub fn project(&self) -> Option<&ProjectMeta> {
        self.state.project()
    }

    pub fn metrics(&self) -> &MetricSnapshot {
        &self.state.metrics
    }

    pub fn baseline(&self) -> &MetricSnapshot {
        &self.state.baseline
    }

    /// Full history, baseline included.
    pub fn history(&self) -> &HistoryLedger {
        &self.state.history
    }

    /// History without the baseline.
    pub fn decision_history(&self) -> Vec<&HistoryEntry> {
        self.state.history.decisions().collect()
    }

    pub fn selections(&self) -> Vec<Selection> {
        self.state.history.selections()
    }

    pub fn phases(&self) -> &[PhaseDef] {
        &self.config.phases
    }

    /// Phase of the last decision taken, or the setup phase before any.
    pub fn current_phase(&self) -> &str {
        match self.state.history.last_applied() {
            Some(entry) => &entry.phase,
            None => self.config.setup_phase(),
        }
    }

    /// Decision left pending by a truncated revision, if any.
    pub fn pending_override(&self) -> Option<&str> {
        self.state.override_next()
    }

    /// Id of the decision the player faces next; `None` when finished or
    /// not initialized.
    pub fn next_decision_id(&self) -> Option<&str> {
        if !self.state.is_initialized() {
            return None;
        }
        if let Some(id) = self.state.override_next() {
            return Some(id);
        }
        match self.state.history.last_applied() {
            None => Some(self.catalog.start_decision_id()),
            Some(entry) => {
                let id = entry.decision_id()?;
                self.catalog.decision(id)?.next_decision_id.as_deref()
            }
        }
    }

    pub fn next_decision(&self) -> Option<&Decision> {
        self.next_decision_id().and_then(|id| self.catalog.decision(id))
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_initialized() && self.next_decision_id().is_none()
    }

    /// Options of `decision_id`, each flagged with its availability under the
    /// current metrics.
    pub fn available_options(&self, decision_id: &str) -> Result<Vec<OptionView<'_>>, EngineError> {
        let decision = self
            .catalog
            .decision(decision_id)
            .ok_or_else(|| EngineError::DecisionNotFound(decision_id.to_string()))?;
        Ok(decision
            .options
            .iter()
            .map(|option| OptionView {
                option,
                available: is_available(option, &self.state.metrics),
            })
            .collect())
    }

    fn require_initialized(&self) -> Result<(), EngineError> {
        if self.state.is_initialized() {
            Ok(())
        } else {
            Err(EngineError::Uninitialized)
        }
    }
}
