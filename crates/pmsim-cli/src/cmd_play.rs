use anyhow::Context;
use pmsim_core::ContentCatalog;
use pmsim_engine::{RevisionOutcome, Session};
use pmsim_ledger::HistoryLedger;
use pmsim_postmortem::PostMortem;
use serde::Serialize;
use std::path::Path;

use crate::script::{Action, Script};
use crate::{load, render};

pub struct PlayParams<'a> {
    pub script: &'a Path,
    pub catalog: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub json: bool,
}

/// A revision the script performed and how it ended.
#[derive(Debug, Serialize)]
pub struct RevisionRecord {
    /// 1-based position in the script's action list.
    pub action: usize,
    pub step: usize,
    pub decision: String,
    pub option: String,
    #[serde(flatten)]
    pub outcome: RevisionOutcome,
}

#[derive(Serialize)]
struct PlayReport<'a> {
    history: &'a HistoryLedger,
    revisions: &'a [RevisionRecord],
    postmortem: PostMortem,
}

pub fn execute(params: &PlayParams<'_>) -> anyhow::Result<()> {
    let script = Script::load(params.script)?;
    let catalog = load::catalog(params.catalog)?;
    let config = load::config(params.config)?;

    let mut session = Session::new(catalog, config);
    let revisions = run_script(&mut session, &script)?;
    let postmortem = PostMortem::build(&session);

    if params.json {
        let report = PlayReport {
            history: session.history(),
            revisions: &revisions,
            postmortem,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render::print_history(session.history());
    for r in &revisions {
        if let Some(notice) = render::truncation_notice(&r.outcome) {
            println!("action {}: {notice}", r.action);
        }
    }
    println!();
    render::print_postmortem(&postmortem);
    Ok(())
}

/// Initialize the project and run every action in order. Stops at the first
/// action the engine rejects.
pub fn run_script<C: ContentCatalog>(
    session: &mut Session<C>,
    script: &Script,
) -> anyhow::Result<Vec<RevisionRecord>> {
    session.init_project(script.project.meta());
    let mut revisions = Vec::new();
    for (i, action) in script.actions.iter().enumerate() {
        let n = i + 1;
        match action {
            Action::Apply { decision, option } => {
                session
                    .apply_decision(decision, option)
                    .with_context(|| format!("action {n}: apply {decision}/{option}"))?;
            }
            Action::Revise {
                step,
                decision,
                option,
            } => {
                let outcome = session
                    .revise_decision(*step, decision, option)
                    .with_context(|| format!("action {n}: revise step {step} to {decision}/{option}"))?;
                revisions.push(RevisionRecord {
                    action: n,
                    step: *step,
                    decision: decision.clone(),
                    option: option.clone(),
                    outcome,
                });
            }
        }
    }
    Ok(revisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmsim_catalog::JsonCatalog;
    use pmsim_core::{EngineError, SimConfig};

    fn session() -> Session<JsonCatalog> {
        Session::new(JsonCatalog::bundled().unwrap(), SimConfig::default())
    }

    const TRUNCATING: &str = r#"
project: { name: Atlas, team_size: 6, domain: fintech }
actions:
  - apply: { decision: mvp-architecture, option: monolith }
  - apply: { decision: mvp-testing, option: core-tests }
  - apply: { decision: growth-features, option: negotiate-scope }
  - apply: { decision: growth-hiring, option: hire-slow }
  - apply: { decision: scale-traffic, option: re-architect }
  - revise: { step: 2, decision: mvp-testing, option: skip-tests }
"#;

    #[test]
    fn script_runs_and_records_truncation() {
        let script = Script::from_yaml_str(TRUNCATING).unwrap();
        let mut s = session();
        let revisions = run_script(&mut s, &script).unwrap();

        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].action, 6);
        match &revisions[0].outcome {
            RevisionOutcome::Truncated {
                at_step,
                decision_id,
                dropped,
                ..
            } => {
                assert_eq!(*at_step, 5);
                assert_eq!(decision_id, "scale-traffic");
                assert_eq!(*dropped, 1);
            }
            other => panic!("expected truncation, got {other:?}"),
        }
        assert_eq!(s.history().len(), 5);
        assert_eq!(s.next_decision_id(), Some("scale-traffic"));
    }

    #[test]
    fn rejected_action_is_reported_with_position() {
        let yaml = r#"
project: { name: Atlas, team_size: 6, domain: fintech }
actions:
  - apply: { decision: mvp-architecture, option: monolith }
  - apply: { decision: mvp-testing, option: no-such-option }
"#;
        let script = Script::from_yaml_str(yaml).unwrap();
        let mut s = session();
        let err = run_script(&mut s, &script).unwrap_err();
        assert!(format!("{err:#}").contains("action 2"));
        assert!(matches!(
            err.downcast_ref::<EngineError>(),
            Some(EngineError::OptionNotFound { .. })
        ));
        assert_eq!(s.decision_history().len(), 1);
    }

    #[test]
    fn report_serializes_revision_outcome_inline() {
        let script = Script::from_yaml_str(TRUNCATING).unwrap();
        let mut s = session();
        let revisions = run_script(&mut s, &script).unwrap();
        let v = serde_json::to_value(&revisions[0]).unwrap();
        assert_eq!(v["outcome"], "truncated");
        assert_eq!(v["reason"], "unavailable");
        assert_eq!(v["step"], 2);
    }
}
