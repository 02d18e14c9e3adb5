use pmsim_core::{AvailabilityRule, MetricSnapshot};
use pmsim_engine::RevisionOutcome;
use pmsim_ledger::HistoryLedger;
use pmsim_postmortem::PostMortem;

// ── Formatting ──

/// `technicalDebt=35 velocity=55 ...` in display order.
pub fn metrics_line(metrics: &MetricSnapshot) -> String {
    metrics
        .iter()
        .map(|(m, v)| format!("{}={v}", m.name()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `technicalDebt <= 50, maintainability >= 50`
pub fn rule_text(rule: &AvailabilityRule) -> String {
    let mut parts = Vec::new();
    for c in rule.constraints() {
        if let Some(lte) = c.bound.lte {
            parts.push(format!("{} <= {lte}", c.metric.name()));
        }
        if let Some(gte) = c.bound.gte {
            parts.push(format!("{} >= {gte}", c.metric.name()));
        }
    }
    parts.join(", ")
}

pub fn truncation_notice(outcome: &RevisionOutcome) -> Option<String> {
    match outcome {
        RevisionOutcome::Complete => None,
        RevisionOutcome::Truncated {
            at_step,
            decision_id,
            reason,
            dropped,
        } => Some(format!(
            "timeline truncated at step {at_step} ({decision_id}: {}); {dropped} later decision(s) dropped",
            reason_text(*reason)
        )),
    }
}

fn reason_text(reason: pmsim_engine::TruncationReason) -> &'static str {
    use pmsim_engine::TruncationReason::*;
    match reason {
        MissingDecision => "decision no longer exists",
        MissingOption => "option no longer exists",
        Unavailable => "option no longer available",
    }
}

// ── Printing ──

pub fn print_history(history: &HistoryLedger) {
    println!("History:");
    for e in history.entries() {
        let what = match (e.decision_id(), e.option_id()) {
            (Some(d), Some(o)) => format!("{d}/{o}"),
            _ => "baseline".to_string(),
        };
        println!(
            "  {:>3}  {:<8} {:<36} {}",
            e.step,
            e.phase,
            what,
            metrics_line(&e.metrics)
        );
    }
}

pub fn print_postmortem(pm: &PostMortem) {
    if let Some(p) = &pm.project {
        println!(
            "Post-mortem: {} ({}, team of {})",
            p.name, p.domain, p.team_size
        );
    } else {
        println!("Post-mortem");
    }
    let status = if pm.finished { "finished" } else { "in progress" };
    println!(
        "  {} decision(s), {status}, phase {}",
        pm.decisions_taken, pm.current_phase
    );
    if let Some(id) = &pm.pending_decision {
        println!("  pending: {id}");
    }

    println!("Metrics:");
    for d in &pm.deltas {
        println!(
            "  {:<18} {:>3} -> {:>3}  ({:+})",
            d.metric.label(),
            d.baseline,
            d.final_value,
            d.delta
        );
    }
    if let Some(s) = &pm.largest_swing {
        println!("  largest swing: {} ({:+})", s.metric.label(), s.delta);
    }

    let phases: Vec<String> = pm
        .phase_steps
        .iter()
        .filter(|p| p.steps > 0)
        .map(|p| format!("{} {}", p.label, p.steps))
        .collect();
    if !phases.is_empty() {
        println!("Phases: {}", phases.join(", "));
    }

    println!("Insights:");
    for i in &pm.insights {
        println!("  - {}", i.message);
    }
}
