use pmsim_core::{ContentCatalog, PhaseDef};
use std::collections::HashSet;
use thiserror::Error;

use crate::JsonCatalog;

/// Content problems that make a catalog unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("start decision \"{0}\" does not exist")]
    UnknownStart(String),
    #[error("duplicate decision id \"{0}\"")]
    DuplicateDecision(String),
    #[error("duplicate option id \"{option}\" in decision \"{decision}\"")]
    DuplicateOption { decision: String, option: String },
    #[error("decision \"{0}\" has no options")]
    NoOptions(String),
}

/// Problems the engine tolerates but an author probably wants to know about.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogWarning {
    #[error("decision \"{decision}\" points to missing successor \"{next}\"")]
    DanglingSuccessor { decision: String, next: String },
    #[error("decision \"{decision}\" uses unknown phase \"{phase}\"")]
    UnknownPhase { decision: String, phase: String },
    #[error("decision \"{0}\" is not reachable from the start decision")]
    Unreachable(String),
    #[error("successor chain loops back to \"{0}\"; the project can never finish")]
    Cycle(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<CatalogError>,
    pub warnings: Vec<CatalogWarning>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a catalog's internal consistency against the configured phases.
pub fn validate(catalog: &JsonCatalog, phases: &[PhaseDef]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let decisions = catalog.decisions();

    let mut seen = HashSet::new();
    for d in &decisions {
        if !seen.insert(d.id.as_str()) {
            report.errors.push(CatalogError::DuplicateDecision(d.id.clone()));
        }
        if d.options.is_empty() {
            report.errors.push(CatalogError::NoOptions(d.id.clone()));
        }
        let mut option_ids = HashSet::new();
        for o in &d.options {
            if !option_ids.insert(o.id.as_str()) {
                report.errors.push(CatalogError::DuplicateOption {
                    decision: d.id.clone(),
                    option: o.id.clone(),
                });
            }
        }
        if !phases.iter().any(|p| p.key == d.phase) {
            report.warnings.push(CatalogWarning::UnknownPhase {
                decision: d.id.clone(),
                phase: d.phase.clone(),
            });
        }
        if let Some(next) = &d.next_decision_id {
            if catalog.decision(next).is_none() {
                report.warnings.push(CatalogWarning::DanglingSuccessor {
                    decision: d.id.clone(),
                    next: next.clone(),
                });
            }
        }
    }

    let start = catalog.start_decision_id();
    if catalog.decision(start).is_none() {
        report.errors.push(CatalogError::UnknownStart(start.to_string()));
    } else {
        // Walk the successor chain from the start.
        let mut reached: HashSet<&str> = HashSet::new();
        let mut cursor = catalog.decision(start);
        while let Some(d) = cursor {
            if !reached.insert(d.id.as_str()) {
                report.warnings.push(CatalogWarning::Cycle(d.id.clone()));
                break;
            }
            cursor = d
                .next_decision_id
                .as_deref()
                .and_then(|next| catalog.decision(next));
        }
        for d in &decisions {
            if !reached.contains(d.id.as_str()) {
                report.warnings.push(CatalogWarning::Unreachable(d.id.clone()));
            }
        }
    }

    for w in &report.warnings {
        tracing::warn!("catalog: {w}");
    }
    report
}
