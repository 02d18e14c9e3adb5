use anyhow::Context;
use pmsim_core::ContentCatalog;
use pmsim_engine::{ProjectMeta, Session};
use pmsim_postmortem::PostMortem;
use serde_json::json;
use std::path::Path;

use crate::{load, render};

/// Upper bound on auto-played steps; only a cyclic catalog gets near it.
const MAX_AUTO_STEPS: usize = 1000;

pub struct AutoParams<'a> {
    pub name: &'a str,
    pub team_size: u32,
    pub domain: &'a str,
    pub catalog: Option<&'a Path>,
    pub config: Option<&'a Path>,
    pub json: bool,
}

pub fn execute(params: &AutoParams<'_>) -> anyhow::Result<()> {
    let catalog = load::catalog(params.catalog)?;
    let config = load::config(params.config)?;

    let mut session = Session::new(catalog, config);
    session.init_project(ProjectMeta::new(params.name, params.team_size, params.domain));
    autoplay(&mut session)?;
    let postmortem = PostMortem::build(&session);

    if params.json {
        let report = json!({
            "history": session.history(),
            "postmortem": postmortem,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    render::print_history(session.history());
    println!();
    render::print_postmortem(&postmortem);
    Ok(())
}

/// Take the first available option of every decision until the project
/// finishes. Falls back to the first option when none is available.
pub fn autoplay<C: ContentCatalog>(session: &mut Session<C>) -> anyhow::Result<usize> {
    let mut steps = 0;
    while let Some(decision) = session.next_decision() {
        if steps >= MAX_AUTO_STEPS {
            anyhow::bail!("stopped after {MAX_AUTO_STEPS} steps; does the catalog loop?");
        }
        let decision_id = decision.id.clone();
        let views = session.available_options(&decision_id)?;
        let pick = match views.iter().find(|v| v.available).or(views.first()) {
            Some(v) => v.option.id.clone(),
            None => anyhow::bail!("decision {decision_id} has no options"),
        };
        if !views.iter().any(|v| v.available) {
            tracing::warn!(decision_id = %decision_id, option_id = %pick, "no option available, taking the first");
        }
        session
            .apply_decision(&decision_id, &pick)
            .with_context(|| format!("applying {decision_id}/{pick}"))?;
        steps += 1;
    }
    Ok(steps)
}
