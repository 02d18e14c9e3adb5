use pmsim_catalog::JsonCatalog;
use pmsim_core::ContentCatalog;
use std::io::Write;
use std::path::Path;

use crate::{load, render};

pub fn execute(catalog_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let catalog = load::catalog(catalog_path)?;
    if json {
        println!("{}", catalog.to_json_pretty()?);
        return Ok(());
    }
    let stdout = std::io::stdout();
    write_listing(&mut stdout.lock(), &catalog)
}

fn write_listing(out: &mut impl Write, catalog: &JsonCatalog) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} decision(s), start: {}",
        catalog.len(),
        catalog.start_decision_id()
    )?;
    for d in catalog.decisions() {
        writeln!(out)?;
        writeln!(out, "{} [{}] {}", d.id, d.phase, d.title)?;
        for o in &d.options {
            match o.available_if.as_ref().filter(|r| !r.is_empty()) {
                Some(rule) => writeln!(
                    out,
                    "  - {}: {} (requires {})",
                    o.id,
                    o.label,
                    render::rule_text(rule)
                )?,
                None => writeln!(out, "  - {}: {}", o.id, o.label)?,
            }
        }
        match &d.next_decision_id {
            Some(next) => writeln!(out, "  next: {next}")?,
            None => writeln!(out, "  next: (end)")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_shows_gates_and_end() {
        let catalog = JsonCatalog::bundled().unwrap();
        let mut buf = Vec::new();
        write_listing(&mut buf, &catalog).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("8 decision(s), start: mvp-architecture"));
        assert!(text.contains("re-architect: Re-architect the hot paths (requires technicalDebt <= 50)"));
        assert!(text.contains("next: (end)"));
    }
}
