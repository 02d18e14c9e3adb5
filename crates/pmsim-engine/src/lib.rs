mod replay;
mod session;
mod state;

pub use replay::{RevisionOutcome, TruncationReason};
pub use session::{OptionView, Session};
pub use state::{ProjectMeta, ProjectState};

#[cfg(test)]
pub(crate) mod test_support {
    use pmsim_core::{
        AvailabilityRule, Bound, ContentCatalog, Decision, DecisionOption, EffectSet, Metric,
    };

    /// In-memory catalog: start -> second -> third (terminal).
    ///
    /// `third/rearchitect` requires technicalDebt <= 50, which `start/rush`
    /// breaks (35 + 25 = 60).
    pub struct FixtureCatalog {
        pub start: String,
        pub decisions: Vec<Decision>,
    }

    impl ContentCatalog for FixtureCatalog {
        fn start_decision_id(&self) -> &str {
            &self.start
        }

        fn decision(&self, id: &str) -> Option<&Decision> {
            self.decisions.iter().find(|d| d.id == id)
        }

        fn decisions(&self) -> Vec<&Decision> {
            self.decisions.iter().collect()
        }
    }

    fn option(id: &str, effects: EffectSet) -> DecisionOption {
        DecisionOption {
            id: id.to_string(),
            label: id.to_string(),
            description: None,
            effects,
            available_if: None,
        }
    }

    fn decision(id: &str, phase: &str, options: Vec<DecisionOption>, next: Option<&str>) -> Decision {
        Decision {
            id: id.to_string(),
            phase: phase.to_string(),
            title: id.to_string(),
            prompt: None,
            options,
            next_decision_id: next.map(str::to_string),
        }
    }

    pub fn fixture_catalog() -> FixtureCatalog {
        let mut rearchitect = option(
            "rearchitect",
            EffectSet::new()
                .with(Metric::Stability, 20)
                .with(Metric::Velocity, -10),
        );
        rearchitect.available_if =
            Some(AvailabilityRule::new().require(Metric::TechnicalDebt, Bound::at_most(50.0)));

        FixtureCatalog {
            start: "start".to_string(),
            decisions: vec![
                decision(
                    "start",
                    "mvp",
                    vec![
                        option("steady", EffectSet::new().with(Metric::Velocity, 5)),
                        option(
                            "rush",
                            EffectSet::new()
                                .with(Metric::TechnicalDebt, 25)
                                .with(Metric::Velocity, 10),
                        ),
                        option(
                            "clean",
                            EffectSet::new()
                                .with(Metric::TechnicalDebt, -10)
                                .with(Metric::Velocity, -5),
                        ),
                    ],
                    Some("second"),
                ),
                decision(
                    "second",
                    "growth",
                    vec![
                        option("hire", EffectSet::new().with(Metric::TeamMorale, 5)),
                        option(
                            "crunch",
                            EffectSet::new()
                                .with(Metric::TeamMorale, -10)
                                .with(Metric::Velocity, 10),
                        ),
                    ],
                    Some("third"),
                ),
                decision(
                    "third",
                    "scale",
                    vec![
                        rearchitect,
                        option(
                            "patch",
                            EffectSet::new()
                                .with(Metric::Stability, 5)
                                .with(Metric::TechnicalDebt, 5),
                        ),
                    ],
                    None,
                ),
            ],
        }
    }
}
