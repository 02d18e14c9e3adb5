use pmsim_core::{Metric, MetricSnapshot};
use serde::Serialize;

/// One lesson drawn from the final metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub code: &'static str,
    pub message: &'static str,
}

struct Rule {
    code: &'static str,
    message: &'static str,
    applies: fn(&MetricSnapshot) -> bool,
}

const RULES: &[Rule] = &[
    Rule {
        code: "slowdown_ignored",
        message: "The system slowed down long before the team admitted it.",
        applies: |m| m.get(Metric::TechnicalDebt) > 80 && m.get(Metric::Velocity) < 40,
    },
    Rule {
        code: "morale_collapse",
        message: "Team morale collapsed quietly, until it started hurting delivery.",
        applies: |m| m.get(Metric::TeamMorale) < 30,
    },
    Rule {
        code: "stable_but_late",
        message: "The system was stable, but the market did not wait.",
        applies: |m| m.get(Metric::Stability) > 70 && m.get(Metric::TimeToMarket) > 70,
    },
    Rule {
        code: "speed_fragility",
        message: "Short-term speed created long-term fragility.",
        applies: |m| m.get(Metric::Velocity) > 70 && m.get(Metric::Maintainability) < 40,
    },
];

const FALLBACK: Insight = Insight {
    code: "trade_offs",
    message: "The project avoided catastrophic failure, but not without trade-offs.",
};

/// Lessons for `metrics`, in rule order. Never empty.
pub fn generate_insights(metrics: &MetricSnapshot) -> Vec<Insight> {
    let insights: Vec<Insight> = RULES
        .iter()
        .filter(|r| (r.applies)(metrics))
        .map(|r| Insight {
            code: r.code,
            message: r.message,
        })
        .collect();
    if insights.is_empty() {
        vec![FALLBACK]
    } else {
        insights
    }
}
