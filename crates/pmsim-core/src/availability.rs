//! Availability rules: whether an option may be chosen under a snapshot.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::content::DecisionOption;
use crate::metric::{Metric, MetricSnapshot};

/// Upper and/or lower bound on one metric. Both ends are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    /// Value must be `<=` this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    /// Value must be `>=` this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
}

impl Bound {
    pub fn at_most(lte: f64) -> Self {
        Self {
            lte: Some(lte),
            gte: None,
        }
    }

    pub fn at_least(gte: f64) -> Self {
        Self {
            lte: None,
            gte: Some(gte),
        }
    }

    pub fn holds(&self, value: f64) -> bool {
        if let Some(lte) = self.lte {
            if value > lte {
                return false;
            }
        }
        if let Some(gte) = self.gte {
            if value < gte {
                return false;
            }
        }
        true
    }
}

/// The metric a constraint talks about.
///
/// Content may name metrics this build does not track; such a metric reads
/// as 0, the same default effects use for an omitted metric.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MetricRef {
    Known(Metric),
    Unknown(String),
}

impl MetricRef {
    pub fn parse(name: &str) -> Self {
        match Metric::from_name(name) {
            Some(m) => MetricRef::Known(m),
            None => MetricRef::Unknown(name.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MetricRef::Known(m) => m.name(),
            MetricRef::Unknown(name) => name,
        }
    }

    pub fn read(&self, snapshot: &MetricSnapshot) -> f64 {
        match self {
            MetricRef::Known(m) => f64::from(snapshot.get(*m)),
            MetricRef::Unknown(_) => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub metric: MetricRef,
    pub bound: Bound,
}

/// Conjunction of per-metric bounds. Empty means always available.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilityRule {
    constraints: Vec<Constraint>,
}

impl AvailabilityRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, metric: Metric, bound: Bound) -> Self {
        self.constraints.push(Constraint {
            metric: MetricRef::Known(metric),
            bound,
        });
        self
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn allows(&self, snapshot: &MetricSnapshot) -> bool {
        self.constraints
            .iter()
            .all(|c| c.bound.holds(c.metric.read(snapshot)))
    }

    /// Constraints that fail under `snapshot`, for explaining a refusal.
    pub fn violations<'a>(
        &'a self,
        snapshot: &'a MetricSnapshot,
    ) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| !c.bound.holds(c.metric.read(snapshot)))
    }
}

impl Serialize for AvailabilityRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.constraints.len()))?;
        for c in &self.constraints {
            map.serialize_entry(c.metric.name(), &c.bound)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AvailabilityRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Bound>::deserialize(deserializer)?;
        let constraints = raw
            .into_iter()
            .map(|(name, bound)| Constraint {
                metric: MetricRef::parse(&name),
                bound,
            })
            .collect();
        Ok(Self { constraints })
    }
}

/// Whether `option` is selectable under `snapshot`.
pub fn is_available(option: &DecisionOption, snapshot: &MetricSnapshot) -> bool {
    match &option.available_if {
        None => true,
        Some(rule) => rule.allows(snapshot),
    }
}
