//! The tracked metric set, its range, and the clamping rule.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lowest value a metric can hold.
pub const METRIC_MIN: u8 = 0;
/// Highest value a metric can hold.
pub const METRIC_MAX: u8 = 100;

/// A tracked project health metric.
///
/// Higher `TechnicalDebt` and `TimeToMarket` are worse; the others read the
/// other way around. The engine does not care, only the presentation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TechnicalDebt,
    Velocity,
    Maintainability,
    Stability,
    TeamMorale,
    TimeToMarket,
}

impl Metric {
    pub const COUNT: usize = 6;

    /// Every metric in display order. All per-metric arithmetic walks this.
    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::TechnicalDebt,
        Metric::Velocity,
        Metric::Maintainability,
        Metric::Stability,
        Metric::TeamMorale,
        Metric::TimeToMarket,
    ];

    /// Wire name, as used in content files and serialized snapshots.
    pub fn name(self) -> &'static str {
        match self {
            Metric::TechnicalDebt => "technicalDebt",
            Metric::Velocity => "velocity",
            Metric::Maintainability => "maintainability",
            Metric::Stability => "stability",
            Metric::TeamMorale => "teamMorale",
            Metric::TimeToMarket => "timeToMarket",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::TechnicalDebt => "Technical debt",
            Metric::Velocity => "Velocity",
            Metric::Maintainability => "Maintainability",
            Metric::Stability => "Stability",
            Metric::TeamMorale => "Team morale",
            Metric::TimeToMarket => "Time to market",
        }
    }

    /// Resolve a wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Value every project starts with unless configuration overrides it.
    pub fn reference_default(self) -> u8 {
        match self {
            Metric::TechnicalDebt => 35,
            Metric::Velocity => 55,
            Metric::Maintainability => 55,
            Metric::Stability => 55,
            Metric::TeamMorale => 65,
            Metric::TimeToMarket => 50,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Round to the nearest integer (halves round up) and saturate to `[0, 100]`.
///
/// NaN maps to 0; infinities saturate.
pub fn clamp_metric(value: f64) -> u8 {
    if value.is_nan() {
        return METRIC_MIN;
    }
    let rounded = (value + 0.5).floor();
    rounded.clamp(f64::from(METRIC_MIN), f64::from(METRIC_MAX)) as u8
}

/// Integer flavour of [`clamp_metric`]; no rounding needed.
pub fn clamp_metric_int(value: i64) -> u8 {
    value.clamp(i64::from(METRIC_MIN), i64::from(METRIC_MAX)) as u8
}

/// A complete metric vector at one point in simulated time.
///
/// Every metric is always present and always within `[0, 100]`: the only
/// way in is through the clamping constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MetricSnapshot {
    values: [u8; Metric::COUNT],
}

impl MetricSnapshot {
    /// Snapshot with every metric at its reference default.
    pub fn reference_defaults() -> Self {
        Self::from_fn(Metric::reference_default)
    }

    /// Snapshot with every metric at 0.
    pub fn zeroed() -> Self {
        Self {
            values: [METRIC_MIN; Metric::COUNT],
        }
    }

    /// Build a snapshot by asking `f` for each metric. Values above 100 are clamped.
    pub fn from_fn(mut f: impl FnMut(Metric) -> u8) -> Self {
        let mut values = [METRIC_MIN; Metric::COUNT];
        for metric in Metric::ALL {
            values[metric.index()] = f(metric).min(METRIC_MAX);
        }
        Self { values }
    }

    pub fn get(&self, metric: Metric) -> u8 {
        self.values[metric.index()]
    }

    /// Return a copy with `metric` set to `clamp(value)`.
    pub fn with(mut self, metric: Metric, value: i64) -> Self {
        self.values[metric.index()] = clamp_metric_int(value);
        self
    }

    /// `(metric, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, u8)> + '_ {
        Metric::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

impl Default for MetricSnapshot {
    fn default() -> Self {
        Self::reference_defaults()
    }
}

impl Serialize for MetricSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Metric::COUNT))?;
        for (metric, value) in self.iter() {
            map.serialize_entry(metric.name(), &value)?;
        }
        map.end()
    }
}

/// Every metric must be present. Unknown names are dropped, values are clamped.
impl<'de> Deserialize<'de> for MetricSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut snapshot = MetricSnapshot::zeroed();
        for metric in Metric::ALL {
            let value = raw
                .get(metric.name())
                .ok_or_else(|| <D::Error as serde::de::Error>::missing_field(metric.name()))?;
            snapshot.values[metric.index()] = clamp_metric(*value);
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_saturates_at_bounds() {
        assert_eq!(clamp_metric(150.0), 100);
        assert_eq!(clamp_metric(-20.0), 0);
        assert_eq!(clamp_metric(100.0), 100);
        assert_eq!(clamp_metric(0.0), 0);
        assert_eq!(clamp_metric_int(150), 100);
        assert_eq!(clamp_metric_int(-20), 0);
    }

    #[test]
    fn clamp_rounds_to_nearest() {
        assert_eq!(clamp_metric(42.4), 42);
        assert_eq!(clamp_metric(42.5), 43);
        assert_eq!(clamp_metric(-0.4), 0);
        assert_eq!(clamp_metric(99.6), 100);
    }

    #[test]
    fn clamp_non_finite() {
        assert_eq!(clamp_metric(f64::NAN), 0);
        assert_eq!(clamp_metric(f64::INFINITY), 100);
        assert_eq!(clamp_metric(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_name(metric.name()), Some(metric));
        }
        assert_eq!(Metric::from_name("happiness"), None);
    }

    #[test]
    fn reference_defaults_match_table() {
        let snap = MetricSnapshot::reference_defaults();
        assert_eq!(snap.get(Metric::TechnicalDebt), 35);
        assert_eq!(snap.get(Metric::Velocity), 55);
        assert_eq!(snap.get(Metric::TeamMorale), 65);
        assert_eq!(snap.get(Metric::TimeToMarket), 50);
    }

    #[test]
    fn with_clamps() {
        let snap = MetricSnapshot::zeroed().with(Metric::Velocity, 250);
        assert_eq!(snap.get(Metric::Velocity), 100);
        let snap = snap.with(Metric::Velocity, -1);
        assert_eq!(snap.get(Metric::Velocity), 0);
    }

    #[test]
    fn snapshot_serializes_in_display_order() {
        let json = serde_json::to_string(&MetricSnapshot::reference_defaults()).unwrap();
        assert_eq!(
            json,
            r#"{"technicalDebt":35,"velocity":55,"maintainability":55,"stability":55,"teamMorale":65,"timeToMarket":50}"#
        );
    }

    #[test]
    fn snapshot_deserialize_clamps_and_drops_unknown() {
        let snap: MetricSnapshot = serde_json::from_value(serde_json::json!({
            "technicalDebt": 140,
            "velocity": 12.6,
            "maintainability": 55,
            "stability": -3,
            "teamMorale": 65,
            "timeToMarket": 50,
            "unknownMetric": 50
        }))
        .unwrap();
        assert_eq!(snap.get(Metric::TechnicalDebt), 100);
        assert_eq!(snap.get(Metric::Velocity), 13);
        assert_eq!(snap.get(Metric::Stability), 0);
    }

    #[test]
    fn snapshot_deserialize_rejects_missing_metric() {
        let err = serde_json::from_value::<MetricSnapshot>(serde_json::json!({
            "technicalDebt": 35,
            "velocity": 55
        }))
        .unwrap_err();
        assert!(err.to_string().contains("maintainability"));
    }
}
