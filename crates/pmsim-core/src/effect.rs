use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metric::{clamp_metric_int, Metric, MetricSnapshot};

/// Signed per-metric deltas carried by an option.
///
/// Keyed by the closed [`Metric`] set, so an omitted metric is a 0 delta by
/// construction rather than by lookup convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EffectSet {
    deltas: [i32; Metric::COUNT],
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, metric: Metric, delta: i32) -> Self {
        self.deltas[metric as usize] = delta;
        self
    }

    pub fn get(&self, metric: Metric) -> i32 {
        self.deltas[metric as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.iter().all(|d| *d == 0)
    }

    /// Non-zero deltas in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, i32)> + '_ {
        Metric::ALL
            .into_iter()
            .map(|m| (m, self.get(m)))
            .filter(|(_, d)| *d != 0)
    }
}

impl Serialize for EffectSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(Metric, i32)> = self.iter().collect();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (metric, delta) in entries {
            map.serialize_entry(metric.name(), &delta)?;
        }
        map.end()
    }
}

/// Unknown metric names are ignored so newer content still loads.
/// Fractional deltas round to the nearest integer.
impl<'de> Deserialize<'de> for EffectSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, f64>::deserialize(deserializer)?;
        let mut effects = EffectSet::new();
        for (name, delta) in raw {
            if let Some(metric) = Metric::from_name(&name) {
                effects.deltas[metric as usize] = round_delta(delta);
            }
        }
        Ok(effects)
    }
}

fn round_delta(delta: f64) -> i32 {
    if !delta.is_finite() {
        return 0;
    }
    (delta + 0.5).floor().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Combine a snapshot with an effect set into a new clamped snapshot.
///
/// Every metric in the set is recomputed, not only the ones with a delta.
/// Neither input is touched.
pub fn apply_effects(snapshot: &MetricSnapshot, effects: &EffectSet) -> MetricSnapshot {
    MetricSnapshot::from_fn(|metric| {
        clamp_metric_int(i64::from(snapshot.get(metric)) + i64::from(effects.get(metric)))
    })
}
