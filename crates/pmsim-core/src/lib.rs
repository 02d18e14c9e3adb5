pub mod availability;
pub mod config;
pub mod content;
pub mod effect;
pub mod error;
pub mod metric;

pub use availability::{is_available, AvailabilityRule, Bound, Constraint, MetricRef};
pub use config::{ConfigError, SimConfig};
pub use content::{ContentCatalog, Decision, DecisionOption, PhaseDef};
pub use effect::{apply_effects, EffectSet};
pub use error::{EngineError, ErrorKind};
pub use metric::{clamp_metric, clamp_metric_int, Metric, MetricSnapshot, METRIC_MAX, METRIC_MIN};
