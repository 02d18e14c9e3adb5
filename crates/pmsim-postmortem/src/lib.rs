//! End-of-project reporting: metric deltas, phase breakdown, insights and
//! chart series built from a [`pmsim_engine::Session`].

mod insights;
mod report;
mod series;

pub use insights::{generate_insights, Insight};
pub use report::{metric_deltas, MetricDelta, PhaseSteps, PostMortem};
pub use series::{metric_series, ChartData, MetricSeries};
