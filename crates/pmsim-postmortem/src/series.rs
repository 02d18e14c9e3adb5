use pmsim_core::Metric;
use pmsim_ledger::HistoryLedger;
use serde::Serialize;

/// One metric's value at every step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub label: &'static str,
    pub values: Vec<u8>,
}

/// Chart-ready view of the ledger: a shared x axis plus one series per metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub steps: Vec<usize>,
    pub series: Vec<MetricSeries>,
}

pub fn metric_series(history: &HistoryLedger) -> ChartData {
    let entries = history.entries();
    let series = Metric::ALL
        .into_iter()
        .map(|metric| MetricSeries {
            metric,
            label: metric.label(),
            values: entries.iter().map(|e| e.metrics.get(metric)).collect(),
        })
        .collect();
    ChartData {
        steps: entries.iter().map(|e| e.step).collect(),
        series,
    }
}
