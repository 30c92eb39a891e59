use chrono::NaiveDate;
use serde::Serialize;

use crate::api::types::ScoreHistoryRecord;
use crate::scores::band::CategoryLevel;
use crate::scores::series::ScoreSeries;

/// Descriptive statistics of one history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub series: ScoreSeries,
    pub samples: usize,
    pub mean: f64,
    pub stddev: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub latest: Option<(NaiveDate, f64)>,
    pub level: Option<CategoryLevel>,
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a known mean; 0.0 for an empty slice.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Summarizes a series across history records, skipping missing values.
///
/// `latest` is taken from the record with the greatest analysis date, so the
/// input does not need to be sorted.
pub fn summarize_history(records: &[ScoreHistoryRecord], series: ScoreSeries) -> SeriesSummary {
    let points: Vec<(NaiveDate, f64)> = records
        .iter()
        .filter_map(|r| series.value(r).map(|v| (r.analysis_date, v)))
        .collect();

    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let avg = mean(&values);

    let latest = points.iter().copied().max_by_key(|(date, _)| *date);

    SeriesSummary {
        series,
        samples: values.len(),
        mean: avg,
        stddev: stddev(&values, avg),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
        latest,
        level: latest.map(|(_, v)| CategoryLevel::from_score(v)),
    }
}
