//! Display classification of vehicle condition scores and insurance risks,
//! plus summaries of the per-category score history.

pub mod band;
pub mod series;
pub mod summary;

pub use band::{CategoryLevel, ScoreBand, format_risk, format_score, risk_band, score_band};
pub use series::{ScoreSeries, SeriesSelection};
pub use summary::{SeriesSummary, summarize_history};
