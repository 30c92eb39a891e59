use serde::Serialize;

/// Traffic-light classification of a score or risk value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Warning,
    Danger,
    NoData,
}

impl ScoreBand {
    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::Good => "#22c55e",
            ScoreBand::Warning => "#f59e0b",
            ScoreBand::Danger => "#ef4444",
            ScoreBand::NoData => "#6b7280",
        }
    }
}

/// Classifies a condition score where higher is better.
///
/// | Range  | Band    |
/// |--------|---------|
/// | >= 80  | Good    |
/// | >= 60  | Warning |
/// | < 60   | Danger  |
pub fn score_band(score: Option<f64>) -> ScoreBand {
    match score {
        None => ScoreBand::NoData,
        Some(s) if s >= 80.0 => ScoreBand::Good,
        Some(s) if s >= 60.0 => ScoreBand::Warning,
        Some(_) => ScoreBand::Danger,
    }
}

/// Classifies a risk percentage where lower is better.
///
/// | Range  | Band    |
/// |--------|---------|
/// | <= 20  | Good    |
/// | <= 60  | Warning |
/// | > 60   | Danger  |
pub fn risk_band(risk: Option<f64>) -> ScoreBand {
    match risk {
        None => ScoreBand::NoData,
        Some(r) if r <= 20.0 => ScoreBand::Good,
        Some(r) if r <= 60.0 => ScoreBand::Warning,
        Some(_) => ScoreBand::Danger,
    }
}

/// Four-step level for per-category health scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLevel {
    Excellent,
    Fair,
    Poor,
    Critical,
}

impl CategoryLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => CategoryLevel::Excellent,
            s if s >= 50.0 => CategoryLevel::Fair,
            s if s >= 25.0 => CategoryLevel::Poor,
            _ => CategoryLevel::Critical,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            CategoryLevel::Excellent => "#22c55e",
            CategoryLevel::Fair => "#f97316",
            CategoryLevel::Poor => "#eab308",
            CategoryLevel::Critical => "#ef4444",
        }
    }
}

pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{s}점"),
        None => "-".to_string(),
    }
}

pub fn format_risk(risk: Option<f64>) -> String {
    match risk {
        Some(r) => format!("{r}%"),
        None => "-".to_string(),
    }
}
