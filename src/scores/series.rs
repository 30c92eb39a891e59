use serde::Serialize;

use crate::api::types::ScoreHistoryRecord;

/// One plotted line of the score history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSeries {
    Final,
    EnginePowertrain,
    TransmissionDrivetrain,
    BrakeSuspension,
    AdasSafety,
    ElectricalBattery,
    Other,
}

impl ScoreSeries {
    pub const ALL: [ScoreSeries; 7] = [
        ScoreSeries::Final,
        ScoreSeries::EnginePowertrain,
        ScoreSeries::TransmissionDrivetrain,
        ScoreSeries::BrakeSuspension,
        ScoreSeries::AdasSafety,
        ScoreSeries::ElectricalBattery,
        ScoreSeries::Other,
    ];

    /// Field name in the score history payload.
    pub fn key(self) -> &'static str {
        match self {
            ScoreSeries::Final => "final_score",
            ScoreSeries::EnginePowertrain => "engine_powertrain_score",
            ScoreSeries::TransmissionDrivetrain => "transmission_drivetrain_score",
            ScoreSeries::BrakeSuspension => "brake_suspension_score",
            ScoreSeries::AdasSafety => "adas_safety_score",
            ScoreSeries::ElectricalBattery => "electrical_battery_score",
            ScoreSeries::Other => "other_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreSeries::Final => "종합 점수",
            ScoreSeries::EnginePowertrain => "엔진/파워트레인",
            ScoreSeries::TransmissionDrivetrain => "변속/구동계",
            ScoreSeries::BrakeSuspension => "브레이크/서스펜션",
            ScoreSeries::AdasSafety => "ADAS/안전",
            ScoreSeries::ElectricalBattery => "전기/배터리",
            ScoreSeries::Other => "기타",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreSeries::Final => "#38bdf8",
            ScoreSeries::EnginePowertrain => "#f97316",
            ScoreSeries::TransmissionDrivetrain => "#fbbf24",
            ScoreSeries::BrakeSuspension => "#a855f7",
            ScoreSeries::AdasSafety => "#22d3ee",
            ScoreSeries::ElectricalBattery => "#34d399",
            ScoreSeries::Other => "#f472b6",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }

    pub fn value(self, record: &ScoreHistoryRecord) -> Option<f64> {
        match self {
            ScoreSeries::Final => record.final_score,
            ScoreSeries::EnginePowertrain => record.engine_powertrain_score,
            ScoreSeries::TransmissionDrivetrain => record.transmission_drivetrain_score,
            ScoreSeries::BrakeSuspension => record.brake_suspension_score,
            ScoreSeries::AdasSafety => record.adas_safety_score,
            ScoreSeries::ElectricalBattery => record.electrical_battery_score,
            ScoreSeries::Other => record.other_score,
        }
    }
}

/// Set of series shown on the history chart. The final score is pinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSelection {
    active: Vec<ScoreSeries>,
}

impl Default for SeriesSelection {
    fn default() -> Self {
        Self {
            active: vec![ScoreSeries::Final],
        }
    }
}

impl SeriesSelection {
    pub fn toggle(&mut self, series: ScoreSeries) {
        if series == ScoreSeries::Final {
            return;
        }
        if let Some(pos) = self.active.iter().position(|s| *s == series) {
            self.active.remove(pos);
        } else {
            self.active.push(series);
        }
    }

    pub fn is_active(&self, series: ScoreSeries) -> bool {
        self.active.contains(&series)
    }

    /// Active series in display order.
    pub fn active(&self) -> Vec<ScoreSeries> {
        ScoreSeries::ALL
            .into_iter()
            .filter(|s| self.is_active(*s))
            .collect()
    }
}
