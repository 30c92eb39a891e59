//! Response types of the dashboard REST API.
//!
//! Most numeric fields are nullable on the wire and map to `Option`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,
    pub model: String,
}

impl Vehicle {
    /// Case-insensitive substring match on `"{vehicle_id} {model}"`.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        format!("{} {}", self.vehicle_id, self.model)
            .to_lowercase()
            .contains(&query)
    }
}

/// Keeps vehicles matching the dashboard search box; an empty query keeps all.
pub fn filter_vehicles<'a>(vehicles: &'a [Vehicle], query: &str) -> Vec<&'a Vehicle> {
    vehicles.iter().filter(|v| v.matches(query)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub total_vehicles: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleDetail {
    pub vehicle_id: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub fuel_efficiency: Option<f64>,
    #[serde(default)]
    pub collision_events: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<String>,
}

/// Used-car condition scores; higher is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedCarReport {
    pub vehicle_id: String,
    pub engine_score: Option<f64>,
    pub battery_score: Option<f64>,
    pub tire_score: Option<f64>,
    pub brake_score: Option<f64>,
    pub fuel_efficiency_score: Option<f64>,
    pub overall_grade: Option<f64>,
    #[serde(default)]
    pub analysis_date: Option<String>,
}

impl UsedCarReport {
    pub fn labelled_scores(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("engine", self.engine_score),
            ("battery", self.battery_score),
            ("tire", self.tire_score),
            ("brake", self.brake_score),
            ("fuel_efficiency", self.fuel_efficiency_score),
        ]
    }
}

/// Insurance risk percentages; lower is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceReport {
    pub vehicle_id: String,
    pub over_speed_risk: Option<f64>,
    pub sudden_accel_risk: Option<f64>,
    pub sudden_turn_risk: Option<f64>,
    pub night_drive_risk: Option<f64>,
    pub overall_grade: Option<f64>,
    #[serde(default)]
    pub analysis_date: Option<String>,
}

impl InsuranceReport {
    pub fn labelled_risks(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("over_speed", self.over_speed_risk),
            ("sudden_accel", self.sudden_accel_risk),
            ("sudden_turn", self.sudden_turn_risk),
            ("night_drive", self.night_drive_risk),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub final_score: f64,
    pub engine_powertrain_score: f64,
    pub transmission_drivetrain_score: f64,
    pub brake_suspension_score: f64,
    pub adas_safety_score: f64,
    pub electrical_battery_score: f64,
    pub other_score: f64,
}

impl CategoryScores {
    /// Per-category scores in chart order, excluding the final score.
    pub fn categories(&self) -> [(&'static str, f64); 6] {
        [
            ("engine", self.engine_powertrain_score),
            ("transmission", self.transmission_drivetrain_score),
            ("brake", self.brake_suspension_score),
            ("adas", self.adas_safety_score),
            ("electrical", self.electrical_battery_score),
            ("other", self.other_score),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreMetrics {
    pub engine_rpm_avg: Option<f64>,
    pub engine_coolant_temp_avg: Option<f64>,
    pub transmission_oil_temp_avg: Option<f64>,
    pub battery_voltage_avg: Option<f64>,
    pub alternator_output_avg: Option<f64>,
    pub temperature_ambient_avg: Option<f64>,
    pub dtc_count: Option<u64>,
    pub gear_change_count: Option<u64>,
    pub abs_activation_count: Option<u64>,
    pub suspension_shock_count: Option<u64>,
    pub adas_sensor_fault_count: Option<u64>,
    pub aeb_activation_count: Option<u64>,
    pub engine_start_count: Option<u64>,
    pub suddenacc_count: Option<u64>,
}

/// Daily health evaluation for one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreData {
    pub vehicle_id: String,
    pub analysis_date: NaiveDate,
    pub scores: CategoryScores,
    #[serde(default)]
    pub metrics: ScoreMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryRecord {
    pub analysis_date: NaiveDate,
    pub final_score: Option<f64>,
    pub engine_powertrain_score: Option<f64>,
    pub transmission_drivetrain_score: Option<f64>,
    pub brake_suspension_score: Option<f64>,
    pub adas_safety_score: Option<f64>,
    pub electrical_battery_score: Option<f64>,
    pub other_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryResponse {
    pub vehicle_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub records: Vec<ScoreHistoryRecord>,
}

/// How far back to load score history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryQuery {
    LastDays(u32),
    Range { start: NaiveDate, end: NaiveDate },
}

impl HistoryQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            HistoryQuery::LastDays(days) => vec![("days", days.to_string())],
            HistoryQuery::Range { start, end } => vec![
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicles() -> Vec<Vehicle> {
        vec![
            Vehicle {
                vehicle_id: "KR-001".to_string(),
                model: "Sonata".to_string(),
            },
            Vehicle {
                vehicle_id: "KR-002".to_string(),
                model: "Avante".to_string(),
            },
        ]
    }

    #[test]
    fn test_filter_vehicles_case_insensitive() {
        let all = vehicles();
        let hits = filter_vehicles(&all, "sonATA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].vehicle_id, "KR-001");

        assert_eq!(filter_vehicles(&all, "kr-00").len(), 2);
        assert_eq!(filter_vehicles(&all, "").len(), 2);
        assert!(filter_vehicles(&all, "tesla").is_empty());
    }

    #[test]
    fn test_vehicle_detail_with_nulls() {
        let json = r#"{"vehicle_id": "KR-001", "model": "Sonata", "year": null,
            "total_distance": 120345.5, "average_speed": null, "fuel_efficiency": 12.1,
            "collision_events": null, "analysis_date": "2025-09-23"}"#;
        let detail: VehicleDetail = serde_json::from_str(json).unwrap();

        assert_eq!(detail.year, None);
        assert_eq!(detail.total_distance, Some(120345.5));
        assert_eq!(detail.collision_events, None);
    }

    #[test]
    fn test_score_data_decodes_with_partial_metrics() {
        let json = r#"{"vehicle_id": "KR-001", "analysis_date": "2025-09-22",
            "scores": {"final_score": 78, "engine_powertrain_score": 81,
                       "transmission_drivetrain_score": 70, "brake_suspension_score": 65,
                       "adas_safety_score": 90, "electrical_battery_score": 55, "other_score": 40},
            "metrics": {"engine_rpm_avg": 1820.5, "dtc_count": 2}}"#;
        let data: ScoreData = serde_json::from_str(json).unwrap();

        assert_eq!(data.scores.final_score, 78.0);
        assert_eq!(data.scores.categories()[0], ("engine", 81.0));
        assert_eq!(data.metrics.dtc_count, Some(2));
        assert_eq!(data.metrics.battery_voltage_avg, None);
    }

    #[test]
    fn test_history_response_missing_records() {
        let json = r#"{"vehicle_id": "KR-001", "start_date": null, "end_date": null}"#;
        let resp: ScoreHistoryResponse = serde_json::from_str(json).unwrap();
        assert!(resp.records.is_empty());
    }

    #[test]
    fn test_history_query_pairs() {
        assert_eq!(HistoryQuery::LastDays(14).query_pairs(), vec![("days", "14".to_string())]);

        let range = HistoryQuery::Range {
            start: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 9, 14).unwrap(),
        };
        assert_eq!(
            range.query_pairs(),
            vec![
                ("start_date", "2025-09-01".to_string()),
                ("end_date", "2025-09-14".to_string())
            ]
        );
    }
}
