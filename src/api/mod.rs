//! Client for the fleet dashboard REST API.
//!
//! [`DashboardApi`] lists the read-only endpoints the dashboard consumes.
//! [`RestClient`] implements it over any [`HttpClient`](crate::fetch::HttpClient).

mod client;
mod config;
pub mod types;

pub use client::RestClient;
pub use config::ApiConfig;

use anyhow::Result;
use chrono::NaiveDate;

use crate::events::Event;
use crate::timeline::ReportWindow;
use types::{
    HistoryQuery, InsuranceReport, ScoreData, ScoreHistoryResponse, UsedCarReport, Vehicle,
    VehicleDetail, VehicleSummary,
};

/// Read-only view of the fleet backend.
#[async_trait::async_trait]
pub trait DashboardApi {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>>;

    async fn vehicle_summary(&self) -> Result<VehicleSummary>;

    async fn vehicle_detail(&self, vehicle_id: &str) -> Result<VehicleDetail>;

    async fn used_car(&self, vehicle_id: &str) -> Result<UsedCarReport>;

    async fn used_car_all(&self) -> Result<Vec<UsedCarReport>>;

    async fn insurance(&self, vehicle_id: &str) -> Result<InsuranceReport>;

    async fn insurance_all(&self) -> Result<Vec<InsuranceReport>>;

    /// Daily health evaluation for `date`.
    async fn score(&self, vehicle_id: &str, date: NaiveDate) -> Result<ScoreData>;

    async fn score_history(
        &self,
        vehicle_id: &str,
        query: HistoryQuery,
    ) -> Result<ScoreHistoryResponse>;

    /// Collision and engine-off events inside `window`.
    async fn events(&self, vehicle_id: &str, window: &ReportWindow) -> Result<Vec<Event>>;
}
