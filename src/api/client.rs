use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, SecondsFormat};
use reqwest::Url;
use tracing::debug;

use super::DashboardApi;
use super::config::ApiConfig;
use super::types::{
    HistoryQuery, InsuranceReport, ScoreData, ScoreHistoryResponse, UsedCarReport, Vehicle,
    VehicleDetail, VehicleSummary,
};
use crate::events::{Event, parse_events};
use crate::fetch::{BasicClient, HttpClient, fetch_bytes, fetch_json};
use crate::timeline::ReportWindow;

pub struct RestClient<C> {
    base_url: Url,
    http: C,
}

impl RestClient<BasicClient> {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, BasicClient::with_timeout(config.timeout)?)
    }
}

impl<C: HttpClient> RestClient<C> {
    pub fn new(base_url: &str, http: C) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("API base URL cannot carry a path: {base_url}"));
        }
        Ok(Self { base_url, http })
    }

    /// Builds an endpoint URL from path segments, each percent-encoded.
    ///
    /// A trailing empty segment produces a trailing slash.
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        Ok(url)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "GET");
        fetch_json(&self.http, url.as_str()).await
    }
}

#[async_trait]
impl<C: HttpClient> DashboardApi for RestClient<C> {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.get(self.endpoint(&["api", "vehicles", ""], &[])?).await
    }

    async fn vehicle_summary(&self) -> Result<VehicleSummary> {
        self.get(self.endpoint(&["api", "vehicles", "summary"], &[])?)
            .await
    }

    async fn vehicle_detail(&self, vehicle_id: &str) -> Result<VehicleDetail> {
        self.get(self.endpoint(&["api", "vehicles", vehicle_id], &[])?)
            .await
    }

    async fn used_car(&self, vehicle_id: &str) -> Result<UsedCarReport> {
        self.get(self.endpoint(&["api", "used-car", vehicle_id], &[])?)
            .await
    }

    async fn used_car_all(&self) -> Result<Vec<UsedCarReport>> {
        self.get(self.endpoint(&["api", "used-car", ""], &[])?).await
    }

    async fn insurance(&self, vehicle_id: &str) -> Result<InsuranceReport> {
        self.get(self.endpoint(&["api", "insurance", vehicle_id], &[])?)
            .await
    }

    async fn insurance_all(&self) -> Result<Vec<InsuranceReport>> {
        self.get(self.endpoint(&["api", "insurance", ""], &[])?).await
    }

    async fn score(&self, vehicle_id: &str, date: NaiveDate) -> Result<ScoreData> {
        let date = date.format("%Y-%m-%d").to_string();
        self.get(self.endpoint(&["api", "vehicles", vehicle_id, "score", &date], &[])?)
            .await
    }

    async fn score_history(
        &self,
        vehicle_id: &str,
        query: HistoryQuery,
    ) -> Result<ScoreHistoryResponse> {
        let url = self.endpoint(
            &["api", "vehicles", vehicle_id, "score-history"],
            &query.query_pairs(),
        )?;
        self.get(url).await
    }

    async fn events(&self, vehicle_id: &str, window: &ReportWindow) -> Result<Vec<Event>> {
        let url = self.endpoint(
            &["api", "vehicles", vehicle_id, "events"],
            &[
                (
                    "start",
                    window.start().to_rfc3339_opts(SecondsFormat::Secs, true),
                ),
                ("end", window.end().to_rfc3339_opts(SecondsFormat::Secs, true)),
            ],
        )?;
        debug!(url = %url, "GET");
        let bytes = fetch_bytes(&self.http, url.as_str()).await?;
        parse_events(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient<BasicClient> {
        RestClient::new(base, BasicClient::new()).unwrap()
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let url = client("http://localhost:8000")
            .endpoint(&["api", "vehicles", ""], &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/vehicles/");
    }

    #[test]
    fn test_endpoint_encodes_vehicle_id() {
        let url = client("http://localhost:8000")
            .endpoint(&["api", "vehicles", "KR 01/x?"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/vehicles/KR%2001%2Fx%3F");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_query() {
        let url = client("https://fleet.example.com/backend/")
            .endpoint(
                &["api", "vehicles", "V1", "score-history"],
                &HistoryQuery::LastDays(30).query_pairs(),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://fleet.example.com/backend/api/vehicles/V1/score-history?days=30"
        );
    }

    #[test]
    fn test_from_config_builds_timed_client() {
        let config = ApiConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout: std::time::Duration::from_secs(5),
        };
        assert!(RestClient::from_config(&config).is_ok());
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(RestClient::new("mailto:ops@example.com", BasicClient::new()).is_err());
        assert!(RestClient::new("not a url", BasicClient::new()).is_err());
    }
}
