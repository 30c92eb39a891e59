//! Vehicle telemetry events and their JSON decoding.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single timestamped event reported for a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(deserialize_with = "deserialize_instant")]
    pub timestamp: DateTime<Utc>,
    pub vehicle_id: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Kind-specific payload. Tagged on the wire by a `"type"` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Damage is nominally 1-5 but is carried through unchecked.
    Collision { damage: i64 },
    EngineOff {
        speed: f64,
        gear_status: String,
        gyro: f64,
        side: String,
        ignition: bool,
    },
}

/// Parses an instant given either as RFC 3339, as a naive ISO-8601
/// date-time (taken as UTC), or as a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("unrecognised timestamp '{s}'"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("invalid midnight for date '{s}'"))
}

fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

/// Decodes a JSON event list.
///
/// Accepts either a bare array or an object with an `events` array.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON, the top-level shape is
/// neither form, or any event is malformed.
pub fn parse_events(bytes: &[u8]) -> Result<Vec<Event>> {
    let value: Value = serde_json::from_slice(bytes).context("event payload is not valid JSON")?;

    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("events")
            .ok_or_else(|| anyhow!("event payload object has no 'events' field"))?,
        other => bail!("unexpected event payload shape: {}", type_name(&other)),
    };

    Ok(serde_json::from_value(list)?)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
impl Event {
    pub(crate) fn collision(vehicle_id: &str, timestamp: DateTime<Utc>, damage: i64) -> Self {
        Self {
            timestamp,
            vehicle_id: vehicle_id.to_string(),
            kind: EventKind::Collision { damage },
        }
    }

    pub(crate) fn engine_off(vehicle_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            vehicle_id: vehicle_id.to_string(),
            kind: EventKind::EngineOff {
                speed: 0.0,
                gear_status: "P".to_string(),
                gyro: 0.0,
                side: "none".to_string(),
                ignition: false,
            },
        }
    }
}
