//! Output formatting and persistence for timelines.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::timeline::Bucket;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct BucketRow<'a> {
    vehicle_id: &'a str,
    label: String,
    collision_count: usize,
    engine_off_count: usize,
}

/// Appends one CSV row per [`Bucket`] to `path`.
///
/// Creates the file with headers if it does not already exist.
pub fn append_buckets(path: &str, vehicle_id: &str, buckets: &[Bucket]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = buckets.len(), "Appending bucket rows");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    for bucket in buckets {
        writer.serialize(BucketRow {
            vehicle_id,
            label: bucket.label.to_rfc3339(),
            collision_count: bucket.collision_count,
            engine_off_count: bucket.engine_off_count,
        })?;
    }
    writer.flush()?;

    Ok(())
}
