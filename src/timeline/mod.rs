//! Event timeline bucketing and bar-chart geometry.
//!
//! Collision and engine-off events are counted into minute or day buckets
//! over a report window, and the counts are mapped onto pixel rectangles
//! for a grouped bar chart. Everything here is pure and synchronous.

pub mod bucket;
pub mod geometry;
pub mod granularity;
pub mod types;

pub use bucket::{Timeline, compute_buckets, compute_buckets_with};
pub use geometry::compute_bar_geometry;
pub use granularity::{EdgePolicy, Granularity};
pub use types::{BarRect, BarSlot, Bucket, Canvas, Margins, ReportWindow, TimelineError};
