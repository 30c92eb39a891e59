//! Data types used by the timeline bucketer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by the timeline core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("invalid report window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// Inclusive reporting range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimelineError> {
        if start > end {
            return Err(TimelineError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// One time bucket with per-kind event counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: DateTime<Utc>,
    pub collision_count: usize,
    pub engine_off_count: usize,
}

impl Bucket {
    pub(crate) fn empty(label: DateTime<Utc>) -> Self {
        Self {
            label,
            collision_count: 0,
            engine_off_count: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.collision_count + self.engine_off_count
    }
}

/// Per-side padding around the drawable chart area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(px: f64) -> Self {
        Self {
            top: px,
            right: px,
            bottom: px,
            left: px,
        }
    }
}

/// Target canvas for the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Canvas {
    pub fn drawable_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    pub fn drawable_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Y coordinate of the chart baseline (bottom of the drawable area).
    pub fn baseline(&self) -> f64 {
        self.margins.top + self.drawable_height()
    }
}

/// A bar rectangle in SVG coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Geometry for one bucket: the slot anchor and its two bars.
///
/// A bar is `None` when the corresponding count is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSlot {
    pub label: DateTime<Utc>,
    pub x: f64,
    pub slot_width: f64,
    pub collision: Option<BarRect>,
    pub engine_off: Option<BarRect>,
}
