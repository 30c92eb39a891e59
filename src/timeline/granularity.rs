use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::timeline::types::ReportWindow;

/// Width of a timeline bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Minute,
    Day,
}

impl Granularity {
    /// Minute buckets when both ends of the window share a UTC calendar
    /// date, day buckets otherwise.
    pub fn for_window(window: &ReportWindow) -> Self {
        if window.start().date_naive() == window.end().date_naive() {
            Granularity::Minute
        } else {
            Granularity::Day
        }
    }

    pub fn as_duration(self) -> Duration {
        match self {
            Granularity::Minute => Duration::minutes(1),
            Granularity::Day => Duration::days(1),
        }
    }

    pub(crate) fn millis(self) -> i64 {
        self.as_duration().num_milliseconds()
    }

    /// `ceil(span / granularity) + 1`, never less than one.
    pub fn bucket_count(self, window: &ReportWindow) -> usize {
        let span = (window.end() - window.start()).num_milliseconds().max(0);
        let step = self.millis();
        let full = span / step + i64::from(span % step != 0);
        (full as usize).saturating_add(1)
    }
}

/// Which bucket receives an event that sits exactly on a bucket edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgePolicy {
    /// The edge instant opens the later bucket (floor assignment).
    #[default]
    StartsBucket,
    /// The edge instant closes the earlier bucket.
    EndsBucket,
}

impl EdgePolicy {
    /// Bucket index for `instant`, or `None` if it lies before `start`.
    ///
    /// The caller clamps the result into the bucket range.
    pub fn index(
        self,
        start: DateTime<Utc>,
        instant: DateTime<Utc>,
        granularity: Granularity,
    ) -> Option<usize> {
        let offset = (instant - start).num_milliseconds();
        if offset < 0 {
            return None;
        }

        let step = granularity.millis();
        let index = offset / step;
        let on_edge = offset % step == 0;

        let index = match self {
            EdgePolicy::StartsBucket => index,
            EdgePolicy::EndsBucket if on_edge && index > 0 => index - 1,
            EdgePolicy::EndsBucket => index,
        };

        Some(index as usize)
    }
}
