use chrono::Duration;
use serde::Serialize;
use tracing::{debug, trace};

use crate::events::{Event, EventKind};
use crate::timeline::granularity::{EdgePolicy, Granularity};
use crate::timeline::types::{Bucket, ReportWindow, TimelineError};

/// Assigns every in-window event to exactly one bucket.
///
/// Granularity is picked from the window (see [`Granularity::for_window`])
/// and edge instants open the later bucket. Events outside the window are
/// left out of every count.
pub fn compute_buckets(
    events: &[Event],
    window: &ReportWindow,
) -> Result<Vec<Bucket>, TimelineError> {
    compute_buckets_with(events, window, EdgePolicy::default())
}

/// Same as [`compute_buckets`] with an explicit edge policy.
pub fn compute_buckets_with(
    events: &[Event],
    window: &ReportWindow,
    policy: EdgePolicy,
) -> Result<Vec<Bucket>, TimelineError> {
    // Windows built through `ReportWindow::new` are already ordered, but the
    // fields are reachable inside the crate.
    if window.start() > window.end() {
        return Err(TimelineError::InvalidWindow {
            start: window.start(),
            end: window.end(),
        });
    }

    let granularity = Granularity::for_window(window);
    let count = granularity.bucket_count(window);
    let step = granularity.millis();

    // Labels past the representable range are dropped; they lie after
    // `end`, so no in-window event can land in them.
    let mut buckets: Vec<Bucket> = (0..count)
        .map_while(|i| {
            window
                .start()
                .checked_add_signed(Duration::milliseconds(step * i as i64))
                .map(Bucket::empty)
        })
        .collect();
    let count = buckets.len();

    let mut skipped = 0usize;

    for event in events {
        if !window.contains(event.timestamp) {
            skipped += 1;
            continue;
        }

        let Some(index) = policy.index(window.start(), event.timestamp, granularity) else {
            skipped += 1;
            continue;
        };
        let bucket = &mut buckets[index.min(count - 1)];

        match event.kind {
            EventKind::Collision { .. } => bucket.collision_count += 1,
            EventKind::EngineOff { .. } => bucket.engine_off_count += 1,
        }

        trace!(
            vehicle_id = %event.vehicle_id,
            timestamp = %event.timestamp,
            index,
            "Event assigned to bucket"
        );
    }

    debug!(
        ?granularity,
        buckets = count,
        events = events.len(),
        skipped,
        "Timeline buckets computed"
    );

    Ok(buckets)
}

/// Buckets for a window together with the granularity used and totals.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub window: ReportWindow,
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
    pub collisions: usize,
    pub engine_offs: usize,
}

impl Timeline {
    pub fn build(events: &[Event], window: ReportWindow) -> Result<Self, TimelineError> {
        let buckets = compute_buckets(events, &window)?;
        let collisions = buckets.iter().map(|b| b.collision_count).sum();
        let engine_offs = buckets.iter().map(|b| b.engine_off_count).sum();

        Ok(Self {
            window,
            granularity: Granularity::for_window(&window),
            buckets,
            collisions,
            engine_offs,
        })
    }

    /// Largest combined count in any bucket, floored at one.
    pub fn peak(&self) -> usize {
        self.buckets.iter().map(Bucket::total).max().unwrap_or(0).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> ReportWindow {
        ReportWindow::new(start, end).unwrap()
    }

    #[test]
    fn test_minute_boundary_example() {
        let w = window(ts(2025, 9, 23, 0, 0, 0), ts(2025, 9, 23, 0, 2, 0));
        let events = vec![
            Event::collision("V-1", ts(2025, 9, 23, 0, 1, 0), 2),
            Event::engine_off("V-1", ts(2025, 9, 23, 0, 1, 30)),
        ];

        let buckets = compute_buckets(&events, &w).unwrap();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].label, ts(2025, 9, 23, 0, 0, 0));
        assert_eq!(buckets[1].label, ts(2025, 9, 23, 0, 1, 0));
        assert_eq!(buckets[2].label, ts(2025, 9, 23, 0, 2, 0));
        assert_eq!(buckets[0].total(), 0);
        assert_eq!(buckets[1].collision_count, 1);
        assert_eq!(buckets[1].engine_off_count, 1);
        assert_eq!(buckets[2].total(), 0);
    }

    #[test]
    fn test_day_boundary_example() {
        let w = window(ts(2025, 9, 20, 0, 0, 0), ts(2025, 9, 23, 0, 0, 0));
        let events = vec![Event::collision("V-1", ts(2025, 9, 22, 23, 59, 59), 1)];

        let buckets = compute_buckets(&events, &w).unwrap();

        assert_eq!(buckets.len(), 4);
        let hit: Vec<_> = buckets.iter().filter(|b| b.collision_count > 0).collect();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].label, ts(2025, 9, 22, 0, 0, 0));
    }

    #[test]
    fn test_empty_events_all_zero() {
        let w = window(ts(2025, 9, 23, 8, 0, 0), ts(2025, 9, 23, 8, 10, 0));
        let buckets = compute_buckets(&[], &w).unwrap();

        assert_eq!(buckets.len(), 11);
        assert!(buckets.iter().all(|b| b.total() == 0));
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        let err = ReportWindow::new(ts(2025, 9, 23, 1, 0, 0), ts(2025, 9, 23, 0, 0, 0)).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidWindow { .. }));

        // constructed directly inside the crate, bypassing `new`
        let reversed = ReportWindow {
            start: ts(2025, 9, 23, 1, 0, 0),
            end: ts(2025, 9, 23, 0, 0, 0),
        };
        assert!(matches!(
            compute_buckets(&[], &reversed),
            Err(TimelineError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_out_of_window_events_are_dropped() {
        let w = window(ts(2025, 9, 23, 0, 0, 0), ts(2025, 9, 23, 0, 2, 0));
        let events = vec![
            Event::collision("V-1", ts(2025, 9, 22, 23, 59, 59), 1),
            Event::collision("V-1", ts(2025, 9, 23, 0, 2, 1), 1),
            Event::engine_off("V-1", ts(2025, 9, 23, 0, 2, 0)),
        ];

        let buckets = compute_buckets(&events, &w).unwrap();

        assert_eq!(buckets.iter().map(|b| b.collision_count).sum::<usize>(), 0);
        // the inclusive end lands in the final bucket
        assert_eq!(buckets[2].engine_off_count, 1);
    }

    #[test]
    fn test_many_events_in_one_bucket_are_all_counted() {
        let w = window(ts(2025, 9, 23, 0, 0, 0), ts(2025, 9, 23, 0, 5, 0));
        let events: Vec<Event> = (0..25)
            .map(|s| Event::collision("V-1", ts(2025, 9, 23, 0, 3, s), 1))
            .collect();

        let buckets = compute_buckets(&events, &w).unwrap();
        assert_eq!(buckets[3].collision_count, 25);
    }

    #[test]
    fn test_labels_are_contiguous() {
        let w = window(ts(2025, 9, 1, 6, 0, 0), ts(2025, 9, 10, 18, 0, 0));
        let buckets = compute_buckets(&[], &w).unwrap();

        for pair in buckets.windows(2) {
            assert_eq!(pair[1].label - pair[0].label, Duration::days(1));
        }
    }

    #[test]
    fn test_minute_labels_are_contiguous() {
        let w = window(ts(2025, 9, 23, 6, 0, 0), ts(2025, 9, 23, 7, 30, 15));
        let buckets = compute_buckets(&[], &w).unwrap();

        // 90m15s -> ceil = 91 minutes, plus one
        assert_eq!(buckets.len(), 92);
        assert_eq!(buckets[0].label, w.start());
        for pair in buckets.windows(2) {
            assert_eq!(pair[1].label - pair[0].label, Duration::minutes(1));
        }
    }

    #[test]
    fn test_empty_multi_day_window_length() {
        let w = window(ts(2025, 9, 1, 0, 0, 0), ts(2025, 9, 15, 0, 0, 0));
        let buckets = compute_buckets(&[], &w).unwrap();

        assert_eq!(Granularity::for_window(&w), Granularity::Day);
        assert_eq!(buckets.len(), 15);
        assert!(buckets.iter().all(|b| b.total() == 0));
    }

    #[test]
    fn test_window_ending_at_max_instant() {
        let end = DateTime::<Utc>::MAX_UTC;
        let start = end.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc();
        let w = window(start, end);
        let events = vec![Event::collision("V-1", end, 1)];

        let buckets = compute_buckets(&events, &w).unwrap();

        // the label one minute after the final bucket is not representable
        assert_eq!(buckets.len(), 1440);
        assert_eq!(buckets.last().unwrap().collision_count, 1);
    }

    #[test]
    fn test_partial_day_window_end_lands_in_last_bucket() {
        // 2.5 days -> ceil(2.5) + 1 = 4 buckets; end maps to index 2
        let w = window(ts(2025, 9, 20, 0, 0, 0), ts(2025, 9, 22, 12, 0, 0));
        let events = vec![Event::engine_off("V-1", ts(2025, 9, 22, 12, 0, 0))];

        let buckets = compute_buckets(&events, &w).unwrap();

        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[2].engine_off_count, 1);
        assert_eq!(buckets[3].total(), 0);
    }

    #[test]
    fn test_ends_bucket_policy() {
        let w = window(ts(2025, 9, 23, 0, 0, 0), ts(2025, 9, 23, 0, 2, 0));
        let events = vec![Event::collision("V-1", ts(2025, 9, 23, 0, 1, 0), 1)];

        let buckets = compute_buckets_with(&events, &w, EdgePolicy::EndsBucket).unwrap();
        assert_eq!(buckets[0].collision_count, 1);
        assert_eq!(buckets[1].collision_count, 0);
    }

    #[test]
    fn test_timeline_totals_and_peak() {
        let w = window(ts(2025, 9, 23, 0, 0, 0), ts(2025, 9, 23, 0, 2, 0));
        let events = vec![
            Event::collision("V-1", ts(2025, 9, 23, 0, 0, 10), 5),
            Event::collision("V-1", ts(2025, 9, 23, 0, 0, 20), 5),
            Event::engine_off("V-1", ts(2025, 9, 23, 0, 0, 30)),
            Event::engine_off("V-1", ts(2025, 9, 23, 0, 2, 0)),
        ];

        let timeline = Timeline::build(&events, w).unwrap();

        assert_eq!(timeline.granularity, Granularity::Minute);
        assert_eq!(timeline.collisions, 2);
        assert_eq!(timeline.engine_offs, 2);
        assert_eq!(timeline.peak(), 3);
    }

    #[test]
    fn test_timeline_peak_floor_is_one() {
        let at = ts(2025, 9, 23, 0, 0, 0);
        let timeline = Timeline::build(&[], window(at, at)).unwrap();
        assert_eq!(timeline.buckets.len(), 1);
        assert_eq!(timeline.peak(), 1);
    }
}
