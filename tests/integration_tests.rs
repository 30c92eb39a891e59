use fleet_timeline::events::{parse_events, parse_instant};
use fleet_timeline::timeline::{
    Canvas, Granularity, Margins, ReportWindow, Timeline, compute_bar_geometry,
};

fn window(start: &str, end: &str) -> ReportWindow {
    ReportWindow::new(parse_instant(start).unwrap(), parse_instant(end).unwrap()).unwrap()
}

#[test]
fn test_same_day_pipeline() {
    let bytes = include_bytes!("fixtures/events_same_day.json");
    let events = parse_events(bytes).expect("Failed to parse events");
    assert_eq!(events.len(), 4);

    let timeline = Timeline::build(&events, window("2025-09-23T00:00:00Z", "2025-09-23T00:05:00Z"))
        .expect("Failed to build timeline");

    assert_eq!(timeline.granularity, Granularity::Minute);
    assert_eq!(timeline.buckets.len(), 6);
    // the event from the previous day is outside the window
    assert_eq!(timeline.collisions, 2);
    assert_eq!(timeline.engine_offs, 1);
    assert_eq!(timeline.buckets[1].collision_count, 1);
    assert_eq!(timeline.buckets[1].engine_off_count, 1);
    assert_eq!(timeline.buckets[4].collision_count, 1);

    let canvas = Canvas {
        width: 800.0,
        height: 240.0,
        margins: Margins::uniform(32.0),
    };
    let bars = compute_bar_geometry(&timeline.buckets, &canvas);

    assert_eq!(bars.len(), timeline.buckets.len());
    assert!(bars[0].collision.is_none());
    let tallest = bars[1].collision.unwrap();
    assert!((tallest.height - 88.0).abs() < 1e-9);
    assert!((tallest.y + tallest.height - canvas.baseline()).abs() < 1e-9);
}

#[test]
fn test_multi_day_pipeline() {
    let bytes = include_bytes!("fixtures/events_multi_day.json");
    let events = parse_events(bytes).expect("Failed to parse events");

    let timeline = Timeline::build(&events, window("2025-09-20", "2025-09-23"))
        .expect("Failed to build timeline");

    assert_eq!(timeline.granularity, Granularity::Day);
    let labels: Vec<String> = timeline
        .buckets
        .iter()
        .map(|b| b.label.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(labels, ["2025-09-20", "2025-09-21", "2025-09-22", "2025-09-23"]);

    let counts: Vec<(usize, usize)> = timeline
        .buckets
        .iter()
        .map(|b| (b.collision_count, b.engine_off_count))
        .collect();
    assert_eq!(counts, [(1, 0), (0, 0), (1, 1), (0, 1)]);
}

#[test]
fn test_reversed_window_is_rejected() {
    let start = parse_instant("2025-09-23").unwrap();
    let end = parse_instant("2025-09-20").unwrap();
    assert!(ReportWindow::new(start, end).is_err());
}
