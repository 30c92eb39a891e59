use crate::timeline::types::{BarRect, BarSlot, Bucket, Canvas};

/// Share of each slot covered by its bar pair; the remainder is the gap
/// between neighbouring buckets.
pub const BAR_FILL: f64 = 0.6;

/// Maps bucket counts to pixel rectangles for a grouped bar chart.
///
/// The drawable area is split into equal slots, the first starting on the
/// left margin. Each slot centres its bar pair: the collision bar on the
/// left half, the engine-off bar on the right half. Heights are scaled
/// against the busiest bucket, with a floor of one so an all-zero series
/// never divides by zero. Every rectangle stays inside the drawable area.
pub fn compute_bar_geometry(buckets: &[Bucket], canvas: &Canvas) -> Vec<BarSlot> {
    if buckets.is_empty() {
        return Vec::new();
    }

    let n = buckets.len();
    let drawable_width = canvas.drawable_width();
    let drawable_height = canvas.drawable_height();
    let baseline = canvas.baseline();

    let slot_width = drawable_width / n as f64;
    let bar_width = slot_width * BAR_FILL / 2.0;
    let inset = (slot_width - 2.0 * bar_width) / 2.0;

    let max_count = buckets.iter().map(Bucket::total).max().unwrap_or(0).max(1) as f64;

    let bar = |count: usize, x: f64| -> Option<BarRect> {
        if count == 0 {
            return None;
        }
        let height = count as f64 / max_count * drawable_height;
        Some(BarRect {
            x,
            y: baseline - height,
            width: bar_width,
            height,
        })
    };

    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let x = canvas.margins.left + i as f64 * slot_width;
            BarSlot {
                label: bucket.label,
                x,
                slot_width,
                collision: bar(bucket.collision_count, x + inset),
                engine_off: bar(bucket.engine_off_count, x + inset + bar_width),
            }
        })
        .collect()
}
