use std::collections::HashMap;

use crate::model::{control_point::TimingPoint, hit_object::HitObject};

/// The most common BPM of a map, weighted by how long each beat length lasts.
///
/// Maps without timing points have a BPM of `0`.
pub fn bpm(last_hit_object: Option<&HitObject>, timing_points: &[TimingPoint]) -> f64 {
    // Slider end times are unknown at this point so sliders count up to
    // their start time.
    let last_time = last_hit_object
        .map(HitObject::end_time)
        .or_else(|| timing_points.last().map(|t| t.time))
        .unwrap_or(0.0);

    let mut durations = HashMap::<u64, f64>::new();

    for (i, point) in timing_points.iter().enumerate() {
        // The first point always counts from zero
        let start = if i == 0 { 0.0 } else { point.time };

        if start > last_time {
            continue;
        }

        let end = timing_points
            .get(i + 1)
            .map_or(last_time, |next| next.time);

        let beat_len = (1000.0 * point.beat_len).round() / 1000.0;
        *durations.entry(beat_len.to_bits()).or_default() += end - start;
    }

    durations
        .into_iter()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0.0, |(beat_len, _)| 60_000.0 / f64::from_bits(beat_len))
}
