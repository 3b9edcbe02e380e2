/// Maps a difficulty value in `[0, 10]` onto a range whose midpoint lies at
/// difficulty `5`.
pub fn difficulty_range(difficulty: f64, min: f64, mid: f64, max: f64) -> f64 {
    if difficulty > 5.0 {
        mid + (max - mid) * (difficulty - 5.0) / 5.0
    } else if difficulty < 5.0 {
        mid - (mid - min) * (5.0 - difficulty) / 5.0
    } else {
        mid
    }
}

/// Beat length scaled by the slider velocity the way legacy clients stored
/// it, i.e. as an `f32` multiplier clamped into `[0.1, 100]`.
pub fn precision_adjusted_beat_len(slider_velocity: f64, beat_len: f64) -> f64 {
    let slider_velocity_as_beat_len = -100.0 / slider_velocity;

    let bpm_multiplier = if slider_velocity_as_beat_len < 0.0 {
        f64::from(((-slider_velocity_as_beat_len) as f32).clamp(10.0, 10_000.0)) / 100.0
    } else {
        1.0
    };

    beat_len * bpm_multiplier
}

pub const fn bpm_to_milliseconds(bpm: f64, delimiter: Option<i32>) -> f64 {
    let delimiter = match delimiter {
        Some(delimiter) => delimiter,
        None => 4,
    };

    60_000.0 / delimiter as f64 / bpm
}

pub const fn milliseconds_to_bpm(ms: f64, delimiter: Option<i32>) -> f64 {
    let delimiter = match delimiter {
        Some(delimiter) => delimiter,
        None => 4,
    };

    60_000.0 / (ms * delimiter as f64)
}

pub fn logistic(x: f64, midpoint_offset: f64, multiplier: f64, max_value: Option<f64>) -> f64 {
    max_value.unwrap_or(1.0) / (1.0 + f64::exp(multiplier * (midpoint_offset - x)))
}

pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

pub fn reverse_lerp(x: f64, start: f64, end: f64) -> f64 {
    if (end - start).abs() < f64::EPSILON {
        return 0.0;
    }

    ((x - start) / (end - start)).clamp(0.0, 1.0)
}

pub fn smoothstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * (3.0 - 2.0 * x)
}

pub fn smootherstep(x: f64, start: f64, end: f64) -> f64 {
    let x = reverse_lerp(x, start, end);

    x * x * x * (x * (6.0 * x - 15.0) + 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preempt_range() {
        assert!((difficulty_range(0.0, 1800.0, 1200.0, 450.0) - 1800.0).abs() < f64::EPSILON);
        assert!((difficulty_range(5.0, 1800.0, 1200.0, 450.0) - 1200.0).abs() < f64::EPSILON);
        assert!((difficulty_range(9.0, 1800.0, 1200.0, 450.0) - 600.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_lerp_empty_range() {
        assert!(reverse_lerp(3.0, 2.0, 2.0).abs() < f64::EPSILON);
        assert!((smoothstep(10.0, 0.0, 5.0) - 1.0).abs() < f64::EPSILON);
    }
}
