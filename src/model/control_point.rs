/// Timing-related info about this control point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TimingPoint {
    pub time: f64,
    pub beat_len: f64,
    pub time_signature: u32,
}

impl TimingPoint {
    pub const DEFAULT_BEAT_LEN: f64 = 60_000.0 / 60.0;
    pub const DEFAULT_TIME_SIGNATURE: u32 = 4;

    pub fn new(time: f64, beat_len: f64, time_signature: u32) -> Self {
        Self {
            time,
            beat_len: beat_len.clamp(6.0, 60_000.0),
            time_signature,
        }
    }

    pub fn bpm(&self) -> f64 {
        60_000.0 / self.beat_len
    }
}

impl Default for TimingPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            beat_len: Self::DEFAULT_BEAT_LEN,
            time_signature: Self::DEFAULT_TIME_SIGNATURE,
        }
    }
}

/// Slider velocity changes through inherited timing points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DifficultyPoint {
    pub time: f64,
    pub slider_velocity: f64,
    pub generate_ticks: bool,
}

impl DifficultyPoint {
    pub const DEFAULT_SLIDER_VELOCITY: f64 = 1.0;
    pub const DEFAULT_GENERATE_TICKS: bool = true;

    /// Create a point from the negative beat length of an inherited timing
    /// point. A NaN beat length disables slider ticks.
    pub fn new(time: f64, beat_len: f64) -> Self {
        if beat_len.is_nan() {
            return Self {
                time,
                slider_velocity: Self::DEFAULT_SLIDER_VELOCITY,
                generate_ticks: false,
            };
        }

        Self {
            time,
            slider_velocity: (-100.0 / beat_len).clamp(0.1, 10.0),
            generate_ticks: true,
        }
    }
}

impl Default for DifficultyPoint {
    fn default() -> Self {
        Self {
            time: 0.0,
            slider_velocity: Self::DEFAULT_SLIDER_VELOCITY,
            generate_ticks: Self::DEFAULT_GENERATE_TICKS,
        }
    }
}

/// Effect-related info about this control point.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EffectPoint {
    pub time: f64,
    pub kiai: bool,
}

pub(crate) fn timing_point_at(points: &[TimingPoint], time: f64) -> Option<&TimingPoint> {
    let i = points
        .binary_search_by(|point| point.time.total_cmp(&time))
        .unwrap_or_else(|i| i.saturating_sub(1));

    points.get(i)
}

pub(crate) fn difficulty_point_at(
    points: &[DifficultyPoint],
    time: f64,
) -> Option<&DifficultyPoint> {
    point_at(points, time, |point| point.time)
}

pub(crate) fn effect_point_at(points: &[EffectPoint], time: f64) -> Option<&EffectPoint> {
    point_at(points, time, |point| point.time)
}

/// The last point at or before `time`.
fn point_at<T>(points: &[T], time: f64, get_time: impl Fn(&T) -> f64) -> Option<&T> {
    points
        .binary_search_by(|point| get_time(point).total_cmp(&time))
        .map_or_else(|i| i.checked_sub(1), Some)
        .map(|i| &points[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_point_before_first_uses_first() {
        let points = [
            TimingPoint::new(1000.0, 500.0, 4),
            TimingPoint::new(2000.0, 250.0, 4),
        ];

        let first = timing_point_at(&points, 0.0).map(|p| p.beat_len);
        let second = timing_point_at(&points, 2500.0).map(|p| p.beat_len);

        assert_eq!(first, Some(500.0));
        assert_eq!(second, Some(250.0));
    }

    #[test]
    fn difficulty_point_before_first_is_none() {
        let points = [DifficultyPoint::new(1000.0, -50.0)];

        assert!(difficulty_point_at(&points, 500.0).is_none());

        let sv = difficulty_point_at(&points, 1000.0).map(|p| p.slider_velocity);
        assert_eq!(sv, Some(2.0));
    }
}
