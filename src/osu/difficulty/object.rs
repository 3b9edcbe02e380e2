use crate::{
    any::difficulty::object::IDifficultyObject,
    model::pos::Pos,
    osu::object::{OsuObject, OsuObjectKind},
};

use super::{scaling_factor::ScalingFactor, HD_FADE_OUT_DURATION_MULTIPLIER};

/// An [`OsuObject`] together with its movement relative to the previous
/// objects.
///
/// Distances are normalized to a circle radius of
/// [`NORMALIZED_RADIUS`](Self::NORMALIZED_RADIUS), times are divided by the
/// clock rate.
pub struct OsuDifficultyObject<'a> {
    pub idx: usize,
    pub base: &'a OsuObject,
    pub start_time: f64,
    pub delta_time: f64,
    /// `delta_time`, but at least [`MIN_DELTA_TIME`](Self::MIN_DELTA_TIME).
    pub strain_time: f64,
    /// From the end of the previous lazy cursor path to this object.
    pub lazy_jump_dist: f64,
    /// Shortest jump distance when the previous slider was fully followed.
    pub min_jump_dist: f64,
    pub min_jump_time: f64,
    /// Lazy cursor travel along this slider, zero for other objects.
    pub travel_dist: f64,
    pub travel_time: f64,
    /// Angle between the jumps into and out of the previous object.
    pub angle: Option<f64>,
}

/// Cursor movement from one object to the next.
#[derive(Default)]
struct Jump {
    lazy_dist: f64,
    min_dist: f64,
    min_time: f64,
}

impl<'a> OsuDifficultyObject<'a> {
    pub const NORMALIZED_RADIUS: i32 = 50;
    pub const NORMALIZED_DIAMETER: i32 = Self::NORMALIZED_RADIUS * 2;

    pub const MIN_DELTA_TIME: f64 = 25.0;
    const MAX_SLIDER_RADIUS: f32 = Self::NORMALIZED_RADIUS as f32 * 2.4;
    pub(crate) const ASSUMED_SLIDER_RADIUS: f32 = Self::NORMALIZED_RADIUS as f32 * 1.8;

    pub fn new(
        base: &'a OsuObject,
        last: &'a OsuObject,
        last_last: Option<&OsuObject>,
        clock_rate: f64,
        idx: usize,
        scaling_factor: &ScalingFactor,
    ) -> Self {
        let delta_time = (base.start_time - last.start_time) / clock_rate;
        let strain_time = delta_time.max(Self::MIN_DELTA_TIME);

        let (travel_dist, travel_time) = match base.kind {
            OsuObjectKind::Slider(ref slider) => {
                let repeats = slider.repeat_count() as f64;
                let stretch = (1.0 + repeats / 2.5).powf(1.0 / 2.5) as f32;

                (
                    f64::from(slider.lazy_travel_dist * stretch),
                    Self::lazy_travel_time(base, clock_rate),
                )
            }
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => (0.0, 0.0),
        };

        let moves = !base.is_spinner() && !last.is_spinner();

        let jump = if moves {
            Self::jump(base, last, strain_time, clock_rate, scaling_factor.factor)
        } else {
            Jump::default()
        };

        let angle = last_last
            .filter(|h| moves && !h.is_spinner())
            .map(|last_last| angle(base, last, last_last));

        Self {
            idx,
            base,
            start_time: base.start_time / clock_rate,
            delta_time,
            strain_time,
            lazy_jump_dist: jump.lazy_dist,
            min_jump_dist: jump.min_dist,
            min_jump_time: jump.min_time,
            travel_dist,
            travel_time,
            angle,
        }
    }

    fn lazy_travel_time(h: &OsuObject, clock_rate: f64) -> f64 {
        (h.lazy_travel_time() / clock_rate).max(Self::MIN_DELTA_TIME)
    }

    fn jump(
        base: &OsuObject,
        last: &OsuObject,
        strain_time: f64,
        clock_rate: f64,
        scaling_factor: f32,
    ) -> Jump {
        let from = end_cursor_pos(last) * scaling_factor;
        let lazy_dist = f64::from((base.stacked_pos() * scaling_factor - from).length());

        if !last.is_slider() {
            return Jump {
                lazy_dist,
                min_dist: lazy_dist,
                min_time: strain_time,
            };
        }

        let last_travel_time = Self::lazy_travel_time(last, clock_rate);
        let min_time = (strain_time - last_travel_time).max(Self::MIN_DELTA_TIME);

        // Jumping from the actual slider tail, the follow circle still
        // covers part of the distance
        let tail_dist = (last.stacked_end_pos() - base.stacked_pos()).length() * scaling_factor;
        let radius_diff = f64::from(Self::MAX_SLIDER_RADIUS - Self::ASSUMED_SLIDER_RADIUS);
        let from_tail = f64::from(tail_dist - Self::MAX_SLIDER_RADIUS);

        Jump {
            lazy_dist,
            min_dist: (lazy_dist - radius_diff).min(from_tail).max(0.0),
            min_time,
        }
    }

    /// Visibility in `[0, 1]` of the object at `time`. Zero once it has been
    /// hit.
    pub fn opacity_at(&self, time: f64, hidden: bool, time_preempt: f64, time_fade_in: f64) -> f64 {
        let start_time = self.base.start_time;

        if time > start_time {
            return 0.0;
        }

        let fade_in_start = start_time - time_preempt;
        let fade_in = ((time - fade_in_start) / time_fade_in).clamp(0.0, 1.0);

        if !hidden {
            return fade_in;
        }

        let fade_out_start = fade_in_start + time_fade_in;
        let fade_out_duration = time_preempt * HD_FADE_OUT_DURATION_MULTIPLIER;
        let fade_out = ((time - fade_out_start) / fade_out_duration).clamp(0.0, 1.0);

        fade_in.min(1.0 - fade_out)
    }

    /// How much this object and `next` resemble a doubletap, in `[0, 1]`.
    pub fn doubletapness(&self, next: Option<&Self>, hit_window: f64) -> f64 {
        let Some(next) = next else { return 0.0 };

        let hit_window = if self.base.is_spinner() { 0.0 } else { hit_window };

        let delta = self.delta_time.max(1.0);
        let next_delta = next.delta_time.max(1.0);

        let speed_ratio = delta / delta.max((next_delta - delta).abs());
        let window_ratio = (delta / hit_window).min(1.0).powf(2.0);

        1.0 - speed_ratio.powf(1.0 - window_ratio)
    }
}

/// Absolute angle at `last` between the incoming and the outgoing jump.
fn angle(base: &OsuObject, last: &OsuObject, last_last: &OsuObject) -> f64 {
    let incoming = end_cursor_pos(last_last) - last.stacked_pos();
    let outgoing = base.stacked_pos() - end_cursor_pos(last);

    let dot = incoming.dot(outgoing);
    let det = incoming.x * outgoing.y - incoming.y * outgoing.x;

    f64::from(det).atan2(f64::from(dot)).abs()
}

/// Sliders end wherever the lazy cursor ended up.
fn end_cursor_pos(h: &OsuObject) -> Pos {
    match h.kind {
        OsuObjectKind::Slider(ref slider) => slider.lazy_end_pos,
        OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => h.stacked_pos(),
    }
}

impl IDifficultyObject for OsuDifficultyObject<'_> {
    fn idx(&self) -> usize {
        self.idx
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }
}
