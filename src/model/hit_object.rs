use crate::curve::{Curve, PathControlPoint};

use super::pos::Pos;

/// All hitobject related data required for difficulty and performance
/// calculation except for the [`HitSoundType`].
#[derive(Clone, Debug, PartialEq)]
pub struct HitObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: HitObjectKind,
}

impl HitObject {
    pub const fn is_circle(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Spinner(_))
    }

    pub const fn is_hold_note(&self) -> bool {
        matches!(&self.kind, HitObjectKind::Hold(_))
    }

    /// The end time of the object.
    ///
    /// Sliders need timing information to know their duration so their start
    /// time is returned instead.
    pub fn end_time(&self) -> f64 {
        match &self.kind {
            HitObjectKind::Circle | HitObjectKind::Slider(_) => self.start_time,
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => self.start_time + *duration,
        }
    }
}

/// Additional data for a [`HitObject`].
///
/// Each mode handles these differently.
#[derive(Clone, Debug, PartialEq)]
pub enum HitObjectKind {
    Circle,
    Slider(Slider),
    Spinner(Spinner),
    Hold(HoldNote),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slider {
    /// The pixel length given in the `.osu` file.
    pub expected_dist: Option<f64>,
    pub repeats: usize,
    pub control_points: Box<[PathControlPoint]>,
    /// Hitsounds of the head, each repeat, and the tail.
    pub node_sounds: Box<[HitSoundType]>,
}

impl Slider {
    pub const fn span_count(&self) -> usize {
        self.repeats + 1
    }

    pub fn curve(&self) -> Curve {
        Curve::new(&self.control_points, self.expected_dist)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spinner {
    pub duration: f64,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HoldNote {
    pub duration: f64,
}

/// Hitsound flags of an object.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HitSoundType(u8);

impl HitSoundType {
    pub const NONE: Self = Self(0);
    pub const NORMAL: Self = Self(1 << 0);
    pub const WHISTLE: Self = Self(1 << 1);
    pub const FINISH: Self = Self(1 << 2);
    pub const CLAP: Self = Self(1 << 3);

    pub const fn has_flag(self, flag: Self) -> bool {
        self.0 & flag.0 != 0
    }

    /// Whether the sound turns a taiko hit into a rim ("kat").
    pub const fn is_rim(self) -> bool {
        self.has_flag(Self::CLAP) || self.has_flag(Self::WHISTLE)
    }

    /// Whether the sound turns a taiko hit into a strong hit.
    pub const fn is_strong(self) -> bool {
        self.has_flag(Self::FINISH)
    }
}

impl From<u8> for HitSoundType {
    fn from(bits: u8) -> Self {
        Self(bits)
    }
}

impl From<HitSoundType> for u8 {
    fn from(sound: HitSoundType) -> Self {
        sound.0
    }
}

/// The kind of a [`SliderEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SliderEventKind {
    Head,
    Tick,
    Repeat,
    /// Legacy tail that is placed slightly before the actual end.
    LastTick,
    Tail,
}

/// A nested object of a slider.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliderEvent {
    pub kind: SliderEventKind,
    pub span_idx: usize,
    pub span_start_time: f64,
    pub time: f64,
    pub path_progress: f64,
}

/// Everything needed to place the nested objects of a slider.
pub struct SliderEventParams {
    pub start_time: f64,
    pub span_duration: f64,
    pub velocity: f64,
    pub tick_dist: f64,
    pub total_dist: f64,
    pub span_count: usize,
}

const MAX_SLIDER_LEN: f64 = 100_000.0;
const LEGACY_LAST_TICK_OFFSET: f64 = 36.0;

/// Generates the head, ticks, repeats, last tick and tail of a slider in
/// chronological order.
pub fn slider_events(params: &SliderEventParams) -> Vec<SliderEvent> {
    let SliderEventParams {
        start_time,
        span_duration,
        velocity,
        tick_dist,
        total_dist,
        span_count,
    } = *params;

    let len = MAX_SLIDER_LEN.min(total_dist).max(0.0);
    let tick_dist = tick_dist.clamp(0.0, len);
    let min_dist_from_end = velocity * 10.0;

    let mut events = vec![SliderEvent {
        kind: SliderEventKind::Head,
        span_idx: 0,
        span_start_time: start_time,
        time: start_time,
        path_progress: 0.0,
    }];

    for span in 0..span_count {
        let span_start_time = start_time + span as f64 * span_duration;
        let reversed = span % 2 == 1;
        let ticks_start = events.len();

        if tick_dist > 0.0 {
            let mut d = tick_dist;

            while d <= len {
                if d >= len - min_dist_from_end {
                    break;
                }

                let path_progress = d / len;
                let time_progress = if reversed {
                    1.0 - path_progress
                } else {
                    path_progress
                };

                events.push(SliderEvent {
                    kind: SliderEventKind::Tick,
                    span_idx: span,
                    span_start_time,
                    time: span_start_time + time_progress * span_duration,
                    path_progress,
                });

                d += tick_dist;
            }
        }

        if reversed {
            events[ticks_start..].reverse();
        }

        if span + 1 < span_count {
            events.push(SliderEvent {
                kind: SliderEventKind::Repeat,
                span_idx: span,
                span_start_time,
                time: span_start_time + span_duration,
                path_progress: ((span + 1) % 2) as f64,
            });
        }
    }

    let total_duration = span_count as f64 * span_duration;
    let final_span_idx = span_count.saturating_sub(1);
    let final_span_start_time = start_time + final_span_idx as f64 * span_duration;
    let final_span_end_time = (start_time + total_duration / 2.0)
        .max(final_span_start_time + span_duration - LEGACY_LAST_TICK_OFFSET);

    let mut final_progress = if span_duration > 0.0 {
        (final_span_end_time - final_span_start_time) / span_duration
    } else {
        0.0
    };

    if span_count % 2 == 0 {
        final_progress = 1.0 - final_progress;
    }

    events.push(SliderEvent {
        kind: SliderEventKind::LastTick,
        span_idx: final_span_idx,
        span_start_time: final_span_start_time,
        time: final_span_end_time,
        path_progress: final_progress,
    });

    events.push(SliderEvent {
        kind: SliderEventKind::Tail,
        span_idx: final_span_idx,
        span_start_time: final_span_start_time,
        time: start_time + total_duration,
        path_progress: (span_count % 2) as f64,
    });

    events
}
