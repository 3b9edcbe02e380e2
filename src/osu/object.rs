use crate::{
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::{
            slider_events, HitObject, HitObjectKind, Slider, SliderEventKind, SliderEventParams,
        },
        pos::Pos,
    },
    util::sort_by_start_time,
};

use super::{difficulty::object::OsuDifficultyObject, PLAYFIELD_BASE_SIZE};

/// A hitobject as seen by osu!standard calculations.
#[derive(Clone, Debug, PartialEq)]
pub struct OsuObject {
    pub pos: Pos,
    pub start_time: f64,
    pub stack_height: i32,
    pub stack_offset: Pos,
    pub kind: OsuObjectKind,
}

impl OsuObject {
    pub const OBJECT_RADIUS: f32 = 64.0;
    pub const PREEMPT_MIN: f64 = 450.0;

    const BASE_SCORING_DIST: f64 = 100.0;

    pub fn new(h: &HitObject, map: &Beatmap) -> Self {
        let kind = match h.kind {
            HitObjectKind::Circle => OsuObjectKind::Circle,
            HitObjectKind::Slider(ref slider) => {
                OsuObjectKind::Slider(OsuSlider::new(h, slider, map))
            }
            HitObjectKind::Spinner(_) | HitObjectKind::Hold(_) => OsuObjectKind::Spinner {
                end_time: h.end_time(),
            },
        };

        Self {
            pos: h.pos,
            start_time: h.start_time,
            stack_height: 0,
            stack_offset: Pos::default(),
            kind,
        }
    }

    /// Flip the object and its nested objects upside down.
    pub fn reflect_vertically(&mut self) {
        fn reflect_y(y: &mut f32) {
            *y = PLAYFIELD_BASE_SIZE.y - *y;
        }

        reflect_y(&mut self.pos.y);

        if let OsuObjectKind::Slider(ref mut slider) = self.kind {
            // relative to the head so only the sign changes
            slider.lazy_end_pos.y = -slider.lazy_end_pos.y;

            for nested in slider.nested_objects.iter_mut() {
                reflect_y(&mut nested.pos.y);
            }
        }
    }

    pub const fn end_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle => self.start_time,
            OsuObjectKind::Slider(ref slider) => slider.end_time,
            OsuObjectKind::Spinner { end_time } => end_time,
        }
    }

    pub fn stacked_pos(&self) -> Pos {
        self.pos + self.stack_offset
    }

    pub fn end_pos(&self) -> Pos {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => self.pos,
            OsuObjectKind::Slider(ref slider) => slider.tail().map_or(self.pos, |nested| nested.pos),
        }
    }

    pub fn stacked_end_pos(&self) -> Pos {
        self.end_pos() + self.stack_offset
    }

    pub fn lazy_travel_time(&self) -> f64 {
        match self.kind {
            OsuObjectKind::Circle | OsuObjectKind::Spinner { .. } => 0.0,
            OsuObjectKind::Slider(ref slider) => slider
                .nested_objects
                // the last nested object, not necessarily the tail
                .last()
                .map_or(0.0, |nested| nested.start_time - self.start_time),
        }
    }

    /// Moves a lazy cursor along the slider that only follows as far as it
    /// has to, recording how far it travelled and where it ended.
    ///
    /// Stacking must be applied already.
    pub fn follow_lazy_cursor(&mut self, radius: f64) {
        let mut cursor = self.stacked_pos();
        let stack_offset = self.stack_offset;

        let OsuObjectKind::Slider(ref mut slider) = self.kind else {
            return;
        };

        let scale = f64::from(OsuDifficultyObject::NORMALIZED_RADIUS) / radius;
        let n_nested = slider.nested_objects.len();

        for (i, nested) in slider.nested_objects.iter().enumerate() {
            let is_last = i + 1 == n_nested;

            let mut movement = nested.pos + stack_offset - cursor;
            let mut required = f64::from(OsuDifficultyObject::ASSUMED_SLIDER_RADIUS);

            if is_last {
                let lazy_movement = slider.lazy_end_pos - cursor;

                if lazy_movement.length() < movement.length() {
                    movement = lazy_movement;
                }
            } else if nested.is_repeat() {
                // The cursor must get close to repeats
                required = f64::from(OsuDifficultyObject::NORMALIZED_RADIUS);
            }

            let dist = scale * f64::from(movement.length());

            if dist > required {
                let shrink = (dist - required) / dist;
                cursor += movement * shrink as f32;
                slider.lazy_travel_dist += (dist * shrink) as f32;
            }

            if is_last {
                slider.lazy_end_pos = cursor;
            }
        }
    }

    pub const fn is_circle(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Circle)
    }

    pub const fn is_slider(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Slider(_))
    }

    pub const fn is_spinner(&self) -> bool {
        matches!(self.kind, OsuObjectKind::Spinner { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OsuObjectKind {
    Circle,
    Slider(OsuSlider),
    Spinner { end_time: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct OsuSlider {
    pub end_time: f64,
    /// Relative to the head until stacking is applied, absolute afterwards.
    pub lazy_end_pos: Pos,
    pub lazy_travel_dist: f32,
    pub nested_objects: Vec<NestedSliderObject>,
}

impl OsuSlider {
    fn new(h: &HitObject, slider: &Slider, map: &Beatmap) -> Self {
        let start_time = h.start_time;
        let path = slider.curve();

        let beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let difficulty_point = map.difficulty_point_at(start_time);

        let slider_velocity = difficulty_point
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let generate_ticks = difficulty_point
            .map_or(DifficultyPoint::DEFAULT_GENERATE_TICKS, |point| {
                point.generate_ticks
            });

        let scoring_dist = OsuObject::BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
        let velocity = scoring_dist / beat_len;

        let span_count = slider.span_count() as f64;
        let end_time = start_time + span_count * path.dist() / velocity;
        let span_duration = (end_time - start_time) / span_count;

        // Before v8, tick spacing ignored the slider velocity
        let tick_dist = match (generate_ticks, map.version < 8) {
            (false, _) => f64::INFINITY,
            (true, true) => scoring_dist / map.slider_tick_rate * slider_velocity.recip(),
            (true, false) => scoring_dist / map.slider_tick_rate,
        };

        let events = slider_events(&SliderEventParams {
            start_time,
            span_duration,
            velocity,
            tick_dist,
            total_dist: path.dist(),
            span_count: slider.span_count(),
        });

        let mut nested_objects: Vec<_> = events
            .into_iter()
            .filter_map(|event| {
                Some(NestedSliderObject {
                    kind: NestedSliderObjectKind::from_event(event.kind)?,
                    pos: h.pos + path.position_at(event.path_progress),
                    start_time: event.time,
                })
            })
            .collect();

        sort_by_start_time(&mut nested_objects, |nested| nested.start_time);

        let lazy_travel_time = nested_objects
            .last()
            .map_or(0.0, |nested| nested.start_time - start_time);

        Self {
            end_time,
            lazy_end_pos: path.position_at(lazy_end_progress(lazy_travel_time, span_duration)),
            lazy_travel_dist: 0.0,
            nested_objects,
        }
    }

    pub fn repeat_count(&self) -> usize {
        self.nested_objects
            .iter()
            .filter(|nested| nested.is_repeat())
            .count()
    }

    /// The tail is not necessarily the last nested object, e.g. on very short
    /// and fast sliders.
    pub fn tail(&self) -> Option<&NestedSliderObject> {
        self.nested_objects
            .iter()
            .rfind(|nested| matches!(nested.kind, NestedSliderObjectKind::Tail))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NestedSliderObject {
    pub pos: Pos,
    pub start_time: f64,
    pub kind: NestedSliderObjectKind,
}

impl NestedSliderObject {
    pub const fn is_repeat(&self) -> bool {
        matches!(self.kind, NestedSliderObjectKind::Repeat)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedSliderObjectKind {
    Repeat,
    Tail,
    Tick,
}

impl NestedSliderObjectKind {
    /// Heads and the actual tails are not judged separately.
    const fn from_event(kind: SliderEventKind) -> Option<Self> {
        match kind {
            SliderEventKind::Tick => Some(Self::Tick),
            SliderEventKind::Repeat => Some(Self::Repeat),
            SliderEventKind::LastTick => Some(Self::Tail),
            SliderEventKind::Head | SliderEventKind::Tail => None,
        }
    }
}

/// Path progress at which the lazy end time lands. Every other span runs
/// backwards.
fn lazy_end_progress(lazy_travel_time: f64, span_duration: f64) -> f64 {
    if span_duration <= 0.0 {
        return 0.0;
    }

    let spans = lazy_travel_time / span_duration;

    if spans % 2.0 >= 1.0 {
        1.0 - spans % 1.0
    } else {
        spans % 1.0
    }
}

#[cfg(test)]
mod tests {
    use crate::Beatmap;

    use super::*;

    const MAP: &str = "osu file format v14

[Difficulty]
SliderMultiplier:1
SliderTickRate:1

[TimingPoints]
0,500,4,2,0,100,1,0

[HitObjects]
100,100,0,2,0,L|300:100,1,200
";

    #[test]
    fn slider_nested_objects() {
        let map: Beatmap = MAP.parse().unwrap();
        let h = OsuObject::new(&map.hit_objects[0], &map);

        let OsuObjectKind::Slider(ref slider) = h.kind else {
            panic!("expected slider");
        };

        // 200px at 100px per beat of 500ms
        assert!((slider.end_time - 1000.0).abs() < 1e-6);
        assert_eq!(slider.repeat_count(), 0);

        let ticks = slider
            .nested_objects
            .iter()
            .filter(|n| n.kind == NestedSliderObjectKind::Tick)
            .count();
        assert_eq!(ticks, 1);

        let tail = slider.tail().unwrap();
        assert!(tail.start_time < slider.end_time);
        assert!((h.end_pos().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn reflection() {
        let map: Beatmap = MAP.parse().unwrap();
        let mut h = OsuObject::new(&map.hit_objects[0], &map);
        h.reflect_vertically();

        assert!((h.pos.y - 284.0).abs() < 1e-3);
        assert!((h.end_pos().y - 284.0).abs() < 1e-3);
    }
}
