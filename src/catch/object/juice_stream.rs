use crate::{
    catch::PLAYFIELD_WIDTH,
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::{slider_events, HitObject, Slider, SliderEventKind, SliderEventParams},
    },
};

const BASE_SCORING_DIST: f64 = 100.0;

/// Gaps between slider events longer than this are filled with tiny
/// droplets.
const TINY_DROPLET_THRESHOLD: f64 = 80.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NestedKind {
    Fruit,
    Droplet,
    TinyDroplet,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NestedJuiceObject {
    pub x: f32,
    pub start_time: f64,
    pub kind: NestedKind,
}

/// A slider as it is played in osu!catch.
#[derive(Clone, Debug)]
pub struct JuiceStream {
    /// Where the slider's path ends, used to track positions for the
    /// hardrock offsets.
    pub end_x: f32,
    pub nested_objects: Vec<NestedJuiceObject>,
}

impl JuiceStream {
    pub fn new(h: &HitObject, slider: &Slider, map: &Beatmap) -> Self {
        let start_time = h.start_time;
        let x = clamp_to_playfield(h.pos.x);

        let beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = map
            .difficulty_point_at(start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let path = slider.curve();

        let scoring_dist = BASE_SCORING_DIST * map.slider_multiplier * slider_velocity;
        let velocity = scoring_dist / beat_len;
        let tick_dist = scoring_dist / map.slider_tick_rate;

        let span_count = slider.span_count();
        let span_duration = path.dist() / velocity;

        let events = slider_events(&SliderEventParams {
            start_time,
            span_duration,
            velocity,
            tick_dist,
            total_dist: path.dist(),
            span_count,
        });

        let mut nested_objects = Vec::with_capacity(events.len() * 2);
        let mut last_event_time = None;

        for e in events {
            if let Some(last_event_time) = last_event_time {
                push_tiny_droplets(e.time - last_event_time, &mut nested_objects);
            }

            last_event_time = Some(e.time);

            let kind = match e.kind {
                SliderEventKind::Tick => NestedKind::Droplet,
                SliderEventKind::Head | SliderEventKind::Repeat | SliderEventKind::Tail => {
                    NestedKind::Fruit
                }
                SliderEventKind::LastTick => continue,
            };

            nested_objects.push(NestedJuiceObject {
                x: clamp_to_playfield(x + path.position_at(e.path_progress).x),
                start_time: e.time,
                kind,
            });
        }

        let end_x = h.pos.x
            + slider
                .control_points
                .last()
                .map_or(0.0, |control_point| control_point.pos.x);

        Self {
            end_x,
            nested_objects,
        }
    }
}

/// Tiny droplets only matter for their count so neither their position nor
/// their time is tracked.
fn push_tiny_droplets(since_last_event: f64, nested_objects: &mut Vec<NestedJuiceObject>) {
    if since_last_event <= TINY_DROPLET_THRESHOLD {
        return;
    }

    let mut time_between_tiny = since_last_event;

    while time_between_tiny > 100.0 {
        time_between_tiny /= 2.0;
    }

    let mut t = time_between_tiny;

    while t < since_last_event {
        nested_objects.push(NestedJuiceObject {
            x: 0.0,
            start_time: 0.0,
            kind: NestedKind::TinyDroplet,
        });

        t += time_between_tiny;
    }
}

fn clamp_to_playfield(x: f32) -> f32 {
    x.clamp(0.0, PLAYFIELD_WIDTH)
}
