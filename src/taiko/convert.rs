use std::mem;

use crate::{
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::{HitObject, HitObjectKind, HitSoundType, HoldNote, Slider, Spinner},
        mode::GameMode,
        pos::Pos,
    },
    util::{difficulty::precision_adjusted_beat_len, sort_by_start_time},
};

const VELOCITY_MULTIPLIER: f64 = 1.4;
const OSU_BASE_SCORING_DIST: f64 = 100.0;

/// Convert an osu!standard map into an osu!taiko map.
///
/// Sliders that would be over too quickly turn into a sequence of hits,
/// all others become drum rolls.
pub fn convert(map: &mut Beatmap) {
    let hit_objects = mem::take(&mut map.hit_objects);
    let hit_sounds = mem::take(&mut map.hit_sounds);

    let mut converted = Vec::with_capacity(hit_objects.len());

    for (h, sound) in hit_objects.into_iter().zip(hit_sounds) {
        match h.kind {
            HitObjectKind::Slider(ref slider) => {
                if let Some(split) = SliderSplit::new(map, h.start_time, slider) {
                    split.push_hits(&h, slider, sound, &mut converted);
                } else {
                    converted.push((h, sound));
                }
            }
            HitObjectKind::Hold(HoldNote { duration }) => {
                let swell = HitObject {
                    kind: HitObjectKind::Spinner(Spinner { duration }),
                    ..h
                };

                converted.push((swell, sound));
            }
            HitObjectKind::Circle | HitObjectKind::Spinner(_) => converted.push((h, sound)),
        }
    }

    sort_by_start_time(&mut converted, |(h, _)| h.start_time);

    (map.hit_objects, map.hit_sounds) = converted.into_iter().unzip();
    map.mode = GameMode::Taiko;
    map.is_convert = true;
}

/// Timing of a slider that is split into hits.
struct SliderSplit {
    duration: f64,
    tick_spacing: f64,
}

impl SliderSplit {
    /// Returns `None` if the slider should stay a drum roll.
    fn new(map: &Beatmap, start_time: f64, slider: &Slider) -> Option<Self> {
        let spans = slider.span_count() as f64;

        let expected_dist = slider
            .expected_dist
            .unwrap_or_else(|| slider.curve().dist());

        // Multiply separately to stay on the game's float rounding
        let mut dist = expected_dist * VELOCITY_MULTIPLIER;
        dist *= spans;

        let timing_beat_len = map
            .timing_point_at(start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = map
            .difficulty_point_at(start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let mut beat_len = precision_adjusted_beat_len(slider_velocity, timing_beat_len);

        let slider_scoring_point_dist = OSU_BASE_SCORING_DIST
            * (map.slider_multiplier * VELOCITY_MULTIPLIER)
            / map.slider_tick_rate;

        let taiko_vel = slider_scoring_point_dist * map.slider_tick_rate;
        let duration = (dist / taiko_vel * beat_len).trunc();

        let osu_vel = taiko_vel * (1000.0 / beat_len);

        // Old maps used the velocity-adjusted beat length for the ticks too
        if map.version >= 8 {
            beat_len = timing_beat_len;
        }

        let tick_spacing = (beat_len / map.slider_tick_rate).min(duration / spans);

        (tick_spacing > 0.0 && dist / osu_vel * 1000.0 < 2.0 * beat_len).then_some(Self {
            duration,
            tick_spacing,
        })
    }

    /// Push a hit on every tick, cycling through the slider's node sounds.
    fn push_hits(
        &self,
        h: &HitObject,
        slider: &Slider,
        sound: HitSoundType,
        converted: &mut Vec<(HitObject, HitSoundType)>,
    ) {
        let end_time = h.start_time + self.duration + self.tick_spacing / 8.0;
        let node_count = slider.node_sounds.len().max(1);

        let mut time = h.start_time;
        let mut node_idx = 0;

        while time <= end_time {
            let hit = HitObject {
                pos: Pos::default(),
                start_time: time,
                kind: HitObjectKind::Circle,
            };

            let sound = slider.node_sounds.get(node_idx).copied().unwrap_or(sound);
            converted.push((hit, sound));

            time += self.tick_spacing;
            node_idx = (node_idx + 1) % node_count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "osu file format v14

[Difficulty]
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,500,4,2,0,100,1,0

[HitObjects]
256,192,0,1,0
100,100,1000,2,0,L|150:100,1,50
100,100,3000,2,0,L|500:100,1,400
256,192,6000,12,0,8000
";

    #[test]
    fn short_sliders_become_hits() {
        let mut map: Beatmap = MAP.parse().unwrap();
        convert(&mut map);

        assert_eq!(map.mode, GameMode::Taiko);
        assert!(map.is_convert);
        assert_eq!(map.hit_objects.len(), map.hit_sounds.len());

        let circles = map.hit_objects.iter().filter(|h| h.is_circle()).count();
        let sliders = map.hit_objects.iter().filter(|h| h.is_slider()).count();

        assert!(circles > 1, "{circles}");
        assert_eq!(sliders, 1);
        assert!(map.hit_objects.last().is_some_and(HitObject::is_spinner));
    }

    #[test]
    fn objects_stay_sorted() {
        let mut map: Beatmap = MAP.parse().unwrap();
        convert(&mut map);

        assert!(map
            .hit_objects
            .windows(2)
            .all(|w| w[0].start_time <= w[1].start_time));
    }

    #[test]
    fn conversion_is_deterministic() {
        let mut a: Beatmap = MAP.parse().unwrap();
        let mut b = a.clone();

        convert(&mut a);
        convert(&mut b);

        assert_eq!(a, b);
    }
}
