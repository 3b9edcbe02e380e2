use crate::{
    model::{
        beatmap::Beatmap,
        hit_object::{HitObjectKind, HitSoundType, HoldNote, Spinner},
        mode::GameMode,
        mods::GameMods,
        pos::Pos,
    },
    util::{limited_queue::LimitedQueue, log_trace, random::Random, sort_by_start_time},
};

use self::{
    generator::{
        conversion_difficulty, end_time_object::EndTimeObjectPatternGenerator,
        hit_object::HitObjectPatternGenerator, path_object::PathObjectPatternGenerator,
        PatternGenerator,
    },
    pattern::Pattern,
    pattern_type::PatternType,
};

mod generator;
mod pattern;
mod pattern_type;

const MAX_NOTES_FOR_DENSITY: usize = 7;

/// Convert an osu!standard map into an osu!mania map.
///
/// The amount of columns is stored in the map's circle size.
pub fn convert(map: &mut Beatmap, mods: GameMods) {
    let seed = (map.hp + map.cs).round_ties_even() as i32 * 20
        + (map.od * 41.2) as i32
        + map.ar.round_ties_even() as i32;

    let mut random = Random::new(seed);

    let total_columns = target_columns(map, mods);
    let conversion_difficulty = conversion_difficulty(map);

    log_trace!(
        "mania conversion: seed {seed}, {total_columns} columns, difficulty {conversion_difficulty:.4}"
    );

    let mut density = NoteDensity::default();
    let mut last_values = PrevValues::default();
    let mut new_hit_objects = Vec::with_capacity(map.hit_objects.len());

    for (obj, sound) in map.hit_objects.iter().zip(map.hit_sounds.iter().copied()) {
        let inner = PatternGenerator::new(obj, total_columns, conversion_difficulty, &mut random);

        match obj.kind {
            HitObjectKind::Circle => {
                density.push(obj.start_time);

                let mut gen =
                    HitObjectPatternGenerator::new(inner, sound, &last_values, density.value, map);

                let new_pattern = gen.generate();
                let stair = gen.stair_type;

                new_hit_objects.extend_from_slice(&new_pattern.hit_objects);

                last_values.stair = stair;
                last_values.time = obj.start_time;
                last_values.pos = obj.pos;
                last_values.pattern = new_pattern;
            }
            HitObjectKind::Slider(ref slider) => {
                let mut gen = PathObjectPatternGenerator::new(
                    inner,
                    sound,
                    &last_values.pattern,
                    slider,
                    map,
                );

                let segment_duration = f64::from(gen.segment_duration);

                for i in 0..=gen.span_count {
                    let time = obj.start_time + segment_duration * f64::from(i);

                    last_values.time = time;
                    last_values.pos = obj.pos;
                    density.push(time);
                }

                for new_pattern in gen.generate() {
                    new_hit_objects.extend_from_slice(&new_pattern.hit_objects);
                    last_values.pattern = new_pattern;
                }
            }
            HitObjectKind::Spinner(Spinner { duration })
            | HitObjectKind::Hold(HoldNote { duration }) => {
                let end_time = obj.start_time + duration;

                let mut gen =
                    EndTimeObjectPatternGenerator::new(inner, end_time, sound, &last_values.pattern);

                let new_pattern = gen.generate();
                new_hit_objects.extend(new_pattern.hit_objects);

                // The pattern itself is not kept as previous pattern
                last_values.time = end_time;
                last_values.pos = Pos::new(256.0, 192.0);
                density.push(end_time);
            }
        }
    }

    sort_by_start_time(&mut new_hit_objects, |h| h.start_time);

    map.hit_sounds = vec![HitSoundType::NONE; new_hit_objects.len()];
    map.hit_objects = new_hit_objects;
    map.cs = total_columns as f32;
    map.mode = GameMode::Mania;
    map.is_convert = true;
}

/// Values of the previously processed object that influence the next
/// pattern.
pub struct PrevValues {
    pub time: f64,
    pub pos: Pos,
    pub pattern: Pattern,
    pub stair: PatternType,
}

impl Default for PrevValues {
    fn default() -> Self {
        Self {
            time: 0.0,
            pos: Pos::default(),
            pattern: Pattern::default(),
            stair: PatternType::STAIR,
        }
    }
}

/// Average time between the most recent notes.
struct NoteDensity {
    prev_note_times: LimitedQueue<f64, MAX_NOTES_FOR_DENSITY>,
    value: f64,
}

impl Default for NoteDensity {
    fn default() -> Self {
        Self {
            prev_note_times: LimitedQueue::new(),
            value: f64::from(i32::MAX),
        }
    }
}

impl NoteDensity {
    fn push(&mut self, time: f64) {
        self.prev_note_times.push(time);

        let len = self.prev_note_times.len();

        if len >= 2 {
            let first = self.prev_note_times[0];
            let last = self.prev_note_times[len - 1];

            self.value = (last - first) / len as f64;
        }
    }
}

/// Key mods decide the column count, otherwise it depends on the difficulty
/// settings and the share of sliders and spinners.
fn target_columns(map: &Beatmap, mods: GameMods) -> i32 {
    if let Some(keys) = mods.key_count() {
        return i32::from(keys);
    }

    let rounded_cs = map.cs.round_ties_even();
    let rounded_od = map.od.round_ties_even();

    let slider_or_spinner_count = map
        .hit_objects
        .iter()
        .filter(|h| matches!(h.kind, HitObjectKind::Slider(_) | HitObjectKind::Spinner(_)))
        .count();

    let percent_slider_or_spinner = if map.hit_objects.is_empty() {
        0.0
    } else {
        f64::from(slider_or_spinner_count as f32 / map.hit_objects.len() as f32)
    };

    if percent_slider_or_spinner < 0.2 {
        7
    } else if percent_slider_or_spinner < 0.3 || rounded_cs >= 5.0 {
        6 + i32::from(rounded_od > 5.0)
    } else if percent_slider_or_spinner > 0.6 {
        4 + i32::from(rounded_od > 4.0)
    } else {
        (rounded_od as i32 + 1).clamp(4, 7)
    }
}
