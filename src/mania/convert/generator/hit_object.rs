use std::cmp;

use crate::{
    mania::{
        convert::{pattern::Pattern, pattern_type::PatternType, PrevValues},
        object::ManiaObject,
    },
    model::{beatmap::Beatmap, control_point::TimingPoint, hit_object::HitSoundType},
};

use super::PatternGenerator;

/// Notes for a circle, shaped by how it follows the previous object.
pub struct HitObjectPatternGenerator<'a> {
    pub stair_type: PatternType,
    inner: PatternGenerator<'a>,
    sample: HitSoundType,
    convert_type: PatternType,
    prev_pattern: &'a Pattern,
}

/// Distance to the previous object, in time and on the playfield.
struct Spacing {
    time: f64,
    dist: f32,
}

impl Spacing {
    fn pattern_type(
        &self,
        density: f64,
        beat_len: f64,
        stair: PatternType,
        kiai: impl Fn() -> bool,
    ) -> PatternType {
        use PatternType as P;

        let stream = self.dist < 20.0;
        let dense = density < beat_len / 2.5;

        // Thresholds in ms correspond to 187, 157, 140, 120, 111 and 100 bpm
        match self.time {
            t if t <= 80.0 => P::FORCE_NOT_STACK | P::KEEP_SINGLE,
            t if t <= 95.0 => P::FORCE_NOT_STACK | P::KEEP_SINGLE | stair,
            t if t <= 105.0 => P::FORCE_NOT_STACK | P::LOW_PROBABILITY,
            t if t <= 125.0 => P::FORCE_NOT_STACK,
            t if t <= 135.0 && stream => P::CYCLE | P::KEEP_SINGLE,
            t if t <= 150.0 && stream => P::FORCE_STACK | P::LOW_PROBABILITY,
            _ if stream && density >= beat_len / 2.5 => P::REVERSE | P::LOW_PROBABILITY,
            _ if dense || kiai() => P::default(),
            _ => P::LOW_PROBABILITY,
        }
    }
}

impl<'a> HitObjectPatternGenerator<'a> {
    pub fn new(
        inner: PatternGenerator<'a>,
        sample: HitSoundType,
        prev: &'a PrevValues,
        density: f64,
        orig: &Beatmap,
    ) -> Self {
        let h = inner.hit_object;

        let beat_len = orig
            .timing_point_at(h.start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let spacing = Spacing {
            time: h.start_time - prev.time,
            dist: (h.pos - prev.pos).length(),
        };

        let kiai = || {
            orig.effect_point_at(h.start_time)
                .is_some_and(|point| point.kiai)
        };

        let mut convert_type = spacing.pattern_type(density, beat_len, prev.stair, kiai);

        if !convert_type.contains(PatternType::KEEP_SINGLE) {
            if sample.has_flag(HitSoundType::FINISH) && inner.total_columns != 8 {
                convert_type |= PatternType::MIRROR;
            } else if sample.has_flag(HitSoundType::CLAP) {
                convert_type |= PatternType::GATHERED;
            }
        }

        Self {
            stair_type: prev.stair,
            inner,
            sample,
            convert_type,
            prev_pattern: &prev.pattern,
        }
    }

    /// Generate the pattern and turn the stair around once it hits an edge.
    pub fn generate(&mut self) -> Pattern {
        let pattern = self.generate_core();
        let total_columns = self.inner.total_columns;
        let random_start = self.inner.random_start();

        let stair = self.convert_type.contains(PatternType::STAIR);
        let reverse_stair = self.convert_type.contains(PatternType::REVERSE_STAIR);

        for h in pattern.hit_objects.iter() {
            let column = self.column_of(h.pos.x);
            if stair && i32::from(column) == total_columns - 1 {
                self.stair_type = PatternType::REVERSE_STAIR;
            }

            if reverse_stair && i32::from(column) == random_start {
                self.stair_type = PatternType::STAIR;
            }
        }

        pattern
    }

    fn column_of(&self, x: f32) -> u8 {
        ManiaObject::column(x, self.inner.total_columns as f32) as u8
    }

    fn total_columns(&self) -> u8 {
        self.inner.total_columns as u8
    }

    fn add_note(&self, pattern: &mut Pattern, column: u8) {
        let time = self.inner.hit_object.start_time;
        pattern.add_note(column, time, time, self.inner.total_columns);
    }

    fn notes_in(&self, columns: impl IntoIterator<Item = u8>) -> Pattern {
        let mut pattern = Pattern::default();

        for column in columns {
            self.add_note(&mut pattern, column);
        }

        pattern
    }

    fn generate_core(&mut self) -> Pattern {
        if self.inner.total_columns == 1 {
            return self.notes_in([0]);
        }

        if let Some(pattern) = self.follow_previous() {
            return pattern;
        }

        if self.convert_type.contains(PatternType::KEEP_SINGLE) {
            return self.generate_random_notes(1);
        }

        let conversion_diff = self.inner.conversion_difficulty;

        if self.convert_type.contains(PatternType::MIRROR) {
            let (p2, p3) = if conversion_diff > 6.5 {
                (0.38, 0.12)
            } else if conversion_diff > 4.0 {
                (0.17, 0.0)
            } else {
                (0.0, 0.0)
            };

            return self.generate_random_pattern_with_mirrored(0.12, p2, p3);
        }

        let low_probability = self.convert_type.contains(PatternType::LOW_PROBABILITY);

        let (p2, p3) = match (conversion_diff, low_probability) {
            (diff, true) if diff > 6.5 => (0.78, 0.42),
            (diff, false) if diff > 6.5 => (1.0, 0.62),
            (diff, true) if diff > 4.0 => (0.35, 0.08),
            (diff, false) if diff > 4.0 => (0.52, 0.15),
            (diff, true) if diff > 2.0 => (0.18, 0.0),
            (diff, false) if diff > 2.0 => (0.45, 0.0),
            _ => (0.0, 0.0),
        };

        self.generate_random_pattern(p2, p3, 0.0, 0.0)
    }

    /// Patterns that reverse, mirror, repeat or continue the previous one.
    fn follow_previous(&self) -> Option<Pattern> {
        let prev = self.prev_pattern;
        let total_columns = self.total_columns();
        let random_start = self.inner.random_start() as u8;

        let last_column = prev
            .hit_objects
            .last()
            .map_or(0, |h| self.column_of(h.pos.x));

        let prev_columns = (random_start..total_columns).filter(|&i| prev.column_has_obj(i));

        if self.convert_type.contains(PatternType::REVERSE) && !prev.hit_objects.is_empty() {
            let reversed = prev_columns.map(|i| random_start + total_columns - i - 1);

            return Some(self.notes_in(reversed));
        }

        let single_prev = prev.hit_objects.len() == 1;

        // Neither the special key nor the centre column get cycled
        if self.convert_type.contains(PatternType::CYCLE)
            && single_prev
            && (total_columns != 8 || last_column != 0)
            && (total_columns % 2 == 0 || last_column != total_columns / 2)
        {
            return Some(self.notes_in([random_start + total_columns - last_column - 1]));
        }

        if self.convert_type.contains(PatternType::FORCE_STACK) && !prev.hit_objects.is_empty() {
            return Some(self.notes_in(prev_columns));
        }

        if !single_prev {
            return None;
        }

        if self.convert_type.contains(PatternType::STAIR) {
            let up = last_column + 1;
            let column = if up == total_columns { random_start } else { up };

            return Some(self.notes_in([column]));
        }

        if self.convert_type.contains(PatternType::REVERSE_STAIR) {
            let column = if last_column <= random_start {
                total_columns - 1
            } else {
                last_column - 1
            };

            return Some(self.notes_in([column]));
        }

        None
    }

    fn generate_random_notes(&mut self, note_count: i32) -> Pattern {
        let mut pattern = Pattern::default();

        let allow_stacking = !self.convert_type.contains(PatternType::FORCE_NOT_STACK);
        let gathered = self.convert_type.contains(PatternType::GATHERED);
        let lower = self.inner.random_start();
        let upper = self.inner.total_columns;

        let note_count = if allow_stacking {
            note_count
        } else {
            cmp::min(upper - lower - self.prev_pattern.column_with_objs(), note_count)
        };

        let mut column = self.inner.get_column(true);

        for _ in 0..note_count {
            let blocked = if allow_stacking {
                pattern.columns()
            } else {
                pattern.columns().union(self.prev_pattern.columns())
            };

            column = self
                .inner
                .find_available_column(column, lower, upper, blocked, |gen, last| {
                    if gathered {
                        next_gathered_column(gen, last)
                    } else {
                        gen.get_random_column(None, None)
                    }
                });

            self.add_note(&mut pattern, column);
        }

        pattern
    }

    /// Clap and finish together add a note on the special column.
    const fn has_special_column(&self) -> bool {
        self.sample.has_flag(HitSoundType::CLAP) && self.sample.has_flag(HitSoundType::FINISH)
    }

    fn add_special_note(&self, pattern: &mut Pattern) {
        if self.inner.random_start() > 0 && self.has_special_column() {
            self.add_note(pattern, 0);
        }
    }

    fn generate_random_pattern(&mut self, p2: f64, p3: f64, p4: f64, p5: f64) -> Pattern {
        let [mut p2, p3, p4, p5] = cap_probabilities(self.inner.total_columns, [p2, p3, p4, p5]);

        if self.sample.has_flag(HitSoundType::CLAP) {
            p2 = 1.0;
        }

        let note_count = self.inner.get_random_note_count(p2, p3, p4, p5, 0.0);
        let mut pattern = self.generate_random_notes(note_count);
        self.add_special_note(&mut pattern);

        pattern
    }

    fn generate_random_pattern_with_mirrored(
        &mut self,
        centre_probability: f64,
        p2: f64,
        p3: f64,
    ) -> Pattern {
        if self.convert_type.contains(PatternType::FORCE_NOT_STACK) {
            return self.generate_random_pattern(0.5 + p2 / 2.0, p2, (p2 + p3) / 2.0, p3);
        }

        let total_columns = self.inner.total_columns;

        let (centre_probability, p2, p3) =
            cap_mirrored_probabilities(total_columns, centre_probability, p2, p3);

        let centre_roll = self.inner.next_f64();
        let note_count = self.inner.get_random_note_count(p2, p3, 0.0, 0.0, 0.0);

        let add_to_centre =
            total_columns % 2 != 0 && note_count != 3 && centre_roll > 1.0 - centre_probability;

        let lower = self.inner.random_start();
        let half = total_columns / 2;

        let mut pattern = Pattern::default();
        let mut column = self.inner.get_random_column(None, Some(half));

        for _ in 0..note_count {
            column =
                self.inner
                    .find_random_available_column(column, lower, half, pattern.columns());

            self.add_note(&mut pattern, column);
            self.add_note(&mut pattern, (lower + total_columns) as u8 - column - 1);
        }

        if add_to_centre {
            self.add_note(&mut pattern, half as u8);
        }

        self.add_special_note(&mut pattern);

        pattern
    }
}

/// Fewer columns allow fewer simultaneous notes.
fn cap_probabilities(total_columns: i32, [p2, p3, p4, p5]: [f64; 4]) -> [f64; 4] {
    match total_columns {
        2 => [0.0; 4],
        3 => [p2.min(0.1), 0.0, 0.0, 0.0],
        4 => [p2.min(0.23), p3.min(0.04), 0.0, 0.0],
        5 => [p2, p3.min(0.15), p4.min(0.03), 0.0],
        _ => [p2, p3, p4, p5],
    }
}

/// Mirrored notes come in pairs, so the odds are doubled as inverse
/// probabilities first.
fn cap_mirrored_probabilities(
    total_columns: i32,
    centre: f64,
    p2: f64,
    p3: f64,
) -> (f64, f64, f64) {
    let doubled = |p: f64, min: f64| 1.0 - ((1.0 - p) * 2.0).max(min);

    let (centre, p2, p3) = match total_columns {
        2 => (0.0, 0.0, 0.0),
        3 => (centre.min(0.03), 0.0, 0.0),
        4 => (0.0, doubled(p2, 0.8), 0.0),
        5 => (centre.min(0.03), p2, 0.0),
        6 => (0.0, doubled(p2, 0.05), doubled(p3, 0.85)),
        _ => (centre, p2, p3),
    };

    (centre, p2.clamp(0.0, 1.0), p3.clamp(0.0, 1.0))
}

/// The column to the right, wrapping around to the first random column.
fn next_gathered_column(gen: &PatternGenerator<'_>, last: u8) -> u8 {
    let next = last + 1;

    if i32::from(next) == gen.total_columns {
        gen.random_start() as u8
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind},
            pos::Pos,
        },
        util::random::Random,
    };

    use super::*;

    fn circle(x: f32, start_time: f64) -> HitObject {
        HitObject {
            pos: Pos::new(x, 192.0),
            start_time,
            kind: HitObjectKind::Circle,
        }
    }

    fn prev_single(column: u8, total_columns: i32, time: f64) -> PrevValues {
        PrevValues {
            time,
            pos: Pos::new(256.0, 192.0),
            pattern: Pattern::single(column, time, time, total_columns),
            stair: PatternType::STAIR,
        }
    }

    fn columns(pattern: &Pattern, total_columns: i32) -> Vec<usize> {
        pattern
            .hit_objects
            .iter()
            .map(|h| ManiaObject::column(h.pos.x, total_columns as f32))
            .collect()
    }

    #[test]
    fn fast_streams_stay_single_and_avoid_previous_column() {
        let map = Beatmap::default();
        let prev = prev_single(2, 4, 1000.0);
        let h = circle(320.0, 1060.0);

        for seed in 0..20 {
            let mut random = Random::new(seed);
            let inner = PatternGenerator::new(&h, 4, 5.0, &mut random);

            let pattern =
                HitObjectPatternGenerator::new(inner, HitSoundType::NONE, &prev, 0.0, &map)
                    .generate();

            assert_eq!(pattern.hit_objects.len(), 1);
            assert_ne!(columns(&pattern, 4), [2]);
        }
    }

    #[test]
    fn stacked_stream_reuses_columns() {
        let map = Beatmap::default();
        let prev = prev_single(1, 4, 1000.0);

        // 140ms apart at the same position
        let h = circle(256.0, 1140.0);
        let mut random = Random::new(1);
        let inner = PatternGenerator::new(&h, 4, 5.0, &mut random);

        let pattern = HitObjectPatternGenerator::new(inner, HitSoundType::NONE, &prev, 0.0, &map)
            .generate();

        assert_eq!(columns(&pattern, 4), [1]);
    }

    #[test]
    fn single_column() {
        let map = Beatmap::default();
        let prev = PrevValues::default();
        let h = circle(400.0, 500.0);
        let mut random = Random::new(7);
        let inner = PatternGenerator::new(&h, 1, 12.0, &mut random);

        let pattern = HitObjectPatternGenerator::new(inner, HitSoundType::CLAP, &prev, 0.0, &map)
            .generate();

        assert_eq!(columns(&pattern, 1), [0]);
    }

    #[test]
    fn mirrored_pattern_is_symmetric() {
        let map = Beatmap::default();
        let prev = PrevValues::default();
        let h = circle(100.0, 5000.0);

        for seed in 0..20 {
            let mut random = Random::new(seed);
            let inner = PatternGenerator::new(&h, 6, 8.0, &mut random);

            let pattern =
                HitObjectPatternGenerator::new(inner, HitSoundType::FINISH, &prev, 0.0, &map)
                    .generate();

            let mut cols = columns(&pattern, 6);
            let mut mirrored: Vec<_> = cols.iter().map(|c| 5 - c).collect();
            cols.sort_unstable();
            mirrored.sort_unstable();

            assert_eq!(cols, mirrored);
        }
    }
}
