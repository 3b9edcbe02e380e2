use std::cmp;

use crate::{
    mania::{
        convert::{
            pattern::{ContainedColumns, Pattern},
            pattern_type::PatternType,
        },
        object::ManiaObject,
    },
    model::{
        beatmap::Beatmap,
        control_point::{DifficultyPoint, TimingPoint},
        hit_object::{HitSoundType, Slider},
    },
    util::difficulty::precision_adjusted_beat_len,
};

use super::PatternGenerator;

/// Generates notes and hold notes along a slider.
///
/// Times are integers to stay in sync with how legacy clients place the
/// converted notes.
pub struct PathObjectPatternGenerator<'a> {
    pub segment_duration: i32,
    pub span_count: i32,
    inner: PatternGenerator<'a>,
    sample: HitSoundType,
    start_time: i32,
    end_time: i32,
    convert_type: PatternType,
    prev_pattern: &'a Pattern,
    node_sounds: &'a [HitSoundType],
}

impl<'a> PathObjectPatternGenerator<'a> {
    pub fn new(
        inner: PatternGenerator<'a>,
        sample: HitSoundType,
        prev_pattern: &'a Pattern,
        slider: &'a Slider,
        orig: &Beatmap,
    ) -> Self {
        let h = inner.hit_object;

        let timing_beat_len = orig
            .timing_point_at(h.start_time)
            .map_or(TimingPoint::DEFAULT_BEAT_LEN, |point| point.beat_len);

        let slider_velocity = orig
            .difficulty_point_at(h.start_time)
            .map_or(DifficultyPoint::DEFAULT_SLIDER_VELOCITY, |point| {
                point.slider_velocity
            });

        let kiai = orig
            .effect_point_at(h.start_time)
            .is_some_and(|point| point.kiai);

        let convert_type = if kiai {
            PatternType::default()
        } else {
            PatternType::LOW_PROBABILITY
        };

        let beat_len = precision_adjusted_beat_len(slider_velocity, timing_beat_len);

        let span_count = slider.span_count() as i32;
        let start_time = h.start_time.round_ties_even() as i32;

        let dist = slider
            .expected_dist
            .unwrap_or_else(|| slider.curve().dist());

        let end_time = (f64::from(start_time)
            + dist * beat_len * f64::from(span_count) * 0.01 / orig.slider_multiplier)
            .floor() as i32;

        let segment_duration = (end_time - start_time) / span_count;

        Self {
            segment_duration,
            span_count,
            inner,
            sample,
            start_time,
            end_time,
            convert_type,
            prev_pattern,
            node_sounds: &slider.node_sounds,
        }
    }

    /// Objects that end at the slider's end are split into their own pattern
    /// which is the last one of the returned list.
    pub fn generate(&mut self) -> Vec<Pattern> {
        let orig_pattern = self.generate_core();

        if orig_pattern.hit_objects.len() == 1 {
            return vec![orig_pattern];
        }

        let mut intermediate_pattern = Pattern::default();
        let mut end_time_pattern = Pattern::default();
        let total_columns = self.inner.total_columns as f32;

        for h in orig_pattern.hit_objects {
            let column = ManiaObject::column(h.pos.x, total_columns) as u8;

            if h.end_time().round_ties_even() as i32 == self.end_time {
                end_time_pattern.add_object(h, column);
            } else {
                intermediate_pattern.add_object(h, column);
            }
        }

        vec![intermediate_pattern, end_time_pattern]
    }

    fn generate_core(&mut self) -> Pattern {
        let conversion_diff = self.inner.conversion_difficulty;
        let total_columns = self.inner.total_columns;
        let start_time = self.start_time;
        let low_probability = self.convert_type.contains(PatternType::LOW_PROBABILITY);

        if total_columns == 1 {
            let mut pattern = Pattern::with_capacity(1);
            self.add_note(&mut pattern, 0, start_time, self.end_time);

            return pattern;
        }

        if self.span_count > 1 {
            return if self.segment_duration <= 90 {
                self.generate_random_hold_notes(start_time, 1)
            } else if self.segment_duration <= 120 {
                self.convert_type |= PatternType::FORCE_NOT_STACK;

                self.generate_random_notes(start_time, self.span_count + 1)
            } else if self.segment_duration <= 160 {
                self.generate_stair(start_time)
            } else if self.segment_duration <= 200 && conversion_diff > 3.0 {
                self.generate_random_multiple_notes(start_time)
            } else if self.end_time - start_time >= 4000 {
                self.generate_n_random_notes(start_time, 0.23, 0.0, 0.0)
            } else if self.segment_duration > 400
                && self.span_count < total_columns - 1 - self.inner.random_start()
            {
                self.generate_tiled_hold_notes(start_time)
            } else {
                self.generate_hold_and_normal_notes(start_time, conversion_diff)
            };
        }

        if self.segment_duration <= 110 {
            if self.prev_pattern.column_with_objs() < total_columns {
                self.convert_type |= PatternType::FORCE_NOT_STACK;
            } else {
                self.convert_type &= !PatternType::FORCE_NOT_STACK;
            }

            let note_count = 1 + i32::from(self.segment_duration >= 80);

            self.generate_random_notes(start_time, note_count)
        } else {
            let (p2, p3, p4) = match (conversion_diff, low_probability) {
                (diff, true) if diff > 6.5 => (0.78, 0.3, 0.0),
                (diff, false) if diff > 6.5 => (0.85, 0.36, 0.03),
                (diff, true) if diff > 4.0 => (0.43, 0.08, 0.0),
                (diff, false) if diff > 4.0 => (0.56, 0.18, 0.0),
                (diff, true) if diff > 2.5 => (0.3, 0.0, 0.0),
                (diff, false) if diff > 2.5 => (0.37, 0.08, 0.0),
                (_, true) => (0.17, 0.0, 0.0),
                (_, false) => (0.27, 0.0, 0.0),
            };

            self.generate_n_random_notes(start_time, p2, p3, p4)
        }
    }

    fn add_note(&self, pattern: &mut Pattern, column: u8, start_time: i32, end_time: i32) {
        pattern.add_note(
            column,
            f64::from(start_time),
            f64::from(end_time),
            self.inner.total_columns,
        );
    }

    fn find_column(&mut self, initial_column: u8, blocked: ContainedColumns) -> u8 {
        let lower = self.inner.random_start();
        let upper = self.inner.total_columns;

        self.inner
            .find_random_available_column(initial_column, lower, upper, blocked)
    }

    /// The object's own column, moved off the previous pattern if stacking
    /// is not allowed.
    fn unstacked_column(&mut self) -> u8 {
        let column = self.inner.get_column(true);

        if self.convert_type.contains(PatternType::FORCE_NOT_STACK)
            && self.prev_pattern.column_with_objs() < self.inner.total_columns
        {
            self.find_column(column, self.prev_pattern.columns())
        } else {
            column
        }
    }

    /// Hold notes from start to end on random columns.
    fn generate_random_hold_notes(&mut self, start_time: i32, note_count: i32) -> Pattern {
        let mut pattern = Pattern::default();

        let usable_columns = self.inner.total_columns
            - self.inner.random_start()
            - self.prev_pattern.column_with_objs();

        let mut next_column = self.inner.get_random_column(None, None);

        for _ in 0..cmp::min(usable_columns, note_count) {
            let blocked = pattern.columns().union(self.prev_pattern.columns());
            next_column = self.find_column(next_column, blocked);
            self.add_note(&mut pattern, next_column, start_time, self.end_time);
        }

        // Separate loop to keep the order of random draws
        for _ in 0..note_count - usable_columns {
            next_column = self.find_column(next_column, pattern.columns());
            self.add_note(&mut pattern, next_column, start_time, self.end_time);
        }

        pattern
    }

    /// One note per node, never twice in a row on the same column.
    fn generate_random_notes(&mut self, mut start_time: i32, note_count: i32) -> Pattern {
        let mut next_column = self.unstacked_column();
        let mut pattern = Pattern::with_capacity(note_count.max(0) as usize);

        for _ in 0..note_count {
            self.add_note(&mut pattern, next_column, start_time, start_time);

            let blocked = ContainedColumns::default().with(next_column);
            next_column = self.find_column(next_column, blocked);
            start_time += self.segment_duration;
        }

        pattern
    }

    /// One note per node, moving one column at a time and turning around at
    /// the borders.
    fn generate_stair(&mut self, mut start_time: i32) -> Pattern {
        let mut column = i32::from(self.inner.get_column(true));
        let mut increasing = self.inner.next_f64() > 0.5;
        let mut pattern = Pattern::with_capacity(self.span_count as usize + 1);

        for _ in 0..=self.span_count {
            self.add_note(&mut pattern, column as u8, start_time, start_time);
            start_time += self.segment_duration;

            if increasing {
                if column >= self.inner.total_columns - 1 {
                    increasing = false;
                    column -= 1;
                } else {
                    column += 1;
                }
            } else if column <= self.inner.random_start() {
                increasing = true;
                column += 1;
            } else {
                column -= 1;
            }
        }

        pattern
    }

    /// Up to two notes per node, spread apart by a random interval.
    fn generate_random_multiple_notes(&mut self, mut start_time: i32) -> Pattern {
        let total_columns = self.inner.total_columns;
        let legacy = i32::from((4..=8).contains(&total_columns));
        let interval = self.inner.next_i32_range(1, total_columns - legacy);

        let mut next_column = i32::from(self.inner.get_column(true));
        let random_start = self.inner.random_start();
        let not_2k = total_columns > 2;

        let mut pattern = Pattern::with_capacity(
            (self.span_count as usize + 1) * (1 + usize::from(not_2k)),
        );

        for _ in 0..=self.span_count {
            self.add_note(&mut pattern, next_column as u8, start_time, start_time);

            next_column += interval;

            if next_column >= total_columns - random_start {
                next_column = next_column - total_columns - random_start + legacy;
            }

            next_column += random_start;

            // No consecutive doubles on 2K
            if not_2k {
                self.add_note(&mut pattern, next_column as u8, start_time, start_time);
            }

            next_column = i32::from(self.inner.get_random_column(None, None));
            start_time += self.segment_duration;
        }

        pattern
    }

    fn generate_n_random_notes(&mut self, start_time: i32, p2: f64, p3: f64, p4: f64) -> Pattern {
        let [mut p2, p3, p4] = match self.inner.total_columns {
            2 => [0.0; 3],
            3 => [p2.min(0.1), 0.0, 0.0],
            4 => [p2.min(0.3), p3.min(0.04), 0.0],
            5 => [p2.min(0.34), p3.min(0.1), p4.min(0.03)],
            _ => [p2, p3, p4],
        };

        let doubles = |sample: HitSoundType| {
            sample.has_flag(HitSoundType::CLAP) || sample.has_flag(HitSoundType::FINISH)
        };

        // Clap or finish on the slider or its first node allow a second note
        if !self.convert_type.contains(PatternType::LOW_PROBABILITY)
            && (doubles(self.sample) || doubles(self.sample_at(self.start_time)))
        {
            p2 = 1.0;
        }

        let note_count = self.inner.get_random_note_count(p2, p3, p4, 0.0, 0.0);

        self.generate_random_hold_notes(start_time, note_count)
    }

    /// Hold notes starting at each node and all ending together.
    fn generate_tiled_hold_notes(&mut self, mut start_time: i32) -> Pattern {
        let column_repeat = cmp::min(self.span_count, self.inner.total_columns);

        // Not necessarily the slider's end time due to integer rounding
        let end_time = start_time + self.segment_duration * self.span_count;

        let mut next_column = self.unstacked_column();
        let mut pattern = Pattern::with_capacity(column_repeat.max(0) as usize);

        for _ in 0..column_repeat {
            next_column = self.find_column(next_column, pattern.columns());
            self.add_note(&mut pattern, next_column, start_time, end_time);
            start_time += self.segment_duration;
        }

        pattern
    }

    /// A hold note over the whole slider with notes on other columns at
    /// each node.
    fn generate_hold_and_normal_notes(&mut self, mut start_time: i32, conversion_diff: f64) -> Pattern {
        let mut pattern = Pattern::default();

        let hold_column = self.unstacked_column();
        self.add_note(&mut pattern, hold_column, start_time, self.end_time);

        let mut next_column = self.inner.get_random_column(None, None);
        let total_columns = self.inner.total_columns;

        let note_count = if conversion_diff > 6.5 {
            self.inner.get_random_note_count(0.63, 0.0, 0.0, 0.0, 0.0)
        } else if conversion_diff > 4.0 {
            let p2 = if total_columns < 6 { 0.12 } else { 0.45 };

            self.inner.get_random_note_count(p2, 0.0, 0.0, 0.0, 0.0)
        } else if conversion_diff > 2.5 {
            let p2 = if total_columns < 6 { 0.0 } else { 0.24 };

            self.inner.get_random_note_count(p2, 0.0, 0.0, 0.0, 0.0)
        } else {
            0
        };

        let note_count = cmp::min(note_count, total_columns - 1);

        let sample = self.sample_at(start_time);

        let ignore_head = !(sample.has_flag(HitSoundType::WHISTLE)
            || sample.has_flag(HitSoundType::FINISH)
            || sample.has_flag(HitSoundType::CLAP));

        let mut row_pattern = Pattern::default();

        for _ in 0..=self.span_count {
            if !(ignore_head && start_time == self.start_time) {
                for _ in 0..note_count {
                    let blocked = row_pattern.columns().with(hold_column);
                    next_column = self.find_column(next_column, blocked);
                    self.add_note(&mut row_pattern, next_column, start_time, start_time);
                }
            }

            pattern.append(&mut row_pattern);
            start_time += self.segment_duration;
        }

        pattern
    }

    /// The hitsound of the node at the given time.
    fn sample_at(&self, time: i32) -> HitSoundType {
        let idx = if self.segment_duration == 0 {
            0
        } else {
            ((time - self.start_time) / self.segment_duration).max(0) as usize
        };

        self.node_sounds.get(idx).copied().unwrap_or(self.sample)
    }
}
