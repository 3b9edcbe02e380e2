use crate::{
    mania::convert::{pattern::Pattern, pattern_type::PatternType},
    model::hit_object::HitSoundType,
};

use super::PatternGenerator;

/// Generates a single note or hold note for spinners and hold notes.
pub struct EndTimeObjectPatternGenerator<'a> {
    inner: PatternGenerator<'a>,
    end_time: f64,
    sample: HitSoundType,
    convert_type: PatternType,
    prev_pattern: &'a Pattern,
}

impl<'a> EndTimeObjectPatternGenerator<'a> {
    pub fn new(
        inner: PatternGenerator<'a>,
        end_time: f64,
        sample: HitSoundType,
        prev_pattern: &'a Pattern,
    ) -> Self {
        let convert_type = if prev_pattern.column_with_objs() == inner.total_columns {
            PatternType::default()
        } else {
            PatternType::FORCE_NOT_STACK
        };

        Self {
            inner,
            end_time,
            sample,
            convert_type,
            prev_pattern,
        }
    }

    pub fn generate(&mut self) -> Pattern {
        let start_time = self.inner.hit_object.start_time;
        let duration = self.end_time - start_time;

        // Short objects become regular notes
        let end_time = if duration >= 100.0 {
            self.end_time
        } else {
            start_time
        };

        let column = match self.inner.total_columns {
            8 if self.sample.has_flag(HitSoundType::FINISH) && duration < 1000.0 => 0,
            8 => self.get_random_column(self.inner.random_start()),
            _ => self.get_random_column(0),
        };

        Pattern::single(column, start_time, end_time, self.inner.total_columns)
    }

    fn get_random_column(&mut self, lower: i32) -> u8 {
        let upper = self.inner.total_columns;
        let column = self.inner.get_random_column(Some(lower), None);

        let blocked = if self.convert_type.contains(PatternType::FORCE_NOT_STACK) {
            self.prev_pattern.columns()
        } else {
            Default::default()
        };

        self.inner
            .find_random_available_column(column, lower, upper, blocked)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            hit_object::{HitObject, HitObjectKind, Spinner},
            pos::Pos,
        },
        util::random::Random,
    };

    use super::*;

    fn spinner(duration: f64) -> HitObject {
        HitObject {
            pos: Pos::new(256.0, 192.0),
            start_time: 1000.0,
            kind: HitObjectKind::Spinner(Spinner { duration }),
        }
    }

    #[test]
    fn long_spinner_becomes_hold() {
        let h = spinner(500.0);
        let prev = Pattern::single(0, 800.0, 800.0, 4);

        for seed in 0..10 {
            let mut random = Random::new(seed);
            let inner = PatternGenerator::new(&h, 4, 5.0, &mut random);

            let pattern =
                EndTimeObjectPatternGenerator::new(inner, 1500.0, HitSoundType::NONE, &prev)
                    .generate();

            assert_eq!(pattern.hit_objects.len(), 1);
            assert!(pattern.hit_objects[0].is_hold_note());
            assert!((pattern.hit_objects[0].end_time() - 1500.0).abs() < f64::EPSILON);

            // The previous column is not stacked on
            assert!(!pattern.column_has_obj(0));
        }
    }

    #[test]
    fn short_spinner_becomes_note() {
        let h = spinner(50.0);
        let prev = Pattern::default();
        let mut random = Random::new(3);
        let inner = PatternGenerator::new(&h, 7, 5.0, &mut random);

        let pattern =
            EndTimeObjectPatternGenerator::new(inner, 1050.0, HitSoundType::NONE, &prev).generate();

        assert!(pattern.hit_objects[0].is_circle());
    }

    #[test]
    fn finish_on_eight_columns_uses_special_column() {
        let h = spinner(500.0);
        let prev = Pattern::default();
        let mut random = Random::new(3);
        let inner = PatternGenerator::new(&h, 8, 5.0, &mut random);

        let pattern =
            EndTimeObjectPatternGenerator::new(inner, 1500.0, HitSoundType::FINISH, &prev)
                .generate();

        assert!(pattern.column_has_obj(0));
    }
}
