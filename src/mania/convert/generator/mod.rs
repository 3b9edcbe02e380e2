use crate::{
    mania::object::ManiaObject,
    model::{beatmap::Beatmap, hit_object::HitObject},
    util::random::Random,
};

use super::pattern::ContainedColumns;

pub mod end_time_object;
pub mod hit_object;
pub mod path_object;

/// State shared by all pattern generators.
pub struct PatternGenerator<'a> {
    pub hit_object: &'a HitObject,
    pub total_columns: i32,
    pub conversion_difficulty: f64,
    random: &'a mut Random,
}

impl<'a> PatternGenerator<'a> {
    pub fn new(
        hit_object: &'a HitObject,
        total_columns: i32,
        conversion_difficulty: f64,
        random: &'a mut Random,
    ) -> Self {
        Self {
            hit_object,
            total_columns,
            conversion_difficulty,
            random,
        }
    }

    /// With 8 columns the first one is a special column that random
    /// placement skips.
    pub fn random_start(&self) -> i32 {
        i32::from(self.total_columns == 8)
    }

    /// The column of the object's x-coordinate.
    ///
    /// If `allow_special` is set and there are 8 columns, the special column
    /// is left out.
    pub fn get_column(&self, allow_special: bool) -> u8 {
        if allow_special && self.total_columns == 8 {
            const LOCAL_X_DIVISOR: f32 = 512.0 / 7.0;

            ((self.hit_object.pos.x / LOCAL_X_DIVISOR).floor().clamp(0.0, 6.0) as u8) + 1
        } else {
            ManiaObject::column(self.hit_object.pos.x, self.total_columns as f32) as u8
        }
    }

    /// Random amount of notes between 1 and 6 where `pN` is the probability
    /// for at least `N` notes.
    pub fn get_random_note_count(&mut self, p2: f64, p3: f64, p4: f64, p5: f64, p6: f64) -> i32 {
        let val = self.random.next_f64();

        if val >= 1.0 - p6 {
            6
        } else if val >= 1.0 - p5 {
            5
        } else if val >= 1.0 - p4 {
            4
        } else if val >= 1.0 - p3 {
            3
        } else {
            1 + i32::from(val >= 1.0 - p2)
        }
    }

    /// Random column in `[lower, upper)`, defaulting to all columns that
    /// random placement may use.
    pub fn get_random_column(&mut self, lower: Option<i32>, upper: Option<i32>) -> u8 {
        let lower = lower.unwrap_or_else(|| self.random_start());
        let upper = upper.unwrap_or(self.total_columns);

        self.random.next_i32_range(lower, upper) as u8
    }

    pub fn next_f64(&mut self) -> f64 {
        self.random.next_f64()
    }

    pub fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        self.random.next_i32_range(min, max)
    }

    /// Returns `initial_column` if it's not blocked. Otherwise, columns are
    /// drawn through `next_column` until an unblocked one comes up.
    ///
    /// If every column in `[lower, upper)` is blocked, `initial_column` is
    /// returned as is.
    pub fn find_available_column(
        &mut self,
        initial_column: u8,
        lower: i32,
        upper: i32,
        blocked: ContainedColumns,
        mut next_column: impl FnMut(&mut Self, u8) -> u8,
    ) -> u8 {
        if !blocked.contains(initial_column) {
            return initial_column;
        }

        if (lower..upper).all(|column| blocked.contains(column as u8)) {
            return initial_column;
        }

        let mut column = initial_column;

        loop {
            column = next_column(self, column);

            if !blocked.contains(column) {
                return column;
            }
        }
    }

    /// [`find_available_column`] drawing random columns in `[lower, upper)`.
    ///
    /// [`find_available_column`]: Self::find_available_column
    pub fn find_random_available_column(
        &mut self,
        initial_column: u8,
        lower: i32,
        upper: i32,
        blocked: ContainedColumns,
    ) -> u8 {
        self.find_available_column(initial_column, lower, upper, blocked, |gen, _| {
            gen.get_random_column(Some(lower), Some(upper))
        })
    }
}

/// How hard the generated patterns should be, based on the original map's
/// drain rate, approach rate, and object density.
pub fn conversion_difficulty(map: &Beatmap) -> f64 {
    let last_obj_time = map.hit_objects.last().map_or(0.0, |h| h.start_time);
    let first_obj_time = map.hit_objects.first().map_or(0.0, |h| h.start_time);

    // Drain time in seconds
    let mut drain_time =
        ((last_obj_time - first_obj_time - map.total_break_time()) / 1000.0) as i32;

    if drain_time == 0 {
        drain_time = 10_000;
    }

    let mut conversion_difficulty = 0.0;
    conversion_difficulty += f64::from(map.hp + map.ar.clamp(4.0, 7.0)) / 1.5;
    conversion_difficulty += map.hit_objects.len() as f64 / f64::from(drain_time) * 9.0;
    conversion_difficulty /= 38.0;
    conversion_difficulty *= 5.0;
    conversion_difficulty /= 1.15;

    conversion_difficulty.min(12.0)
}

#[cfg(test)]
mod tests {
    use crate::model::hit_object::HitObjectKind;

    use super::*;

    fn circle(x: f32) -> HitObject {
        HitObject {
            pos: crate::model::pos::Pos::new(x, 192.0),
            start_time: 0.0,
            kind: HitObjectKind::Circle,
        }
    }

    #[test]
    fn special_column_is_skipped() {
        let h = circle(0.0);
        let mut random = Random::new(0);

        let gen = PatternGenerator::new(&h, 8, 0.0, &mut random);
        assert_eq!(gen.random_start(), 1);
        assert_eq!(gen.get_column(true), 1);
        assert_eq!(gen.get_column(false), 0);

        let gen = PatternGenerator::new(&h, 7, 0.0, &mut random);
        assert_eq!(gen.random_start(), 0);
    }

    #[test]
    fn available_column_avoids_blocked() {
        let h = circle(256.0);
        let mut random = Random::new(42);
        let mut gen = PatternGenerator::new(&h, 4, 0.0, &mut random);

        let blocked = ContainedColumns::default().with(0).with(1).with(3);

        for initial in 0..4 {
            assert_eq!(gen.find_random_available_column(initial, 0, 4, blocked), 2);
        }
    }

    #[test]
    fn fully_blocked_keeps_initial_column() {
        let h = circle(256.0);
        let mut random = Random::new(42);
        let mut gen = PatternGenerator::new(&h, 2, 0.0, &mut random);

        let blocked = ContainedColumns::default().with(0).with(1);

        assert_eq!(gen.find_random_available_column(1, 0, 2, blocked), 1);
    }

    #[test]
    fn denser_maps_are_harder_to_convert() {
        let sparse = Beatmap {
            hit_objects: (0..10)
                .map(|i| HitObject {
                    start_time: f64::from(i) * 2000.0,
                    ..circle(256.0)
                })
                .collect(),
            ..Default::default()
        };

        let dense = Beatmap {
            hit_objects: (0..100)
                .map(|i| HitObject {
                    start_time: f64::from(i) * 200.0,
                    ..circle(256.0)
                })
                .collect(),
            ..Default::default()
        };

        let sparse_diff = conversion_difficulty(&sparse);
        let dense_diff = conversion_difficulty(&dense);

        assert!(dense_diff > sparse_diff);
        assert!(dense_diff <= 12.0);
    }
}
