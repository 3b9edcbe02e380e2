use crate::{catch::PLAYFIELD_WIDTH, util::random::Random};

const RNG_SEED: i32 = 1337;

/// Positional offsets that hardrock applies to fruits.
///
/// The random number generator advances for every droplet and banana even
/// when no offsets are applied so that fruit offsets are reproducible.
pub struct HardRockOffsets {
    enabled: bool,
    rng: Random,
    last_pos: Option<f32>,
    last_start_time: f64,
}

impl HardRockOffsets {
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            rng: Random::new(RNG_SEED),
            last_pos: None,
            last_start_time: 0.0,
        }
    }

    /// Returns the x offset of a fruit.
    pub fn fruit(&mut self, x: f32, start_time: f64) -> f32 {
        if !self.enabled {
            return 0.0;
        }

        let mut offset_pos = x;

        let last_pos = match self.last_pos {
            Some(pos) if pos.abs() >= f32::EPSILON => pos,
            Some(_) | None => {
                self.remember(offset_pos, start_time);

                return 0.0;
            }
        };

        let pos_diff = offset_pos - last_pos;
        let time_diff = (start_time - self.last_start_time) as i32;

        if time_diff > 1000 {
            self.remember(offset_pos, start_time);

            return 0.0;
        }

        if pos_diff.abs() < f32::EPSILON {
            self.random_offset(&mut offset_pos, f64::from(time_diff) / 4.0);

            return offset_pos - x;
        }

        if pos_diff.abs() < (time_diff / 3) as f32 {
            apply_offset(&mut offset_pos, pos_diff);
        }

        self.remember(offset_pos, start_time);

        offset_pos - x
    }

    /// A juice stream moves the tracked position to its end and consumes one
    /// random number per droplet.
    pub fn juice_stream(&mut self, end_x: f32, start_time: f64, n_droplets: usize) {
        self.remember(end_x, start_time);

        for _ in 0..n_droplets {
            let _ = self.rng.next_i32();
        }
    }

    pub fn banana_shower(&mut self, n_bananas: usize) {
        for _ in 0..n_bananas {
            let _ = self.rng.next_f64();
            let _ = self.rng.next_i32();
            let _ = self.rng.next_i32();
            let _ = self.rng.next_i32();
        }
    }

    fn remember(&mut self, pos: f32, start_time: f64) {
        self.last_pos = Some(pos);
        self.last_start_time = start_time;
    }

    fn random_offset(&mut self, pos: &mut f32, max_offset: f64) {
        let right = self.rng.next_bool();
        let rand = (self.rng.next_f64_range(0.0, max_offset.max(0.0)) as f32).min(20.0);

        if right {
            if *pos + rand <= PLAYFIELD_WIDTH {
                *pos += rand;
            } else {
                *pos -= rand;
            }
        } else if *pos - rand >= 0.0 {
            *pos -= rand;
        } else {
            *pos += rand;
        }
    }
}

fn apply_offset(pos: &mut f32, amount: f32) {
    if amount > 0.0 {
        if *pos + amount < PLAYFIELD_WIDTH {
            *pos += amount;
        }
    } else if *pos + amount > 0.0 {
        *pos += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_never_offsets() {
        let mut offsets = HardRockOffsets::new(false);

        assert!(offsets.fruit(100.0, 0.0).abs() < f32::EPSILON);
        assert!(offsets.fruit(100.0, 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn close_fruits_are_pushed_apart() {
        let mut offsets = HardRockOffsets::new(true);

        assert!(offsets.fruit(100.0, 0.0).abs() < f32::EPSILON);
        // 20px in 300ms is below the 100px threshold, movement doubles
        let offset = offsets.fruit(120.0, 300.0);
        assert!((offset - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stacked_fruits_get_random_offset() {
        let mut a = HardRockOffsets::new(true);
        let mut b = HardRockOffsets::new(true);

        a.fruit(100.0, 0.0);
        b.fruit(100.0, 0.0);

        let offset = a.fruit(100.0, 200.0);
        assert!(offset.abs() <= 20.0);
        assert!((offset - b.fruit(100.0, 200.0)).abs() < f32::EPSILON);
    }
}
