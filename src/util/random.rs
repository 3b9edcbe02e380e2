//! Xorshift random number generator matching the one osu!stable seeds for
//! its mania conversion and catch offsets, so that converts are
//! reproducible.

const INT_TO_REAL: f64 = 1.0 / (i32::MAX as f64 + 1.0);
const INT_MASK: u32 = 0x7F_FF_FF_FF;

const Y: u32 = 842_502_087;
const Z: u32 = 3_579_807_591;
const W: u32 = 273_326_509;

#[derive(Clone, Debug)]
pub struct Random {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
    bit_buf: u32,
    bit_idx: u32,
}

impl Random {
    pub const fn new(seed: i32) -> Self {
        Self {
            x: seed as u32,
            y: Y,
            z: Z,
            w: W,
            bit_buf: 0,
            bit_idx: 32,
        }
    }

    pub const fn next_u32(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ t ^ (t >> 8);

        self.w
    }

    /// Non-negative `i32`.
    pub const fn next_i32(&mut self) -> i32 {
        (INT_MASK & self.next_u32()) as i32
    }

    /// Value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        INT_TO_REAL * f64::from(self.next_i32())
    }

    /// Value in `[min, max)`.
    pub fn next_i32_range(&mut self, min: i32, max: i32) -> i32 {
        (f64::from(min) + self.next_f64() * f64::from(max - min)) as i32
    }

    /// Truncated value in `[min, max)`.
    pub fn next_f64_range(&mut self, min: f64, max: f64) -> i32 {
        (min + self.next_f64() * (max - min)) as i32
    }

    pub const fn next_bool(&mut self) -> bool {
        if self.bit_idx == 32 {
            self.bit_buf = self.next_u32();
            self.bit_idx = 1;
        } else {
            self.bit_idx += 1;
            self.bit_buf >>= 1;
        }

        (self.bit_buf & 1) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::Random;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::new(1337);
        let mut b = Random::new(1337);

        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }

        assert_eq!(a.next_bool(), b.next_bool());
    }

    #[test]
    fn ranges_are_respected() {
        let mut random = Random::new(42);

        for _ in 0..1000 {
            let value = random.next_f64();
            assert!((0.0..1.0).contains(&value));

            let column = random.next_i32_range(1, 7);
            assert!((1..7).contains(&column));
        }
    }
}
