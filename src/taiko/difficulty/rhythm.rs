/// A ratio between the current and the previous delta time together with how
/// hard it is to play.
#[derive(Debug, PartialEq)]
pub struct HitObjectRhythm {
    pub ratio: f64,
    pub difficulty: f64,
}

impl HitObjectRhythm {
    const fn new(numerator: u8, denominator: u8, difficulty: f64) -> Self {
        Self {
            ratio: numerator as f64 / denominator as f64,
            difficulty,
        }
    }

    /// The common rhythm whose ratio is closest to `delta_time / prev_delta_time`.
    ///
    /// Ties pick the rhythm listed first.
    pub fn closest(delta_time: f64, prev_delta_time: f64) -> &'static Self {
        let ratio = delta_time / prev_delta_time;

        COMMON_RHYTHMS
            .iter()
            .min_by(|a, b| (a.ratio - ratio).abs().total_cmp(&(b.ratio - ratio).abs()))
            .unwrap_or_else(Self::constant)
    }

    /// The rhythm of evenly spaced objects.
    pub fn constant() -> &'static Self {
        &COMMON_RHYTHMS[0]
    }

    pub fn is_constant(&self) -> bool {
        self.difficulty.abs() <= f64::EPSILON
    }
}

static COMMON_RHYTHMS: [HitObjectRhythm; 9] = [
    HitObjectRhythm::new(1, 1, 0.0),
    HitObjectRhythm::new(2, 1, 0.3),
    HitObjectRhythm::new(1, 2, 0.5),
    HitObjectRhythm::new(3, 1, 0.3),
    HitObjectRhythm::new(1, 3, 0.35),
    // purposefully higher (requires hand switch in full alternating gameplay style)
    HitObjectRhythm::new(3, 2, 0.6),
    HitObjectRhythm::new(2, 3, 0.4),
    HitObjectRhythm::new(5, 4, 0.5),
    HitObjectRhythm::new(4, 5, 0.7),
];

#[cfg(test)]
mod tests {
    use super::HitObjectRhythm;

    #[test]
    fn closest_rhythm() {
        assert!(HitObjectRhythm::closest(100.0, 100.0).is_constant());
        assert!((HitObjectRhythm::closest(200.0, 100.0).ratio - 2.0).abs() < f64::EPSILON);
        assert!((HitObjectRhythm::closest(48.0, 100.0).ratio - 0.5).abs() < f64::EPSILON);
        assert!((HitObjectRhythm::closest(155.0, 100.0).difficulty - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_previous_delta() {
        // Infinite ratio is equally far from every rhythm
        let rhythm = HitObjectRhythm::closest(100.0, 0.0);

        assert!(rhythm.is_constant());
        assert_eq!(rhythm, HitObjectRhythm::constant());
    }
}
