/// Judgement counts and combo of a (possibly partial) play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuScoreState {
    /// Highest combo the player reached.
    pub max_combo: u32,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl OsuScoreState {
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Number of judged objects.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.n50 + self.misses
    }

    /// Accuracy as a fraction in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = 6 * self.n300 + 2 * self.n100 + self.n50;
        let denominator = 6 * total_hits;

        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::OsuScoreState;

    #[test]
    fn accuracy() {
        let state = OsuScoreState {
            max_combo: 10,
            n300: 6,
            n100: 2,
            n50: 1,
            misses: 1,
        };

        assert_eq!(state.total_hits(), 10);
        assert!((state.accuracy() - 41.0 / 60.0).abs() < 1e-12);
        assert!(OsuScoreState::new().accuracy().abs() < f64::EPSILON);
    }
}
