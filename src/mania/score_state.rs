/// Judgement counts of an osu!mania play.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaScoreState {
    pub n320: u32,
    pub n300: u32,
    pub n200: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl ManiaScoreState {
    pub const fn new() -> Self {
        Self {
            n320: 0,
            n300: 0,
            n200: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    pub const fn total_hits(&self) -> u32 {
        self.n320 + self.n300 + self.n200 + self.n100 + self.n50 + self.misses
    }

    /// Accuracy between `0.0` and `1.0` where 320s and 300s are worth the
    /// same.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = 6 * (self.n320 + self.n300) + 4 * self.n200 + 2 * self.n100 + self.n50;
        let denominator = 6 * total_hits;

        f64::from(numerator) / f64::from(denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfects_and_greats_are_equal() {
        let a = ManiaScoreState {
            n320: 10,
            ..ManiaScoreState::new()
        };

        let b = ManiaScoreState {
            n300: 10,
            ..ManiaScoreState::new()
        };

        assert!((a.accuracy() - 1.0).abs() < f64::EPSILON);
        assert!((a.accuracy() - b.accuracy()).abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_accuracy() {
        let state = ManiaScoreState {
            n320: 1,
            n300: 1,
            n200: 1,
            n100: 1,
            n50: 1,
            misses: 1,
        };

        assert_eq!(state.total_hits(), 6);
        assert!((state.accuracy() - 19.0 / 36.0).abs() < 1e-12);
        assert!(ManiaScoreState::new().accuracy().abs() < f64::EPSILON);
    }
}
