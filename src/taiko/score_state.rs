/// Judgement counts and combo of a (possibly partial) play.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoScoreState {
    /// Highest combo the player reached.
    pub max_combo: u32,
    pub n300: u32,
    pub n100: u32,
    pub misses: u32,
}

impl TaikoScoreState {
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            n300: 0,
            n100: 0,
            misses: 0,
        }
    }

    /// Number of judged objects.
    pub const fn total_hits(&self) -> u32 {
        self.n300 + self.n100 + self.misses
    }

    /// Accuracy as a fraction in `[0, 1]`.
    pub fn accuracy(&self) -> f64 {
        let total_hits = self.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = 2 * self.n300 + self.n100;
        let denominator = 2 * total_hits;

        f64::from(numerator) / f64::from(denominator)
    }
}
