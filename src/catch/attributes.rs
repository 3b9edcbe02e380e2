/// What an osu!catch map demands, after mods.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchDifficultyAttributes {
    pub stars: f64,
    /// Approach rate with mods and clock rate applied.
    pub ar: f64,
    pub n_fruits: u32,
    pub n_droplets: u32,
    pub n_tiny_droplets: u32,
    /// Set for maps converted from osu!standard.
    pub is_convert: bool,
}

impl CatchDifficultyAttributes {
    /// Tiny droplets don't give combo.
    pub const fn max_combo(&self) -> u32 {
        self.n_fruits + self.n_droplets
    }
}

/// The pp of an osu!catch score.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatchPerformanceAttributes {
    pub difficulty: CatchDifficultyAttributes,
    pub pp: f64,
}

impl From<CatchPerformanceAttributes> for CatchDifficultyAttributes {
    fn from(attrs: CatchPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
