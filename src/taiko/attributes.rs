/// What an osu!taiko map demands, after mods.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoDifficultyAttributes {
    pub stars: f64,
    pub stamina: f64,
    pub rhythm: f64,
    pub color: f64,
    /// Combined skill difficulty before it is rescaled into stars.
    pub peak: f64,
    /// In milliseconds, scaled by the clock rate.
    pub great_hit_window: f64,
    /// Circles only, drum rolls and swells give no combo.
    pub max_combo: u32,
    /// Every object, drum rolls and swells included.
    pub n_objects: u32,
    /// Set for maps converted from osu!standard.
    pub is_convert: bool,
}

/// The pp of an osu!taiko score and how they are made up.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaikoPerformanceAttributes {
    pub difficulty: TaikoDifficultyAttributes,
    pub pp: f64,
    pub pp_difficulty: f64,
    pub pp_acc: f64,
    /// Misses scaled by the amount of successful hits.
    pub effective_miss_count: f64,
}

impl From<TaikoPerformanceAttributes> for TaikoDifficultyAttributes {
    fn from(attrs: TaikoPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
