/// What an osu!mania map demands, after mods.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaDifficultyAttributes {
    pub stars: f64,
    /// In milliseconds, scaled by the clock rate.
    pub great_hit_window: f64,
    /// Notes and hold notes.
    pub n_objects: u32,
    pub n_hold_notes: u32,
    /// Hold notes give combo for their head, tail and every tick.
    pub max_combo: u32,
    /// Set for maps converted from osu!standard.
    pub is_convert: bool,
}

/// The pp of an osu!mania score.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ManiaPerformanceAttributes {
    pub difficulty: ManiaDifficultyAttributes,
    pub pp: f64,
    pub pp_difficulty: f64,
}

impl From<ManiaPerformanceAttributes> for ManiaDifficultyAttributes {
    fn from(attrs: ManiaPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
