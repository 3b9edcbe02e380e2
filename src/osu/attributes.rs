/// What an osu!standard map demands, after mods.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuDifficultyAttributes {
    pub stars: f64,
    pub aim: f64,
    pub speed: f64,
    pub flashlight: f64,
    /// Aim rating without sliders divided by aim rating with them.
    pub slider_factor: f64,
    /// Objects weighted by how close their speed strain is to the peak.
    pub speed_note_count: f64,
    pub aim_difficult_strain_count: f64,
    pub speed_difficult_strain_count: f64,
    pub aim_difficult_slider_count: f64,
    pub ar: f64,
    pub od: f64,
    pub hp: f64,
    /// In milliseconds, scaled by the clock rate.
    pub great_hit_window: f64,
    pub n_circles: u32,
    pub n_sliders: u32,
    pub n_spinners: u32,
    /// Circles, sliders with all their nested objects, and spinners.
    pub max_combo: u32,
}

impl OsuDifficultyAttributes {
    pub const fn n_objects(&self) -> u32 {
        self.n_circles + self.n_sliders + self.n_spinners
    }
}

/// The pp of an osu!standard score and how they are made up.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OsuPerformanceAttributes {
    pub difficulty: OsuDifficultyAttributes,
    pub pp: f64,
    pub pp_aim: f64,
    pub pp_speed: f64,
    pub pp_acc: f64,
    pub pp_flashlight: f64,
    /// Misses plus the slider breaks that the combo implies.
    pub effective_miss_count: f64,
}

impl From<OsuPerformanceAttributes> for OsuDifficultyAttributes {
    fn from(attrs: OsuPerformanceAttributes) -> Self {
        attrs.difficulty
    }
}
