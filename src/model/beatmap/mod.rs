use std::{borrow::Cow, str::FromStr};

use crate::{catch::Catch, mania::Mania, osu::Osu, taiko::Taiko};

pub use self::{
    attributes::{BeatmapAttributes, BeatmapAttributesBuilder, HitWindows},
    decode::{ParseError, ParseErrorKind, Section, LATEST_FORMAT_VERSION},
};

use super::{
    control_point::{
        difficulty_point_at, effect_point_at, timing_point_at, DifficultyPoint, EffectPoint,
        TimingPoint,
    },
    hit_object::{HitObject, HitSoundType},
    mode::{ConvertError, GameMode, IGameMode},
    mods::GameMods,
};

mod attributes;
mod bpm;
mod decode;

/// A parsed `.osu` file, reduced to what the calculations need.
///
/// Objects and their hitsounds are stored in parallel, `hit_sounds[i]`
/// belongs to `hit_objects[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Beatmap {
    /// File format version from the header line.
    pub version: i32,
    /// Set when the objects were generated from an osu!standard map.
    pub is_convert: bool,
    pub mode: GameMode,
    pub stack_leniency: f32,
    pub ar: f32,
    pub cs: f32,
    pub hp: f32,
    pub od: f32,
    pub slider_multiplier: f64,
    pub slider_tick_rate: f64,
    pub breaks: Vec<BreakPeriod>,
    pub timing_points: Vec<TimingPoint>,
    pub difficulty_points: Vec<DifficultyPoint>,
    pub effect_points: Vec<EffectPoint>,
    pub hit_objects: Vec<HitObject>,
    pub hit_sounds: Vec<HitSoundType>,
}

/// Time span without objects, in milliseconds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BreakPeriod {
    pub start_time: f64,
    pub end_time: f64,
}

impl Beatmap {
    /// Decode the content of a `.osu` file. Invalid UTF-8 is replaced
    /// rather than rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        decode::decode(&String::from_utf8_lossy(bytes))
    }

    /// Start building the map's attributes under mods and overrides.
    pub fn attributes(&self) -> BeatmapAttributesBuilder {
        BeatmapAttributesBuilder::new().map(self)
    }

    /// Most common BPM, weighted by how long each timing point lasts.
    pub fn bpm(&self) -> f64 {
        bpm::bpm(self.hit_objects.last(), &self.timing_points)
    }

    pub fn total_break_time(&self) -> f64 {
        self.breaks
            .iter()
            .map(|period| period.end_time - period.start_time)
            .sum()
    }

    /// This map as `mode`, borrowed if it already is one.
    ///
    /// Only osu!standard maps convert to other modes.
    pub fn convert_ref(
        &self,
        mode: GameMode,
        mods: GameMods,
    ) -> Result<Cow<'_, Self>, ConvertError> {
        let convert: fn(&Self, GameMods) -> Result<Cow<'_, Self>, ConvertError> = match mode {
            GameMode::Osu => Osu::convert_ref,
            GameMode::Taiko => Taiko::convert_ref,
            GameMode::Catch => Catch::convert_ref,
            GameMode::Mania => Mania::convert_ref,
        };

        convert(self, mods)
    }

    pub(crate) fn timing_point_at(&self, time: f64) -> Option<&TimingPoint> {
        timing_point_at(&self.timing_points, time)
    }

    pub(crate) fn difficulty_point_at(&self, time: f64) -> Option<&DifficultyPoint> {
        difficulty_point_at(&self.difficulty_points, time)
    }

    pub(crate) fn effect_point_at(&self, time: f64) -> Option<&EffectPoint> {
        effect_point_at(&self.effect_points, time)
    }
}

impl FromStr for Beatmap {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode::decode(s)
    }
}

impl Default for Beatmap {
    /// Values a `.osu` file falls back to for missing keys.
    fn default() -> Self {
        Self {
            version: LATEST_FORMAT_VERSION,
            is_convert: false,
            mode: GameMode::Osu,
            stack_leniency: 0.7,
            ar: 5.0,
            cs: 5.0,
            hp: 5.0,
            od: 5.0,
            slider_multiplier: 1.4,
            slider_tick_rate: 1.0,
            breaks: Vec::new(),
            timing_points: Vec::new(),
            difficulty_points: Vec::new(),
            effect_points: Vec::new(),
            hit_objects: Vec::new(),
            hit_sounds: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAIKO_MAP: &str = "osu file format v14\n[General]\nMode: 1\n[HitObjects]\n0,0,0,1,0\n";

    #[test]
    fn same_mode_is_borrowed() {
        let map: Beatmap = TAIKO_MAP.parse().unwrap();
        let converted = map.convert_ref(GameMode::Taiko, GameMods::NM).unwrap();

        assert!(matches!(converted, Cow::Borrowed(_)));
    }

    #[test]
    fn only_standard_converts() {
        let map: Beatmap = TAIKO_MAP.parse().unwrap();
        let err = map.convert_ref(GameMode::Mania, GameMods::NM).unwrap_err();

        assert_eq!(
            err,
            ConvertError::UnsupportedMode {
                from: GameMode::Taiko,
                to: GameMode::Mania
            }
        );
    }

    #[test]
    fn break_time() {
        let map = Beatmap {
            breaks: vec![
                BreakPeriod {
                    start_time: 1000.0,
                    end_time: 3000.0,
                },
                BreakPeriod {
                    start_time: 5000.0,
                    end_time: 5500.0,
                },
            ],
            ..Default::default()
        };

        assert!((map.total_break_time() - 2500.0).abs() < f64::EPSILON);
    }
}
