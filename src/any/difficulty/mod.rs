use crate::{
    catch::Catch,
    mania::Mania,
    model::{
        beatmap::Beatmap,
        mode::{GameMode, IGameMode},
        mods::GameMods,
    },
    osu::Osu,
    taiko::Taiko,
    CalculateError,
};

use super::attributes::DifficultyAttributes;

pub mod object;
pub mod skills;

const MIN_CLOCK_RATE: f64 = 0.01;
const MAX_CLOCK_RATE: f64 = 100.0;

/// Difficulty calculator on maps of any mode.
///
/// ```
/// use beatmap_pp::{Beatmap, Difficulty, model::mods::GameMods};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = Difficulty::new()
///     .mods(GameMods::HD | GameMods::DT)
///     .calculate(&map)
///     .unwrap();
///
/// assert!(attrs.stars() > 0.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[must_use]
pub struct Difficulty {
    mods: GameMods,
    passed_objects: Option<u32>,
    clock_rate: Option<f64>,
}

impl Difficulty {
    /// Create a new difficulty calculator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify mods.
    ///
    /// Conflicting mods are only rejected once the calculation starts.
    pub const fn mods(self, mods: GameMods) -> Self {
        Self { mods, ..self }
    }

    /// Amount of passed objects for partial plays, e.g. a fail.
    pub const fn passed_objects(self, passed_objects: u32) -> Self {
        Self {
            passed_objects: Some(passed_objects),
            ..self
        }
    }

    /// Adjust the clock rate used in the calculation.
    ///
    /// If none is specified, it will take the clock rate based on the mods
    /// i.e. 1.5 for DT, 0.75 for HT and 1.0 otherwise.
    ///
    /// The value is clamped between 0.01 and 100; `NaN` is ignored.
    pub fn clock_rate(self, clock_rate: f64) -> Self {
        if clock_rate.is_nan() {
            return self;
        }

        Self {
            clock_rate: Some(clock_rate.clamp(MIN_CLOCK_RATE, MAX_CLOCK_RATE)),
            ..self
        }
    }

    /// Perform the difficulty calculation for the map's own mode.
    pub fn calculate(&self, map: &Beatmap) -> Result<DifficultyAttributes, CalculateError> {
        self.calculate_mode(map, map.mode)
    }

    /// Perform the difficulty calculation for the given mode, converting the
    /// map first if necessary.
    pub fn calculate_mode(
        &self,
        map: &Beatmap,
        mode: GameMode,
    ) -> Result<DifficultyAttributes, CalculateError> {
        let attrs = match mode {
            GameMode::Osu => self.calculate_for_mode::<Osu>(map)?.into(),
            GameMode::Taiko => self.calculate_for_mode::<Taiko>(map)?.into(),
            GameMode::Catch => self.calculate_for_mode::<Catch>(map)?.into(),
            GameMode::Mania => self.calculate_for_mode::<Mania>(map)?.into(),
        };

        Ok(attrs)
    }

    /// Perform the difficulty calculation for a specific mode, converting the
    /// map first if necessary.
    pub fn calculate_for_mode<M: IGameMode>(
        &self,
        map: &Beatmap,
    ) -> Result<M::DifficultyAttributes, CalculateError> {
        self.mods.validate()?;
        let map = M::convert_ref(map, self.mods)?;

        Ok(M::difficulty(self, &map))
    }

    pub(crate) const fn get_mods(&self) -> GameMods {
        self.mods
    }

    pub(crate) fn get_clock_rate(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.clock_rate())
    }

    pub(crate) fn get_passed_objects(&self) -> usize {
        self.passed_objects.map_or(usize::MAX, |n| n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_rate_defaults_to_mods() {
        let diff = Difficulty::new().mods(GameMods::HT);
        assert!((diff.get_clock_rate() - 0.75).abs() < f64::EPSILON);

        let diff = diff.clock_rate(1.2);
        assert!((diff.get_clock_rate() - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn clock_rate_is_clamped() {
        let diff = Difficulty::new().clock_rate(0.0);
        assert!((diff.get_clock_rate() - MIN_CLOCK_RATE).abs() < f64::EPSILON);

        let diff = Difficulty::new().clock_rate(1e9);
        assert!((diff.get_clock_rate() - MAX_CLOCK_RATE).abs() < f64::EPSILON);

        let diff = Difficulty::new().mods(GameMods::DT).clock_rate(f64::NAN);
        assert!((diff.get_clock_rate() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn conflicting_mods_are_rejected() {
        let map = Beatmap::default();
        let res = Difficulty::new()
            .mods(GameMods::EZ | GameMods::HR)
            .calculate(&map);

        assert!(matches!(res, Err(CalculateError::InvalidModCombination(_))));
    }

    #[test]
    fn unsupported_conversion() {
        let map = Beatmap {
            mode: GameMode::Mania,
            ..Default::default()
        };

        let res = Difficulty::new().calculate_mode(&map, GameMode::Taiko);
        assert!(matches!(res, Err(CalculateError::UnsupportedMode(_))));
    }

    #[test]
    fn passed_objects_default_to_all() {
        assert_eq!(Difficulty::new().get_passed_objects(), usize::MAX);
        assert_eq!(Difficulty::new().passed_objects(3).get_passed_objects(), 3);
    }
}
