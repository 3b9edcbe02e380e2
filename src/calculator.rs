use crate::{
    any::{DifficultyAttributes, PerformanceAttributes, ScoreParameters},
    cache::{content_hash, DifficultyCache},
    catch::CatchPerformanceAttributes,
    mania::ManiaPerformanceAttributes,
    model::{
        beatmap::{Beatmap, BeatmapAttributes},
        mode::GameMode,
    },
    osu::OsuPerformanceAttributes,
    taiko::TaikoPerformanceAttributes,
    util::log_debug,
    CalculateError,
};

/// A parsed beatmap together with the hash of its source bytes.
///
/// ```
/// use beatmap_pp::{calculator::Calculator, any::ScoreParameters, model::mode::GameMode};
///
/// let bytes = b"osu file format v14\n\n[Difficulty]\nApproachRate:9\n\n\
///     [HitObjects]\n256,192,0,1,0\n100,100,400,1,0\n400,300,800,1,0";
///
/// let calculator = Calculator::from_bytes(bytes).unwrap();
///
/// let result = calculator
///     .calculate(&ScoreParameters::new(GameMode::Osu).accuracy(0.98))
///     .unwrap();
///
/// assert_eq!(result.mode, GameMode::Osu);
/// assert_eq!(result.max_combo, 3);
/// assert!(result.pp > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Calculator {
    map: Beatmap,
    hash: u64,
}

impl Calculator {
    /// Parse the content of a `.osu` file.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CalculateError> {
        let map = Beatmap::from_bytes(bytes)?;

        Ok(Self {
            map,
            hash: content_hash(bytes),
        })
    }

    pub const fn map(&self) -> &Beatmap {
        &self.map
    }

    /// The XXH3-64 hash of the source bytes.
    pub const fn hash(&self) -> u64 {
        self.hash
    }

    /// Calculate difficulty and performance of a score.
    pub fn calculate(&self, params: &ScoreParameters) -> Result<CalculateResult, CalculateError> {
        params.validate()?;
        let attrs = params.difficulty().calculate_mode(&self.map, params.mode)?;

        self.finish(params, attrs)
    }

    /// Same as [`calculate`] but difficulty attributes are taken from or
    /// stored in the given cache.
    ///
    /// [`calculate`]: Self::calculate
    pub fn calculate_cached(
        &self,
        params: &ScoreParameters,
        cache: &DifficultyCache,
    ) -> Result<CalculateResult, CalculateError> {
        params.validate()?;

        let difficulty = params.difficulty();
        let attrs = cache.calculate(self.hash, &self.map, params.mode, &difficulty)?;

        self.finish(params, attrs)
    }

    fn finish(
        &self,
        params: &ScoreParameters,
        attrs: DifficultyAttributes,
    ) -> Result<CalculateResult, CalculateError> {
        params.validate_against(&attrs)?;

        let perf = params.performance(attrs).calculate()?;

        let is_convert = self.map.mode != params.mode;

        let map_attrs = self
            .map
            .attributes()
            .mode(params.mode, is_convert)
            .difficulty(&params.difficulty())
            .build();

        let bpm = self.map.bpm() * map_attrs.clock_rate;

        log_debug!(
            "calculated {} pp on {} map {:016x}",
            perf.pp(),
            params.mode,
            self.hash
        );

        Ok(CalculateResult::new(perf, &map_attrs, bpm))
    }
}

/// The flattened outcome of [`Calculator::calculate`].
///
/// Values that don't apply to the mode are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculateResult {
    pub mode: GameMode,
    pub stars: f64,
    pub pp: f64,
    pub pp_acc: Option<f64>,
    pub pp_aim: Option<f64>,
    pub pp_flashlight: Option<f64>,
    pub pp_speed: Option<f64>,
    /// Difficulty portion of osu!taiko and osu!mania pp.
    pub pp_difficulty: Option<f64>,
    pub effective_miss_count: Option<f64>,
    pub aim: Option<f64>,
    pub speed: Option<f64>,
    pub flashlight: Option<f64>,
    pub slider_factor: Option<f64>,
    pub n_fruits: Option<u32>,
    pub n_droplets: Option<u32>,
    pub n_tiny_droplets: Option<u32>,

    // Map attributes after mods and clock rate
    pub ar: f64,
    pub cs: f64,
    pub hp: f64,
    pub od: f64,
    pub bpm: f64,
    pub clock_rate: f64,
    /// Milliseconds an object is visible before its hit time.
    pub preempt: Option<f64>,
    pub great_hit_window: Option<f64>,
    /// Circles for osu!standard, all notes for osu!mania.
    pub n_objects: Option<u32>,
    /// Sliders for osu!standard, hold notes for osu!mania.
    pub n_sliders: Option<u32>,
    pub n_spinners: Option<u32>,
    pub max_combo: u32,
}

impl CalculateResult {
    fn new(perf: PerformanceAttributes, map_attrs: &BeatmapAttributes, bpm: f64) -> Self {
        let BeatmapAttributes {
            ar,
            od,
            cs,
            hp,
            clock_rate,
            ref hit_windows,
        } = *map_attrs;

        let base = Self {
            mode: perf.mode(),
            stars: perf.stars(),
            pp: perf.pp(),
            ar,
            cs,
            hp,
            od,
            bpm,
            clock_rate,
            max_combo: perf.max_combo(),
            ..Default::default()
        };

        match perf {
            PerformanceAttributes::Osu(OsuPerformanceAttributes {
                difficulty,
                pp_acc,
                pp_aim,
                pp_flashlight,
                pp_speed,
                effective_miss_count,
                ..
            }) => Self {
                pp_acc: Some(pp_acc),
                pp_aim: Some(pp_aim),
                pp_flashlight: Some(pp_flashlight),
                pp_speed: Some(pp_speed),
                effective_miss_count: Some(effective_miss_count),
                aim: Some(difficulty.aim),
                speed: Some(difficulty.speed),
                flashlight: Some(difficulty.flashlight),
                slider_factor: Some(difficulty.slider_factor),
                ar: difficulty.ar,
                od: difficulty.od,
                hp: difficulty.hp,
                preempt: Some(hit_windows.ar),
                great_hit_window: Some(difficulty.great_hit_window),
                n_objects: Some(difficulty.n_circles),
                n_sliders: Some(difficulty.n_sliders),
                n_spinners: Some(difficulty.n_spinners),
                ..base
            },
            PerformanceAttributes::Taiko(TaikoPerformanceAttributes {
                difficulty,
                pp_acc,
                pp_difficulty,
                effective_miss_count,
                ..
            }) => Self {
                pp_acc: Some(pp_acc),
                pp_difficulty: Some(pp_difficulty),
                effective_miss_count: Some(effective_miss_count),
                great_hit_window: Some(difficulty.great_hit_window),
                n_objects: Some(difficulty.n_objects),
                ..base
            },
            PerformanceAttributes::Catch(CatchPerformanceAttributes { difficulty, .. }) => Self {
                ar: difficulty.ar,
                preempt: Some(hit_windows.ar),
                n_fruits: Some(difficulty.n_fruits),
                n_droplets: Some(difficulty.n_droplets),
                n_tiny_droplets: Some(difficulty.n_tiny_droplets),
                ..base
            },
            PerformanceAttributes::Mania(ManiaPerformanceAttributes {
                difficulty,
                pp_difficulty,
                ..
            }) => Self {
                pp_difficulty: Some(pp_difficulty),
                great_hit_window: Some(difficulty.great_hit_window),
                n_objects: Some(difficulty.n_objects),
                n_sliders: Some(difficulty.n_hold_notes),
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{any::ScoreParametersError, model::mods::GameMods};

    use super::*;

    const MAP: &[u8] = b"osu file format v14

[Difficulty]
HPDrainRate:6
CircleSize:4
OverallDifficulty:8
ApproachRate:9
SliderMultiplier:1.4
SliderTickRate:1

[TimingPoints]
0,400,4,2,0,100,1,0

[HitObjects]
64,192,0,1,0
448,192,300,1,0
64,192,600,1,0
256,192,900,2,0,L|456:192,1,200
100,192,2000,1,0
400,192,2200,1,0
256,192,3000,12,0,4000
";

    fn calculator() -> Calculator {
        Calculator::from_bytes(MAP).unwrap()
    }

    #[test]
    fn osu_result() {
        let result = calculator()
            .calculate(&ScoreParameters::new(GameMode::Osu))
            .unwrap();

        assert_eq!(result.mode, GameMode::Osu);
        assert!(result.stars > 0.0);
        assert!(result.pp > 0.0);
        assert!(result.pp_aim.is_some() && result.pp_speed.is_some());
        assert_eq!(result.n_objects, Some(5));
        assert_eq!(result.n_sliders, Some(1));
        assert_eq!(result.n_spinners, Some(1));
        assert!((result.bpm - 150.0).abs() < 1e-9);
        assert!(result.preempt.is_some());
        assert!(result.n_fruits.is_none());
    }

    #[test]
    fn every_mode_calculates() {
        let calculator = calculator();

        for mode in [GameMode::Osu, GameMode::Taiko, GameMode::Catch, GameMode::Mania] {
            let result = calculator.calculate(&ScoreParameters::new(mode)).unwrap();

            assert_eq!(result.mode, mode);
            assert!(result.pp.is_finite() && result.pp >= 0.0);
            assert!(result.stars.is_finite());
        }
    }

    #[test]
    fn double_time_speeds_up() {
        let calculator = calculator();
        let params = ScoreParameters::new(GameMode::Osu);

        let nm = calculator.calculate(&params).unwrap();
        let dt = calculator.calculate(&params.clone().mods(GameMods::DT)).unwrap();

        assert!((dt.clock_rate - 1.5).abs() < f64::EPSILON);
        assert!((dt.bpm - nm.bpm * 1.5).abs() < 1e-9);
        assert!(dt.ar > nm.ar);
        assert!(dt.stars > nm.stars);
    }

    #[test]
    fn cached_matches_uncached() {
        let calculator = calculator();
        let cache = DifficultyCache::new();
        let params = ScoreParameters::new(GameMode::Taiko).accuracy(0.95).misses(1);

        let uncached = calculator.calculate(&params).unwrap();
        let cached = calculator.calculate_cached(&params, &cache).unwrap();
        let again = calculator.calculate_cached(&params, &cache).unwrap();

        assert_eq!(uncached, cached);
        assert_eq!(cached, again);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalid_parameters() {
        let calculator = calculator();

        let err = calculator
            .calculate(&ScoreParameters::new(GameMode::Osu).accuracy(1.5))
            .unwrap_err();

        assert!(matches!(
            err,
            CalculateError::InvalidScoreParameters(ScoreParametersError::AccuracyOutOfRange(_))
        ));

        let err = calculator
            .calculate(&ScoreParameters::new(GameMode::Osu).n300(1000))
            .unwrap_err();

        assert!(matches!(
            err,
            CalculateError::InvalidScoreParameters(
                ScoreParametersError::HitCountsExceedObjects { .. }
            )
        ));

        let err = calculator
            .calculate(&ScoreParameters::new(GameMode::Osu).mods(GameMods::HR | GameMods::EZ))
            .unwrap_err();

        assert!(matches!(err, CalculateError::InvalidModCombination(_)));
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = Calculator::from_bytes(b"not a beatmap").unwrap_err();

        assert!(matches!(err, CalculateError::Parse(_)));
    }
}
