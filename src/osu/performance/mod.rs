use crate::{
    any::{
        difficulty::Difficulty,
        performance::{fill_judgements, performance_builder, HitResultPriority},
    },
    util::map_or_attrs::MapOrAttrs,
    CalculateError,
};

use self::calculator::OsuPerformanceCalculator;

use super::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    score_state::OsuScoreState,
    Osu,
};

mod calculator;

pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.14;

/// Points of a 300, 100, and 50 relative to each other.
const JUDGEMENT_WEIGHTS: [f64; 3] = [6.0, 2.0, 1.0];

/// Performance calculator on osu!standard maps.
///
/// ```
/// use beatmap_pp::{osu::OsuPerformance, Beatmap};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0\n300,192,500,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = OsuPerformance::new(&map)
///     .accuracy(97.0)
///     .misses(1)
///     .calculate()
///     .unwrap();
///
/// assert_eq!(attrs.effective_miss_count, 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct OsuPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, Osu>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) hitresult_priority: HitResultPriority,
}

performance_builder! {
    OsuPerformance: OsuDifficultyAttributes, OsuPerformanceAttributes, OsuScoreState {
        /// Capped at the map's max combo minus misses.
        combo: max_combo,
        n300: n300,
        n100: n100,
        n50: n50,
        misses: misses,
    }
}

impl<'map> OsuPerformance<'map> {
    /// Start from a [`Beatmap`](crate::Beatmap) or from attributes of a
    /// previous calculation on the same map and [`Difficulty`] settings.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Osu>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            n300: None,
            n100: None,
            n50: None,
            misses: None,
            hitresult_priority: HitResultPriority::default(),
        }
    }

    /// Which judgements receive hits that neither counts nor accuracy
    /// decide. Defaults to [`HitResultPriority::BestCase`].
    pub const fn hitresult_priority(mut self, priority: HitResultPriority) -> Self {
        self.hitresult_priority = priority;

        self
    }

    /// Create the [`OsuScoreState`] that will be used for performance
    /// calculation.
    pub fn generate_state(&mut self) -> Result<OsuScoreState, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;

        Ok(self.state_for(&attrs))
    }

    fn state_for(&self, attrs: &OsuDifficultyAttributes) -> OsuScoreState {
        let passed_objects = u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX);
        let n_objects = attrs.n_objects().min(passed_objects);

        let misses = self.misses.map_or(0, |n| n.min(n_objects));
        let n_remaining = n_objects - misses;

        let target_points = self
            .acc
            .map(|acc| acc * JUDGEMENT_WEIGHTS[0] * f64::from(n_objects));

        let [n300, n100, n50] = fill_judgements(
            [self.n300, self.n100, self.n50],
            JUDGEMENT_WEIGHTS,
            n_remaining,
            target_points,
            self.hitresult_priority,
        );

        let max_possible_combo = attrs.max_combo.saturating_sub(misses);

        let max_combo = self
            .combo
            .map_or(max_possible_combo, |combo| combo.min(max_possible_combo));

        OsuScoreState {
            max_combo,
            n300,
            n100,
            n50,
            misses,
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> Result<OsuPerformanceAttributes, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;
        let state = self.state_for(&attrs);

        let calculator = OsuPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state);

        Ok(calculator.calculate())
    }
}
