use std::cmp;

use crate::{
    any::{
        difficulty::Difficulty,
        performance::{fill_judgements, performance_builder, HitResultPriority},
    },
    util::map_or_attrs::MapOrAttrs,
    CalculateError,
};

use self::calculator::ManiaPerformanceCalculator;

use super::{
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    score_state::ManiaScoreState,
    Mania,
};

mod calculator;

/// Points of a 320, 200, 100, and 50. A 300 is worth as much as a 320.
const JUDGEMENT_WEIGHTS: [f64; 4] = [6.0, 4.0, 2.0, 1.0];

/// Performance calculator on osu!mania maps.
///
/// Key mods only take effect on converted maps.
///
/// ```
/// use beatmap_pp::{mania::ManiaPerformance, Beatmap};
///
/// let map: Beatmap = "osu file format v14\n\n[General]\nMode: 3\n\n\
///     [Difficulty]\nCircleSize:4\n\n[HitObjects]\n\
///     64,192,0,1,0\n192,192,150,1,0\n320,192,300,1,0\n448,192,450,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = ManiaPerformance::new(&map)
///     .accuracy(98.5)
///     .calculate()
///     .unwrap();
///
/// assert_eq!(attrs.difficulty.n_objects, 4);
/// assert!(attrs.pp.is_finite());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct ManiaPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, Mania>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) n320: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n200: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) n50: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) hitresult_priority: HitResultPriority,
}

performance_builder! {
    ManiaPerformance: ManiaDifficultyAttributes, ManiaPerformanceAttributes, ManiaScoreState {
        n320: n320,
        n300: n300,
        n200: n200,
        n100: n100,
        n50: n50,
        misses: misses,
    }
}

impl<'map> ManiaPerformance<'map> {
    /// Start from a [`Beatmap`](crate::Beatmap) or from attributes of a
    /// previous calculation on the same map and [`Difficulty`] settings.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Mania>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            acc: None,
            n320: None,
            n300: None,
            n200: None,
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

    /// Create the [`ManiaScoreState`] that will be used for performance
    /// calculation.
    pub fn generate_state(&mut self) -> Result<ManiaScoreState, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;

        Ok(self.state_for(&attrs))
    }

    /// Unset 300s stay at zero since 320s are worth the same and rank
    /// higher.
    fn state_for(&self, attrs: &ManiaDifficultyAttributes) -> ManiaScoreState {
        let passed_objects = u32::try_from(self.difficulty.get_passed_objects()).unwrap_or(u32::MAX);
        let n_objects = cmp::min(passed_objects, attrs.n_objects);

        let misses = self.misses.map_or(0, |n| n.min(n_objects));
        let n300 = self.n300.map_or(0, |n| n.min(n_objects - misses));
        let n_remaining = n_objects - misses - n300;

        let target_points = self.acc.map(|acc| {
            acc * JUDGEMENT_WEIGHTS[0] * f64::from(n_objects)
                - JUDGEMENT_WEIGHTS[0] * f64::from(n300)
        });

        let [n320, n200, n100, n50] = fill_judgements(
            [self.n320, self.n200, self.n100, self.n50],
            JUDGEMENT_WEIGHTS,
            n_remaining,
            target_points,
            self.hitresult_priority,
        );

        ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses,
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> Result<ManiaPerformanceAttributes, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;
        let state = self.state_for(&attrs);

        let calculator = ManiaPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state);

        Ok(calculator.calculate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> ManiaDifficultyAttributes {
        ManiaDifficultyAttributes {
            stars: 4.2,
            great_hit_window: 40.0,
            n_objects: 800,
            n_hold_notes: 120,
            max_combo: 1100,
            is_convert: false,
        }
    }

    #[test]
    fn best_case_default() {
        let state = ManiaPerformance::new(attrs()).generate_state().unwrap();

        assert_eq!(
            state,
            ManiaScoreState {
                n320: 800,
                ..ManiaScoreState::new()
            }
        );
    }

    #[test]
    fn accuracy_is_approached() {
        for acc in [99.0, 95.0, 90.0, 80.0] {
            let state = ManiaPerformance::new(attrs())
                .accuracy(acc)
                .misses(3)
                .generate_state()
                .unwrap();

            assert_eq!(state.total_hits(), 800);
            assert_eq!(state.misses, 3);
            assert!(
                (state.accuracy() - acc / 100.0).abs() < 0.005,
                "{} != {acc}",
                state.accuracy()
            );
        }
    }

    #[test]
    fn worst_case_prefers_bad_judgements() {
        let best = ManiaPerformance::new(attrs())
            .accuracy(90.0)
            .generate_state()
            .unwrap();

        let worst = ManiaPerformance::new(attrs())
            .accuracy(90.0)
            .hitresult_priority(HitResultPriority::WorstCase)
            .generate_state()
            .unwrap();

        assert!(worst.n50 >= best.n50);
        assert!((worst.accuracy() - 0.9).abs() < 0.005);
    }

    #[test]
    fn given_counts_are_kept() {
        let state = ManiaPerformance::new(attrs())
            .n300(100)
            .n200(20)
            .misses(5)
            .generate_state()
            .unwrap();

        assert_eq!(state.n300, 100);
        assert_eq!(state.n200, 20);
        assert_eq!(state.n320, 675);
        assert_eq!(state.total_hits(), 800);
    }

    #[test]
    fn passed_objects_limit_hits() {
        let state = ManiaPerformance::new(attrs())
            .passed_objects(100)
            .misses(500)
            .generate_state()
            .unwrap();

        assert_eq!(state.total_hits(), 100);
        assert_eq!(state.misses, 100);
    }

    #[test]
    fn worse_accuracy_less_pp() {
        let full = ManiaPerformance::new(attrs()).calculate().unwrap();
        let worse = ManiaPerformance::new(attrs()).accuracy(95.0).calculate().unwrap();

        assert!(full.pp > worse.pp);
        assert!(worse.pp > 0.0);
    }
}
