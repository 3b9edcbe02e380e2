use crate::{
    any::{
        difficulty::Difficulty,
        performance::{fill_judgements, performance_builder, HitResultPriority},
    },
    util::map_or_attrs::MapOrAttrs,
    CalculateError,
};

use self::calculator::TaikoPerformanceCalculator;

use super::{
    attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    score_state::TaikoScoreState,
    Taiko,
};

mod calculator;

pub const PERFORMANCE_BASE_MULTIPLIER: f64 = 1.13;

/// Points of a 300 and a 100 relative to each other.
const JUDGEMENT_WEIGHTS: [f64; 2] = [2.0, 1.0];

/// Performance calculator on osu!taiko maps.
///
/// ```
/// use beatmap_pp::{taiko::TaikoPerformance, Beatmap};
///
/// let map: Beatmap = "osu file format v14\n\n[General]\nMode: 1\n\n[HitObjects]\n\
///     256,192,0,1,0\n256,192,200,1,8\n256,192,400,1,0\n256,192,600,1,8"
///     .parse()
///     .unwrap();
///
/// let attrs = TaikoPerformance::new(&map)
///     .accuracy(90.0)
///     .misses(1)
///     .calculate()
///     .unwrap();
///
/// assert!(attrs.pp >= 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct TaikoPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, Taiko>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,
    pub(crate) n300: Option<u32>,
    pub(crate) n100: Option<u32>,
    pub(crate) misses: Option<u32>,
    pub(crate) hitresult_priority: HitResultPriority,
}

performance_builder! {
    TaikoPerformance: TaikoDifficultyAttributes, TaikoPerformanceAttributes, TaikoScoreState {
        combo: max_combo,
        n300: n300,
        n100: n100,
        misses: misses,
    }
}

impl<'map> TaikoPerformance<'map> {
    /// Start from a [`Beatmap`](crate::Beatmap) or from attributes of a
    /// previous calculation on the same map and [`Difficulty`] settings.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Taiko>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            n300: None,
            n100: None,
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

    /// Create the [`TaikoScoreState`] that will be used for performance
    /// calculation.
    pub fn generate_state(&mut self) -> Result<TaikoScoreState, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;

        Ok(self.state_for(&attrs))
    }

    /// Only hits are judged, drum rolls and swells are not.
    fn state_for(&self, attrs: &TaikoDifficultyAttributes) -> TaikoScoreState {
        let n_hits = attrs.max_combo;

        let misses = self.misses.map_or(0, |n| n.min(n_hits));
        let n_remaining = n_hits - misses;

        let target_points = self
            .acc
            .map(|acc| acc * JUDGEMENT_WEIGHTS[0] * f64::from(n_hits));

        let [n300, n100] = fill_judgements(
            [self.n300, self.n100],
            JUDGEMENT_WEIGHTS,
            n_remaining,
            target_points,
            self.hitresult_priority,
        );

        let max_possible_combo = n_hits - misses;

        let max_combo = self
            .combo
            .map_or(max_possible_combo, |combo| combo.min(max_possible_combo));

        TaikoScoreState {
            max_combo,
            n300,
            n100,
            misses,
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> Result<TaikoPerformanceAttributes, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;
        let state = self.state_for(&attrs);

        let calculator = TaikoPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state);

        Ok(calculator.calculate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> TaikoDifficultyAttributes {
        TaikoDifficultyAttributes {
            stars: 4.5,
            great_hit_window: 35.0,
            max_combo: 500,
            n_objects: 520,
            ..Default::default()
        }
    }

    #[test]
    fn best_case_default() {
        let state = TaikoPerformance::new(attrs()).generate_state().unwrap();

        assert_eq!(
            state,
            TaikoScoreState {
                max_combo: 500,
                n300: 500,
                n100: 0,
                misses: 0,
            }
        );
    }

    #[test]
    fn accuracy_is_approached() {
        let state = TaikoPerformance::new(attrs())
            .accuracy(96.0)
            .misses(2)
            .generate_state()
            .unwrap();

        assert_eq!(state.total_hits(), 500);
        assert_eq!(state.max_combo, 498);
        assert!((state.accuracy() - 0.96).abs() < 0.005, "{}", state.accuracy());
    }

    #[test]
    fn given_counts_are_kept() {
        let state = TaikoPerformance::new(attrs())
            .n100(30)
            .generate_state()
            .unwrap();

        assert_eq!((state.n300, state.n100), (470, 30));
    }

    #[test]
    fn worse_accuracy_less_pp() {
        let full = TaikoPerformance::new(attrs()).calculate().unwrap();
        let worse = TaikoPerformance::new(attrs()).accuracy(90.0).calculate().unwrap();

        assert!(full.pp > worse.pp);
    }
}
