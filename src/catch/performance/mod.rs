use std::cmp;

use crate::{
    any::{difficulty::Difficulty, performance::performance_builder},
    util::map_or_attrs::MapOrAttrs,
    CalculateError,
};

use self::calculator::CatchPerformanceCalculator;

use super::{
    attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    score_state::CatchScoreState,
    Catch,
};

mod calculator;

/// Performance calculator on osu!catch maps.
///
/// ```
/// use beatmap_pp::{catch::CatchPerformance, Beatmap};
///
/// let map: Beatmap = "osu file format v14\n\n[General]\nMode: 2\n\n[HitObjects]\n\
///     64,192,0,1,0\n448,192,300,1,0\n64,192,600,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = CatchPerformance::new(&map)
///     .misses(1)
///     .calculate()
///     .unwrap();
///
/// assert_eq!(attrs.difficulty.max_combo(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct CatchPerformance<'map> {
    pub(crate) map_or_attrs: MapOrAttrs<'map, Catch>,
    pub(crate) difficulty: Difficulty,
    pub(crate) acc: Option<f64>,
    pub(crate) combo: Option<u32>,
    pub(crate) fruits: Option<u32>,
    pub(crate) droplets: Option<u32>,
    pub(crate) tiny_droplets: Option<u32>,
    pub(crate) tiny_droplet_misses: Option<u32>,
    pub(crate) misses: Option<u32>,
}

performance_builder! {
    CatchPerformance: CatchDifficultyAttributes, CatchPerformanceAttributes, CatchScoreState {
        combo: max_combo,
        /// Caught fruits, the n300 of other modes.
        fruits: fruits,
        /// Caught droplets, i.e. n100.
        droplets: droplets,
        /// Caught tiny droplets, i.e. n50.
        tiny_droplets: tiny_droplets,
        /// Missed tiny droplets, i.e. `n_katu`. These do not break combo.
        tiny_droplet_misses: tiny_droplet_misses,
        /// Missed fruits and droplets.
        misses: misses,
    }
}

impl<'map> CatchPerformance<'map> {
    /// Start from a [`Beatmap`](crate::Beatmap) or from attributes of a
    /// previous calculation on the same map and [`Difficulty`] settings.
    pub fn new(map_or_attrs: impl Into<MapOrAttrs<'map, Catch>>) -> Self {
        Self {
            map_or_attrs: map_or_attrs.into(),
            difficulty: Difficulty::new(),
            acc: None,
            combo: None,
            fruits: None,
            droplets: None,
            tiny_droplets: None,
            tiny_droplet_misses: None,
            misses: None,
        }
    }

    /// Create the [`CatchScoreState`] that will be used for performance
    /// calculation.
    pub fn generate_state(&mut self) -> Result<CatchScoreState, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;

        Ok(self.state_for(&attrs))
    }

    fn state_for(&self, attrs: &CatchDifficultyAttributes) -> CatchScoreState {
        let n_combo_objects = attrs.max_combo();
        let misses = self.misses.map_or(0, |n| n.min(n_combo_objects));

        let max_possible_combo = n_combo_objects - misses;

        let max_combo = self
            .combo
            .map_or(max_possible_combo, |combo| combo.min(max_possible_combo));

        let (fruits, droplets) = self.fruits_and_droplets(attrs, misses);
        let (tiny_droplets, tiny_droplet_misses) =
            self.tiny_droplets_for(attrs, fruits, droplets, misses);

        CatchScoreState {
            max_combo,
            fruits,
            droplets,
            tiny_droplets,
            tiny_droplet_misses,
            misses,
        }
    }

    /// Misses are attributed to droplets before fruits unless the counts
    /// say otherwise.
    fn fruits_and_droplets(&self, attrs: &CatchDifficultyAttributes, misses: u32) -> (u32, u32) {
        let n_combo_objects = attrs.max_combo();
        let n_hits = n_combo_objects - misses;

        match (self.fruits, self.droplets) {
            (Some(fruits), Some(droplets)) => {
                let n_remaining = n_combo_objects
                    .saturating_sub(fruits.saturating_add(droplets).saturating_add(misses));

                let new_droplets =
                    cmp::min(n_remaining, attrs.n_droplets.saturating_sub(droplets));
                let droplets = droplets + new_droplets;
                let fruits = fruits + n_remaining - new_droplets;

                let max_fruits = n_combo_objects.saturating_sub(droplets.saturating_add(misses));
                let fruits = cmp::min(fruits, max_fruits);
                let droplets = cmp::min(droplets, n_hits - fruits);

                (fruits, droplets)
            }
            (Some(fruits), None) => {
                let droplets = attrs
                    .n_droplets
                    .saturating_sub(misses.saturating_sub(attrs.n_fruits.saturating_sub(fruits)));
                let droplets = cmp::min(droplets, n_hits);

                (n_hits - droplets, droplets)
            }
            (None, Some(droplets)) => {
                let fruits = attrs
                    .n_fruits
                    .saturating_sub(misses.saturating_sub(attrs.n_droplets.saturating_sub(droplets)));
                let fruits = cmp::min(fruits, n_hits);

                (fruits, n_hits - fruits)
            }
            (None, None) => {
                let droplets = attrs.n_droplets.saturating_sub(misses);
                let fruits = n_hits - droplets;

                (fruits, droplets)
            }
        }
    }

    /// Returns caught and missed tiny droplets.
    fn tiny_droplets_for(
        &self,
        attrs: &CatchDifficultyAttributes,
        fruits: u32,
        droplets: u32,
        misses: u32,
    ) -> (u32, u32) {
        let n_tiny = attrs.n_tiny_droplets;

        match (self.tiny_droplets, self.tiny_droplet_misses) {
            (Some(tiny), Some(tiny_misses)) if tiny.checked_add(tiny_misses) == Some(n_tiny) => (tiny, tiny_misses),
            (Some(tiny), Some(tiny_misses)) => match self.acc {
                Some(acc) => closest_tiny_droplets(attrs, acc, fruits, droplets, misses),
                None => {
                    let tiny_misses = cmp::min(tiny_misses, n_tiny);
                    let n_remaining = n_tiny.saturating_sub(tiny.saturating_add(tiny_misses));

                    (cmp::min(tiny + n_remaining, n_tiny - tiny_misses), tiny_misses)
                }
            },
            (Some(tiny), None) => {
                let tiny = cmp::min(tiny, n_tiny);

                (tiny, n_tiny - tiny)
            }
            (None, Some(tiny_misses)) => {
                let tiny_misses = cmp::min(tiny_misses, n_tiny);

                (n_tiny - tiny_misses, tiny_misses)
            }
            (None, None) => match self.acc {
                Some(acc) => closest_tiny_droplets(attrs, acc, fruits, droplets, misses),
                None => (n_tiny, 0),
            },
        }
    }

    /// Calculate all performance related values, including pp and stars.
    pub fn calculate(mut self) -> Result<CatchPerformanceAttributes, CalculateError> {
        let attrs = self.map_or_attrs.attributes(&self.difficulty)?;
        let state = self.state_for(&attrs);

        let calculator = CatchPerformanceCalculator::new(attrs, self.difficulty.get_mods(), state);

        Ok(calculator.calculate())
    }
}

/// The amount of caught tiny droplets whose accuracy is closest to `acc`.
fn closest_tiny_droplets(
    attrs: &CatchDifficultyAttributes,
    acc: f64,
    fruits: u32,
    droplets: u32,
    misses: u32,
) -> (u32, u32) {
    let n_tiny = attrs.n_tiny_droplets;
    let total = attrs.n_fruits + attrs.n_droplets + n_tiny;

    let raw_tiny = acc * f64::from(total) - f64::from(fruits + droplets);
    let min_tiny = cmp::min(n_tiny, raw_tiny.floor().max(0.0) as u32);
    let max_tiny = cmp::min(n_tiny, raw_tiny.ceil().max(0.0) as u32);

    let mut best = (n_tiny, 0);
    let mut best_dist = f64::INFINITY;

    for tiny in min_tiny..=max_tiny {
        let state = CatchScoreState {
            fruits,
            droplets,
            tiny_droplets: tiny,
            tiny_droplet_misses: n_tiny - tiny,
            misses,
            ..CatchScoreState::new()
        };

        let dist = (acc - state.accuracy()).abs();

        if dist < best_dist {
            best_dist = dist;
            best = (tiny, n_tiny - tiny);
        }
    }

    best
}
