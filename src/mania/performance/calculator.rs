use crate::{
    mania::{
        attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
        score_state::ManiaScoreState,
    },
    model::mods::GameMods,
};

pub(super) struct ManiaPerformanceCalculator {
    attrs: ManiaDifficultyAttributes,
    mods: GameMods,
    state: ManiaScoreState,
}

impl ManiaPerformanceCalculator {
    pub const fn new(attrs: ManiaDifficultyAttributes, mods: GameMods, state: ManiaScoreState) -> Self {
        Self { attrs, mods, state }
    }

    pub fn calculate(self) -> ManiaPerformanceAttributes {
        if self.state.total_hits() == 0 {
            return ManiaPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let mut multiplier = 1.0;

        if self.mods.nf() {
            multiplier *= 0.75;
        }

        if self.mods.ez() {
            multiplier *= 0.5;
        }

        let difficulty_value = self.compute_difficulty_value();

        ManiaPerformanceAttributes {
            difficulty: self.attrs,
            pp: difficulty_value * multiplier,
            pp_difficulty: difficulty_value,
        }
    }

    fn compute_difficulty_value(&self) -> f64 {
        let total_hits = f64::from(self.state.total_hits());

        // Star rating curve
        let mut value = 8.0 * (self.attrs.stars - 0.15).max(0.05).powf(2.2);

        // Nothing below 80% accuracy, linear up to 100%
        value *= (5.0 * self.custom_accuracy() - 4.0).max(0.0);

        // Length bonus capped at 1500 notes
        value *= 1.0 + 0.1 * (total_hits / 1500.0).min(1.0);

        value
    }

    /// Accuracy where 320s are worth slightly more than 300s.
    fn custom_accuracy(&self) -> f64 {
        let ManiaScoreState {
            n320,
            n300,
            n200,
            n100,
            n50,
            misses: _,
        } = self.state;

        let total_hits = self.state.total_hits();

        if total_hits == 0 {
            return 0.0;
        }

        let numerator = 32 * n320 + 30 * n300 + 20 * n200 + 10 * n100 + 5 * n50;

        f64::from(numerator) / f64::from(32 * total_hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> ManiaDifficultyAttributes {
        ManiaDifficultyAttributes {
            stars: 3.0,
            n_objects: 1000,
            max_combo: 1200,
            ..Default::default()
        }
    }

    fn state(n320: u32, n300: u32, misses: u32) -> ManiaScoreState {
        ManiaScoreState {
            n320,
            n300,
            misses,
            ..ManiaScoreState::new()
        }
    }

    #[test]
    fn perfect_play() {
        let attrs = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, state(1000, 0, 0))
            .calculate();

        let expected = 8.0 * 2.85_f64.powf(2.2) * (1.0 + 0.1 * (1000.0 / 1500.0));

        assert!((attrs.pp - expected).abs() < 1e-9, "{} != {expected}", attrs.pp);
        assert!((attrs.pp - attrs.pp_difficulty).abs() < f64::EPSILON);
    }

    #[test]
    fn greats_are_worth_less_than_perfects() {
        let perfect = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, state(1000, 0, 0))
            .calculate();
        let great = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, state(0, 1000, 0))
            .calculate();

        assert!(great.pp < perfect.pp);
        assert!(great.pp > 0.0);
    }

    #[test]
    fn low_accuracy_gives_nothing() {
        let attrs = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, state(700, 0, 300))
            .calculate();

        assert!(attrs.pp.abs() < f64::EPSILON);
    }

    #[test]
    fn mod_multipliers() {
        let nm = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, state(1000, 0, 0))
            .calculate();
        let nf = ManiaPerformanceCalculator::new(attrs(), GameMods::NF, state(1000, 0, 0))
            .calculate();
        let ez = ManiaPerformanceCalculator::new(attrs(), GameMods::EZ, state(1000, 0, 0))
            .calculate();

        assert!((nf.pp - nm.pp * 0.75).abs() < 1e-9);
        assert!((ez.pp - nm.pp * 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_hits_no_pp() {
        let attrs = ManiaPerformanceCalculator::new(attrs(), GameMods::NM, ManiaScoreState::new())
            .calculate();

        assert!(attrs.pp.abs() < f64::EPSILON);
        assert!((attrs.difficulty.stars - 3.0).abs() < f64::EPSILON);
    }
}
