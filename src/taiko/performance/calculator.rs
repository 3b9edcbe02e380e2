use crate::{
    model::mods::GameMods,
    taiko::{
        attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
        score_state::TaikoScoreState,
    },
};

use super::PERFORMANCE_BASE_MULTIPLIER;

pub(super) struct TaikoPerformanceCalculator {
    attrs: TaikoDifficultyAttributes,
    mods: GameMods,
    state: TaikoScoreState,
}

impl TaikoPerformanceCalculator {
    pub const fn new(attrs: TaikoDifficultyAttributes, mods: GameMods, state: TaikoScoreState) -> Self {
        Self { attrs, mods, state }
    }

    pub fn calculate(self) -> TaikoPerformanceAttributes {
        if self.state.total_hits() == 0 {
            return TaikoPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        // Misses weigh more on maps with fewer than 1000 successful hits
        let total_successful_hits = self.state.n300 + self.state.n100;

        let effective_miss_count = if total_successful_hits > 0 {
            (1000.0 / f64::from(total_successful_hits)).max(1.0) * f64::from(self.state.misses)
        } else {
            0.0
        };

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.hd() {
            multiplier *= 1.075;
        }

        if self.mods.ez() {
            multiplier *= 0.975;
        }

        let diff_value = self.compute_difficulty_value(effective_miss_count);
        let acc_value = self.compute_accuracy_value();

        let pp = (diff_value.powf(1.1) + acc_value.powf(1.1)).powf(1.0 / 1.1) * multiplier;

        TaikoPerformanceAttributes {
            difficulty: self.attrs,
            pp,
            pp_acc: acc_value,
            pp_difficulty: diff_value,
            effective_miss_count,
        }
    }

    fn compute_difficulty_value(&self, effective_miss_count: f64) -> f64 {
        let exp_base = 5.0 * (self.attrs.stars / 0.115).max(1.0) - 4.0;
        let mut diff_value = exp_base.powf(2.25) / 1150.0;

        let len_bonus = 1.0 + 0.1 * (self.total_hits() / 1500.0).min(1.0);
        diff_value *= len_bonus;

        diff_value *= 0.986_f64.powf(effective_miss_count);

        if self.mods.ez() {
            diff_value *= 0.985;
        }

        if self.mods.hd() {
            diff_value *= 1.025;
        }

        if self.mods.hr() {
            diff_value *= 1.05;
        }

        if self.mods.fl() {
            diff_value *= 1.05 * len_bonus;
        }

        diff_value * self.state.accuracy().powi(2)
    }

    fn compute_accuracy_value(&self) -> f64 {
        if self.attrs.great_hit_window <= 0.0 {
            return 0.0;
        }

        let mut acc_value = (60.0 / self.attrs.great_hit_window).powf(1.1)
            * self.state.accuracy().powi(8)
            * self.attrs.stars.powf(0.4)
            * 27.0;

        let len_bonus = (self.total_hits() / 1500.0).powf(0.3).min(1.15);
        acc_value *= len_bonus;

        // Slight HDFL bonus
        if self.mods.hd() && self.mods.fl() {
            acc_value *= (1.075 * len_bonus).max(1.075);
        }

        acc_value
    }

    fn total_hits(&self) -> f64 {
        f64::from(self.state.total_hits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> TaikoDifficultyAttributes {
        TaikoDifficultyAttributes {
            stars: 5.0,
            great_hit_window: 35.0,
            max_combo: 1000,
            n_objects: 1100,
            ..Default::default()
        }
    }

    fn state(n300: u32, n100: u32, misses: u32) -> TaikoScoreState {
        TaikoScoreState {
            max_combo: n300 + n100,
            n300,
            n100,
            misses,
        }
    }

    #[test]
    fn misses_weigh_more_on_short_maps() {
        let attrs = TaikoPerformanceCalculator::new(attrs(), GameMods::NM, state(495, 0, 5))
            .calculate();

        let expected = 1000.0 / 495.0 * 5.0;

        assert!((attrs.effective_miss_count - expected).abs() < 1e-9);
        assert!(attrs.effective_miss_count > 10.0);
    }

    #[test]
    fn accuracy_matters() {
        let full = TaikoPerformanceCalculator::new(attrs(), GameMods::NM, state(1000, 0, 0))
            .calculate();
        let worse = TaikoPerformanceCalculator::new(attrs(), GameMods::NM, state(900, 100, 0))
            .calculate();

        assert!(full.pp > worse.pp);
        assert!(full.pp_acc > worse.pp_acc);
    }

    #[test]
    fn hidden_gives_bonus() {
        let nm = TaikoPerformanceCalculator::new(attrs(), GameMods::NM, state(1000, 0, 0))
            .calculate();
        let hd = TaikoPerformanceCalculator::new(attrs(), GameMods::HD, state(1000, 0, 0))
            .calculate();

        assert!(hd.pp > nm.pp);
    }

    #[test]
    fn no_hits_no_pp() {
        let attrs = TaikoPerformanceCalculator::new(attrs(), GameMods::NM, TaikoScoreState::new())
            .calculate();

        assert!(attrs.pp.abs() < f64::EPSILON);
    }
}
