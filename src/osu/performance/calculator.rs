use crate::{
    model::mods::GameMods,
    osu::{
        attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
        difficulty::skills::strain::difficulty_to_performance,
        score_state::OsuScoreState,
    },
    util::float_ext::FloatExt,
};

use super::PERFORMANCE_BASE_MULTIPLIER;

pub(super) struct OsuPerformanceCalculator {
    attrs: OsuDifficultyAttributes,
    mods: GameMods,
    state: OsuScoreState,
    acc: f64,
    total_hits: f64,
    effective_misses: f64,
}

impl OsuPerformanceCalculator {
    pub fn new(attrs: OsuDifficultyAttributes, mods: GameMods, state: OsuScoreState) -> Self {
        Self {
            effective_misses: effective_misses(&attrs, &state),
            acc: state.accuracy(),
            total_hits: f64::from(state.total_hits()),
            attrs,
            mods,
            state,
        }
    }

    pub fn calculate(mut self) -> OsuPerformanceAttributes {
        if self.state.total_hits() == 0 {
            return OsuPerformanceAttributes {
                difficulty: self.attrs,
                ..Default::default()
            };
        }

        let mut multiplier = PERFORMANCE_BASE_MULTIPLIER;

        if self.mods.nf() {
            multiplier *= (1.0 - 0.02 * self.effective_misses).max(0.9);
        }

        if self.mods.so() {
            let spinner_share = f64::from(self.attrs.n_spinners) / self.total_hits;
            multiplier *= 1.0 - spinner_share.powf(0.85);
        }

        if self.mods.rx() {
            self.effective_misses = self.relax_misses();
        }

        let aim = self.aim_value();
        let speed = self.speed_value();
        let acc = self.accuracy_value();
        let flashlight = self.flashlight_value();

        let sum: f64 = [aim, speed, acc, flashlight]
            .iter()
            .map(|value| value.powf(1.1))
            .sum();

        OsuPerformanceAttributes {
            difficulty: self.attrs,
            pp: sum.powf(1.0 / 1.1) * multiplier,
            pp_acc: acc,
            pp_aim: aim,
            pp_flashlight: flashlight,
            pp_speed: speed,
            effective_miss_count: self.effective_misses,
        }
    }

    /// Without tapping, 100s and 50s are treated as combo breaks. Their weight
    /// vanishes at OD 13.33 where the great window closes.
    fn relax_misses(&self) -> f64 {
        let od = self.attrs.od;

        let (n100_weight, n50_weight) = if od > 0.0 {
            (1.0 - (od / 13.33).powf(1.8), 1.0 - (od / 13.33).powi(5))
        } else {
            (1.0, 1.0)
        };

        let breaks = f64::from(self.state.n100) * n100_weight
            + f64::from(self.state.n50) * n50_weight;

        (self.effective_misses + breaks).min(self.total_hits)
    }

    fn aim_value(&self) -> f64 {
        let len_bonus = length_bonus(self.total_hits);

        let mut value = difficulty_to_performance(self.attrs.aim) * len_bonus;

        value *= self.miss_penalty(self.effective_misses);
        value *= self.combo_scaling();

        let ar_factor = if self.mods.rx() {
            0.0
        } else if self.attrs.ar > 10.33 {
            0.3 * (self.attrs.ar - 10.33)
        } else if self.attrs.ar < 8.0 {
            0.05 * (8.0 - self.attrs.ar)
        } else {
            0.0
        };

        value *= 1.0 + ar_factor * len_bonus;
        value *= self.hidden_bonus();
        value *= self.slider_nerf();
        value *= self.acc;
        value *= 0.98 + self.attrs.od.powi(2) / 2500.0;

        value
    }

    /// Assumes that 15% of the sliders are hard to follow and that dropped
    /// slider ends are among the non-300 judgements.
    fn slider_nerf(&self) -> f64 {
        if self.attrs.n_sliders == 0 {
            return 1.0;
        }

        let hard_sliders = f64::from(self.attrs.n_sliders) * 0.15;

        let non_300s = self.state.n100 + self.state.n50 + self.state.misses;
        let combo_lost = self.attrs.max_combo.saturating_sub(self.state.max_combo);
        let dropped_ends = f64::from(non_300s.min(combo_lost)).clamp(0.0, hard_sliders);

        let slider_factor = self.attrs.slider_factor;

        (1.0 - slider_factor) * (1.0 - dropped_ends / hard_sliders).powi(3) + slider_factor
    }

    fn speed_value(&self) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        let len_bonus = length_bonus(self.total_hits);

        let mut value = difficulty_to_performance(self.attrs.speed) * len_bonus;

        value *= self.miss_penalty(self.effective_misses.powf(0.875));
        value *= self.combo_scaling();

        if self.attrs.ar > 10.33 {
            value *= 1.0 + 0.3 * (self.attrs.ar - 10.33) * len_bonus;
        }

        value *= self.hidden_bonus();

        let od = self.attrs.od;
        let acc = (self.acc + self.speed_note_accuracy()) / 2.0;

        value *= (0.95 + od * od / 750.0) * acc.powf((14.5 - od.max(8.0)) / 2.0);

        // Many 50s suggest doubletapping
        let n50 = f64::from(self.state.n50);
        let allowed_n50 = self.total_hits / 500.0;

        if n50 >= allowed_n50 {
            value *= 0.99_f64.powf(n50 - allowed_n50);
        }

        value
    }

    /// Accuracy on the notes relevant for speed, assuming the other notes
    /// took the best judgements.
    fn speed_note_accuracy(&self) -> f64 {
        let speed_notes = self.attrs.speed_note_count;

        if FloatExt::eq(speed_notes, 0.0) {
            return 0.0;
        }

        let mut others = self.total_hits - speed_notes;
        let mut relevant = [0.0; 3];

        for (n, count) in relevant.iter_mut().zip([self.state.n300, self.state.n100, self.state.n50]) {
            let count = f64::from(count);
            *n = (count - others).max(0.0);
            others = (others - count).max(0.0);
        }

        let [n300, n100, n50] = relevant;

        (n300 * 6.0 + n100 * 2.0 + n50) / (speed_notes * 6.0)
    }

    fn accuracy_value(&self) -> f64 {
        if self.mods.rx() {
            return 0.0;
        }

        let n_circles = self.attrs.n_circles;

        let mut value = 1.52163_f64.powf(self.attrs.od) * self.circle_accuracy().powi(24) * 2.83;

        // Keeping accuracy up is harder on long maps
        value *= (f64::from(n_circles) / 1000.0).powf(0.3).min(1.15);

        if self.mods.hd() {
            value *= 1.08;
        }

        if self.mods.fl() {
            value *= 1.02;
        }

        value
    }

    /// Accuracy on circles only, assuming every slider and spinner got a 300.
    fn circle_accuracy(&self) -> f64 {
        let n_circles = self.attrs.n_circles;

        if n_circles == 0 {
            return 0.0;
        }

        let non_circles = self.state.total_hits().saturating_sub(n_circles);

        let Some(circle_300s) = self.state.n300.checked_sub(non_circles) else {
            return 0.0;
        };

        let points = circle_300s * 6 + self.state.n100 * 2 + self.state.n50;

        f64::from(points) / f64::from(n_circles * 6)
    }

    fn flashlight_value(&self) -> f64 {
        if !self.mods.fl() {
            return 0.0;
        }

        let total_hits = self.total_hits;

        let mut value = self.attrs.flashlight.powi(2) * 25.0;

        value *= self.miss_penalty(self.effective_misses.powf(0.875));
        value *= self.combo_scaling();

        // Short maps spend more time with a small radius
        let mut len_factor = 0.7 + 0.1 * (total_hits / 200.0).min(1.0);

        if total_hits > 200.0 {
            len_factor += 0.2 * ((total_hits - 200.0) / 200.0).min(1.0);
        }

        value *= len_factor;
        value *= 0.5 + self.acc / 2.0;
        value *= 0.98 + self.attrs.od.powi(2) / 2500.0;

        value
    }

    /// At least 3% off for any miss, more the larger their share is.
    fn miss_penalty(&self, exponent: f64) -> f64 {
        if self.effective_misses <= 0.0 {
            return 1.0;
        }

        let share = self.effective_misses / self.total_hits;

        0.97 * (1.0 - share.powf(0.775)).powf(exponent)
    }

    fn hidden_bonus(&self) -> f64 {
        // Lower AR is harder to read with HD
        if self.mods.hd() {
            1.0 + 0.04 * (12.0 - self.attrs.ar)
        } else {
            1.0
        }
    }

    fn combo_scaling(&self) -> f64 {
        if self.attrs.max_combo == 0 {
            return 1.0;
        }

        let combo = f64::from(self.state.max_combo).powf(0.8);
        let max_combo = f64::from(self.attrs.max_combo).powf(0.8);

        (combo / max_combo).min(1.0)
    }
}

fn length_bonus(total_hits: f64) -> f64 {
    let bonus = 0.95 + 0.4 * (total_hits / 2000.0).min(1.0);

    if total_hits > 2000.0 {
        bonus + (total_hits / 2000.0).log10() * 0.5
    } else {
        bonus
    }
}

/// Misses plus the slider breaks that a low combo implies, capped by the
/// amount of non-300 judgements.
fn effective_misses(attrs: &OsuDifficultyAttributes, state: &OsuScoreState) -> f64 {
    let misses = f64::from(state.misses);

    if attrs.n_sliders == 0 {
        return misses;
    }

    let full_combo_threshold = f64::from(attrs.max_combo) - 0.1 * f64::from(attrs.n_sliders);

    if f64::from(state.max_combo) >= full_combo_threshold {
        return misses;
    }

    let non_300s = f64::from(state.n100 + state.n50 + state.misses);
    let combo_breaks = full_combo_threshold / f64::from(state.max_combo).max(1.0);

    combo_breaks.min(non_300s).max(misses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_misses_from_combo() {
        let attrs = OsuDifficultyAttributes {
            n_sliders: 10,
            max_combo: 100,
            ..Default::default()
        };

        let state = OsuScoreState {
            max_combo: 49,
            n300: 80,
            n100: 5,
            n50: 0,
            misses: 1,
        };

        // threshold 99, 99 / 49 ≈ 2.02, at most 6 breaks
        let misses = effective_misses(&attrs, &state);
        assert!((misses - 99.0 / 49.0).abs() < 1e-9, "{misses}");

        let full_combo = OsuScoreState {
            max_combo: 100,
            ..state
        };
        assert!((effective_misses(&attrs, &full_combo) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_bonus_grows() {
        assert!(length_bonus(100.0) < length_bonus(1000.0));
        assert!(length_bonus(2000.0) < length_bonus(4000.0));
    }

    #[test]
    fn speed_notes_take_the_worst_judgements() {
        let attrs = OsuDifficultyAttributes {
            speed_note_count: 10.0,
            n_circles: 100,
            max_combo: 100,
            ..Default::default()
        };

        let state = OsuScoreState {
            max_combo: 100,
            n300: 95,
            n100: 5,
            n50: 0,
            misses: 0,
        };

        let calc = OsuPerformanceCalculator::new(attrs, GameMods::NM, state);

        // 90 of the 300s go to other notes
        let expected = (5.0 * 6.0 + 5.0 * 2.0) / 60.0;
        assert!((calc.speed_note_accuracy() - expected).abs() < 1e-12);
    }
}
