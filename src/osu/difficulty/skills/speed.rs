use std::{cmp, f64::consts::PI};

use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{count_top_weighted_strains, strain_decay, StrainSections, StrainSkill},
    },
    osu::difficulty::object::OsuDifficultyObject,
    util::difficulty::{bpm_to_milliseconds, logistic, milliseconds_to_bpm},
};

use super::strain::reduced_difficulty_value;

const SKILL_MULTIPLIER: f64 = 1.46;
const STRAIN_DECAY_BASE: f64 = 0.3;
const REDUCED_SECTION_COUNT: usize = 5;

/// Tapping speed, scaled by rhythm complexity.
#[derive(Clone, Debug)]
pub struct Speed {
    tap_strain: f64,
    rhythm: f64,
    hit_window: f64,
    autopilot: bool,
    sections: StrainSections,
}

impl Speed {
    pub fn new(hit_window: f64, autopilot: bool) -> Self {
        Self {
            tap_strain: 0.0,
            rhythm: 0.0,
            hit_window,
            autopilot,
            sections: StrainSections::default(),
        }
    }

    pub fn difficulty_value(&self) -> f64 {
        reduced_difficulty_value(self.sections.peaks(), REDUCED_SECTION_COUNT)
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(self.sections.object_strains(), difficulty_value)
    }

    /// Amount of notes that are about as hard to tap as the hardest one.
    pub fn relevant_note_count(&self) -> f64 {
        let strains = self.sections.object_strains();

        let Some(max) = strains.iter().copied().max_by(f64::total_cmp) else {
            return 0.0;
        };

        if max <= 0.0 {
            return 0.0;
        }

        strains
            .iter()
            .map(|strain| 1.0 / (1.0 + (6.0 - 12.0 * strain / max).exp()))
            .sum()
    }

    fn strain(&self) -> f64 {
        self.tap_strain * self.rhythm
    }
}

impl<'a> StrainSkill<OsuDifficultyObject<'a>> for Speed {
    fn sections(&self) -> &StrainSections {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        let last_time = curr
            .previous(0, objects)
            .map_or(0.0, IDifficultyObject::start_time);

        self.strain() * strain_decay(time - last_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        let tap = tap_difficulty(curr, objects, self.hit_window, self.autopilot);

        self.tap_strain *= strain_decay(curr.strain_time, STRAIN_DECAY_BASE);
        self.tap_strain += tap * SKILL_MULTIPLIER;
        self.rhythm = rhythm_complexity(curr, objects, self.hit_window);

        self.strain()
    }
}

/// Spacing up to which consecutive notes count as a stream.
const SINGLE_SPACING_THRESHOLD: f64 = OsuDifficultyObject::NORMALIZED_DIAMETER as f64 * 1.25;
/// Streams faster than this bpm at 1/4 receive a speed bonus.
const MIN_SPEED_BONUS_BPM: f64 = 200.0;
const SPEED_BALANCING_FACTOR: f64 = 40.0;
const DIST_MULTIPLIER: f64 = 0.9;

fn tap_difficulty(
    curr: &OsuDifficultyObject<'_>,
    objects: &[OsuDifficultyObject<'_>],
    hit_window: f64,
    autopilot: bool,
) -> f64 {
    if curr.base.is_spinner() {
        return 0.0;
    }

    let singletap = 1.0 - curr.doubletapness(curr.next(0, objects), hit_window);

    // Notes within the great window of each other are capped in speed
    let window_ratio = (curr.strain_time / hit_window / 0.93).clamp(0.92, 1.0);
    let strain_time = curr.strain_time / window_ratio;

    let speed_bonus = if milliseconds_to_bpm(strain_time, None) > MIN_SPEED_BONUS_BPM {
        let excess = bpm_to_milliseconds(MIN_SPEED_BONUS_BPM, None) - strain_time;

        0.75 * (excess / SPEED_BALANCING_FACTOR).powf(2.0)
    } else {
        0.0
    };

    let dist_bonus = if autopilot {
        0.0
    } else {
        let travel_dist = curr.previous(0, objects).map_or(0.0, |prev| prev.travel_dist);
        let dist = (travel_dist + curr.min_jump_dist).min(SINGLE_SPACING_THRESHOLD);

        (dist / SINGLE_SPACING_THRESHOLD).powf(3.95) * DIST_MULTIPLIER
    };

    (1.0 + speed_bonus + dist_bonus) * 1000.0 / strain_time * singletap
}

const HISTORY_TIME_MAX: f64 = 5000.0;
const HISTORY_OBJECTS_MAX: usize = 32;
const RHYTHM_OVERALL_MULTIPLIER: f64 = 0.95;
const RHYTHM_RATIO_MULTIPLIER: f64 = 12.0;

/// Multiplier of at least `1.0` for the rhythm changes in the recent past of
/// `curr`.
fn rhythm_complexity(
    curr: &OsuDifficultyObject<'_>,
    objects: &[OsuDifficultyObject<'_>],
    hit_window: f64,
) -> f64 {
    if curr.base.is_spinner() {
        return 0.0;
    }

    let n_history = cmp::min(curr.idx, HISTORY_OBJECTS_MAX);

    // How far back the rhythm is still relevant
    let oldest = (0..)
        .take_while(|&i| {
            i + 2 < n_history
                && curr
                    .previous(i, objects)
                    .is_some_and(|h| curr.start_time - h.start_time < HISTORY_TIME_MAX)
        })
        .count();

    let (Some(mut prev), Some(mut last)) =
        (curr.previous(oldest, objects), curr.previous(oldest + 1, objects))
    else {
        return 1.0;
    };

    let mut rhythm = RhythmState::new(hit_window);
    let mut complexity = 0.0;

    for i in (1..=oldest).rev() {
        let Some(obj) = curr.previous(i - 1, objects) else {
            break;
        };

        let time_decay = (HISTORY_TIME_MAX - (curr.start_time - obj.start_time)) / HISTORY_TIME_MAX;
        let note_decay = (n_history - i) as f64 / n_history as f64;

        let deltas = Deltas {
            curr: obj.strain_time,
            prev: prev.strain_time,
            last: last.strain_time,
        };

        complexity += rhythm.advance(obj, prev, &deltas) * note_decay.min(time_decay);

        last = prev;
        prev = obj;
    }

    (4.0 + complexity * RHYTHM_OVERALL_MULTIPLIER).sqrt() / 2.0
}

/// Strain times of three consecutive objects, `curr` being the latest.
struct Deltas {
    curr: f64,
    prev: f64,
    last: f64,
}

impl Deltas {
    /// Bonus for the change from `prev` to `curr`, lower when one is a
    /// multiple of the other or when they differ too much.
    fn change_ratio(&self, eps: f64) -> f64 {
        let Self { curr, prev, .. } = *self;

        let multiple = prev.min(curr) / prev.max(curr);
        let ratio = 1.0 + RHYTHM_RATIO_MULTIPLIER * (PI / multiple).sin().powf(2.0).min(0.5);

        let fraction = (prev / curr).max(curr / prev);
        let fraction_multiplier = (2.0 - fraction / 8.0).clamp(0.0, 1.0);

        let window_penalty = (((prev - curr).abs() - eps).max(0.0) / eps).min(1.0);

        window_penalty * ratio * fraction_multiplier
    }
}

/// Island tracking while walking through the rhythm history.
struct RhythmState {
    hit_window: f64,
    eps: f64,
    island: RhythmIsland,
    prev_island: RhythmIsland,
    // Equality has a tolerance so these can't live in a map
    seen: Vec<(RhythmIsland, usize)>,
    start_ratio: f64,
    in_island: bool,
}

impl RhythmState {
    fn new(hit_window: f64) -> Self {
        let eps = hit_window * 0.3;

        Self {
            hit_window,
            eps,
            island: RhythmIsland::new(eps),
            prev_island: RhythmIsland::new(eps),
            seen: Vec::new(),
            start_ratio: 0.0,
            in_island: false,
        }
    }

    /// Process `obj` and return the complexity it adds.
    fn advance(
        &mut self,
        obj: &OsuDifficultyObject<'_>,
        prev: &OsuDifficultyObject<'_>,
        deltas: &Deltas,
    ) -> f64 {
        let eps = self.eps;
        let mut ratio = deltas.change_ratio(eps);

        if !self.in_island {
            if deltas.prev > deltas.curr + eps {
                self.in_island = true;

                for h in [obj, prev] {
                    if h.base.is_slider() {
                        ratio *= 0.6;
                    }
                }

                self.start_ratio = ratio;
                self.island = RhythmIsland::with_delta(deltas.curr as i32, eps);
            }

            return 0.0;
        }

        if (deltas.prev - deltas.curr).abs() < eps {
            self.island.add_delta(deltas.curr as i32);

            return 0.0;
        }

        // Changing speed into or out of a slider is easy to acc
        if obj.base.is_slider() {
            ratio *= 0.125;
        }

        if prev.base.is_slider() {
            ratio *= 0.3;
        }

        if self.island.is_similar_polarity(&self.prev_island) {
            ratio *= 0.5;
        }

        // Second speed up in a row
        if deltas.last > deltas.prev + eps && deltas.prev > deltas.curr + eps {
            ratio *= 0.125;
        }

        if self.prev_island.delta_count == self.island.delta_count {
            ratio *= 0.5;
        }

        ratio *= self.repetition_factor();
        ratio *= 1.0 - 0.75 * prev.doubletapness(Some(obj), self.hit_window);

        let added = (ratio * self.start_ratio).sqrt();

        self.start_ratio = ratio;
        self.prev_island = self.island;

        if deltas.prev + eps < deltas.curr {
            self.in_island = false;
        }

        self.island = RhythmIsland::with_delta(deltas.curr as i32, eps);

        added
    }

    /// Penalty for islands that were seen before, growing with every
    /// consecutive repetition.
    fn repetition_factor(&mut self) -> f64 {
        let island = self.island;
        let repeated = self.prev_island == island;

        let seen = self
            .seen
            .iter_mut()
            .find(|(other, _)| *other == island)
            .filter(|(other, _)| !other.is_default());

        let Some((_, count)) = seen else {
            self.seen.push((island, 1));

            return 1.0;
        };

        if repeated {
            *count += 1;
        }

        let count = *count as f64;
        let power = logistic(f64::from(island.delta), 58.33, 0.24, Some(2.75));

        (3.0 / count).min(count.recip().powf(power))
    }
}

const MIN_DELTA_TIME: i32 = OsuDifficultyObject::MIN_DELTA_TIME as i32;

/// Consecutive notes that share about the same delta time.
#[derive(Copy, Clone, Debug)]
struct RhythmIsland {
    eps: f64,
    delta: i32,
    delta_count: i32,
}

impl RhythmIsland {
    const fn new(eps: f64) -> Self {
        Self {
            eps,
            delta: i32::MAX,
            delta_count: 0,
        }
    }

    fn with_delta(delta: i32, eps: f64) -> Self {
        Self {
            eps,
            delta: delta.max(MIN_DELTA_TIME),
            delta_count: 1,
        }
    }

    fn add_delta(&mut self, delta: i32) {
        if self.delta == i32::MAX {
            self.delta = delta.max(MIN_DELTA_TIME);
        }

        self.delta_count += 1;
    }

    const fn is_similar_polarity(&self, other: &Self) -> bool {
        self.delta_count % 2 == other.delta_count % 2
    }

    const fn is_default(&self) -> bool {
        self.delta == i32::MAX && self.delta_count == 0
    }
}

impl PartialEq for RhythmIsland {
    fn eq(&self, other: &Self) -> bool {
        let diff = self.delta.abs_diff(other.delta).min(i32::MAX as u32);

        f64::from(diff) < self.eps && self.delta_count == other.delta_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn islands_compare_with_tolerance() {
        let a = RhythmIsland::with_delta(100, 10.0);
        let b = RhythmIsland::with_delta(105, 10.0);
        let c = RhythmIsland::with_delta(120, 10.0);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(RhythmIsland::new(10.0).is_default());
    }

    #[test]
    fn constant_deltas_give_no_change_ratio() {
        let deltas = Deltas {
            curr: 100.0,
            prev: 100.0,
            last: 100.0,
        };

        assert!(deltas.change_ratio(15.0).abs() < f64::EPSILON);

        let deltas = Deltas {
            curr: 75.0,
            prev: 100.0,
            last: 100.0,
        };

        assert!(deltas.change_ratio(15.0) > 0.0);
    }
}
