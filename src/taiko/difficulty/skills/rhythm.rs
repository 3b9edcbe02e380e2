use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{
            difficulty_value, strain_decay, StrainSections, StrainSkill, DEFAULT_DECAY_WEIGHT,
        },
    },
    taiko::difficulty::{object::TaikoDifficultyObject, rhythm::HitObjectRhythm},
    util::limited_queue::LimitedQueue,
};

const SKILL_MULTIPLIER: f64 = 10.0;
const STRAIN_DECAY_BASE: f64 = 0.0;

const STRAIN_DECAY: f64 = 0.96;
const HISTORY_MAX_LEN: usize = 8;

/// Changes in rhythm, penalized when they repeat.
#[derive(Clone, Debug)]
pub struct Rhythm {
    /// Decaying strain across sections.
    curr_decay_strain: f64,
    /// Strain of the current rhythm changes.
    curr_strain: f64,
    notes_since_rhythm_change: usize,
    history: LimitedQueue<HistoryElement, HISTORY_MAX_LEN>,
    sections: StrainSections,
}

impl Rhythm {
    pub fn new() -> Self {
        Self {
            curr_decay_strain: 0.0,
            curr_strain: 0.0,
            notes_since_rhythm_change: 0,
            history: LimitedQueue::new(),
            sections: StrainSections::default(),
        }
    }

    fn reset_rhythm_and_strain(&mut self) {
        self.curr_strain = 0.0;
        self.notes_since_rhythm_change = 0;
    }

    fn strain_value_of(&mut self, curr: &TaikoDifficultyObject) -> f64 {
        // drum rolls and swells are exempt
        if !curr.is_hit() {
            self.reset_rhythm_and_strain();

            return 0.0;
        }

        self.curr_strain *= STRAIN_DECAY;
        self.notes_since_rhythm_change += 1;

        if curr.rhythm.is_constant() {
            return 0.0;
        }

        let mut obj_strain = curr.rhythm.difficulty;

        obj_strain *= self.repetition_penalties(curr);
        obj_strain *= pattern_len_penalty(self.notes_since_rhythm_change);
        obj_strain *= self.speed_penalty(curr.delta_time);

        // the penalties above read this
        self.notes_since_rhythm_change = 0;

        self.curr_strain += obj_strain;

        self.curr_strain
    }

    fn repetition_penalties(&mut self, curr: &TaikoDifficultyObject) -> f64 {
        let mut penalty = 1.0;

        self.history.push(HistoryElement {
            idx: curr.idx,
            rhythm: curr.rhythm,
        });

        for most_recent_patterns_to_compare in 2..=(HISTORY_MAX_LEN / 2).min(self.history.len()) {
            for start in (0..self.history.len() - most_recent_patterns_to_compare).rev() {
                if !self.same_pattern(start, most_recent_patterns_to_compare) {
                    continue;
                }

                let notes_since = curr.idx - self.history[start].idx;
                penalty *= repetition_penalty(notes_since);

                break;
            }
        }

        penalty
    }

    fn same_pattern(&self, start: usize, most_recent_patterns_to_compare: usize) -> bool {
        let recent = self
            .history
            .iter()
            .skip(self.history.len() - most_recent_patterns_to_compare);

        self.history
            .iter()
            .skip(start)
            .zip(recent)
            .all(|(a, b)| a.rhythm == b.rhythm)
    }

    fn speed_penalty(&mut self, delta_time: f64) -> f64 {
        if delta_time < 80.0 {
            return 1.0;
        } else if delta_time < 210.0 {
            return (1.4 - 0.005 * delta_time).max(0.0);
        }

        self.reset_rhythm_and_strain();

        0.0
    }

    pub fn difficulty_value(&self) -> f64 {
        difficulty_value(self.sections.peaks(), DEFAULT_DECAY_WEIGHT)
    }

    pub fn peaks(&self) -> Vec<f64> {
        self.sections.peaks()
    }
}

impl StrainSkill<TaikoDifficultyObject> for Rhythm {
    fn sections(&self) -> &StrainSections {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &TaikoDifficultyObject,
        objects: &[TaikoDifficultyObject],
    ) -> f64 {
        let prev_start_time = curr
            .previous(0, objects)
            .map_or(0.0, IDifficultyObject::start_time);

        self.curr_decay_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &TaikoDifficultyObject,
        _: &[TaikoDifficultyObject],
    ) -> f64 {
        self.curr_decay_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_decay_strain += self.strain_value_of(curr) * SKILL_MULTIPLIER;

        self.curr_decay_strain
    }
}

#[derive(Copy, Clone, Debug)]
struct HistoryElement {
    idx: usize,
    rhythm: &'static HitObjectRhythm,
}

impl Default for HistoryElement {
    fn default() -> Self {
        Self {
            idx: 0,
            rhythm: HitObjectRhythm::constant(),
        }
    }
}

fn repetition_penalty(notes_since: usize) -> f64 {
    (0.032 * notes_since as f64).min(1.0)
}

fn pattern_len_penalty(pattern_len: usize) -> f64 {
    let pattern_len = pattern_len as f64;
    let short_pattern_penalty = (0.15 * pattern_len).min(1.0);
    let long_pattern_penalty = (2.5 - 0.15 * pattern_len).clamp(0.0, 1.0);

    short_pattern_penalty.min(long_pattern_penalty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_len_penalties() {
        assert!((pattern_len_penalty(1) - 0.15).abs() < 1e-12);
        assert!((pattern_len_penalty(8) - 1.0).abs() < 1e-12);
        assert!(pattern_len_penalty(20).abs() < 1e-12);
    }

    #[test]
    fn slow_changes_reset() {
        let mut rhythm = Rhythm::new();
        rhythm.curr_strain = 5.0;
        rhythm.notes_since_rhythm_change = 3;

        assert!(rhythm.speed_penalty(300.0).abs() < f64::EPSILON);
        assert!(rhythm.curr_strain.abs() < f64::EPSILON);
        assert_eq!(rhythm.notes_since_rhythm_change, 0);
        assert!((rhythm.speed_penalty(50.0) - 1.0).abs() < f64::EPSILON);
    }
}
