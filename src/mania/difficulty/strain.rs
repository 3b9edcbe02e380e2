use crate::any::difficulty::{
    object::IDifficultyObject,
    skills::{difficulty_value, strain_decay, StrainSections, StrainSkill, DEFAULT_DECAY_WEIGHT},
};

use super::ManiaDifficultyObject;

const INDIVIDUAL_DECAY_BASE: f64 = 0.125;
const OVERALL_DECAY_BASE: f64 = 0.3;
const RELEASE_THRESHOLD: f64 = 30.0;

const SKILL_MULTIPLIER: f64 = 1.0;
const STRAIN_DECAY_BASE: f64 = 1.0;

/// Strain of each column on its own plus the strain of the whole keyboard.
#[derive(Clone, Debug)]
pub struct Strain {
    start_times: Box<[f64]>,
    end_times: Box<[f64]>,
    individual_strains: Box<[f64]>,
    individual_strain: f64,
    overall_strain: f64,
    curr_strain: f64,
    sections: StrainSections,
}

impl Strain {
    pub fn new(total_columns: usize) -> Self {
        Self {
            start_times: vec![0.0; total_columns].into_boxed_slice(),
            end_times: vec![0.0; total_columns].into_boxed_slice(),
            individual_strains: vec![0.0; total_columns].into_boxed_slice(),
            individual_strain: 0.0,
            overall_strain: 1.0,
            curr_strain: 0.0,
            sections: StrainSections::default(),
        }
    }

    pub fn difficulty_value(self) -> f64 {
        difficulty_value(self.sections.into_peaks(), DEFAULT_DECAY_WEIGHT)
    }

    fn strain_value_of(&mut self, curr: &ManiaDifficultyObject) -> f64 {
        let ManiaDifficultyObject {
            start_time,
            end_time,
            column,
            delta_time,
            ..
        } = *curr;

        let mut is_overlapping = false;

        // Lowest value possible with what's known so far
        let mut closest_end_time = (end_time - start_time).abs();

        // Applies to everything if something else is held
        let mut hold_factor = 1.0;

        // Awkward release of the current hold
        let mut hold_addition = 0.0;

        for (&prev_start, &prev_end) in self.start_times.iter().zip(self.end_times.iter()) {
            is_overlapping |= prev_end > start_time + 1.0
                && end_time > prev_end + 1.0
                && start_time > prev_start + 1.0;

            if prev_end > end_time + 1.0 && start_time > prev_start + 1.0 {
                hold_factor = 1.25;
            }

            closest_end_time = (end_time - prev_end).abs().min(closest_end_time);
        }

        // Releasing several notes at once is as easy as releasing one so the
        // addition drops off along a sigmoid once the closest release is
        // further away than the threshold
        if is_overlapping {
            hold_addition = (1.0 + (0.27 * (RELEASE_THRESHOLD - closest_end_time)).exp()).recip();
        }

        let column_strain = &mut self.individual_strains[column];
        *column_strain = apply_decay(
            *column_strain,
            start_time - self.start_times[column],
            INDIVIDUAL_DECAY_BASE,
        );
        *column_strain += 2.0 * hold_factor;

        // Chords take the hardest column
        self.individual_strain = if delta_time <= 1.0 {
            self.individual_strain.max(*column_strain)
        } else {
            *column_strain
        };

        self.overall_strain = apply_decay(self.overall_strain, delta_time, OVERALL_DECAY_BASE);
        self.overall_strain += (1.0 + hold_addition) * hold_factor;

        self.start_times[column] = start_time;
        self.end_times[column] = end_time;

        // Only the hardest object of each section counts
        self.individual_strain + self.overall_strain - self.curr_strain
    }
}

impl StrainSkill<ManiaDifficultyObject> for Strain {
    fn sections(&self) -> &StrainSections {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &ManiaDifficultyObject,
        objects: &[ManiaDifficultyObject],
    ) -> f64 {
        let prev_start_time = curr
            .previous(0, objects)
            .map_or(0.0, IDifficultyObject::start_time);

        let time = time - prev_start_time;

        apply_decay(self.individual_strain, time, INDIVIDUAL_DECAY_BASE)
            + apply_decay(self.overall_strain, time, OVERALL_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &ManiaDifficultyObject,
        _: &[ManiaDifficultyObject],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += self.strain_value_of(curr) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

fn apply_decay(value: f64, delta_time: f64, decay_base: f64) -> f64 {
    value * strain_decay(delta_time, decay_base)
}
