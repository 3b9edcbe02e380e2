use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{
            difficulty_value, strain_decay, StrainSections, StrainSkill, DEFAULT_DECAY_WEIGHT,
        },
    },
    taiko::difficulty::object::{TaikoDifficultyObject, TaikoDifficultyObjects},
};

const SKILL_MULTIPLIER: f64 = 1.1;
const STRAIN_DECAY_BASE: f64 = 0.4;

/// Tapping speed, measured per key.
#[derive(Clone, Debug)]
pub struct Stamina<'a> {
    diff_objects: &'a TaikoDifficultyObjects,
    curr_strain: f64,
    sections: StrainSections,
}

impl<'a> Stamina<'a> {
    pub fn new(diff_objects: &'a TaikoDifficultyObjects) -> Self {
        Self {
            diff_objects,
            curr_strain: 0.0,
            sections: StrainSections::default(),
        }
    }

    pub fn difficulty_value(&self) -> f64 {
        difficulty_value(self.sections.peaks(), DEFAULT_DECAY_WEIGHT)
    }

    pub fn peaks(&self) -> Vec<f64> {
        self.sections.peaks()
    }

    fn strain_value_of(&self, curr: &TaikoDifficultyObject) -> f64 {
        if !curr.is_hit() {
            return 0.0;
        }

        // The same key was last pressed two notes of the same color ago
        self.diff_objects
            .previous_mono(curr, 1)
            .map_or(0.0, |key_prev| {
                0.5 + speed_bonus(curr.start_time - key_prev.start_time)
            })
    }
}

impl StrainSkill<TaikoDifficultyObject> for Stamina<'_> {
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

        self.curr_strain * strain_decay(time - prev_start_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &TaikoDifficultyObject,
        _: &[TaikoDifficultyObject],
    ) -> f64 {
        self.curr_strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.curr_strain += self.strain_value_of(curr) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

/// Capped at 600bpm 1/4, i.e. a 50ms key interval.
fn speed_bonus(interval: f64) -> f64 {
    30.0 / interval.max(50.0)
}

#[cfg(test)]
mod tests {
    use super::speed_bonus;

    #[test]
    fn speed_bonus_is_capped() {
        assert!((speed_bonus(10.0) - 0.6).abs() < 1e-12);
        assert!((speed_bonus(300.0) - 0.1).abs() < 1e-12);
    }
}
