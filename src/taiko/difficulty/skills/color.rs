use std::f64::consts::E;

use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{
            difficulty_value, strain_decay, StrainSections, StrainSkill, DEFAULT_DECAY_WEIGHT,
        },
    },
    taiko::difficulty::{color::ColorEncodings, object::TaikoDifficultyObject},
};

const SKILL_MULTIPLIER: f64 = 0.12;
const STRAIN_DECAY_BASE: f64 = 0.8;

/// Changes between center and rim hits.
#[derive(Clone, Debug)]
pub struct Color<'a> {
    colors: &'a ColorEncodings,
    curr_strain: f64,
    sections: StrainSections,
}

impl<'a> Color<'a> {
    pub fn new(colors: &'a ColorEncodings) -> Self {
        Self {
            colors,
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
}

impl StrainSkill<TaikoDifficultyObject> for Color<'_> {
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
        self.curr_strain += evaluate_difficulty_of(curr, self.colors) * SKILL_MULTIPLIER;

        self.curr_strain
    }
}

fn sigmoid(val: f64, center: f64, width: f64, middle: f64, height: f64) -> f64 {
    let sigmoid = (E * -(val - center) / width).tanh();

    sigmoid * (height / 2.0) + middle
}

fn evaluate_mono_streak(colors: &ColorEncodings, idx: usize) -> f64 {
    let streak = &colors.mono_streaks[idx];

    sigmoid(streak.idx as f64, 2.0, 2.0, 0.5, 1.0)
        * evaluate_alternating_mono_pattern(colors, streak.parent)
        * 0.5
}

fn evaluate_alternating_mono_pattern(colors: &ColorEncodings, idx: usize) -> f64 {
    let pattern = &colors.alternating_mono_patterns[idx];

    sigmoid(pattern.idx as f64, 2.0, 2.0, 0.5, 1.0)
        * evaluate_repeating_hit_patterns(colors, pattern.parent)
}

fn evaluate_repeating_hit_patterns(colors: &ColorEncodings, idx: usize) -> f64 {
    let interval = colors.repeating_hit_patterns[idx].repetition_interval as f64;

    2.0 * (1.0 - sigmoid(interval, 2.0, 2.0, 0.5, 1.0))
}

/// Only the first hit of an encoding is rewarded for it.
fn evaluate_difficulty_of(curr: &TaikoDifficultyObject, colors: &ColorEncodings) -> f64 {
    let color = &curr.color;
    let mut difficulty = 0.0;

    if let Some(idx) = color.mono_streak {
        difficulty += evaluate_mono_streak(colors, idx);
    }

    if let Some(idx) = color.alternating_mono_pattern {
        difficulty += evaluate_alternating_mono_pattern(colors, idx);
    }

    if let Some(idx) = color.repeating_hit_patterns {
        difficulty += evaluate_repeating_hit_patterns(colors, idx);
    }

    difficulty
}

#[cfg(test)]
mod tests {
    use crate::taiko::difficulty::color::RepeatingHitPatterns;

    use super::*;

    #[test]
    fn sigmoid_is_centered() {
        assert!((sigmoid(2.0, 2.0, 2.0, 0.5, 1.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(0.0, 2.0, 2.0, 0.5, 1.0) > 0.9);
        assert!(sigmoid(20.0, 2.0, 2.0, 0.5, 1.0) < 0.01);
    }

    #[test]
    fn fresh_patterns_are_harder() {
        let colors = ColorEncodings {
            repeating_hit_patterns: vec![
                RepeatingHitPatterns {
                    alternating_mono_patterns: 0..0,
                    repetition_interval: 1,
                },
                RepeatingHitPatterns {
                    alternating_mono_patterns: 0..0,
                    repetition_interval: 17,
                },
            ],
            ..Default::default()
        };

        assert!(
            evaluate_repeating_hit_patterns(&colors, 1) > evaluate_repeating_hit_patterns(&colors, 0)
        );
    }
}
