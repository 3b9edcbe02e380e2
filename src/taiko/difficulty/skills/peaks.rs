use crate::{
    any::difficulty::skills::{difficulty_value, StrainSkill, DEFAULT_DECAY_WEIGHT},
    taiko::difficulty::object::{TaikoDifficultyObject, TaikoDifficultyObjects},
};

use super::{color::Color, rhythm::Rhythm, stamina::Stamina};

const FINAL_MULTIPLIER: f64 = 0.0625;

const RHYTHM_SKILL_MULTIPLIER: f64 = 0.2 * FINAL_MULTIPLIER;
const COLOR_SKILL_MULTIPLIER: f64 = 0.375 * FINAL_MULTIPLIER;
const STAMINA_SKILL_MULTIPLIER: f64 = 0.375 * FINAL_MULTIPLIER;

/// All osu!taiko skills, combined section by section.
#[derive(Clone, Debug)]
pub struct Peaks<'a> {
    pub color: Color<'a>,
    pub rhythm: Rhythm,
    pub stamina: Stamina<'a>,
}

impl<'a> Peaks<'a> {
    pub fn new(diff_objects: &'a TaikoDifficultyObjects) -> Self {
        Self {
            color: Color::new(&diff_objects.colors),
            rhythm: Rhythm::new(),
            stamina: Stamina::new(diff_objects),
        }
    }

    pub fn process(&mut self, curr: &TaikoDifficultyObject, objects: &[TaikoDifficultyObject]) {
        self.rhythm.process(curr, objects);
        self.color.process(curr, objects);
        self.stamina.process(curr, objects);
    }

    pub fn color_difficulty_value(&self) -> f64 {
        self.color.difficulty_value() * COLOR_SKILL_MULTIPLIER
    }

    pub fn rhythm_difficulty_value(&self) -> f64 {
        self.rhythm.difficulty_value() * RHYTHM_SKILL_MULTIPLIER
    }

    pub fn stamina_difficulty_value(&self) -> f64 {
        self.stamina.difficulty_value() * STAMINA_SKILL_MULTIPLIER
    }

    /// Weighted sum of the combined section peaks.
    ///
    /// Color and stamina are combined with a 1.5-norm, the result and rhythm
    /// with a 2-norm.
    pub fn difficulty_value(&self) -> f64 {
        let color_peaks = self.color.peaks();
        let rhythm_peaks = self.rhythm.peaks();
        let stamina_peaks = self.stamina.peaks();

        let peaks = color_peaks
            .into_iter()
            .zip(rhythm_peaks)
            .zip(stamina_peaks)
            .map(|((color, rhythm), stamina)| {
                let color = color * COLOR_SKILL_MULTIPLIER;
                let rhythm = rhythm * RHYTHM_SKILL_MULTIPLIER;
                let stamina = stamina * STAMINA_SKILL_MULTIPLIER;

                norm(2.0, [norm(1.5, [color, stamina]), rhythm])
            })
            .collect();

        difficulty_value(peaks, DEFAULT_DECAY_WEIGHT)
    }
}

fn norm<const N: usize>(p: f64, values: [f64; N]) -> f64 {
    values
        .into_iter()
        .fold(0.0, |sum, x| sum + x.powf(p))
        .powf(p.recip())
}

#[cfg(test)]
mod tests {
    use super::norm;

    #[test]
    fn lp_norms() {
        assert!((norm(2.0, [3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert!((norm(1.5, [1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(norm(1.5, [0.0, 0.0]).abs() < f64::EPSILON);
    }
}
