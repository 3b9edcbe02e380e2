use crate::util::{float_ext::FloatExt, hint::unlikely};

use super::object::IDifficultyObject;

/// Per-rank weight of the sorted section peaks.
pub const DEFAULT_DECAY_WEIGHT: f64 = 0.9;

/// Length of a strain section in milliseconds.
pub const DEFAULT_SECTION_LEN: f64 = 400.0;

/// `base^(ms / 1000)`
pub fn strain_decay(ms: f64, strain_decay_base: f64) -> f64 {
    f64::powf(strain_decay_base, ms / 1000.0)
}

/// Weighted sum of the highest section peaks.
///
/// Peaks are sorted descendingly and the `i`-th peak is weighted with
/// `decay_weight^i`. Sections without strain don't contribute.
pub fn difficulty_value(mut peaks: Vec<f64>, decay_weight: f64) -> f64 {
    peaks.retain(|&peak| peak > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    let mut difficulty = 0.0;
    let mut weight = 1.0;

    for peak in peaks {
        difficulty += peak * weight;
        weight *= decay_weight;
    }

    difficulty
}

/// Amount of strains that are about as difficult as the hardest ones.
pub fn count_top_weighted_strains(object_strains: &[f64], difficulty_value: f64) -> f64 {
    if unlikely(object_strains.is_empty()) {
        return 0.0;
    }

    // Top strain if all strains were identical
    let consistent_top_strain = difficulty_value / 10.0;

    if unlikely(FloatExt::eq(consistent_top_strain, 0.0)) {
        return object_strains.len() as f64;
    }

    object_strains
        .iter()
        .map(|s| 1.1 / (1.0 + f64::exp(-10.0 * (s / consistent_top_strain - 0.88))))
        .sum()
}

/// Bookkeeping of strain sections.
#[derive(Clone, Debug)]
pub struct StrainSections {
    section_len: f64,
    curr_section_peak: f64,
    curr_section_end: f64,
    peaks: Vec<f64>,
    object_strains: Vec<f64>,
}

impl StrainSections {
    pub fn new(section_len: f64) -> Self {
        Self {
            section_len,
            curr_section_peak: 0.0,
            curr_section_end: 0.0,
            peaks: Vec::new(),
            object_strains: Vec::new(),
        }
    }

    /// Align the first section with the time of the first object.
    fn start(&mut self, time: f64) {
        self.curr_section_end = (time / self.section_len).ceil() * self.section_len;
    }

    /// The end of the current section if `time` lies beyond it.
    fn passed_section_end(&self, time: f64) -> Option<f64> {
        (time > self.curr_section_end).then_some(self.curr_section_end)
    }

    fn start_new_section(&mut self, initial_strain: f64) {
        self.peaks.push(self.curr_section_peak);
        self.curr_section_peak = initial_strain;
        self.curr_section_end += self.section_len;
    }

    fn record(&mut self, strain: f64) {
        self.curr_section_peak = self.curr_section_peak.max(strain);
        self.object_strains.push(strain);
    }

    /// All section peaks including the current one.
    pub fn peaks(&self) -> Vec<f64> {
        let mut peaks = Vec::with_capacity(self.peaks.len() + 1);
        peaks.extend_from_slice(&self.peaks);
        peaks.push(self.curr_section_peak);

        peaks
    }

    pub fn into_peaks(mut self) -> Vec<f64> {
        self.peaks.push(self.curr_section_peak);

        self.peaks
    }

    /// The strain of each processed object.
    pub fn object_strains(&self) -> &[f64] {
        &self.object_strains
    }
}

impl Default for StrainSections {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_LEN)
    }
}

/// A skill whose strain decays over time and peaks per section.
pub trait StrainSkill<O: IDifficultyObject> {
    fn sections(&self) -> &StrainSections;

    fn sections_mut(&mut self) -> &mut StrainSections;

    /// The strain at `time` right before `curr` is processed.
    fn initial_strain(&self, time: f64, curr: &O, objects: &[O]) -> f64;

    /// Update the strain with `curr` and return it.
    fn strain_value_at(&mut self, curr: &O, objects: &[O]) -> f64;

    fn process(&mut self, curr: &O, objects: &[O]) {
        let time = curr.start_time();

        if curr.idx() == 0 {
            self.sections_mut().start(time);
        }

        while let Some(section_end) = self.sections().passed_section_end(time) {
            let initial_strain = self.initial_strain(section_end, curr, objects);
            self.sections_mut().start_new_section(initial_strain);
        }

        let strain = self.strain_value_at(curr, objects);
        self.sections_mut().record(strain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_of_sorted_peaks() {
        let value = difficulty_value(vec![1.0, 0.0, 3.0, 2.0], 0.5);

        assert!((value - (3.0 + 2.0 * 0.5 + 1.0 * 0.25)).abs() < 1e-12);
    }

    #[test]
    fn no_peaks_no_difficulty() {
        assert!(difficulty_value(Vec::new(), DEFAULT_DECAY_WEIGHT).abs() < f64::EPSILON);
        assert!(difficulty_value(vec![0.0; 8], DEFAULT_DECAY_WEIGHT).abs() < f64::EPSILON);
    }

    #[test]
    fn top_weighted_strains() {
        assert!(count_top_weighted_strains(&[], 5.0).abs() < f64::EPSILON);
        assert!((count_top_weighted_strains(&[1.0, 2.0], 0.0) - 2.0).abs() < f64::EPSILON);
    }

    struct Object {
        idx: usize,
        time: f64,
    }

    impl IDifficultyObject for Object {
        fn idx(&self) -> usize {
            self.idx
        }

        fn start_time(&self) -> f64 {
            self.time
        }
    }

    /// Every object adds one, nothing decays.
    struct Counter {
        strain: f64,
        sections: StrainSections,
    }

    impl StrainSkill<Object> for Counter {
        fn sections(&self) -> &StrainSections {
            &self.sections
        }

        fn sections_mut(&mut self) -> &mut StrainSections {
            &mut self.sections
        }

        fn initial_strain(&self, _: f64, _: &Object, _: &[Object]) -> f64 {
            self.strain
        }

        fn strain_value_at(&mut self, _: &Object, _: &[Object]) -> f64 {
            self.strain += 1.0;

            self.strain
        }
    }

    #[test]
    fn sections_split_by_time() {
        let objects: Vec<_> = [100.0, 200.0, 900.0, 1000.0]
            .into_iter()
            .enumerate()
            .map(|(idx, time)| Object { idx, time })
            .collect();

        let mut skill = Counter {
            strain: 0.0,
            sections: StrainSections::default(),
        };

        for object in objects.iter() {
            skill.process(object, &objects);
        }

        // sections end at 400, 800, 1200
        assert_eq!(skill.sections.peaks(), vec![2.0, 2.0, 4.0]);
        assert_eq!(skill.sections.object_strains(), &[1.0, 2.0, 3.0, 4.0]);
    }
}
