use crate::{
    any::difficulty::skills::{difficulty_value, DEFAULT_DECAY_WEIGHT},
    util::difficulty::lerp,
};

/// Amount of top peaks that are scaled down.
pub const REDUCED_SECTION_COUNT: usize = 10;
const REDUCED_STRAIN_BASELINE: f64 = 0.75;

/// Scale the hardest `reduced_section_count` peaks down, weakening the
/// impact of a few outlier sections, then take the weighted sum.
pub fn reduced_difficulty_value(mut peaks: Vec<f64>, reduced_section_count: usize) -> f64 {
    peaks.retain(|&peak| peak > 0.0);
    peaks.sort_unstable_by(|a, b| b.total_cmp(a));

    for (i, strain) in peaks.iter_mut().take(reduced_section_count).enumerate() {
        let clamped = f64::from((i as f32 / reduced_section_count as f32).clamp(0.0, 1.0));
        let scale = f64::log10(lerp(1.0, 10.0, clamped));
        *strain *= lerp(REDUCED_STRAIN_BASELINE, 1.0, scale);
    }

    difficulty_value(peaks, DEFAULT_DECAY_WEIGHT)
}

/// Performance of a star rating of a single skill.
pub fn difficulty_to_performance(difficulty: f64) -> f64 {
    f64::powf(5.0 * f64::max(1.0, difficulty / 0.0675) - 4.0, 3.0) / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_peak_is_reduced() {
        let plain = difficulty_value(vec![10.0], DEFAULT_DECAY_WEIGHT);
        let reduced = reduced_difficulty_value(vec![10.0], REDUCED_SECTION_COUNT);

        assert!((plain - 10.0).abs() < 1e-12);
        assert!((reduced - 7.5).abs() < 1e-12);
    }

    #[test]
    fn peaks_past_the_reduced_ones_stay() {
        let peaks = vec![1.0; 20];
        let reduced = reduced_difficulty_value(peaks.clone(), 5);

        assert!(reduced < difficulty_value(peaks, DEFAULT_DECAY_WEIGHT));
        assert!(reduced > 0.0);
    }

    #[test]
    fn performance_floor() {
        assert!((difficulty_to_performance(0.0) - 1e-5).abs() < 1e-12);
    }
}
