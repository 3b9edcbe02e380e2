use crate::{
    any::difficulty::Difficulty,
    model::beatmap::Beatmap,
    taiko::{attributes::TaikoDifficultyAttributes, object::TaikoObject},
    util::log_trace,
};

use self::{object::TaikoDifficultyObjects, skills::peaks::Peaks};

mod color;
mod object;
mod rhythm;
mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 1.35;

/// Calculate the difficulty attributes of an osu!taiko map.
pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> TaikoDifficultyAttributes {
    let map_attrs = map.attributes().difficulty(difficulty).build();

    let taiko_objects: Vec<_> = map
        .hit_objects
        .iter()
        .zip(map.hit_sounds.iter())
        .take(difficulty.get_passed_objects())
        .map(|(h, sound)| TaikoObject::new(h, *sound))
        .collect();

    let mut attrs = TaikoDifficultyAttributes {
        great_hit_window: map_attrs.hit_windows.od,
        max_combo: taiko_objects.iter().filter(|h| h.is_hit()).count() as u32,
        n_objects: taiko_objects.len() as u32,
        is_convert: map.is_convert,
        ..Default::default()
    };

    let diff_objects = TaikoDifficultyObjects::new(&taiko_objects, map_attrs.clock_rate);

    if diff_objects.objects.is_empty() {
        return attrs;
    }

    let mut peaks = Peaks::new(&diff_objects);

    for curr in diff_objects.objects.iter() {
        peaks.process(curr, &diff_objects.objects);
    }

    eval(
        &mut attrs,
        peaks.color_difficulty_value(),
        peaks.rhythm_difficulty_value(),
        peaks.stamina_difficulty_value(),
        peaks.difficulty_value(),
    );

    log_trace!(
        "taiko difficulty: {:.4} stars, color {:.4}, rhythm {:.4}, stamina {:.4}",
        attrs.stars,
        attrs.color,
        attrs.rhythm,
        attrs.stamina
    );

    attrs
}

fn rescale(stars: f64) -> f64 {
    if stars < 0.0 {
        stars
    } else {
        10.43 * (stars / 8.0 + 1.0).ln()
    }
}

fn eval(
    attrs: &mut TaikoDifficultyAttributes,
    color_difficulty_value: f64,
    rhythm_difficulty_value: f64,
    stamina_difficulty_value: f64,
    peaks_difficulty_value: f64,
) {
    let color_rating = color_difficulty_value * DIFFICULTY_MULTIPLIER;
    let rhythm_rating = rhythm_difficulty_value * DIFFICULTY_MULTIPLIER;
    let stamina_rating = stamina_difficulty_value * DIFFICULTY_MULTIPLIER;
    let combined_rating = peaks_difficulty_value * DIFFICULTY_MULTIPLIER;

    let mut stars = rescale(combined_rating * 1.4);

    // Converts can often be played with multiple inputs per color
    if attrs.is_convert {
        stars *= 0.925;

        // Low color variance with high stamina invites it even more
        if color_rating < 2.0 && stamina_rating > 8.0 {
            stars *= 0.8;
        }
    }

    attrs.stamina = stamina_rating;
    attrs.rhythm = rhythm_rating;
    attrs.color = color_rating;
    attrs.peak = combined_rating;
    attrs.stars = stars;
}
