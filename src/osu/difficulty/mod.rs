use crate::{
    any::difficulty::Difficulty,
    model::{beatmap::Beatmap, mods::GameMods},
    osu::{
        attributes::OsuDifficultyAttributes,
        convert::convert_objects,
        object::OsuObject,
        performance::PERFORMANCE_BASE_MULTIPLIER,
    },
    util::log_trace,
};

use self::{
    object::OsuDifficultyObject,
    scaling_factor::ScalingFactor,
    skills::{strain::difficulty_to_performance, OsuSkillValues, OsuSkills},
};

pub mod object;
pub mod scaling_factor;
pub mod skills;

const DIFFICULTY_MULTIPLIER: f64 = 0.0675;

const HD_FADE_IN_DURATION_MULTIPLIER: f64 = 0.4;
const HD_FADE_OUT_DURATION_MULTIPLIER: f64 = 0.3;

/// Calculate the difficulty attributes of an osu!standard map.
pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> OsuDifficultyAttributes {
    let mods = difficulty.get_mods();
    let map_attrs = map.attributes().difficulty(difficulty).build();
    let scaling_factor = ScalingFactor::new(map_attrs.cs);

    // Preempt in gameplay time, rounded like the game does
    let time_preempt = f64::from((map_attrs.hit_windows.ar * map_attrs.clock_rate) as f32);

    let mut attrs = OsuDifficultyAttributes {
        ar: map_attrs.ar,
        od: map_attrs.od,
        hp: map_attrs.hp,
        great_hit_window: map_attrs.hit_windows.od,
        ..Default::default()
    };

    let mut objects = convert_objects(
        map,
        &scaling_factor,
        mods.hr(),
        time_preempt,
        difficulty.get_passed_objects(),
        &mut attrs,
    );

    if objects.is_empty() {
        return attrs;
    }

    for h in objects.iter_mut() {
        h.follow_lazy_cursor(scaling_factor.radius);
    }

    let diff_objects = difficulty_objects(&objects, map_attrs.clock_rate, &scaling_factor);
    let values = OsuSkills::new(mods, &scaling_factor, &map_attrs, time_preempt)
        .process_all(&diff_objects);

    rate(&mut attrs, mods, &values);

    log_trace!(
        "osu difficulty: {:.4} stars, aim {:.4}, speed {:.4}",
        attrs.stars,
        attrs.aim,
        attrs.speed
    );

    attrs
}

/// Turn the raw skill values into ratings and the star rating.
fn rate(attrs: &mut OsuDifficultyAttributes, mods: GameMods, values: &OsuSkillValues) {
    let rating = |value: f64| value.sqrt() * DIFFICULTY_MULTIPLIER;

    let mut aim = rating(values.aim);
    let mut speed = rating(values.speed);
    let mut flashlight = rating(values.flashlight);

    attrs.slider_factor = if aim > 0.0 {
        rating(values.aim_no_sliders) / aim
    } else {
        1.0
    };

    if mods.td() {
        aim = aim.powf(0.8);
        flashlight = flashlight.powf(0.8);
    }

    if mods.rx() {
        aim *= 0.9;
        speed = 0.0;
        flashlight *= 0.7;
    }

    let flashlight_performance = if mods.fl() {
        flashlight.powi(2) * 25.0
    } else {
        0.0
    };

    let performance: f64 = [
        difficulty_to_performance(aim),
        difficulty_to_performance(speed),
        flashlight_performance,
    ]
    .iter()
    .map(|value| value.powf(1.1))
    .sum::<f64>()
    .powf(1.0 / 1.1);

    attrs.stars = if performance > 0.00001 {
        PERFORMANCE_BASE_MULTIPLIER.cbrt()
            * 0.027
            * ((100_000.0 / 2.0_f64.powf(1.0 / 1.1) * performance).cbrt() + 4.0)
    } else {
        0.0
    };

    attrs.aim = aim;
    attrs.speed = speed;
    attrs.flashlight = flashlight;
    attrs.speed_note_count = values.speed_note_count;
    attrs.aim_difficult_strain_count = values.aim_difficult_strains;
    attrs.speed_difficult_strain_count = values.speed_difficult_strains;
    attrs.aim_difficult_slider_count = values.aim_difficult_sliders;
}

/// The first object has no predecessor and thus no difficulty object.
fn difficulty_objects<'a>(
    objects: &'a [OsuObject],
    clock_rate: f64,
    scaling_factor: &ScalingFactor,
) -> Vec<OsuDifficultyObject<'a>> {
    objects
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| {
            let last_last = idx.checked_sub(1).map(|i| &objects[i]);

            OsuDifficultyObject::new(&pair[1], &pair[0], last_last, clock_rate, idx, scaling_factor)
        })
        .collect()
}
