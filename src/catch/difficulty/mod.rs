use crate::{
    any::difficulty::{skills::StrainSkill, Difficulty},
    catch::{
        attributes::CatchDifficultyAttributes,
        catcher,
        object::{CatchObjects, ObjectCount},
    },
    model::beatmap::Beatmap,
    util::log_trace,
};

use self::{
    movement::Movement,
    object::{CatchDifficultyObject, NORMALIZED_HITOBJECT_RADIUS},
};

mod movement;
mod object;

const STAR_SCALING_FACTOR: f64 = 0.153;

/// Calculate the difficulty attributes of an osu!catch map.
pub fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> CatchDifficultyAttributes {
    let map_attrs = map.attributes().difficulty(difficulty).build();
    let clock_rate = map_attrs.clock_rate;
    let cs = map_attrs.cs as f32;

    let take = difficulty.get_passed_objects();
    let hr_offsets = difficulty.get_mods().hardrock_offsets();

    let CatchObjects { palpable, count } = CatchObjects::new(map, take, hr_offsets, cs);
    let ObjectCount {
        fruits,
        droplets,
        tiny_droplets,
    } = count;

    let mut attrs = CatchDifficultyAttributes {
        ar: map_attrs.ar,
        n_fruits: fruits,
        n_droplets: droplets,
        n_tiny_droplets: tiny_droplets,
        is_convert: map.is_convert,
        ..Default::default()
    };

    let mut half_catcher_width = catcher::catch_width(cs) * 0.5;
    half_catcher_width *= 1.0 - ((cs - 5.5).max(0.0) * 0.0625);
    let scaling_factor = NORMALIZED_HITOBJECT_RADIUS / half_catcher_width;

    let mut palpable = palpable.iter().take(take);

    let Some(mut last_object) = palpable.next() else {
        return attrs;
    };

    let diff_objects: Vec<_> = palpable
        .enumerate()
        .map(|(idx, h)| {
            let diff_object =
                CatchDifficultyObject::new(h, last_object, clock_rate, scaling_factor, idx);
            last_object = h;

            diff_object
        })
        .collect();

    let mut movement = Movement::new(half_catcher_width, clock_rate);

    for curr in diff_objects.iter() {
        movement.process(curr, &diff_objects);
    }

    attrs.stars = movement.difficulty_value().sqrt() * STAR_SCALING_FACTOR;

    log_trace!(
        "catch difficulty: {:.4} stars, {} fruits, {} droplets, {} tiny droplets",
        attrs.stars,
        attrs.n_fruits,
        attrs.n_droplets,
        attrs.n_tiny_droplets
    );

    attrs
}
