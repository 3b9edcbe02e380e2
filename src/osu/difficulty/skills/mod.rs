use crate::{
    any::difficulty::skills::StrainSkill,
    model::{beatmap::BeatmapAttributes, mods::GameMods},
    osu::object::OsuObject,
};

use self::{aim::Aim, flashlight::Flashlight, speed::Speed};

use super::{
    object::OsuDifficultyObject, scaling_factor::ScalingFactor, HD_FADE_IN_DURATION_MULTIPLIER,
};

pub mod aim;
pub mod flashlight;
pub mod speed;
pub mod strain;

/// Aim with and without sliders, speed, and flashlight, fed the same objects.
pub(super) struct OsuSkills {
    aim: Aim,
    aim_no_sliders: Aim,
    speed: Speed,
    flashlight: Flashlight,
}

/// What the skills amount to once every object has been processed.
pub(super) struct OsuSkillValues {
    pub aim: f64,
    pub aim_no_sliders: f64,
    pub aim_difficult_strains: f64,
    pub aim_difficult_sliders: f64,
    pub speed: f64,
    pub speed_difficult_strains: f64,
    pub speed_note_count: f64,
    pub flashlight: f64,
}

impl OsuSkills {
    pub fn new(
        mods: GameMods,
        scaling_factor: &ScalingFactor,
        map_attrs: &BeatmapAttributes,
        time_preempt: f64,
    ) -> Self {
        // Fast clock rates shorten the fade in along with the preempt
        let time_fade_in = if mods.hd() {
            time_preempt * HD_FADE_IN_DURATION_MULTIPLIER
        } else {
            400.0 * (time_preempt / OsuObject::PREEMPT_MIN).min(1.0)
        };

        let flashlight = Flashlight::new(
            mods.hd(),
            scaling_factor.radius,
            time_preempt,
            time_fade_in,
        );

        Self {
            aim: Aim::new(true),
            aim_no_sliders: Aim::new(false),
            speed: Speed::new(2.0 * map_attrs.hit_windows.od, mods.ap()),
            flashlight,
        }
    }

    /// Run every skill over all `objects` in order.
    pub fn process_all(mut self, objects: &[OsuDifficultyObject<'_>]) -> OsuSkillValues {
        for curr in objects {
            self.aim.process(curr, objects);
            self.aim_no_sliders.process(curr, objects);
            self.speed.process(curr, objects);
            self.flashlight.process(curr, objects);
        }

        let aim = self.aim.difficulty_value();
        let speed = self.speed.difficulty_value();

        OsuSkillValues {
            aim,
            aim_no_sliders: self.aim_no_sliders.difficulty_value(),
            aim_difficult_strains: self.aim.count_top_weighted_strains(aim),
            aim_difficult_sliders: self.aim.difficult_sliders(),
            speed,
            speed_difficult_strains: self.speed.count_top_weighted_strains(speed),
            speed_note_count: self.speed.relevant_note_count(),
            flashlight: self.flashlight.difficulty_value(),
        }
    }
}
