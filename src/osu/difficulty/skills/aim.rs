use std::f64::consts::FRAC_PI_2;

use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{count_top_weighted_strains, strain_decay, StrainSections, StrainSkill},
    },
    osu::difficulty::object::OsuDifficultyObject,
    util::{
        difficulty::{milliseconds_to_bpm, reverse_lerp, smootherstep, smoothstep},
        float_ext::FloatExt,
    },
};

use super::strain::{reduced_difficulty_value, REDUCED_SECTION_COUNT};

const SKILL_MULTIPLIER: f64 = 25.6;
const STRAIN_DECAY_BASE: f64 = 0.15;

const WIDE_ANGLE_MULTIPLIER: f64 = 1.5;
const ACUTE_ANGLE_MULTIPLIER: f64 = 2.6;
const SLIDER_MULTIPLIER: f64 = 1.35;
const VELOCITY_CHANGE_MULTIPLIER: f64 = 0.75;
const WIGGLE_MULTIPLIER: f64 = 1.02;

const RADIUS: f64 = OsuDifficultyObject::NORMALIZED_RADIUS as f64;
const DIAMETER: f64 = OsuDifficultyObject::NORMALIZED_DIAMETER as f64;

/// Cursor movement between objects, optionally including slider paths.
#[derive(Clone, Debug)]
pub struct Aim {
    include_sliders: bool,
    strain: f64,
    slider_strains: Vec<f64>,
    sections: StrainSections,
}

impl Aim {
    pub fn new(include_sliders: bool) -> Self {
        Self {
            include_sliders,
            strain: 0.0,
            slider_strains: Vec::new(),
            sections: StrainSections::default(),
        }
    }

    pub fn difficulty_value(&self) -> f64 {
        reduced_difficulty_value(self.sections.peaks(), REDUCED_SECTION_COUNT)
    }

    pub fn count_top_weighted_strains(&self, difficulty_value: f64) -> f64 {
        count_top_weighted_strains(self.sections.object_strains(), difficulty_value)
    }

    /// Amount of sliders that are about as difficult as the hardest one.
    pub fn difficult_sliders(&self) -> f64 {
        let max = self.slider_strains.iter().copied().fold(0.0, f64::max);

        if FloatExt::eq(max, 0.0) {
            return 0.0;
        }

        self.slider_strains
            .iter()
            .map(|strain| 1.0 / (1.0 + (6.0 - 12.0 * strain / max).exp()))
            .sum()
    }
}

impl<'a> StrainSkill<OsuDifficultyObject<'a>> for Aim {
    fn sections(&self) -> &StrainSections {
        &self.sections
    }

    fn sections_mut(&mut self) -> &mut StrainSections {
        &mut self.sections
    }

    fn initial_strain(
        &self,
        time: f64,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        let last_time = curr
            .previous(0, objects)
            .map_or(0.0, IDifficultyObject::start_time);

        self.strain * strain_decay(time - last_time, STRAIN_DECAY_BASE)
    }

    fn strain_value_at(
        &mut self,
        curr: &OsuDifficultyObject<'a>,
        objects: &[OsuDifficultyObject<'a>],
    ) -> f64 {
        let difficulty = aim_difficulty(curr, objects, self.include_sliders);

        self.strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.strain += difficulty * SKILL_MULTIPLIER;

        if curr.base.is_slider() {
            self.slider_strains.push(self.strain);
        }

        self.strain
    }
}

fn aim_difficulty(
    curr: &OsuDifficultyObject<'_>,
    objects: &[OsuDifficultyObject<'_>],
    sliders: bool,
) -> f64 {
    let (Some(last_last), Some(last)) = (curr.previous(1, objects), curr.previous(0, objects))
    else {
        return 0.0;
    };

    if curr.base.is_spinner() || last.base.is_spinner() {
        return 0.0;
    }

    let curr_vel = jump_velocity(curr, last, sliders);
    let prev_vel = jump_velocity(last, last_last, sliders);

    let same_rhythm =
        curr.strain_time.max(last.strain_time) < 1.25 * curr.strain_time.min(last.strain_time);

    let angles = curr
        .angle
        .zip(last.angle)
        .filter(|_| same_rhythm)
        .map(|(curr_angle, last_angle)| {
            AngleBonus::new(curr, last, curr_angle, last_angle, curr_vel.min(prev_vel))
        })
        .unwrap_or_default();

    let vel_change = if prev_vel.max(curr_vel).not_eq(0.0) {
        velocity_change_bonus(curr, last, last_last)
    } else {
        0.0
    };

    let mut strain = curr_vel + angles.wiggle * WIGGLE_MULTIPLIER;

    strain += (angles.acute * ACUTE_ANGLE_MULTIPLIER)
        .max(angles.wide * WIDE_ANGLE_MULTIPLIER + vel_change * VELOCITY_CHANGE_MULTIPLIER);

    if sliders && last.base.is_slider() {
        strain += last.travel_dist / last.travel_time * SLIDER_MULTIPLIER;
    }

    strain
}

/// Velocity of the jump into `curr`. With sliders, the travel along a
/// previous slider carries over.
fn jump_velocity(curr: &OsuDifficultyObject<'_>, last: &OsuDifficultyObject<'_>, sliders: bool) -> f64 {
    let vel = curr.lazy_jump_dist / curr.strain_time;

    if sliders && last.base.is_slider() {
        let travel_vel = last.travel_dist / last.travel_time;
        let movement_vel = curr.min_jump_dist / curr.min_jump_time;

        vel.max(movement_vel + travel_vel)
    } else {
        vel
    }
}

/// Bonus for the change between the average velocities of the last two
/// jumps, including slider travel.
fn velocity_change_bonus(
    curr: &OsuDifficultyObject<'_>,
    last: &OsuDifficultyObject<'_>,
    last_last: &OsuDifficultyObject<'_>,
) -> f64 {
    let prev_vel = (last.lazy_jump_dist + last_last.travel_dist) / last.strain_time;
    let curr_vel = (curr.lazy_jump_dist + last.travel_dist) / curr.strain_time;

    let vel_diff = (prev_vel - curr_vel).abs();
    let dist_ratio = (FRAC_PI_2 * vel_diff / prev_vel.max(curr_vel)).sin().powf(2.0);

    let min_time = curr.strain_time.min(last.strain_time);
    let max_time = curr.strain_time.max(last.strain_time);

    // Overlapping objects can still change velocity
    let overlap_vel_buff = (DIAMETER * 1.25 / min_time).min(vel_diff);

    overlap_vel_buff * dist_ratio * (min_time / max_time).powf(2.0)
}

#[derive(Default)]
struct AngleBonus {
    wide: f64,
    acute: f64,
    wiggle: f64,
}

impl AngleBonus {
    fn new(
        curr: &OsuDifficultyObject<'_>,
        last: &OsuDifficultyObject<'_>,
        curr_angle: f64,
        last_angle: f64,
        base: f64,
    ) -> Self {
        let dist = curr.lazy_jump_dist;

        // Repeating the same angle is easier
        let mut wide = wide_angle(curr_angle);
        wide *= 1.0 - wide.min(wide_angle(last_angle).powf(3.0));
        wide *= base * smootherstep(dist, 0.0, DIAMETER);

        let mut acute = acute_angle(curr_angle);
        acute *= 0.08 + 0.92 * (1.0 - acute.min(acute_angle(last_angle).powf(3.0)));

        // Acute angles only count past 300 bpm 1/2 and one diameter
        let bpm = milliseconds_to_bpm(curr.strain_time, Some(2));
        acute *= base
            * smootherstep(bpm, 300.0, 400.0)
            * smootherstep(dist, DIAMETER, DIAMETER * 2.0);

        let wiggle = base
            * wiggle_factor(dist, curr_angle)
            * wiggle_factor(last.lazy_jump_dist, last_angle);

        Self { wide, acute, wiggle }
    }
}

fn wide_angle(angle: f64) -> f64 {
    smoothstep(angle, f64::to_radians(40.0), f64::to_radians(140.0))
}

fn acute_angle(angle: f64) -> f64 {
    smoothstep(angle, f64::to_radians(140.0), f64::to_radians(40.0))
}

/// Wiggles are jumps between a radius and three diameters at angles below
/// 110 degrees.
fn wiggle_factor(dist: f64, angle: f64) -> f64 {
    smootherstep(dist, RADIUS, DIAMETER)
        * reverse_lerp(dist, DIAMETER * 3.0, DIAMETER).powf(1.8)
        * smootherstep(angle, f64::to_radians(110.0), f64::to_radians(60.0))
}
