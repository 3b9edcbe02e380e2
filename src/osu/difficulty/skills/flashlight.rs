use crate::{
    any::difficulty::{
        object::IDifficultyObject,
        skills::{difficulty_value, strain_decay, StrainSections, StrainSkill},
    },
    osu::{difficulty::object::OsuDifficultyObject, object::OsuObjectKind},
};

const SKILL_MULTIPLIER: f64 = 0.05512;
const STRAIN_DECAY_BASE: f64 = 0.15;

const HISTORY_LEN: usize = 10;
const MAX_OPACITY_BONUS: f64 = 0.4;
const HIDDEN_BONUS: f64 = 0.2;
const MIN_SLIDER_VELOCITY: f64 = 0.5;
const SLIDER_MULTIPLIER: f64 = 1.3;
const MIN_ANGLE_MULTIPLIER: f64 = 0.2;

/// Memorisation of the object pattern under a limited field of view.
#[derive(Clone, Debug)]
pub struct Flashlight {
    strain: f64,
    view: View,
    sections: StrainSections,
}

/// What the player gets to see of upcoming objects.
#[derive(Clone, Debug)]
struct View {
    hidden: bool,
    /// Converts normalized distances back into pixels.
    scaling_factor: f64,
    time_preempt: f64,
    time_fade_in: f64,
}

impl Flashlight {
    pub fn new(hidden: bool, radius: f64, time_preempt: f64, time_fade_in: f64) -> Self {
        Self {
            strain: 0.0,
            view: View {
                hidden,
                scaling_factor: 52.0 / radius,
                time_preempt,
                time_fade_in,
            },
            sections: StrainSections::default(),
        }
    }

    /// Peaks are not decayed, every section counts fully.
    pub fn difficulty_value(&self) -> f64 {
        difficulty_value(self.sections.peaks(), 1.0)
    }
}

impl<'a> StrainSkill<OsuDifficultyObject<'a>> for Flashlight {
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
        let difficulty = if curr.base.is_spinner() {
            0.0
        } else {
            self.view.pattern_difficulty(curr, objects) + self.view.slider_difficulty(curr)
        };

        self.strain *= strain_decay(curr.delta_time, STRAIN_DECAY_BASE);
        self.strain += difficulty * SKILL_MULTIPLIER;

        self.strain
    }
}

impl View {
    /// Jumps from the recent objects to `curr`, weighted by how long ago they
    /// were and how faded out they are.
    fn pattern_difficulty(
        &self,
        curr: &OsuDifficultyObject<'_>,
        objects: &[OsuDifficultyObject<'_>],
    ) -> f64 {
        let mut sum = 0.0;
        let mut elapsed = 0.0;
        let mut small_dist_nerf = 1.0;
        let mut repeated_angles = 0.0;
        let mut later = curr;

        let history = (0..curr.idx.min(HISTORY_LEN))
            .map_while(|i| curr.previous(i, objects).map(|prev| (i, prev)));

        for (i, prev) in history {
            let newer = later;
            later = prev;

            if prev.base.is_spinner() {
                continue;
            }

            let jump_dist =
                f64::from((curr.base.stacked_pos() - prev.base.stacked_end_pos()).length());
            elapsed += newer.strain_time;

            // Objects within the flashlight circle are easy to see
            if i == 0 {
                small_dist_nerf = (jump_dist / 75.0).min(1.0);
            }

            // Only the first object of a stack counts
            let stack_nerf = (prev.lazy_jump_dist / self.scaling_factor / 25.0).min(1.0);

            let opacity = curr.opacity_at(
                prev.base.start_time,
                self.hidden,
                self.time_preempt,
                self.time_fade_in,
            );
            let opacity_bonus = 1.0 + MAX_OPACITY_BONUS * (1.0 - opacity);

            sum += stack_nerf * opacity_bonus * self.scaling_factor * jump_dist / elapsed;

            let same_angle = prev
                .angle
                .zip(curr.angle)
                .is_some_and(|(prev_angle, curr_angle)| (prev_angle - curr_angle).abs() < 0.02);

            if same_angle {
                repeated_angles += (1.0 - 0.1 * i as f64).max(0.0);
            }
        }

        let mut difficulty = (small_dist_nerf * sum).powf(2.0);

        // No approach circles
        if self.hidden {
            difficulty *= 1.0 + HIDDEN_BONUS;
        }

        difficulty * (MIN_ANGLE_MULTIPLIER + (1.0 - MIN_ANGLE_MULTIPLIER) / (repeated_angles + 1.0))
    }

    /// Fast and long sliders need their path memorised. Repeats reuse it.
    fn slider_difficulty(&self, curr: &OsuDifficultyObject<'_>) -> f64 {
        let OsuObjectKind::Slider(ref slider) = curr.base.kind else {
            return 0.0;
        };

        let pixel_travel_dist = f64::from(slider.lazy_travel_dist) / self.scaling_factor;

        let velocity_bonus = (pixel_travel_dist / curr.travel_time - MIN_SLIDER_VELOCITY)
            .max(0.0)
            .sqrt();

        let spans = (slider.repeat_count() + 1) as f64;

        velocity_bonus * pixel_travel_dist / spans * SLIDER_MULTIPLIER
    }
}
