use crate::{any::difficulty::object::IDifficultyObject, catch::object::PalpableObject};

pub const NORMALIZED_HITOBJECT_RADIUS: f32 = 41.0;

#[derive(Clone, Debug)]
pub struct CatchDifficultyObject {
    pub idx: usize,
    pub start_time: f64,
    pub delta_time: f64,
    pub normalized_pos: f32,
    pub last_normalized_pos: f32,
    /// Delta time capped at 40ms.
    pub strain_time: f64,
    pub last_hyper_dash: bool,
    pub last_dist_to_hyper_dash: f32,
}

impl CatchDifficultyObject {
    pub fn new(
        hit_object: &PalpableObject,
        last_object: &PalpableObject,
        clock_rate: f64,
        scaling_factor: f32,
        idx: usize,
    ) -> Self {
        let delta_time = (hit_object.start_time - last_object.start_time) / clock_rate;

        Self {
            idx,
            start_time: hit_object.start_time / clock_rate,
            delta_time,
            normalized_pos: hit_object.effective_x() * scaling_factor,
            last_normalized_pos: last_object.effective_x() * scaling_factor,
            strain_time: delta_time.max(40.0),
            last_hyper_dash: last_object.hyper_dash,
            last_dist_to_hyper_dash: last_object.dist_to_hyper_dash,
        }
    }
}

impl IDifficultyObject for CatchDifficultyObject {
    fn idx(&self) -> usize {
        self.idx
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }
}
