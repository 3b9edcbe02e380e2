use crate::model::hit_object::{HitObject, HitSoundType};

/// Which part of the drum needs to be hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitType {
    Center,
    Rim,
    /// Drum rolls and swells.
    NonHit,
}

#[derive(Clone, Debug)]
pub struct TaikoObject {
    pub start_time: f64,
    pub hit_type: HitType,
}

impl TaikoObject {
    pub fn new(h: &HitObject, sound: HitSoundType) -> Self {
        let hit_type = if !h.is_circle() {
            HitType::NonHit
        } else if sound.is_rim() {
            HitType::Rim
        } else {
            HitType::Center
        };

        Self {
            start_time: h.start_time,
            hit_type,
        }
    }

    pub const fn is_hit(&self) -> bool {
        !matches!(self.hit_type, HitType::NonHit)
    }
}
