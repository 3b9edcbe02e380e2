use crate::{
    any::difficulty::object::IDifficultyObject,
    taiko::object::{HitType, TaikoObject},
};

use super::{
    color::{ColorData, ColorEncodings},
    rhythm::HitObjectRhythm,
};

#[derive(Debug)]
pub struct TaikoDifficultyObject {
    pub idx: usize,
    pub start_time: f64,
    pub delta_time: f64,
    pub hit_type: HitType,
    pub rhythm: &'static HitObjectRhythm,
    /// Index in the list of objects with the same [`HitType`].
    pub mono_idx: usize,
    /// Index in the list of hits, meaningless for non-hits.
    pub note_idx: usize,
    pub color: ColorData,
}

impl TaikoDifficultyObject {
    fn new(
        hit_object: &TaikoObject,
        last: &TaikoObject,
        last_last: &TaikoObject,
        clock_rate: f64,
        idx: usize,
    ) -> Self {
        let delta_time = (hit_object.start_time - last.start_time) / clock_rate;
        let prev_delta_time = (last.start_time - last_last.start_time) / clock_rate;

        Self {
            idx,
            start_time: hit_object.start_time / clock_rate,
            delta_time,
            hit_type: hit_object.hit_type,
            rhythm: HitObjectRhythm::closest(delta_time, prev_delta_time),
            mono_idx: 0,
            note_idx: 0,
            color: ColorData::default(),
        }
    }

    pub const fn is_hit(&self) -> bool {
        !matches!(self.hit_type, HitType::NonHit)
    }
}

impl IDifficultyObject for TaikoDifficultyObject {
    fn idx(&self) -> usize {
        self.idx
    }

    fn start_time(&self) -> f64 {
        self.start_time
    }
}

/// All difficulty objects of a map plus lookup lists per hit type.
#[derive(Debug, Default)]
pub struct TaikoDifficultyObjects {
    pub objects: Vec<TaikoDifficultyObject>,
    center: Vec<usize>,
    rim: Vec<usize>,
    non_hit: Vec<usize>,
    notes: Vec<usize>,
    pub colors: ColorEncodings,
}

impl TaikoDifficultyObjects {
    /// The first two objects have no difficulty object.
    pub fn new(taiko_objects: &[TaikoObject], clock_rate: f64) -> Self {
        let mut this = Self {
            objects: Vec::with_capacity(taiko_objects.len().saturating_sub(2)),
            ..Self::default()
        };

        for (idx, window) in taiko_objects.windows(3).enumerate() {
            let [last_last, last, curr] = window else {
                continue;
            };

            let mut diff_object =
                TaikoDifficultyObject::new(curr, last, last_last, clock_rate, idx);

            let mono_list = match diff_object.hit_type {
                HitType::Center => &mut this.center,
                HitType::Rim => &mut this.rim,
                HitType::NonHit => &mut this.non_hit,
            };

            diff_object.mono_idx = mono_list.len();
            mono_list.push(idx);

            if diff_object.is_hit() {
                diff_object.note_idx = this.notes.len();
                this.notes.push(idx);
            }

            this.objects.push(diff_object);
        }

        this.colors = ColorEncodings::new(&mut this.objects, &this.notes);

        this
    }

    /// The `backwards_idx + 1`-th previous object of the same hit type.
    pub fn previous_mono(
        &self,
        curr: &TaikoDifficultyObject,
        backwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        let list = match curr.hit_type {
            HitType::Center => &self.center,
            HitType::Rim => &self.rim,
            HitType::NonHit => &self.non_hit,
        };

        curr.mono_idx
            .checked_sub(backwards_idx + 1)
            .and_then(|i| list.get(i))
            .map(|&idx| &self.objects[idx])
    }

    /// The `backwards_idx + 1`-th previous hit.
    ///
    /// For a non-hit this starts at the most recent hit before it.
    pub fn previous_note(
        &self,
        curr: &TaikoDifficultyObject,
        backwards_idx: usize,
    ) -> Option<&TaikoDifficultyObject> {
        let note_idx = if curr.is_hit() {
            curr.note_idx
        } else {
            self.notes.partition_point(|&idx| idx < curr.idx)
        };

        note_idx
            .checked_sub(backwards_idx + 1)
            .and_then(|i| self.notes.get(i))
            .map(|&idx| &self.objects[idx])
    }
}
