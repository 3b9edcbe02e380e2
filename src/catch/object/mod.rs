use crate::{
    model::{
        beatmap::Beatmap,
        hit_object::{HitObjectKind, HoldNote, Spinner},
    },
    util::sort_by_start_time,
};

use self::{
    juice_stream::{JuiceStream, NestedKind},
    offsets::HardRockOffsets,
};

use super::catcher;

mod banana_shower;
mod juice_stream;
mod offsets;

/// A fruit or droplet, i.e. an object the catcher has to catch.
#[derive(Clone, Debug, PartialEq)]
pub struct PalpableObject {
    pub x: f32,
    pub x_offset: f32,
    pub start_time: f64,
    pub dist_to_hyper_dash: f32,
    pub hyper_dash: bool,
}

impl PalpableObject {
    const fn new(x: f32, x_offset: f32, start_time: f64) -> Self {
        Self {
            x,
            x_offset,
            start_time,
            dist_to_hyper_dash: 0.0,
            hyper_dash: false,
        }
    }

    pub fn effective_x(&self) -> f32 {
        self.x + self.x_offset
    }
}

/// Amount of fruits, droplets and tiny droplets within the passed objects.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectCount {
    pub fruits: u32,
    pub droplets: u32,
    pub tiny_droplets: u32,
}

/// Counts objects until `remaining` fruits and droplets were seen.
struct ObjectCounter {
    count: ObjectCount,
    remaining: usize,
}

impl ObjectCounter {
    const fn new(passed_objects: usize) -> Self {
        Self {
            count: ObjectCount {
                fruits: 0,
                droplets: 0,
                tiny_droplets: 0,
            },
            remaining: passed_objects,
        }
    }

    fn record(&mut self, kind: NestedKind) {
        if self.remaining == 0 {
            return;
        }

        match kind {
            NestedKind::Fruit => {
                self.count.fruits += 1;
                self.remaining -= 1;
            }
            NestedKind::Droplet => {
                self.count.droplets += 1;
                self.remaining -= 1;
            }
            NestedKind::TinyDroplet => self.count.tiny_droplets += 1,
        }
    }
}

/// The playable objects of a map, sorted by start time, and the counts of
/// the first `passed_objects` of them.
pub struct CatchObjects {
    pub palpable: Vec<PalpableObject>,
    pub count: ObjectCount,
}

impl CatchObjects {
    pub fn new(map: &Beatmap, passed_objects: usize, hr_offsets: bool, cs: f32) -> Self {
        let mut counter = ObjectCounter::new(passed_objects);
        let mut offsets = HardRockOffsets::new(hr_offsets);
        let mut palpable = Vec::with_capacity(map.hit_objects.len());

        for h in map.hit_objects.iter() {
            match h.kind {
                HitObjectKind::Circle => {
                    counter.record(NestedKind::Fruit);
                    let x_offset = offsets.fruit(h.pos.x, h.start_time);
                    palpable.push(PalpableObject::new(h.pos.x, x_offset, h.start_time));
                }
                HitObjectKind::Slider(ref slider) => {
                    let stream = JuiceStream::new(h, slider, map);
                    let mut n_droplets = 0;

                    for nested in stream.nested_objects {
                        counter.record(nested.kind);

                        if nested.kind == NestedKind::Fruit {
                            palpable.push(PalpableObject::new(nested.x, 0.0, nested.start_time));
                        } else {
                            n_droplets += 1;

                            if nested.kind == NestedKind::Droplet {
                                palpable
                                    .push(PalpableObject::new(nested.x, 0.0, nested.start_time));
                            }
                        }
                    }

                    offsets.juice_stream(stream.end_x, h.start_time, n_droplets);
                }
                HitObjectKind::Spinner(Spinner { duration })
                | HitObjectKind::Hold(HoldNote { duration }) => {
                    let n_bananas =
                        banana_shower::n_bananas(h.start_time, h.start_time + duration);
                    offsets.banana_shower(n_bananas);
                }
            }
        }

        sort_by_start_time(&mut palpable, |h| h.start_time);
        initialize_hyper_dash(cs, &mut palpable);

        Self {
            palpable,
            count: counter.count,
        }
    }
}

fn initialize_hyper_dash(cs: f32, palpable: &mut [PalpableObject]) {
    let half_catcher_width =
        f64::from(catcher::catch_width(cs) / 2.0) / f64::from(catcher::ALLOWED_CATCH_RANGE);

    let mut last_dir = 0;
    let mut last_excess = half_catcher_width;

    for i in 0..palpable.len().saturating_sub(1) {
        let next = &palpable[i + 1];
        let curr = &palpable[i];

        let this_dir = if next.effective_x() > curr.effective_x() {
            1
        } else {
            -1
        };

        // Integer truncation as in osu!stable
        let time_to_next = f64::from(
            (next.start_time as i32 - curr.start_time as i32) as f32 - 1000.0 / 60.0 / 4.0,
        );

        let dist_to_next = f64::from((next.effective_x() - curr.effective_x()).abs())
            - if last_dir == this_dir {
                last_excess
            } else {
                half_catcher_width
            };

        let dist_to_hyper = (time_to_next * catcher::BASE_SPEED - dist_to_next) as f32;

        let curr = &mut palpable[i];

        if dist_to_hyper < 0.0 {
            curr.hyper_dash = true;
            last_excess = half_catcher_width;
        } else {
            curr.dist_to_hyper_dash = dist_to_hyper;
            last_excess = f64::from(dist_to_hyper).clamp(0.0, half_catcher_width);
        }

        last_dir = this_dir;
    }
}
