use std::mem;

use crate::{
    mania::PLAYFIELD_WIDTH,
    model::{
        hit_object::{HitObject, HitObjectKind, HoldNote},
        pos::Pos,
    },
};

/// Objects generated from a single osu!standard object.
#[derive(Clone, Debug, Default)]
pub struct Pattern {
    pub hit_objects: Vec<HitObject>,
    columns: ContainedColumns,
}

impl Pattern {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hit_objects: Vec::with_capacity(capacity),
            columns: ContainedColumns::default(),
        }
    }

    pub fn single(column: u8, start_time: f64, end_time: f64, total_columns: i32) -> Self {
        let mut pattern = Self::with_capacity(1);
        pattern.add_note(column, start_time, end_time, total_columns);

        pattern
    }

    /// Adds a note, or a hold note if `end_time` lies after `start_time`.
    pub fn add_note(&mut self, column: u8, start_time: f64, end_time: f64, total_columns: i32) {
        let x = column_to_pos(column, total_columns);

        let kind = if end_time > start_time {
            HitObjectKind::Hold(HoldNote {
                duration: end_time - start_time,
            })
        } else {
            HitObjectKind::Circle
        };

        let h = HitObject {
            pos: Pos::new(x, x),
            start_time,
            kind,
        };

        self.add_object(h, column);
    }

    pub fn add_object(&mut self, h: HitObject, column: u8) {
        self.hit_objects.push(h);
        self.columns.insert(column);
    }

    pub const fn column_has_obj(&self, column: u8) -> bool {
        self.columns.contains(column)
    }

    pub const fn columns(&self) -> ContainedColumns {
        self.columns
    }

    pub const fn column_with_objs(&self) -> i32 {
        self.columns.len() as i32
    }

    /// Moves all objects of `other` into `self`.
    pub fn append(&mut self, other: &mut Self) {
        self.hit_objects.append(&mut other.hit_objects);
        self.columns.0 |= mem::take(&mut other.columns.0);
    }
}

fn column_to_pos(column: u8, total_columns: i32) -> f32 {
    let divisor = PLAYFIELD_WIDTH / total_columns as f32;

    (f32::from(column) * divisor).ceil()
}

/// Bitset of occupied columns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainedColumns(u16);

impl ContainedColumns {
    pub fn insert(&mut self, column: u8) {
        self.0 |= 1 << column;
    }

    pub fn with(mut self, column: u8) -> Self {
        self.insert(column);

        self
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn contains(self, column: u8) -> bool {
        self.0 & (1 << column) != 0
    }
}
