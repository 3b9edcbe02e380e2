/// The decoded map and its attribute builder.
pub mod beatmap;

/// Timing, difficulty and effect points.
pub mod control_point;

pub mod hit_object;

/// Game modes and conversion between them.
pub mod mode;

/// The mod bitset.
pub mod mods;

/// Coordinates on the playfield.
pub mod pos;
