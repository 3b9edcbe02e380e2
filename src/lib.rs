//! Difficulty and performance calculation for [osu!] beatmaps of all four gamemodes.
//!
//! ## Usage
//!
//! ```
//! use beatmap_pp::{Beatmap, Difficulty, GameMods};
//!
//! let bytes = b"osu file format v14
//!
//! [Difficulty]
//! CircleSize:4
//! OverallDifficulty:8
//! ApproachRate:9
//!
//! [HitObjects]
//! 256,192,0,1,0
//! 100,100,300,1,0
//! 400,300,600,1,0
//! ";
//!
//! // Decode the map
//! let map = Beatmap::from_bytes(bytes).unwrap();
//!
//! // Calculate difficulty attributes
//! let diff_attrs = Difficulty::new()
//!     .mods(GameMods::HD | GameMods::HR)
//!     .calculate(&map)
//!     .unwrap();
//!
//! let stars = diff_attrs.stars();
//!
//! // Calculate performance attributes, re-using the difficulty attributes.
//! // This is only valid as long as map, mode, mods, clock rate, and the
//! // amount of passed objects stay the same.
//! let perf_attrs = diff_attrs
//!     .performance()
//!     .mods(GameMods::HD | GameMods::HR)
//!     .accuracy(99.2)
//!     .misses(1)
//!     .calculate()
//!     .unwrap();
//!
//! println!("Stars: {stars} | PP: {}", perf_attrs.pp());
//! ```
//!
//! For a single entry point that takes raw `.osu` bytes and a set of
//! [`ScoreParameters`], see [`Calculator`]. Difficulty attributes can be
//! shared between threads through a [`DifficultyCache`].
//!
//! ## Features
//!
//! | Flag | Description | Dependencies
//! | - | - | -
//! | `default` | No features |
//! | `serde` | Implement `Serialize` and `Deserialize` for attribute and parameter types. | [`serde`]
//! | `tracing` | Decoding issues and calculation steps are logged through `tracing`. Otherwise they're silently skipped. | [`tracing`]
//!
//! [osu!]: https://osu.ppy.sh/home
//! [`serde`]: https://docs.rs/serde
//! [`tracing`]: https://docs.rs/tracing

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::missing_const_for_fn, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::struct_excessive_bools,
    clippy::match_same_arms,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::explicit_iter_loop,
    clippy::similar_names,
    clippy::cast_possible_wrap
)]

#[doc(inline)]
pub use self::{
    any::{Difficulty, Performance, ScoreParameters},
    cache::DifficultyCache,
    calculator::{CalculateResult, Calculator},
    error::CalculateError,
    model::{beatmap::Beatmap, mode::GameMode, mods::GameMods},
};

/// Types for calculations of any mode.
pub mod any;

/// Types for osu!standard calculations.
pub mod osu;

/// Types for osu!taiko calculations.
pub mod taiko;

/// Types for osu!catch calculations.
pub mod catch;

/// Types for osu!mania calculations.
pub mod mania;

/// Types used in and around this crate.
pub mod model;

/// Memoization of difficulty attributes.
pub mod cache;

/// Calculation straight from `.osu` bytes.
pub mod calculator;

/// Slider path evaluation.
pub mod curve;

mod error;
mod util;
