use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{GameMode, IGameMode},
        mods::GameMods,
    },
};

pub use self::{
    attributes::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    performance::ManiaPerformance,
    score_state::ManiaScoreState,
};

mod attributes;
mod convert;
mod difficulty;
mod object;
mod performance;
mod score_state;

const PLAYFIELD_WIDTH: f32 = 512.0;

/// Marker type for [`GameMode::Mania`].
///
/// Converting an osu!standard map picks a column count and generates note
/// patterns with a seeded random generator so the result is the same every
/// time.
///
/// ```
/// use beatmap_pp::{mania::Mania, model::mode::IGameMode, Beatmap, Difficulty};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0\n256,192,300,1,8"
///     .parse()
///     .unwrap();
///
/// let attrs = Difficulty::new().calculate_for_mode::<Mania>(&map).unwrap();
///
/// assert!(attrs.n_objects >= 2);
/// assert!(attrs.is_convert);
/// ```
pub struct Mania;

impl IGameMode for Mania {
    const MODE: GameMode = GameMode::Mania;

    type DifficultyAttributes = ManiaDifficultyAttributes;

    fn convert(map: &mut Beatmap, mods: GameMods) {
        convert::convert(map, mods);
    }

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }
}
