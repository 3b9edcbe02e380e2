use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{GameMode, IGameMode},
        mods::GameMods,
        pos::Pos,
    },
};

pub use self::{
    attributes::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    performance::OsuPerformance,
    score_state::OsuScoreState,
};

mod attributes;
mod convert;
mod difficulty;
mod object;
mod performance;
mod score_state;

const PLAYFIELD_BASE_SIZE: Pos = Pos::new(512.0, 384.0);

/// Marker type for [`GameMode::Osu`].
///
/// ```
/// use beatmap_pp::{osu::Osu, model::mode::IGameMode, Beatmap, Difficulty};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = Difficulty::new().calculate_for_mode::<Osu>(&map).unwrap();
///
/// assert_eq!(attrs.max_combo, 1);
/// ```
pub struct Osu;

impl IGameMode for Osu {
    const MODE: GameMode = GameMode::Osu;

    type DifficultyAttributes = OsuDifficultyAttributes;

    /// Only osu!standard maps are osu!standard maps, nothing to convert.
    fn convert(_: &mut Beatmap, _: GameMods) {}

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }
}
