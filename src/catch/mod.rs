use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{GameMode, IGameMode},
        mods::GameMods,
    },
};

pub use self::{
    attributes::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    performance::CatchPerformance,
    score_state::CatchScoreState,
};

mod attributes;
mod catcher;
mod convert;
mod difficulty;
mod object;
mod performance;
mod score_state;

const PLAYFIELD_WIDTH: f32 = 512.0;

/// Marker type for [`GameMode::Catch`].
///
/// ```
/// use beatmap_pp::{catch::Catch, model::mode::IGameMode, Beatmap, Difficulty};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n\
///     100,192,0,1,0\n400,192,500,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = Difficulty::new().calculate_for_mode::<Catch>(&map).unwrap();
///
/// assert_eq!(attrs.n_fruits, 2);
/// assert!(attrs.is_convert);
/// ```
pub struct Catch;

impl IGameMode for Catch {
    const MODE: GameMode = GameMode::Catch;

    type DifficultyAttributes = CatchDifficultyAttributes;

    fn convert(map: &mut Beatmap, _: GameMods) {
        convert::convert(map);
    }

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }
}
