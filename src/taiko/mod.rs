use crate::{
    any::difficulty::Difficulty,
    model::{
        beatmap::Beatmap,
        mode::{GameMode, IGameMode},
        mods::GameMods,
    },
};

pub use self::{
    attributes::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    performance::TaikoPerformance,
    score_state::TaikoScoreState,
};

mod attributes;
mod convert;
mod difficulty;
mod object;
mod performance;
mod score_state;

/// Marker type for [`GameMode::Taiko`].
///
/// ```
/// use beatmap_pp::{taiko::Taiko, model::mode::IGameMode, Beatmap, Difficulty};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0\n256,192,300,1,8"
///     .parse()
///     .unwrap();
///
/// let attrs = Difficulty::new().calculate_for_mode::<Taiko>(&map).unwrap();
///
/// assert_eq!(attrs.max_combo, 2);
/// assert!(attrs.is_convert);
/// ```
pub struct Taiko;

impl IGameMode for Taiko {
    const MODE: GameMode = GameMode::Taiko;

    type DifficultyAttributes = TaikoDifficultyAttributes;

    fn convert(map: &mut Beatmap, _: GameMods) {
        convert::convert(map);
    }

    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes {
        difficulty::difficulty(difficulty, map)
    }
}
