use crate::model::{beatmap::Beatmap, mode::GameMode};

/// Convert an osu!standard map into an osu!catch map.
///
/// Catch objects keep the position and timing of the original objects, the
/// fruits, droplets and bananas are only generated during difficulty
/// calculation.
pub fn convert(map: &mut Beatmap) {
    map.mode = GameMode::Catch;
    map.is_convert = true;
}
