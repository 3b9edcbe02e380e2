use crate::{
    any::Difficulty,
    model::{mode::GameMode, mods::GameMods},
    util::difficulty::difficulty_range,
};

use super::Beatmap;

/// Approach rate and hit window bounds at difficulty 0, 5 and 10.
const PREEMPT: [f64; 3] = [1800.0, 1200.0, 450.0];
const OSU_GREAT: [f64; 3] = [80.0, 50.0, 20.0];
const TAIKO_GREAT: [f64; 3] = [50.0, 35.0, 20.0];

/// A map's AR, OD, CS and HP once mods and clock rate are applied.
#[derive(Clone, Debug, PartialEq)]
pub struct BeatmapAttributes {
    pub ar: f64,
    pub od: f64,
    pub cs: f64,
    pub hp: f64,
    pub clock_rate: f64,
    pub hit_windows: HitWindows,
}

/// In milliseconds of gameplay time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitWindows {
    /// How long objects are visible before they need to be hit.
    pub ar: f64,
    /// Window to hit a 300.
    pub od: f64,
}

/// Collects what [`BeatmapAttributes`] depend on.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub struct BeatmapAttributesBuilder {
    mode: GameMode,
    is_convert: bool,
    ar: f32,
    od: f32,
    cs: f32,
    hp: f32,
    mods: GameMods,
    clock_rate: Option<f64>,
}

impl BeatmapAttributesBuilder {
    /// osu!standard with every value at 5.
    pub const fn new() -> Self {
        Self {
            mode: GameMode::Osu,
            is_convert: false,
            ar: 5.0,
            od: 5.0,
            cs: 5.0,
            hp: 5.0,
            mods: GameMods::NM,
            clock_rate: None,
        }
    }

    /// Take the values, mode and convert status of `map`.
    pub const fn map(self, map: &Beatmap) -> Self {
        Self {
            mode: map.mode,
            is_convert: map.is_convert,
            ar: map.ar,
            od: map.od,
            cs: map.cs,
            hp: map.hp,
            ..self
        }
    }

    pub const fn mods(self, mods: GameMods) -> Self {
        Self { mods, ..self }
    }

    /// Overrides the clock rate of the mods.
    pub const fn clock_rate(self, clock_rate: f64) -> Self {
        Self {
            clock_rate: Some(clock_rate),
            ..self
        }
    }

    pub const fn mode(self, mode: GameMode, is_convert: bool) -> Self {
        Self {
            mode,
            is_convert,
            ..self
        }
    }

    /// Take mods and clock rate from a [`Difficulty`].
    pub fn difficulty(self, difficulty: &Difficulty) -> Self {
        Self {
            mods: difficulty.get_mods(),
            clock_rate: Some(difficulty.get_clock_rate()),
            ..self
        }
    }

    fn clock_rate_or_mods(&self) -> f64 {
        self.clock_rate.unwrap_or_else(|| self.mods.clock_rate())
    }

    /// HR and EZ scaling, capped at 10.
    fn scaled(&self, value: f32) -> f64 {
        (f64::from(value) * self.mods.od_ar_hp_multiplier()).min(10.0)
    }

    pub fn hit_windows(&self) -> HitWindows {
        let clock_rate = self.clock_rate_or_mods();
        let od = self.scaled(self.od);

        let great = match self.mode {
            GameMode::Osu | GameMode::Catch => range(od, OSU_GREAT) / clock_rate,
            GameMode::Taiko => range(od, TAIKO_GREAT) / clock_rate,
            GameMode::Mania => mania_great(f64::from(self.od), self.is_convert, self.mods, clock_rate),
        };

        HitWindows {
            ar: range(self.scaled(self.ar), PREEMPT) / clock_rate,
            od: great,
        }
    }

    pub fn build(&self) -> BeatmapAttributes {
        let hit_windows = self.hit_windows();

        let cs = f64::from(self.cs);

        let cs = if self.mods.hr() {
            (cs * 1.3).min(10.0)
        } else if self.mods.ez() {
            cs * 0.5
        } else {
            cs
        };

        // Preempt and great window are turned back into AR and OD so that
        // they reflect the clock rate
        let [preempt_min, preempt_mid, _] = PREEMPT;
        let preempt = hit_windows.ar;

        let ar = if preempt > preempt_mid {
            (preempt_min - preempt) / 120.0
        } else {
            (preempt_mid - preempt) / 150.0 + 5.0
        };

        let od = match self.mode {
            GameMode::Osu => (OSU_GREAT[0] - hit_windows.od) / 6.0,
            GameMode::Taiko => {
                (TAIKO_GREAT[0] - hit_windows.od) / (TAIKO_GREAT[0] - TAIKO_GREAT[1]) * 5.0
            }
            GameMode::Catch | GameMode::Mania => self.scaled(self.od),
        };

        BeatmapAttributes {
            ar,
            od,
            cs,
            hp: self.scaled(self.hp),
            clock_rate: self.clock_rate_or_mods(),
            hit_windows,
        }
    }
}

impl Default for BeatmapAttributesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn range(difficulty: f64, [min, mid, max]: [f64; 3]) -> f64 {
    difficulty_range(difficulty, min, mid, max)
}

/// osu!mania ignores HR and EZ for OD itself but scales the window, and
/// converts only know two windows.
fn mania_great(od: f64, is_convert: bool, mods: GameMods, clock_rate: f64) -> f64 {
    let mut window = if !is_convert {
        34.0 + 3.0 * (10.0 - od).clamp(0.0, 10.0)
    } else if od.round_ties_even() > 4.0 {
        34.0
    } else {
        47.0
    };

    if mods.hr() {
        window /= 1.4;
    } else if mods.ez() {
        window *= 1.4;
    }

    ((window * clock_rate).floor() / clock_rate).ceil()
}
