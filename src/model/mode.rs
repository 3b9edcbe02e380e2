use std::{
    borrow::Cow,
    fmt::{self, Debug},
    str::FromStr,
};

use crate::any::Difficulty;

use super::{beatmap::Beatmap, mods::GameMods};

/// The four osu! gamemodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    Osu = 0,
    Taiko = 1,
    Catch = 2,
    Mania = 3,
}

impl GameMode {
    pub const fn from_u8(mode: u8) -> Option<Self> {
        match mode {
            0 => Some(Self::Osu),
            1 => Some(Self::Taiko),
            2 => Some(Self::Catch),
            3 => Some(Self::Mania),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Osu => "osu",
            Self::Taiko => "taiko",
            Self::Catch => "catch",
            Self::Mania => "mania",
        };

        f.write_str(name)
    }
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" | "osu" | "standard" => Ok(Self::Osu),
            "1" | "taiko" => Ok(Self::Taiko),
            "2" | "catch" | "fruits" => Ok(Self::Catch),
            "3" | "mania" => Ok(Self::Mania),
            _ => Err(()),
        }
    }
}

/// The status of a conversion through [`IGameMode::try_convert`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConvertStatus {
    /// Conversion not necessary.
    Noop,
    /// Conversion possible.
    Conversion,
    /// Conversion not possible.
    Incompatible,
}

impl ConvertStatus {
    /// Whether this [`ConvertStatus`] represents a success.
    pub const fn success(self) -> bool {
        matches!(self, Self::Noop | Self::Conversion)
    }
}

/// A beatmap could not be converted to the requested mode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot convert {from} beatmap to {to}")]
    UnsupportedMode { from: GameMode, to: GameMode },
}

/// A way to specify a gamemode at compile-time.
///
/// Implemented for the marker types [`Osu`], [`Taiko`], [`Catch`], and
/// [`Mania`].
///
/// [`Osu`]: crate::osu::Osu
/// [`Taiko`]: crate::taiko::Taiko
/// [`Catch`]: crate::catch::Catch
/// [`Mania`]: crate::mania::Mania
pub trait IGameMode: Sized {
    const MODE: GameMode;

    /// The resulting type of a difficulty calculation.
    type DifficultyAttributes: Clone + Debug + PartialEq;

    /// Only osu!standard maps can be converted to other modes.
    fn check_convert(map: &Beatmap) -> ConvertStatus {
        if map.mode == Self::MODE {
            ConvertStatus::Noop
        } else if map.mode == GameMode::Osu {
            ConvertStatus::Conversion
        } else {
            ConvertStatus::Incompatible
        }
    }

    /// Converts the hitobjects of an osu!standard map in-place.
    fn convert(map: &mut Beatmap, mods: GameMods);

    /// Attempt to convert a beatmap.
    ///
    /// In case [`ConvertStatus::Incompatible`] is returned, the map is not
    /// modified.
    fn try_convert(map: &mut Beatmap, mods: GameMods) -> ConvertStatus {
        let status = Self::check_convert(map);

        if status == ConvertStatus::Conversion {
            Self::convert(map, mods);
        }

        status
    }

    /// Converts the map if necessary, borrowing it otherwise.
    fn convert_ref(map: &Beatmap, mods: GameMods) -> Result<Cow<'_, Beatmap>, ConvertError> {
        match Self::check_convert(map) {
            ConvertStatus::Noop => Ok(Cow::Borrowed(map)),
            ConvertStatus::Conversion => {
                let mut map = map.to_owned();
                Self::convert(&mut map, mods);

                Ok(Cow::Owned(map))
            }
            ConvertStatus::Incompatible => Err(ConvertError::UnsupportedMode {
                from: map.mode,
                to: Self::MODE,
            }),
        }
    }

    /// Perform a difficulty calculation on a map that is already of this
    /// mode.
    fn difficulty(difficulty: &Difficulty, map: &Beatmap) -> Self::DifficultyAttributes;
}
