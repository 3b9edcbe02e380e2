use crate::{
    catch::{CatchDifficultyAttributes, CatchPerformanceAttributes},
    mania::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    model::mode::GameMode,
    osu::{OsuDifficultyAttributes, OsuPerformanceAttributes},
    taiko::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
};

use super::performance::Performance;

/// Evaluate `$expr` on whichever mode's attributes `$self` holds.
macro_rules! on_mode {
    ( $self:ident, $attrs:ident => $expr:expr ) => {
        match $self {
            Self::Osu($attrs) => $expr,
            Self::Taiko($attrs) => $expr,
            Self::Catch($attrs) => $expr,
            Self::Mania($attrs) => $expr,
        }
    };
}

/// Difficulty attributes of any mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifficultyAttributes {
    Osu(OsuDifficultyAttributes),
    Taiko(TaikoDifficultyAttributes),
    Catch(CatchDifficultyAttributes),
    Mania(ManiaDifficultyAttributes),
}

impl DifficultyAttributes {
    pub const fn stars(&self) -> f64 {
        on_mode!(self, attrs => attrs.stars)
    }

    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Catch(attrs) => attrs.max_combo(),
            Self::Osu(OsuDifficultyAttributes { max_combo, .. })
            | Self::Taiko(TaikoDifficultyAttributes { max_combo, .. })
            | Self::Mania(ManiaDifficultyAttributes { max_combo, .. }) => *max_combo,
        }
    }

    /// How many judgements a play on the attributes' objects consists of.
    pub const fn total_hits(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.n_objects(),
            Self::Taiko(attrs) => attrs.max_combo,
            Self::Catch(attrs) => attrs.max_combo() + attrs.n_tiny_droplets,
            Self::Mania(attrs) => attrs.n_objects,
        }
    }

    /// How many objects the attributes were calculated on, counted the way
    /// `passed_objects` counts them.
    pub const fn n_objects(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.n_objects(),
            Self::Catch(attrs) => attrs.max_combo(),
            Self::Taiko(TaikoDifficultyAttributes { n_objects, .. })
            | Self::Mania(ManiaDifficultyAttributes { n_objects, .. }) => *n_objects,
        }
    }

    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Osu(_) => GameMode::Osu,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }

    /// Calculate pp from these attributes without needing the map again.
    pub fn performance<'a>(self) -> Performance<'a> {
        self.into()
    }
}

/// Performance attributes of any mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerformanceAttributes {
    Osu(OsuPerformanceAttributes),
    Taiko(TaikoPerformanceAttributes),
    Catch(CatchPerformanceAttributes),
    Mania(ManiaPerformanceAttributes),
}

impl PerformanceAttributes {
    pub const fn pp(&self) -> f64 {
        on_mode!(self, attrs => attrs.pp)
    }

    pub const fn stars(&self) -> f64 {
        on_mode!(self, attrs => attrs.difficulty.stars)
    }

    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.difficulty.max_combo,
            Self::Taiko(attrs) => attrs.difficulty.max_combo,
            Self::Catch(attrs) => attrs.difficulty.max_combo(),
            Self::Mania(attrs) => attrs.difficulty.max_combo,
        }
    }

    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Osu(_) => GameMode::Osu,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }

    /// Another pp calculation on the same difficulty attributes.
    pub fn performance<'a>(self) -> Performance<'a> {
        self.into()
    }
}

macro_rules! from_mode {
    ( $( $mode:ident: $difficulty:ident, $performance:ident; )* ) => {
        $(
            impl From<$difficulty> for DifficultyAttributes {
                fn from(attrs: $difficulty) -> Self {
                    Self::$mode(attrs)
                }
            }

            impl From<$performance> for PerformanceAttributes {
                fn from(attrs: $performance) -> Self {
                    Self::$mode(attrs)
                }
            }
        )*
    };
}

from_mode! {
    Osu: OsuDifficultyAttributes, OsuPerformanceAttributes;
    Taiko: TaikoDifficultyAttributes, TaikoPerformanceAttributes;
    Catch: CatchDifficultyAttributes, CatchPerformanceAttributes;
    Mania: ManiaDifficultyAttributes, ManiaPerformanceAttributes;
}
