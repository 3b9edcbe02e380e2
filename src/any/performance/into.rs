use crate::{
    any::{DifficultyAttributes, PerformanceAttributes},
    model::mode::GameMode,
    Beatmap, Performance,
};

/// Anything a [`Performance`] calculation can start from: a map, or
/// previously calculated attributes of any mode.
pub trait IntoPerformance<'a> {
    fn into_performance(self) -> Performance<'a>;
}

macro_rules! per_mode {
    ( $module:ident :: $variant:ident ( $diff:ident, $perf:ident ) ) => {
        impl<'a> IntoPerformance<'a> for crate::$module::$diff {
            fn into_performance(self) -> Performance<'a> {
                Performance::$variant(self.into())
            }
        }

        impl<'a> IntoPerformance<'a> for crate::$module::$perf {
            fn into_performance(self) -> Performance<'a> {
                crate::$module::$diff::from(self).into_performance()
            }
        }
    };
}

per_mode!(osu::Osu(OsuDifficultyAttributes, OsuPerformanceAttributes));
per_mode!(taiko::Taiko(TaikoDifficultyAttributes, TaikoPerformanceAttributes));
per_mode!(catch::Catch(CatchDifficultyAttributes, CatchPerformanceAttributes));
per_mode!(mania::Mania(ManiaDifficultyAttributes, ManiaPerformanceAttributes));

macro_rules! by_map_mode {
    ( $map:ident ) => {
        match $map.mode {
            GameMode::Osu => Performance::Osu($map.into()),
            GameMode::Taiko => Performance::Taiko($map.into()),
            GameMode::Catch => Performance::Catch($map.into()),
            GameMode::Mania => Performance::Mania($map.into()),
        }
    };
}

impl<'a> IntoPerformance<'a> for Beatmap {
    fn into_performance(self) -> Performance<'a> {
        by_map_mode!(self)
    }
}

impl<'map> IntoPerformance<'map> for &'map Beatmap {
    fn into_performance(self) -> Performance<'map> {
        by_map_mode!(self)
    }
}

impl<'a> IntoPerformance<'a> for DifficultyAttributes {
    fn into_performance(self) -> Performance<'a> {
        match self {
            Self::Osu(attrs) => attrs.into_performance(),
            Self::Taiko(attrs) => attrs.into_performance(),
            Self::Catch(attrs) => attrs.into_performance(),
            Self::Mania(attrs) => attrs.into_performance(),
        }
    }
}

impl<'a> IntoPerformance<'a> for PerformanceAttributes {
    fn into_performance(self) -> Performance<'a> {
        match self {
            Self::Osu(attrs) => attrs.into_performance(),
            Self::Taiko(attrs) => attrs.into_performance(),
            Self::Catch(attrs) => attrs.into_performance(),
            Self::Mania(attrs) => attrs.into_performance(),
        }
    }
}
