use crate::{
    catch::CatchPerformance, mania::ManiaPerformance, model::mods::GameMods,
    osu::OsuPerformance, taiko::TaikoPerformance, CalculateError, Difficulty,
};

use self::into::IntoPerformance;

use super::{attributes::PerformanceAttributes, score_state::ScoreState};

pub mod into;

/// Builder for a pp calculation in any mode.
///
/// ```
/// use beatmap_pp::{Beatmap, Performance, model::mods::GameMods};
///
/// let map: Beatmap = "osu file format v14\n\n[HitObjects]\n256,192,0,1,0"
///     .parse()
///     .unwrap();
///
/// let attrs = Performance::new(&map)
///     .mods(GameMods::HD)
///     .accuracy(98.5)
///     .calculate()
///     .unwrap();
///
/// assert!(attrs.pp() > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Performance<'map> {
    Osu(OsuPerformance<'map>),
    Taiko(TaikoPerformance<'map>),
    Catch(CatchPerformance<'map>),
    Mania(ManiaPerformance<'map>),
}

/// Generates builder methods that forward to the calculator of each listed
/// mode. Unlisted modes ignore the value.
macro_rules! forward {
    ( $(
        $( #[$meta:meta] )*
        fn $name:ident($arg:ident: $ty:ty) { $( $mode:ident.$method:ident ),+ }
    )* ) => {
        $(
            $( #[$meta] )*
            #[allow(unreachable_patterns)]
            pub fn $name(self, $arg: $ty) -> Self {
                match self {
                    $( Self::$mode(calc) => Self::$mode(calc.$method($arg)), )+
                    unchanged => unchanged,
                }
            }
        )*
    };
}

/// Setters and conversions shared by every mode's calculator.
///
/// Each listed field is an `Option<u32>` with a setter of the same name,
/// filled from the named field of the score state by `state`.
macro_rules! performance_builder {
    (
        $calc:ident: $diff_attrs:ident, $perf_attrs:ident, $state:ident {
            $( $( #[$meta:meta] )* $field:ident: $state_field:ident ),* $(,)?
        }
    ) => {
        impl<'map> $calc<'map> {
            /// Specify mods.
            pub fn mods(mut self, mods: $crate::GameMods) -> Self {
                self.difficulty = self.difficulty.mods(mods);

                self
            }

            /// Take mods, clock rate and passed objects from a
            /// [`Difficulty`](crate::Difficulty).
            pub fn difficulty(mut self, difficulty: $crate::Difficulty) -> Self {
                self.difficulty = difficulty;

                self
            }

            /// Only the first `passed_objects` objects count, e.g. for a fail.
            pub fn passed_objects(mut self, passed_objects: u32) -> Self {
                self.difficulty = self.difficulty.passed_objects(passed_objects);

                self
            }

            /// Overrides the clock rate of the mods, clamped to `[0.01, 100]`.
            pub fn clock_rate(mut self, clock_rate: f64) -> Self {
                self.difficulty = self.difficulty.clock_rate(clock_rate);

                self
            }

            /// Percentage in `[0, 100]`. Values outside are clamped.
            pub fn accuracy(mut self, acc: f64) -> Self {
                self.acc = Some($crate::any::performance::acc_percent_to_fraction(acc));

                self
            }

            $(
                $( #[$meta] )*
                pub const fn $field(mut self, $field: u32) -> Self {
                    self.$field = Some($field);

                    self
                }
            )*

            #[doc = concat!("Set every judgement from a [`", stringify!($state), "`].")]
            pub const fn state(mut self, state: $state) -> Self {
                $( self.$field = Some(state.$state_field); )*

                self
            }
        }

        impl<'map> From<&'map $crate::Beatmap> for $calc<'map> {
            fn from(map: &'map $crate::Beatmap) -> Self {
                Self::new(map)
            }
        }

        impl From<$crate::Beatmap> for $calc<'_> {
            fn from(map: $crate::Beatmap) -> Self {
                Self::new(map)
            }
        }

        impl From<$diff_attrs> for $calc<'_> {
            fn from(attrs: $diff_attrs) -> Self {
                Self::new(attrs)
            }
        }

        impl From<$perf_attrs> for $calc<'_> {
            fn from(attrs: $perf_attrs) -> Self {
                Self::new(attrs)
            }
        }
    };
}

pub(crate) use performance_builder;

impl<'map> Performance<'map> {
    /// Start a calculation from a [`Beatmap`] (by reference or value) or
    /// from attributes of a previous calculation.
    ///
    /// Attributes skip the difficulty calculation. They must stem from the
    /// same map and [`Difficulty`] settings, or the result is meaningless.
    ///
    /// [`Beatmap`]: crate::model::beatmap::Beatmap
    pub fn new(map_or_attrs: impl IntoPerformance<'map>) -> Self {
        map_or_attrs.into_performance()
    }

    pub fn calculate(self) -> Result<PerformanceAttributes, CalculateError> {
        Ok(match self {
            Self::Osu(calc) => calc.calculate()?.into(),
            Self::Taiko(calc) => calc.calculate()?.into(),
            Self::Catch(calc) => calc.calculate()?.into(),
            Self::Mania(calc) => calc.calculate()?.into(),
        })
    }

    forward! {
        fn mods(mods: GameMods) { Osu.mods, Taiko.mods, Catch.mods, Mania.mods }

        /// Take mods, clock rate and passed objects from a [`Difficulty`].
        fn difficulty(difficulty: Difficulty) {
            Osu.difficulty, Taiko.difficulty, Catch.difficulty, Mania.difficulty
        }

        /// Only the first `passed_objects` objects count, e.g. for a fail.
        fn passed_objects(passed_objects: u32) {
            Osu.passed_objects, Taiko.passed_objects, Catch.passed_objects, Mania.passed_objects
        }

        /// Overrides the clock rate of the mods, clamped to `[0.01, 100]`.
        fn clock_rate(clock_rate: f64) {
            Osu.clock_rate, Taiko.clock_rate, Catch.clock_rate, Mania.clock_rate
        }

        /// Percentage in `[0, 100]`. Values outside are clamped.
        fn accuracy(acc: f64) { Osu.accuracy, Taiko.accuracy, Catch.accuracy, Mania.accuracy }

        fn misses(misses: u32) { Osu.misses, Taiko.misses, Catch.misses, Mania.misses }

        /// Ignored for osu!mania.
        fn combo(combo: u32) { Osu.combo, Taiko.combo, Catch.combo }

        /// Ignored for osu!catch. Defaults to [`HitResultPriority::BestCase`].
        fn hitresult_priority(priority: HitResultPriority) {
            Osu.hitresult_priority, Taiko.hitresult_priority, Mania.hitresult_priority
        }

        /// Fruits for osu!catch.
        fn n300(n300: u32) { Osu.n300, Taiko.n300, Catch.fruits, Mania.n300 }

        /// Droplets for osu!catch.
        fn n100(n100: u32) { Osu.n100, Taiko.n100, Catch.droplets, Mania.n100 }

        /// Tiny droplets for osu!catch, ignored for osu!taiko.
        fn n50(n50: u32) { Osu.n50, Catch.tiny_droplets, Mania.n50 }

        /// Tiny droplet misses for osu!catch, n200 for osu!mania.
        fn n_katu(n_katu: u32) { Catch.tiny_droplet_misses, Mania.n200 }

        /// n320 for osu!mania.
        fn n_geki(n_geki: u32) { Mania.n320 }
    }

    /// Set all judgements and the combo at once.
    pub fn state(self, state: ScoreState) -> Self {
        match self {
            Self::Osu(calc) => Self::Osu(calc.state(state.into())),
            Self::Taiko(calc) => Self::Taiko(calc.state(state.into())),
            Self::Catch(calc) => Self::Catch(calc.state(state.into())),
            Self::Mania(calc) => Self::Mania(calc.state(state.into())),
        }
    }

    /// The judgements [`calculate`](Self::calculate) will use, with unset
    /// counts filled in.
    pub fn generate_state(&mut self) -> Result<ScoreState, CalculateError> {
        Ok(match self {
            Self::Osu(calc) => calc.generate_state()?.into(),
            Self::Taiko(calc) => calc.generate_state()?.into(),
            Self::Catch(calc) => calc.generate_state()?.into(),
            Self::Mania(calc) => calc.generate_state()?.into(),
        })
    }
}

/// Which judgements receive the hits that no count or accuracy pins down.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitResultPriority {
    #[default]
    BestCase,
    WorstCase,
}

/// Clamps a percentage into `[0, 100]` and turns it into a fraction.
pub(crate) fn acc_percent_to_fraction(acc: f64) -> f64 {
    if acc.is_nan() {
        return 1.0;
    }

    acc.clamp(0.0, 100.0) / 100.0
}

/// Distributes `remaining` hits over judgements.
///
/// `weights` are the points of each judgement in descending order. Given
/// counts are kept (truncated to what remains), the others are filled such
/// that the total points approach `target_points`. Without a target, the
/// priority decides whether the best or the worst unset judgement receives
/// everything. If every judgement was given, leftover hits count as the best
/// judgement.
///
/// Raising `target_points` never turns a hit into a worse judgement.
pub(crate) fn fill_judgements<const N: usize>(
    given: [Option<u32>; N],
    weights: [f64; N],
    remaining: u32,
    target_points: Option<f64>,
    priority: HitResultPriority,
) -> [u32; N] {
    let mut counts = [0; N];
    let mut left = remaining;
    let mut points = 0.0;

    for (i, n) in given.iter().enumerate() {
        if let Some(n) = n {
            let n = (*n).min(left);
            counts[i] = n;
            left -= n;
            points += f64::from(n) * weights[i];
        }
    }

    let free: Vec<usize> = (0..N).filter(|&i| given[i].is_none()).collect();

    let (Some(&first), Some(&last)) = (free.first(), free.last()) else {
        if let Some(best) = counts.first_mut() {
            *best += left;
        }

        return counts;
    };

    if left == 0 {
        return counts;
    }

    let Some(target) = target_points else {
        match priority {
            HitResultPriority::BestCase => counts[first] += left,
            HitResultPriority::WorstCase => counts[last] += left,
        }

        return counts;
    };

    let avg = (target - points) / f64::from(left);

    if first == last || avg >= weights[first] {
        counts[first] += left;

        return counts;
    }

    if avg <= weights[last] {
        counts[last] += left;

        return counts;
    }

    let (hi, lo) = match priority {
        HitResultPriority::BestCase => free
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .find(|&(_, lo)| avg >= weights[lo])
            .unwrap_or((first, last)),
        HitResultPriority::WorstCase => (first, last),
    };

    let n_hi = ((target - points - weights[lo] * f64::from(left)) / (weights[hi] - weights[lo]))
        .round()
        .clamp(0.0, f64::from(left)) as u32;

    counts[hi] += n_hi;
    counts[lo] += left - n_hi;

    counts
}

impl<'a, T: IntoPerformance<'a>> From<T> for Performance<'a> {
    fn from(into: T) -> Self {
        into.into_performance()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        any::DifficultyAttributes,
        catch::CatchDifficultyAttributes,
        mania::{ManiaDifficultyAttributes, ManiaPerformanceAttributes},
        osu::OsuDifficultyAttributes,
        taiko::{TaikoDifficultyAttributes, TaikoPerformanceAttributes},
        Beatmap,
    };

    use super::*;

    const OSU_WEIGHTS: [f64; 3] = [6.0, 2.0, 1.0];

    fn points(counts: [u32; 3]) -> f64 {
        counts
            .iter()
            .zip(OSU_WEIGHTS)
            .map(|(n, w)| f64::from(*n) * w)
            .sum()
    }

    #[test]
    fn create() {
        let map = Beatmap::default();

        let _ = Performance::new(&map);
        let _ = Performance::new(map.clone());

        let _ = Performance::new(OsuDifficultyAttributes::default());
        let _ = Performance::new(TaikoDifficultyAttributes::default());
        let _ = Performance::new(CatchDifficultyAttributes::default());
        let _ = Performance::new(ManiaDifficultyAttributes::default());

        let _ = Performance::new(TaikoPerformanceAttributes::default());
        let _ = Performance::new(ManiaPerformanceAttributes::default());

        let _ = Performance::from(DifficultyAttributes::Osu(OsuDifficultyAttributes::default()));
        let _ = DifficultyAttributes::Osu(OsuDifficultyAttributes::default()).performance();
    }

    #[test]
    fn accuracy_percent_is_clamped() {
        assert!((acc_percent_to_fraction(150.0) - 1.0).abs() < f64::EPSILON);
        assert!(acc_percent_to_fraction(-3.0).abs() < f64::EPSILON);
        assert!((acc_percent_to_fraction(95.0) - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn fill_without_target() {
        let best = fill_judgements([None; 3], OSU_WEIGHTS, 10, None, HitResultPriority::BestCase);
        assert_eq!(best, [10, 0, 0]);

        let worst = fill_judgements([None; 3], OSU_WEIGHTS, 10, None, HitResultPriority::WorstCase);
        assert_eq!(worst, [0, 0, 10]);
    }

    #[test]
    fn fill_keeps_given_counts() {
        let counts = fill_judgements(
            [None, Some(3), None],
            OSU_WEIGHTS,
            10,
            None,
            HitResultPriority::BestCase,
        );

        assert_eq!(counts, [7, 3, 0]);

        let counts = fill_judgements(
            [Some(4), Some(20), None],
            OSU_WEIGHTS,
            10,
            None,
            HitResultPriority::BestCase,
        );

        assert_eq!(counts, [4, 6, 0]);
    }

    #[test]
    fn fill_all_given_puts_leftover_on_best() {
        let counts = fill_judgements(
            [Some(1), Some(1), Some(1)],
            OSU_WEIGHTS,
            5,
            Some(0.0),
            HitResultPriority::WorstCase,
        );

        assert_eq!(counts, [3, 1, 1]);
    }

    #[test]
    fn fill_hits_target() {
        // 95% on 100 objects
        let target = 0.95 * 100.0 * 6.0;
        let counts = fill_judgements([None; 3], OSU_WEIGHTS, 100, Some(target), HitResultPriority::BestCase);

        assert_eq!(counts.iter().sum::<u32>(), 100);
        assert!((points(counts) - target).abs() <= 4.0, "{counts:?}");
        assert_eq!(counts[2], 0);
    }

    #[test]
    fn fill_is_monotone_in_target() {
        for priority in [HitResultPriority::BestCase, HitResultPriority::WorstCase] {
            let mut prev = [0, 0, 50];

            for step in 0..=100 {
                let target = f64::from(step) / 100.0 * 50.0 * 6.0;
                let counts = fill_judgements([None; 3], OSU_WEIGHTS, 50, Some(target), priority);

                assert_eq!(counts.iter().sum::<u32>(), 50);
                assert!(points(counts) >= points(prev), "{prev:?} -> {counts:?}");
                assert!(counts[0] >= prev[0], "{prev:?} -> {counts:?}");

                prev = counts;
            }
        }
    }
}
