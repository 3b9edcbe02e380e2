use crate::{
    model::{mode::GameMode, mods::GameMods},
    Difficulty,
};

use super::{
    attributes::DifficultyAttributes,
    performance::{HitResultPriority, Performance},
    score_state::ScoreState,
};

/// The parameters of a score as provided by a caller.
///
/// Only the mode is required. Everything else that is absent is assumed to
/// be the best possible play, i.e. maximum accuracy, full combo, no misses.
///
/// Unlike the [`Performance`] builder, accuracy is given as a fraction
/// between `0.0` and `1.0`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreParameters {
    pub mode: GameMode,
    pub mods: Option<GameMods>,
    pub accuracy: Option<f64>,
    pub n_geki: Option<u32>,
    pub n300: Option<u32>,
    pub n_katu: Option<u32>,
    pub n100: Option<u32>,
    pub n50: Option<u32>,
    pub misses: Option<u32>,
    pub combo: Option<u32>,
    pub passed_objects: Option<u32>,
    pub clock_rate: Option<f64>,
    pub hitresult_priority: Option<HitResultPriority>,
}

/// Score parameters that cannot belong to any play on the map.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ScoreParametersError {
    #[error("accuracy must be between 0 and 1, got {0}")]
    AccuracyOutOfRange(f64),
    #[error("clock rate must be finite, got {0}")]
    NonFiniteClockRate(f64),
    #[error("{hits} hits exceed the {objects} hittable objects")]
    HitCountsExceedObjects { hits: u64, objects: u32 },
    #[error("{passed} passed objects exceed the {objects} objects of the map")]
    PassedObjectsExceedObjects { passed: u32, objects: u32 },
}

macro_rules! setters {
    ( $( $( #[$meta:meta] )* $field:ident: $ty:ty, )* ) => {
        $(
            $( #[$meta] )*
            pub const fn $field(mut self, $field: $ty) -> Self {
                self.$field = Some($field);

                self
            }
        )*
    };
}

impl ScoreParameters {
    /// Parameters of a perfect play on the given mode.
    pub const fn new(mode: GameMode) -> Self {
        Self {
            mode,
            mods: None,
            accuracy: None,
            n_geki: None,
            n300: None,
            n_katu: None,
            n100: None,
            n50: None,
            misses: None,
            combo: None,
            passed_objects: None,
            clock_rate: None,
            hitresult_priority: None,
        }
    }

    setters! {
        mods: GameMods,
        /// Accuracy as fraction between `0.0` and `1.0`.
        accuracy: f64,
        /// n320 for osu!mania.
        n_geki: u32,
        n300: u32,
        /// Tiny droplet misses for osu!catch, n200 for osu!mania.
        n_katu: u32,
        n100: u32,
        n50: u32,
        misses: u32,
        combo: u32,
        passed_objects: u32,
        clock_rate: f64,
        hitresult_priority: HitResultPriority,
    }

    /// Check the values that are invalid regardless of the map.
    pub fn validate(&self) -> Result<(), ScoreParametersError> {
        if let Some(acc) = self.accuracy {
            if !(0.0..=1.0).contains(&acc) {
                return Err(ScoreParametersError::AccuracyOutOfRange(acc));
            }
        }

        if let Some(clock_rate) = self.clock_rate {
            if !clock_rate.is_finite() {
                return Err(ScoreParametersError::NonFiniteClockRate(clock_rate));
            }
        }

        Ok(())
    }

    /// Check the parameters against the difficulty attributes they produced.
    ///
    /// The attributes must stem from [`ScoreParameters::difficulty`] so that
    /// their object count is that of the converted map, cut off after the
    /// passed objects.
    pub fn validate_against(
        &self,
        attrs: &DifficultyAttributes,
    ) -> Result<(), ScoreParametersError> {
        self.validate()?;

        let n_objects = attrs.n_objects();

        // Attributes only ever hold up to `passed` objects, so falling short
        // of it means the map has fewer.
        if let Some(passed) = self.passed_objects.filter(|&passed| passed > n_objects) {
            return Err(ScoreParametersError::PassedObjectsExceedObjects {
                passed,
                objects: n_objects,
            });
        }

        let hits = self.given_state().total_hits(self.mode);
        let objects = attrs.total_hits();

        if hits > u64::from(objects) {
            return Err(ScoreParametersError::HitCountsExceedObjects { hits, objects });
        }

        Ok(())
    }

    /// The [`Difficulty`] settings of the score.
    pub fn difficulty(&self) -> Difficulty {
        let mut difficulty = Difficulty::new().mods(self.mods.unwrap_or_default());

        if let Some(passed_objects) = self.passed_objects {
            difficulty = difficulty.passed_objects(passed_objects);
        }

        if let Some(clock_rate) = self.clock_rate {
            difficulty = difficulty.clock_rate(clock_rate);
        }

        difficulty
    }

    /// Create a performance calculator for the given attributes that uses
    /// these parameters.
    pub fn performance<'a>(&self, attrs: DifficultyAttributes) -> Performance<'a> {
        let mut perf = attrs
            .performance()
            .difficulty(self.difficulty())
            .hitresult_priority(self.hitresult_priority.unwrap_or_default());

        if let Some(acc) = self.accuracy {
            perf = perf.accuracy(acc * 100.0);
        }

        if let Some(n_geki) = self.n_geki {
            perf = perf.n_geki(n_geki);
        }

        if let Some(n300) = self.n300 {
            perf = perf.n300(n300);
        }

        if let Some(n_katu) = self.n_katu {
            perf = perf.n_katu(n_katu);
        }

        if let Some(n100) = self.n100 {
            perf = perf.n100(n100);
        }

        if let Some(n50) = self.n50 {
            perf = perf.n50(n50);
        }

        if let Some(misses) = self.misses {
            perf = perf.misses(misses);
        }

        if let Some(combo) = self.combo {
            perf = perf.combo(combo);
        }

        perf
    }

    fn given_state(&self) -> ScoreState {
        ScoreState {
            max_combo: 0,
            n_geki: self.n_geki.unwrap_or(0),
            n_katu: self.n_katu.unwrap_or(0),
            n300: self.n300.unwrap_or(0),
            n100: self.n100.unwrap_or(0),
            n50: self.n50.unwrap_or(0),
            misses: self.misses.unwrap_or(0),
        }
    }
}
