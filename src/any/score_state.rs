use crate::{
    catch::CatchScoreState, mania::ManiaScoreState, model::mode::GameMode, osu::OsuScoreState,
    taiko::TaikoScoreState,
};

/// Hit results and combo of a score, independent of the mode.
///
/// The judgement fields are named after osu!standard. The other modes map
/// their judgements onto them:
///
/// | Field | osu!catch | osu!mania |
/// | - | - | - |
/// | `n_geki` | | n320 |
/// | `n_katu` | tiny droplet misses | n200 |
/// | `n300` | fruits | n300 |
/// | `n100` | droplets | n100 |
/// | `n50` | tiny droplets | n50 |
/// | `misses` | missed fruits and droplets | misses |
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreState {
    /// Highest combo the player reached, ignored for osu!mania.
    pub max_combo: u32,
    pub n_geki: u32,
    pub n_katu: u32,
    pub n300: u32,
    pub n100: u32,
    pub n50: u32,
    pub misses: u32,
}

impl ScoreState {
    pub const fn new() -> Self {
        Self {
            max_combo: 0,
            n_geki: 0,
            n_katu: 0,
            n300: 0,
            n100: 0,
            n50: 0,
            misses: 0,
        }
    }

    /// Sum of the judgements that count for `mode`.
    ///
    /// Summed as `u64` so that no combination of counts can overflow.
    pub const fn total_hits(&self, mode: GameMode) -> u64 {
        let mut amount = self.n300 as u64 + self.n100 as u64 + self.misses as u64;

        if !matches!(mode, GameMode::Taiko) {
            amount += self.n50 as u64;

            if !matches!(mode, GameMode::Osu) {
                amount += self.n_katu as u64;

                if matches!(mode, GameMode::Mania) {
                    amount += self.n_geki as u64;
                }
            }
        }

        amount
    }
}

/// Both directions of a mode's conversion, `ScoreState` fields on the left.
macro_rules! judgements {
    ( $state:ident { $( $generic:ident: $specific:ident ),+ $(,)? } ) => {
        impl From<ScoreState> for $state {
            fn from(state: ScoreState) -> Self {
                Self {
                    $( $specific: state.$generic, )+
                }
            }
        }

        impl From<$state> for ScoreState {
            fn from(state: $state) -> Self {
                Self {
                    $( $generic: state.$specific, )+
                    ..Self::new()
                }
            }
        }
    };
}

judgements!(OsuScoreState {
    max_combo: max_combo,
    n300: n300,
    n100: n100,
    n50: n50,
    misses: misses,
});

judgements!(TaikoScoreState {
    max_combo: max_combo,
    n300: n300,
    n100: n100,
    misses: misses,
});

judgements!(CatchScoreState {
    max_combo: max_combo,
    n300: fruits,
    n100: droplets,
    n50: tiny_droplets,
    n_katu: tiny_droplet_misses,
    misses: misses,
});

judgements!(ManiaScoreState {
    n_geki: n320,
    n300: n300,
    n_katu: n200,
    n100: n100,
    n50: n50,
    misses: misses,
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_hits_per_mode() {
        let state = ScoreState {
            max_combo: 10,
            n_geki: 1,
            n_katu: 2,
            n300: 3,
            n100: 4,
            n50: 5,
            misses: 6,
        };

        assert_eq!(state.total_hits(GameMode::Osu), 18);
        assert_eq!(state.total_hits(GameMode::Taiko), 13);
        assert_eq!(state.total_hits(GameMode::Catch), 20);
        assert_eq!(state.total_hits(GameMode::Mania), 21);
    }

    #[test]
    fn total_hits_do_not_overflow() {
        let state = ScoreState {
            n300: u32::MAX,
            misses: 1,
            ..ScoreState::new()
        };

        assert_eq!(state.total_hits(GameMode::Osu), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn catch_judgements_keep_their_slots() {
        let catch = CatchScoreState {
            max_combo: 50,
            fruits: 40,
            droplets: 10,
            tiny_droplets: 30,
            tiny_droplet_misses: 2,
            misses: 1,
        };

        let state = ScoreState::from(catch.clone());
        assert_eq!((state.n300, state.n100, state.n50, state.n_katu), (40, 10, 30, 2));
        assert_eq!(CatchScoreState::from(state), catch);
    }
}
