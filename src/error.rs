use crate::{
    any::ScoreParametersError,
    model::{beatmap::ParseError, mode::ConvertError, mods::ModConflict},
};

/// Everything that can make a calculation fail.
///
/// Maps without hitobjects are not an error; they produce zeroed attributes.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CalculateError {
    #[error("failed to parse beatmap")]
    Parse(#[from] ParseError),
    #[error("unsupported mode")]
    UnsupportedMode(#[from] ConvertError),
    #[error("invalid mod combination")]
    InvalidModCombination(#[from] ModConflict),
    #[error("invalid score parameters")]
    InvalidScoreParameters(#[from] ScoreParametersError),
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::model::{mode::GameMode, mods::GameMods};

    use super::*;

    #[test]
    fn sources_are_kept() {
        let err = CalculateError::from(ConvertError::UnsupportedMode {
            from: GameMode::Taiko,
            to: GameMode::Mania,
        });

        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("cannot convert taiko beatmap to mania"));

        let err = CalculateError::from(ModConflict {
            a: GameMods::DT,
            b: GameMods::HT,
        });

        assert!(matches!(err, CalculateError::InvalidModCombination(_)));
    }
}
