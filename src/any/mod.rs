pub use self::{
    attributes::{DifficultyAttributes, PerformanceAttributes},
    difficulty::Difficulty,
    performance::{into::IntoPerformance, HitResultPriority, Performance},
    score_params::{ScoreParameters, ScoreParametersError},
    score_state::ScoreState,
};

mod attributes;
pub(crate) mod difficulty;
pub(crate) mod performance;
mod score_params;
mod score_state;
