use fraction::Fraction;
use thiserror::Error;

use crate::notation::NotationError;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Can not render duration {0}: numerator is not a simple, dotted or tied length")]
    UnrepresentableDuration(Fraction),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Position {0} lies before the start of the time map")]
    PositionOutOfTimeMap(Fraction),
    #[error("Can not build TimeMap from empty list of measures")]
    EmptyTimeMap,
    #[error("Staff {0} is out of range: only staves 1 and 2 are supported")]
    StaffOutOfRange(u32),
    #[error("More than one voice on a single staff is not supported: {voices:?}")]
    MultipleVoices { voices: Vec<u32> },
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("Can not parse render settings: {0}")]
    Settings(#[from] toml::de::Error),
}
pub type ScoreResult<T> = Result<T, ScoreError>;
