//! Error type shared by the countdown search and the binaries.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PuzzleError>;

#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("invalid bag character {character:?} at index {index}")]
    InvalidBagCharacter { character: char, index: usize },

    #[error("no expression can be formed from a bag without digits")]
    NoCandidates,

    #[error("expression needs more than the {supplied} parameter(s) supplied")]
    ParamsExhausted { supplied: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
