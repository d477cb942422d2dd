use thiserror::Error;

/// Errors raised by piles, players, the board and the turn engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("index {index} is out of range (len {len})")]
    OutOfRange { index: usize, len: usize },
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("cannot draw from an empty pile")]
    Underflow,
    #[error("draw pile is empty and the discard pile has nothing to recycle")]
    Unrecoverable,
}
