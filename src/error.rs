use thiserror::Error;

/// Failures at the text and construction boundaries of the engine.
///
/// Rejected moves and selections are not errors; the game simply ignores them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A square was not written as `row,col` with both values in 0..8
    #[error("Invalid square: {0:?} (expected row,col with values 0-7)")]
    InvalidSquare(String),

    /// The position built by hand breaks a board invariant
    #[error("The position did not pass sanity checks: {0}")]
    InvalidPosition(String),

    /// The console received a command it does not know
    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),
}
