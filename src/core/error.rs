//! Error types.
//!
//! Every `MoveError` is a local, recoverable rejection: the command that
//! produced it left the game state untouched. Broken engine invariants are
//! not errors; they panic.

use thiserror::Error;

use super::color::Color;

/// A rejected roll, selection or skip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("it is {expected}'s turn, not {got}'s")]
    WrongPlayer { expected: Color, got: Color },

    #[error("no dice value has been rolled for this turn")]
    NotRolled,

    #[error("dice already rolled; select a token or skip")]
    AlreadyRolled,

    #[error("token has already finished")]
    TokenFinished,

    #[error("a 6 is needed to leave the yard")]
    NeedsSixToLeaveYard,

    #[error("move would overshoot the finish cell")]
    Overshoot,

    #[error("invalid dice value {0} (expected 1-6)")]
    InvalidDice(u8),

    #[error("token cannot be moved with the current roll")]
    IllegalMove,

    #[error("cannot skip while a token can move")]
    MovesAvailable,

    #[error("the game is over")]
    GameOver,

    #[error("replayed segment {turn}.{sequence} does not match its record")]
    ReplayMismatch { turn: u32, sequence: u32 },
}

/// Failure restoring a `GameState` snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::Error),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] bincode::Error),

    #[error("corrupt snapshot: {0}")]
    Corrupt(&'static str),
}

/// Failure reported by a move record sink.
///
/// Sinks are notified after a transition commits, so these are logged by the
/// engine and never undo the move.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("move record sink failed: {0}")]
pub struct SinkError(pub String);
