//! Move validation: which tokens may move for a given roll.
//!
//! Per token:
//! 1. a finished token never moves;
//! 2. a yard token moves only on a 6;
//! 3. a token in play moves iff `progress + dice` does not pass the finish
//!    cell. Only an exact roll finishes; turning from the ring into the lane
//!    needs no special case because progress is one monotonic counter.

use smallvec::SmallVec;

use crate::board::{FINISH_PROGRESS, TOKENS_PER_COLOR, YARD_PROGRESS};
use crate::core::{Color, Dice, GameState, MoveError};

/// Token indices that may move, ascending.
pub type EligibleSet = SmallVec<[u8; TOKENS_PER_COLOR]>;

/// Check one token against a roll, reporting why it cannot move.
pub fn check_move(
    state: &GameState,
    color: Color,
    token_index: u8,
    dice: Dice,
) -> Result<(), MoveError> {
    if token_index as usize >= TOKENS_PER_COLOR {
        return Err(MoveError::IllegalMove);
    }

    match state.progress(color, token_index) {
        FINISH_PROGRESS => Err(MoveError::TokenFinished),
        YARD_PROGRESS if dice.is_six() => Ok(()),
        YARD_PROGRESS => Err(MoveError::NeedsSixToLeaveYard),
        p if p + dice.value() as i8 > FINISH_PROGRESS => Err(MoveError::Overshoot),
        _ => Ok(()),
    }
}

/// Every token of `color` that may move with `dice`.
#[must_use]
pub fn eligible_moves(state: &GameState, color: Color, dice: Dice) -> EligibleSet {
    (0..TOKENS_PER_COLOR as u8)
        .filter(|&i| check_move(state, color, i, dice).is_ok())
        .collect()
}

/// Whether any token of `color` may move with `dice`.
#[must_use]
pub fn has_any_eligible_move(state: &GameState, color: Color, dice: Dice) -> bool {
    (0..TOKENS_PER_COLOR as u8).any(|i| check_move(state, color, i, dice).is_ok())
}
