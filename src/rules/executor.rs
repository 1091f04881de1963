//! Move execution: commit one validated move.
//!
//! Only the moved token and any captured tokens are touched. Captures happen
//! on the shared ring only; yards and lanes are private per colour.

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::board::{BoardTopology, FINISH_PROGRESS, LANE_START_PROGRESS, TOKENS_PER_COLOR, YARD_PROGRESS};
use crate::core::{CaptureList, Color, Dice, GameState, MoveError, OutcomeKind, TokenId};

use super::validator::check_move;

/// What a committed move did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The token that moved.
    pub token: TokenId,

    pub kind: OutcomeKind,

    /// Progress of the moved token after the move.
    pub progress: i8,

    /// Opposing tokens sent back to their yards.
    pub captured: CaptureList,

    /// Set when this move brought the colour's fourth token home.
    pub game_won: Option<Color>,
}

impl MoveOutcome {
    /// Whether the move finished a token.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.kind == OutcomeKind::Finished
    }
}

/// Apply a move for `color`'s token `token_index`.
///
/// The token must be eligible for `dice`; otherwise the reason is returned
/// and nothing is mutated.
pub fn apply_move(
    state: &mut GameState,
    topology: &BoardTopology,
    color: Color,
    token_index: u8,
    dice: Dice,
) -> Result<MoveOutcome, MoveError> {
    check_move(state, color, token_index, dice)?;

    let token = TokenId::new(color, token_index);
    let current = state.progress(color, token_index);

    let target = if current == YARD_PROGRESS {
        0
    } else {
        current + dice.value() as i8
    };
    debug_assert!(target <= FINISH_PROGRESS);
    state.tokens.set(color, token_index, target);

    let mut captured = CaptureList::new();
    let mut game_won = None;

    let kind = if current == YARD_PROGRESS {
        // Entry cells are safe, so entering never captures.
        debug_assert!(topology.is_safe(topology.global_cell(color, 0)));
        OutcomeKind::Entered
    } else if target == FINISH_PROGRESS {
        let count = state.record_finish(color);
        if count as usize == TOKENS_PER_COLOR {
            info!(%color, "all tokens home");
            game_won = Some(color);
        }
        OutcomeKind::Finished
    } else if target >= LANE_START_PROGRESS {
        OutcomeKind::EnteredLane
    } else {
        captured = resolve_captures(state, topology, color, target as u8);
        OutcomeKind::Advanced
    };

    debug!(%token, ?kind, from = current, to = target, captures = captured.len(), "move applied");

    Ok(MoveOutcome {
        token,
        kind,
        progress: target,
        captured,
        game_won,
    })
}

/// Send every opposing ring token on the mover's cell back to its yard,
/// unless the cell is safe.
fn resolve_captures(
    state: &mut GameState,
    topology: &BoardTopology,
    mover: Color,
    ring_local: u8,
) -> CaptureList {
    let cell = topology.global_cell(mover, ring_local);
    if topology.is_safe(cell) {
        return SmallVec::new();
    }

    let tokens = &state.tokens;
    let victims: CaptureList = mover
        .opponents()
        .flat_map(move |other| {
            tokens
                .all_tokens(other)
                .filter(move |&(_, p)| topology.ring_cell(other, p) == Some(cell))
                .map(move |(i, _)| TokenId::new(other, i))
        })
        .collect();

    for victim in &victims {
        state.tokens.set(victim.color, victim.index, YARD_PROGRESS);
        info!(%mover, %victim, cell, "captured");
    }

    victims
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(v: u8) -> Dice {
        Dice::new(v).unwrap()
    }

    /// Ring-local progress that puts `color` on global `cell`.
    fn progress_at(board: &BoardTopology, color: Color, cell: u8) -> i8 {
        ((cell as i16 - board.entry_offset(color) as i16).rem_euclid(52)) as i8
    }

    #[test]
    fn test_enter_from_yard() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Red);

        let outcome = apply_move(&mut state, &board, Color::Red, 1, dice(6)).unwrap();

        assert_eq!(outcome.kind, OutcomeKind::Entered);
        assert_eq!(outcome.progress, 0);
        assert_eq!(state.progress(Color::Red, 1), 0);
        assert!(outcome.captured.is_empty());
    }

    #[test]
    fn test_ring_to_lane() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        state.tokens.set(Color::Blue, 0, 49);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(3)).unwrap();

        assert_eq!(outcome.kind, OutcomeKind::EnteredLane);
        assert_eq!(state.progress(Color::Blue, 0), 52);
    }

    #[test]
    fn test_finish_increments_count() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        state.tokens.set(Color::Blue, 0, 56);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(1)).unwrap();

        assert!(outcome.finished());
        assert_eq!(outcome.game_won, None);
        assert_eq!(state.finished_count(Color::Blue), 1);
    }

    #[test]
    fn test_fourth_finish_wins() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        for i in 0..3 {
            state.tokens.set(Color::Yellow, i, FINISH_PROGRESS);
            state.record_finish(Color::Yellow);
        }
        state.tokens.set(Color::Yellow, 3, 53);

        let outcome = apply_move(&mut state, &board, Color::Yellow, 3, dice(4)).unwrap();

        assert_eq!(outcome.game_won, Some(Color::Yellow));
        assert_eq!(state.winner(), Some(Color::Yellow));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_rejected_move_does_not_mutate() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        state.tokens.set(Color::Blue, 2, 56);
        let before = state.clone();

        assert_eq!(
            apply_move(&mut state, &board, Color::Blue, 2, dice(2)),
            Err(MoveError::Overshoot)
        );
        assert_eq!(
            apply_move(&mut state, &board, Color::Blue, 0, dice(5)),
            Err(MoveError::NeedsSixToLeaveYard)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_capture_on_unsafe_cell() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        let cell = 20;
        assert!(!board.is_safe(cell));

        state.tokens.set(Color::Red, 2, progress_at(&board, Color::Red, cell));
        state.tokens.set(Color::Blue, 0, progress_at(&board, Color::Blue, cell) - 4);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(4)).unwrap();

        assert_eq!(outcome.kind, OutcomeKind::Advanced);
        assert_eq!(outcome.captured.as_slice(), &[TokenId::new(Color::Red, 2)]);
        assert_eq!(state.progress(Color::Red, 2), YARD_PROGRESS);
    }

    #[test]
    fn test_capture_takes_whole_stack() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        let cell = 33;
        assert!(!board.is_safe(cell));

        state.tokens.set(Color::Green, 0, progress_at(&board, Color::Green, cell));
        state.tokens.set(Color::Green, 3, progress_at(&board, Color::Green, cell));
        state.tokens.set(Color::Yellow, 1, progress_at(&board, Color::Yellow, cell));
        state.tokens.set(Color::Red, 1, progress_at(&board, Color::Red, cell) - 2);

        let outcome = apply_move(&mut state, &board, Color::Red, 1, dice(2)).unwrap();

        assert_eq!(outcome.captured.len(), 3);
        assert_eq!(state.progress(Color::Green, 0), YARD_PROGRESS);
        assert_eq!(state.progress(Color::Green, 3), YARD_PROGRESS);
        assert_eq!(state.progress(Color::Yellow, 1), YARD_PROGRESS);
    }

    #[test]
    fn test_no_capture_on_safe_cell() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        let cell = board.entry_offset(Color::Green);

        state.tokens.set(Color::Yellow, 0, progress_at(&board, Color::Yellow, cell));
        state.tokens.set(Color::Blue, 0, progress_at(&board, Color::Blue, cell) - 5);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(5)).unwrap();

        assert!(outcome.captured.is_empty());
        assert_ne!(state.progress(Color::Yellow, 0), YARD_PROGRESS);
    }

    #[test]
    fn test_own_tokens_stack_without_capture() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        state.tokens.set(Color::Blue, 0, 10);
        state.tokens.set(Color::Blue, 1, 7);

        let outcome = apply_move(&mut state, &board, Color::Blue, 1, dice(3)).unwrap();

        assert!(outcome.captured.is_empty());
        assert_eq!(state.progress(Color::Blue, 0), 10);
        assert_eq!(state.progress(Color::Blue, 1), 10);
    }

    #[test]
    fn test_lane_tokens_are_never_captured() {
        let board = BoardTopology::classic();
        let mut state = GameState::new(Color::Blue);
        // Red lane token, and a Blue mover landing on the global cell that
        // the same progress value would map to if lanes were shared.
        state.tokens.set(Color::Red, 0, 53);
        state.tokens.set(Color::Blue, 0, 20);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(1)).unwrap();

        assert!(outcome.captured.is_empty());
        assert_eq!(state.progress(Color::Red, 0), 53);
    }
}
