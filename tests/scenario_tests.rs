//! Rule scenarios: entry, lane entry, finishing, overshoot and captures.
//!
//! Each scenario is checked twice: against the bare rules functions, and
//! through `LudoGame` restored from a prepared position.

use ludo_engine::board::{BoardCell, BoardTopology, LaneCell, FINISH_PROGRESS, YARD_PROGRESS};
use ludo_engine::core::{
    Color, Dice, GameConfig, GameState, MoveError, MoveLog, OutcomeKind, ScriptedDice, TokenId,
};
use ludo_engine::rules::apply_move;
use ludo_engine::turn::{LudoGame, RollOutcome};

fn dice(v: u8) -> Dice {
    Dice::new(v).unwrap()
}

/// Ring-local progress that puts `color` on global `cell`.
fn progress_at(board: &BoardTopology, color: Color, cell: u8) -> i8 {
    ((cell as i16 - board.entry_offset(color) as i16).rem_euclid(52)) as i8
}

/// A game resumed from `state`, with `color` to move.
fn game_at(mut state: GameState, color: Color) -> LudoGame<ScriptedDice, MoveLog> {
    state.active_color = color;
    let bytes = state.to_bytes().unwrap();
    LudoGame::restore(GameConfig::default(), &bytes, ScriptedDice::default(), MoveLog::new()).unwrap()
}

// =============================================================================
// Scenario A: entry
// =============================================================================

#[test]
fn test_scenario_a_enter_on_six() {
    let board = BoardTopology::classic();

    for color in Color::ALL {
        let mut state = GameState::new(color);
        let outcome = apply_move(&mut state, &board, color, 0, dice(6)).unwrap();

        assert_eq!(outcome.kind, OutcomeKind::Entered);
        assert_eq!(state.progress(color, 0), 0);
        assert_eq!(board.ring_cell(color, 0), Some(board.entry_offset(color)));
    }
}

#[test]
fn test_scenario_a_through_game() {
    let mut game = game_at(GameState::new(Color::Green), Color::Green);

    game.roll_with(Color::Green, 6).unwrap();
    game.select_token(Color::Green, 3).unwrap();

    assert_eq!(game.current_board_cell(Color::Green, 3), BoardCell::Ring(29));
}

#[test]
fn test_yard_entry_needs_six() {
    let board = BoardTopology::classic();

    for v in 1..=5 {
        let mut state = GameState::new(Color::Blue);
        assert_eq!(
            apply_move(&mut state, &board, Color::Blue, 0, dice(v)),
            Err(MoveError::NeedsSixToLeaveYard)
        );
        assert_eq!(state.progress(Color::Blue, 0), YARD_PROGRESS);
    }
}

// =============================================================================
// Scenario B: ring into lane
// =============================================================================

#[test]
fn test_scenario_b_ring_to_lane() {
    let board = BoardTopology::classic();
    let mut state = GameState::new(Color::Red);
    state.tokens.set(Color::Red, 0, 49);

    let outcome = apply_move(&mut state, &board, Color::Red, 0, dice(3)).unwrap();

    assert_eq!(outcome.kind, OutcomeKind::EnteredLane);
    assert_eq!(state.progress(Color::Red, 0), 52);
    assert_eq!(
        board.board_cell(Color::Red, 0, 52),
        BoardCell::Lane(LaneCell { color: Color::Red, index: 0 })
    );
}

// =============================================================================
// Scenarios C and D: exact finish and overshoot
// =============================================================================

#[test]
fn test_scenario_c_exact_finish() {
    let board = BoardTopology::classic();
    let mut state = GameState::new(Color::Yellow);
    state.tokens.set(Color::Yellow, 2, 52 + 4);

    let outcome = apply_move(&mut state, &board, Color::Yellow, 2, dice(1)).unwrap();

    assert_eq!(outcome.kind, OutcomeKind::Finished);
    assert_eq!(state.progress(Color::Yellow, 2), FINISH_PROGRESS);
    assert_eq!(state.finished_count(Color::Yellow), 1);
    assert_eq!(board.board_cell(Color::Yellow, 2, FINISH_PROGRESS), BoardCell::Finished);
}

#[test]
fn test_scenario_d_overshoot_rejected() {
    let board = BoardTopology::classic();
    let mut state = GameState::new(Color::Yellow);
    state.tokens.set(Color::Yellow, 2, 52 + 4);
    let before = state.clone();

    assert_eq!(
        apply_move(&mut state, &board, Color::Yellow, 2, dice(2)),
        Err(MoveError::Overshoot)
    );
    assert_eq!(state, before);
}

#[test]
fn test_scenario_d_through_game() {
    let mut state = GameState::new(Color::Blue);
    state.tokens.set(Color::Blue, 0, 56);
    state.tokens.set(Color::Blue, 1, 10);
    let mut game = game_at(state, Color::Blue);

    match game.roll_with(Color::Blue, 2).unwrap() {
        RollOutcome::AwaitingSelection { eligible, .. } => assert_eq!(eligible.as_slice(), &[1]),
        other => panic!("expected selection, got {other:?}"),
    }

    let before = game.state().clone();
    assert_eq!(game.select_token(Color::Blue, 0), Err(MoveError::Overshoot));
    assert_eq!(game.select_token(Color::Blue, 2), Err(MoveError::NeedsSixToLeaveYard));
    assert_eq!(game.state(), &before);
    assert!(game.sink().is_empty());
}

// =============================================================================
// Scenarios E and F: captures
// =============================================================================

#[test]
fn test_scenario_e_capture() {
    let board = BoardTopology::classic();
    let mut state = GameState::new(Color::Green);
    let cell = 45;
    assert!(!board.is_safe(cell));

    state.tokens.set(Color::Blue, 3, progress_at(&board, Color::Blue, cell));
    state.tokens.set(Color::Green, 1, progress_at(&board, Color::Green, cell) - 5);

    let outcome = apply_move(&mut state, &board, Color::Green, 1, dice(5)).unwrap();

    assert_eq!(outcome.captured.as_slice(), &[TokenId::new(Color::Blue, 3)]);
    assert_eq!(state.progress(Color::Blue, 3), YARD_PROGRESS);
}

#[test]
fn test_scenario_e_capture_is_recorded() {
    let board = BoardTopology::classic();
    let cell = 45;
    let mut state = GameState::new(Color::Green);
    state.tokens.set(Color::Blue, 3, progress_at(&board, Color::Blue, cell));
    state.tokens.set(Color::Green, 1, progress_at(&board, Color::Green, cell) - 5);
    let mut game = game_at(state, Color::Green);

    game.roll_with(Color::Green, 5).unwrap();
    let resolution = game.select_token(Color::Green, 1).unwrap();

    assert_eq!(resolution.record.kind, OutcomeKind::Advanced);
    assert_eq!(resolution.record.captured.as_slice(), &[TokenId::new(Color::Blue, 3)]);
    assert_eq!(game.sink().captures().count(), 1);
    assert!(matches!(
        game.current_board_cell(Color::Blue, 3),
        BoardCell::Yard(_)
    ));
}

#[test]
fn test_scenario_f_entry_cell_is_safe() {
    let board = BoardTopology::classic();

    for owner in Color::ALL {
        let cell = board.entry_offset(owner);
        let mover = owner.next();
        let victim = mover.next();

        let mut state = GameState::new(mover);
        state.tokens.set(victim, 0, progress_at(&board, victim, cell));
        let start = progress_at(&board, mover, cell) - 4;
        assert!(start >= 0);
        state.tokens.set(mover, 0, start);

        let outcome = apply_move(&mut state, &board, mover, 0, dice(4)).unwrap();

        assert!(outcome.captured.is_empty());
        assert_eq!(state.progress(victim, 0), progress_at(&board, victim, cell));
    }
}

#[test]
fn test_fixed_safe_cells_block_capture() {
    let board = BoardTopology::classic();

    for cell in [1u8, 9, 14, 22, 27, 35, 40, 48] {
        let mut state = GameState::new(Color::Blue);
        let red = progress_at(&board, Color::Red, cell);
        let blue = progress_at(&board, Color::Blue, cell);
        if blue < 1 {
            continue;
        }
        state.tokens.set(Color::Red, 0, red);
        state.tokens.set(Color::Blue, 0, blue - 1);

        let outcome = apply_move(&mut state, &board, Color::Blue, 0, dice(1)).unwrap();

        assert!(outcome.captured.is_empty(), "capture on safe cell {cell}");
        assert_eq!(state.progress(Color::Red, 0), red);
    }
}
