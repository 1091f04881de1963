//! Game rules: move validation, move execution and game results.
//!
//! These are plain functions over `GameState`; the turn sequencer is the
//! only caller in normal play, but they are usable on their own for
//! analysis and tests.

pub mod executor;
pub mod result;
pub mod validator;

pub use executor::{apply_move, MoveOutcome};
pub use result::GameResult;
pub use validator::{check_move, eligible_moves, has_any_eligible_move, EligibleSet};
