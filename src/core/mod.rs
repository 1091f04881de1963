//! Core engine types: colours, tokens, state, dice, records, configuration
//! and errors.

pub mod color;
pub mod config;
pub mod error;
pub mod record;
pub mod rng;
pub mod state;

pub use color::{Color, ColorMap, COLOR_COUNT};
pub use config::{GameConfig, PostWinPolicy};
pub use error::{MoveError, SinkError, SnapshotError};
pub use record::{CaptureList, MoveLog, MoveRecord, MoveRecordSink, NullSink, OutcomeKind};
pub use rng::{Dice, DiceSource, GameRng, GameRngState, ScriptedDice};
pub use state::{GameState, GameStatus, PlayerState, TokenId, TokenStore, TurnPhase};
