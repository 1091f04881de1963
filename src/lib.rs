//! # ludo-engine
//!
//! A rules engine for four-player Ludo, independent of any UI.
//!
//! ## Design Principles
//!
//! 1. **One Authoritative State**: `LudoGame` owns the `GameState`. Callers
//!    read it and issue commands; nothing else mutates it.
//!
//! 2. **Abstract Positions**: Tokens carry a single progress counter
//!    (`-1` yard, `0..52` ring, `52..57` home lane, `57` finished).
//!    Rendering maps `BoardCell`s to pixels; the engine never does.
//!
//! 3. **Explicit Transitions**: Every command returns `Result`; a rejected
//!    command leaves the state exactly as it was.
//!
//! ## Architecture
//!
//! - **Deterministic Dice**: ChaCha8-backed `GameRng` behind the
//!   `DiceSource` trait, so games are reproducible and replayable.
//!
//! - **Persistent History**: Move records live in an `im::Vector`, making
//!   state clones O(1).
//!
//! - **Pluggable Persistence**: Records are pushed to a `MoveRecordSink`
//!   after each committed segment.
//!
//! ## Modules
//!
//! - `core`: Colours, tokens, state, dice, records, configuration, errors
//! - `board`: Ring, lanes, yards and safe cells
//! - `rules`: Move validation, execution and game results
//! - `turn`: Turn sequencing and the `LudoGame` façade
//! - `agents`: Automated players and playouts

pub mod core;
pub mod board;
pub mod rules;
pub mod turn;
pub mod agents;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap,
    Dice, DiceSource, GameRng, GameRngState, ScriptedDice,
    GameConfig, PostWinPolicy,
    GameState, GameStatus, TokenId, TurnPhase,
    MoveRecord, MoveRecordSink, MoveLog, NullSink, OutcomeKind,
    MoveError, SinkError, SnapshotError,
};

pub use crate::board::{BoardCell, BoardTopology, LaneCell, YardSlot};

pub use crate::rules::{GameResult, MoveOutcome};

pub use crate::turn::{LudoGame, NextTurn, RollOutcome, TurnResolution};

pub use crate::agents::{
    play_out, random_playout, GreedyPolicy, PlayoutConfig, PlayoutStats, RandomPolicy,
    TokenPolicy,
};
