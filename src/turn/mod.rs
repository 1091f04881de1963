//! Turn sequencing and the game façade.

pub mod sequencer;

pub use sequencer::{LudoGame, NextTurn, RollOutcome, TurnResolution};
