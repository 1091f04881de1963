//! Game state: token progress, per-colour bookkeeping, turn phase and history.
//!
//! ## TokenStore
//!
//! Plain container of every token's progress value. No rules live here.
//!
//! ## GameState
//!
//! Complete game state:
//! - Token progress and finished counts per colour
//! - Active colour, turn phase, turn/segment counters
//! - Finishing order (the first entry is the winner)
//! - Move history for replay
//!
//! Only the rules executor and the turn sequencer mutate it.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::color::{Color, ColorMap};
use super::error::SnapshotError;
use super::record::MoveRecord;
use super::rng::Dice;
use crate::board::{FINISH_PROGRESS, TOKENS_PER_COLOR, YARD_PROGRESS};

/// Identifies one token: a colour and an index in `0..4`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId {
    pub color: Color,
    pub index: u8,
}

impl TokenId {
    #[must_use]
    pub const fn new(color: Color, index: u8) -> Self {
        Self { color, index }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} token {}", self.color, self.index + 1)
    }
}

/// One colour's tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Progress per token: -1 yard, 0..52 ring, 52..57 lane, 57 finished.
    pub tokens: [i8; TOKENS_PER_COLOR],

    /// Tokens on the finish cell. Never decreases.
    pub finished_count: u8,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            tokens: [YARD_PROGRESS; TOKENS_PER_COLOR],
            finished_count: 0,
        }
    }
}

impl PlayerState {
    /// Whether all four tokens are home.
    #[must_use]
    pub fn all_finished(&self) -> bool {
        self.finished_count as usize == TOKENS_PER_COLOR
    }
}

/// Progress values of every token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStore {
    players: ColorMap<PlayerState>,
}

impl TokenStore {
    /// All tokens in their yards.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress of one token.
    #[must_use]
    pub fn get(&self, color: Color, token_index: u8) -> i8 {
        self.players[color].tokens[token_index as usize]
    }

    /// Overwrite the progress of one token.
    pub fn set(&mut self, color: Color, token_index: u8, value: i8) {
        self.players[color].tokens[token_index as usize] = value;
    }

    /// `(token_index, progress)` for each of a colour's tokens.
    pub fn all_tokens(&self, color: Color) -> impl Iterator<Item = (u8, i8)> + '_ {
        self.players[color]
            .tokens
            .iter()
            .enumerate()
            .map(|(i, &p)| (i as u8, p))
    }

    #[must_use]
    pub fn player(&self, color: Color) -> &PlayerState {
        &self.players[color]
    }

    pub fn player_mut(&mut self, color: Color) -> &mut PlayerState {
        &mut self.players[color]
    }
}

/// Where the current turn segment stands.
///
/// `Rolled` and `Resolved` only exist inside a single sequencer call; between
/// calls the game rests in `AwaitingRoll`, `AwaitingSelection` or `GameOver`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The active colour must roll.
    AwaitingRoll,
    /// A value was drawn; eligibility not yet evaluated.
    Rolled { dice: Dice },
    /// The active colour must pick a token (or skip when none can move).
    AwaitingSelection { dice: Dice },
    /// The segment committed; deciding who rolls next.
    Resolved { dice: Dice },
    /// No further turns are issued.
    GameOver,
}

impl TurnPhase {
    /// The dice value held by this phase, if any.
    #[must_use]
    pub fn dice(self) -> Option<Dice> {
        match self {
            TurnPhase::Rolled { dice }
            | TurnPhase::AwaitingSelection { dice }
            | TurnPhase::Resolved { dice } => Some(dice),
            TurnPhase::AwaitingRoll | TurnPhase::GameOver => None,
        }
    }
}

/// Coarse status, as shown in game listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Finished,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Token progress per colour.
    pub tokens: TokenStore,

    /// Colour whose turn it is.
    pub active_color: Color,

    /// Current turn phase.
    pub phase: TurnPhase,

    /// Turn number (starts at 1, increments when the turn passes).
    pub turn_number: u32,

    /// Segment within the current turn (starts at 0, increments on each 6).
    pub segment: u32,

    /// Colours in the order they finished all four tokens.
    finish_order: Vec<Color>,

    /// Every committed segment, oldest first.
    pub history: Vector<MoveRecord>,
}

impl GameState {
    /// Fresh game: every token in its yard, `first` to roll.
    #[must_use]
    pub fn new(first: Color) -> Self {
        Self {
            tokens: TokenStore::new(),
            active_color: first,
            phase: TurnPhase::AwaitingRoll,
            turn_number: 1,
            segment: 0,
            finish_order: Vec::new(),
            history: Vector::new(),
        }
    }

    /// Progress of one token.
    #[must_use]
    pub fn progress(&self, color: Color, token_index: u8) -> i8 {
        self.tokens.get(color, token_index)
    }

    /// Tokens of `color` on the finish cell.
    #[must_use]
    pub fn finished_count(&self, color: Color) -> u8 {
        self.tokens.player(color).finished_count
    }

    /// Count one more finished token for `color`.
    ///
    /// Returns the new count and appends `color` to the finishing order when
    /// it reaches four.
    pub fn record_finish(&mut self, color: Color) -> u8 {
        let player = self.tokens.player_mut(color);
        assert!(
            !player.all_finished(),
            "{color} already has every token finished"
        );
        player.finished_count += 1;
        let count = player.finished_count;

        if count as usize == TOKENS_PER_COLOR {
            self.finish_order.push(color);
        }
        count
    }

    /// The first colour to finish all tokens.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        self.finish_order.first().copied()
    }

    /// Colours that have finished all tokens, in finishing order.
    #[must_use]
    pub fn finish_order(&self) -> &[Color] {
        &self.finish_order
    }

    /// Whether `color` has every token home.
    #[must_use]
    pub fn has_finished(&self, color: Color) -> bool {
        self.tokens.player(color).all_finished()
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.phase == TurnPhase::GameOver {
            GameStatus::Finished
        } else {
            GameStatus::Ongoing
        }
    }

    // === Invariants ===

    /// Check the structural invariants of the state.
    ///
    /// - every progress value is in `-1..=57`
    /// - each finished count matches its tokens on the finish cell
    /// - the finishing order lists exactly the colours with four finished tokens
    /// - a resting state is never in a transient phase
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        for color in Color::ALL {
            let player = self.tokens.player(color);
            if player
                .tokens
                .iter()
                .any(|&p| !(YARD_PROGRESS..=FINISH_PROGRESS).contains(&p))
            {
                return Err("token progress out of range");
            }

            let on_finish = player.tokens.iter().filter(|&&p| p == FINISH_PROGRESS).count();
            if on_finish != player.finished_count as usize {
                return Err("finished count does not match tokens on the finish cell");
            }

            if player.all_finished() != self.finish_order.contains(&color) {
                return Err("finishing order does not match finished colours");
            }
        }

        let mut seen = self.finish_order.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.finish_order.len() {
            return Err("colour listed twice in finishing order");
        }

        if matches!(self.phase, TurnPhase::Rolled { .. } | TurnPhase::Resolved { .. }) {
            return Err("transient turn phase in a resting state");
        }

        if self.turn_number == 0 {
            return Err("turn number starts at 1");
        }

        Ok(())
    }

    // === Snapshots ===

    /// Encode the state as a compact binary snapshot.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    /// Decode a snapshot, rejecting states that break the invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let state: GameState = bincode::deserialize(bytes)?;
        state.check_invariants().map_err(SnapshotError::Corrupt)?;
        Ok(state)
    }
}
