//! Game configuration.
//!
//! A game is configured once at creation:
//! - `seed`: drives the built-in dice source
//! - `first_color`: who rolls first
//! - `post_win`: what happens after the first colour brings all tokens home
//! - `auto_skip`: whether a roll with no legal move passes on its own

use serde::{Deserialize, Serialize};

use super::color::Color;

/// What the sequencer does once a colour has finished all four tokens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostWinPolicy {
    /// The game ends immediately; no further turns are issued.
    #[default]
    StopAtFirstWinner,
    /// Remaining colours keep playing until only one has tokens left,
    /// producing a full finishing order.
    PlayToCompletion,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for the built-in dice RNG.
    /// Same seed and same selections reproduce the same game.
    pub seed: u64,

    /// Colour that rolls first (default: Blue).
    pub first_color: Color,

    /// Behaviour after the first winner.
    pub post_win: PostWinPolicy,

    /// Pass the turn automatically when no token can move (default: true).
    /// When false, the caller must call `skip_turn`.
    pub auto_skip: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            first_color: Color::Blue,
            post_win: PostWinPolicy::StopAtFirstWinner,
            auto_skip: true,
        }
    }
}

impl GameConfig {
    /// Create a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the starting colour.
    #[must_use]
    pub fn with_first_color(mut self, color: Color) -> Self {
        self.first_color = color;
        self
    }

    /// Set the post-win policy.
    #[must_use]
    pub fn with_post_win(mut self, policy: PostWinPolicy) -> Self {
        self.post_win = policy;
        self
    }

    /// Enable or disable automatic skipping.
    #[must_use]
    pub fn with_auto_skip(mut self, auto_skip: bool) -> Self {
        self.auto_skip = auto_skip;
        self
    }
}
