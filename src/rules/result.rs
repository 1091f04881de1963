//! Final result of a game.

use serde::{Deserialize, Serialize};

use crate::core::{Color, GameState, PostWinPolicy};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// The game stopped at the first colour to bring all tokens home.
    Winner(Color),
    /// Full finishing order, first place first.
    Ranked(Vec<Color>),
}

impl GameResult {
    /// Result of a state, or `None` while the game continues.
    ///
    /// Under `PlayToCompletion` the game ends when at most one colour still
    /// has tokens out; that colour takes last place.
    #[must_use]
    pub fn from_state(state: &GameState, policy: PostWinPolicy) -> Option<Self> {
        match policy {
            PostWinPolicy::StopAtFirstWinner => state.winner().map(GameResult::Winner),
            PostWinPolicy::PlayToCompletion => {
                let order = state.finish_order();
                if order.len() + 1 < Color::ALL.len() {
                    return None;
                }
                let mut ranking = order.to_vec();
                ranking.extend(Color::ALL.into_iter().filter(|c| !order.contains(c)));
                Some(GameResult::Ranked(ranking))
            }
        }
    }

    /// The first-placed colour.
    #[must_use]
    pub fn winner(&self) -> Color {
        match self {
            GameResult::Winner(color) => *color,
            GameResult::Ranked(ranking) => ranking[0],
        }
    }

    /// Check if a colour won.
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        self.winner() == color
    }

    /// 1-based place of a colour, when known.
    #[must_use]
    pub fn place(&self, color: Color) -> Option<usize> {
        match self {
            GameResult::Winner(winner) => (*winner == color).then_some(1),
            GameResult::Ranked(ranking) => ranking.iter().position(|&c| c == color).map(|i| i + 1),
        }
    }
}
