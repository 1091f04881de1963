//! Whole-game playouts driven by token policies.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::{Color, ColorMap, DiceSource, GameConfig, MoveError, MoveRecordSink, PostWinPolicy};
use crate::rules::GameResult;
use crate::turn::{LudoGame, RollOutcome, TurnResolution};

use super::policy::{RandomPolicy, TokenPolicy};

/// Configuration for automated playouts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoutConfig {
    /// Segment limit; a playout stopping here is reported as truncated.
    pub max_segments: u32,

    /// Seed for dice and random policies.
    pub seed: u64,

    pub post_win: PostWinPolicy,
}

impl Default for PlayoutConfig {
    fn default() -> Self {
        Self {
            max_segments: 20_000,
            seed: 0,
            post_win: PostWinPolicy::StopAtFirstWinner,
        }
    }
}

impl PlayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segment limit.
    pub fn with_max_segments(mut self, max: u32) -> Self {
        self.max_segments = max;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set what happens after the first colour finishes.
    pub fn with_post_win(mut self, policy: PostWinPolicy) -> Self {
        self.post_win = policy;
        self
    }

    /// Game configuration for a playout with this seed.
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new()
            .with_seed(self.seed)
            .with_post_win(self.post_win)
    }
}

/// What happened during a playout.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayoutStats {
    /// `None` if the playout was truncated.
    pub result: Option<GameResult>,

    pub segments: u32,
    pub moves: u32,
    pub skips: u32,

    /// Captures made, per capturing colour.
    pub captures: ColorMap<u32>,

    /// Hit `max_segments` before the game ended.
    pub truncated: bool,
}

impl PlayoutStats {
    /// The first-placed colour, if the game ended.
    pub fn winner(&self) -> Option<Color> {
        self.result.as_ref().map(GameResult::winner)
    }

    /// Total captures across all colours.
    pub fn total_captures(&self) -> u32 {
        self.captures.iter().map(|(_, &n)| n).sum()
    }

    fn observe(&mut self, resolution: &TurnResolution) {
        self.segments += 1;
        let record = &resolution.record;
        if record.is_move() {
            self.moves += 1;
            self.captures[record.color] += record.captured.len() as u32;
        } else {
            self.skips += 1;
        }
    }
}

/// Play `game` until it ends or `max_segments` more segments have resolved.
///
/// A selection already pending when called is resolved first.
#[instrument(level = "debug", skip(game, policy))]
pub fn play_out<D, S, P>(
    game: &mut LudoGame<D, S>,
    policy: &mut P,
    max_segments: u32,
) -> Result<PlayoutStats, MoveError>
where
    D: DiceSource,
    S: MoveRecordSink,
    P: TokenPolicy + ?Sized,
{
    let mut stats = PlayoutStats::default();

    while !game.is_finished() {
        if stats.segments >= max_segments {
            stats.truncated = true;
            break;
        }

        let color = game.active_color();
        let resolution = if game.pending_dice().is_some() {
            select(game, policy, color)?
        } else {
            match game.roll_dice(color)? {
                RollOutcome::Skipped(resolution) => resolution,
                RollOutcome::NoMoves { .. } => game.skip_turn(color)?,
                RollOutcome::AwaitingSelection { .. } => select(game, policy, color)?,
            }
        };
        stats.observe(&resolution);
    }

    stats.result = game.result();
    debug!(
        segments = stats.segments,
        moves = stats.moves,
        truncated = stats.truncated,
        winner = ?stats.winner(),
        "playout done"
    );
    Ok(stats)
}

/// Resolve the pending roll: ask the policy, or skip if nothing can move.
fn select<D, S, P>(
    game: &mut LudoGame<D, S>,
    policy: &mut P,
    color: Color,
) -> Result<TurnResolution, MoveError>
where
    D: DiceSource,
    S: MoveRecordSink,
    P: TokenPolicy + ?Sized,
{
    let dice = game.pending_dice().ok_or(MoveError::NotRolled)?;
    let eligible = game.eligible_moves();
    if eligible.is_empty() {
        return game.skip_turn(color);
    }

    let token = policy.choose(game.state(), game.topology(), color, dice, &eligible);
    game.select_token(color, token)
}

/// Seeded playout with a random policy in every seat.
pub fn random_playout(config: &PlayoutConfig) -> Result<PlayoutStats, MoveError> {
    let mut game = LudoGame::new(config.game_config());
    let mut policy = RandomPolicy::new(config.seed);
    play_out(&mut game, &mut policy, config.max_segments)
}
