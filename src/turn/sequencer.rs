//! Turn sequencing: rolls, selections, skips, extra turns and rotation.
//!
//! ```text
//! AwaitingRoll ──roll──▶ Rolled ──▶ AwaitingSelection ──select/skip──▶ Resolved
//!      ▲                   │                                            │
//!      │                   └──── no token can move (auto-skip) ────────▶│
//!      └──── same colour if the roll was a 6, else next colour ◀────────┘
//! ```
//!
//! `LudoGame` exclusively owns the `GameState`. Every command runs to
//! completion synchronously and either commits a whole transition or returns
//! a `MoveError` without touching the state. Move records go to the sink
//! after the transition commits; a failing sink is logged and ignored.

use tracing::{debug, info, instrument, warn};

use crate::board::{BoardCell, BoardTopology, TOKENS_PER_COLOR};
use crate::core::{
    Color, Dice, DiceSource, GameConfig, GameRng, GameState, MoveError, MoveRecord, MoveRecordSink,
    NullSink, OutcomeKind, ScriptedDice, SnapshotError, TurnPhase,
};
use crate::rules::{self, EligibleSet, GameResult, MoveOutcome};

/// What happens after a segment resolves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NextTurn {
    /// The roll was a 6: the same colour rolls again.
    RollAgain(Color),
    /// The turn passed to this colour.
    Passed(Color),
    /// No further turns are issued.
    GameOver(GameResult),
}

/// A committed segment: the move (or skip) and who rolls next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnResolution {
    /// Details of the move; `None` for a skipped roll.
    pub outcome: Option<MoveOutcome>,

    /// The record emitted for this segment.
    pub record: MoveRecord,

    pub next: NextTurn,
}

/// Result of a roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RollOutcome {
    /// Pick one of `eligible` with `select_token`.
    AwaitingSelection { dice: Dice, eligible: EligibleSet },
    /// No token could move; the roll was passed automatically.
    Skipped(TurnResolution),
    /// No token can move and auto-skip is off; call `skip_turn`.
    NoMoves { dice: Dice },
}

impl RollOutcome {
    /// The rolled value.
    #[must_use]
    pub fn dice(&self) -> Dice {
        match self {
            RollOutcome::AwaitingSelection { dice, .. } | RollOutcome::NoMoves { dice } => *dice,
            RollOutcome::Skipped(resolution) => resolution.record.dice,
        }
    }
}

/// A Ludo game: authoritative state plus its dice source and record sink.
pub struct LudoGame<D: DiceSource = GameRng, S: MoveRecordSink = NullSink> {
    config: GameConfig,
    topology: BoardTopology,
    state: GameState,
    dice: D,
    sink: S,
}

impl LudoGame {
    /// New game with seeded dice and no record sink.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let dice = GameRng::new(config.seed).for_context("dice");
        Self::with_parts(config, dice, NullSink)
    }
}

impl LudoGame<ScriptedDice, NullSink> {
    /// Rebuild a game by replaying its records.
    ///
    /// The records' dice values are fed back in order, so the result matches
    /// the original game exactly, including its history. Every replayed
    /// segment must reproduce its record; the first one that does not is
    /// reported as `ReplayMismatch`.
    pub fn replay(config: GameConfig, records: &[MoveRecord]) -> Result<Self, MoveError> {
        let dice = ScriptedDice::new(records.iter().map(|r| r.dice));
        let mut game = Self::with_parts(config, dice, NullSink);

        for record in records {
            let resolution = match game.roll_dice(record.color)? {
                RollOutcome::Skipped(resolution) => resolution,
                RollOutcome::NoMoves { .. } => game.skip_turn(record.color)?,
                RollOutcome::AwaitingSelection { .. } => {
                    let token = record.token_index.ok_or(MoveError::MovesAvailable)?;
                    game.select_token(record.color, token)?
                }
            };

            if resolution.record != *record {
                return Err(MoveError::ReplayMismatch {
                    turn: record.turn,
                    sequence: record.sequence,
                });
            }
        }

        Ok(game)
    }
}

impl<D: DiceSource, S: MoveRecordSink> LudoGame<D, S> {
    /// New game with an injected dice source and record sink.
    pub fn with_parts(config: GameConfig, dice: D, sink: S) -> Self {
        let state = GameState::new(config.first_color);
        Self {
            config,
            topology: BoardTopology::classic(),
            state,
            dice,
            sink,
        }
    }

    /// Resume from a snapshot taken with `snapshot`.
    ///
    /// Besides the state's own invariants, the snapshot must agree with
    /// `config`: it rests in `GameOver` exactly when the post-win policy says
    /// the game has ended, and a live game never has a finished colour to
    /// move.
    pub fn restore(
        config: GameConfig,
        snapshot: &[u8],
        dice: D,
        sink: S,
    ) -> Result<Self, SnapshotError> {
        let state = GameState::from_bytes(snapshot)?;

        let ended = GameResult::from_state(&state, config.post_win).is_some();
        if ended != (state.phase == TurnPhase::GameOver) {
            return Err(SnapshotError::Corrupt("game-over phase does not match finished colours"));
        }
        if !ended && state.has_finished(state.active_color) {
            return Err(SnapshotError::Corrupt("active colour has already finished"));
        }

        Ok(Self {
            config,
            topology: BoardTopology::classic(),
            state,
            dice,
            sink,
        })
    }

    /// Binary snapshot of the current state.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        self.state.to_bytes()
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn topology(&self) -> &BoardTopology {
        &self.topology
    }

    /// Read-only view of the state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn active_color(&self) -> Color {
        self.state.active_color
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    /// Dice value waiting for a selection or skip.
    #[must_use]
    pub fn pending_dice(&self) -> Option<Dice> {
        match self.state.phase {
            TurnPhase::AwaitingSelection { dice } => Some(dice),
            _ => None,
        }
    }

    #[must_use]
    pub fn finished_count(&self, color: Color) -> u8 {
        self.state.finished_count(color)
    }

    /// The first colour to bring all four tokens home, if any.
    ///
    /// Under `PlayToCompletion` play may continue after this returns `Some`;
    /// `is_finished` reports whether turns have stopped.
    #[must_use]
    pub fn is_game_over(&self) -> Option<Color> {
        self.state.winner()
    }

    /// Whether the sequencer has stopped issuing turns.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.phase == TurnPhase::GameOver
    }

    /// Final result, once turns have stopped.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if self.is_finished() {
            GameResult::from_state(&self.state, self.config.post_win)
        } else {
            None
        }
    }

    /// Abstract position of a token, for rendering.
    ///
    /// # Panics
    ///
    /// Panics if `token_index` is not in `0..4`.
    #[must_use]
    pub fn current_board_cell(&self, color: Color, token_index: u8) -> BoardCell {
        assert!(
            (token_index as usize) < TOKENS_PER_COLOR,
            "token index {token_index} out of range"
        );
        self.topology
            .board_cell(color, token_index, self.state.progress(color, token_index))
    }

    /// Tokens the active colour may move with the pending roll.
    ///
    /// Empty when no roll is pending.
    #[must_use]
    pub fn eligible_moves(&self) -> EligibleSet {
        match self.pending_dice() {
            Some(dice) => rules::eligible_moves(&self.state, self.state.active_color, dice),
            None => EligibleSet::new(),
        }
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the game, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    // === Commands ===

    /// Roll the built-in dice for `color`.
    #[instrument(level = "debug", skip(self))]
    pub fn roll_dice(&mut self, color: Color) -> Result<RollOutcome, MoveError> {
        self.check_can_roll(color)?;
        let dice = self.dice.roll();
        Ok(self.begin_segment(dice))
    }

    /// Use an externally rolled value for `color`.
    #[instrument(level = "debug", skip(self))]
    pub fn roll_with(&mut self, color: Color, value: u8) -> Result<RollOutcome, MoveError> {
        let dice = Dice::new(value)?;
        self.check_can_roll(color)?;
        Ok(self.begin_segment(dice))
    }

    /// Move one of the active colour's tokens with the pending roll.
    #[instrument(level = "debug", skip(self))]
    pub fn select_token(
        &mut self,
        color: Color,
        token_index: u8,
    ) -> Result<TurnResolution, MoveError> {
        let dice = self.check_pending(color)?;

        let outcome = rules::apply_move(&mut self.state, &self.topology, color, token_index, dice)?;
        self.state.phase = TurnPhase::Resolved { dice };

        let record = MoveRecord {
            turn: self.state.turn_number,
            sequence: self.state.segment,
            color,
            token_index: Some(token_index),
            dice,
            progress: Some(outcome.progress),
            kind: outcome.kind,
            captured: outcome.captured.clone(),
        };

        Ok(self.resolve(record, Some(outcome)))
    }

    /// Pass a roll that no token can use.
    #[instrument(level = "debug", skip(self))]
    pub fn skip_turn(&mut self, color: Color) -> Result<TurnResolution, MoveError> {
        let dice = self.check_pending(color)?;
        if rules::has_any_eligible_move(&self.state, color, dice) {
            return Err(MoveError::MovesAvailable);
        }

        self.state.phase = TurnPhase::Resolved { dice };
        let record = self.skip_record(dice);
        Ok(self.resolve(record, None))
    }

    // === Transitions ===

    fn check_can_roll(&self, color: Color) -> Result<(), MoveError> {
        self.check_turn(color)?;
        match self.state.phase {
            TurnPhase::AwaitingRoll => Ok(()),
            TurnPhase::AwaitingSelection { .. } => Err(MoveError::AlreadyRolled),
            TurnPhase::GameOver => Err(MoveError::GameOver),
            phase => unreachable!("resting in transient phase {phase:?}"),
        }
    }

    /// The pending dice value, if `color` may act on it.
    fn check_pending(&self, color: Color) -> Result<Dice, MoveError> {
        self.check_turn(color)?;
        match self.state.phase {
            TurnPhase::AwaitingSelection { dice } => Ok(dice),
            TurnPhase::AwaitingRoll => Err(MoveError::NotRolled),
            TurnPhase::GameOver => Err(MoveError::GameOver),
            phase => unreachable!("resting in transient phase {phase:?}"),
        }
    }

    fn check_turn(&self, color: Color) -> Result<(), MoveError> {
        if self.state.phase == TurnPhase::GameOver {
            return Err(MoveError::GameOver);
        }
        if color != self.state.active_color {
            return Err(MoveError::WrongPlayer {
                expected: self.state.active_color,
                got: color,
            });
        }
        Ok(())
    }

    fn begin_segment(&mut self, dice: Dice) -> RollOutcome {
        let color = self.state.active_color;
        self.state.phase = TurnPhase::Rolled { dice };
        debug!(%color, %dice, "rolled");

        let eligible = rules::eligible_moves(&self.state, color, dice);
        if !eligible.is_empty() {
            self.state.phase = TurnPhase::AwaitingSelection { dice };
            return RollOutcome::AwaitingSelection { dice, eligible };
        }

        if self.config.auto_skip {
            self.state.phase = TurnPhase::Resolved { dice };
            let record = self.skip_record(dice);
            RollOutcome::Skipped(self.resolve(record, None))
        } else {
            self.state.phase = TurnPhase::AwaitingSelection { dice };
            RollOutcome::NoMoves { dice }
        }
    }

    fn skip_record(&self, dice: Dice) -> MoveRecord {
        MoveRecord {
            turn: self.state.turn_number,
            sequence: self.state.segment,
            color: self.state.active_color,
            token_index: None,
            dice,
            progress: None,
            kind: OutcomeKind::Skipped,
            captured: Default::default(),
        }
    }

    /// Commit a resolved segment: record it, notify the sink, pick who
    /// rolls next.
    fn resolve(&mut self, record: MoveRecord, outcome: Option<MoveOutcome>) -> TurnResolution {
        debug_assert!(matches!(self.state.phase, TurnPhase::Resolved { .. }));

        self.state.history.push_back(record.clone());
        if let Err(err) = self.sink.record(&record) {
            warn!(%err, "move record sink failed; move stands");
        }

        let next = self.advance(record.dice);
        debug_assert_eq!(self.state.check_invariants(), Ok(()));

        TurnResolution {
            outcome,
            record,
            next,
        }
    }

    fn advance(&mut self, dice: Dice) -> NextTurn {
        let color = self.state.active_color;

        if let Some(result) = GameResult::from_state(&self.state, self.config.post_win) {
            info!(winner = %result.winner(), "game over");
            self.state.phase = TurnPhase::GameOver;
            return NextTurn::GameOver(result);
        }

        self.state.phase = TurnPhase::AwaitingRoll;

        if dice.is_six() && !self.state.has_finished(color) {
            self.state.segment += 1;
            debug!(%color, "rolled a 6, rolls again");
            return NextTurn::RollAgain(color);
        }

        let mut next = color.next();
        while self.state.has_finished(next) {
            next = next.next();
        }

        self.state.active_color = next;
        self.state.turn_number += 1;
        self.state.segment = 0;
        debug!(from = %color, to = %next, "turn passed");
        NextTurn::Passed(next)
    }
}
