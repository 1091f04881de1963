//! Token selection policies for automated players.
//!
//! A policy only ever picks among the eligible tokens it is handed; the
//! sequencer still validates the choice.

use crate::board::{BoardTopology, FINISH_PROGRESS, LANE_START_PROGRESS, YARD_PROGRESS};
use crate::core::{Color, ColorMap, Dice, GameRng, GameState, OutcomeKind};
use crate::rules::apply_move;

/// Chooses which eligible token to move.
pub trait TokenPolicy {
    /// Pick one of `eligible` (never empty) for `color` and `dice`.
    fn choose(
        &mut self,
        state: &GameState,
        topology: &BoardTopology,
        color: Color,
        dice: Dice,
        eligible: &[u8],
    ) -> u8;
}

impl<P: TokenPolicy + ?Sized> TokenPolicy for Box<P> {
    fn choose(
        &mut self,
        state: &GameState,
        topology: &BoardTopology,
        color: Color,
        dice: Dice,
        eligible: &[u8],
    ) -> u8 {
        (**self).choose(state, topology, color, dice, eligible)
    }
}

/// One policy per seat.
impl<P: TokenPolicy> TokenPolicy for ColorMap<P> {
    fn choose(
        &mut self,
        state: &GameState,
        topology: &BoardTopology,
        color: Color,
        dice: Dice,
        eligible: &[u8],
    ) -> u8 {
        self[color].choose(state, topology, color, dice, eligible)
    }
}

/// Uniformly random choice.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context("policy"),
        }
    }

    pub fn from_rng(rng: GameRng) -> Self {
        Self { rng }
    }
}

impl TokenPolicy for RandomPolicy {
    fn choose(
        &mut self,
        _state: &GameState,
        _topology: &BoardTopology,
        _color: Color,
        _dice: Dice,
        eligible: &[u8],
    ) -> u8 {
        debug_assert!(!eligible.is_empty());
        self.rng.choose(eligible).copied().unwrap_or(eligible[0])
    }
}

/// One-ply heuristic player.
///
/// Preference order: finish a token, capture, enter from the yard, reach
/// safety (a safe ring cell or the home lane), then the token furthest along.
/// Ties go to the lower token index.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyPolicy;

impl GreedyPolicy {
    /// Score of moving `token_index`; higher is better.
    fn score(
        state: &GameState,
        topology: &BoardTopology,
        color: Color,
        dice: Dice,
        token_index: u8,
    ) -> (u8, i8) {
        let before = state.progress(color, token_index);

        // Cheap: the state's history is a persistent vector.
        let mut trial = state.clone();
        let Ok(outcome) = apply_move(&mut trial, topology, color, token_index, dice) else {
            return (0, i8::MIN);
        };

        let tier = if outcome.kind == OutcomeKind::Finished {
            5
        } else if !outcome.captured.is_empty() {
            4
        } else if before == YARD_PROGRESS {
            3
        } else if outcome.progress >= LANE_START_PROGRESS
            || topology
                .ring_cell(color, outcome.progress)
                .is_some_and(|cell| topology.is_safe(cell))
        {
            2
        } else {
            1
        };

        debug_assert!(outcome.progress <= FINISH_PROGRESS);
        (tier, outcome.progress)
    }
}

impl TokenPolicy for GreedyPolicy {
    fn choose(
        &mut self,
        state: &GameState,
        topology: &BoardTopology,
        color: Color,
        dice: Dice,
        eligible: &[u8],
    ) -> u8 {
        debug_assert!(!eligible.is_empty());
        let mut best = eligible[0];
        let mut best_score = Self::score(state, topology, color, dice, best);

        for &index in &eligible[1..] {
            let score = Self::score(state, topology, color, dice, index);
            if score > best_score {
                best = index;
                best_score = score;
            }
        }

        best
    }
}
