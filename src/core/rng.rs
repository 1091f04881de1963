//! Dice: the validated `Dice` value, the `DiceSource` seam, and a
//! deterministic, seedable RNG.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical roll sequence
//! - **Serializable**: O(1) state capture and restore
//! - **Context streams**: Independent sequences for dice and for automated players
//!
//! ## Usage
//!
//! ```
//! use ludo_engine::core::{DiceSource, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let roll = rng.roll();
//! assert!((1..=6).contains(&roll.value()));
//!
//! // Same seed, same rolls
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.roll(), b.roll());
//! ```

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::error::MoveError;

/// A single die value, guaranteed to be in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Dice(u8);

impl Dice {
    /// Lowest face.
    pub const MIN: u8 = 1;
    /// Highest face; rolling it grants another roll and releases yard tokens.
    pub const MAX: u8 = 6;

    /// Validate a raw die value.
    pub fn new(value: u8) -> Result<Self, MoveError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MoveError::InvalidDice(value))
        }
    }

    /// The face value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// True for a 6.
    #[must_use]
    pub const fn is_six(self) -> bool {
        self.0 == Self::MAX
    }
}

impl TryFrom<u8> for Dice {
    type Error = MoveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Dice::new(value)
    }
}

impl From<Dice> for u8 {
    fn from(dice: Dice) -> u8 {
        dice.0
    }
}

impl std::fmt::Display for Dice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of independent, uniform die rolls.
///
/// The turn sequencer draws exactly one value per roll and never reuses it.
pub trait DiceSource {
    /// Draw the next die value.
    fn roll(&mut self) -> Dice;
}

/// Deterministic RNG for dice and automated players.
///
/// Uses ChaCha8 for speed while maintaining cryptographic quality randomness.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// Keeps dice rolls separate from the choices of automated players, so
    /// swapping a policy never changes the dice a seed produces.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
        }
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for GameRng {
    fn roll(&mut self) -> Dice {
        Dice(self.inner.gen_range(Dice::MIN..=Dice::MAX))
    }
}

/// Serializable RNG state for checkpointing.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many rolls have been made.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// A fixed sequence of rolls, for tests and replays.
///
/// Panics when exhausted: a replay that needs more rolls than were recorded
/// is a caller bug.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<Dice>,
}

impl ScriptedDice {
    /// Script from already-validated values.
    pub fn new(rolls: impl IntoIterator<Item = Dice>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Script from raw values, rejecting anything outside `1..=6`.
    pub fn from_values(values: &[u8]) -> Result<Self, MoveError> {
        let rolls = values
            .iter()
            .map(|&v| Dice::new(v))
            .collect::<Result<VecDeque<_>, _>>()?;
        Ok(Self { rolls })
    }

    /// Append another roll.
    pub fn push(&mut self, dice: Dice) {
        self.rolls.push_back(dice);
    }

    /// Rolls not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> Dice {
        self.rolls
            .pop_front()
            .expect("scripted dice exhausted")
    }
}
