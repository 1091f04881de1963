//! Static board description.
//!
//! The classic board: a shared ring of 52 cells indexed in one global order,
//! a private 6-cell home lane per colour, a 4-slot yard per colour, and a set
//! of safe cells where captures cannot happen.
//!
//! Everything here is a pure lookup. Inputs are validated by callers; an
//! out-of-range argument is an engine bug and trips a debug assertion.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{Color, ColorMap};

/// Cells on the shared ring.
pub const RING_LENGTH: u8 = 52;

/// Cells in each colour's home lane; the last one is the finish cell.
pub const LANE_LENGTH: u8 = 6;

/// Tokens per colour.
pub const TOKENS_PER_COLOR: usize = 4;

/// Progress of a token still in its yard.
pub const YARD_PROGRESS: i8 = -1;

/// Progress of the first lane cell.
pub const LANE_START_PROGRESS: i8 = RING_LENGTH as i8;

/// Progress of a finished token (last lane cell).
pub const FINISH_PROGRESS: i8 = (RING_LENGTH + LANE_LENGTH - 1) as i8;

/// Ring cells that are always safe, independent of entry points.
const FIXED_SAFE_CELLS: [u8; 8] = [1, 9, 14, 22, 27, 35, 40, 48];

/// A yard resting slot: one per token, off the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YardSlot {
    pub color: Color,
    pub slot: u8,
}

/// A cell in a colour's private home lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneCell {
    pub color: Color,
    pub index: u8,
}

/// Abstract position of a token, for rendering.
///
/// Mapping these to screen coordinates is the presentation layer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardCell {
    /// Resting in the yard.
    Yard(YardSlot),
    /// On the shared ring, at a global cell index.
    Ring(u8),
    /// In the home lane, before the finish cell.
    Lane(LaneCell),
    /// On the finish cell; never moves again.
    Finished,
}

/// Immutable board layout.
#[derive(Clone, Debug)]
pub struct BoardTopology {
    entry_offsets: ColorMap<u8>,
    safe_cells: FxHashSet<u8>,
}

impl BoardTopology {
    /// The standard four-colour board.
    ///
    /// Entry offsets are Blue 3, Red 16, Green 29, Yellow 42; every entry
    /// cell is also safe.
    #[must_use]
    pub fn classic() -> Self {
        let entry_offsets = ColorMap::new(|color| match color {
            Color::Blue => 3,
            Color::Red => 16,
            Color::Green => 29,
            Color::Yellow => 42,
        });

        let safe_cells = FIXED_SAFE_CELLS
            .iter()
            .copied()
            .chain(entry_offsets.iter().map(|(_, &offset)| offset))
            .collect();

        Self {
            entry_offsets,
            safe_cells,
        }
    }

    /// Number of ring cells.
    #[must_use]
    pub const fn ring_length(&self) -> u8 {
        RING_LENGTH
    }

    /// Number of lane cells per colour.
    #[must_use]
    pub const fn lane_length(&self) -> u8 {
        LANE_LENGTH
    }

    /// Global ring index where `color` enters the ring.
    #[must_use]
    pub fn entry_offset(&self, color: Color) -> u8 {
        self.entry_offsets[color]
    }

    /// Global ring cell for a colour-relative ring position.
    ///
    /// ```
    /// use ludo_engine::board::BoardTopology;
    /// use ludo_engine::core::Color;
    ///
    /// let board = BoardTopology::classic();
    /// assert_eq!(board.global_cell(Color::Blue, 0), 3);
    /// assert_eq!(board.global_cell(Color::Yellow, 10), 0);
    /// ```
    #[must_use]
    pub fn global_cell(&self, color: Color, ring_local: u8) -> u8 {
        debug_assert!(ring_local < RING_LENGTH, "ring position {ring_local} out of range");
        ((self.entry_offsets[color] as u16 + ring_local as u16) % RING_LENGTH as u16) as u8
    }

    /// Whether captures are forbidden on a global ring cell.
    #[must_use]
    pub fn is_safe(&self, global_cell: u8) -> bool {
        debug_assert!(global_cell < RING_LENGTH, "ring cell {global_cell} out of range");
        self.safe_cells.contains(&global_cell)
    }

    /// All safe cells, ascending.
    #[must_use]
    pub fn safe_cells(&self) -> Vec<u8> {
        let mut cells: Vec<u8> = self.safe_cells.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Yard slot reserved for a token.
    #[must_use]
    pub fn yard_position(&self, color: Color, token_index: u8) -> YardSlot {
        debug_assert!((token_index as usize) < TOKENS_PER_COLOR);
        YardSlot {
            color,
            slot: token_index,
        }
    }

    /// A cell of the colour's home lane.
    #[must_use]
    pub fn lane_cell(&self, color: Color, lane_index: u8) -> LaneCell {
        debug_assert!(lane_index < LANE_LENGTH, "lane index {lane_index} out of range");
        LaneCell {
            color,
            index: lane_index,
        }
    }

    /// Where a token with the given progress sits.
    #[must_use]
    pub fn board_cell(&self, color: Color, token_index: u8, progress: i8) -> BoardCell {
        match progress {
            YARD_PROGRESS => BoardCell::Yard(self.yard_position(color, token_index)),
            FINISH_PROGRESS => BoardCell::Finished,
            p if (0..LANE_START_PROGRESS).contains(&p) => {
                BoardCell::Ring(self.global_cell(color, p as u8))
            }
            p if (LANE_START_PROGRESS..FINISH_PROGRESS).contains(&p) => {
                BoardCell::Lane(self.lane_cell(color, (p - LANE_START_PROGRESS) as u8))
            }
            p => panic!("token progress {p} out of range"),
        }
    }

    /// Global ring cell of a token, if it is on the ring.
    #[must_use]
    pub fn ring_cell(&self, color: Color, progress: i8) -> Option<u8> {
        if (0..LANE_START_PROGRESS).contains(&progress) {
            Some(self.global_cell(color, progress as u8))
        } else {
            None
        }
    }
}

impl Default for BoardTopology {
    fn default() -> Self {
        Self::classic()
    }
}
