//! Board layout: ring, home lanes, yards and safe cells.

pub mod topology;

pub use topology::{
    BoardCell, BoardTopology, LaneCell, YardSlot, FINISH_PROGRESS, LANE_LENGTH,
    LANE_START_PROGRESS, RING_LENGTH, TOKENS_PER_COLOR, YARD_PROGRESS,
};
