//! Move records: what the engine reports after every committed turn segment.
//!
//! A record is emitted after the state transition commits. The persistence
//! layer receives them through `MoveRecordSink`; its storage format and
//! retry policy are its own business.
//!
//! Records are also kept on `GameState::history`, which is enough to replay a
//! game (see `LudoGame::replay`).

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::color::Color;
use super::error::SinkError;
use super::rng::Dice;
use super::state::TokenId;

/// What a committed segment did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    /// A yard token entered the ring at its colour's entry cell.
    Entered,
    /// A token moved along the ring (possibly capturing).
    Advanced,
    /// A token moved into, or within, its home lane.
    EnteredLane,
    /// A token reached the finish cell.
    Finished,
    /// No token could move; the roll was passed.
    Skipped,
}

/// Tokens sent back to their yards by one move.
///
/// Usually empty or a single token; stacks larger than four spill to the heap.
pub type CaptureList = SmallVec<[TokenId; 4]>;

/// One committed turn segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Turn number (one turn per colour change, starts at 1).
    pub turn: u32,

    /// Segment within the turn; a 6 starts another segment.
    pub sequence: u32,

    /// The colour that rolled.
    pub color: Color,

    /// The token moved, or `None` for a skipped roll.
    pub token_index: Option<u8>,

    /// The roll this segment consumed.
    pub dice: Dice,

    /// Progress of the moved token after the move.
    pub progress: Option<i8>,

    pub kind: OutcomeKind,

    /// Opposing tokens returned to their yards.
    pub captured: CaptureList,
}

impl MoveRecord {
    /// Whether this record describes a token move (not a skip).
    #[must_use]
    pub fn is_move(&self) -> bool {
        self.token_index.is_some()
    }
}

/// Receiver for committed move records.
///
/// Called after the transition is final. An `Err` is logged by the engine;
/// the move stands regardless.
pub trait MoveRecordSink {
    /// Accept one record.
    fn record(&mut self, record: &MoveRecord) -> Result<(), SinkError>;
}

/// Discards every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MoveRecordSink for NullSink {
    fn record(&mut self, _record: &MoveRecord) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory sink collecting records in order.
#[derive(Clone, Debug, Default)]
pub struct MoveLog {
    records: Vector<MoveRecord>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records received so far, oldest first.
    #[must_use]
    pub fn records(&self) -> &Vector<MoveRecord> {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Captures across all records.
    pub fn captures(&self) -> impl Iterator<Item = &TokenId> {
        self.records.iter().flat_map(|r| r.captured.iter())
    }
}

impl MoveRecordSink for MoveLog {
    fn record(&mut self, record: &MoveRecord) -> Result<(), SinkError> {
        self.records.push_back(record.clone());
        Ok(())
    }
}

impl<S: MoveRecordSink + ?Sized> MoveRecordSink for &mut S {
    fn record(&mut self, record: &MoveRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }
}

impl<S: MoveRecordSink + ?Sized> MoveRecordSink for Box<S> {
    fn record(&mut self, record: &MoveRecord) -> Result<(), SinkError> {
        (**self).record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(kind: OutcomeKind) -> MoveRecord {
        MoveRecord {
            turn: 3,
            sequence: 1,
            color: Color::Red,
            token_index: Some(2),
            dice: Dice::new(4).unwrap(),
            progress: Some(17),
            kind,
            captured: SmallVec::from_slice(&[TokenId::new(Color::Blue, 0)]),
        }
    }

    #[test]
    fn test_move_log_collects_in_order() {
        let mut log = MoveLog::new();
        assert!(log.is_empty());

        log.record(&sample(OutcomeKind::Advanced)).unwrap();
        log.record(&sample(OutcomeKind::Finished)).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].kind, OutcomeKind::Advanced);
        assert_eq!(log.records()[1].kind, OutcomeKind::Finished);
        assert_eq!(log.captures().count(), 2);
    }

    fn feed<S: MoveRecordSink>(mut sink: S, record: &MoveRecord) {
        sink.record(record).unwrap();
    }

    #[test]
    fn test_sink_through_mut_ref() {
        let mut log = MoveLog::new();
        feed(&mut log, &sample(OutcomeKind::Entered));
        feed(&mut log, &sample(OutcomeKind::Advanced));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_null_sink() {
        let mut sink = NullSink;
        assert!(sink.record(&sample(OutcomeKind::Skipped)).is_ok());
    }

    #[test]
    fn test_is_move() {
        let mut record = sample(OutcomeKind::Skipped);
        record.token_index = None;
        record.progress = None;
        assert!(!record.is_move());
        assert!(sample(OutcomeKind::Advanced).is_move());
    }

    #[test]
    fn test_record_serialization() {
        let record = sample(OutcomeKind::Advanced);
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, deserialized);
    }
}
