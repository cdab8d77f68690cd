use cstore_types::BinaryRecord;

use crate::{ChunkError, ChunkId};

/// The metadata descriptor of one immutable chunk: its identity, row count, and key interval.
///
/// `ChunkSetInfo` is created once, at ingest commit, and never mutated afterwards — a chunk's
/// row set is immutable, so every field here is fixed for the chunk's lifetime; it is discarded
/// only when the chunk it describes is compacted away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSetInfo {
    pub chunk_id: ChunkId,
    pub num_rows: i32,
    pub first_key: BinaryRecord,
    pub last_key: BinaryRecord,
}

impl ChunkSetInfo {
    /// Builds a descriptor, rejecting an inverted interval or a negative row count.
    pub fn new(
        chunk_id: ChunkId,
        num_rows: i32,
        first_key: BinaryRecord,
        last_key: BinaryRecord,
    ) -> Result<Self, ChunkError> {
        if num_rows < 0 {
            return Err(ChunkError::NegativeRowCount { num_rows });
        }
        if first_key > last_key {
            return Err(ChunkError::UnorderedInterval { first_key, last_key });
        }
        Ok(Self {
            chunk_id,
            num_rows,
            first_key,
            last_key,
        })
    }

    /// The key this descriptor sorts by in the row-key-ordered index: `(first_key, chunk_id)`.
    pub fn row_key_sort_key(&self) -> (BinaryRecord, ChunkId) {
        (self.first_key.clone(), self.chunk_id)
    }

    /// Intersects this chunk's `[first_key, last_key]` interval against `[lo, hi]`.
    ///
    /// Returns `Some((max(first_key, lo), min(last_key, hi)))` when that clamped interval is
    /// non-empty, i.e. iff `first_key <= hi && last_key >= lo`. This is the sole geometric
    /// primitive range pruning is built on: both index variants filter `row_key_range` results
    /// through this test and nothing else.
    pub fn intersection(&self, lo: &BinaryRecord, hi: &BinaryRecord) -> Option<(BinaryRecord, BinaryRecord)> {
        if &self.first_key > hi || &self.last_key < lo {
            return None;
        }
        let clamped_lo = self.first_key.clone().max(lo.clone());
        let clamped_hi = self.last_key.clone().min(hi.clone());
        Some((clamped_lo, clamped_hi))
    }
}
