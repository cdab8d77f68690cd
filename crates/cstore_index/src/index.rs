use std::sync::Arc;

use cstore_chunk::{ChunkId, ChunkRowSkipIndex, ChunkSetInfo};
use cstore_types::{BinaryRecord, RichProjection};

use crate::{ChunkIdOrderedIndex, RowKeyOrderedIndex};

/// Selects which of the two interchangeable [`PartitionChunkIndex`] layouts to build.
///
/// No runtime polymorphism is needed beyond this tag: both variants expose the same query
/// surface, so callers only ever need to pick the layout once, at construction time, based on
/// the expected access pattern for that partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrdering {
    /// Ordered by `(first_key, chunk_id)`. Preferred when scans are range-heavy.
    RowKey,
    /// Ordered by `chunk_id` (≈ ingest order). Preferred for full-partition or recency scans.
    ChunkId,
}

/// The in-memory chunk index of one hot partition: an ordered container of chunk descriptors
/// plus the skip map superseding rows in older chunks.
///
/// One instance per hot partition, built incrementally from backend metadata and discarded by
/// an LRU policy at the scan-executor layer. Construction picks a concrete layout via
/// [`IndexOrdering`]; from then on both layouts answer the same queries.
pub enum PartitionChunkIndex {
    RowKeyOrdered {
        partition_key: BinaryRecord,
        projection: Arc<RichProjection>,
        index: RowKeyOrderedIndex,
    },
    ChunkIdOrdered {
        partition_key: BinaryRecord,
        projection: Arc<RichProjection>,
        index: ChunkIdOrderedIndex,
    },
}

impl PartitionChunkIndex {
    pub fn new(ordering: IndexOrdering, partition_key: BinaryRecord, projection: Arc<RichProjection>) -> Self {
        match ordering {
            IndexOrdering::RowKey => Self::RowKeyOrdered {
                partition_key,
                projection,
                index: RowKeyOrderedIndex::new(),
            },
            IndexOrdering::ChunkId => Self::ChunkIdOrdered {
                partition_key,
                projection,
                index: ChunkIdOrderedIndex::new(),
            },
        }
    }

    pub fn partition_key(&self) -> &BinaryRecord {
        match self {
            Self::RowKeyOrdered { partition_key, .. } | Self::ChunkIdOrdered { partition_key, .. } => {
                partition_key
            }
        }
    }

    pub fn projection(&self) -> &Arc<RichProjection> {
        match self {
            Self::RowKeyOrdered { projection, .. } | Self::ChunkIdOrdered { projection, .. } => projection,
        }
    }

    /// Inserts `info`; for each skip submission, merges it into the associated skip array as an
    /// idempotent set-union. Re-inserting an already-present chunk, or re-submitting skips
    /// already recorded, is harmless.
    pub fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]) {
        match self {
            Self::RowKeyOrdered { index, .. } => index.add(info, skips),
            Self::ChunkIdOrdered { index, .. } => index.add(info, skips),
        }
    }

    pub fn num_chunks(&self) -> usize {
        match self {
            Self::RowKeyOrdered { index, .. } => index.num_chunks(),
            Self::ChunkIdOrdered { index, .. } => index.num_chunks(),
        }
    }

    pub fn all_chunks(&self) -> Box<dyn Iterator<Item = (ChunkSetInfo, Arc<[u64]>)> + '_> {
        match self {
            Self::RowKeyOrdered { index, .. } => Box::new(index.all_chunks()),
            Self::ChunkIdOrdered { index, .. } => Box::new(index.all_chunks()),
        }
    }

    /// Every emitted info intersects `[lo, hi]`; no false negatives. Row-key-ordered emits in
    /// ascending `first_key` (ties broken by `chunk_id`); chunk-id-ordered emits in ascending
    /// `chunk_id`.
    pub fn row_key_range<'a>(
        &'a self,
        lo: &'a BinaryRecord,
        hi: &'a BinaryRecord,
    ) -> Box<dyn Iterator<Item = (ChunkSetInfo, Arc<[u64]>)> + 'a> {
        match self {
            Self::RowKeyOrdered { index, .. } => Box::new(index.row_key_range(lo, hi)),
            Self::ChunkIdOrdered { index, .. } => Box::new(index.row_key_range(lo, hi)),
        }
    }

    pub fn single_chunk(&self, first_key: &BinaryRecord, id: ChunkId) -> Option<(ChunkSetInfo, Arc<[u64]>)> {
        match self {
            Self::RowKeyOrdered { index, .. } => index.single_chunk(first_key, id),
            Self::ChunkIdOrdered { index, .. } => index.single_chunk(first_key, id),
        }
    }
}
