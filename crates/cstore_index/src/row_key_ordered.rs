use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use cstore_chunk::{ChunkId, ChunkRowSkipIndex, ChunkSetInfo, SkipMap};
use cstore_types::BinaryRecord;

/// The sentinel used as the chunk-id component of an upper bound when only a `first_key` bound
/// is known. Chunk ids are assumed never to legitimately equal `u64::MAX`; see the crate's
/// design notes.
const CHUNK_ID_SENTINEL_MAX: ChunkId = ChunkId(u64::MAX);

/// `PartitionChunkIndex` variant backed by an ordered map keyed on `(first_key, chunk_id)`.
///
/// Favors range-heavy scans: `row_key_range` takes a head-map view bounded by `hi` before
/// filtering, so a selective range touches only the relevant prefix of the map rather than
/// every chunk in the partition.
#[derive(Default)]
pub struct RowKeyOrderedIndex {
    chunks: BTreeMap<(BinaryRecord, ChunkId), ChunkSetInfo>,
    skips: SkipMap,
}

impl RowKeyOrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]) {
        self.chunks.insert(info.row_key_sort_key(), info);
        for skip in skips {
            self.skips.add(skip);
        }
    }

    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn all_chunks(&self) -> impl Iterator<Item = (ChunkSetInfo, Arc<[u64]>)> + '_ {
        self.chunks.values().map(move |info| {
            let skips = self.skips.skips_for(info.chunk_id);
            (info.clone(), skips)
        })
    }

    pub fn row_key_range<'a>(
        &'a self,
        lo: &'a BinaryRecord,
        hi: &'a BinaryRecord,
    ) -> impl Iterator<Item = (ChunkSetInfo, Arc<[u64]>)> + 'a {
        let upper = Bound::Included((hi.clone(), CHUNK_ID_SENTINEL_MAX));
        self.chunks
            .range((Bound::Unbounded, upper))
            .filter_map(move |(_, info)| {
                info.intersection(lo, hi)
                    .map(|_| (info.clone(), self.skips.skips_for(info.chunk_id)))
            })
    }

    pub fn single_chunk(&self, first_key: &BinaryRecord, id: ChunkId) -> Option<(ChunkSetInfo, Arc<[u64]>)> {
        self.chunks
            .get(&(first_key.clone(), id))
            .map(|info| (info.clone(), self.skips.skips_for(id)))
    }
}
