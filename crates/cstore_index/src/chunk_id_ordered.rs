use std::collections::BTreeMap;
use std::sync::Arc;

use cstore_chunk::{ChunkId, ChunkRowSkipIndex, ChunkSetInfo, SkipMap};
use cstore_types::BinaryRecord;

/// `PartitionChunkIndex` variant backed by an ordered map keyed on `chunk_id` alone.
///
/// Favors full-partition or recency-ordered scans: chunk ids are assigned in ingest order, so
/// iterating the map is iterating in ingest order, and `row_key_range` falls back to a linear
/// scan filtered by [`ChunkSetInfo::intersection`] rather than a range-bounded lookup.
#[derive(Default)]
pub struct ChunkIdOrderedIndex {
    chunks: BTreeMap<ChunkId, ChunkSetInfo>,
    skips: SkipMap,
}

impl ChunkIdOrderedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per the skip semantics, a skip submission always names an *older* chunk as its target:
    /// adding a new chunk only ever updates the skip cache of a chunk already present in the
    /// index, never the one being added in this same call.
    pub fn add(&mut self, info: ChunkSetInfo, skips: &[ChunkRowSkipIndex]) {
        self.chunks.insert(info.chunk_id, info);
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
        self.chunks.values().filter_map(move |info| {
            info.intersection(lo, hi)
                .map(|_| (info.clone(), self.skips.skips_for(info.chunk_id)))
        })
    }

    pub fn single_chunk(&self, first_key: &BinaryRecord, id: ChunkId) -> Option<(ChunkSetInfo, Arc<[u64]>)> {
        let info = self.chunks.get(&id)?;
        if &info.first_key != first_key {
            return None;
        }
        Some((info.clone(), self.skips.skips_for(id)))
    }
}
