use std::collections::BTreeSet;
use std::sync::Arc;

use nohash_hasher::IntMap;
use parking_lot::Mutex;

use crate::ChunkId;

/// A single skip submission: row offsets within `target` that are superseded by a newer chunk.
///
/// Produced as a side effect of ingesting a chunk that overrides rows in an older one; `target`
/// always names an older chunk id, never the chunk being added (see [`SkipMap::add`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRowSkipIndex {
    pub target: ChunkId,
    pub offsets: Vec<u64>,
}

impl ChunkRowSkipIndex {
    pub fn new(target: ChunkId, offsets: Vec<u64>) -> Self {
        Self { target, offsets }
    }
}

/// Per-chunk sorted skip offsets, with a lazily materialized flat array cached alongside.
struct SkipEntry {
    offsets: BTreeSet<u64>,
    cached: Mutex<Option<Arc<[u64]>>>,
}

impl SkipEntry {
    fn empty() -> Self {
        Self {
            offsets: BTreeSet::new(),
            cached: Mutex::new(None),
        }
    }

    fn union_extend(&mut self, new_offsets: &[u64]) -> bool {
        let mut changed = false;
        for &offset in new_offsets {
            changed |= self.offsets.insert(offset);
        }
        if changed {
            *self.cached.lock() = None;
        }
        changed
    }

    fn array(&self) -> Arc<[u64]> {
        let mut cached = self.cached.lock();
        if let Some(arr) = cached.as_ref() {
            return Arc::clone(arr);
        }
        let arr: Arc<[u64]> = self.offsets.iter().copied().collect::<Vec<_>>().into();
        *cached = Some(Arc::clone(&arr));
        arr
    }
}

/// Maps `chunk_id -> ascending set of skipped row offsets` for one partition.
///
/// Adding skips is an idempotent set-union: re-submitting offsets already present is harmless
/// and re-submitting the same [`ChunkRowSkipIndex`] twice is a no-op. Empty entries (a chunk
/// with no skips yet) are represented rather than allocated on lookup, so `skips_for` on an
/// unknown chunk id returns an empty array rather than panicking.
#[derive(Default)]
pub struct SkipMap {
    entries: IntMap<ChunkId, SkipEntry>,
}

impl SkipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `skip.offsets` into the target chunk's skip set. Returns `true` if any new
    /// offset was added.
    pub fn add(&mut self, skip: &ChunkRowSkipIndex) -> bool {
        self.entries
            .entry(skip.target)
            .or_insert_with(SkipEntry::empty)
            .union_extend(&skip.offsets)
    }

    /// The current ascending, de-duplicated skip array for `chunk_id`. Empty if no skips have
    /// ever been recorded for it.
    pub fn skips_for(&self, chunk_id: ChunkId) -> Arc<[u64]> {
        match self.entries.get(&chunk_id) {
            Some(entry) => entry.array(),
            None => Arc::from([]),
        }
    }
}
