/// The stable identifier of a chunk within its partition.
///
/// Assigned monotonically at ingest commit and never reused; used both as the unique tiebreaker
/// in the row-key-ordered index's `(first_key, chunk_id)` comparator and as the sole key of the
/// chunk-id-ordered index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub u64);

impl ChunkId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChunkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl nohash_hasher::IsEnabled for ChunkId {}

/// Lets a `ChunkId` be used directly as the key of a [`nohash_hasher::IntMap`].
impl From<ChunkId> for u64 {
    fn from(id: ChunkId) -> Self {
        id.0
    }
}
