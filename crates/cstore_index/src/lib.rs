//! The per-partition chunk index: two interchangeable layouts over chunk descriptors and skip
//! maps, selected at construction and dispatched through a single tagged enum.
//!
//! [`PartitionChunkIndex`] is the query surface callers use; [`RowKeyOrderedIndex`] and
//! [`ChunkIdOrderedIndex`] are its two concrete backings, exposed for direct use by tests and by
//! callers that already know which layout they want and don't need the dispatch overhead.

mod chunk_id_ordered;
mod index;
mod row_key_ordered;

pub use chunk_id_ordered::ChunkIdOrderedIndex;
pub use index::{IndexOrdering, PartitionChunkIndex};
pub use row_key_ordered::RowKeyOrderedIndex;
