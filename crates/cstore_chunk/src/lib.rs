//! Chunk metadata descriptors and the per-partition skip map.
//!
//! A chunk is an immutable batch of rows; this crate only carries its *metadata* — identity,
//! row count and key interval ([`ChunkSetInfo`]) — plus the bookkeeping of which of an older
//! chunk's rows have been superseded by later ingests ([`SkipMap`]). It knows nothing about
//! partitions or queries; [`cstore_index`] builds the ordered index on top of these.

mod chunk_id;
mod chunk_info;
mod error;
mod skip_map;

pub use chunk_id::ChunkId;
pub use chunk_info::ChunkSetInfo;
pub use error::ChunkError;
pub use skip_map::{ChunkRowSkipIndex, SkipMap};
