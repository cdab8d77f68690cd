use cstore_chunk::ChunkSetInfo;
use cstore_types::{BinaryRecord, DatasetRef};

use crate::{ColumnStoreError, Split};

/// One decoded row as handed back by a [`RowReaderFactory`].
///
/// Column values are opaque bytes: physical column decoding is a backend concern, out of scope
/// for this crate family — the index and the compiler only ever need a chunk's *identity* and
/// *key interval*, never its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub columns: Vec<(String, Vec<u8>)>,
}

/// Builds row readers for selected chunks. Injected into the scan executor so that physical
/// decoding stays a pluggable backend concern: the column store knows where chunk bytes live,
/// but turning them into rows (and respecting skip offsets) is supplied by the caller's
/// deployment, not hard-wired into this crate.
pub trait RowReaderFactory: Send + Sync {
    /// Returns the rows of `chunk` restricted to `columns`, excluding any offset in `skips`.
    fn read_chunk(
        &self,
        chunk: &ChunkSetInfo,
        skips: &[u64],
        columns: &[String],
    ) -> Result<Vec<Row>, ColumnStoreError>;
}

/// The durable column store: chunk persistence and split/metadata enumeration.
///
/// Row materialization from a compiled scan plan is the scan executor's job (`cstore_scan`),
/// composed from the narrower primitives below plus a [`RowReaderFactory`]; this trait only
/// covers the facts a backend alone can supply.
#[async_trait::async_trait]
pub trait ColumnStore: Send + Sync {
    /// Enumerates backend-defined scan splits, at most `splits_per_node` per node.
    async fn get_scan_splits(
        &self,
        dataset: &DatasetRef,
        splits_per_node: usize,
    ) -> Result<Vec<Split>, ColumnStoreError>;

    /// Lists the chunk metadata and skip offsets backing `partition` at `version`, in
    /// unspecified order. Callers fold these into a `PartitionChunkIndex` to query further;
    /// this is how the index is "materialized lazily from backend metadata".
    async fn list_chunk_metadata(
        &self,
        dataset: &DatasetRef,
        partition: &BinaryRecord,
        version: i32,
    ) -> Result<Vec<(ChunkSetInfo, Vec<u64>)>, ColumnStoreError>;

    /// Persists one ingested chunk's column buffers and returns its committed descriptor.
    async fn write_chunk(
        &self,
        dataset: &DatasetRef,
        partition: &BinaryRecord,
        version: i32,
        columns: Vec<(String, Vec<u8>)>,
        first_row_id: i64,
        last_row_id: i64,
    ) -> Result<ChunkSetInfo, ColumnStoreError>;
}
