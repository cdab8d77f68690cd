//! A partition chunk index and chunk-scan planner for a columnar time-series store.
//!
//! This crate is a thin facade: it re-exports the public surface of its component crates so
//! that a caller depends on one thing instead of six. The actual work is split by concern:
//!
//! - [`cstore_types`]: order-preserving binary key encoding and the column/key-type registry.
//! - [`cstore_chunk`]: chunk metadata descriptors, intersection tests, and the skip map.
//! - [`cstore_index`]: the per-partition chunk index (row-key ordered and chunk-id ordered).
//! - [`cstore_predicate`]: compiles filters into a [`ScanPlan`].
//! - [`cstore_backend`]: the metadata-store and column-store contracts this crate consumes but
//!   does not implement.
//! - [`cstore_scan`]: executes a compiled plan against those contracts.
//! - [`cstore_ingest`]: the per-partition ingester controller.
//!
//! None of these modules own an external metadata or column store; a caller supplies its own
//! implementations of [`MetadataStore`] and [`ColumnStore`] and this crate supplies the index,
//! the planner, and the execution/ingestion glue around them.

pub use cstore_backend::{
    ColumnStore, ColumnStoreError, Dataset, MetadataError, MetadataStore, PartitionRecord, Row,
    RowReaderFactory, Schema, ShardEntry, Split,
};
pub use cstore_chunk::{ChunkError, ChunkId, ChunkRowSkipIndex, ChunkSetInfo, SkipMap};
pub use cstore_index::{ChunkIdOrderedIndex, IndexOrdering, PartitionChunkIndex, RowKeyOrderedIndex};
pub use cstore_ingest::{spawn as spawn_ingester, ChunkedColumns, IngesterEvent, IngesterHandle, IngesterMessage, IngesterState};
pub use cstore_predicate::{compile, ChunkScanMethod, CompileError, CompilerConfig, Filter, PartitionScanMethod, ResidualPredicate, ScanPlan};
pub use cstore_scan::{ScanError, ScanExecutor};
pub use cstore_types::{BinaryRecord, ColumnDef, DatasetRef, EncodingError, KeyParseError, KeyType, KeyValue, RawValue, RichProjection};
