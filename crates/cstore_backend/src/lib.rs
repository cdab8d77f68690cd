//! Contract traits for the two external collaborators this store core consumes but does not
//! own: the metadata store (dataset/schema/partition bookkeeping) and the durable column store
//! (chunk persistence and enumeration).
//!
//! Everything here is a trait plus its value types; there is no in-process implementation.
//! `cstore_ingest` and `cstore_scan` are generic over these traits so that tests can supply
//! in-memory fakes without touching a real backend.

mod column_store;
mod error;
mod metadata;
mod types;

pub use column_store::{ColumnStore, Row, RowReaderFactory};
pub use error::{ColumnStoreError, MetadataError};
pub use metadata::MetadataStore;
pub use types::{Dataset, PartitionRecord, Schema, ShardEntry, Split};
