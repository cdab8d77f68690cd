use std::collections::HashMap;

use cstore_types::{BinaryRecord, ColumnDef, DatasetRef};

/// The metadata store's view of a dataset: that it exists, nothing more. Column and key layout
/// are fetched separately via [`crate::MetadataStore::get_schema`], since a schema is versioned
/// independently of the dataset's existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub dataset: DatasetRef,
}

/// A dataset's column schema at a given version, as returned by `get_schema`.
pub type Schema = HashMap<String, ColumnDef>;

/// One accepted write batch recorded against a partition's `shardVersions` map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardEntry {
    pub version: i32,
    pub first_row_id: i64,
    pub last_row_id: i64,
    pub acknowledged_row_id: i64,
}

/// The metadata store's durable record of one partition: which shard versions have been
/// accepted so far.
///
/// `shard_versions` is only ever appended to, and only after the corresponding write has been
/// durably persisted by the column store — see [`crate::MetadataStore::update_partition_shards`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartitionRecord {
    pub shard_versions: Vec<ShardEntry>,
}

/// A backend-defined unit of parallel scan work, tagged with its preferred host locations.
///
/// `partition_keys` lists the candidate partitions assigned to this split; for a `Filtered`
/// partition scan, the executor tests each of these against the compiled residual predicate
/// and reads only the survivors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub id: u32,
    pub hostnames: Vec<String>,
    pub partition_keys: Vec<BinaryRecord>,
}
