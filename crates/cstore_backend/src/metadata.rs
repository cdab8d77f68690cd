use cstore_types::{BinaryRecord, DatasetRef};

use crate::{Dataset, MetadataError, PartitionRecord, Schema, ShardEntry};

/// The metadata store: dataset and schema lookup, and partition shard bookkeeping.
///
/// Consumed, never owned: implementations are expected to be thread-safe, process-wide
/// singletons (see the crate-level docs), reached through this trait so that the ingester and
/// the scan executor can be tested against an in-memory fake.
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    async fn get_dataset(&self, dataset: &DatasetRef) -> Result<Dataset, MetadataError>;

    async fn get_schema(&self, dataset: &DatasetRef, version: i32) -> Result<Schema, MetadataError>;

    async fn get_partition(
        &self,
        dataset: &DatasetRef,
        partition: &BinaryRecord,
    ) -> Result<PartitionRecord, MetadataError>;

    /// Appends `entry` to the partition's `shardVersions` map. Must only be called after the
    /// corresponding write has been durably persisted by the column store: a failed write must
    /// never reach this call, so that a concurrent `get_partition` never observes a shard entry
    /// whose data isn't actually there.
    async fn update_partition_shards(
        &self,
        dataset: &DatasetRef,
        partition: &BinaryRecord,
        entry: ShardEntry,
    ) -> Result<(), MetadataError>;
}
