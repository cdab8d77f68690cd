//! The per-partition ingester controller: startup validation against a metadata store, then a
//! mailbox loop that accepts [`ChunkedColumns`] writes and persists them through a column store,
//! only updating partition shard bookkeeping after a write has durably succeeded.
//!
//! One controller owns exactly one `(dataset, partition)` pair for its lifetime; fan-out across
//! partitions is the caller's concern, not this crate's.

mod controller;
mod messages;
mod state;

pub use controller::{spawn, IngesterHandle};
pub use messages::{ChunkedColumns, IngesterEvent, IngesterMessage};
pub use state::IngesterState;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use cstore_backend::{
        ColumnStore, ColumnStoreError, Dataset, MetadataError, MetadataStore, PartitionRecord, Schema,
        ShardEntry, Split,
    };
    use cstore_chunk::{ChunkId, ChunkSetInfo};
    use cstore_types::{BinaryRecord, ColumnDef, DatasetRef, KeyType};

    use super::*;

    struct FakeMetadata {
        dataset_exists: bool,
        schema: Schema,
        partition_exists: bool,
        shard_entries: Mutex<Vec<ShardEntry>>,
    }

    impl FakeMetadata {
        fn ready(schema: Schema) -> Self {
            Self {
                dataset_exists: true,
                schema,
                partition_exists: true,
                shard_entries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MetadataStore for FakeMetadata {
        async fn get_dataset(&self, dataset: &DatasetRef) -> Result<Dataset, MetadataError> {
            if self.dataset_exists {
                Ok(Dataset {
                    dataset: dataset.clone(),
                })
            } else {
                Err(MetadataError::DatasetNotFound(dataset.clone()))
            }
        }

        async fn get_schema(&self, dataset: &DatasetRef, _version: i32) -> Result<Schema, MetadataError> {
            if self.schema.is_empty() {
                Err(MetadataError::SchemaUnavailable {
                    dataset: dataset.clone(),
                    version: 0,
                })
            } else {
                Ok(self.schema.clone())
            }
        }

        async fn get_partition(
            &self,
            dataset: &DatasetRef,
            _partition: &BinaryRecord,
        ) -> Result<PartitionRecord, MetadataError> {
            if self.partition_exists {
                Ok(PartitionRecord::default())
            } else {
                Err(MetadataError::PartitionNotFound(dataset.clone()))
            }
        }

        async fn update_partition_shards(
            &self,
            _dataset: &DatasetRef,
            _partition: &BinaryRecord,
            entry: ShardEntry,
        ) -> Result<(), MetadataError> {
            self.shard_entries.lock().unwrap().push(entry);
            Ok(())
        }
    }

    struct FakeColumnStore {
        reject_writes: bool,
        written: Mutex<Vec<(i32, i64, i64)>>,
    }

    impl FakeColumnStore {
        fn accepting() -> Self {
            Self {
                reject_writes: false,
                written: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ColumnStore for FakeColumnStore {
        async fn get_scan_splits(&self, _dataset: &DatasetRef, _splits_per_node: usize) -> Result<Vec<Split>, ColumnStoreError> {
            Ok(vec![])
        }

        async fn list_chunk_metadata(
            &self,
            _dataset: &DatasetRef,
            _partition: &BinaryRecord,
            _version: i32,
        ) -> Result<Vec<(ChunkSetInfo, Vec<u64>)>, ColumnStoreError> {
            Ok(vec![])
        }

        async fn write_chunk(
            &self,
            _dataset: &DatasetRef,
            _partition: &BinaryRecord,
            version: i32,
            _columns: Vec<(String, Vec<u8>)>,
            first_row_id: i64,
            last_row_id: i64,
        ) -> Result<ChunkSetInfo, ColumnStoreError> {
            if self.reject_writes {
                return Err(ColumnStoreError::WriteRejected {
                    reason: "fake rejects all writes".into(),
                });
            }
            self.written.lock().unwrap().push((version, first_row_id, last_row_id));
            ChunkSetInfo::new(
                ChunkId::new(1),
                (last_row_id - first_row_id + 1) as i32,
                BinaryRecord::from_encoded(vec![0]),
                BinaryRecord::from_encoded(vec![1]),
            )
            .map_err(|e| ColumnStoreError::WriteRejected { reason: e.to_string() })
        }
    }

    fn schema_with(column: &str) -> Schema {
        let mut schema = HashMap::new();
        schema.insert(column.to_string(), ColumnDef::new(column, KeyType::Long));
        schema
    }

    fn some_chunk(version: i32, first: i64, last: i64) -> ChunkedColumns {
        let mut columns = HashMap::new();
        columns.insert("value".to_string(), vec![1, 2, 3]);
        ChunkedColumns {
            version,
            first_row_id: first,
            last_row_id: last,
            acknowledged_row_id: last,
            columns,
        }
    }

    #[tokio::test]
    async fn empty_column_set_is_rejected_without_touching_the_metadata_store() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (_handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec![],
            metadata,
            column_store,
        );

        let event = events.recv().await.unwrap();
        assert!(matches!(event, IngesterEvent::NoDatasetColumns(_)));
    }

    #[tokio::test]
    async fn undefined_column_is_rejected_at_startup() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (_handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into(), "nope".into()],
            metadata,
            column_store,
        );

        let event = events.recv().await.unwrap();
        match event {
            IngesterEvent::UndefinedColumns(_, missing) => assert_eq!(missing, vec!["nope".to_string()]),
            other => panic!("expected UndefinedColumns, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_partition_is_rejected_as_not_found() {
        let mut metadata = FakeMetadata::ready(schema_with("value"));
        metadata.partition_exists = false;
        let metadata = Arc::new(metadata);
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (_handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into()],
            metadata,
            column_store,
        );

        let event = events.recv().await.unwrap();
        assert!(matches!(event, IngesterEvent::NotFound));
    }

    #[tokio::test]
    async fn happy_path_write_is_acked_and_recorded_in_shard_versions() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into()],
            metadata.clone(),
            column_store.clone(),
        );

        assert!(matches!(events.recv().await.unwrap(), IngesterEvent::GoodToGo { .. }));

        handle.chunked_columns(some_chunk(1, 0, 9)).await.unwrap();
        let event = events.recv().await.unwrap();
        assert!(matches!(event, IngesterEvent::Ack(_, _, 9)));
        assert_eq!(metadata.shard_entries.lock().unwrap().len(), 1);
        assert_eq!(column_store.written.lock().unwrap().as_slice(), &[(1, 0, 9)]);
    }

    #[tokio::test]
    async fn negative_version_is_a_sharding_error_and_never_reaches_the_column_store() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into()],
            metadata,
            column_store.clone(),
        );

        assert!(matches!(events.recv().await.unwrap(), IngesterEvent::GoodToGo { .. }));

        handle.chunked_columns(some_chunk(-1, 0, 9)).await.unwrap();
        let event = events.recv().await.unwrap();
        assert!(matches!(event, IngesterEvent::ShardingError(_, _, 9)));
        assert!(column_store.written.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_write_never_updates_shard_versions() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore {
            reject_writes: true,
            written: Mutex::new(Vec::new()),
        });

        let (handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into()],
            metadata.clone(),
            column_store,
        );

        assert!(matches!(events.recv().await.unwrap(), IngesterEvent::GoodToGo { .. }));

        handle.chunked_columns(some_chunk(1, 0, 9)).await.unwrap();
        let event = events.recv().await.unwrap();
        assert!(matches!(event, IngesterEvent::ShardingError(_, _, 9)));
        assert!(metadata.shard_entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stop_drains_an_already_queued_chunk_before_terminating() {
        let metadata = Arc::new(FakeMetadata::ready(schema_with("value")));
        let column_store = Arc::new(FakeColumnStore::accepting());

        let (handle, mut events) = spawn(
            DatasetRef::new("metrics"),
            BinaryRecord::from_encoded(vec![0]),
            vec!["value".into()],
            metadata.clone(),
            column_store,
        );

        assert!(matches!(events.recv().await.unwrap(), IngesterEvent::GoodToGo { .. }));

        handle.chunked_columns(some_chunk(1, 0, 9)).await.unwrap();
        handle.stop().await.unwrap();

        assert!(matches!(events.recv().await.unwrap(), IngesterEvent::Ack(_, _, 9)));
        assert_eq!(metadata.shard_entries.lock().unwrap().len(), 1);
    }
}
