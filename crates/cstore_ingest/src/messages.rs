use std::collections::HashMap;

use cstore_types::{BinaryRecord, DatasetRef};

/// One accepted write batch, as handed to a `Ready` controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkedColumns {
    pub version: i32,
    pub first_row_id: i64,
    pub last_row_id: i64,
    pub acknowledged_row_id: i64,
    pub columns: HashMap<String, Vec<u8>>,
}

/// Inbound messages a controller's mailbox accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum IngesterMessage {
    ChunkedColumns(ChunkedColumns),
    Stop,
}

/// Outbound acknowledgements and diagnostics a controller emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngesterEvent {
    /// Startup: the dataset doesn't exist, or the requested column set was empty.
    NoDatasetColumns(DatasetRef),
    /// Startup: the partition record doesn't exist.
    NotFound,
    /// Startup: some requested columns aren't defined in the dataset schema.
    UndefinedColumns(DatasetRef, Vec<String>),
    /// Startup succeeded; the controller transitions to `Ready`.
    GoodToGo { dataset: DatasetRef, partition: BinaryRecord },
    /// A chunk was accepted and durably persisted.
    Ack(DatasetRef, BinaryRecord, i64),
    /// A chunk was rejected (invalid shape) or failed to persist.
    ShardingError(DatasetRef, BinaryRecord, i64),
}
