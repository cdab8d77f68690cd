use cstore_types::DatasetRef;

/// Errors surfaced by the metadata store contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("dataset {0} not found")]
    DatasetNotFound(DatasetRef),

    #[error("partition not found in dataset {0}")]
    PartitionNotFound(DatasetRef),

    #[error("schema lookup failed for dataset {dataset} version {version}")]
    SchemaUnavailable { dataset: DatasetRef, version: i32 },

    #[error("metadata store update rejected: {reason}")]
    UpdateRejected { reason: String },
}

/// Errors surfaced by the column store contract.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnStoreError {
    #[error("dataset {0} has no scan splits available")]
    NoSplits(DatasetRef),

    #[error("write rejected: {reason}")]
    WriteRejected { reason: String },

    #[error("chunk read failed: {reason}")]
    ReadFailed { reason: String },
}
