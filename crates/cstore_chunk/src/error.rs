use cstore_types::BinaryRecord;

/// Errors raised while constructing or validating a [`crate::ChunkSetInfo`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk first_key {first_key} is greater than last_key {last_key}")]
    UnorderedInterval {
        first_key: BinaryRecord,
        last_key: BinaryRecord,
    },

    #[error("chunk has num_rows={num_rows}, expected a non-negative row count")]
    NegativeRowCount { num_rows: i32 },
}
