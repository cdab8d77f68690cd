use cstore_backend::{ColumnStoreError, MetadataError};

/// Errors surfaced to a scan's caller. The executor never interprets a predicate or degrades a
/// plan itself — by the time it runs, `cstore_predicate::compile` has already made every
/// degradation decision, so anything reaching here is a genuine backend failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    ColumnStore(#[from] ColumnStoreError),
}
