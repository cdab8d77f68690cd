use cstore_types::{EncodingError, KeyParseError};

/// Errors raised while compiling filters into a [`crate::ScanPlan`].
///
/// Every variant here is fatal to the query: recoverable degradations (an unpushable filter, a
/// gapped row-key prefix, a combination count above the cap) are not errors — the compiler logs
/// a diagnostic and picks a conservative plan instead. See `compile`'s module docs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("unsupported filter on partition column {column:?}: {filter}")]
    UnsupportedFilter { column: String, filter: String },

    #[error(transparent)]
    KeyParse(#[from] KeyParseError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
