use crate::KeyType;

/// Errors that can occur while encoding a tuple of [`crate::KeyValue`]s into a [`crate::BinaryRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("expected {expected} key field(s) but got {got}")]
    Arity { expected: usize, got: usize },

    #[error("column {column:?}: expected a value of type {expected:?}, got {got:?}")]
    TypeMismatch {
        column: String,
        expected: KeyType,
        got: KeyType,
    },
}

/// Errors that can occur while parsing a raw filter literal against a declared [`KeyType`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("column {column:?}: cannot parse {raw} as {expected:?}")]
    TypeMismatch {
        column: String,
        expected: KeyType,
        raw: String,
    },
}
