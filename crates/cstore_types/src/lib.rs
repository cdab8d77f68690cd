//! Order-preserving binary key encodings and the key-type registry.
//!
//! This crate has no knowledge of chunks, partitions or scan plans; it only knows how to turn a
//! declared column layout ([`RichProjection`]) plus a tuple of typed values ([`KeyValue`]) into
//! a comparable byte string ([`BinaryRecord`]), and how to parse an untyped filter literal
//! ([`RawValue`]) back against that layout.

mod binary_record;
mod error;
mod key_type;
mod projection;

pub use binary_record::BinaryRecord;
pub use error::{EncodingError, KeyParseError};
pub use key_type::{KeyType, KeyValue, RawValue};
pub use projection::{ColumnDef, DatasetRef, RichProjection};
