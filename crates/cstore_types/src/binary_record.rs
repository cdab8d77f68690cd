use std::cmp::Ordering;
use std::sync::Arc;

use crate::{KeyType, KeyValue};

/// An immutable, order-preserving byte encoding of a tuple of typed key fields.
///
/// `BinaryRecord`s are compared by plain byte order (see [`Ord`]); the encoding in
/// [`encode_field`] is chosen so that byte order always matches the declared field order,
/// which is what lets [`crate::RichProjection::encode_row_key`] results be dropped straight
/// into an ordered container without a custom comparator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinaryRecord(Arc<[u8]>);

impl BinaryRecord {
    /// Wraps an already-encoded byte buffer.
    ///
    /// Only [`crate::RichProjection::encode_partition_key`] and
    /// [`crate::RichProjection::encode_row_key`] should normally produce these; exposed for
    /// backend adapters that read back an already-encoded key from storage.
    pub fn from_encoded(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Total order over two records. Equivalent to `self.cmp(other)`; spelled out because the
    /// compiler and the chunk index call it by name to stay close to the specification's
    /// vocabulary.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl std::fmt::Display for BinaryRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x")?;
        for b in self.0.iter() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Encodes a single field's value into `out`, matching `key_type`.
///
/// Fixed-width numeric fields use big-endian, sign-flipped encoding so that byte order equals
/// numeric order for both positive and negative values. Strings are length-prefixed (a 4-byte
/// big-endian length followed by the UTF-8 bytes) so that a shorter string never needs to be a
/// byte-wise prefix of a longer one to sort correctly.
pub(crate) fn encode_field(
    column: &str,
    key_type: &KeyType,
    value: &KeyValue,
    out: &mut Vec<u8>,
) -> Result<(), crate::EncodingError> {
    match (key_type, value) {
        (KeyType::Int, KeyValue::Int(v)) => {
            out.extend_from_slice(&((*v as u32) ^ 0x8000_0000).to_be_bytes());
        }
        (KeyType::Long, KeyValue::Long(v)) | (KeyType::Timestamp, KeyValue::Timestamp(v)) => {
            out.extend_from_slice(&((*v as u64) ^ 0x8000_0000_0000_0000).to_be_bytes());
        }
        (KeyType::Str, KeyValue::Str(v)) => {
            out.extend_from_slice(&(v.len() as u32).to_be_bytes());
            out.extend_from_slice(v.as_bytes());
        }
        (KeyType::Composite(fields), KeyValue::Composite(values)) => {
            if fields.len() != values.len() {
                return Err(crate::EncodingError::Arity {
                    expected: fields.len(),
                    got: values.len(),
                });
            }
            for (field, value) in fields.iter().zip(values) {
                encode_field(column, field, value, out)?;
            }
        }
        _ => {
            return Err(crate::EncodingError::TypeMismatch {
                column: column.to_string(),
                expected: key_type.clone(),
                got: value.key_type(),
            })
        }
    }
    Ok(())
}

/// Splits an encoded buffer back into one byte slice per leaf field of `columns`, in order.
///
/// Mirrors [`encode_field`]'s layout exactly: fixed-width numerics consume their declared
/// width, strings are read via their length prefix, and composites recurse. Returns `None` if
/// `bytes` doesn't fully decompose against `columns` (wrong layout, truncated buffer). Used by
/// the residual-predicate compiler to test a single partition column without re-encoding the
/// whole key.
pub fn split_leaf_fields<'b>(columns: &[crate::ColumnDef], bytes: &'b [u8]) -> Option<Vec<&'b [u8]>> {
    let mut out = Vec::new();
    let mut offset = 0;
    for column in columns {
        offset = split_one(&column.key_type, bytes, offset, &mut out)?;
    }
    (offset == bytes.len()).then_some(out)
}

fn split_one<'b>(key_type: &KeyType, bytes: &'b [u8], offset: usize, out: &mut Vec<&'b [u8]>) -> Option<usize> {
    match key_type {
        KeyType::Int => {
            let end = offset.checked_add(4)?;
            out.push(bytes.get(offset..end)?);
            Some(end)
        }
        KeyType::Long | KeyType::Timestamp => {
            let end = offset.checked_add(8)?;
            out.push(bytes.get(offset..end)?);
            Some(end)
        }
        KeyType::Str => {
            let len_bytes = bytes.get(offset..offset.checked_add(4)?)?;
            let len = u32::from_be_bytes(len_bytes.try_into().ok()?) as usize;
            let start = offset + 4;
            let end = start.checked_add(len)?;
            out.push(bytes.get(start..end)?);
            Some(end)
        }
        KeyType::Composite(fields) => {
            let mut offset = offset;
            for field in fields {
                offset = split_one(field, bytes, offset, out)?;
            }
            Some(offset)
        }
    }
}
