use crate::binary_record::encode_field;
use crate::{BinaryRecord, EncodingError, KeyParseError, KeyType, KeyValue, RawValue};

/// Identifies a dataset (the unit of schema and partitioning) by its user-facing name.
///
/// Grouped into its own type rather than a bare `String` so that the backend traits in
/// `cstore_backend` can key their lookup tables on something `Copy`-cheap-ish and
/// self-documenting at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetRef(pub String);

impl DatasetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single column's declared name and key type, as carried in a [`RichProjection`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnDef {
    pub name: String,
    pub key_type: KeyType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, key_type: KeyType) -> Self {
        Self {
            name: name.into(),
            key_type,
        }
    }
}

/// The resolved, ordered column layout of a dataset: which columns form the partition key,
/// which form the row key, and their declared types.
///
/// `RichProjection` is the thing that turns a bag of [`KeyValue`]s into a [`BinaryRecord`]:
/// partition-key columns and row-key columns are each encoded in their declared order, so two
/// `RichProjection`s built from different column orderings produce incomparable records even
/// if their column sets are the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichProjection {
    pub dataset: DatasetRef,
    partition_columns: Vec<ColumnDef>,
    row_key_columns: Vec<ColumnDef>,
}

impl RichProjection {
    pub fn new(
        dataset: DatasetRef,
        partition_columns: Vec<ColumnDef>,
        row_key_columns: Vec<ColumnDef>,
    ) -> Self {
        Self {
            dataset,
            partition_columns,
            row_key_columns,
        }
    }

    pub fn partition_columns(&self) -> &[ColumnDef] {
        &self.partition_columns
    }

    pub fn row_key_columns(&self) -> &[ColumnDef] {
        &self.row_key_columns
    }

    /// Looks up a column by name in either key, partition columns taking precedence.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.partition_columns
            .iter()
            .chain(self.row_key_columns.iter())
            .find(|c| c.name == name)
    }

    /// Encodes `values` (one per [`Self::partition_columns`], in order) into a [`BinaryRecord`].
    pub fn encode_partition_key(&self, values: &[KeyValue]) -> Result<BinaryRecord, EncodingError> {
        encode_columns(&self.partition_columns, values)
    }

    /// Encodes `values` (one per [`Self::row_key_columns`], in order) into a [`BinaryRecord`].
    pub fn encode_row_key(&self, values: &[KeyValue]) -> Result<BinaryRecord, EncodingError> {
        encode_columns(&self.row_key_columns, values)
    }

    /// Parses a single raw filter literal against the declared type of `column`.
    pub fn parse_single_value(&self, column: &str, raw: &RawValue) -> Result<KeyValue, KeyParseError> {
        let def = self
            .column(column)
            .ok_or_else(|| KeyParseError::TypeMismatch {
                column: column.to_string(),
                expected: KeyType::Str,
                raw: raw.to_string(),
            })?;
        parse_single(&def.key_type, raw).ok_or_else(|| KeyParseError::TypeMismatch {
            column: column.to_string(),
            expected: def.key_type.clone(),
            raw: raw.to_string(),
        })
    }

    /// Parses each of `raws` against the declared type of `column`, short-circuiting on the
    /// first failure.
    pub fn parse_values(&self, column: &str, raws: &[RawValue]) -> Result<Vec<KeyValue>, KeyParseError> {
        raws.iter()
            .map(|raw| self.parse_single_value(column, raw))
            .collect()
    }

    /// Splits an already-encoded partition key back into one byte slice per partition column,
    /// in declared order. Used by the residual-predicate compiler to test a single column of a
    /// candidate partition key without decoding the whole tuple.
    pub fn partition_field_slices<'b>(&self, key: &'b BinaryRecord) -> Option<Vec<&'b [u8]>> {
        crate::binary_record::split_leaf_fields(&self.partition_columns, key.as_bytes())
    }

    /// Encodes a single partition column's value in isolation, for building the
    /// byte-level allowed-value sets a residual predicate tests slices against.
    pub fn encode_partition_key_field(&self, column: &ColumnDef, value: &KeyValue) -> Result<Vec<u8>, EncodingError> {
        let mut buf = Vec::new();
        encode_field(&column.name, &column.key_type, value, &mut buf)?;
        Ok(buf)
    }

    /// Encodes `values` against an explicit, possibly-partial, ordered slice of row-key
    /// columns — used by the predicate compiler to build a prefix bound rather than a full
    /// row key.
    pub fn encode_row_key_prefix(&self, columns: &[ColumnDef], values: &[KeyValue]) -> Result<BinaryRecord, EncodingError> {
        encode_columns(columns, values)
    }
}

fn encode_columns(columns: &[ColumnDef], values: &[KeyValue]) -> Result<BinaryRecord, EncodingError> {
    if columns.len() != values.len() {
        return Err(EncodingError::Arity {
            expected: columns.len(),
            got: values.len(),
        });
    }
    let mut buf = Vec::new();
    for (column, value) in columns.iter().zip(values) {
        encode_field(&column.name, &column.key_type, value, &mut buf)?;
    }
    Ok(BinaryRecord::from_encoded(buf))
}

/// Converts an untyped [`RawValue`] into a [`KeyValue`] of the given type, or `None` if the
/// combination is not representable.
///
/// Only scalar [`KeyType`]s are reachable from raw filter literals: a `Composite` column can
/// never be the target of a single-value filter comparison, so it is treated as unparseable
/// here rather than given a made-up decomposition rule.
fn parse_single(key_type: &KeyType, raw: &RawValue) -> Option<KeyValue> {
    match (key_type, raw) {
        (KeyType::Int, RawValue::Int(v)) => i32::try_from(*v).ok().map(KeyValue::Int),
        (KeyType::Long, RawValue::Int(v)) => Some(KeyValue::Long(*v)),
        (KeyType::Timestamp, RawValue::Int(v)) => Some(KeyValue::Timestamp(*v)),
        (KeyType::Str, RawValue::Str(v)) => Some(KeyValue::Str(v.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> RichProjection {
        RichProjection::new(
            DatasetRef::new("metrics"),
            vec![ColumnDef::new("metric", KeyType::Str)],
            vec![
                ColumnDef::new("shard", KeyType::Int),
                ColumnDef::new("ts", KeyType::Timestamp),
            ],
        )
    }

    #[test]
    fn row_key_order_matches_declared_order() {
        let proj = projection();
        let a = proj
            .encode_row_key(&[KeyValue::Int(0), KeyValue::Timestamp(100)])
            .unwrap();
        let b = proj
            .encode_row_key(&[KeyValue::Int(0), KeyValue::Timestamp(200)])
            .unwrap();
        assert!(a < b);
    }

    #[test]
    fn arity_mismatch_is_an_error() {
        let proj = projection();
        let err = proj.encode_row_key(&[KeyValue::Int(0)]).unwrap_err();
        assert!(matches!(err, EncodingError::Arity { .. }));
    }

    #[test]
    fn parse_single_value_respects_declared_type() {
        let proj = projection();
        let parsed = proj.parse_single_value("shard", &RawValue::Int(7)).unwrap();
        assert_eq!(parsed, KeyValue::Int(7));

        let err = proj.parse_single_value("shard", &RawValue::Str("x".into())).unwrap_err();
        assert!(matches!(err, KeyParseError::TypeMismatch { .. }));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let proj = projection();
        assert!(proj.parse_single_value("nope", &RawValue::Int(1)).is_err());
    }
}
