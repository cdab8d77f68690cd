/// Tags the encoding, comparison and parsing rules of a single key field.
///
/// `KeyType`s are immutable and process-wide: the same tag always implies the same byte
/// encoding, so two [`crate::BinaryRecord`]s built against the same declared field order are
/// always comparable by plain byte order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyType {
    Int,
    Long,
    Str,
    Timestamp,
    /// A fixed-arity tuple of sub-fields, encoded back to back in order.
    Composite(Vec<KeyType>),
}

impl KeyType {
    /// Number of [`KeyValue`] slots this type consumes when flattened into a field list.
    ///
    /// Only `Composite` ever returns more than one; used solely for arity checks.
    pub fn arity(&self) -> usize {
        match self {
            Self::Composite(fields) => fields.iter().map(Self::arity).sum(),
            _ => 1,
        }
    }
}

/// A typed value to be encoded against a [`KeyType`], or produced by parsing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyValue {
    Int(i32),
    Long(i64),
    Str(String),
    Timestamp(i64),
    Composite(Vec<KeyValue>),
}

impl KeyValue {
    /// The [`KeyType`] this value would encode as, used for typechecking on write.
    pub fn key_type(&self) -> KeyType {
        match self {
            Self::Int(_) => KeyType::Int,
            Self::Long(_) => KeyType::Long,
            Self::Str(_) => KeyType::Str,
            Self::Timestamp(_) => KeyType::Timestamp,
            Self::Composite(vs) => KeyType::Composite(vs.iter().map(Self::key_type).collect()),
        }
    }
}

/// An untyped literal as it arrives from a filter expression, before it has been checked
/// against a [`KeyType`].
///
/// Filters are parsed from whatever the caller supplied (a CLI argument, a deserialized
/// predicate, ...), so they carry no static type of their own until [`crate::parse_single_value`]
/// or [`crate::parse_values`] resolves them against the projection's declared column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawValue {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
        }
    }
}
