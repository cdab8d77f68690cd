use cstore_types::RawValue;

/// One structured filter expression over a declared column.
///
/// This is the closed set the compiler understands; anything else a caller might want to
/// express (substring match, regex, ...) has to be applied downstream of the scan as a residual
/// check the compiler plays no part in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    EqualTo(String, RawValue),
    In(String, Vec<RawValue>),
    GreaterThan(String, RawValue),
    GreaterThanOrEqual(String, RawValue),
    LessThan(String, RawValue),
    LessThanOrEqual(String, RawValue),
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Self::EqualTo(c, _)
            | Self::In(c, _)
            | Self::GreaterThan(c, _)
            | Self::GreaterThanOrEqual(c, _)
            | Self::LessThan(c, _)
            | Self::LessThanOrEqual(c, _) => c,
        }
    }
}
