use std::sync::Arc;

use cstore_types::{BinaryRecord, RichProjection};

/// A compiled, reusable residual predicate over an encoded partition key.
///
/// Wraps an `Arc` so `PartitionScanMethod::Filtered` stays cheap to clone; the closure itself
/// captures only what [`crate::compile`] needed to decide column membership, never the full
/// filter list.
#[derive(Clone)]
pub struct ResidualPredicate(Arc<dyn Fn(&BinaryRecord) -> bool + Send + Sync>);

impl ResidualPredicate {
    pub fn new(f: impl Fn(&BinaryRecord) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The predicate that accepts every key; used when a `Filtered` plan carries no column
    /// constraint at all (every partition column was unpushable, or none had any filter).
    pub fn always_true() -> Self {
        Self::new(|_| true)
    }

    pub fn test(&self, key: &BinaryRecord) -> bool {
        (self.0)(key)
    }
}

impl std::fmt::Debug for ResidualPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResidualPredicate(..)")
    }
}

/// How the executor should enumerate partitions for one query.
#[derive(Debug, Clone)]
pub enum PartitionScanMethod {
    /// Every partition-key column had an `Eq` (or singleton `In`) filter: exactly one partition
    /// key is addressed.
    Single(BinaryRecord),
    /// Every partition-key column was pushable and the Cartesian product of their value sets
    /// stayed within the configured combination cap.
    Multi(Vec<BinaryRecord>),
    /// Either some partition-key column had no pushable filter, or the combination cap was
    /// exceeded: the executor must ask the backend for scan splits and apply `predicate` to
    /// each candidate partition key itself.
    Filtered(ResidualPredicate),
}

/// How the executor should prune chunks within a selected partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkScanMethod {
    All,
    RowKeyRange(BinaryRecord, BinaryRecord),
}

/// The full output of [`crate::compile`]: how to pick partitions, and how to prune chunks
/// within each.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    pub projection: Arc<RichProjection>,
    pub partition_scan: PartitionScanMethod,
    pub chunk_scan: ChunkScanMethod,
}
