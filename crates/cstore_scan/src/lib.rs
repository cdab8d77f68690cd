//! Scan execution: turns a compiled [`cstore_predicate::ScanPlan`] into actual rows by
//! coordinating the backend traits (`cstore_backend`) with a freshly materialized
//! [`cstore_index::PartitionChunkIndex`] per partition.
//!
//! This crate interprets the plan's *shape* (`Single`/`Multi`/`Filtered`, `All`/`RowKeyRange`)
//! but never a predicate's meaning beyond calling the supplied residual-predicate function —
//! all pushdown decisions were already made by the compiler.

mod error;
mod executor;

pub use error::ScanError;
pub use executor::ScanExecutor;
