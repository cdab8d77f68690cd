//! Compiles structured filter expressions into a scan plan: which partitions to visit, and how
//! to prune chunks within each.
//!
//! The compiler never evaluates a predicate itself — it only ever produces a plan the scan
//! executor (`cstore_scan`) carries out. Recoverable degradations (an unpushable filter, a
//! gapped row-key prefix, too many partition combinations) are logged and folded into a
//! conservative plan rather than surfaced as errors; see [`CompileError`] for what *is* fatal.

mod compiler;
mod error;
mod filter;
mod plan;

pub use compiler::{compile, CompilerConfig};
pub use error::CompileError;
pub use filter::Filter;
pub use plan::{ChunkScanMethod, PartitionScanMethod, ResidualPredicate, ScanPlan};

#[cfg(test)]
mod tests {
    use super::*;
    use cstore_types::{ColumnDef, DatasetRef, KeyType, RawValue, RichProjection};

    fn gdelt_projection() -> RichProjection {
        RichProjection::new(
            DatasetRef::new("gdelt"),
            vec![ColumnDef::new("monthYear", KeyType::Str)],
            vec![
                ColumnDef::new("year", KeyType::Int),
                ColumnDef::new("month", KeyType::Int),
            ],
        )
    }

    #[test]
    fn single_partition_when_every_column_has_eq() {
        let proj = RichProjection::new(
            DatasetRef::new("metrics"),
            vec![
                ColumnDef::new("region", KeyType::Str),
                ColumnDef::new("host", KeyType::Str),
            ],
            vec![],
        );
        let filters = vec![
            Filter::EqualTo("region".into(), RawValue::Str("us".into())),
            Filter::EqualTo("host".into(), RawValue::Str("h1".into())),
        ];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        let expected = proj
            .encode_partition_key(&[
                cstore_types::KeyValue::Str("us".into()),
                cstore_types::KeyValue::Str("h1".into()),
            ])
            .unwrap();
        match plan.partition_scan {
            PartitionScanMethod::Single(key) => assert_eq!(key, expected),
            other => panic!("expected Single, got {other:?}"),
        }
    }

    #[test]
    fn multi_partition_cap_degrades_to_filtered() {
        let proj = RichProjection::new(
            DatasetRef::new("metrics"),
            vec![
                ColumnDef::new("col1", KeyType::Str),
                ColumnDef::new("col2", KeyType::Str),
            ],
            vec![],
        );
        let filters = vec![
            Filter::In(
                "col1".into(),
                vec![RawValue::Str("a".into()), RawValue::Str("b".into())],
            ),
            Filter::In(
                "col2".into(),
                vec![
                    RawValue::Str("x".into()),
                    RawValue::Str("y".into()),
                    RawValue::Str("z".into()),
                ],
            ),
        ];
        let config = CompilerConfig {
            inquery_partitions_limit: 4,
        };
        let plan = compile(&filters, &proj, &config).unwrap();
        assert!(matches!(plan.partition_scan, PartitionScanMethod::Filtered(_)));
    }

    #[test]
    fn row_key_range_pushdown_with_terminal_bound_pair() {
        let proj = gdelt_projection();
        let filters = vec![
            Filter::EqualTo("year".into(), RawValue::Int(1979)),
            Filter::GreaterThan("month".into(), RawValue::Int(3)),
            Filter::LessThanOrEqual("month".into(), RawValue::Int(9)),
        ];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        let expected_first = proj
            .encode_row_key(&[cstore_types::KeyValue::Int(1979), cstore_types::KeyValue::Int(3)])
            .unwrap();
        let expected_last = proj
            .encode_row_key(&[cstore_types::KeyValue::Int(1979), cstore_types::KeyValue::Int(9)])
            .unwrap();
        match plan.chunk_scan {
            ChunkScanMethod::RowKeyRange(first, last) => {
                assert_eq!(first, expected_first);
                assert_eq!(last, expected_last);
            }
            other => panic!("expected RowKeyRange, got {other:?}"),
        }
    }

    #[test]
    fn gapped_row_key_prefix_falls_back_to_all() {
        let proj = RichProjection::new(
            DatasetRef::new("ds"),
            vec![],
            vec![
                ColumnDef::new("a", KeyType::Int),
                ColumnDef::new("b", KeyType::Int),
                ColumnDef::new("c", KeyType::Int),
            ],
        );
        let filters = vec![Filter::EqualTo("c".into(), RawValue::Int(1))];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        assert_eq!(plan.chunk_scan, ChunkScanMethod::All);
    }

    #[test]
    fn unsupported_filter_on_unpushable_partition_column_is_fatal() {
        let proj = RichProjection::new(
            DatasetRef::new("ds"),
            vec![ColumnDef::new("region", KeyType::Str)],
            vec![],
        );
        let filters = vec![Filter::GreaterThan("region".into(), RawValue::Str("m".into()))];
        let err = compile(&filters, &proj, &CompilerConfig::default()).unwrap_err();
        assert!(matches!(err, CompileError::UnsupportedFilter { .. }));
    }

    #[test]
    fn residual_predicate_filters_candidate_partition_keys() {
        let proj = RichProjection::new(
            DatasetRef::new("ds"),
            vec![
                ColumnDef::new("region", KeyType::Str),
                ColumnDef::new("host", KeyType::Str),
            ],
            vec![],
        );
        // `host` has no filter at all, so the column set is unpushable and the plan degrades to
        // Filtered even though `region` alone would have been a clean Single.
        let filters = vec![Filter::EqualTo("region".into(), RawValue::Str("us".into()))];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        let predicate = match plan.partition_scan {
            PartitionScanMethod::Filtered(p) => p,
            other => panic!("expected Filtered, got {other:?}"),
        };
        let matching = proj
            .encode_partition_key(&[
                cstore_types::KeyValue::Str("us".into()),
                cstore_types::KeyValue::Str("anything".into()),
            ])
            .unwrap();
        let non_matching = proj
            .encode_partition_key(&[
                cstore_types::KeyValue::Str("eu".into()),
                cstore_types::KeyValue::Str("anything".into()),
            ])
            .unwrap();
        assert!(predicate.test(&matching));
        assert!(!predicate.test(&non_matching));
    }

    #[test]
    fn residual_predicate_intersects_multiple_filters_on_one_column() {
        let proj = RichProjection::new(
            DatasetRef::new("ds"),
            vec![
                ColumnDef::new("region", KeyType::Str),
                ColumnDef::new("host", KeyType::Str),
            ],
            vec![],
        );
        // Two EqualTo filters on the same partition column are conjunctive: no region can equal
        // both "us" and "eu" at once, so the residual predicate must admit nothing.
        let filters = vec![
            Filter::EqualTo("region".into(), RawValue::Str("us".into())),
            Filter::EqualTo("region".into(), RawValue::Str("eu".into())),
        ];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        let predicate = match plan.partition_scan {
            PartitionScanMethod::Filtered(p) => p,
            other => panic!("expected Filtered, got {other:?}"),
        };
        let us = proj
            .encode_partition_key(&[cstore_types::KeyValue::Str("us".into()), cstore_types::KeyValue::Str("h".into())])
            .unwrap();
        let eu = proj
            .encode_partition_key(&[cstore_types::KeyValue::Str("eu".into()), cstore_types::KeyValue::Str("h".into())])
            .unwrap();
        assert!(!predicate.test(&us));
        assert!(!predicate.test(&eu));
    }

    #[test]
    fn residual_predicate_intersects_eq_and_in_on_one_column() {
        let proj = RichProjection::new(
            DatasetRef::new("ds"),
            vec![
                ColumnDef::new("region", KeyType::Str),
                ColumnDef::new("host", KeyType::Str),
            ],
            vec![],
        );
        // EqualTo("us") AND In(["us", "eu"]) should narrow to just "us", not union to both.
        let filters = vec![
            Filter::EqualTo("region".into(), RawValue::Str("us".into())),
            Filter::In(
                "region".into(),
                vec![RawValue::Str("us".into()), RawValue::Str("eu".into())],
            ),
        ];
        let plan = compile(&filters, &proj, &CompilerConfig::default()).unwrap();
        let predicate = match plan.partition_scan {
            PartitionScanMethod::Filtered(p) => p,
            other => panic!("expected Filtered, got {other:?}"),
        };
        let us = proj
            .encode_partition_key(&[cstore_types::KeyValue::Str("us".into()), cstore_types::KeyValue::Str("h".into())])
            .unwrap();
        let eu = proj
            .encode_partition_key(&[cstore_types::KeyValue::Str("eu".into()), cstore_types::KeyValue::Str("h".into())])
            .unwrap();
        assert!(predicate.test(&us));
        assert!(!predicate.test(&eu));
    }
}
