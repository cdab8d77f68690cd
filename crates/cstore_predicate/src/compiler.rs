use std::collections::{HashMap, HashSet};

use cstore_types::{ColumnDef, KeyValue, RichProjection};
use itertools::Itertools;

use crate::{ChunkScanMethod, CompileError, Filter, PartitionScanMethod, ResidualPredicate, ScanPlan};

/// Caps the number of enumerated partition keys a `Multi` plan may carry; above this the
/// compiler degrades to a `Filtered` full scan rather than handing the backend an unbounded
/// enumeration. Mirrors `columnstore.inquery-partitions-limit`.
#[derive(Debug, Clone, Copy)]
pub struct CompilerConfig {
    pub inquery_partitions_limit: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            inquery_partitions_limit: 256,
        }
    }
}

/// Compiles a flat filter list into a [`ScanPlan`] against `projection`.
///
/// Never fails for a recoverable degradation (unpushable filter, gapped row-key prefix,
/// over-cap partition combinations); those are logged and the plan falls back to a conservative
/// shape. It fails only when a filter on a partition column cannot be interpreted at all once
/// that column has been selected for the residual predicate (`UnsupportedFilter`), or when
/// parsing/encoding a pushed-down value fails.
pub fn compile(
    filters: &[Filter],
    projection: &RichProjection,
    config: &CompilerConfig,
) -> Result<ScanPlan, CompileError> {
    let by_column = group_by_column(filters);

    let partition_scan = compile_partition_scan(&by_column, projection, config)?;
    let chunk_scan = compile_chunk_scan(&by_column, projection);

    Ok(ScanPlan {
        projection: std::sync::Arc::new(projection.clone()),
        partition_scan,
        chunk_scan,
    })
}

fn group_by_column<'f>(filters: &'f [Filter]) -> HashMap<&'f str, Vec<&'f Filter>> {
    let mut by_column: HashMap<&str, Vec<&Filter>> = HashMap::new();
    for filter in filters {
        by_column.entry(filter.column()).or_default().push(filter);
    }
    by_column
}

/// The parsed value set a single partition column's filters push down to, if they form a
/// pushable shape (a lone `Eq` or a lone `In`).
fn pushable_set(
    filters: Option<&Vec<&Filter>>,
    column: &ColumnDef,
    projection: &RichProjection,
) -> Result<Option<Vec<KeyValue>>, CompileError> {
    match filters.map(Vec::as_slice) {
        Some([Filter::EqualTo(_, v)]) => Ok(Some(vec![projection.parse_single_value(&column.name, v)?])),
        Some([Filter::In(_, vs)]) => Ok(Some(projection.parse_values(&column.name, vs)?)),
        _ => Ok(None),
    }
}

fn compile_partition_scan(
    by_column: &HashMap<&str, Vec<&Filter>>,
    projection: &RichProjection,
    config: &CompilerConfig,
) -> Result<PartitionScanMethod, CompileError> {
    let partition_columns = projection.partition_columns();
    let mut sets = Vec::with_capacity(partition_columns.len());
    for column in partition_columns {
        sets.push(pushable_set(by_column.get(column.name.as_str()), column, projection)?);
    }

    if let Some(sets) = sets.into_iter().collect::<Option<Vec<_>>>() {
        let combination_count: usize = sets.iter().map(Vec::len).product();
        if combination_count == 1 {
            let values: Vec<KeyValue> = sets.into_iter().map(|mut s| s.remove(0)).collect();
            return Ok(PartitionScanMethod::Single(projection.encode_partition_key(&values)?));
        }
        if combination_count <= config.inquery_partitions_limit {
            let keys = sets
                .iter()
                .map(|s| s.iter())
                .multi_cartesian_product()
                .map(|values| {
                    let values: Vec<KeyValue> = values.into_iter().cloned().collect();
                    projection.encode_partition_key(&values)
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(PartitionScanMethod::Multi(keys));
        }
        tracing::info!(
            combinations = combination_count,
            limit = config.inquery_partitions_limit,
            "partition combination cap exceeded, degrading to a filtered scan"
        );
    }

    Ok(PartitionScanMethod::Filtered(compile_residual_predicate(
        by_column,
        partition_columns,
        projection,
    )?))
}

fn compile_residual_predicate(
    by_column: &HashMap<&str, Vec<&Filter>>,
    partition_columns: &[ColumnDef],
    projection: &RichProjection,
) -> Result<ResidualPredicate, CompileError> {
    let mut constraints: Vec<(usize, HashSet<Vec<u8>>)> = Vec::new();

    for (index, column) in partition_columns.iter().enumerate() {
        let Some(filters) = by_column.get(column.name.as_str()) else {
            continue;
        };
        let mut allowed: Option<HashSet<Vec<u8>>> = None;
        for filter in filters {
            let this_filter_set: HashSet<Vec<u8>> = match filter {
                Filter::EqualTo(_, v) => {
                    HashSet::from([encode_scalar(projection, column, &[v.clone()])?])
                }
                Filter::In(_, vs) => vs
                    .iter()
                    .map(|v| encode_scalar(projection, column, &[v.clone()]))
                    .collect::<Result<_, _>>()?,
                other => {
                    return Err(CompileError::UnsupportedFilter {
                        column: column.name.clone(),
                        filter: format!("{other:?}"),
                    })
                }
            };
            // Multiple filters on the same column are conjunctive (AND), so each filter's
            // allowed set narrows the running set rather than widening it.
            allowed = Some(match allowed {
                Some(running) => running.intersection(&this_filter_set).cloned().collect(),
                None => this_filter_set,
            });
        }
        constraints.push((index, allowed.unwrap_or_default()));
    }

    if constraints.is_empty() {
        return Ok(ResidualPredicate::always_true());
    }

    let projection = projection.clone();
    Ok(ResidualPredicate::new(move |key| {
        let Some(slices) = projection.partition_field_slices(key) else {
            return false;
        };
        constraints
            .iter()
            .all(|(index, allowed)| slices.get(*index).is_some_and(|s| allowed.contains(*s)))
    }))
}

fn encode_scalar(
    projection: &RichProjection,
    column: &ColumnDef,
    raws: &[cstore_types::RawValue],
) -> Result<Vec<u8>, CompileError> {
    let value = projection.parse_single_value(&column.name, &raws[0])?;
    Ok(projection.encode_partition_key_field(column, &value)?)
}

fn compile_chunk_scan(by_column: &HashMap<&str, Vec<&Filter>>, projection: &RichProjection) -> ChunkScanMethod {
    let row_key_columns = projection.row_key_columns();
    if row_key_columns.is_empty() {
        return ChunkScanMethod::All;
    }

    let positions: Vec<usize> = row_key_columns
        .iter()
        .enumerate()
        .filter(|(_, c)| by_column.contains_key(c.name.as_str()))
        .map(|(i, _)| i)
        .collect();
    let Some(&max_position) = positions.iter().max() else {
        return ChunkScanMethod::All;
    };
    let is_prefix = positions.len() == max_position + 1;
    if !is_prefix {
        tracing::debug!(?positions, "row-key filters do not form a contiguous prefix, scanning all chunks");
        return ChunkScanMethod::All;
    }

    let mut low_values = Vec::with_capacity(positions.len());
    let mut high_values = Vec::with_capacity(positions.len());
    for (i, column) in row_key_columns.iter().enumerate().take(max_position + 1) {
        let filters = &by_column[column.name.as_str()];
        let bounds = if i < max_position {
            prefix_equality_bound(filters, column, projection)
        } else {
            terminal_bound(filters, column, projection)
        };
        match bounds {
            Some((low, high)) => {
                low_values.push(low);
                high_values.push(high);
            }
            None => {
                tracing::debug!(column = %column.name, "row-key filter shape is not prefix-pushable, scanning all chunks");
                return ChunkScanMethod::All;
            }
        }
    }

    let first_key = match projection.encode_row_key_prefix(&row_key_columns[..=max_position], &low_values) {
        Ok(k) => k,
        Err(_) => {
            tracing::debug!(max_position, "failed to encode row-key low bound, scanning all chunks");
            return ChunkScanMethod::All;
        }
    };
    let last_key = match projection.encode_row_key_prefix(&row_key_columns[..=max_position], &high_values) {
        Ok(k) => k,
        Err(_) => {
            tracing::debug!(max_position, "failed to encode row-key high bound, scanning all chunks");
            return ChunkScanMethod::All;
        }
    };
    ChunkScanMethod::RowKeyRange(first_key, last_key)
}

/// A non-terminal prefix position only accepts a lone `Eq`: the low and high bound collapse to
/// the same value.
fn prefix_equality_bound(
    filters: &[&Filter],
    column: &ColumnDef,
    projection: &RichProjection,
) -> Option<(KeyValue, KeyValue)> {
    match filters {
        [Filter::EqualTo(_, v)] => {
            let value = projection.parse_single_value(&column.name, v).ok()?;
            Some((value.clone(), value))
        }
        _ => None,
    }
}

/// The terminal (last, `max(S)`) prefix position accepts either a lone `Eq`, or a paired bound
/// `(Gt|Gte, Lt|Lte)`. Exclusive bounds are represented as inclusive over the declared binary
/// domain: the comparator already respects open/closed semantics by construction, so `Gt`/`Lt`
/// and `Gte`/`Lte` map to the same encoded bound here. Any other shape — including a one-sided
/// bound with no closing side — is not prefix-pushable and falls back to `All`.
fn terminal_bound(
    filters: &[&Filter],
    column: &ColumnDef,
    projection: &RichProjection,
) -> Option<(KeyValue, KeyValue)> {
    match filters {
        [Filter::EqualTo(_, v)] => {
            let value = projection.parse_single_value(&column.name, v).ok()?;
            Some((value.clone(), value))
        }
        [a, b] => {
            let (low_filter, high_filter) = order_bound_pair(a, b)?;
            let low = projection.parse_single_value(&column.name, low_filter.1).ok()?;
            let high = projection.parse_single_value(&column.name, high_filter.1).ok()?;
            Some((low, high))
        }
        _ => None,
    }
}

fn order_bound_pair<'f>(
    a: &'f Filter,
    b: &'f Filter,
) -> Option<((&'f str, &'f cstore_types::RawValue), (&'f str, &'f cstore_types::RawValue))> {
    let low = match a {
        Filter::GreaterThan(c, v) | Filter::GreaterThanOrEqual(c, v) => Some((c.as_str(), v)),
        _ => None,
    }
    .or_else(|| match b {
        Filter::GreaterThan(c, v) | Filter::GreaterThanOrEqual(c, v) => Some((c.as_str(), v)),
        _ => None,
    })?;
    let high = match a {
        Filter::LessThan(c, v) | Filter::LessThanOrEqual(c, v) => Some((c.as_str(), v)),
        _ => None,
    }
    .or_else(|| match b {
        Filter::LessThan(c, v) | Filter::LessThanOrEqual(c, v) => Some((c.as_str(), v)),
        _ => None,
    })?;
    Some((low, high))
}
