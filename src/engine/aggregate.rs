//! Group-by aggregation, ranking and sorting.
//!
//! Grouped outputs are two-column tables `[key, measure]` with one row per
//! distinct non-null key, ordered ascending by key. Ranking is a stable sort,
//! so ties keep their input order.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::engine::error::EngineResult;
use crate::model::{Column, DataType, Row, Schema, Table, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Running sum that stays integral for integer measures. Integer sums
/// saturate at the `i64` bounds.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Sum {
    Int(i64),
    Float(f64),
}

impl Sum {
    pub(crate) fn zero(data_type: DataType) -> Self {
        match data_type {
            DataType::Int => Sum::Int(0),
            _ => Sum::Float(0.0),
        }
    }

    pub(crate) fn add(&mut self, value: &Value) {
        match (self, value) {
            (Sum::Int(acc), Value::Int(v)) => *acc = acc.saturating_add(*v),
            (Sum::Float(acc), v) => *acc += v.as_f64().unwrap_or(0.0),
            _ => {}
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Sum::Int(v) => Value::Int(v),
            Sum::Float(v) => Value::Float(v),
        }
    }
}

fn grouped_schema(table: &Table, key: usize, measure: &str, data_type: DataType) -> Schema {
    Schema::new(vec![
        table.schema.columns()[key].clone(),
        Column::new(measure, data_type),
    ])
}

/// Sum `measure` per distinct `key`.
pub fn group_sum(table: &Table, key: &str, measure: &str) -> EngineResult<Table> {
    let key_idx = table.require(key)?;
    let measure_idx = table.require_numeric(measure)?;
    let measure_type = table.schema.columns()[measure_idx].data_type;

    let mut groups: BTreeMap<&Value, Sum> = BTreeMap::new();
    for row in &table.rows {
        let k = &row[key_idx];
        if k.is_null() {
            continue;
        }
        groups
            .entry(k)
            .or_insert_with(|| Sum::zero(measure_type))
            .add(&row[measure_idx]);
    }

    let rows = groups
        .into_iter()
        .map(|(k, sum)| vec![k.clone(), sum.into_value()])
        .collect();
    Ok(Table {
        name: table.name.clone(),
        schema: grouped_schema(table, key_idx, measure, measure_type),
        rows,
    })
}

/// Mean of `measure` per distinct `key`, ignoring null measures.
///
/// A group whose measures are all null gets a null mean.
pub fn group_mean(table: &Table, key: &str, measure: &str) -> EngineResult<Table> {
    let key_idx = table.require(key)?;
    let measure_idx = table.require_numeric(measure)?;

    let mut groups: BTreeMap<&Value, (f64, usize)> = BTreeMap::new();
    for row in &table.rows {
        let k = &row[key_idx];
        if k.is_null() {
            continue;
        }
        let entry = groups.entry(k).or_insert((0.0, 0));
        if let Some(v) = row[measure_idx].as_f64() {
            entry.0 += v;
            entry.1 += 1;
        }
    }

    let rows = groups
        .into_iter()
        .map(|(k, (sum, count))| {
            let mean = if count == 0 {
                Value::Null
            } else {
                Value::Float(sum / count as f64)
            };
            vec![k.clone(), mean]
        })
        .collect();
    Ok(Table {
        name: table.name.clone(),
        schema: grouped_schema(table, key_idx, measure, DataType::Float),
        rows,
    })
}

/// Count distinct non-null `target` values per distinct `key`.
pub fn group_count_distinct(table: &Table, key: &str, target: &str) -> EngineResult<Table> {
    let key_idx = table.require(key)?;
    let target_idx = table.require(target)?;

    let mut groups: BTreeMap<&Value, HashSet<&Value>> = BTreeMap::new();
    for row in &table.rows {
        let k = &row[key_idx];
        if k.is_null() {
            continue;
        }
        let seen = groups.entry(k).or_default();
        let t = &row[target_idx];
        if !t.is_null() {
            seen.insert(t);
        }
    }

    let rows = groups
        .into_iter()
        .map(|(k, seen)| vec![k.clone(), Value::Int(seen.len() as i64)])
        .collect();
    Ok(Table {
        name: table.name.clone(),
        schema: grouped_schema(table, key_idx, target, DataType::Int),
        rows,
    })
}

/// Stable sort by one column.
///
/// Nulls sort lowest, so they come last in a descending sort.
pub fn sort_by(table: &Table, column: &str, direction: SortDirection) -> EngineResult<Table> {
    let idx = table.require(column)?;
    let mut rows: Vec<Row> = table.rows.clone();
    match direction {
        SortDirection::Asc => rows.sort_by(|a, b| a[idx].cmp(&b[idx])),
        SortDirection::Desc => rows.sort_by(|a, b| b[idx].cmp(&a[idx])),
    }
    Ok(Table {
        name: table.name.clone(),
        schema: table.schema.clone(),
        rows,
    })
}

/// The `n` highest rows by `by`, descending, ties in input order.
pub fn top_n(table: &Table, n: usize, by: &str) -> EngineResult<Table> {
    table.require_numeric(by)?;
    let mut sorted = sort_by(table, by, SortDirection::Desc)?;
    sorted.rows.truncate(n);
    Ok(sorted)
}

/// Sum of a numeric column over the whole table, nulls skipped.
pub fn sum_column(table: &Table, column: &str) -> EngineResult<f64> {
    let idx = table.require_numeric(column)?;
    Ok(table.rows.iter().filter_map(|r| r[idx].as_f64()).sum())
}

/// Number of distinct non-null values in a column.
pub fn count_distinct(table: &Table, column: &str) -> EngineResult<usize> {
    let idx = table.require(column)?;
    Ok(table
        .rows
        .iter()
        .map(|r| &r[idx])
        .filter(|v| !v.is_null())
        .collect::<BTreeSet<_>>()
        .len())
}

/// Largest non-null value of a numeric column, as a float.
pub fn max_column(table: &Table, column: &str) -> EngineResult<Option<f64>> {
    let idx = table.require_numeric(column)?;
    Ok(table
        .rows
        .iter()
        .filter_map(|r| r[idx].as_f64())
        .fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |m| m.max(v)))
        }))
}
