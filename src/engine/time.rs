//! Time bucketing and period-over-period change.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::engine::aggregate::Sum;
use crate::engine::error::{EngineError, EngineResult};
use crate::model::{Column, DataType, Grain, Schema, Table, Value};

/// Name of the bucket column produced by [`resample`].
pub const PERIOD_START: &str = "period_start";

/// Sum `measure` into calendar buckets of `grain` keyed on `date_column`.
///
/// Output is `[period_start, measure]` in chronological order. Periods with
/// no rows are omitted, rows with a null date are skipped.
pub fn resample(
    table: &Table,
    date_column: &str,
    grain: Grain,
    measure: &str,
) -> EngineResult<Table> {
    let date_idx = table.require(date_column)?;
    let date_type = table.schema.columns()[date_idx].data_type;
    if date_type != DataType::Date {
        return Err(EngineError::TypeMismatch {
            column: date_column.to_string(),
            expected: DataType::Date.to_string(),
            found: date_type.to_string(),
        });
    }
    let measure_idx = table.require_numeric(measure)?;
    let measure_type = table.schema.columns()[measure_idx].data_type;

    let mut buckets: BTreeMap<NaiveDate, Sum> = BTreeMap::new();
    for row in &table.rows {
        let Some(date) = row[date_idx].as_date() else {
            continue;
        };
        buckets
            .entry(grain.period_start(date))
            .or_insert_with(|| Sum::zero(measure_type))
            .add(&row[measure_idx]);
    }

    let rows = buckets
        .into_iter()
        .map(|(start, total)| vec![Value::Date(start), total.into_value()])
        .collect();
    Ok(Table {
        name: format!("{}_by_{}", table.name, grain),
        schema: Schema::new(vec![
            Column::new(PERIOD_START, DataType::Date),
            Column::new(measure, measure_type),
        ]),
        rows,
    })
}

/// Append `output` = `(v[i] - v[i-1]) / v[i-1]` over an ordered numeric column.
///
/// The first row is null, as is any row whose previous value is zero or
/// where either value is null.
pub fn percent_change(table: &Table, column: &str, output: &str) -> EngineResult<Table> {
    let idx = table.require_numeric(column)?;
    let mut previous: Option<f64> = None;
    table.with_column(output, DataType::Float, |row| {
        let current = row[idx].as_f64();
        let change = match (previous, current) {
            (Some(prev), Some(cur)) if prev != 0.0 => Value::Float((cur - prev) / prev),
            _ => Value::Null,
        };
        previous = current;
        change
    })
}
