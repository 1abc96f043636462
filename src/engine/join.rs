//! Inner equi-joins over schema-typed tables.

use std::collections::{HashMap, HashSet};

use crate::engine::error::JoinError;
use crate::model::{Column, Row, Schema, Table, Value};

/// Inner join `left` and `right` on a column both sides carry as `on`.
///
/// - Rows whose key is null never match.
/// - Duplicate keys on either side produce the full cross product.
/// - Output keeps left row order, then right row order within a key.
/// - Output columns are the left columns followed by the right columns minus
///   the right key. A non-key column present on both sides is renamed on both
///   sides to `<table>.<column>`.
pub fn inner_join(left: &Table, right: &Table, on: &str) -> Result<Table, JoinError> {
    let left_key = left.schema.index_of(on).ok_or_else(|| JoinError::MissingKey {
        table: left.name.clone(),
        key: on.to_string(),
    })?;
    let right_key = right
        .schema
        .index_of(on)
        .ok_or_else(|| JoinError::MissingKey {
            table: right.name.clone(),
            key: on.to_string(),
        })?;

    let left_type = left.schema.columns()[left_key].data_type;
    let right_type = right.schema.columns()[right_key].data_type;
    if left_type != right_type {
        return Err(JoinError::KeyTypeMismatch {
            key: on.to_string(),
            left: left_type.to_string(),
            right: right_type.to_string(),
        });
    }

    let schema = joined_schema(left, right, right_key);

    let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        let key = &row[right_key];
        if !key.is_null() {
            index.entry(key).or_default().push(i);
        }
    }

    let mut rows: Vec<Row> = Vec::new();
    for left_row in &left.rows {
        let Some(matches) = index.get(&left_row[left_key]) else {
            continue;
        };
        for &i in matches {
            let mut row = Vec::with_capacity(schema.len());
            row.extend(left_row.iter().cloned());
            row.extend(
                right.rows[i]
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != right_key)
                    .map(|(_, v)| v.clone()),
            );
            rows.push(row);
        }
    }

    tracing::debug!(
        left = %left.name,
        right = %right.name,
        on,
        left_rows = left.len(),
        right_rows = right.len(),
        output_rows = rows.len(),
        "inner join"
    );

    Ok(Table {
        name: format!("{}_{}", left.name, right.name),
        schema,
        rows,
    })
}

fn joined_schema(left: &Table, right: &Table, right_key: usize) -> Schema {
    let right_columns: Vec<&Column> = right
        .schema
        .columns()
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != right_key)
        .map(|(_, c)| c)
        .collect();

    let left_names: HashSet<&str> = left.schema.names().collect();
    let collisions: HashSet<&str> = right_columns
        .iter()
        .map(|c| c.name.as_str())
        .filter(|name| left_names.contains(name))
        .collect();

    // Tables derived from the same source share its name; fall back to sides.
    let (left_prefix, right_prefix) = if left.name == right.name {
        ("left", "right")
    } else {
        (left.name.as_str(), right.name.as_str())
    };

    let qualify = |prefix: &str, column: &Column| {
        if collisions.contains(column.name.as_str()) {
            Column::new(format!("{}.{}", prefix, column.name), column.data_type)
        } else {
            column.clone()
        }
    };

    let candidates = left
        .schema
        .columns()
        .iter()
        .map(|c| qualify(left_prefix, c))
        .chain(right_columns.into_iter().map(|c| qualify(right_prefix, c)));

    // A qualified name can still clash with a column that already carried it.
    let mut taken: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();
    for mut column in candidates {
        if taken.contains(&column.name) {
            let base = column.name.clone();
            let mut n = 2;
            while taken.contains(&format!("{}_{}", base, n)) {
                n += 1;
            }
            column.name = format!("{}_{}", base, n);
        }
        taken.insert(column.name.clone());
        columns.push(column);
    }
    Schema::new(columns)
}
