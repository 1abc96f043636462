// src/model/table.rs
use crate::engine::error::{EngineError, EngineResult};
use crate::model::types::{DataType, Value};
use serde::Serialize;

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered column list of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

pub type Row = Vec<Value>;

/// An immutable-by-convention, schema-typed row set.
///
/// Every row has exactly one value per column and every non-null value
/// matches its column's declared type; constructors enforce this.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking each row against the schema.
    pub fn from_rows(
        name: impl Into<String>,
        schema: Schema,
        rows: Vec<Row>,
    ) -> EngineResult<Self> {
        let mut table = Self::new(name, schema);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    /// Append a row, checking it against the schema.
    pub fn push(&mut self, row: Row) -> EngineResult<()> {
        if row.len() != self.schema.len() {
            return Err(EngineError::ArityMismatch {
                table: self.name.clone(),
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        for (value, column) in row.iter().zip(self.schema.columns()) {
            if let Some(found) = value.data_type() {
                if found != column.data_type {
                    return Err(EngineError::TypeMismatch {
                        column: column.name.clone(),
                        expected: column.data_type.to_string(),
                        found: found.to_string(),
                    });
                }
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column, or `UnknownColumn`.
    pub fn require(&self, column: &str) -> EngineResult<usize> {
        self.schema
            .index_of(column)
            .ok_or_else(|| EngineError::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Index of a numeric column, or an error naming what was found.
    pub fn require_numeric(&self, column: &str) -> EngineResult<usize> {
        let idx = self.require(column)?;
        let data_type = self.schema.columns()[idx].data_type;
        if !data_type.is_numeric() {
            return Err(EngineError::TypeMismatch {
                column: column.to_string(),
                expected: "numeric".to_string(),
                found: data_type.to_string(),
            });
        }
        Ok(idx)
    }

    /// Iterate one column's values.
    pub fn values<'a>(&'a self, column: &str) -> EngineResult<impl Iterator<Item = &'a Value>> {
        let idx = self.require(column)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Value at `row` in `column`, if both exist.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Keep a subset of columns, in the given order.
    pub fn project(&self, columns: &[&str]) -> EngineResult<Table> {
        let indexes = columns
            .iter()
            .map(|c| self.require(c))
            .collect::<EngineResult<Vec<_>>>()?;
        let schema = Schema::new(
            indexes
                .iter()
                .map(|&i| self.schema.columns()[i].clone())
                .collect(),
        );
        let rows = self
            .rows
            .iter()
            .map(|row| indexes.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table {
            name: self.name.clone(),
            schema,
            rows,
        })
    }

    /// Keep rows matching a predicate, preserving order.
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            name: self.name.clone(),
            schema: self.schema.clone(),
            rows: self.rows.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Append a derived column computed from each row.
    ///
    /// Fails if the column already exists or `f` yields a value of the wrong
    /// type.
    pub fn with_column<F>(&self, name: &str, data_type: DataType, mut f: F) -> EngineResult<Table>
    where
        F: FnMut(&Row) -> Value,
    {
        if self.schema.index_of(name).is_some() {
            return Err(EngineError::DuplicateColumn {
                table: self.name.clone(),
                column: name.to_string(),
            });
        }
        let mut columns = self.schema.columns().to_vec();
        columns.push(Column::new(name, data_type));
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut out = row.clone();
                out.push(f(row));
                out
            })
            .collect();
        Table::from_rows(self.name.clone(), Schema::new(columns), rows)
    }

    /// Rename a column.
    pub fn rename(&self, from: &str, to: &str) -> EngineResult<Table> {
        let idx = self.require(from)?;
        let mut columns = self.schema.columns().to_vec();
        columns[idx].name = to.to_string();
        Ok(Table {
            name: self.name.clone(),
            schema: Schema::new(columns),
            rows: self.rows.clone(),
        })
    }

    /// Same rows under another name.
    pub fn named(mut self, name: impl Into<String>) -> Table {
        self.name = name.into();
        self
    }
}
