//! Typed cell values produced by the coercion pass.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rowset::SchemaError;

/// Semantic type of a canonical column, used for coercion and for choosing
/// the SQL bind type (a `Null` cell must still bind with the column's type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Text,
    SmallInt,
    Integer,
    Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the value carries no usable content: null, or empty/blank
    /// text. This mirrors the merge engine's "non-empty wins" test.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Render for CSV export: null becomes the empty field.
    pub fn to_csv_field(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => s.clone(),
            Value::Int(v) => v.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A coerced batch: canonical column order, one semantic type per column,
/// and typed nullable cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedRowSet {
    columns: Vec<String>,
    types: Vec<ColumnType>,
    rows: Vec<Vec<Value>>,
}

impl TypedRowSet {
    pub fn new(columns: Vec<String>, types: Vec<ColumnType>) -> Result<Self, SchemaError> {
        if columns.len() != types.len() {
            return Err(SchemaError::RowWidth {
                expected: columns.len(),
                found: types.len(),
            });
        }
        Ok(Self {
            columns,
            types,
            rows: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), SchemaError> {
        if row.len() != self.columns.len() {
            return Err(SchemaError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append another batch with an identical layout.
    pub fn extend(&mut self, other: TypedRowSet) -> Result<(), SchemaError> {
        if other.columns != self.columns {
            return Err(SchemaError::ColumnCount {
                expected: self.columns.len(),
                found: other.columns.len(),
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn types(&self) -> &[ColumnType] {
        &self.types
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.position(column)?;
        self.rows.get(row)?.get(idx)
    }
}
