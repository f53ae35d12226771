//! Ordered, name-addressed row-set with structural column edits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },
    #[error("unknown column `{0}`")]
    UnknownColumn(String),
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("row has {found} cells, layout has {expected} columns")]
    RowWidth { expected: usize, found: usize },
}

/// A tabular batch addressed by column name.
///
/// Structural edits (rename, drop, insert-after, relocate-after) reference
/// columns by name rather than position, so a transform stays valid even when
/// the upstream export shuffles its column order. Cell edits keep every row in
/// lockstep with the column list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>) -> Result<Self, SchemaError> {
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c == name) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), SchemaError> {
        if row.len() != self.columns.len() {
            return Err(SchemaError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
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

    fn index_of(&self, name: &str) -> Result<usize, SchemaError> {
        self.position(name)
            .ok_or_else(|| SchemaError::UnknownColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.position(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Rewrite every column name through `f`, rejecting the result if two
    /// names collapse onto each other.
    pub fn map_columns<F>(&mut self, f: F) -> Result<(), SchemaError>
    where
        F: Fn(&str) -> String,
    {
        let mapped: Vec<String> = self.columns.iter().map(|c| f(c)).collect();
        for (i, name) in mapped.iter().enumerate() {
            if mapped[..i].iter().any(|c| c == name) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }
        self.columns = mapped;
        Ok(())
    }

    /// Rename a column in place. The new name must not collide.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), SchemaError> {
        let idx = self.index_of(from)?;
        if from != to && self.position(to).is_some() {
            return Err(SchemaError::DuplicateColumn(to.to_string()));
        }
        self.columns[idx] = to.to_string();
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Result<(), SchemaError> {
        let idx = self.index_of(name)?;
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        Ok(())
    }

    /// Append a new column at the end, filling every row with `fill`.
    pub fn append_column(
        &mut self,
        name: &str,
        fill: Option<String>,
    ) -> Result<(), SchemaError> {
        if self.position(name).is_some() {
            return Err(SchemaError::DuplicateColumn(name.to_string()));
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        Ok(())
    }

    /// Insert a new column immediately after `anchor`, filling every row.
    pub fn insert_after(
        &mut self,
        anchor: &str,
        name: &str,
        fill: Option<String>,
    ) -> Result<(), SchemaError> {
        if self.position(name).is_some() {
            return Err(SchemaError::DuplicateColumn(name.to_string()));
        }
        let idx = self.index_of(anchor)? + 1;
        self.columns.insert(idx, name.to_string());
        for row in &mut self.rows {
            row.insert(idx, fill.clone());
        }
        Ok(())
    }

    /// Insert a new column at the front of the layout, filling every row.
    pub fn prepend_column(
        &mut self,
        name: &str,
        fill: Option<String>,
    ) -> Result<(), SchemaError> {
        if self.position(name).is_some() {
            return Err(SchemaError::DuplicateColumn(name.to_string()));
        }
        self.columns.insert(0, name.to_string());
        for row in &mut self.rows {
            row.insert(0, fill.clone());
        }
        Ok(())
    }

    /// Move the named columns so they sit immediately after `anchor`, in the
    /// order given. Relative cell data moves with each column.
    pub fn relocate_after(&mut self, anchor: &str, names: &[&str]) -> Result<(), SchemaError> {
        // Validate up front so a failure cannot leave the layout half-moved.
        self.index_of(anchor)?;
        for (i, name) in names.iter().enumerate() {
            self.index_of(name)?;
            if *name == anchor || names[..i].contains(name) {
                return Err(SchemaError::DuplicateColumn(name.to_string()));
            }
        }
        let extracted = self.extract_columns(names);
        let at = self.index_of(anchor)? + 1;
        self.splice_columns(at, extracted);
        Ok(())
    }

    /// Move the contiguous block `from..=to` (current order) so it starts
    /// immediately after `anchor`. The anchor must lie outside the block.
    pub fn relocate_block_after(
        &mut self,
        anchor: &str,
        from: &str,
        to: &str,
    ) -> Result<(), SchemaError> {
        let start = self.index_of(from)?;
        let end = self.index_of(to)?;
        if end < start {
            return Err(SchemaError::UnknownColumn(to.to_string()));
        }
        let anchor_idx = self.index_of(anchor)?;
        if (start..=end).contains(&anchor_idx) {
            return Err(SchemaError::DuplicateColumn(anchor.to_string()));
        }
        let names: Vec<String> = self.columns[start..=end].to_vec();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let extracted = self.extract_columns(&name_refs);
        let at = self.index_of(anchor)? + 1;
        self.splice_columns(at, extracted);
        Ok(())
    }

    fn extract_columns(&mut self, names: &[&str]) -> Vec<(String, Vec<Option<String>>)> {
        let mut extracted = Vec::with_capacity(names.len());
        for name in names {
            let idx = self
                .position(name)
                .expect("extract_columns called with validated names");
            let column = self.columns.remove(idx);
            let cells = self.rows.iter_mut().map(|row| row.remove(idx)).collect();
            extracted.push((column, cells));
        }
        extracted
    }

    fn splice_columns(&mut self, at: usize, extracted: Vec<(String, Vec<Option<String>>)>) {
        for (offset, (column, cells)) in extracted.into_iter().enumerate() {
            self.columns.insert(at + offset, column);
            for (row, cell) in self.rows.iter_mut().zip(cells) {
                row.insert(at + offset, cell);
            }
        }
    }
}
