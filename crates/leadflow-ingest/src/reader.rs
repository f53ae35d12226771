//! CSV file reading into a [`RowSet`].

use std::fs::File;
use std::path::Path;

use leadflow_core::{RowSet, SchemaError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Parse a CSV file into named columns. Headers come from the first record
/// (whitespace-trimmed); empty cells and the literal token `NaN` become null
/// before any type coercion sees them.
pub fn read_csv(path: &Path) -> Result<RowSet, IngestError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: display.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(file);

    let headers = reader.headers().map_err(|source| IngestError::Csv {
        path: display.clone(),
        source,
    })?;
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut rows = RowSet::new(columns)?;

    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: display.clone(),
            source,
        })?;
        rows.push_row(record.iter().map(normalize_cell).collect())?;
    }
    Ok(rows)
}

fn normalize_cell(raw: &str) -> Option<String> {
    if raw.is_empty() || raw == "NaN" {
        None
    } else {
        Some(raw.to_string())
    }
}
