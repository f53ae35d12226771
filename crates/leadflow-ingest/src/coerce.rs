//! Per-column type coercion of a normalized batch.

use chrono::NaiveDate;
use leadflow_core::layout::CoercionProfile;
use leadflow_core::{ColumnType, RowSet, TypedRowSet, Value};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";
const SMALLINT_MIN: i64 = -32768;
const SMALLINT_MAX: i64 = 32767;

/// Coerce every cell according to the profile's named column lists.
///
/// Unparsable integers and dates become null, never an error. Small-range
/// integer columns are range-scanned after parsing; out-of-range values are
/// logged and kept.
pub fn apply(rows: &RowSet, profile: &CoercionProfile) -> TypedRowSet {
    let columns: Vec<String> = rows.columns().to_vec();
    let types: Vec<ColumnType> = columns.iter().map(|c| profile.column_type(c)).collect();
    let mut typed = TypedRowSet::new(columns, types.clone())
        .expect("columns and types are built in lockstep");

    for row in rows.rows() {
        let cells = row
            .iter()
            .zip(&types)
            .map(|(cell, ty)| coerce_cell(cell.as_deref(), *ty))
            .collect();
        typed
            .push_row(cells)
            .expect("coerced row width matches layout");
    }

    report_smallint_overflow(&typed);
    typed
}

fn coerce_cell(cell: Option<&str>, ty: ColumnType) -> Value {
    let Some(raw) = cell else {
        return Value::Null;
    };
    match ty {
        ColumnType::Text => Value::Text(raw.to_string()),
        ColumnType::SmallInt | ColumnType::Integer => match raw.trim().parse::<i64>() {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Null,
        },
        ColumnType::Date => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
            Ok(d) => Value::Date(d),
            Err(_) => Value::Null,
        },
    }
}

/// One pass over the parsed batch per small-integer column, mirroring the
/// per-column min/max scan the ingest contract documents. Non-fatal.
fn report_smallint_overflow(typed: &TypedRowSet) {
    for (idx, column) in typed.columns().iter().enumerate() {
        if typed.types()[idx] != ColumnType::SmallInt {
            continue;
        }
        let mut min: Option<i64> = None;
        let mut max: Option<i64> = None;
        for row in typed.rows() {
            if let Value::Int(v) = row[idx] {
                min = Some(min.map_or(v, |m| m.min(v)));
                max = Some(max.map_or(v, |m| m.max(v)));
            }
        }
        if let (Some(min), Some(max)) = (min, max) {
            if min < SMALLINT_MIN || max > SMALLINT_MAX {
                warn!(column = %column, min, max, "value out of smallint range");
            }
        }
    }
}
