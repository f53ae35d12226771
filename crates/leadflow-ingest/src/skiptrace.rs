//! Skip-trace list normalization: 91 vendor columns in, 102 canonical out.
//!
//! The transform is a fixed sequence of structural edits. Each step resolves
//! its anchors against the layout as it stands after the previous step, so
//! the whole sequence is order-sensitive but position-independent.

use chrono::NaiveDate;
use leadflow_core::layout::{
    SKIPTRACE_CANONICAL_COLUMN_COUNT, SKIPTRACE_INPUT_COLUMN_COUNT,
    SKIPTRACE_OWNER_NAME_COLUMNS,
};
use leadflow_core::{RowSet, SchemaError};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize one skip-traced batch.
///
/// `last_skiptraced` is the caller-supplied trace date stamped onto every
/// row; `run_date` becomes both SQL bookkeeping dates. The input must carry
/// exactly 91 columns and the output exactly 102; anything else rejects the
/// whole file.
pub fn normalize(
    mut rows: RowSet,
    last_skiptraced: NaiveDate,
    run_date: NaiveDate,
) -> Result<RowSet, SchemaError> {
    if rows.column_count() != SKIPTRACE_INPUT_COLUMN_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: SKIPTRACE_INPUT_COLUMN_COUNT,
            found: rows.column_count(),
        });
    }

    rows.rename("full_address", "full_skiptrace_address")?;
    rows.drop_column("has_duplicates")?;

    let traced = last_skiptraced.format(DATE_FORMAT).to_string();
    let stamped = run_date.format(DATE_FORMAT).to_string();
    rows.append_column("last_skiptraced_date", Some(traced))?;
    rows.append_column("sql_last_update_date", Some(stamped.clone()))?;
    rows.append_column("sql_added_date", Some(stamped))?;

    rows.insert_after("list", "original_name", None)?;
    rows.relocate_after("original_name", SKIPTRACE_OWNER_NAME_COLUMNS)?;
    rows.insert_after("owner_1_first_name", "owner_1_middle_name", None)?;
    rows.insert_after("owner_2_first_name", "owner_2_middle_name", None)?;

    rows.relocate_after("owner_2_last_name", &["county"])?;
    rows.insert_after("county", "property_class", None)?;

    rows.relocate_block_after("property_class", "dob", "sql_added_date")?;

    rows.insert_after("phone1", "phone1_cc_disposition", None)?;
    rows.insert_after("phone1_cc_disposition", "phone1_sms_disposition", None)?;
    rows.insert_after("phone2_company", "phone2_cc_disposition", None)?;
    rows.insert_after("phone2_cc_disposition", "phone2_sms_disposition", None)?;
    rows.insert_after("phone3_company", "phone3_cc_disposition", None)?;
    rows.insert_after("phone3_cc_disposition", "phone3_sms_disposition", None)?;

    rows.relocate_after(
        "sql_added_date",
        &["owner_street_address", "owner_city", "owner_state", "owner_zip_code"],
    )?;
    rows.drop_column("vacancy_description")?;

    if rows.column_count() != SKIPTRACE_CANONICAL_COLUMN_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: SKIPTRACE_CANONICAL_COLUMN_COUNT,
            found: rows.column_count(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::layout::{SKIPTRACE_CANONICAL_COLUMNS, SKIPTRACE_INPUT_COLUMNS};

    fn input_rowset() -> RowSet {
        let mut rows = RowSet::new(
            SKIPTRACE_INPUT_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
        .unwrap();
        let cells: Vec<Option<String>> = SKIPTRACE_INPUT_COLUMNS
            .iter()
            .map(|c| Some(format!("v:{c}")))
            .collect();
        rows.push_row(cells).unwrap();
        rows
    }

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[test]
    fn transform_yields_the_canonical_layout() {
        let (traced, run) = dates();
        let out = normalize(input_rowset(), traced, run).unwrap();
        let columns: Vec<&str> = out.columns().iter().map(String::as_str).collect();
        assert_eq!(columns, SKIPTRACE_CANONICAL_COLUMNS);
    }

    #[test]
    fn cells_follow_their_columns() {
        let (traced, run) = dates();
        let out = normalize(input_rowset(), traced, run).unwrap();
        assert_eq!(out.value(0, "full_skiptrace_address"), Some("v:full_address"));
        assert_eq!(out.value(0, "county"), Some("v:county"));
        assert_eq!(out.value(0, "phone2_company"), Some("v:phone2_company"));
        assert_eq!(out.value(0, "owner_zip_code"), Some("v:owner_zip_code"));
        assert_eq!(out.value(0, "last_skiptraced_date"), Some("2024-05-20"));
        assert_eq!(out.value(0, "sql_last_update_date"), Some("2024-06-01"));
        assert_eq!(out.value(0, "sql_added_date"), Some("2024-06-01"));
        assert_eq!(out.value(0, "original_name"), None);
        assert_eq!(out.value(0, "property_class"), None);
        assert_eq!(out.value(0, "phone1_cc_disposition"), None);
    }

    #[test]
    fn owner_name_relative_order_survives_relocation() {
        let (traced, run) = dates();
        let out = normalize(input_rowset(), traced, run).unwrap();
        let positions: Vec<usize> = SKIPTRACE_OWNER_NAME_COLUMNS
            .iter()
            .map(|c| out.position(c).unwrap())
            .collect();
        for pair in positions.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn dropped_columns_are_gone() {
        let (traced, run) = dates();
        let out = normalize(input_rowset(), traced, run).unwrap();
        assert!(out.position("has_duplicates").is_none());
        assert!(out.position("vacancy_description").is_none());
        assert!(out.position("full_address").is_none());
    }

    #[test]
    fn wrong_input_width_rejects_the_file() {
        let rows = RowSet::new((0..90).map(|i| format!("c{i}")).collect()).unwrap();
        let (traced, run) = dates();
        let err = normalize(rows, traced, run).unwrap_err();
        assert_eq!(
            err,
            SchemaError::ColumnCount {
                expected: 91,
                found: 90
            }
        );
    }
}
