//! Raw property-list normalization: 70 vendor columns in, 72 canonical out.

use leadflow_core::layout::{COLUMN_ALIASES, RAW_LIST_INPUT_COLUMN_COUNT};
use leadflow_core::{RowSet, SchemaError};

/// Canonical header form: lowercase, spaces to underscores, `%` spelled out,
/// hyphens stripped.
pub fn normalize_header(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .replace('%', "percent")
        .replace('-', "")
}

/// Normalize one uploaded raw-list batch.
///
/// Injects `source_name` and `list` as the first two columns, canonicalizes
/// every header, then applies the fixed alias table. The input must carry
/// exactly 70 columns; anything else rejects the whole file.
pub fn normalize(
    mut rows: RowSet,
    source_name: &str,
    list_name: &str,
) -> Result<RowSet, SchemaError> {
    if rows.column_count() != RAW_LIST_INPUT_COLUMN_COUNT {
        return Err(SchemaError::ColumnCount {
            expected: RAW_LIST_INPUT_COLUMN_COUNT,
            found: rows.column_count(),
        });
    }

    rows.prepend_column("list", Some(list_name.to_string()))?;
    rows.prepend_column("source_name", Some(source_name.to_string()))?;
    rows.map_columns(normalize_header)?;
    for (from, to) in COLUMN_ALIASES {
        if rows.position(from).is_some() {
            rows.rename(from, to)?;
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow_core::layout::RAW_LIST_CANONICAL_COLUMN_COUNT;

    fn seventy_headers() -> Vec<String> {
        // Vendor-style headers: mixed case, spaces, a % and a hyphen, plus
        // the three aliased names in their upstream spelling.
        let mut headers = vec![
            "Prediction Date".to_string(),
            "Rank".to_string(),
            "Stack Count".to_string(),
            "Stack List Names".to_string(),
            "Property Street Address".to_string(),
            "Property City".to_string(),
            "Property State".to_string(),
            "Property Zip Code".to_string(),
            "Property County".to_string(),
            "APN".to_string(),
            "Property Use".to_string(),
            "Equity %".to_string(),
            "Pre-Foreclosure".to_string(),
            "Tax Delinquent Year".to_string(),
        ];
        for i in headers.len()..RAW_LIST_INPUT_COLUMN_COUNT {
            headers.push(format!("filler_{i}"));
        }
        headers
    }

    #[test]
    fn injects_and_canonicalizes() {
        let mut rows = RowSet::new(seventy_headers()).unwrap();
        rows.push_row(vec![None; RAW_LIST_INPUT_COLUMN_COUNT]).unwrap();
        let out = normalize(rows, "vendor-a", "june-list").unwrap();

        assert_eq!(out.column_count(), RAW_LIST_CANONICAL_COLUMN_COUNT);
        assert_eq!(&out.columns()[..2], &["source_name", "list"]);
        assert_eq!(out.value(0, "source_name"), Some("vendor-a"));
        assert_eq!(out.value(0, "list"), Some("june-list"));

        // alias table applied on top of header canonicalization
        assert!(out.position("county").is_some());
        assert!(out.position("property_county").is_none());
        assert!(out.position("rank_number").is_some());
        assert!(out.position("tax_delinquency_year").is_some());
        // % and hyphen handling
        assert!(out.position("equity_percent").is_some());
        assert!(out.position("preforeclosure").is_some());
    }

    #[test]
    fn wrong_column_count_rejects_the_file() {
        let headers: Vec<String> = (0..69).map(|i| format!("c{i}")).collect();
        let rows = RowSet::new(headers).unwrap();
        let err = normalize(rows, "s", "l").unwrap_err();
        assert_eq!(
            err,
            SchemaError::ColumnCount {
                expected: 70,
                found: 69
            }
        );
    }

    #[test]
    fn header_normalization_rules() {
        assert_eq!(normalize_header("Equity %"), "equity_percent");
        assert_eq!(
            normalize_header("Pre-Foreclosure First Seen"),
            "preforeclosure_first_seen"
        );
        assert_eq!(normalize_header("Beds"), "beds");
    }
}
