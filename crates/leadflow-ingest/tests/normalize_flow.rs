// End-to-end ingest flow over vendor-shaped CSV fixtures: read, normalize,
// coerce, and check the result against the canonical catalogs.

use std::io::Write;

use chrono::NaiveDate;
use leadflow_core::layout::{
    RAW_LIST_CANONICAL_COLUMNS, RAW_LIST_PROFILE, SKIPTRACE_CANONICAL_COLUMNS,
    SKIPTRACE_INPUT_COLUMNS, SKIPTRACE_PROFILE,
};
use leadflow_core::{SchemaError, Value};
use leadflow_ingest::{coerce, raw_list, read_csv, skiptrace, IngestError};

/// Reconstruct the vendor spelling a canonical raw-list column arrives under.
fn vendor_header(canonical: &str) -> String {
    match canonical {
        "county" => "Property County".to_string(),
        "rank_number" => "Rank".to_string(),
        "tax_delinquency_year" => "Tax Delinquent Year".to_string(),
        "equity_percent" => "Equity %".to_string(),
        "ltv_percent" => "LTV %".to_string(),
        "preforeclosure" => "Pre-Foreclosure".to_string(),
        "preforeclosure_first_seen" => "Pre-Foreclosure First Seen".to_string(),
        "preforeclosure_last_updated" => "Pre-Foreclosure Last Updated".to_string(),
        other => other
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn raw_list_headers() -> Vec<String> {
    RAW_LIST_CANONICAL_COLUMNS[2..]
        .iter()
        .map(|c| vendor_header(c))
        .collect()
}

fn write_csv(headers: &[String], rows: &[Vec<String>]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "{}", headers.join(",")).expect("write header");
    for row in rows {
        writeln!(file, "{}", row.join(",")).expect("write row");
    }
    file
}

fn raw_list_row(street: &str, city: &str, first_name: &str) -> Vec<String> {
    RAW_LIST_CANONICAL_COLUMNS[2..]
        .iter()
        .map(|c| match *c {
            "property_street_address" => street.to_string(),
            "property_city" => city.to_string(),
            "owner_1_first_name" => first_name.to_string(),
            "owner_1_last_name" => "Smith".to_string(),
            "prediction_date" => "2024-04-01".to_string(),
            "last_sale_date" => "not a date".to_string(),
            "beds" => "3".to_string(),
            "sqft" => "NaN".to_string(),
            "sale_price" => "415000".to_string(),
            _ => String::new(),
        })
        .collect()
}

#[test]
fn raw_list_flow_produces_the_canonical_catalog() {
    let file = write_csv(
        &raw_list_headers(),
        &[
            raw_list_row("100 Main St", "Spokane", "Ada"),
            raw_list_row("200 Pine St", "Tacoma", "Ben"),
            raw_list_row("300 Oak Ave", "Yakima", "Cleo"),
        ],
    );
    let rows = read_csv(file.path()).unwrap();
    let normalized = raw_list::normalize(rows, "vendor-a", "june-list").unwrap();

    let columns: Vec<&str> = normalized.columns().iter().map(String::as_str).collect();
    assert_eq!(columns, RAW_LIST_CANONICAL_COLUMNS);

    let typed = coerce::apply(&normalized, &RAW_LIST_PROFILE);
    assert_eq!(typed.row_count(), 3);
    assert_eq!(
        typed.value(0, "source_name"),
        Some(&Value::Text("vendor-a".into()))
    );
    assert_eq!(typed.value(0, "list"), Some(&Value::Text("june-list".into())));
    assert_eq!(typed.value(0, "beds"), Some(&Value::Int(3)));
    assert_eq!(typed.value(0, "sale_price"), Some(&Value::Int(415000)));
    // "NaN" nulled at read time, bad date nulled at coercion time
    assert_eq!(typed.value(0, "sqft"), Some(&Value::Null));
    assert_eq!(typed.value(0, "last_sale_date"), Some(&Value::Null));
    assert_eq!(
        typed.value(0, "prediction_date"),
        Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()))
    );
}

#[test]
fn normalize_plus_coerce_twice_is_identical() {
    let file = write_csv(&raw_list_headers(), &[raw_list_row("1 A St", "Kent", "Dot")]);
    let rows = read_csv(file.path()).unwrap();

    let first = coerce::apply(
        &raw_list::normalize(rows.clone(), "v", "l").unwrap(),
        &RAW_LIST_PROFILE,
    );
    let second = coerce::apply(
        &raw_list::normalize(rows, "v", "l").unwrap(),
        &RAW_LIST_PROFILE,
    );
    assert_eq!(first, second);
}

#[test]
fn sixty_nine_columns_reject_before_any_row_is_kept() {
    let mut headers = raw_list_headers();
    headers.pop();
    let row: Vec<String> = headers.iter().map(|_| String::new()).collect();
    let file = write_csv(&headers, &[row]);

    let rows = read_csv(file.path()).unwrap();
    let err = raw_list::normalize(rows, "v", "l").unwrap_err();
    assert_eq!(
        err,
        SchemaError::ColumnCount {
            expected: 70,
            found: 69
        }
    );
}

#[test]
fn skiptrace_flow_produces_the_canonical_catalog() {
    let headers: Vec<String> = SKIPTRACE_INPUT_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .collect();
    let row: Vec<String> = SKIPTRACE_INPUT_COLUMNS
        .iter()
        .map(|c| match *c {
            "property_street_address" => "100 Main St".to_string(),
            "property_city" => "Spokane".to_string(),
            "owner_1_first_name" => "Ada".to_string(),
            "owner_1_last_name" => "Smith".to_string(),
            "phone1" => "555-1111".to_string(),
            "email1" => "ada@example.com".to_string(),
            "year_built" => "1962".to_string(),
            _ => String::new(),
        })
        .collect();
    let file = write_csv(&headers, &[row]);

    let rows = read_csv(file.path()).unwrap();
    let traced = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
    let run = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let normalized = skiptrace::normalize(rows, traced, run).unwrap();

    let columns: Vec<&str> = normalized.columns().iter().map(String::as_str).collect();
    assert_eq!(columns, SKIPTRACE_CANONICAL_COLUMNS);

    let typed = coerce::apply(&normalized, &SKIPTRACE_PROFILE);
    assert_eq!(typed.value(0, "last_skiptraced_date"), Some(&Value::Date(traced)));
    assert_eq!(typed.value(0, "sql_last_update_date"), Some(&Value::Date(run)));
    assert_eq!(typed.value(0, "sql_added_date"), Some(&Value::Date(run)));
    assert_eq!(typed.value(0, "year_built"), Some(&Value::Int(1962)));
    assert_eq!(
        typed.value(0, "phone1"),
        Some(&Value::Text("555-1111".into()))
    );
}

#[test]
fn ragged_csv_surfaces_as_a_parse_error() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2").unwrap();
    let err = read_csv(file.path()).unwrap_err();
    assert!(matches!(err, IngestError::Csv { .. }));
}
