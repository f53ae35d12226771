//! Canonical column layouts for the two supported input shapes.
//!
//! These catalogs must match the column order in
//! `leadflow-store/migrations/001_init.sql`. The normalizers in
//! `leadflow-ingest` are checked against them in tests, and the store refuses
//! a batch whose columns differ.

use crate::value::ColumnType;

pub const RAW_LIST_INPUT_COLUMN_COUNT: usize = 70;
pub const RAW_LIST_CANONICAL_COLUMN_COUNT: usize = 72;
pub const SKIPTRACE_INPUT_COLUMN_COUNT: usize = 91;
pub const SKIPTRACE_CANONICAL_COLUMN_COUNT: usize = 102;

/// Header renames applied after lowercasing/underscoring. The two
/// self-mappings are carried over from the upstream export contract and are
/// deliberate no-ops.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[
    ("property_county", "county"),
    ("rank", "rank_number"),
    ("tax_delinquent_year", "tax_delinquency_year"),
    ("tax_delinquent_first_seen", "tax_delinquent_first_seen"),
    ("tax_delinquent_last_updated", "tax_delinquent_last_updated"),
];

/// Composite natural key of the master list.
pub const MASTER_KEY_COLUMNS: &[&str] = &[
    "property_street_address",
    "property_city",
    "owner_1_first_name",
    "owner_1_last_name",
];

/// Join columns for the uniques anti-join (the diff deliberately ignores
/// `owner_1_last_name` and instead gates on the master row's `phone1`).
pub const DIFF_KEY_COLUMNS: &[&str] =
    &["property_street_address", "property_city", "owner_1_first_name"];

/// Contact columns that are additive-only during a merge: an existing
/// non-empty master value is never overwritten.
pub const MERGE_ADDITIVE_COLUMNS: &[&str] = &["phone1", "phone2", "phone3", "email1", "email2"];

/// The six vendor owner-name columns, in their canonical relative order.
pub const SKIPTRACE_OWNER_NAME_COLUMNS: &[&str] = &[
    "owner_1_name",
    "owner_1_first_name",
    "owner_1_last_name",
    "owner_2_name",
    "owner_2_first_name",
    "owner_2_last_name",
];

/// Raw-list layout after normalization: `source_name`, `list`, then the 70
/// normalized input columns in input order.
pub const RAW_LIST_CANONICAL_COLUMNS: &[&str] = &[
    "source_name",
    "list",
    "prediction_date",
    "rank_number",
    "stack_count",
    "stack_list_names",
    "property_street_address",
    "property_city",
    "property_state",
    "property_zip_code",
    "county",
    "apn",
    "property_use",
    "subdivision",
    "legal_description",
    "owner_1_name",
    "owner_1_first_name",
    "owner_1_last_name",
    "owner_2_name",
    "owner_2_first_name",
    "owner_2_last_name",
    "owner_occupied",
    "mailing_street_address",
    "mailing_city",
    "mailing_state",
    "mailing_zip_code",
    "year_built",
    "beds",
    "baths",
    "sqft",
    "lot_size",
    "low_property_avm",
    "final_property_avm",
    "high_property_avm",
    "equity_percent",
    "ltv_percent",
    "last_sale_date",
    "sale_price",
    "first_seen",
    "last_updated",
    "vacant",
    "vacancy_date",
    "vacancy_first_seen",
    "vacancy_last_updated",
    "tax_delinquency",
    "tax_delinquency_year",
    "tax_delinquent_first_seen",
    "tax_delinquent_last_updated",
    "preforeclosure",
    "preforeclosure_first_seen",
    "preforeclosure_last_updated",
    "prior_deed_transfer",
    "prior_deed_transfer_first_seen",
    "prior_deed_transfer_last_updated",
    "phantom",
    "phantom_first_seen",
    "phantom_last_updated",
    "invol_lien",
    "invol_lien_first_seen",
    "invol_lien_last_updated",
    "mortgage_lender_name",
    "mortgage_loan_type",
    "mortgage_interest_rate",
    "mortgage_original_due_date",
    "mortgage_default_date",
    "mortgage_past_due_amount",
    "mortgage_unpaid_balance_amount",
    "notice_of_sale_type",
    "notice_of_sale_auction_date",
    "trustee_sale_number",
    "owner_last_exported_date",
    "property_last_exported_date",
];

pub const RAW_LIST_SMALLINT_COLUMNS: &[&str] = &[
    "tax_delinquency_year",
    "tax_delinquency",
    "prior_deed_transfer",
    "preforeclosure",
    "phantom",
    "invol_lien",
    "stack_count",
    "rank_number",
    "year_built",
    "baths",
    "beds",
    "vacant",
];

pub const RAW_LIST_INTEGER_COLUMNS: &[&str] = &[
    "low_property_avm",
    "final_property_avm",
    "high_property_avm",
    "lot_size",
    "sqft",
    "sale_price",
    "mortgage_past_due_amount",
    "mortgage_unpaid_balance_amount",
];

pub const RAW_LIST_DATE_COLUMNS: &[&str] = &[
    "prediction_date",
    "last_sale_date",
    "first_seen",
    "last_updated",
    "invol_lien_first_seen",
    "invol_lien_last_updated",
    "phantom_first_seen",
    "phantom_last_updated",
    "mortgage_original_due_date",
    "mortgage_default_date",
    "notice_of_sale_auction_date",
    "preforeclosure_first_seen",
    "preforeclosure_last_updated",
    "prior_deed_transfer_first_seen",
    "prior_deed_transfer_last_updated",
    "tax_delinquent_last_updated",
    "vacancy_date",
    "vacancy_first_seen",
    "vacancy_last_updated",
    "owner_last_exported_date",
    "property_last_exported_date",
];

/// Skip-trace vendor export layout as received, before any structural edit.
pub const SKIPTRACE_INPUT_COLUMNS: &[&str] = &[
    "record_id",
    "list",
    "full_address",
    "property_street_address",
    "property_city",
    "property_state",
    "property_zip_code",
    "county",
    "owner_1_name",
    "owner_1_first_name",
    "owner_1_last_name",
    "owner_2_name",
    "owner_2_first_name",
    "owner_2_last_name",
    "owner_street_address",
    "owner_city",
    "owner_state",
    "owner_zip_code",
    "has_duplicates",
    "vacancy_description",
    "vacant",
    "property_use",
    "year_built",
    "sqft",
    "lot_size",
    "last_sale_date",
    "sale_price",
    "estimated_value",
    "estimated_equity",
    "dob",
    "age",
    "deceased",
    "phone1",
    "phone1_type",
    "phone1_score",
    "phone1_last_seen",
    "phone2",
    "phone2_type",
    "phone2_score",
    "phone2_last_seen",
    "phone2_company",
    "phone3",
    "phone3_type",
    "phone3_score",
    "phone3_last_seen",
    "phone3_company",
    "phone4",
    "phone4_type",
    "phone5",
    "phone5_type",
    "email1",
    "email2",
    "email3",
    "email4",
    "email5",
    "relative_1_name",
    "relative_1_phone",
    "relative_2_name",
    "relative_2_phone",
    "bankruptcy",
    "bankruptcy_date",
    "foreclosure",
    "foreclosure_date",
    "lien",
    "lien_date",
    "judgment",
    "judgment_date",
    "litigator",
    "dnc",
    "skip_trace_status",
    "skip_trace_match_score",
    "owner_occupied",
    "absentee_owner",
    "language_preference",
    "time_zone",
    "household_income",
    "net_worth",
    "length_of_residence",
    "marital_status",
    "gender",
    "occupation",
    "education",
    "credit_rating",
    "tax_assessed_value",
    "tax_amount",
    "apn",
    "legal_description",
    "subdivision",
    "latitude",
    "longitude",
    "notes",
];

/// Skip-trace layout after the full structural transform; also the master
/// list schema.
pub const SKIPTRACE_CANONICAL_COLUMNS: &[&str] = &[
    "record_id",
    "list",
    "original_name",
    "owner_1_name",
    "owner_1_first_name",
    "owner_1_middle_name",
    "owner_1_last_name",
    "owner_2_name",
    "owner_2_first_name",
    "owner_2_middle_name",
    "owner_2_last_name",
    "county",
    "property_class",
    "dob",
    "age",
    "deceased",
    "phone1",
    "phone1_cc_disposition",
    "phone1_sms_disposition",
    "phone1_type",
    "phone1_score",
    "phone1_last_seen",
    "phone2",
    "phone2_type",
    "phone2_score",
    "phone2_last_seen",
    "phone2_company",
    "phone2_cc_disposition",
    "phone2_sms_disposition",
    "phone3",
    "phone3_type",
    "phone3_score",
    "phone3_last_seen",
    "phone3_company",
    "phone3_cc_disposition",
    "phone3_sms_disposition",
    "phone4",
    "phone4_type",
    "phone5",
    "phone5_type",
    "email1",
    "email2",
    "email3",
    "email4",
    "email5",
    "relative_1_name",
    "relative_1_phone",
    "relative_2_name",
    "relative_2_phone",
    "bankruptcy",
    "bankruptcy_date",
    "foreclosure",
    "foreclosure_date",
    "lien",
    "lien_date",
    "judgment",
    "judgment_date",
    "litigator",
    "dnc",
    "skip_trace_status",
    "skip_trace_match_score",
    "owner_occupied",
    "absentee_owner",
    "language_preference",
    "time_zone",
    "household_income",
    "net_worth",
    "length_of_residence",
    "marital_status",
    "gender",
    "occupation",
    "education",
    "credit_rating",
    "tax_assessed_value",
    "tax_amount",
    "apn",
    "legal_description",
    "subdivision",
    "latitude",
    "longitude",
    "notes",
    "last_skiptraced_date",
    "sql_last_update_date",
    "sql_added_date",
    "owner_street_address",
    "owner_city",
    "owner_state",
    "owner_zip_code",
    "full_skiptrace_address",
    "property_street_address",
    "property_city",
    "property_state",
    "property_zip_code",
    "vacant",
    "property_use",
    "year_built",
    "sqft",
    "lot_size",
    "last_sale_date",
    "sale_price",
    "estimated_value",
    "estimated_equity",
];

pub const SKIPTRACE_SMALLINT_COLUMNS: &[&str] =
    &["year_built", "vacant", "age", "length_of_residence"];

pub const SKIPTRACE_INTEGER_COLUMNS: &[&str] = &[
    "sqft",
    "lot_size",
    "sale_price",
    "estimated_value",
    "estimated_equity",
    "household_income",
    "net_worth",
    "tax_assessed_value",
    "tax_amount",
    "skip_trace_match_score",
];

pub const SKIPTRACE_DATE_COLUMNS: &[&str] = &[
    "dob",
    "last_sale_date",
    "phone1_last_seen",
    "phone2_last_seen",
    "phone3_last_seen",
    "bankruptcy_date",
    "foreclosure_date",
    "lien_date",
    "judgment_date",
    "last_skiptraced_date",
    "sql_last_update_date",
    "sql_added_date",
];

/// Named coercion lists for one input shape. Columns absent from every list
/// stay opaque text.
#[derive(Debug, Clone, Copy)]
pub struct CoercionProfile {
    pub small_int_columns: &'static [&'static str],
    pub integer_columns: &'static [&'static str],
    pub date_columns: &'static [&'static str],
}

impl CoercionProfile {
    pub fn column_type(&self, name: &str) -> ColumnType {
        if self.small_int_columns.contains(&name) {
            ColumnType::SmallInt
        } else if self.integer_columns.contains(&name) {
            ColumnType::Integer
        } else if self.date_columns.contains(&name) {
            ColumnType::Date
        } else {
            ColumnType::Text
        }
    }
}

pub const RAW_LIST_PROFILE: CoercionProfile = CoercionProfile {
    small_int_columns: RAW_LIST_SMALLINT_COLUMNS,
    integer_columns: RAW_LIST_INTEGER_COLUMNS,
    date_columns: RAW_LIST_DATE_COLUMNS,
};

pub const SKIPTRACE_PROFILE: CoercionProfile = CoercionProfile {
    small_int_columns: SKIPTRACE_SMALLINT_COLUMNS,
    integer_columns: SKIPTRACE_INTEGER_COLUMNS,
    date_columns: SKIPTRACE_DATE_COLUMNS,
};
