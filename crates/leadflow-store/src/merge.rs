//! Master-list merge: composite-key upsert with additive contact fields and
//! row-level failure isolation.

use leadflow_core::layout::{
    MASTER_KEY_COLUMNS, MERGE_ADDITIVE_COLUMNS, SKIPTRACE_CANONICAL_COLUMNS,
};
use leadflow_core::{TypedRowSet, Value};
use serde::Serialize;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::warn;

use crate::{bind_value, ensure_layout, StoreError};

/// Postgres `unique_violation`: the insert hit a constraint the upsert path
/// did not absorb (e.g. a key collision through NULL-distinct semantics).
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres `in_failed_sql_transaction`: a statement ran inside an aborted
/// subtransaction.
const IN_FAILED_TRANSACTION: &str = "25P02";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

/// Upsert every row of a canonical skip-trace batch into `master_list`.
///
/// The batch runs in one transaction with a savepoint per row: expected
/// conflicts roll back only the offending row and count as skipped, anything
/// else aborts the whole batch.
pub(crate) async fn merge_into_master(
    pool: &PgPool,
    batch: &TypedRowSet,
) -> Result<MergeReport, StoreError> {
    ensure_layout(batch, SKIPTRACE_CANONICAL_COLUMNS)?;

    let sql = upsert_sql(batch.columns());
    let mut tx = pool.begin().await?;
    let mut report = MergeReport::default();

    for row in batch.rows() {
        sqlx::query("SAVEPOINT merge_row").execute(&mut *tx).await?;
        let mut query = sqlx::query(&sql);
        for (value, ty) in row.iter().zip(batch.types()) {
            query = bind_value(query, *ty, value);
        }
        match query.fetch_one(&mut *tx).await {
            Ok(returned) => {
                let inserted: bool = returned.try_get("inserted")?;
                if inserted {
                    report.inserted += 1;
                } else {
                    report.updated += 1;
                }
                sqlx::query("RELEASE SAVEPOINT merge_row")
                    .execute(&mut *tx)
                    .await?;
            }
            Err(err) if is_row_conflict(&err) => {
                sqlx::query("ROLLBACK TO SAVEPOINT merge_row")
                    .execute(&mut *tx)
                    .await?;
                warn!(error = %err, "skipping conflicting skip-trace row");
                report.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    tx.commit().await?;
    Ok(report)
}

fn is_row_conflict(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == UNIQUE_VIOLATION || code == IN_FAILED_TRANSACTION)
        .unwrap_or(false)
}

/// Full-width insert with the natural key as conflict target. On conflict the
/// contact columns keep any existing non-empty master value, the trace date
/// moves forward only when the incoming row carries one, and the bookkeeping
/// date always refreshes. `xmax = 0` distinguishes a fresh insert from an
/// update on the returned row.
fn upsert_sql(columns: &[String]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    let mut updates: Vec<String> = MERGE_ADDITIVE_COLUMNS
        .iter()
        .map(|c| format!("{c} = COALESCE(NULLIF(master_list.{c}, ''), NULLIF(EXCLUDED.{c}, ''))"))
        .collect();
    updates.push(
        "last_skiptraced_date = COALESCE(EXCLUDED.last_skiptraced_date, master_list.last_skiptraced_date)"
            .to_string(),
    );
    updates.push("sql_last_update_date = EXCLUDED.sql_last_update_date".to_string());

    format!(
        "INSERT INTO master_list ({columns}) VALUES ({placeholders})
         ON CONFLICT ({key}) DO UPDATE SET {updates}
         RETURNING (xmax = 0) AS inserted",
        columns = columns.join(", "),
        placeholders = placeholders.join(", "),
        key = MASTER_KEY_COLUMNS.join(", "),
        updates = updates.join(", "),
    )
}

/// Pure mirror of the additive-contact resolution the `DO UPDATE` expression
/// implements; kept alongside it so the semantics stay unit-testable without
/// a database.
pub fn resolve_additive(existing: &Value, incoming: &Value) -> Value {
    if !existing.is_blank() {
        existing.clone()
    } else if !incoming.is_blank() {
        incoming.clone()
    } else {
        Value::Null
    }
}
