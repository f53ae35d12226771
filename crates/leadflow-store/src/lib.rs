//! PostgreSQL persistence: staging loads, the uniques anti-join, per-owner
//! result storage, and the master-list merge.

mod merge;

use chrono::{DateTime, Utc};
use leadflow_core::layout::RAW_LIST_CANONICAL_COLUMNS;
use leadflow_core::{ColumnType, TypedRowSet, Value};
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use uuid::Uuid;

pub use merge::{resolve_additive, MergeReport};

pub const CRATE_NAME: &str = "leadflow-store";

/// Keep chunked inserts comfortably under the wire-protocol bind limit.
const MAX_BIND_PARAMS: usize = 60_000;

/// The anti-join membership test: an incoming row is unique unless a master
/// row matches all three key columns and carries a known phone number.
const UNIQUES_PREDICATE: &str = "NOT EXISTS (
    SELECT 1
    FROM master_list mml
    WHERE arl.property_street_address = mml.property_street_address
      AND arl.property_city = mml.property_city
      AND arl.owner_1_first_name = mml.owner_1_first_name
      AND mml.phone1 IS NOT NULL
)";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("batch layout mismatch: {0}")]
    Layout(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of one staging load + diff.
#[derive(Debug, Clone, Serialize)]
pub struct UniquesSummary {
    pub run_id: Uuid,
    pub rows_loaded: u64,
    pub unique_count: u64,
}

/// A previously computed uniques result for one owner identity.
#[derive(Debug, Clone, Serialize)]
pub struct UniquesResult {
    pub run_id: Uuid,
    pub row_count: i64,
    pub created_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ListStore {
    pool: PgPool,
}

impl ListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(include_str!("../migrations/001_init.sql"))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replace the staging area with `batch`, diff it against the master
    /// list, and store the unique subset for `owner_id`, superseding any
    /// prior result for that owner. One transaction covers the whole
    /// truncate+load+diff so a failed batch leaves the old state intact.
    pub async fn process_batch(
        &self,
        owner_id: &str,
        batch: &TypedRowSet,
    ) -> Result<UniquesSummary, StoreError> {
        ensure_layout(batch, RAW_LIST_CANONICAL_COLUMNS)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("TRUNCATE TABLE raw_list_staging")
            .execute(&mut *tx)
            .await?;
        insert_staging_rows(&mut tx, batch).await?;

        let count_sql =
            format!("SELECT COUNT(*) FROM raw_list_staging arl WHERE {UNIQUES_PREDICATE}");
        let unique_count: i64 = sqlx::query_scalar(&count_sql).fetch_one(&mut *tx).await?;

        sqlx::query("DELETE FROM uniques_rows WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        let materialize_sql = format!(
            "INSERT INTO uniques_rows (owner_id, ordinal, row_json)
             SELECT $1, row_number() OVER (), to_jsonb(arl)
             FROM raw_list_staging arl
             WHERE {UNIQUES_PREDICATE}"
        );
        sqlx::query(&materialize_sql)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        let run_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO uniques_results (owner_id, run_id, row_count, created_at)
             VALUES ($1, $2, $3, now())
             ON CONFLICT (owner_id) DO UPDATE SET
               run_id = EXCLUDED.run_id,
               row_count = EXCLUDED.row_count,
               created_at = EXCLUDED.created_at",
        )
        .bind(owner_id)
        .bind(run_id)
        .bind(unique_count)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(UniquesSummary {
            run_id,
            rows_loaded: batch.row_count() as u64,
            unique_count: unique_count as u64,
        })
    }

    /// Retrieve the stored uniques result for an owner. `Ok(None)` when no
    /// processing run has completed for that identity yet.
    pub async fn fetch_uniques(&self, owner_id: &str) -> Result<Option<UniquesResult>, StoreError> {
        let meta = sqlx::query(
            "SELECT run_id, row_count, created_at FROM uniques_results WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        let Some(meta) = meta else {
            return Ok(None);
        };

        let rows = sqlx::query(
            "SELECT row_json FROM uniques_rows WHERE owner_id = $1 ORDER BY ordinal",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        let mut row_values = Vec::with_capacity(rows.len());
        for row in rows {
            row_values.push(row.try_get::<serde_json::Value, _>("row_json")?);
        }

        Ok(Some(UniquesResult {
            run_id: meta.try_get("run_id")?,
            row_count: meta.try_get("row_count")?,
            created_at: meta.try_get("created_at")?,
            columns: RAW_LIST_CANONICAL_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: row_values,
        }))
    }

    /// Merge a normalized skip-trace batch into the master list.
    pub async fn merge_into_master(&self, batch: &TypedRowSet) -> Result<MergeReport, StoreError> {
        merge::merge_into_master(&self.pool, batch).await
    }
}

fn ensure_layout(batch: &TypedRowSet, expected: &[&str]) -> Result<(), StoreError> {
    if batch.column_count() != expected.len() {
        return Err(StoreError::Layout(format!(
            "expected {} columns, found {}",
            expected.len(),
            batch.column_count()
        )));
    }
    for (found, expected) in batch.columns().iter().zip(expected) {
        if found != expected {
            return Err(StoreError::Layout(format!(
                "expected column `{expected}`, found `{found}`"
            )));
        }
    }
    Ok(())
}

/// Bind a typed cell with the column's SQL type, so nulls keep the right
/// parameter type on the wire.
fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    ty: ColumnType,
    value: &Value,
) -> Query<'q, Postgres, PgArguments> {
    match ty {
        ColumnType::Text => query.bind(value.as_text().map(str::to_string)),
        ColumnType::SmallInt | ColumnType::Integer => query.bind(match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }),
        ColumnType::Date => query.bind(match value {
            Value::Date(d) => Some(*d),
            _ => None,
        }),
    }
}

async fn insert_staging_rows(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    batch: &TypedRowSet,
) -> Result<(), StoreError> {
    if batch.row_count() == 0 {
        return Ok(());
    }
    let chunk_rows = (MAX_BIND_PARAMS / batch.column_count()).max(1);
    for chunk in batch.rows().chunks(chunk_rows) {
        let sql = insert_sql("raw_list_staging", batch.columns(), chunk.len());
        let mut query = sqlx::query(&sql);
        for row in chunk {
            for (value, ty) in row.iter().zip(batch.types()) {
                query = bind_value(query, *ty, value);
            }
        }
        query.execute(&mut **tx).await?;
    }
    Ok(())
}

/// Multi-row `INSERT ... VALUES` with numbered placeholders.
fn insert_sql(table: &str, columns: &[String], row_count: usize) -> String {
    let width = columns.len();
    let tuples: Vec<String> = (0..row_count)
        .map(|row| {
            let placeholders: Vec<String> = (1..=width)
                .map(|col| format!("${}", row * width + col))
                .collect();
            format!("({})", placeholders.join(", "))
        })
        .collect();
    format!(
        "INSERT INTO {table} ({}) VALUES {}",
        columns.join(", "),
        tuples.join(", ")
    )
}
