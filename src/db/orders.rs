//! The fixed work-order projection.

use serde_json::Value;
use sqlx::Row;
use sqlx::postgres::PgRow;

use super::Db;
use crate::error::Result;
use crate::ingest::FIELDS;
use crate::model::RawRecord;
use crate::source::OrderSource;

/// Every column comes back as text so the engine's lenient parsing decides
/// what is usable, not the driver.
const WORK_ORDERS_QUERY: &str = "
    SELECT id::text               AS id,
           short_description::text AS short_description,
           requester_name::text    AS requester_name,
           priority::text          AS priority,
           created_at::text        AS created_at,
           started_at::text        AS started_at,
           finished_at::text       AS finished_at,
           assignee_name::text     AS assignee_name,
           full_description::text  AS full_description
    FROM   maintenance_work_orders
    WHERE  work_group = $1";

impl Db {
    /// Fetch every work order belonging to `work_group`, as raw records.
    pub async fn fetch_work_orders(&self, work_group: i64) -> Result<Vec<RawRecord>> {
        let rows = sqlx::query(WORK_ORDERS_QUERY)
            .bind(work_group)
            .fetch_all(self.pool())
            .await?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &PgRow) -> Result<RawRecord> {
    let mut record = RawRecord::new();
    for field in FIELDS {
        let value: Option<String> = row.try_get(field)?;
        record.insert(field.to_string(), value.map_or(Value::Null, Value::String));
    }
    Ok(record)
}

/// Postgres-backed [`OrderSource`] for one work group.
#[derive(Clone)]
pub struct PgOrderSource {
    db: Db,
    work_group: i64,
}

impl PgOrderSource {
    pub fn new(db: Db, work_group: i64) -> Self {
        Self { db, work_group }
    }
}

impl OrderSource for PgOrderSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        self.db.fetch_work_orders(self.work_group).await
    }

    fn describe(&self) -> String {
        format!("postgres:work_group={}", self.work_group)
    }
}
