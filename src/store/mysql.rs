use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::BoxFuture;
use sqlx::MySqlPool;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, NewAttendance};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS attendance_records (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin NOT NULL,
    status VARCHAR(32) NOT NULL,
    confidence DOUBLE NOT NULL,
    `time` VARCHAR(32) NOT NULL,
    `date` DATE NOT NULL,
    UNIQUE KEY uniq_attendance_name_date (name, `date`),
    KEY idx_attendance_date (`date`)
)
"#;

const SELECT_COLUMNS: &str = "SELECT id, name, status, confidence, `time`, `date` FROM attendance_records";

/// MySQL integrity constraint violation.
const SQLSTATE_INTEGRITY: &str = "23000";

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

impl AttendanceStore for MySqlStore {
    fn find_by_name_and_date<'a>(
        &'a self,
        name: &'a str,
        date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Option<AttendanceRecord>>> {
        async move {
            let sql = format!("{SELECT_COLUMNS} WHERE name = ? AND `date` = ? LIMIT 1");
            let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
                .bind(name)
                .bind(date)
                .fetch_optional(&self.pool)
                .await?;
            Ok(record)
        }
        .boxed()
    }

    fn insert(&self, record: NewAttendance) -> BoxFuture<'_, StoreResult<AttendanceRecord>> {
        async move {
            let result = sqlx::query(
                r#"
                INSERT INTO attendance_records (name, status, confidence, `time`, `date`)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.name)
            .bind(&record.status)
            .bind(record.confidence)
            .bind(&record.time)
            .bind(record.date)
            .execute(&self.pool)
            .await;

            match result {
                Ok(done) => Ok(record.into_record(done.last_insert_id())),
                Err(e) => {
                    // Lost the race against a concurrent submission for the same day
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.code().as_deref() == Some(SQLSTATE_INTEGRITY) {
                            return Err(StoreError::Duplicate);
                        }
                    }
                    Err(e.into())
                }
            }
        }
        .boxed()
    }

    fn list_by_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<AttendanceRecord>>> {
        async move {
            let sql = format!("{SELECT_COLUMNS} WHERE `date` = ? ORDER BY id");
            let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
                .bind(date)
                .fetch_all(&self.pool)
                .await?;
            Ok(records)
        }
        .boxed()
    }

    fn delete_except_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<u64>> {
        async move {
            let result = sqlx::query("DELETE FROM attendance_records WHERE `date` <> ?")
                .bind(date)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        }
        .boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        async move { self.pool.close().await }.boxed()
    }
}
