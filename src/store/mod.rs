use chrono::NaiveDate;
use futures::future::BoxFuture;
use thiserror::Error;

use crate::model::attendance::{AttendanceRecord, NewAttendance};

mod memory;
mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a record for this name and date already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("in-memory store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for attendance records.
///
/// Implementations must refuse a second record for the same `(name, date)` on
/// `insert` with [`StoreError::Duplicate`], even though callers check first.
pub trait AttendanceStore: Send + Sync {
    fn find_by_name_and_date<'a>(
        &'a self,
        name: &'a str,
        date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Option<AttendanceRecord>>>;

    fn insert(&self, record: NewAttendance) -> BoxFuture<'_, StoreResult<AttendanceRecord>>;

    /// Records for `date` in insertion order.
    fn list_by_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<AttendanceRecord>>>;

    /// Deletes every record not dated `date`, returning how many were removed.
    fn delete_except_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<u64>>;

    fn close(&self) -> BoxFuture<'_, ()>;
}
