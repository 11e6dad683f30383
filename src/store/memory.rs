use std::sync::RwLock;

use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::{BoxFuture, ready};

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::attendance::{AttendanceRecord, NewAttendance};

/// Process-local store, used when no database is configured.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    records: Vec<AttendanceRecord>,
}

impl MemoryStore {
    fn find(&self, name: &str, date: NaiveDate) -> StoreResult<Option<AttendanceRecord>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .records
            .iter()
            .find(|r| r.name == name && r.date == date)
            .cloned())
    }

    fn insert_now(&self, record: NewAttendance) -> StoreResult<AttendanceRecord> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        // Checked under the write lock, so concurrent inserts cannot both pass.
        if inner
            .records
            .iter()
            .any(|r| r.name == record.name && r.date == record.date)
        {
            return Err(StoreError::Duplicate);
        }

        inner.last_id += 1;
        let stored = record.into_record(inner.last_id);
        inner.records.push(stored.clone());
        Ok(stored)
    }

    fn list(&self, date: NaiveDate) -> StoreResult<Vec<AttendanceRecord>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.date == date)
            .cloned()
            .collect())
    }

    fn retain_date(&self, date: NaiveDate) -> StoreResult<u64> {
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let before = inner.records.len();
        inner.records.retain(|r| r.date == date);
        Ok((before - inner.records.len()) as u64)
    }
}

impl AttendanceStore for MemoryStore {
    fn find_by_name_and_date<'a>(
        &'a self,
        name: &'a str,
        date: NaiveDate,
    ) -> BoxFuture<'a, StoreResult<Option<AttendanceRecord>>> {
        ready(self.find(name, date)).boxed()
    }

    fn insert(&self, record: NewAttendance) -> BoxFuture<'_, StoreResult<AttendanceRecord>> {
        ready(self.insert_now(record)).boxed()
    }

    fn list_by_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<Vec<AttendanceRecord>>> {
        ready(self.list(date)).boxed()
    }

    fn delete_except_date(&self, date: NaiveDate) -> BoxFuture<'_, StoreResult<u64>> {
        ready(self.retain_date(date)).boxed()
    }

    fn close(&self) -> BoxFuture<'_, ()> {
        ready(()).boxed()
    }
}
