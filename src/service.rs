use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::error::AttendanceError;
use crate::model::attendance::{AttendanceRecord, NewAttendance};
use crate::models::MarkAttendanceReq;
use crate::store::{AttendanceStore, StoreError};

/// Attendance rules shared by all handlers.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    clock: Arc<dyn Clock>,
    min_confidence: f64,
}

impl AttendanceService {
    pub fn new(store: Arc<dyn AttendanceStore>, clock: Arc<dyn Clock>, min_confidence: f64) -> Self {
        Self {
            store,
            clock,
            min_confidence,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Validates a submission and stores it under today's date, once per name per day.
    pub async fn mark(&self, req: MarkAttendanceReq) -> Result<AttendanceRecord, AttendanceError> {
        let mark = req.validate(self.min_confidence)?;
        let today = self.today();

        if self
            .store
            .find_by_name_and_date(&mark.name, today)
            .await?
            .is_some()
        {
            warn!(name = %mark.name, %today, "Duplicate attendance rejected");
            return Err(AttendanceError::AlreadyMarked(mark.name));
        }

        let name = mark.name.clone();
        let record = self
            .store
            .insert(NewAttendance {
                name: mark.name,
                status: mark.status,
                confidence: mark.confidence,
                time: mark.time,
                date: today,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => AttendanceError::AlreadyMarked(name),
                other => other.into(),
            })?;

        info!(
            id = record.id,
            name = %record.name,
            confidence = record.confidence,
            %today,
            "Attendance marked"
        );
        Ok(record)
    }

    pub async fn list_today(&self) -> Result<Vec<AttendanceRecord>, AttendanceError> {
        Ok(self.store.list_by_date(self.today()).await?)
    }

    /// Today's date and records, or `NoRecords` when there is nothing to export.
    pub async fn export_rows(&self) -> Result<(NaiveDate, Vec<AttendanceRecord>), AttendanceError> {
        let today = self.today();
        let records = self.store.list_by_date(today).await?;
        if records.is_empty() {
            return Err(AttendanceError::NoRecords);
        }
        Ok((today, records))
    }
}
