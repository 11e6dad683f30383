use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status recorded for every accepted submission.
pub const STATUS_PRESENT: &str = "Present";

/// Column widths in characters, shared by validation and the MySQL schema.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_STATUS_LEN: usize = 32;
pub const MAX_TIME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Ada Lovelace",
        "status": "Present",
        "confidence": 0.93,
        "time": "9:02:11 AM",
        "date": "2026-10-18"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Ada Lovelace")]
    pub name: String,

    #[schema(example = "Present")]
    pub status: String,

    #[schema(example = 0.93)]
    pub confidence: f64,

    /// Client-side locale time string, stored verbatim.
    #[schema(example = "9:02:11 AM")]
    pub time: String,

    #[schema(example = "2026-10-18", value_type = String, format = "date")]
    pub date: NaiveDate,
}

/// A validated record that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub name: String,
    pub status: String,
    pub confidence: f64,
    pub time: String,
    pub date: NaiveDate,
}

impl NewAttendance {
    pub fn into_record(self, id: u64) -> AttendanceRecord {
        AttendanceRecord {
            id,
            name: self.name,
            status: self.status,
            confidence: self.confidence,
            time: self.time,
            date: self.date,
        }
    }
}
