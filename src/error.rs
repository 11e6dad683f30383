use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

use crate::export::ExportError;
use crate::store::StoreError;

/// Everything an attendance endpoint can fail with.
#[derive(Debug, Display)]
pub enum AttendanceError {
    #[display(fmt = "Missing required fields")]
    MissingFields,

    #[display(fmt = "{} must be at most {} characters", _0, _1)]
    FieldTooLong(&'static str, usize),

    #[display(fmt = "Confidence must be a number between 0 and 1")]
    InvalidConfidence,

    #[display(fmt = "Face recognition confidence too low")]
    LowConfidence,

    #[display(fmt = "{} already marked present today", _0)]
    AlreadyMarked(String),

    #[display(fmt = "No attendance records found for today")]
    NoRecords,

    #[display(fmt = "storage failure: {}", _0)]
    Storage(StoreError),

    #[display(fmt = "export failure: {}", _0)]
    Export(ExportError),
}

impl std::error::Error for AttendanceError {}

impl From<StoreError> for AttendanceError {
    fn from(e: StoreError) -> Self {
        AttendanceError::Storage(e)
    }
}

impl From<ExportError> for AttendanceError {
    fn from(e: ExportError) -> Self {
        AttendanceError::Export(e)
    }
}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::MissingFields
            | AttendanceError::FieldTooLong(..)
            | AttendanceError::InvalidConfidence
            | AttendanceError::LowConfidence
            | AttendanceError::AlreadyMarked(_) => StatusCode::BAD_REQUEST,
            AttendanceError::NoRecords => StatusCode::NOT_FOUND,
            AttendanceError::Storage(_) | AttendanceError::Export(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal causes stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Request failed");
            "Server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(json!({ "error": message }))
    }
}
