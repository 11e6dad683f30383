use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::model::attendance::AttendanceRecord;
use crate::error::AttendanceError;
use crate::models::MarkAttendanceReq;
use crate::service::AttendanceService;

/// Mark attendance for a recognised face
#[utoipa::path(
    post,
    path = "/mark-attendance",
    request_body = MarkAttendanceReq,
    responses(
        (status = 201, description = "Attendance marked", body = Object, example = json!({
            "message": "Attendance marked successfully",
            "data": {
                "id": 1,
                "name": "Ada Lovelace",
                "status": "Present",
                "confidence": 0.93,
                "time": "9:02:11 AM",
                "date": "2026-10-18"
            }
        })),
        (status = 400, description = "Missing or over-long fields, confidence too low, or already marked today", body = Object, example = json!({
            "error": "Ada Lovelace already marked present today"
        })),
        (status = 429, description = "Too many submissions"),
        (status = 500, description = "Internal server error", body = Object, example = json!({
            "error": "Server error"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    svc: web::Data<AttendanceService>,
    payload: web::Json<MarkAttendanceReq>,
) -> Result<impl Responder, AttendanceError> {
    let record = svc.mark(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Attendance marked successfully",
        "data": record
    })))
}

/// Today's attendance
#[utoipa::path(
    get,
    path = "/attendance",
    responses(
        (status = 200, description = "All records dated today", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn today_attendance(
    svc: web::Data<AttendanceService>,
) -> Result<impl Responder, AttendanceError> {
    let records = svc.list_today().await?;
    Ok(HttpResponse::Ok().json(records))
}
