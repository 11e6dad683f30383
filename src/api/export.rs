use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use tracing::info;

use crate::error::AttendanceError;
use crate::export::{ExportError, ExportFormat, render_csv, render_pdf};
use crate::service::AttendanceService;

fn attachment(format: ExportFormat, date: NaiveDate, body: Vec<u8>) -> HttpResponse {
    let file_name = format.file_name(date);
    info!(%file_name, bytes = body.len(), "Attendance exported");

    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(body)
}

/// Export today's attendance as CSV
#[utoipa::path(
    get,
    path = "/export-csv",
    responses(
        (status = 200, description = "CSV file: name,status,confidence,time,date", content_type = "text/csv"),
        (status = 404, description = "No attendance records found for today", body = Object, example = json!({
            "error": "No attendance records found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Export"
)]
pub async fn export_csv(svc: web::Data<AttendanceService>) -> Result<HttpResponse, AttendanceError> {
    let (date, records) = svc.export_rows().await?;
    let body = render_csv(&records)?;
    Ok(attachment(ExportFormat::Csv, date, body))
}

/// Export today's attendance as a PDF report
#[utoipa::path(
    get,
    path = "/export-pdf",
    responses(
        (status = 200, description = "PDF attendance report", content_type = "application/pdf"),
        (status = 404, description = "No attendance records found for today", body = Object, example = json!({
            "error": "No attendance records found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Export"
)]
pub async fn export_pdf(svc: web::Data<AttendanceService>) -> Result<HttpResponse, AttendanceError> {
    let (date, records) = svc.export_rows().await?;
    // printpdf is synchronous; keep it off the worker thread.
    let body = web::block(move || render_pdf(date, &records))
        .await
        .map_err(|e| ExportError::Pdf(e.to_string()))??;
    Ok(attachment(ExportFormat::Pdf, date, body))
}
