use crate::model::attendance::AttendanceRecord;
use crate::models::MarkAttendanceReq;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Face Recognition Attendance API",
        version = "0.1.0",
        description = r#"
## Face Recognition Attendance

Records attendance submitted by a face-recognition client and exports the
day's register.

### Rules
- A submission needs `name`, `status`, `confidence` and `time`
- Confidence below the configured threshold (default **0.8**) is rejected
- One record per name per day; the server's date is authoritative
- Records from previous days are purged by a daily reset job

### Exports
- CSV with columns `name,status,confidence,time,date`
- PDF report with a table of today's records
"#,
    ),
    paths(
        crate::api::attendance::mark_attendance,
        crate::api::attendance::today_attendance,

        crate::api::export::export_csv,
        crate::api::export::export_pdf
    ),
    components(
        schemas(
            AttendanceRecord,
            MarkAttendanceReq
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance marking and daily listing"),
        (name = "Export", description = "CSV and PDF exports of today's attendance"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/mark-attendance", "/attendance", "/export-csv", "/export-pdf"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn daily_listing_returns_attendance_records() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schema = &json["paths"]["/attendance"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];

        assert_eq!(schema["type"], "array");
        assert_eq!(schema["items"]["$ref"], "#/components/schemas/AttendanceRecord");
    }
}
