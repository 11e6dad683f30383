use csv::{QuoteStyle, WriterBuilder};

use super::ExportError;
use crate::model::attendance::AttendanceRecord;

/// Fixed export layout.
const HEADER: [&str; 5] = ["name", "status", "confidence", "time", "date"];

/// Renders records as CSV with a header row. Text columns are always quoted,
/// even when they look like numbers; confidence never is.
pub fn render_csv(records: &[AttendanceRecord]) -> Result<Vec<u8>, ExportError> {
    // Quoting depends on the column, not the value, so the writer never quotes.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(HEADER.map(quoted))?;
    for r in records {
        writer.write_record([
            quoted(&r.name),
            quoted(&r.status),
            r.confidence.to_string(),
            quoted(&r.time),
            quoted(&r.date.format("%Y-%m-%d").to_string()),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
