use chrono::NaiveDate;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

mod csv_report;
mod pdf_report;

pub use csv_report::render_csv;
pub use pdf_report::render_pdf;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("csv flush: {0}")]
    Flush(String),

    #[error("pdf: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Download name, e.g. `attendance_2026-10-18.csv`.
    pub fn file_name(self, date: NaiveDate) -> String {
        format!("attendance_{}.{}", date.format("%Y-%m-%d"), self)
    }
}
