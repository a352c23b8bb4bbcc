mod data;
mod typst;

pub use data::{DocumentData, LineData, ReportData, ReportRow};
pub use typst::{generate_document_pdf, generate_report_pdf};
