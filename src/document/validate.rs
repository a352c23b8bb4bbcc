use chrono::NaiveDate;

use super::line::DocumentLine;
use crate::error::{FacturierError, Result};

/// Submission gate run before a quote or invoice touches the state file.
///
/// The line check is deliberately generic: the user gets one message for
/// any empty description or non-positive price, not a per-field report.
pub fn validate_document(
    client_id: &str,
    primary_date: Option<NaiveDate>,
    date_label: &'static str,
    lines: &[DocumentLine],
) -> Result<()> {
    if client_id.trim().is_empty() {
        return Err(FacturierError::ClientRequired);
    }
    if primary_date.is_none() {
        return Err(FacturierError::MissingDate(date_label));
    }
    if lines.is_empty() {
        return Err(FacturierError::NoLines);
    }
    if lines
        .iter()
        .any(|l| l.description.trim().is_empty() || l.unit_price <= 0.0)
    {
        return Err(FacturierError::InvalidLine);
    }
    Ok(())
}
