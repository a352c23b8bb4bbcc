pub mod invoice;
pub mod quote;

use crate::document::{parse_line_input, DocumentLine};
use crate::error::{FacturierError, Result};
use crate::pdf::LineData;

/// Parse the repeated --line inputs of a create/edit command.
pub(crate) fn parse_lines(inputs: &[String], default_vat: f64) -> Result<Vec<DocumentLine>> {
    inputs
        .iter()
        .map(|input| parse_line_input(input, default_vat))
        .collect()
}

/// Resolve a document reference to a position in the stored records.
/// Accepts either a 1-based index from `list` (newest first) or a full
/// document number. `Ok(None)` means the number is unknown; the caller
/// maps that to its own not-found error.
pub(crate) fn resolve_position<T>(
    records: &[T],
    reference: &str,
    number_of: impl Fn(&T) -> &str,
) -> Result<Option<usize>> {
    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 || idx > records.len() {
            return Err(FacturierError::InvalidDocumentIndex(reference.to_string()));
        }
        // Records are displayed in reverse order (newest first), 1-indexed.
        return Ok(Some(records.len() - idx));
    }

    Ok(records.iter().position(|r| number_of(r) == reference))
}

/// A document number is used as the PDF file stem; slashes become dashes.
pub(crate) fn file_stem(number: &str) -> String {
    number.replace('/', "-")
}

pub(crate) fn lines_data(lines: &[DocumentLine]) -> Vec<LineData> {
    lines
        .iter()
        .map(|l| LineData {
            description: l.description.clone(),
            staff_count: l.staff_count,
            days: l.days,
            unit_price: l.unit_price,
            vat_rate: l.vat_rate,
            total_ht: l.total_ht(),
        })
        .collect()
}
