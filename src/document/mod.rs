mod line;
mod status;
mod terms;
mod totals;
mod transform;
mod validate;

pub use line::{parse_line_input, DocumentLine};
pub use status::{invoice_status, quote_status, InvoiceStatus, QuoteStatus};
pub use terms::PaymentTerm;
pub use totals::{compute_totals, Totals};
pub use transform::{invoice_draft_from_quote, InvoiceDraft};
pub use validate::validate_document;

use chrono::NaiveDate;

use crate::error::{FacturierError, Result};

/// Format a document number from a template like "DEV/{year}/{seq:04}"
pub fn format_document_number(format: &str, year: u32, seq: u32) -> String {
    format
        .replace("{year}", &year.to_string())
        .replace("{seq:04}", &format!("{:04}", seq))
        .replace("{seq:05}", &format!("{:05}", seq))
        .replace("{seq:03}", &format!("{:03}", seq))
}

/// Parse a YYYY-MM-DD command-line date
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| FacturierError::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_pads_sequence() {
        assert_eq!(
            format_document_number("DEV/{year}/{seq:04}", 2026, 7),
            "DEV/2026/0007"
        );
        assert_eq!(
            format_document_number("FAC/{year}/{seq:04}", 2026, 123),
            "FAC/2026/0123"
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("2026-01-06").is_ok());
        assert!(parse_date("06/01/2026").is_err());
        assert!(parse_date("").is_err());
    }
}
