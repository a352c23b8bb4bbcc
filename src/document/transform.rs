use chrono::NaiveDate;

use super::line::DocumentLine;
use super::terms::PaymentTerm;
use crate::error::{FacturierError, Result};

/// Invoice draft produced from a quote, before a number is assigned.
/// The lines are independent copies; editing the draft never touches
/// the originating quote.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub client: String,
    pub quote_number: String,
    pub lines: Vec<DocumentLine>,
    pub term: PaymentTerm,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Build an invoice draft from a quote's data. A quote spawns at most one
/// invoice: if it already carries one, the derivation is refused.
pub fn invoice_draft_from_quote(
    quote_number: &str,
    client: &str,
    lines: &[DocumentLine],
    term: PaymentTerm,
    existing_invoice: Option<&str>,
    issue_date: NaiveDate,
) -> Result<InvoiceDraft> {
    if let Some(invoice) = existing_invoice {
        return Err(FacturierError::AlreadyInvoiced {
            quote: quote_number.to_string(),
            invoice: invoice.to_string(),
        });
    }

    Ok(InvoiceDraft {
        client: client.to_string(),
        quote_number: quote_number.to_string(),
        lines: lines.to_vec(),
        term,
        issue_date,
        due_date: term.due_date(issue_date),
    })
}
