use std::fmt;

use chrono::NaiveDate;

/// Display status of a quote, derived from its invoiced flag and event date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStatus {
    Pending,
    ToInvoice,
    Invoiced,
}

impl QuoteStatus {
    pub fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "EN ATTENTE",
            QuoteStatus::ToInvoice => "À FACTURER",
            QuoteStatus::Invoiced => "FACTURÉ",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display status of an invoice, derived from its paid flag and due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceStatus {
    Unpaid,
    Overdue,
    Paid,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "IMPAYÉE",
            InvoiceStatus::Overdue => "EN RETARD",
            InvoiceStatus::Paid => "PAYÉE",
        }
    }

    /// Parse a CLI filter value (as used by `report --status`).
    pub fn from_filter(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(InvoiceStatus::Unpaid),
            "overdue" => Some(InvoiceStatus::Overdue),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derive a quote's status. Comparison is day-granular; a missing event
/// date never makes the quote look stale.
pub fn quote_status(invoiced: bool, event_date: Option<NaiveDate>, today: NaiveDate) -> QuoteStatus {
    if invoiced {
        return QuoteStatus::Invoiced;
    }
    match event_date {
        Some(event) if event < today => QuoteStatus::ToInvoice,
        _ => QuoteStatus::Pending,
    }
}

/// Derive an invoice's status. Paid wins over everything; a missing due
/// date is reported as unpaid, never overdue.
pub fn invoice_status(paid: bool, due_date: Option<NaiveDate>, today: NaiveDate) -> InvoiceStatus {
    if paid {
        return InvoiceStatus::Paid;
    }
    match due_date {
        Some(due) if due < today => InvoiceStatus::Overdue,
        _ => InvoiceStatus::Unpaid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn quote_past_event_is_to_invoice_unless_invoiced() {
        let today = d(2026, 3, 10);
        assert_eq!(
            quote_status(false, Some(d(2026, 3, 1)), today),
            QuoteStatus::ToInvoice
        );
        assert_eq!(
            quote_status(true, Some(d(2026, 3, 1)), today),
            QuoteStatus::Invoiced
        );
    }

    #[test]
    fn quote_on_or_after_event_day_is_pending() {
        let today = d(2026, 3, 10);
        assert_eq!(
            quote_status(false, Some(d(2026, 3, 10)), today),
            QuoteStatus::Pending
        );
        assert_eq!(
            quote_status(false, Some(d(2026, 4, 1)), today),
            QuoteStatus::Pending
        );
    }

    #[test]
    fn quote_without_event_date_is_pending() {
        assert_eq!(
            quote_status(false, None, d(2026, 3, 10)),
            QuoteStatus::Pending
        );
    }

    #[test]
    fn paid_invoice_stays_paid_past_due_date() {
        let today = d(2026, 3, 10);
        assert_eq!(
            invoice_status(true, Some(d(2026, 1, 1)), today),
            InvoiceStatus::Paid
        );
    }

    #[test]
    fn unpaid_invoice_goes_overdue_only_after_due_day() {
        let today = d(2026, 3, 10);
        assert_eq!(
            invoice_status(false, Some(d(2026, 3, 9)), today),
            InvoiceStatus::Overdue
        );
        assert_eq!(
            invoice_status(false, Some(d(2026, 3, 10)), today),
            InvoiceStatus::Unpaid
        );
    }

    #[test]
    fn missing_due_date_is_unpaid_not_overdue() {
        assert_eq!(
            invoice_status(false, None, d(2026, 3, 10)),
            InvoiceStatus::Unpaid
        );
    }
}
