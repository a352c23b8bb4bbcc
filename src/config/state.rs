use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::document::{
    compute_totals, invoice_status, quote_status, DocumentLine, InvoiceStatus, PaymentTerm,
    QuoteStatus, Totals,
};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub quote_counter: Counter,
    #[serde(default)]
    pub invoice_counter: Counter,
    #[serde(default)]
    pub quotes: Vec<QuoteRecord>,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Counter {
    pub last_number: u32,
    pub last_year: u32,
}

impl Default for Counter {
    fn default() -> Self {
        Self {
            last_number: 0,
            last_year: chrono::Utc::now().year() as u32,
        }
    }
}

impl Counter {
    /// Next sequence number for the given year; the sequence restarts at 1
    /// when the year advances.
    pub fn next_for_year(&self, year: u32) -> u32 {
        if self.last_year == year {
            self.last_number + 1
        } else {
            1
        }
    }

    pub fn advance(&mut self, year: u32, seq: u32) {
        self.last_year = year;
        self.last_number = seq;
    }
}

/// A stored devis. Totals are never persisted; they are recomputed from
/// the lines at every read.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QuoteRecord {
    pub number: String,
    pub client: String,
    /// Creation date.
    pub date: NaiveDate,
    #[serde(default)]
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub term: PaymentTerm,
    #[serde(default)]
    pub po_reference: Option<String>,
    #[serde(default)]
    pub invoiced: bool,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
}

impl QuoteRecord {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lines)
    }

    pub fn status(&self, today: NaiveDate) -> QuoteStatus {
        quote_status(self.invoiced, self.event_date, today)
    }
}

/// A stored facture, possibly derived from a quote (`quote_number` is a
/// display reference only; the lines are an independent copy).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvoiceRecord {
    pub number: String,
    pub client: String,
    /// Issue date.
    pub date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub term: PaymentTerm,
    #[serde(default)]
    pub quote_number: Option<String>,
    #[serde(default)]
    pub paid: bool,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
}

impl InvoiceRecord {
    pub fn totals(&self) -> Totals {
        compute_totals(&self.lines)
    }

    pub fn status(&self, today: NaiveDate) -> InvoiceStatus {
        invoice_status(self.paid, self.due_date, today)
    }
}
