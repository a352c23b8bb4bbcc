use serde::Serialize;

use crate::config::{Client, Company};

/// A line as rendered on a PDF document.
#[derive(Debug, Serialize)]
pub struct LineData {
    pub description: String,
    pub staff_count: u32,
    pub days: u32,
    pub unit_price: f64,
    pub vat_rate: f64,
    pub total_ht: f64,
}

/// Complete data for rendering a devis, facture or bon de livraison.
#[derive(Debug, Serialize)]
pub struct DocumentData {
    /// "DEVIS", "FACTURE" or "BON DE LIVRAISON".
    pub kind: String,
    pub number: String,
    pub date: String,
    /// "Date événement" for quotes, "Échéance" for invoices.
    pub secondary_label: String,
    /// Formatted date, empty when absent.
    pub secondary_date: String,
    pub company: Company,
    pub client: Client,
    pub lines: Vec<LineData>,
    pub subtotal: f64,
    pub vat: f64,
    pub total: f64,
    pub currency: String,
    pub term: String,
    /// PO reference on quotes, originating quote number on invoices.
    pub reference_label: String,
    pub reference: Option<String>,
    /// Delivery notes list the staffing without amounts.
    pub show_prices: bool,
    /// Validated "#rrggbb" brand color.
    pub accent: String,
}

/// A single row in the client account report table.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub number: String,
    pub date: String,
    pub due_date: String,
    pub total: f64,
    pub status: String,
}

/// Complete data for rendering the client account report PDF.
#[derive(Debug, Serialize)]
pub struct ReportData {
    pub company: Company,
    pub client: Client,
    pub client_id: String,
    pub rows: Vec<ReportRow>,
    pub total: f64,
    pub paid: f64,
    pub outstanding: f64,
    pub currency: String,
    pub generated_date: String,
    pub filter_from: Option<String>,
    pub filter_to: Option<String>,
    pub filter_status: Option<String>,
    pub accent: String,
}
