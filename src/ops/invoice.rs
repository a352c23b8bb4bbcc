use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::{file_stem, lines_data, parse_lines, resolve_position};
use crate::config::{self, Client, InvoiceRecord};
use crate::document::{
    format_document_number, validate_document, InvoiceStatus, PaymentTerm,
};
use crate::error::{FacturierError, Result};
use crate::export::format_date_fr;
use crate::pdf::{self, DocumentData, ReportData, ReportRow};
use crate::theme;

pub struct InvoiceInput {
    pub client: String,
    pub lines: Vec<String>,
    pub date: Option<NaiveDate>,
    pub term: Option<PaymentTerm>,
}

#[derive(Default)]
pub struct InvoiceEdit {
    pub lines: Vec<String>,
    pub date: Option<NaiveDate>,
    pub term: Option<PaymentTerm>,
}

pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

pub struct ReportSummary {
    pub path: PathBuf,
    pub count: usize,
    pub total: f64,
    pub paid: f64,
    pub outstanding: f64,
}

/// Create an invoice directly (not derived from a quote). The issue date
/// defaults to today and the due date is derived from the payment term.
pub fn create_invoice(
    cfg_dir: &Path,
    input: InvoiceInput,
    today: NaiveDate,
) -> Result<(InvoiceRecord, Client)> {
    let config = config::load_config(cfg_dir)?;
    let clients = config::load_clients(cfg_dir)?;
    let mut state = config::load_state(cfg_dir)?;

    let lines = parse_lines(&input.lines, config.documents.default_vat)?;
    let issue = input.date.unwrap_or(today);
    validate_document(&input.client, Some(issue), "issue", &lines)?;

    let client = clients
        .get(&input.client)
        .cloned()
        .ok_or_else(|| FacturierError::ClientNotFound(input.client.clone()))?;

    let term = input.term.unwrap_or(config.documents.default_term);
    let year = issue.year() as u32;
    let seq = state.invoice_counter.next_for_year(year);
    let number = format_document_number(&config.documents.invoice_number_format, year, seq);

    let record = InvoiceRecord {
        number,
        client: input.client,
        date: issue,
        due_date: Some(term.due_date(issue)),
        term,
        quote_number: None,
        lines,
        paid: false,
    };

    state.invoice_counter.advance(year, seq);
    state.invoices.push(record.clone());
    config::save_state(cfg_dir, &state)?;

    Ok((record, client))
}

/// Update a stored invoice. The stored due date is authoritative: it is
/// only recomputed when the issue date or the term changes.
pub fn edit_invoice(cfg_dir: &Path, reference: &str, edit: InvoiceEdit) -> Result<InvoiceRecord> {
    let config = config::load_config(cfg_dir)?;
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.invoices, reference, |i| &i.number)?
        .ok_or_else(|| FacturierError::InvoiceNotFound(reference.to_string()))?;

    let mut record = state.invoices[pos].clone();
    if !edit.lines.is_empty() {
        record.lines = parse_lines(&edit.lines, config.documents.default_vat)?;
    }
    if let Some(date) = edit.date {
        record.date = date;
    }
    if let Some(term) = edit.term {
        record.term = term;
    }
    if edit.date.is_some() || edit.term.is_some() {
        record.due_date = Some(record.term.due_date(record.date));
    }

    validate_document(&record.client, Some(record.date), "issue", &record.lines)?;

    state.invoices[pos] = record.clone();
    config::save_state(cfg_dir, &state)?;
    Ok(record)
}

/// Mark an invoice paid. Paid is terminal: there is no unmark operation.
pub fn mark_paid(cfg_dir: &Path, reference: &str) -> Result<String> {
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.invoices, reference, |i| &i.number)?
        .ok_or_else(|| FacturierError::InvoiceNotFound(reference.to_string()))?;

    if state.invoices[pos].paid {
        return Err(FacturierError::AlreadyPaid(
            state.invoices[pos].number.clone(),
        ));
    }

    state.invoices[pos].paid = true;
    let number = state.invoices[pos].number.clone();
    config::save_state(cfg_dir, &state)?;
    Ok(number)
}

/// Delete an invoice and return its number.
pub fn delete_invoice(cfg_dir: &Path, reference: &str) -> Result<String> {
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.invoices, reference, |i| &i.number)?
        .ok_or_else(|| FacturierError::InvoiceNotFound(reference.to_string()))?;

    let removed = state.invoices.remove(pos);
    config::save_state(cfg_dir, &state)?;
    Ok(removed.number)
}

/// Render an invoice to PDF.
pub fn invoice_pdf(cfg_dir: &Path, reference: &str) -> Result<PathBuf> {
    let config = config::load_config(cfg_dir)?;
    let clients = config::load_clients(cfg_dir)?;
    let state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.invoices, reference, |i| &i.number)?
        .ok_or_else(|| FacturierError::InvoiceNotFound(reference.to_string()))?;
    let invoice = &state.invoices[pos];

    let client = clients
        .get(&invoice.client)
        .cloned()
        .ok_or_else(|| FacturierError::ClientNotFound(invoice.client.clone()))?;

    let totals = invoice.totals();
    let data = DocumentData {
        kind: "FACTURE".to_string(),
        number: invoice.number.clone(),
        date: format_date_fr(invoice.date),
        secondary_label: "Échéance".to_string(),
        secondary_date: invoice.due_date.map(format_date_fr).unwrap_or_default(),
        company: config.company.clone(),
        client,
        lines: lines_data(&invoice.lines),
        subtotal: totals.subtotal,
        vat: totals.vat,
        total: totals.total,
        currency: config.documents.currency.clone(),
        term: invoice.term.to_string(),
        reference_label: "Devis d'origine".to_string(),
        reference: invoice.quote_number.clone(),
        show_prices: true,
        accent: theme::accent_hex(&config.company.accent_color),
    };

    let output_dir = config::resolve_output_dir(&config.export.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let pdf_path = output_dir.join(format!("{}.pdf", file_stem(&invoice.number)));
    pdf::generate_document_pdf(&data, &pdf_path)?;
    Ok(pdf_path)
}

/// Generate the PDF account report for one client: date- and
/// status-filtered invoices with paid/outstanding totals.
pub fn client_report(
    cfg_dir: &Path,
    client_id: &str,
    filter: &ReportFilter,
    today: NaiveDate,
) -> Result<Option<ReportSummary>> {
    let config = config::load_config(cfg_dir)?;
    let clients = config::load_clients(cfg_dir)?;
    let state = config::load_state(cfg_dir)?;

    let client = clients
        .get(client_id)
        .cloned()
        .ok_or_else(|| FacturierError::ClientNotFound(client_id.to_string()))?;

    let filtered: Vec<&InvoiceRecord> = state
        .invoices
        .iter()
        .filter(|i| i.client == client_id)
        .filter(|i| filter.from.map_or(true, |d| i.date >= d))
        .filter(|i| filter.to.map_or(true, |d| i.date <= d))
        .filter(|i| filter.status.map_or(true, |s| i.status(today) == s))
        .collect();

    if filtered.is_empty() {
        return Ok(None);
    }

    let rows: Vec<ReportRow> = filtered
        .iter()
        .map(|i| ReportRow {
            number: i.number.clone(),
            date: format_date_fr(i.date),
            due_date: i.due_date.map(format_date_fr).unwrap_or_default(),
            total: i.totals().total,
            status: i.status(today).label().to_string(),
        })
        .collect();

    let total: f64 = filtered.iter().map(|i| i.totals().total).sum();
    let paid: f64 = filtered
        .iter()
        .filter(|i| i.paid)
        .map(|i| i.totals().total)
        .sum();
    let outstanding = total - paid;

    let report = ReportData {
        company: config.company.clone(),
        client,
        client_id: client_id.to_string(),
        rows,
        total,
        paid,
        outstanding,
        currency: config.documents.currency.clone(),
        generated_date: format_date_fr(today),
        filter_from: filter.from.map(format_date_fr),
        filter_to: filter.to.map(format_date_fr),
        filter_status: filter.status.map(|s| s.label().to_string()),
        accent: theme::accent_hex(&config.company.accent_color),
    };

    let output_dir = config::resolve_output_dir(&config.export.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let pdf_path = output_dir.join(format!(
        "RELEVE-{}-{}.pdf",
        client_id,
        today.format("%Y-%m-%d")
    ));
    pdf::generate_report_pdf(&report, &pdf_path)?;

    Ok(Some(ReportSummary {
        path: pdf_path,
        count: filtered.len(),
        total,
        paid,
        outstanding,
    }))
}
