use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

use super::{file_stem, lines_data, parse_lines, resolve_position};
use crate::config::{self, Client, InvoiceRecord, QuoteRecord};
use crate::document::{
    format_document_number, invoice_draft_from_quote, validate_document, PaymentTerm,
};
use crate::error::{FacturierError, Result};
use crate::export::format_date_fr;
use crate::pdf::{self, DocumentData};
use crate::theme;

pub struct QuoteInput {
    pub client: String,
    pub lines: Vec<String>,
    pub event_date: Option<NaiveDate>,
    pub term: Option<PaymentTerm>,
    pub po_reference: Option<String>,
}

#[derive(Default)]
pub struct QuoteEdit {
    pub lines: Vec<String>,
    pub event_date: Option<NaiveDate>,
    pub term: Option<PaymentTerm>,
    pub po_reference: Option<String>,
}

/// Create a new quote. Validation runs before any state is touched.
pub fn create_quote(
    cfg_dir: &Path,
    input: QuoteInput,
    today: NaiveDate,
) -> Result<(QuoteRecord, Client)> {
    let config = config::load_config(cfg_dir)?;
    let clients = config::load_clients(cfg_dir)?;
    let mut state = config::load_state(cfg_dir)?;

    let lines = parse_lines(&input.lines, config.documents.default_vat)?;
    validate_document(&input.client, input.event_date, "event", &lines)?;

    let client = clients
        .get(&input.client)
        .cloned()
        .ok_or_else(|| FacturierError::ClientNotFound(input.client.clone()))?;

    let year = today.year() as u32;
    let seq = state.quote_counter.next_for_year(year);
    let number = format_document_number(&config.documents.quote_number_format, year, seq);

    let record = QuoteRecord {
        number,
        client: input.client,
        date: today,
        event_date: input.event_date,
        term: input.term.unwrap_or(config.documents.default_term),
        po_reference: input.po_reference,
        lines,
        invoiced: false,
        invoice_number: None,
    };

    state.quote_counter.advance(year, seq);
    state.quotes.push(record.clone());
    config::save_state(cfg_dir, &state)?;

    Ok((record, client))
}

/// Update a stored quote. Only the provided fields change; the result is
/// re-validated before being written back.
pub fn edit_quote(cfg_dir: &Path, reference: &str, edit: QuoteEdit) -> Result<QuoteRecord> {
    let config = config::load_config(cfg_dir)?;
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.quotes, reference, |q| &q.number)?
        .ok_or_else(|| FacturierError::QuoteNotFound(reference.to_string()))?;

    let mut record = state.quotes[pos].clone();
    if !edit.lines.is_empty() {
        record.lines = parse_lines(&edit.lines, config.documents.default_vat)?;
    }
    if let Some(date) = edit.event_date {
        record.event_date = Some(date);
    }
    if let Some(term) = edit.term {
        record.term = term;
    }
    if let Some(po) = edit.po_reference {
        record.po_reference = Some(po);
    }

    validate_document(&record.client, record.event_date, "event", &record.lines)?;

    state.quotes[pos] = record.clone();
    config::save_state(cfg_dir, &state)?;
    Ok(record)
}

/// Delete a quote and return its number.
pub fn delete_quote(cfg_dir: &Path, reference: &str) -> Result<String> {
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.quotes, reference, |q| &q.number)?
        .ok_or_else(|| FacturierError::QuoteNotFound(reference.to_string()))?;

    let removed = state.quotes.remove(pos);
    config::save_state(cfg_dir, &state)?;
    Ok(removed.number)
}

/// Derive an invoice from a quote: lines and term copied by value, due
/// date computed from the term, and the quote frozen against a second
/// derivation.
pub fn invoice_from_quote(
    cfg_dir: &Path,
    reference: &str,
    issue_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(InvoiceRecord, QuoteRecord)> {
    let config = config::load_config(cfg_dir)?;
    let mut state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.quotes, reference, |q| &q.number)?
        .ok_or_else(|| FacturierError::QuoteNotFound(reference.to_string()))?;

    let quote = state.quotes[pos].clone();
    let issue = issue_date.unwrap_or(today);
    let existing = if quote.invoiced {
        Some(quote.invoice_number.clone().unwrap_or_default())
    } else {
        None
    };

    let draft = invoice_draft_from_quote(
        &quote.number,
        &quote.client,
        &quote.lines,
        quote.term,
        existing.as_deref(),
        issue,
    )?;

    let year = issue.year() as u32;
    let seq = state.invoice_counter.next_for_year(year);
    let number = format_document_number(&config.documents.invoice_number_format, year, seq);

    let record = InvoiceRecord {
        number: number.clone(),
        client: draft.client,
        date: draft.issue_date,
        due_date: Some(draft.due_date),
        term: draft.term,
        quote_number: Some(draft.quote_number),
        lines: draft.lines,
        paid: false,
    };

    state.invoice_counter.advance(year, seq);
    state.invoices.push(record.clone());
    state.quotes[pos].invoiced = true;
    state.quotes[pos].invoice_number = Some(number);
    let frozen = state.quotes[pos].clone();
    config::save_state(cfg_dir, &state)?;

    Ok((record, frozen))
}

/// Render a quote to PDF; `delivery_note` renders the bon de livraison
/// variant (same lines, no amounts).
pub fn quote_pdf(cfg_dir: &Path, reference: &str, delivery_note: bool) -> Result<PathBuf> {
    let config = config::load_config(cfg_dir)?;
    let clients = config::load_clients(cfg_dir)?;
    let state = config::load_state(cfg_dir)?;

    let pos = resolve_position(&state.quotes, reference, |q| &q.number)?
        .ok_or_else(|| FacturierError::QuoteNotFound(reference.to_string()))?;
    let quote = &state.quotes[pos];

    let client = clients
        .get(&quote.client)
        .cloned()
        .ok_or_else(|| FacturierError::ClientNotFound(quote.client.clone()))?;

    let totals = quote.totals();
    let data = DocumentData {
        kind: if delivery_note {
            "BON DE LIVRAISON"
        } else {
            "DEVIS"
        }
        .to_string(),
        number: quote.number.clone(),
        date: format_date_fr(quote.date),
        secondary_label: "Date événement".to_string(),
        secondary_date: quote.event_date.map(format_date_fr).unwrap_or_default(),
        company: config.company.clone(),
        client,
        lines: lines_data(&quote.lines),
        subtotal: totals.subtotal,
        vat: totals.vat,
        total: totals.total,
        currency: config.documents.currency.clone(),
        term: quote.term.to_string(),
        reference_label: "Référence BC".to_string(),
        reference: quote.po_reference.clone(),
        show_prices: !delivery_note,
        accent: theme::accent_hex(&config.company.accent_color),
    };

    let output_dir = config::resolve_output_dir(&config.export.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let stem = file_stem(&quote.number);
    let filename = if delivery_note {
        format!("BL-{stem}.pdf")
    } else {
        format!("{stem}.pdf")
    };
    let pdf_path = output_dir.join(filename);

    pdf::generate_document_pdf(&data, &pdf_path)?;
    Ok(pdf_path)
}
