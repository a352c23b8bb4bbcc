mod config;
mod document;
mod error;
mod export;
mod ops;
mod pdf;
mod theme;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::config::{
    config_dir, load_clients, load_config, load_state, resolve_output_dir, Client,
    CLIENTS_TEMPLATE, CONFIG_TEMPLATE,
};
use crate::document::{format_document_number, parse_date, InvoiceStatus, PaymentTerm};
use crate::error::{FacturierError, Result};
use crate::export::{
    csv as csv_export, format_date_fr, format_grouped_int, format_money, format_whole_money,
    html as html_export,
};
use crate::ops::invoice::{self as invoice_ops, InvoiceEdit, InvoiceInput, ReportFilter};
use crate::ops::quote::{self as quote_ops, QuoteEdit, QuoteInput};

#[derive(Parser)]
#[command(name = "facturier")]
#[command(version, about = "CLI business management for an events staffing agency", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.facturier or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// List configured clients
    Clients,

    /// Show configuration status and next document numbers
    Status,

    /// Manage quotes (devis)
    #[command(subcommand)]
    Quote(QuoteCommands),

    /// Manage invoices (factures)
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Export clients, quotes or invoices to CSV or HTML
    Export {
        /// What to export
        #[arg(value_enum)]
        entity: ExportEntity,

        /// Output format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Custom output file path (default: output_dir/<entity>-<date>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-year accounting summary
    Summary {
        /// Year to summarize (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Generate a PDF account report (relevé) for a client
    Report {
        /// Client identifier from clients.toml
        #[arg(short, long)]
        client: String,

        /// Filter invoices from this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Filter invoices to this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Filter by derived status (paid, unpaid, overdue)
        #[arg(long)]
        status: Option<String>,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Create a new quote
    New {
        /// Client identifier from clients.toml
        #[arg(short, long)]
        client: String,

        /// Lines in format "description:staff:days:price[:tva]" (can be repeated)
        #[arg(short, long, value_name = "DESC:STAFF:DAYS:PRICE[:TVA]")]
        line: Vec<String>,

        /// Event date (YYYY-MM-DD)
        #[arg(long)]
        event_date: Option<String>,

        /// Payment term (e.g. "30 jours fin de mois")
        #[arg(long)]
        term: Option<String>,

        /// Purchase order reference (bon de commande)
        #[arg(long)]
        po: Option<String>,
    },

    /// List quotes
    List {
        /// Number of quotes to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Edit an existing quote
    Edit {
        /// Quote number or index from 'list' (e.g., 1 or DEV/2026/0001)
        quote: String,

        /// New lines (replaces existing lines when given)
        #[arg(short, long, value_name = "DESC:STAFF:DAYS:PRICE[:TVA]")]
        line: Vec<String>,

        /// New event date (YYYY-MM-DD)
        #[arg(long)]
        event_date: Option<String>,

        /// New payment term
        #[arg(long)]
        term: Option<String>,

        /// New purchase order reference
        #[arg(long)]
        po: Option<String>,
    },

    /// Delete a quote
    Delete {
        /// Quote number or index from 'list'
        quote: String,
    },

    /// Create an invoice from a quote
    Invoice {
        /// Quote number or index from 'list'
        quote: String,

        /// Issue date (default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate the quote PDF
    Pdf {
        /// Quote number or index from 'list'
        quote: String,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Generate a delivery note (bon de livraison) PDF
    DeliveryNote {
        /// Quote number or index from 'list'
        quote: String,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Subcommand)]
enum InvoiceCommands {
    /// Create a new invoice directly (without a quote)
    New {
        /// Client identifier from clients.toml
        #[arg(short, long)]
        client: String,

        /// Lines in format "description:staff:days:price[:tva]" (can be repeated)
        #[arg(short, long, value_name = "DESC:STAFF:DAYS:PRICE[:TVA]")]
        line: Vec<String>,

        /// Issue date (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Payment term (e.g. "30 jours fin de mois")
        #[arg(long)]
        term: Option<String>,
    },

    /// List invoices
    List {
        /// Number of invoices to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Edit an existing invoice
    Edit {
        /// Invoice number or index from 'list' (e.g., 1 or FAC/2026/0001)
        invoice: String,

        /// New lines (replaces existing lines when given)
        #[arg(short, long, value_name = "DESC:STAFF:DAYS:PRICE[:TVA]")]
        line: Vec<String>,

        /// New issue date (YYYY-MM-DD); recomputes the due date
        #[arg(long)]
        date: Option<String>,

        /// New payment term; recomputes the due date
        #[arg(long)]
        term: Option<String>,
    },

    /// Mark an invoice as paid (terminal: there is no unmark)
    MarkPaid {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Delete an invoice
    Delete {
        /// Invoice number or index from 'list'
        invoice: String,
    },

    /// Generate the invoice PDF
    Pdf {
        /// Invoice number or index from 'list'
        invoice: String,

        /// Open generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportEntity {
    Clients,
    Quotes,
    Invoices,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Csv,
    Html,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Clients => cmd_clients(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Quote(cmd) => match cmd {
            QuoteCommands::New {
                client,
                line,
                event_date,
                term,
                po,
            } => cmd_quote_new(&cfg_dir, client, line, event_date, term, po),
            QuoteCommands::List { limit } => cmd_quote_list(&cfg_dir, limit),
            QuoteCommands::Edit {
                quote,
                line,
                event_date,
                term,
                po,
            } => cmd_quote_edit(&cfg_dir, &quote, line, event_date, term, po),
            QuoteCommands::Delete { quote } => cmd_quote_delete(&cfg_dir, &quote),
            QuoteCommands::Invoice { quote, date } => cmd_quote_invoice(&cfg_dir, &quote, date),
            QuoteCommands::Pdf { quote, open } => cmd_quote_pdf(&cfg_dir, &quote, false, open),
            QuoteCommands::DeliveryNote { quote, open } => {
                cmd_quote_pdf(&cfg_dir, &quote, true, open)
            }
        },
        Commands::Invoice(cmd) => match cmd {
            InvoiceCommands::New {
                client,
                line,
                date,
                term,
            } => cmd_invoice_new(&cfg_dir, client, line, date, term),
            InvoiceCommands::List { limit } => cmd_invoice_list(&cfg_dir, limit),
            InvoiceCommands::Edit {
                invoice,
                line,
                date,
                term,
            } => cmd_invoice_edit(&cfg_dir, &invoice, line, date, term),
            InvoiceCommands::MarkPaid { invoice } => cmd_invoice_mark_paid(&cfg_dir, &invoice),
            InvoiceCommands::Delete { invoice } => cmd_invoice_delete(&cfg_dir, &invoice),
            InvoiceCommands::Pdf { invoice, open } => cmd_invoice_pdf(&cfg_dir, &invoice, open),
        },
        Commands::Export {
            entity,
            format,
            output,
        } => cmd_export(&cfg_dir, entity, format, output),
        Commands::Summary { year } => cmd_summary(&cfg_dir, year),
        Commands::Report {
            client,
            from,
            to,
            status,
            open,
        } => cmd_report(&cfg_dir, &client, from, to, status, open),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &PathBuf) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(FacturierError::AlreadyInitialized(cfg_dir.clone()));
    }

    // Create directories
    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    // Write template files
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("clients.toml"), CLIENTS_TEMPLATE)?;

    println!("Initialized facturier config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add your clients:           $EDITOR {}/clients.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then create your first quote:");
    println!("  facturier quote new --client <client-id> --event-date <YYYY-MM-DD> \\");
    println!("      --line \"<description>:<staff>:<days>:<price>[:<tva>]\"");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SOCIÉTÉ")]
    company: String,
    #[tabled(rename = "VILLE")]
    city: String,
    #[tabled(rename = "TÉLÉPHONE")]
    phone: String,
    #[tabled(rename = "EMAIL")]
    email: String,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NUMÉRO")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "ÉVÉNEMENT")]
    event: String,
    #[tabled(rename = "TOTAL TTC")]
    total: String,
    #[tabled(rename = "STATUT")]
    status: String,
    #[tabled(rename = "CLIENT")]
    client: String,
}

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NUMÉRO")]
    number: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "ÉCHÉANCE")]
    due: String,
    #[tabled(rename = "TOTAL TTC")]
    total: String,
    #[tabled(rename = "STATUT")]
    status: String,
    #[tabled(rename = "CLIENT")]
    client: String,
}

fn add_financial_footer(table: &str, total: &str, paid: &str, outstanding: &str) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let top = lines[0];
    let Some(inner) = top.strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() < 7 {
        return table.to_string();
    }

    // Merge columns #, NUMÉRO, DATE, ÉCHÉANCE into one label cell; keep
    // TOTAL TTC; drop STATUT and CLIENT
    let left_width = widths[0] + widths[1] + widths[2] + widths[3] + 3;
    let total_width = widths[4];
    let status_width = widths[5];
    let client_width = widths[6];

    let rows = [
        ("TOTAL TTC", total),
        ("(-) PAYÉ", paid),
        ("(=) SOLDE", outstanding),
    ];

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    // First separator: merge left 4 columns, keep TOTAL TTC, close off STATUT+CLIENT
    out.push_str(&format!(
        "├{}┴{}┴{}┴{}┼{}┼{}┴{}╯\n",
        "─".repeat(widths[0]),
        "─".repeat(widths[1]),
        "─".repeat(widths[2]),
        "─".repeat(widths[3]),
        "─".repeat(total_width),
        "─".repeat(status_width),
        "─".repeat(client_width),
    ));

    // Summary rows with separators between them
    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>total$} │\n",
            label,
            value,
            left = left_width - 2,
            total = total_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(left_width),
                "─".repeat(total_width)
            ));
        }
    }

    // Bottom border
    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(total_width)
    ));

    out
}

/// List configured clients
fn cmd_clients(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let clients = load_clients(cfg_dir)?;

    if clients.is_empty() {
        println!("No clients configured.");
        println!("Add clients to: {}/clients.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = clients.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<ClientRow> = sorted
        .iter()
        .map(|(id, client)| ClientRow {
            id: id.to_string(),
            company: client.company_name.clone(),
            city: client.city.clone(),
            phone: client.phone.clone(),
            email: client.email.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show configuration status and next document numbers
fn cmd_status(cfg_dir: &PathBuf) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let clients = load_clients(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let current_year = chrono::Utc::now().year() as u32;
    let next_quote = format_document_number(
        &config.documents.quote_number_format,
        current_year,
        state.quote_counter.next_for_year(current_year),
    );
    let next_invoice = format_document_number(
        &config.documents.invoice_number_format,
        current_year,
        state.invoice_counter.next_for_year(current_year),
    );

    println!("Facturier Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.name);
    println!("Clients:          {}", clients.len());
    println!("Quotes:           {}", state.quotes.len());
    println!("Invoices:         {}", state.invoices.len());
    println!("Next quote:       {}", next_quote);
    println!("Next invoice:     {}", next_invoice);

    let currency = &config.documents.currency;
    if !state.quotes.is_empty() {
        println!();
        println!("Recent quotes:");
        for quote in state.quotes.iter().rev().take(3) {
            println!(
                "  {} - {} - {}",
                quote.number,
                quote.client,
                format_money(quote.totals().total, currency)
            );
        }
    }
    if !state.invoices.is_empty() {
        println!();
        println!("Recent invoices:");
        for invoice in state.invoices.iter().rev().take(3) {
            println!(
                "  {} - {} - {}",
                invoice.number,
                invoice.client,
                format_money(invoice.totals().total, currency)
            );
        }
    }

    Ok(())
}

fn parse_term(term: Option<String>) -> Result<Option<PaymentTerm>> {
    term.map(|s| s.parse()).transpose()
}

fn parse_optional_date(date: Option<String>) -> Result<Option<NaiveDate>> {
    date.map(|s| parse_date(&s)).transpose()
}

/// Create a new quote
fn cmd_quote_new(
    cfg_dir: &PathBuf,
    client: String,
    lines: Vec<String>,
    event_date: Option<String>,
    term: Option<String>,
    po: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let today = chrono::Local::now().date_naive();
    let input = QuoteInput {
        client,
        lines,
        event_date: parse_optional_date(event_date)?,
        term: parse_term(term)?,
        po_reference: po,
    };

    let (quote, client) = quote_ops::create_quote(cfg_dir, input, today)?;
    let totals = quote.totals();
    let currency = &config.documents.currency;

    println!("Created {}", quote.number);
    println!("  Client:    {}", client.company_name);
    if let Some(event) = quote.event_date {
        println!("  Event:     {}", format_date_fr(event));
    }
    println!("  Total TTC: {}", format_money(totals.total, currency));

    Ok(())
}

/// List quotes
fn cmd_quote_list(cfg_dir: &PathBuf, limit: Option<usize>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if state.quotes.is_empty() {
        println!("No quotes created yet.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let quotes: Vec<_> = state.quotes.iter().rev().enumerate().collect();
    let quotes = match limit {
        Some(n) => &quotes[..n.min(quotes.len())],
        None => &quotes[..],
    };

    let rows: Vec<QuoteRow> = quotes
        .iter()
        .map(|(idx, quote)| QuoteRow {
            index: idx + 1,
            number: quote.number.clone(),
            date: format_date_fr(quote.date),
            event: quote.event_date.map(format_date_fr).unwrap_or_default(),
            total: format_whole_money(quote.totals().total, &config.documents.currency),
            status: quote.status(today).to_string(),
            client: quote.client.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!();
    println!("Total: {} quotes", state.quotes.len());
    println!("Use index number with edit/delete/invoice/pdf (e.g., 'facturier quote pdf 1')");

    Ok(())
}

/// Edit an existing quote
fn cmd_quote_edit(
    cfg_dir: &PathBuf,
    reference: &str,
    lines: Vec<String>,
    event_date: Option<String>,
    term: Option<String>,
    po: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let edit = QuoteEdit {
        lines,
        event_date: parse_optional_date(event_date)?,
        term: parse_term(term)?,
        po_reference: po,
    };

    let quote = quote_ops::edit_quote(cfg_dir, reference, edit)?;
    println!("Updated {}", quote.number);
    println!(
        "  Total TTC: {}",
        format_money(quote.totals().total, &config.documents.currency)
    );

    Ok(())
}

/// Delete a quote
fn cmd_quote_delete(cfg_dir: &PathBuf, reference: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let number = quote_ops::delete_quote(cfg_dir, reference)?;
    println!("Deleted {}", number);
    Ok(())
}

/// Create an invoice from a quote
fn cmd_quote_invoice(cfg_dir: &PathBuf, reference: &str, date: Option<String>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let today = chrono::Local::now().date_naive();
    let issue_date = parse_optional_date(date)?;

    let (invoice, quote) = quote_ops::invoice_from_quote(cfg_dir, reference, issue_date, today)?;
    let totals = invoice.totals();

    println!("Created {} from {}", invoice.number, quote.number);
    println!("  Issued:    {}", format_date_fr(invoice.date));
    if let Some(due) = invoice.due_date {
        println!("  Due:       {} ({})", format_date_fr(due), invoice.term);
    }
    println!(
        "  Total TTC: {}",
        format_money(totals.total, &config.documents.currency)
    );

    Ok(())
}

/// Generate a quote or delivery note PDF
fn cmd_quote_pdf(cfg_dir: &PathBuf, reference: &str, delivery_note: bool, open: bool) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let pdf_path = quote_ops::quote_pdf(cfg_dir, reference, delivery_note)?;
    if open {
        open_path(&pdf_path)?;
    }

    println!("Saved: {}", pdf_path.display());
    Ok(())
}

/// Create a new invoice directly
fn cmd_invoice_new(
    cfg_dir: &PathBuf,
    client: String,
    lines: Vec<String>,
    date: Option<String>,
    term: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let today = chrono::Local::now().date_naive();
    let input = InvoiceInput {
        client,
        lines,
        date: parse_optional_date(date)?,
        term: parse_term(term)?,
    };

    let (invoice, client) = invoice_ops::create_invoice(cfg_dir, input, today)?;
    let totals = invoice.totals();

    println!("Created {}", invoice.number);
    println!("  Client:    {}", client.company_name);
    if let Some(due) = invoice.due_date {
        println!("  Due:       {} ({})", format_date_fr(due), invoice.term);
    }
    println!(
        "  Total TTC: {}",
        format_money(totals.total, &config.documents.currency)
    );

    Ok(())
}

/// Fetch the current MAD→EUR exchange rate. Returns None on any failure
/// (network, timeout, parse error) so the caller can silently skip the
/// EUR line.
fn fetch_mad_to_eur_rate() -> Option<f64> {
    use std::time::Duration;
    use ureq::Agent;

    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(3)))
        .build()
        .into();

    let body: String = agent
        .get("https://open.er-api.com/v6/latest/MAD")
        .call()
        .ok()?
        .body_mut()
        .read_to_string()
        .ok()?;

    let json: serde_json::Value = serde_json::from_str(&body).ok()?;
    json["rates"]["EUR"].as_f64()
}

/// List invoices with derived status and a financial footer
fn cmd_invoice_list(cfg_dir: &PathBuf, limit: Option<usize>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    if state.invoices.is_empty() {
        println!("No invoices created yet.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let invoices: Vec<_> = state.invoices.iter().rev().enumerate().collect();
    let invoices = match limit {
        Some(n) => &invoices[..n.min(invoices.len())],
        None => &invoices[..],
    };

    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .map(|(idx, invoice)| InvoiceRow {
            index: idx + 1,
            number: invoice.number.clone(),
            date: format_date_fr(invoice.date),
            due: invoice.due_date.map(format_date_fr).unwrap_or_default(),
            total: format_whole_money(invoice.totals().total, &config.documents.currency),
            status: invoice.status(today).to_string(),
            client: invoice.client.clone(),
        })
        .collect();

    // Financial summary uses recomputed TTC totals
    let shown_total: f64 = invoices.iter().map(|(_, i)| i.totals().total).sum();
    let shown_paid: f64 = invoices
        .iter()
        .filter(|(_, i)| i.paid)
        .map(|(_, i)| i.totals().total)
        .sum();
    let shown_outstanding: f64 = shown_total - shown_paid;

    let currency = &config.documents.currency;
    let table = Table::new(rows).with(Style::rounded()).to_string();
    let total_amount = format_whole_money(shown_total, currency);
    let paid_amount = format_whole_money(shown_paid, currency);
    let outstanding_amount = format_whole_money(shown_outstanding, currency);
    let table = add_financial_footer(&table, &total_amount, &paid_amount, &outstanding_amount);

    println!("{table}");

    println!();
    println!("Total: {} invoices", state.invoices.len());

    // Show outstanding amount converted to EUR if there's an outstanding balance
    if shown_outstanding > 0.0 {
        if let Some(rate) = fetch_mad_to_eur_rate() {
            let eur_amount = (shown_outstanding * rate).round() as i64;
            println!(
                "Solde en EUR: {} € (1 MAD = {:.4} EUR)",
                format_grouped_int(eur_amount),
                rate
            );
        }
    }

    println!("Use index number with edit/mark-paid/delete/pdf (e.g., 'facturier invoice pdf 1')");

    Ok(())
}

/// Edit an existing invoice
fn cmd_invoice_edit(
    cfg_dir: &PathBuf,
    reference: &str,
    lines: Vec<String>,
    date: Option<String>,
    term: Option<String>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let edit = InvoiceEdit {
        lines,
        date: parse_optional_date(date)?,
        term: parse_term(term)?,
    };

    let invoice = invoice_ops::edit_invoice(cfg_dir, reference, edit)?;
    println!("Updated {}", invoice.number);
    if let Some(due) = invoice.due_date {
        println!("  Due:       {} ({})", format_date_fr(due), invoice.term);
    }
    println!(
        "  Total TTC: {}",
        format_money(invoice.totals().total, &config.documents.currency)
    );

    Ok(())
}

/// Mark an invoice as paid
fn cmd_invoice_mark_paid(cfg_dir: &PathBuf, reference: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let number = invoice_ops::mark_paid(cfg_dir, reference)?;
    println!("Marked {} as paid", number);
    Ok(())
}

/// Delete an invoice
fn cmd_invoice_delete(cfg_dir: &PathBuf, reference: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let number = invoice_ops::delete_invoice(cfg_dir, reference)?;
    println!("Deleted {}", number);
    Ok(())
}

/// Generate an invoice PDF
fn cmd_invoice_pdf(cfg_dir: &PathBuf, reference: &str, open: bool) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let pdf_path = invoice_ops::invoice_pdf(cfg_dir, reference)?;
    if open {
        open_path(&pdf_path)?;
    }

    println!("Saved: {}", pdf_path.display());
    Ok(())
}

fn open_path(pdf_path: &PathBuf) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(FacturierError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(FacturierError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(FacturierError::Io)?;
    }
    Ok(())
}

/// Export clients, quotes or invoices to CSV or HTML
fn cmd_export(
    cfg_dir: &PathBuf,
    entity: ExportEntity,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let clients = load_clients(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let today = chrono::Local::now().date_naive();
    let currency = &config.documents.currency;
    let accent = &config.company.accent_color;

    let client_name = |id: &str| {
        clients
            .get(id)
            .map(|c| c.company_name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut sorted_clients: Vec<(&str, &Client)> =
        clients.iter().map(|(k, v)| (k.as_str(), v)).collect();
    sorted_clients.sort_by_key(|(k, _)| *k);

    let (stem, count, content) = match (entity, format) {
        (ExportEntity::Clients, ExportFormat::Csv) => (
            "clients",
            sorted_clients.len(),
            csv_export::clients_csv(&sorted_clients),
        ),
        (ExportEntity::Clients, ExportFormat::Html) => (
            "clients",
            sorted_clients.len(),
            html_export::render_page(
                "Clients",
                accent,
                &html_export::clients_table(&sorted_clients),
            ),
        ),
        (ExportEntity::Quotes, ExportFormat::Csv) => (
            "devis",
            state.quotes.len(),
            csv_export::quotes_csv(&state.quotes, &client_name, currency, today),
        ),
        (ExportEntity::Quotes, ExportFormat::Html) => (
            "devis",
            state.quotes.len(),
            html_export::render_page(
                "Devis",
                accent,
                &html_export::quotes_table(&state.quotes, &client_name, currency, today),
            ),
        ),
        (ExportEntity::Invoices, ExportFormat::Csv) => (
            "factures",
            state.invoices.len(),
            csv_export::invoices_csv(&state.invoices, &client_name, currency, today),
        ),
        (ExportEntity::Invoices, ExportFormat::Html) => (
            "factures",
            state.invoices.len(),
            html_export::render_page(
                "Factures",
                accent,
                &html_export::invoices_table(&state.invoices, &client_name, currency, today),
            ),
        ),
    };

    let ext = match format {
        ExportFormat::Csv => "csv",
        ExportFormat::Html => "html",
    };

    let path = match output {
        Some(p) => p,
        None => {
            let output_dir = resolve_output_dir(&config.export.output_dir, cfg_dir);
            std::fs::create_dir_all(&output_dir)?;
            output_dir.join(format!("{}-{}.{}", stem, today.format("%Y-%m-%d"), ext))
        }
    };

    std::fs::write(&path, content)
        .map_err(|e| FacturierError::ExportWrite(format!("{}: {e}", path.display())))?;

    println!("Exported {} {}", count, stem);
    println!("  Saved: {}", path.display());

    Ok(())
}

/// Per-year accounting summary
fn cmd_summary(cfg_dir: &PathBuf, year: Option<i32>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let currency = &config.documents.currency;

    let quotes: Vec<_> = state
        .quotes
        .iter()
        .filter(|q| q.date.year() == year)
        .collect();
    let invoices: Vec<_> = state
        .invoices
        .iter()
        .filter(|i| i.date.year() == year)
        .collect();

    let quoted_total: f64 = quotes.iter().map(|q| q.totals().total).sum();
    let invoiced_total: f64 = invoices.iter().map(|i| i.totals().total).sum();
    let paid_total: f64 = invoices
        .iter()
        .filter(|i| i.paid)
        .map(|i| i.totals().total)
        .sum();
    let outstanding = invoiced_total - paid_total;

    println!("Summary {year}");
    println!("{}", "-".repeat(50));
    println!(
        "Quotes:     {:>3}   {}",
        quotes.len(),
        format_money(quoted_total, currency)
    );
    println!(
        "Invoices:   {:>3}   {}",
        invoices.len(),
        format_money(invoiced_total, currency)
    );
    println!("Paid:             {}", format_money(paid_total, currency));
    println!("Outstanding:      {}", format_money(outstanding, currency));

    if outstanding > 0.0 {
        if let Some(rate) = fetch_mad_to_eur_rate() {
            let eur_amount = (outstanding * rate).round() as i64;
            println!(
                "Outstanding EUR:  {} € (1 MAD = {:.4} EUR)",
                format_grouped_int(eur_amount),
                rate
            );
        }
    }

    Ok(())
}

/// Generate a PDF account report for a client
fn cmd_report(
    cfg_dir: &PathBuf,
    client_id: &str,
    from: Option<String>,
    to: Option<String>,
    status: Option<String>,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(FacturierError::ConfigNotFound(cfg_dir.clone()));
    }

    let config = load_config(cfg_dir)?;
    let today = chrono::Local::now().date_naive();

    let status = status
        .map(|s| {
            InvoiceStatus::from_filter(&s).ok_or(FacturierError::InvalidStatusFilter(s))
        })
        .transpose()?;

    let filter = ReportFilter {
        from: parse_optional_date(from)?,
        to: parse_optional_date(to)?,
        status,
    };

    let Some(summary) = invoice_ops::client_report(cfg_dir, client_id, &filter, today)? else {
        println!("No invoices found for client '{client_id}' with the given filters.");
        return Ok(());
    };

    println!("Generated report for '{}'", client_id);
    println!("  Invoices: {}", summary.count);
    println!(
        "  Total:    {}",
        format_money(summary.total, &config.documents.currency)
    );
    println!(
        "  Solde:    {}",
        format_money(summary.outstanding, &config.documents.currency)
    );
    println!("  Saved:    {}", summary.path.display());

    if open {
        open_path(&summary.path)?;
    }

    Ok(())
}
