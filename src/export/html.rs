//! HTML exports: a `<table>` fragment built from a column-definition list,
//! wrapped in a minimal printable page carrying the brand accent as a CSS
//! custom property.

use chrono::NaiveDate;

use super::{format_date_fr, format_money};
use crate::config::{Client, InvoiceRecord, QuoteRecord};
use crate::theme;

/// One column of an export table: a header and a cell formatter.
pub struct Column<'a, T> {
    pub header: &'static str,
    cell: Box<dyn Fn(&T) -> String + 'a>,
}

impl<'a, T> Column<'a, T> {
    pub fn new(header: &'static str, cell: impl Fn(&T) -> String + 'a) -> Self {
        Self {
            header,
            cell: Box::new(cell),
        }
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render a `<table>` fragment. Cell values are escaped here, so the
/// formatters stay plain-string pure.
pub fn render_table<T>(columns: &[Column<'_, T>], rows: &[T]) -> String {
    let mut out = String::from("<table>\n  <thead>\n    <tr>");
    for col in columns {
        out.push_str(&format!("<th>{}</th>", html_escape(col.header)));
    }
    out.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in rows {
        out.push_str("    <tr>");
        for col in columns {
            out.push_str(&format!("<td>{}</td>", html_escape(&(col.cell)(row))));
        }
        out.push_str("</tr>\n");
    }

    out.push_str("  </tbody>\n</table>");
    out
}

/// Wrap a table fragment in a printable page. The accent color arrives as
/// an HSL custom property derived from the company's hex color.
pub fn render_page(title: &str, accent_hex: &str, fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
  :root {{ --accent: {accent}; }}
  body {{ font-family: sans-serif; margin: 2rem; }}
  h1 {{ color: var(--accent); }}
  table {{ border-collapse: collapse; width: 100%; }}
  th {{ background: var(--accent); color: white; text-align: left; }}
  th, td {{ border: 1px solid #ccc; padding: 0.4rem 0.6rem; }}
</style>
</head>
<body>
<h1>{title}</h1>
{fragment}
</body>
</html>
"#,
        title = html_escape(title),
        accent = theme::accent_css(accent_hex),
        fragment = fragment,
    )
}

pub fn clients_table(clients: &[(&str, &Client)]) -> String {
    let columns: Vec<Column<(&str, &Client)>> = vec![
        Column::new("Société", |(_, c): &(&str, &Client)| {
            c.company_name.clone()
        }),
        Column::new("ICE", |(_, c): &(&str, &Client)| c.ice.clone()),
        Column::new("Adresse", |(_, c): &(&str, &Client)| c.address.clone()),
        Column::new("Ville", |(_, c): &(&str, &Client)| c.city.clone()),
        Column::new("Téléphone", |(_, c): &(&str, &Client)| c.phone.clone()),
        Column::new("Email", |(_, c): &(&str, &Client)| c.email.clone()),
    ];
    render_table(&columns, clients)
}

pub fn quotes_table<'a>(
    quotes: &[QuoteRecord],
    client_name: &'a dyn Fn(&str) -> String,
    currency: &'a str,
    today: NaiveDate,
) -> String {
    let columns: Vec<Column<QuoteRecord>> = vec![
        Column::new("Numéro", |q: &QuoteRecord| q.number.clone()),
        Column::new("Client", move |q: &QuoteRecord| client_name(&q.client)),
        Column::new("Date", |q: &QuoteRecord| format_date_fr(q.date)),
        Column::new("Date événement", |q: &QuoteRecord| {
            q.event_date.map(format_date_fr).unwrap_or_default()
        }),
        Column::new("Total TTC", move |q: &QuoteRecord| {
            format_money(q.totals().total, currency)
        }),
        Column::new("Statut", move |q: &QuoteRecord| {
            q.status(today).label().to_string()
        }),
    ];
    render_table(&columns, quotes)
}

pub fn invoices_table<'a>(
    invoices: &[InvoiceRecord],
    client_name: &'a dyn Fn(&str) -> String,
    currency: &'a str,
    today: NaiveDate,
) -> String {
    let columns: Vec<Column<InvoiceRecord>> = vec![
        Column::new("Numéro", |i: &InvoiceRecord| i.number.clone()),
        Column::new("Client", move |i: &InvoiceRecord| client_name(&i.client)),
        Column::new("Date émission", |i: &InvoiceRecord| format_date_fr(i.date)),
        Column::new("Date échéance", |i: &InvoiceRecord| {
            i.due_date.map(format_date_fr).unwrap_or_default()
        }),
        Column::new("Total TTC", move |i: &InvoiceRecord| {
            format_money(i.totals().total, currency)
        }),
        Column::new("Statut", move |i: &InvoiceRecord| {
            i.status(today).label().to_string()
        }),
    ];
    render_table(&columns, invoices)
}
