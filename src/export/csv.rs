//! CSV exports: semicolon-delimited, UTF-8 with BOM, fixed header row per
//! entity type. The semicolon delimiter keeps fr-MA decimal commas intact
//! for spreadsheet imports.

use chrono::NaiveDate;

use super::{format_date_fr, format_money};
use crate::config::{Client, InvoiceRecord, QuoteRecord};

const BOM: char = '\u{feff}';
const SEP: char = ';';

/// Quote a field when it contains the delimiter, a quote or a line break;
/// inner quotes are doubled.
fn escape(field: &str) -> String {
    if field.contains(SEP) || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_row<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let row: Vec<String> = fields.iter().map(|f| escape(f.as_ref())).collect();
    out.push_str(&row.join(";"));
    out.push_str("\r\n");
}

pub fn clients_csv(clients: &[(&str, &Client)]) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_row(
        &mut out,
        &[
            "Société",
            "ICE",
            "Adresse",
            "Code postal",
            "Ville",
            "Pays",
            "Téléphone",
            "Email",
        ],
    );

    for (_, client) in clients {
        push_row(
            &mut out,
            &[
                client.company_name.as_str(),
                client.ice.as_str(),
                client.address.as_str(),
                client.postal_code.as_deref().unwrap_or(""),
                client.city.as_str(),
                client.country.as_deref().unwrap_or(""),
                client.phone.as_str(),
                client.email.as_str(),
            ],
        );
    }
    out
}

pub fn quotes_csv(
    quotes: &[QuoteRecord],
    client_name: &dyn Fn(&str) -> String,
    currency: &str,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_row(
        &mut out,
        &[
            "Numéro",
            "Client",
            "Date",
            "Date événement",
            "Sous-total HT",
            "TVA",
            "Total TTC",
            "Statut",
        ],
    );

    for quote in quotes {
        let totals = quote.totals();
        push_row(
            &mut out,
            &[
                quote.number.clone(),
                client_name(&quote.client),
                format_date_fr(quote.date),
                quote.event_date.map(format_date_fr).unwrap_or_default(),
                format_money(totals.subtotal, currency),
                format_money(totals.vat, currency),
                format_money(totals.total, currency),
                quote.status(today).label().to_string(),
            ],
        );
    }
    out
}

pub fn invoices_csv(
    invoices: &[InvoiceRecord],
    client_name: &dyn Fn(&str) -> String,
    currency: &str,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_row(
        &mut out,
        &[
            "Numéro",
            "Client",
            "Date émission",
            "Date échéance",
            "Sous-total HT",
            "TVA",
            "Total TTC",
            "Statut",
        ],
    );

    for invoice in invoices {
        let totals = invoice.totals();
        push_row(
            &mut out,
            &[
                invoice.number.clone(),
                client_name(&invoice.client),
                format_date_fr(invoice.date),
                invoice.due_date.map(format_date_fr).unwrap_or_default(),
                format_money(totals.subtotal, currency),
                format_money(totals.vat, currency),
                format_money(totals.total, currency),
                invoice.status(today).label().to_string(),
            ],
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentLine, PaymentTerm};

    fn client(name: &str) -> Client {
        Client {
            company_name: name.to_string(),
            ice: "001234567000089".to_string(),
            address: "45 Avenue Client".to_string(),
            city: "Rabat".to_string(),
            postal_code: Some("10000".to_string()),
            country: None,
            phone: "+212 5 37 00 00 00".to_string(),
            email: "contact@client.ma".to_string(),
        }
    }

    /// Minimal semicolon-aware reader used to check the quoting round trip.
    fn read_fields(line: &str) -> Vec<String> {
        let mut fields = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if quoted && chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => quoted = !quoted,
                ';' if !quoted => fields.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        fields.push(current);
        fields
    }

    #[test]
    fn starts_with_bom_and_header() {
        let csv = clients_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("Société;ICE;Adresse"));
    }

    #[test]
    fn field_containing_delimiter_round_trips() {
        let c = client("Agence;Royale");
        let csv = clients_csv(&[("royale", &c)]);

        let data_line = csv.lines().nth(1).unwrap();
        assert!(data_line.starts_with("\"Agence;Royale\""));

        let fields = read_fields(data_line);
        assert_eq!(fields[0], "Agence;Royale");
    }

    #[test]
    fn quote_rows_carry_recomputed_totals_and_status() {
        let quote = QuoteRecord {
            number: "DEV/2026/0001".to_string(),
            client: "royale".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            event_date: NaiveDate::from_ymd_opt(2026, 1, 20).unwrap().into(),
            term: PaymentTerm::Net30,
            po_reference: None,
            lines: vec![DocumentLine {
                description: "Hôtesses accueil".to_string(),
                staff_count: 4,
                days: 3,
                unit_price: 800.0,
                vat_rate: 20.0,
            }],
            invoiced: false,
            invoice_number: None,
        };

        let today = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let csv = quotes_csv(&[quote], &|_| "Royale".to_string(), "MAD", today);
        let row = csv.lines().nth(1).unwrap();

        assert!(row.contains("DEV/2026/0001"));
        assert!(row.contains("9 600,00 MAD"));
        assert!(row.contains("1 920,00 MAD"));
        assert!(row.contains("11 520,00 MAD"));
        // Event date 20/01 is past "today" and the quote is not invoiced.
        assert!(row.contains("À FACTURER"));
    }
}
