pub mod csv;
pub mod html;

use chrono::NaiveDate;

/// Group an integer's digits with spaces, French style.
pub fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Terminal-table money: rounded to whole units, e.g. "9 600 MAD".
pub fn format_whole_money(value: f64, currency: &str) -> String {
    let rounded = value.round() as i64;
    format!("{} {}", format_grouped_int(rounded), currency)
}

/// Export/document money: fr-MA two decimals, e.g. "9 600,00 MAD".
pub fn format_money(value: f64, currency: &str) -> String {
    let rounded = format!("{:.2}", value);
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let negative = whole.starts_with('-');
    let digits = if negative { &whole[1..] } else { whole };
    let grouped = format_grouped_int(digits.parse::<i64>().unwrap_or(0));

    if negative {
        format!("-{},{} {}", grouped, frac, currency)
    } else {
        format!("{},{} {}", grouped, frac, currency)
    }
}

/// Dates are rendered dd/MM/yyyy everywhere outside state.toml.
pub fn format_date_fr(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
