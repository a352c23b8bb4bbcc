use serde::{Deserialize, Serialize};

use crate::error::{FacturierError, Result};

/// One billable line: a staffing assignment priced per person per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLine {
    pub description: String,
    /// Number of staff assigned ("quantité d'hôtesses").
    pub staff_count: u32,
    /// Duration of the assignment in days.
    pub days: u32,
    /// Price per person per day, in MAD.
    pub unit_price: f64,
    /// VAT percentage, 0 or 20.
    pub vat_rate: f64,
}

impl DocumentLine {
    /// Pre-tax line total: staff × days × unit price.
    pub fn total_ht(&self) -> f64 {
        self.staff_count as f64 * self.days as f64 * self.unit_price
    }
}

fn parse_count(input: &str, value: &str, what: &str) -> Result<u32> {
    let n: u32 = value
        .trim()
        .parse()
        .map_err(|_| FacturierError::InvalidLineValue {
            line: input.to_string(),
            value: value.to_string(),
            reason: format!("{what} must be a whole number"),
        })?;
    if n == 0 {
        return Err(FacturierError::InvalidLineValue {
            line: input.to_string(),
            value: value.to_string(),
            reason: format!("{what} must be greater than 0"),
        });
    }
    Ok(n)
}

/// Parse line input like "Hôtesses accueil:4:3:800:20" into
/// (description, staff count, days, unit price, VAT). The VAT part is
/// optional and falls back to `default_vat`.
pub fn parse_line_input(input: &str, default_vat: f64) -> Result<DocumentLine> {
    let parts: Vec<&str> = input.split(':').collect();
    if parts.len() < 4 || parts.len() > 5 {
        return Err(FacturierError::InvalidLineFormat(input.to_string()));
    }

    let description = parts[0].trim().to_string();
    let staff_count = parse_count(input, parts[1], "staff count")?;
    let days = parse_count(input, parts[2], "days")?;

    let unit_price: f64 =
        parts[3]
            .trim()
            .parse()
            .map_err(|_| FacturierError::InvalidLineValue {
                line: input.to_string(),
                value: parts[3].to_string(),
                reason: "unit price must be a number".to_string(),
            })?;

    let vat_rate: f64 = match parts.get(4) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| FacturierError::InvalidLineValue {
                line: input.to_string(),
                value: v.to_string(),
                reason: "TVA must be a number".to_string(),
            })?,
        None => default_vat,
    };

    if vat_rate != 0.0 && vat_rate != 20.0 {
        return Err(FacturierError::InvalidLineValue {
            line: input.to_string(),
            value: vat_rate.to_string(),
            reason: "TVA must be 0 or 20".to_string(),
        });
    }

    Ok(DocumentLine {
        description,
        staff_count,
        days,
        unit_price,
        vat_rate,
    })
}
