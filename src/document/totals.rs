use super::line::DocumentLine;

/// Aggregated amounts for one document, all in MAD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sous-total HT.
    pub subtotal: f64,
    /// Montant TVA.
    pub vat: f64,
    /// Total TTC.
    pub total: f64,
}

/// Sum line totals and VAT over a document's lines.
///
/// VAT is computed line by line and then summed, so documents mixing
/// 0% and 20% lines come out right. No rounding happens here; amounts
/// are only rounded when formatted for display or export.
pub fn compute_totals(lines: &[DocumentLine]) -> Totals {
    let subtotal: f64 = lines.iter().map(|l| l.total_ht()).sum();
    let vat: f64 = lines
        .iter()
        .map(|l| l.total_ht() * l.vat_rate / 100.0)
        .sum();

    Totals {
        subtotal,
        vat,
        total: subtotal + vat,
    }
}
