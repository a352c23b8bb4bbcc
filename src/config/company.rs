use serde::{Deserialize, Serialize};

use crate::document::PaymentTerm;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub company: Company,
    pub documents: DocumentSettings,
    pub export: ExportSettings,
}

/// Singleton company record: identity, tax identifiers and branding used
/// on every generated document.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Company {
    pub name: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub phone2: Option<String>,
    pub email: String,
    pub ice: String,
    #[serde(default)]
    pub rc: Option<String>,
    #[serde(default)]
    pub tva_number: Option<String>,
    #[serde(default)]
    pub patente: Option<String>,
    #[serde(default)]
    pub cnss: Option<String>,
    #[serde(default)]
    pub rib: Option<String>,
    #[serde(default)]
    pub legal_note: Option<String>,
    /// "#rrggbb" brand color for document headers and HTML exports.
    #[serde(default = "default_accent")]
    pub accent_color: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentSettings {
    #[serde(default = "default_quote_format")]
    pub quote_number_format: String,
    #[serde(default = "default_invoice_format")]
    pub invoice_number_format: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub default_term: PaymentTerm,
    #[serde(default = "default_vat")]
    pub default_vat: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportSettings {
    pub output_dir: String,
}

fn default_accent() -> String {
    "#1f6f54".to_string()
}

fn default_quote_format() -> String {
    "DEV/{year}/{seq:04}".to_string()
}

fn default_invoice_format() -> String {
    "FAC/{year}/{seq:04}".to_string()
}

fn default_currency() -> String {
    "MAD".to_string()
}

fn default_vat() -> f64 {
    20.0
}
