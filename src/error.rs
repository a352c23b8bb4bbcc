use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FacturierError {
    #[error("Config directory not found at {0}. Run 'facturier init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Client '{0}' not found in clients.toml")]
    ClientNotFound(String),

    #[error("A client is required. Use --client <id> ('facturier clients' lists them).")]
    ClientRequired,

    #[error("Missing {0} date. Pass it as YYYY-MM-DD.")]
    MissingDate(&'static str),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Each line needs a description and a unit price greater than zero")]
    InvalidLine,

    #[error("Invalid line format '{0}'. Expected 'description:staff:days:price[:tva]' (e.g., 'Hôtesses accueil:4:3:800:20')")]
    InvalidLineFormat(String),

    #[error("Invalid value '{value}' in line '{line}': {reason}")]
    InvalidLineValue {
        line: String,
        value: String,
        reason: String,
    },

    #[error("Unknown payment term '{0}'. Use 'À réception', '15 jours', '30 jours', '30 jours fin de mois' or '60 jours'.")]
    InvalidPaymentTerm(String),

    #[error("No lines specified. Use --line 'description:staff:days:price[:tva]' to add document lines.")]
    NoLines,

    #[error("Quote '{0}' not found")]
    QuoteNotFound(String),

    #[error("Invoice '{0}' not found")]
    InvoiceNotFound(String),

    #[error("Invalid document index '{0}'. Use 'list' to see available documents.")]
    InvalidDocumentIndex(String),

    #[error("Quote '{quote}' was already invoiced as {invoice}")]
    AlreadyInvoiced { quote: String, invoice: String },

    #[error("Invoice '{0}' is already marked paid")]
    AlreadyPaid(String),

    #[error("Invalid --status value: '{0}'. Use 'paid', 'unpaid', or 'overdue'.")]
    InvalidStatusFilter(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Failed to write export: {0}")]
    ExportWrite(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FacturierError>;
