pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod ops;
pub mod pdf;
pub mod theme;

pub use config::{Client, Company, Config, InvoiceRecord, QuoteRecord, State};
pub use document::{
    compute_totals, DocumentLine, InvoiceStatus, PaymentTerm, QuoteStatus, Totals,
};
pub use error::{FacturierError, Result};
