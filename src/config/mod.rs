mod client;
mod company;
mod state;

pub use client::Client;
pub use company::{Company, Config, DocumentSettings, ExportSettings};
pub use state::{Counter, InvoiceRecord, QuoteRecord, State};

use crate::error::{FacturierError, Result};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.facturier/ or XDG)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "facturier") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.facturier/
    let home = dirs_home().ok_or_else(|| {
        FacturierError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".facturier"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = dirs_home() {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Resolve the export output directory, defaulting next to the config dir.
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    if output_dir.trim().is_empty() {
        config_dir.join("output")
    } else {
        expand_path(output_dir)
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(FacturierError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FacturierError::ConfigParse { path, source: e })
}

/// Load clients.toml as a HashMap keyed by client identifier
pub fn load_clients(config_dir: &Path) -> Result<HashMap<String, Client>> {
    let path = config_dir.join("clients.toml");
    if !path.exists() {
        return Err(FacturierError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FacturierError::ConfigParse { path, source: e })
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| FacturierError::ConfigParse { path, source: e })
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        FacturierError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r##"[company]
name = "Votre Agence"
address = "12 Rue Exemple"
city = "Casablanca"
postal_code = "20000"
country = "Maroc"
phone = "+212 5 22 00 00 00"
# phone2 = "+212 6 00 00 00 00"    # optional
email = "contact@agence.ma"
ice = "000000000000000"
# rc = "123456"                    # registre de commerce, optional
# tva_number = "12345678"          # optional
# patente = "12345678"             # optional
# cnss = "1234567"                 # optional
# rib = "011 780 0000123456789012 34"   # shown on invoices, optional
# legal_note = "Pénalité de retard: taux légal en vigueur."
accent_color = "#1f6f54"

[documents]
quote_number_format = "DEV/{year}/{seq:04}"    # e.g., DEV/2026/0001
invoice_number_format = "FAC/{year}/{seq:04}"  # e.g., FAC/2026/0001
currency = "MAD"
default_term = "30 jours"
default_vat = 20.0

[export]
output_dir = "~/.facturier/output"
"##;

/// Template content for clients.toml
pub const CLIENTS_TEMPLATE: &str = r##"# Define your clients here. The table name (e.g., [royale]) is used
# as the client identifier in quote/invoice commands.
#
# Example:
#   facturier quote new --client royale --event-date 2026-05-01 \
#       --line "Hôtesses accueil:4:3:800:20"

[exemple-client]
company_name = "Exemple Client SARL"
ice = "000000000000000"
address = "45 Avenue Client"
city = "Rabat"
postal_code = "10000"
# country = "Maroc"                # optional
phone = "+212 5 37 00 00 00"
email = "contact@exemple-client.ma"
"##;
