use serde::{Deserialize, Serialize};

/// An agency customer, declared in clients.toml under its identifier.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Client {
    pub company_name: String,
    /// Moroccan common business identifier.
    pub ice: String,
    pub address: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub phone: String,
    pub email: String,
}
