//! Configuration
//!
//! Environment-driven, with `.env` support. Defaults match the local
//! json-server setup.

use std::env;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the REST record store.
    pub api_base_url: String,
    /// Shop WhatsApp numbers the dispatch collaborator may send orders to.
    pub whatsapp_numbers: Vec<String>,
}

impl Config {
    /// Reads `STOREFRONT_API_URL` and `STOREFRONT_WHATSAPP_NUMBERS`
    /// (comma-separated) from the environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let api_base_url =
            env::var("STOREFRONT_API_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        let whatsapp_numbers = env::var("STOREFRONT_WHATSAPP_NUMBERS")
            .map(|raw| {
                raw.split(',')
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { api_base_url, whatsapp_numbers }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE_URL.to_string(), whatsapp_numbers: vec![] }
    }
}
