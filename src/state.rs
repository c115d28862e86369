// src/state.rs

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::api_client::CatalogApi;
use crate::errors::AppError;
use crate::ports::{Confirmer, Navigator, Notifier};

const DEFAULT_API_URL: &str = "http://localhost:1010";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Współdzielone zależności kontrolerów.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogApi>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub confirmer: Arc<dyn Confirmer>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Wartości z `CATALOG_API_URL` / `CATALOG_API_TIMEOUT_SECS` (przez clap) albo z flag.
    pub fn from_values(
        url: Option<String>,
        timeout_secs: Option<String>,
    ) -> Result<Self, AppError> {
        let mut raw_url = url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        // Bez końcowego ukośnika `Url::join` zgubiłby ostatni segment ścieżki.
        if !raw_url.ends_with('/') {
            raw_url.push('/');
        }
        let base_url = Url::parse(&raw_url)?;

        let timeout_secs = match timeout_secs {
            Some(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!(
                    "CATALOG_API_TIMEOUT_SECS musi być liczbą sekund, otrzymano '{}'",
                    value
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
