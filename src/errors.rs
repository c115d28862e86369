// src/errors.rs

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Błąd połączenia z API katalogu: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API katalogu zwróciło status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Brak wymaganego pola: {0}")]
    MissingField(String),

    #[error("Nieznana kategoria produktu: {0}")]
    UnknownCategory(String),

    #[error("Nieznane pole formularza: {0}")]
    UnknownField(String),

    #[error("Nie znaleziono zasobu")]
    NotFound,

    #[error("Nieprawidłowa odpowiedź API: {0}")]
    Decode(String),

    #[error("Błąd konfiguracji: {0}")]
    Config(String),

    #[error("Błąd wejścia/wyjścia: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nieprawidłowy adres URL: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Błędy, które nie dotarły do warstwy sieciowej.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::MissingField(_) | AppError::UnknownField(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Błąd deserializacji odpowiedzi: {:?}", err);
        AppError::Decode(err.to_string())
    }
}
