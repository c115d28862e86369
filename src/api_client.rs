// src/api_client.rs

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::category::Category;
use crate::errors::AppError;
use crate::models::{BrandRow, ProductEnvelope, ProductSummary, ReferenceOption, TypeOptionRow};
use crate::payload::{MultipartPayload, ProductPayload, SaveTarget};
use crate::state::ApiConfig;

/// Nazwa części z plikiem obrazka w formularzu multipart.
const IMAGE_PART: &str = "img";

/// Backend katalogu widziany przez kontrolery.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Pojedynczy produkt do edycji.
    async fn fetch_product(&self, id: i64) -> Result<Map<String, Value>, AppError>;

    async fn fetch_summaries(&self) -> Result<Vec<ProductSummary>, AppError>;

    /// Tworzy albo aktualizuje produkt.
    async fn save_product(
        &self,
        target: SaveTarget,
        payload: ProductPayload,
    ) -> Result<(), AppError>;

    async fn delete_product(&self, id: i64) -> Result<(), AppError>;

    /// Wiersze podzasobu dla danego typu głównego (np. "Watch").
    async fn fetch_by_main_type(&self, main_type: String) -> Result<Vec<Value>, AppError>;

    async fn fetch_brands(&self) -> Result<Vec<ReferenceOption>, AppError>;

    /// Typy danej kategorii; pusta lista, jeśli kategoria ich nie ma.
    async fn fetch_type_options(
        &self,
        category: Category,
    ) -> Result<Vec<ReferenceOption>, AppError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: Client,
    base_url: Url,
}

impl HttpCatalogApi {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    /// Wysyła żądanie i zamienia status spoza 2xx na błąd z treścią odpowiedzi.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response, AppError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Błąd sieci podczas '{}': {:?}", context, e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("'{}' zakończone statusem {}", context, status);
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Brak treści błędu".to_string());
        tracing::error!(
            "API katalogu odrzuciło '{}': Status={}, Treść={}",
            context,
            status,
            body
        );
        Err(AppError::Status { status, body })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.url(path)?;
        let response = self.send(self.client.get(url), path).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!("Nie można przetworzyć odpowiedzi z '{}': {}", path, e);
            AppError::Decode(e.to_string())
        })
    }

    fn multipart_form(payload: MultipartPayload) -> Result<multipart::Form, AppError> {
        let MultipartPayload { fields, image } = payload;

        let part = multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)
            .map_err(|e| {
                tracing::error!("Błąd ustawiania typu MIME: {}", e);
                AppError::Transport(e)
            })?;

        let form = fields
            .into_iter()
            .fold(multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            })
            .part(IMAGE_PART, part);
        Ok(form)
    }

    fn save_request(
        &self,
        target: SaveTarget,
        payload: ProductPayload,
    ) -> Result<RequestBuilder, AppError> {
        let request = match target {
            SaveTarget::Create => self.client.post(self.url("product/add")?),
            SaveTarget::Update(id) => self
                .client
                .put(self.url(&format!("product/update/{}", id))?),
        };

        Ok(match payload {
            ProductPayload::Json(body) => request.json(&body),
            ProductPayload::Multipart(form) => request.multipart(Self::multipart_form(form)?),
        })
    }

    fn delete_request(&self, id: i64) -> Result<RequestBuilder, AppError> {
        let url = self.url(&format!("product/delete/{}", id))?;
        Ok(self.client.delete(url))
    }

    /// Kategoria trafia do ścieżki, więc musi być zakodowana.
    fn by_main_type_path(main_type: &str) -> String {
        format!("product/bymaintype/{}", urlencoding::encode(main_type))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn fetch_product(&self, id: i64) -> Result<Map<String, Value>, AppError> {
        let envelope: ProductEnvelope = self.get_json(&format!("product/get/{}", id)).await?;
        Ok(envelope.into_record())
    }

    async fn fetch_summaries(&self) -> Result<Vec<ProductSummary>, AppError> {
        self.get_json("product/get/allproducts").await
    }

    async fn save_product(
        &self,
        target: SaveTarget,
        payload: ProductPayload,
    ) -> Result<(), AppError> {
        let request = self.save_request(target, payload)?;
        tracing::info!("Zapisywanie produktu: {:?}", target);
        self.send(request, "zapis produktu").await?;
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        self.send(self.delete_request(id)?, "usuwanie produktu").await?;
        tracing::info!("Usunięto produkt o ID: {}", id);
        Ok(())
    }

    async fn fetch_by_main_type(&self, main_type: String) -> Result<Vec<Value>, AppError> {
        self.get_json(&Self::by_main_type_path(&main_type)).await
    }

    async fn fetch_brands(&self) -> Result<Vec<ReferenceOption>, AppError> {
        let rows: Vec<BrandRow> = self.get_json("product/get/brands").await?;
        Ok(rows.into_iter().map(ReferenceOption::from).collect())
    }

    async fn fetch_type_options(
        &self,
        category: Category,
    ) -> Result<Vec<ReferenceOption>, AppError> {
        let Some(path) = category.descriptor().type_options_path else {
            return Ok(Vec::new());
        };
        let rows: Vec<TypeOptionRow> = self.get_json(path).await?;
        Ok(rows.into_iter().map(ReferenceOption::from).collect())
    }
}
