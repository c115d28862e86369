// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};

use crate::category::Category;
use crate::errors::AppError;

/// Stan magazynowy: w bazie "yes"/"no", w formularzu "Yes"/"No".
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum StockStatus {
    #[strum(to_string = "Yes", serialize = "In Stock")]
    InStock,
    #[strum(to_string = "No", serialize = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn from_persisted(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if s == "yes" => StockStatus::InStock,
            _ => StockStatus::OutOfStock,
        }
    }

    pub fn as_persisted(self) -> &'static str {
        match self {
            StockStatus::InStock => "yes",
            StockStatus::OutOfStock => "no",
        }
    }
}

/// Plik obrazka dołączony do formularza.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Wiersz tabeli produktów z `/product/get/allproducts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSummary {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub sale: Option<Value>,
    #[serde(default)]
    pub instock: Option<Value>,
    #[serde(default)]
    pub after_price: Option<Value>,
    #[serde(default)]
    pub before_price: Option<Value>,
    #[serde(default)]
    pub main_product_type: Option<String>,
}

impl ProductSummary {
    pub fn category(&self) -> Result<Category, AppError> {
        let tag = self.main_product_type.as_deref().unwrap_or_default();
        tag.parse::<Category>()
            .map_err(|_| AppError::UnknownCategory(tag.to_string()))
    }

    pub fn sale_label(&self) -> &'static str {
        match &self.sale {
            Some(Value::String(s)) if s == "yes" => "On Sale",
            _ => "Not on Sale",
        }
    }

    pub fn stock_label(&self) -> &'static str {
        match &self.instock {
            Some(value) if !value.is_null() => "In Stock",
            _ => "Out of Stock",
        }
    }

    pub fn after_price_label(&self) -> String {
        price_label(self.after_price.as_ref())
    }

    pub fn before_price_label(&self) -> String {
        price_label(self.before_price.as_ref())
    }
}

fn price_label(price: Option<&Value>) -> String {
    match price {
        Some(value) if !value.is_null() => format!("${}", value_text(value)),
        _ => "N/A".to_string(),
    }
}

/// Tekstowa postać wartości, tak jak trafia do formularza multipart.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pozycja listy wyboru (marka, typ torebki, typ zegarka).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceOption {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct BrandRow {
    pub id: i64,
    pub brand_name: String,
}

impl From<BrandRow> for ReferenceOption {
    fn from(row: BrandRow) -> Self {
        ReferenceOption {
            id: row.id,
            label: row.brand_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TypeOptionRow {
    #[serde(alias = "BagTypeID", alias = "WatchTypeID")]
    pub id: i64,
    #[serde(rename = "TypeName")]
    pub type_name: String,
}

impl From<TypeOptionRow> for ReferenceOption {
    fn from(row: TypeOptionRow) -> Self {
        ReferenceOption {
            id: row.id,
            label: row.type_name,
        }
    }
}

/// Rekord produktu do edycji. API zwraca go opakowanego w `product` albo bezpośrednio.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductEnvelope {
    Wrapped { product: Map<String, Value> },
    Bare(Map<String, Value>),
}

impl ProductEnvelope {
    pub fn into_record(self) -> Map<String, Value> {
        match self {
            ProductEnvelope::Wrapped { product } => product,
            ProductEnvelope::Bare(record) => record,
        }
    }
}

/// Id podzasobu z wiersza `/product/bymaintype/{category}`.
pub fn record_id(row: &Value, key: &str) -> Option<i64> {
    [key, "id"]
        .into_iter()
        .filter_map(|k| row.get(k))
        .find_map(|value| match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
}
