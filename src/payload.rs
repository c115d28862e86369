// src/payload.rs

use serde_json::{Map, Value};

use crate::category::CategoryDescriptor;
use crate::draft::{ProductDraft, ProductField, VariantField};
use crate::models::{ImageAttachment, StockStatus, value_text};

/// Dokąd trafia formularz: nowy produkt albo aktualizacja istniejącego.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(i64),
}

impl SaveTarget {
    pub fn for_id(id: Option<i64>) -> Self {
        id.map_or(SaveTarget::Create, SaveTarget::Update)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPayload {
    pub fields: Vec<(String, String)>,
    pub image: ImageAttachment,
}

impl MultipartPayload {
    #[cfg(test)]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductPayload {
    Json(Value),
    Multipart(MultipartPayload),
}

impl ProductPayload {
    pub fn is_multipart(&self) -> bool {
        matches!(self, ProductPayload::Multipart(_))
    }
}

/// Stan magazynowy wraca do API w postaci "yes"/"no".
fn wire_value(field: ProductField, value: &Value) -> Value {
    match (field, value) {
        (ProductField::InStock, Value::String(s)) => s
            .parse::<StockStatus>()
            .map(|status| Value::String(status.as_persisted().to_string()))
            .unwrap_or_else(|_| value.clone()),
        _ => value.clone(),
    }
}

fn scalar_fields<'a>(
    draft: &'a ProductDraft,
    descriptor: &'a CategoryDescriptor,
) -> impl Iterator<Item = (ProductField, Value)> + 'a {
    descriptor.fields.iter().filter_map(move |field| {
        draft
            .field(*field)
            .map(|value| (*field, wire_value(*field, value)))
    })
}

/// Z obrazkiem: multipart. Bez obrazka: jeden dokument JSON z tablicą wariantów.
pub fn build_payload(draft: &ProductDraft, descriptor: &CategoryDescriptor) -> ProductPayload {
    match draft.image() {
        Some(image) => ProductPayload::Multipart(build_multipart(draft, descriptor, image.clone())),
        None => ProductPayload::Json(build_json(draft, descriptor)),
    }
}

fn build_json(draft: &ProductDraft, descriptor: &CategoryDescriptor) -> Value {
    let mut body: Map<String, Value> = scalar_fields(draft, descriptor)
        .map(|(field, value)| (field.to_string(), value))
        .collect();

    let variants = draft
        .variants()
        .iter()
        .map(|variant| {
            let object: Map<String, Value> = VariantField::ALL
                .into_iter()
                .map(|field| {
                    let value = variant.get(field).cloned().unwrap_or(Value::Null);
                    (descriptor.variant_key(field).to_string(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    body.insert(descriptor.variants_key.to_string(), Value::Array(variants));
    Value::Object(body)
}

fn build_multipart(
    draft: &ProductDraft,
    descriptor: &CategoryDescriptor,
    image: ImageAttachment,
) -> MultipartPayload {
    let mut fields: Vec<(String, String)> = scalar_fields(draft, descriptor)
        .map(|(field, value)| (field.to_string(), value_text(&value)))
        .collect();

    for (index, variant) in draft.variants().iter().enumerate() {
        for field in VariantField::ALL {
            let key = descriptor.variant_key(field);
            let value = variant.get(field).map(value_text).unwrap_or_default();
            fields.push((format!("{}[{}][{}]", descriptor.variants_key, index, key), value));
        }
    }

    MultipartPayload { fields, image }
}
