// src/draft.rs

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::category::CategoryDescriptor;
use crate::models::{ImageAttachment, StockStatus};

/// Pola skalarne produktu, nazwane tak jak w API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display, IntoStaticStr,
)]
pub enum ProductField {
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "description")]
    Description,
    #[strum(serialize = "sale")]
    Sale,
    #[strum(serialize = "main_product_type")]
    MainProductType,
    #[strum(serialize = "product_type")]
    ProductType,
    #[strum(serialize = "season")]
    Season,
    #[strum(serialize = "brandID")]
    BrandId,
    #[strum(serialize = "WatchTypeID")]
    WatchTypeId,
    #[strum(serialize = "BagTypeID")]
    BagTypeId,
    #[strum(serialize = "available")]
    Available,
    #[strum(serialize = "before_price")]
    BeforePrice,
    #[strum(serialize = "after_price")]
    AfterPrice,
    #[strum(serialize = "instock")]
    InStock,
}

impl ProductField {
    pub fn key(self) -> &'static str {
        self.into()
    }

    /// Nazwa do komunikatów: `after_price` -> `after price`.
    pub fn humanized(self) -> String {
        humanize(self.key())
    }
}

pub fn humanize(key: &str) -> String {
    key.replace('_', " ")
}

/// Pola wariantu. `Parent` to `WatchID` / `BagID` / `FragranceID`, zależnie od kategorii.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumString, Display, IntoStaticStr,
)]
pub enum VariantField {
    #[strum(serialize = "parent")]
    Parent,
    #[strum(serialize = "size")]
    Size,
    #[strum(serialize = "available")]
    Available,
    #[strum(serialize = "before_price")]
    BeforePrice,
    #[strum(serialize = "after_price")]
    AfterPrice,
}

impl VariantField {
    pub const ALL: [VariantField; 5] = [
        VariantField::Parent,
        VariantField::Size,
        VariantField::Available,
        VariantField::BeforePrice,
        VariantField::AfterPrice,
    ];
}

/// Puste pole formularza i `null` traktujemy tak samo: brak wartości.
/// Zero i `false` są poprawnymi wartościami.
pub fn normalize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(ref s) if s.is_empty() => None,
        other => Some(other),
    }
}

fn input_value(input: &str) -> Option<Value> {
    normalize(Value::String(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariantDraft {
    values: BTreeMap<VariantField, Value>,
}

impl VariantDraft {
    pub fn get(&self, field: VariantField) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn is_blank(&self) -> bool {
        self.values.is_empty()
    }

    pub fn with_value(&self, field: VariantField, value: Option<Value>) -> Self {
        let mut values = self.values.clone();
        match value.and_then(normalize) {
            Some(value) => {
                values.insert(field, value);
            }
            None => {
                values.remove(&field);
            }
        }
        Self { values }
    }

    pub fn from_record(record: &Map<String, Value>, descriptor: &CategoryDescriptor) -> Self {
        let values = VariantField::ALL
            .into_iter()
            .filter_map(|field| {
                record
                    .get(descriptor.variant_key(field))
                    .cloned()
                    .and_then(normalize)
                    .map(|value| (field, value))
            })
            .collect();
        Self { values }
    }
}

/// Szkic produktu. Każda zmiana zwraca nowy szkic, poprzedni zostaje nietknięty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDraft {
    fields: BTreeMap<ProductField, Value>,
    variants: Vec<VariantDraft>,
    image: Option<ImageAttachment>,
}

impl ProductDraft {
    /// Nowy formularz: typ główny ustawiony z kategorii i jeden pusty wariant.
    pub fn blank(descriptor: &CategoryDescriptor) -> Self {
        Self::default()
            .with_field(
                ProductField::MainProductType,
                Some(Value::String(descriptor.category.to_string())),
            )
            .with_added_variant()
    }

    /// Wypełnia szkic rekordem z API, zachowując kolejność wariantów.
    pub fn from_record(record: &Map<String, Value>, descriptor: &CategoryDescriptor) -> Self {
        let mut draft = Self::blank(descriptor);

        for field in descriptor.fields.iter().copied() {
            let value = record.get(field.key());
            if field == ProductField::InStock {
                let status = StockStatus::from_persisted(value);
                draft = draft.with_field(field, Some(Value::String(status.to_string())));
            } else if let Some(value) = value {
                draft = draft.with_field(field, Some(value.clone()));
            }
        }

        if let Some(Value::Array(rows)) = record.get(descriptor.variants_key) {
            let variants = rows
                .iter()
                .filter_map(Value::as_object)
                .map(|row| VariantDraft::from_record(row, descriptor))
                .collect();
            draft = draft.with_variants(variants);
        }

        draft
    }

    pub fn field(&self, field: ProductField) -> Option<&Value> {
        self.fields.get(&field)
    }

    pub fn variants(&self) -> &[VariantDraft] {
        &self.variants
    }

    pub fn image(&self) -> Option<&ImageAttachment> {
        self.image.as_ref()
    }

    pub fn with_field(&self, field: ProductField, value: Option<Value>) -> Self {
        let mut next = self.clone();
        match value.and_then(normalize) {
            Some(value) => {
                next.fields.insert(field, value);
            }
            None => {
                next.fields.remove(&field);
            }
        }
        next
    }

    /// Wartość wpisana w formularzu; pusty tekst usuwa pole.
    pub fn with_input(&self, field: ProductField, input: &str) -> Self {
        self.with_field(field, input_value(input))
    }

    /// Indeks spoza zakresu nic nie zmienia.
    pub fn with_variant_field(&self, index: usize, field: VariantField, input: &str) -> Self {
        let mut next = self.clone();
        if let Some(variant) = next.variants.get_mut(index) {
            *variant = variant.with_value(field, input_value(input));
        }
        next
    }

    pub fn with_added_variant(&self) -> Self {
        let mut next = self.clone();
        next.variants.push(VariantDraft::default());
        next
    }

    pub fn with_variants(&self, variants: Vec<VariantDraft>) -> Self {
        Self {
            variants,
            ..self.clone()
        }
    }

    pub fn with_image(&self, image: Option<ImageAttachment>) -> Self {
        Self {
            image,
            ..self.clone()
        }
    }

    /// Pierwsze brakujące pole (w kolejności kategorii),
    /// potem wymóg co najmniej jednego wariantu.
    pub fn first_missing(&self, descriptor: &CategoryDescriptor) -> Option<String> {
        if let Some(field) = descriptor
            .fields
            .iter()
            .find(|field| !self.fields.contains_key(*field))
        {
            return Some(field.humanized());
        }
        if self.variants.is_empty() {
            return Some(humanize(descriptor.variants_key));
        }
        None
    }
}
