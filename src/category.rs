// src/category.rs

use strum_macros::{Display, EnumIter, EnumString};

use crate::draft::{ProductField, VariantField};

pub const PRODUCTS_ROUTE: &str = "/dashboard/products";

/// Główny typ produktu, decyduje o formularzu i endpointach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    #[strum(to_string = "Watch", serialize = "Watches")]
    Watch,
    #[strum(to_string = "Fragrance", serialize = "Fragrances")]
    Fragrance,
    #[strum(to_string = "Bag", serialize = "Bags")]
    Bag,
}

impl Category {
    pub fn descriptor(self) -> &'static CategoryDescriptor {
        match self {
            Category::Watch => &WATCH,
            Category::Fragrance => &FRAGRANCE,
            Category::Bag => &BAG,
        }
    }
}

/// Wszystko, czym różnią się formularze zegarków, perfum i torebek.
#[derive(Debug)]
pub struct CategoryDescriptor {
    pub category: Category,
    /// Pola skalarne w kolejności walidacji.
    pub fields: &'static [ProductField],
    pub type_field: Option<ProductField>,
    pub type_options_path: Option<&'static str>,
    pub variants_key: &'static str,
    pub variant_parent_key: &'static str,
    /// Klucz identyfikatora w odpowiedzi `/product/bymaintype/{category}`.
    pub record_id_key: &'static str,
    update_route: &'static str,
    create_route: &'static str,
}

impl CategoryDescriptor {
    pub fn update_route(&self, id: i64) -> String {
        format!("{}/{}", self.update_route, id)
    }

    pub fn create_route(&self) -> &'static str {
        self.create_route
    }

    pub fn has_field(&self, field: ProductField) -> bool {
        self.fields.contains(&field)
    }

    pub fn variant_key(&self, field: VariantField) -> &'static str {
        match field {
            VariantField::Parent => self.variant_parent_key,
            other => other.into(),
        }
    }

    pub fn parse_variant_field(&self, name: &str) -> Option<VariantField> {
        if name == self.variant_parent_key {
            return Some(VariantField::Parent);
        }
        name.parse::<VariantField>()
            .ok()
            .filter(|field| *field != VariantField::Parent)
    }
}

static WATCH: CategoryDescriptor = CategoryDescriptor {
    category: Category::Watch,
    fields: &[
        ProductField::Name,
        ProductField::Description,
        ProductField::Sale,
        ProductField::MainProductType,
        ProductField::ProductType,
        ProductField::Season,
        ProductField::BrandId,
        ProductField::WatchTypeId,
        ProductField::Available,
        ProductField::BeforePrice,
        ProductField::AfterPrice,
        ProductField::InStock,
    ],
    type_field: Some(ProductField::WatchTypeId),
    type_options_path: Some("watchtypeid/getwatchtypeid"),
    variants_key: "WatchVariants",
    variant_parent_key: "WatchID",
    record_id_key: "WatchID",
    update_route: "/dashboard/updatewatches",
    create_route: "/addwatches",
};

static FRAGRANCE: CategoryDescriptor = CategoryDescriptor {
    category: Category::Fragrance,
    fields: &[
        ProductField::Name,
        ProductField::Description,
        ProductField::Sale,
        ProductField::MainProductType,
        ProductField::ProductType,
        ProductField::Season,
        ProductField::BrandId,
        ProductField::Available,
        ProductField::BeforePrice,
        ProductField::AfterPrice,
        ProductField::InStock,
    ],
    type_field: None,
    type_options_path: None,
    variants_key: "FragranceVariants",
    variant_parent_key: "FragranceID",
    record_id_key: "FragranceID",
    update_route: "/dashboard/updatefragrance",
    create_route: "/addfragrance",
};

static BAG: CategoryDescriptor = CategoryDescriptor {
    category: Category::Bag,
    fields: &[
        ProductField::Name,
        ProductField::Description,
        ProductField::Sale,
        ProductField::MainProductType,
        ProductField::ProductType,
        ProductField::Season,
        ProductField::BrandId,
        ProductField::BagTypeId,
        ProductField::Available,
        ProductField::BeforePrice,
        ProductField::AfterPrice,
        ProductField::InStock,
    ],
    type_field: Some(ProductField::BagTypeId),
    type_options_path: Some("bagtypeid/getbagtypeid"),
    variants_key: "BagVariants",
    variant_parent_key: "BagID",
    record_id_key: "BagID",
    update_route: "/dashboard/updatebags",
    create_route: "/addbags",
};
