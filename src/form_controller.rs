// src/form_controller.rs

use crate::category::{Category, CategoryDescriptor, PRODUCTS_ROUTE};
use crate::draft::{ProductDraft, ProductField, VariantField};
use crate::errors::AppError;
use crate::models::{ImageAttachment, ReferenceOption};
use crate::payload::{SaveTarget, build_payload};
use crate::ports::Notification;
use crate::state::AppState;

/// Sesja formularza jednego produktu: szkic, warianty, listy wyboru i zapis.
pub struct ProductFormController {
    state: AppState,
    descriptor: &'static CategoryDescriptor,
    id: Option<i64>,
    draft: ProductDraft,
    brands: Vec<ReferenceOption>,
    type_options: Vec<ReferenceOption>,
}

impl ProductFormController {
    pub fn new(state: AppState, category: Category) -> Self {
        let descriptor = category.descriptor();
        Self {
            state,
            descriptor,
            id: None,
            draft: ProductDraft::blank(descriptor),
            brands: Vec::new(),
            type_options: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn brands(&self) -> &[ReferenceOption] {
        &self.brands
    }

    pub fn type_options(&self) -> &[ReferenceOption] {
        &self.type_options
    }

    /// Tryb edycji. Przy błędzie szkic zostaje domyślny; bez powiadomienia, tylko log.
    pub async fn load(&mut self, id: i64) -> Result<(), AppError> {
        self.id = Some(id);

        match self.state.api.fetch_product(id).await {
            Ok(record) => {
                self.draft = ProductDraft::from_record(&record, self.descriptor);
                tracing::debug!("Wczytano produkt o ID: {}", id);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Błąd pobierania produktu {}: {:?}", id, e);
                Err(e)
            }
        }
    }

    /// Marki i typy pobierane równolegle; błąd jednej listy nie blokuje drugiej.
    pub async fn load_reference_options(&mut self) {
        let api = &self.state.api;
        let (brands, types) = tokio::join!(
            api.fetch_brands(),
            api.fetch_type_options(self.descriptor.category)
        );

        match brands {
            Ok(brands) => self.brands = brands,
            Err(e) => tracing::error!("Błąd pobierania marek: {:?}", e),
        }
        match types {
            Ok(types) => self.type_options = types,
            Err(e) => tracing::error!(
                "Błąd pobierania typów dla kategorii {}: {:?}",
                self.descriptor.category,
                e
            ),
        }
    }

    pub fn set_field(&mut self, field: ProductField, value: &str) -> Result<(), AppError> {
        if !self.descriptor.has_field(field) {
            return Err(AppError::UnknownField(field.to_string()));
        }
        self.draft = self.draft.with_input(field, value);
        Ok(())
    }

    /// Wersja dla nazw pól przychodzących z formularza/CLI.
    pub fn set_field_by_name(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        let field = name
            .parse::<ProductField>()
            .map_err(|_| AppError::UnknownField(name.to_string()))?;
        self.set_field(field, value)
    }

    pub fn set_variant_field(&mut self, index: usize, field: VariantField, value: &str) {
        if index >= self.draft.variants().len() {
            tracing::warn!("Indeks wariantu {} poza zakresem, pomijam", index);
            return;
        }
        self.draft = self.draft.with_variant_field(index, field, value);
    }

    pub fn set_variant_field_by_name(
        &mut self,
        index: usize,
        name: &str,
        value: &str,
    ) -> Result<(), AppError> {
        let field = self
            .descriptor
            .parse_variant_field(name)
            .ok_or_else(|| AppError::UnknownField(name.to_string()))?;
        self.set_variant_field(index, field, value);
        Ok(())
    }

    pub fn add_variant(&mut self) {
        self.draft = self.draft.with_added_variant();
    }

    pub fn attach_image(&mut self, image: ImageAttachment) {
        self.draft = self.draft.with_image(Some(image));
    }

    pub fn clear_image(&mut self) {
        self.draft = self.draft.with_image(None);
    }

    pub fn validate(&self) -> Result<(), AppError> {
        match self.draft.first_missing(self.descriptor) {
            Some(field) => Err(AppError::MissingField(field)),
            None => Ok(()),
        }
    }

    /// Walidacja, zapis (multipart z obrazkiem, inaczej JSON), powiadomienie i powrót do listy.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        if let Err(e) = self.validate() {
            if let AppError::MissingField(field) = &e {
                self.state
                    .notifier
                    .notify(Notification::error("Error!", &format!("{} is required.", field)));
            }
            return Err(e);
        }

        let target = SaveTarget::for_id(self.id);
        let payload = build_payload(&self.draft, self.descriptor);
        tracing::info!(
            "Wysyłanie produktu ({:?}, multipart: {})",
            target,
            payload.is_multipart()
        );

        match self.state.api.save_product(target, payload).await {
            Ok(()) => {
                let (title, text) = match target {
                    SaveTarget::Create => (
                        "Successfully Added!",
                        "The product has been added successfully",
                    ),
                    SaveTarget::Update(_) => (
                        "Successfully Updated!",
                        "The product has been updated successfully",
                    ),
                };
                self.state.notifier.notify(Notification::success(title, text));
                self.state.navigator.navigate(PRODUCTS_ROUTE);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Błąd zapisu produktu: {:?}", e);
                self.state.notifier.notify(Notification::error(
                    "Error!",
                    "There was a problem saving the product. Please try again.",
                ));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mockall::predicate::eq;
    use reqwest::StatusCode;
    use serde_json::{Map, Value, json};
    use testresult::TestResult;

    use super::*;
    use crate::api_client::MockCatalogApi;
    use crate::payload::ProductPayload;
    use crate::ports::{MockConfirmer, MockNavigator, MockNotifier, NotificationKind};

    fn state(api: MockCatalogApi, notifier: MockNotifier, navigator: MockNavigator) -> AppState {
        AppState {
            api: Arc::new(api),
            notifier: Arc::new(notifier),
            navigator: Arc::new(navigator),
            confirmer: Arc::new(MockConfirmer::new()),
        }
    }

    fn watch_record() -> Map<String, Value> {
        json!({
            "name": "Seamaster",
            "description": "Diver watch",
            "sale": "no",
            "main_product_type": "Watch",
            "product_type": "Men",
            "season": "All",
            "brandID": 4,
            "WatchTypeID": 2,
            "available": "yes",
            "before_price": 120,
            "after_price": 100,
            "instock": "yes",
            "WatchVariants": [
                {
                    "WatchID": 2,
                    "size": "42mm",
                    "available": "yes",
                    "before_price": 120,
                    "after_price": 100
                }
            ]
        })
        .as_object()
        .cloned()
        .unwrap_or_default()
    }

    fn filled_bag_form(state: AppState) -> ProductFormController {
        let mut form = ProductFormController::new(state, Category::Bag);
        for field in Category::Bag.descriptor().fields {
            form.draft = form.draft.with_input(*field, "1");
        }
        form
    }

    #[tokio::test]
    async fn load_then_edit_price_then_submit_updates_with_fetched_fields() -> TestResult {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_product()
            .with(eq(42))
            .once()
            .returning(|_| Ok(watch_record()));
        api.expect_save_product()
            .once()
            .withf(|target, payload| {
                let ProductPayload::Json(body) = payload else {
                    return false;
                };
                let fetched = watch_record();
                *target == SaveTarget::Update(42)
                    && body["after_price"] == json!("80")
                    && fetched
                        .iter()
                        .filter(|(key, _)| key.as_str() != "after_price")
                        .all(|(key, value)| body.get(key) == Some(value))
            })
            .returning(|_, _| Ok(()));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Success)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .once()
            .withf(|path| path == PRODUCTS_ROUTE)
            .return_const(());

        let mut form = ProductFormController::new(state(api, notifier, navigator), Category::Watch);
        form.load(42).await?;
        assert_eq!(form.draft().field(ProductField::AfterPrice), Some(&json!(100)));
        assert_eq!(form.draft().field(ProductField::InStock), Some(&json!("Yes")));

        form.set_field(ProductField::AfterPrice, "80")?;
        form.submit().await?;
        Ok(())
    }

    #[tokio::test]
    async fn failed_load_keeps_defaults_without_notification() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_product()
            .returning(|_| Err(AppError::NotFound));

        let mut form = ProductFormController::new(
            state(api, MockNotifier::new(), MockNavigator::new()),
            Category::Bag,
        );
        let result = form.load(7).await;

        assert!(matches!(result, Err(AppError::NotFound)));
        assert_eq!(form.id(), Some(7));
        assert_eq!(form.draft(), &ProductDraft::blank(Category::Bag.descriptor()));
    }

    #[tokio::test]
    async fn reference_options_load_independently() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_brands().returning(|| {
            Err(AppError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "boom".to_string(),
            })
        });
        api.expect_fetch_type_options()
            .with(eq(Category::Bag))
            .returning(|_| {
                Ok(vec![ReferenceOption {
                    id: 1,
                    label: "Tote".to_string(),
                }])
            });

        let mut form = ProductFormController::new(
            state(api, MockNotifier::new(), MockNavigator::new()),
            Category::Bag,
        );
        form.load_reference_options().await;

        assert!(form.brands().is_empty());
        assert_eq!(form.type_options().len(), 1);
    }

    #[test]
    fn empty_input_clears_field() -> TestResult {
        let mut form = ProductFormController::new(
            state(MockCatalogApi::new(), MockNotifier::new(), MockNavigator::new()),
            Category::Fragrance,
        );
        form.set_field_by_name("season", "Winter")?;
        form.set_field_by_name("season", "")?;

        assert_eq!(form.draft().field(ProductField::Season), None);
        Ok(())
    }

    #[test]
    fn type_field_of_other_category_is_rejected() {
        let mut form = ProductFormController::new(
            state(MockCatalogApi::new(), MockNotifier::new(), MockNavigator::new()),
            Category::Bag,
        );

        assert!(matches!(
            form.set_field(ProductField::WatchTypeId, "3"),
            Err(AppError::UnknownField(_))
        ));
        assert!(matches!(
            form.set_field_by_name("colour", "red"),
            Err(AppError::UnknownField(_))
        ));
    }

    #[test]
    fn variant_edits_and_additions() -> TestResult {
        let mut form = ProductFormController::new(
            state(MockCatalogApi::new(), MockNotifier::new(), MockNavigator::new()),
            Category::Bag,
        );
        form.add_variant();
        form.set_variant_field_by_name(1, "BagID", "5")?;
        form.set_variant_field(9, VariantField::Size, "XL");

        assert_eq!(form.draft().variants().len(), 2);
        assert_eq!(
            form.draft().variants().get(1).and_then(|v| v.get(VariantField::Parent)),
            Some(&json!("5"))
        );
        assert!(form.set_variant_field_by_name(0, "WatchID", "1").is_err());
        Ok(())
    }

    #[test]
    fn validate_names_first_missing_field() {
        let mut form = ProductFormController::new(
            state(MockCatalogApi::new(), MockNotifier::new(), MockNavigator::new()),
            Category::Bag,
        );
        form.draft = form.draft.with_input(ProductField::Name, "Tote");

        assert!(matches!(
            form.validate(),
            Err(AppError::MissingField(field)) if field == "description"
        ));
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_network() {
        let mut api = MockCatalogApi::new();
        api.expect_save_product().never();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.is_error() && n.text == "after price is required.")
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let mut form = filled_bag_form(state(api, notifier, navigator));
        form.set_field(ProductField::AfterPrice, "").ok();

        let result = form.submit().await;

        assert!(result.as_ref().is_err_and(AppError::is_validation));
    }

    #[tokio::test]
    async fn submit_with_image_creates_product_as_multipart() -> TestResult {
        let mut api = MockCatalogApi::new();
        api.expect_save_product()
            .once()
            .withf(|target, payload| *target == SaveTarget::Create && payload.is_multipart())
            .returning(|_, _| Ok(()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Success && n.title == "Successfully Added!")
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().once().return_const(());

        let mut form = filled_bag_form(state(api, notifier, navigator));
        form.attach_image(ImageAttachment {
            file_name: "bag.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![137, 80, 78, 71],
        });

        form.submit().await?;
        Ok(())
    }

    #[tokio::test]
    async fn failed_submit_notifies_and_keeps_draft() {
        let mut api = MockCatalogApi::new();
        api.expect_save_product()
            .once()
            .withf(|_, payload| !payload.is_multipart())
            .returning(|_, _| {
                Err(AppError::Status {
                    status: StatusCode::BAD_REQUEST,
                    body: "bad".to_string(),
                })
            });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(Notification::is_error)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let mut form = filled_bag_form(state(api, notifier, navigator));
        form.attach_image(ImageAttachment {
            file_name: "bag.png".to_string(),
            mime_type: "image/png".to_string(),
            bytes: vec![1],
        });
        form.clear_image();
        let before = form.draft().clone();

        let result = form.submit().await;

        assert!(matches!(result, Err(AppError::Status { .. })));
        assert_eq!(form.draft(), &before);
    }
}
