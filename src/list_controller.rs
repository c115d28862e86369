// src/list_controller.rs

use crate::category::Category;
use crate::errors::AppError;
use crate::models::{ProductSummary, record_id};
use crate::ports::Notification;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Loading,
    Ready,
}

/// Sesja tabeli produktów: lista, usuwanie i przejście do edycji.
pub struct ProductListController {
    state: AppState,
    products: Vec<ProductSummary>,
    status: ListState,
}

impl ProductListController {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            products: Vec::new(),
            status: ListState::Loading,
        }
    }

    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    pub fn status(&self) -> ListState {
        self.status
    }

    pub fn find(&self, id: i64) -> Option<&ProductSummary> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Błąd zostawia pustą listę; stan i tak przechodzi w `Ready`.
    pub async fn load_summaries(&mut self) -> Result<(), AppError> {
        self.status = ListState::Loading;
        let result = self.state.api.fetch_summaries().await;
        self.status = ListState::Ready;

        match result {
            Ok(products) => {
                tracing::info!("Pobrano {} produktów", products.len());
                self.products = products;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Błąd pobierania produktów: {:?}", e);
                self.products.clear();
                Err(e)
            }
        }
    }

    /// Zwraca `Ok(false)`, gdy użytkownik nie potwierdził usunięcia.
    pub async fn delete(&mut self, id: i64) -> Result<bool, AppError> {
        let confirmed = self
            .state
            .confirmer
            .confirm("Are you sure to delete this product?".to_string())
            .await;
        if !confirmed {
            tracing::debug!("Usuwanie produktu {} anulowane", id);
            return Ok(false);
        }

        match self.state.api.delete_product(id).await {
            Ok(()) => {
                if let Some(position) = self.products.iter().position(|p| p.id == id) {
                    self.products.remove(position);
                }
                self.state.notifier.notify(Notification::success(
                    "Deleted!",
                    "Your product has been deleted.",
                ));
                Ok(true)
            }
            Err(e) => {
                tracing::error!("Błąd usuwania produktu {}: {:?}", id, e);
                self.state.notifier.notify(Notification::error(
                    "Error!",
                    "There was an error deleting the product.",
                ));
                Err(e)
            }
        }
    }

    /// Szuka identyfikatora podzasobu dla kategorii i przechodzi do właściwego formularza.
    pub async fn resolve_edit_target(&self, summary: &ProductSummary) -> Result<String, AppError> {
        let category = match summary.category() {
            Ok(category) => category,
            Err(e) => {
                tracing::warn!("Produkt {} ma nieznaną kategorię: {}", summary.id, e);
                self.notify_edit_error();
                return Err(e);
            }
        };
        let descriptor = category.descriptor();
        let tag = summary.main_product_type.clone().unwrap_or_default();

        let rows = match self.state.api.fetch_by_main_type(tag).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Błąd wyszukiwania produktów kategorii {}: {:?}", category, e);
                self.notify_edit_error();
                return Err(e);
            }
        };

        let Some(target_id) = rows
            .first()
            .and_then(|row| record_id(row, descriptor.record_id_key))
        else {
            tracing::warn!("Brak rekordów kategorii {} dla produktu {}", category, summary.id);
            self.notify_edit_error();
            return Err(AppError::NotFound);
        };

        let route = descriptor.update_route(target_id);
        self.state.navigator.navigate(&route);
        Ok(route)
    }

    /// Przejście do pustego formularza danej kategorii.
    pub fn create_target(&self, category: Category) -> &'static str {
        let route = category.descriptor().create_route();
        self.state.navigator.navigate(route);
        route
    }

    fn notify_edit_error(&self) {
        self.state.notifier.notify(Notification::error(
            "Error!",
            "Could not find the product to edit.",
        ));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::StatusCode;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;
    use crate::api_client::MockCatalogApi;
    use crate::ports::{MockConfirmer, MockNavigator, MockNotifier, NotificationKind};

    fn summary(id: i64, category: &str) -> ProductSummary {
        ProductSummary {
            id,
            name: Some(format!("Product {id}")),
            brand_name: Some("Brand".to_string()),
            sale: Some(json!("no")),
            instock: Some(json!("yes")),
            after_price: Some(json!(80)),
            before_price: Some(json!(100)),
            main_product_type: Some(category.to_string()),
        }
    }

    fn state(
        api: MockCatalogApi,
        notifier: MockNotifier,
        navigator: MockNavigator,
        confirmer: MockConfirmer,
    ) -> AppState {
        AppState {
            api: Arc::new(api),
            notifier: Arc::new(notifier),
            navigator: Arc::new(navigator),
            confirmer: Arc::new(confirmer),
        }
    }

    fn confirming(answer: bool) -> MockConfirmer {
        let mut confirmer = MockConfirmer::new();
        confirmer.expect_confirm().once().return_const(answer);
        confirmer
    }

    async fn loaded(
        api: MockCatalogApi,
        notifier: MockNotifier,
        confirmer: MockConfirmer,
    ) -> ProductListController {
        let mut list =
            ProductListController::new(state(api, notifier, MockNavigator::new(), confirmer));
        list.load_summaries().await.ok();
        list
    }

    fn api_with_three() -> MockCatalogApi {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_summaries().once().returning(|| {
            Ok(vec![
                summary(1, "Watch"),
                summary(2, "Bags"),
                summary(3, "Fragrance"),
            ])
        });
        api
    }

    fn ids(list: &ProductListController) -> Vec<i64> {
        list.products().iter().map(|p| p.id).collect()
    }

    #[tokio::test]
    async fn starts_loading_and_becomes_ready() {
        let list = ProductListController::new(state(
            MockCatalogApi::new(),
            MockNotifier::new(),
            MockNavigator::new(),
            MockConfirmer::new(),
        ));
        assert_eq!(list.status(), ListState::Loading);

        let list = loaded(api_with_three(), MockNotifier::new(), MockConfirmer::new()).await;
        assert_eq!(list.status(), ListState::Ready);
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_load_leaves_empty_ready_list() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_summaries()
            .once()
            .returning(|| Err(AppError::Decode("not json".to_string())));

        let list = loaded(api, MockNotifier::new(), MockConfirmer::new()).await;

        assert_eq!(list.status(), ListState::Ready);
        assert!(list.products().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_removes_only_matching_entry() -> TestResult {
        let mut api = api_with_three();
        api.expect_delete_product()
            .once()
            .withf(|id| *id == 2)
            .returning(|_| Ok(()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(|n| n.kind == NotificationKind::Success)
            .return_const(());

        let mut list = loaded(api, notifier, confirming(true)).await;
        let deleted = list.delete(2).await?;

        assert!(deleted);
        assert_eq!(ids(&list), vec![1, 3]);
        assert_eq!(list.status(), ListState::Ready);
        Ok(())
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() -> TestResult {
        let mut api = api_with_three();
        api.expect_delete_product().never();

        let mut list = loaded(api, MockNotifier::new(), confirming(false)).await;
        let deleted = list.delete(2).await?;

        assert!(!deleted);
        assert_eq!(ids(&list), vec![1, 2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_delete_keeps_collection_and_notifies_error() {
        let mut api = api_with_three();
        api.expect_delete_product().once().returning(|_| {
            Err(AppError::Status {
                status: StatusCode::NOT_FOUND,
                body: String::new(),
            })
        });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(Notification::is_error)
            .return_const(());

        let mut list = loaded(api, notifier, confirming(true)).await;
        let result = list.delete(2).await;

        assert!(result.is_err());
        assert_eq!(ids(&list), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn watch_edit_navigates_to_watch_form_with_first_id() -> TestResult {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_by_main_type()
            .once()
            .withf(|tag| tag == "Watch")
            .returning(|_| Ok(vec![json!({ "WatchID": 11 }), json!({ "WatchID": 12 })]));
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .once()
            .withf(|path| path == "/dashboard/updatewatches/11")
            .return_const(());

        let list = ProductListController::new(state(
            api,
            MockNotifier::new(),
            navigator,
            MockConfirmer::new(),
        ));
        let route = list.resolve_edit_target(&summary(1, "Watch")).await?;

        assert_eq!(route, "/dashboard/updatewatches/11");
        Ok(())
    }

    #[tokio::test]
    async fn bags_tag_resolves_to_bag_form() -> TestResult {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_by_main_type()
            .once()
            .returning(|_| Ok(vec![json!({ "BagID": 5, "id": 99 })]));
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().once().return_const(());

        let list = ProductListController::new(state(
            api,
            MockNotifier::new(),
            navigator,
            MockConfirmer::new(),
        ));
        let route = list.resolve_edit_target(&summary(2, "Bags")).await?;

        assert_eq!(route, "/dashboard/updatebags/5");
        Ok(())
    }

    #[tokio::test]
    async fn unknown_category_notifies_and_does_not_navigate() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_by_main_type().never();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(Notification::is_error)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let list =
            ProductListController::new(state(api, notifier, navigator, MockConfirmer::new()));
        let result = list.resolve_edit_target(&summary(4, "Sunglasses")).await;

        assert!(matches!(result, Err(AppError::UnknownCategory(_))));
    }

    #[tokio::test]
    async fn empty_lookup_notifies_and_does_not_navigate() {
        let mut api = MockCatalogApi::new();
        api.expect_fetch_by_main_type()
            .once()
            .returning(|_| Ok(Vec::new()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .once()
            .withf(Notification::is_error)
            .return_const(());
        let mut navigator = MockNavigator::new();
        navigator.expect_navigate().never();

        let list =
            ProductListController::new(state(api, notifier, navigator, MockConfirmer::new()));
        let result = list.resolve_edit_target(&summary(3, "Fragrance")).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[test]
    fn create_target_navigates_to_category_form() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .once()
            .withf(|path| path == "/addfragrance")
            .return_const(());

        let list = ProductListController::new(state(
            MockCatalogApi::new(),
            MockNotifier::new(),
            navigator,
            MockConfirmer::new(),
        ));

        assert_eq!(list.create_target(Category::Fragrance), "/addfragrance");
    }
}
