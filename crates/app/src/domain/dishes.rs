//! Admin dish management: catalog CRUD with local validation first.

use thiserror::Error;
use tracing::warn;

use sagra::catalog::{Dish, DishCategory, DishDraft, DishValidationErrors, FieldError};

use crate::api::records::{DishUpdate, NewDish};
use crate::api::{ApiError, OrderingApi};
use crate::storage::{ClientStorage, DISHES_FILE};

/// In-memory dish list for the admin desk and the storefront menu.
pub struct DishesService<'a> {
    api: &'a dyn OrderingApi,
    storage: &'a ClientStorage,
    dishes: Vec<Dish>,
}

impl<'a> DishesService<'a> {
    /// Builds the service, hydrating from the snapshot of the last
    /// successful fetch, which is a stale fallback only.
    #[must_use]
    pub fn open(api: &'a dyn OrderingApi, storage: &'a ClientStorage) -> Self {
        let dishes: Vec<Dish> = storage.read(DISHES_FILE).unwrap_or_default();

        Self {
            api,
            storage,
            dishes,
        }
    }

    /// The current catalog.
    #[must_use]
    pub fn dishes(&self) -> &[Dish] {
        &self.dishes
    }

    /// Looks up one dish locally.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Dish> {
        self.dishes.iter().find(|dish| dish.id == id)
    }

    /// Refetches the catalog and overwrites the snapshot cache.
    ///
    /// # Errors
    ///
    /// Propagates the API failure; local state is unchanged in that case.
    pub async fn refresh(&mut self) -> Result<(), DishesError> {
        self.dishes = self.api.list_dishes().await?;

        if let Err(error) = self.storage.write(DISHES_FILE, &self.dishes) {
            warn!(%error, "could not mirror the dish snapshot");
        }

        Ok(())
    }

    /// Creates a dish from a validated form. On any field error no request
    /// is sent.
    ///
    /// # Errors
    ///
    /// Returns the per-field validation messages, or the API failure.
    pub async fn create(&mut self, draft: &DishDraft) -> Result<Dish, DishesError> {
        let category = Self::validated_category(draft)?;

        let created = self
            .api
            .create_dish(NewDish::from_draft(draft, category))
            .await?;

        self.dishes.push(created.clone());

        Ok(created)
    }

    /// Updates a dish from a validated form, reconciling the local entry
    /// with the returned entity.
    ///
    /// # Errors
    ///
    /// Returns the per-field validation messages, or the API failure.
    pub async fn update(&mut self, id: &str, draft: &DishDraft) -> Result<(), DishesError> {
        let category = Self::validated_category(draft)?;

        let updated = self
            .api
            .update_dish(id, DishUpdate::from_draft(draft, category))
            .await?;

        if let Some(entry) = self.dishes.iter_mut().find(|dish| dish.id == id) {
            *entry = updated;
        }

        Ok(())
    }

    /// Deletes a dish. The local entry is removed only after the API
    /// confirms the deletion.
    ///
    /// # Errors
    ///
    /// Propagates the API failure; the local list keeps the entry then.
    pub async fn delete(&mut self, id: &str) -> Result<(), DishesError> {
        self.api.delete_dish(id).await?;

        self.dishes.retain(|dish| dish.id != id);

        Ok(())
    }

    /// Flips the master availability switch, optimistically.
    ///
    /// The local entry changes immediately; on failure it is NOT rolled
    /// back. The next refresh reconciles, same policy as order status
    /// transitions.
    ///
    /// # Errors
    ///
    /// Propagates the API failure for a one-shot notification.
    pub async fn toggle_availability(
        &mut self,
        id: &str,
        available: bool,
    ) -> Result<(), DishesError> {
        if let Some(dish) = self.dishes.iter_mut().find(|dish| dish.id == id) {
            dish.available = available;
        }

        self.api
            .update_dish(id, DishUpdate::availability(available))
            .await?;

        Ok(())
    }

    fn validated_category(draft: &DishDraft) -> Result<DishCategory, DishesError> {
        draft.validate()?;

        draft.category.ok_or_else(|| {
            DishesError::Validation(DishValidationErrors(vec![FieldError {
                field: "category",
                message: "La categoria è obbligatoria".to_string(),
            }]))
        })
    }
}

/// Errors from the admin dish desk.
#[derive(Debug, Error)]
pub enum DishesError {
    /// The form failed local validation; no request was sent.
    #[error(transparent)]
    Validation(#[from] DishValidationErrors),

    /// The API rejected or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use sagra::catalog::{Dish, DishCategory, DishDraft};
    use testresult::TestResult;

    use crate::api::{ApiError, MockOrderingApi};
    use crate::storage::ClientStorage;

    use super::{DishesError, DishesService};

    fn dish(id: &str, available: bool) -> Dish {
        Dish {
            id: id.to_string(),
            name: format!("Dish {id}"),
            description: String::new(),
            price: Decimal::new(500, 2),
            category: DishCategory::Primi,
            image: String::new(),
            available,
            available_dates: None,
            available_on: None,
        }
    }

    fn valid_draft() -> DishDraft {
        DishDraft {
            name: "Pizza Fritta".to_string(),
            description: String::new(),
            price: Decimal::new(650, 2),
            category: Some(DishCategory::PizzeFritte),
            image: "/images/pizza.webp".to_string(),
            available: true,
            available_dates: Vec::new(),
        }
    }

    #[tokio::test]
    async fn invalid_form_sends_no_request() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        // No expectations: any API call would panic the test.
        let api = MockOrderingApi::new();
        let mut desk = DishesService::open(&api, &storage);

        let mut draft = valid_draft();
        draft.price = Decimal::ZERO;

        let result = desk.create(&draft).await;

        assert!(matches!(result, Err(DishesError::Validation(_))));
        assert!(desk.dishes().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_appends_the_returned_entity() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_create_dish()
            .withf(|new| new.name == "Pizza Fritta")
            .return_once(|_| Ok(dish("d9", true)));

        let mut desk = DishesService::open(&api, &storage);
        let created = desk.create(&valid_draft()).await?;

        assert_eq!(created.id, "d9");
        assert!(desk.get("d9").is_some());

        Ok(())
    }

    #[tokio::test]
    async fn toggle_is_optimistic_and_not_rolled_back() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_list_dishes()
            .return_once(|| Ok(vec![dish("d1", true)]));
        api.expect_update_dish()
            .withf(|id, update| id == "d1" && update.available == Some(false))
            .return_once(|_, _| {
                Err(ApiError::UnexpectedResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                })
            });

        let mut desk = DishesService::open(&api, &storage);
        desk.refresh().await?;

        let result = desk.toggle_availability("d1", false).await;

        assert!(result.is_err());
        assert_eq!(
            desk.get("d1").map(|dish| dish.available),
            Some(false),
            "the optimistic change stays until the next refresh"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_the_entry_only_after_success() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_list_dishes()
            .return_once(|| Ok(vec![dish("d1", true), dish("d2", true)]));
        api.expect_delete_dish()
            .withf(|id| id == "d1")
            .return_once(|_| Ok(()));
        api.expect_delete_dish()
            .withf(|id| id == "d2")
            .return_once(|_| {
                Err(ApiError::UnexpectedResponse {
                    status: StatusCode::FORBIDDEN,
                    body: String::new(),
                })
            });

        let mut desk = DishesService::open(&api, &storage);
        desk.refresh().await?;

        desk.delete("d1").await?;

        assert!(desk.get("d1").is_none());

        let result = desk.delete("d2").await;

        assert!(result.is_err());
        assert!(
            desk.get("d2").is_some(),
            "a failed delete keeps the local entry"
        );

        Ok(())
    }
}
