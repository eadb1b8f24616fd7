//! Wire payloads for the ordering API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sagra::cart::CartItem;
use sagra::catalog::{DishCategory, DishDraft};
use sagra::dates::ServiceDate;

/// Order submission payload. The server assigns `id`, `code`, `total`,
/// `status` and the timestamps; the client never sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderRequest {
    /// Snapshot of the cart lines at submission time.
    pub items: Vec<CartItem>,
    /// Customer display name; required non-empty.
    pub name: String,
    /// Client-generated idempotency token, so a retried submission can be
    /// deduplicated server-side.
    pub client_reference: String,
}

/// Body of a status transition request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// Requested status, wire-encoded.
    pub status: sagra::orders::OrderStatus,
}

/// Dish creation payload (no id; the server assigns it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDish {
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Menu category.
    pub category: DishCategory,
    /// Image URI.
    pub image: String,
    /// Master availability switch.
    pub available: bool,
    /// Calendar days the dish may be ordered on.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub available_dates: Vec<ServiceDate>,
    /// Legacy single-date field, aligned to the first available date.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub available_on: Option<ServiceDate>,
}

impl NewDish {
    /// Builds the payload from a validated admin form.
    ///
    /// Call only after [`DishDraft::validate`] has passed.
    #[must_use]
    pub fn from_draft(draft: &DishDraft, category: DishCategory) -> Self {
        let available_dates = draft.service_dates();
        let available_on = available_dates.first().cloned();

        Self {
            name: draft.name.trim().to_string(),
            description: draft.description.clone(),
            price: draft.price,
            category,
            image: draft.image.trim().to_string(),
            available: draft.available,
            available_dates,
            available_on,
        }
    }
}

/// Partial dish update; only the populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishUpdate {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// New unit price.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<Decimal>,
    /// New category.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<DishCategory>,
    /// New image URI.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
    /// New master switch value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub available: Option<bool>,
    /// New date list.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub available_dates: Option<Vec<ServiceDate>>,
    /// New legacy single date.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub available_on: Option<ServiceDate>,
}

impl DishUpdate {
    /// Full update from a validated admin form.
    #[must_use]
    pub fn from_draft(draft: &DishDraft, category: DishCategory) -> Self {
        let new = NewDish::from_draft(draft, category);

        Self {
            name: Some(new.name),
            description: Some(new.description),
            price: Some(new.price),
            category: Some(new.category),
            image: Some(new.image),
            available: Some(new.available),
            available_on: new.available_on,
            available_dates: Some(new.available_dates),
        }
    }

    /// Partial update flipping only the master availability switch.
    #[must_use]
    pub fn availability(available: bool) -> Self {
        Self {
            available: Some(available),
            ..Self::default()
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Admin username.
    pub username: String,
    /// Admin password.
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent admin calls.
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sagra::catalog::{DishCategory, DishDraft};
    use testresult::TestResult;

    use super::{DishUpdate, NewDish, NewOrderRequest};

    #[test]
    fn order_payload_uses_camel_case_field_names() -> TestResult {
        let payload = NewOrderRequest {
            items: Vec::new(),
            name: "Mario".to_string(),
            client_reference: "ref-1".to_string(),
        };

        let encoded = serde_json::to_string(&payload)?;

        assert!(
            encoded.contains("\"clientReference\""),
            "wire casing must be camelCase: {encoded}"
        );

        Ok(())
    }

    #[test]
    fn availability_patch_sends_only_the_switch() -> TestResult {
        let encoded = serde_json::to_string(&DishUpdate::availability(false))?;

        assert_eq!(encoded, "{\"available\":false}");

        Ok(())
    }

    #[test]
    fn new_dish_aligns_the_legacy_date_to_the_first_entry() -> TestResult {
        let mut draft = DishDraft {
            name: "Pizza Fritta".to_string(),
            description: String::new(),
            price: Decimal::new(650, 2),
            category: Some(DishCategory::PizzeFritte),
            image: "/images/pizza.webp".to_string(),
            available: true,
            available_dates: Vec::new(),
        };
        draft.add_date("2025-09-14")?;
        draft.add_date("2025-09-12")?;

        let payload = NewDish::from_draft(&draft, DishCategory::PizzeFritte);

        assert_eq!(
            payload.available_on.as_ref().map(ToString::to_string),
            Some("2025-09-12".to_string())
        );

        Ok(())
    }
}
