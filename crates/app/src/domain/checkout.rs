//! Order submission: cart contents become a durable order, exactly once
//! per confirmation.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use sagra::orders::Order;

use crate::api::records::NewOrderRequest;
use crate::api::{ApiError, OrderingApi};
use crate::domain::cart::CartStore;
use crate::storage::{ClientStorage, LAST_ORDER_FILE, StorageError};

/// Reference to the most recently submitted order, kept for the receipt
/// shortcut.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrderRef {
    /// Order identifier.
    pub id: String,
    /// Creation instant of the order.
    pub date: Timestamp,
}

/// Submission workflow over the ordering API.
pub struct CheckoutService<'a> {
    api: &'a dyn OrderingApi,
    storage: &'a ClientStorage,
}

impl<'a> CheckoutService<'a> {
    /// Builds the workflow on an API handle and the storage directory.
    #[must_use]
    pub fn new(api: &'a dyn OrderingApi, storage: &'a ClientStorage) -> Self {
        Self { api, storage }
    }

    /// Submits the current cart under the customer's `name`.
    ///
    /// The exclusive borrow of the cart store freezes it for the whole
    /// call, so no mutation can interleave with the in-flight request; the
    /// payload is a snapshot taken here. On success the cart is cleared
    /// (mirror included) and the last-order reference persisted; on any
    /// failure the cart is left untouched so the customer can retry.
    ///
    /// A fresh `clientReference` is attached per confirmation, so a retry
    /// after a reported failure is a new submission by design.
    ///
    /// # Errors
    ///
    /// Rejects a blank name or an empty cart before any network call;
    /// otherwise propagates API and storage failures.
    pub async fn submit(
        &self,
        cart: &mut CartStore<'_>,
        name: &str,
    ) -> Result<Order, CheckoutError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(CheckoutError::MissingName);
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let request = NewOrderRequest {
            items: cart.items().to_vec(),
            name: name.to_string(),
            client_reference: Uuid::now_v7().to_string(),
        };

        let order = self.api.create_order(request).await?;

        cart.clear()?;

        self.storage.write(
            LAST_ORDER_FILE,
            &LastOrderRef {
                id: order.id.clone(),
                date: order.created_at,
            },
        )?;

        info!(order_id = %order.id, code = %order.code, "order submitted");

        Ok(order)
    }

    /// The persisted last-order reference, if any.
    #[must_use]
    pub fn last_order(&self) -> Option<LastOrderRef> {
        self.storage.read(LAST_ORDER_FILE)
    }
}

/// Errors from the submission workflow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The customer name is required before submission.
    #[error("customer name is required")]
    MissingName,

    /// An empty cart cannot be submitted.
    #[error("cannot submit an empty cart")]
    EmptyCart,

    /// The API rejected or failed the submission; the cart is preserved.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The post-success bookkeeping failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
