//! Admin order board: list state, optimistic status transitions, polling.

use jiff::Timestamp;
use thiserror::Error;
use tracing::{debug, warn};

use sagra::orders::{Order, OrderStatus};

use crate::api::{ApiError, OrderingApi};
use crate::storage::{ClientStorage, ORDERS_FILE};

/// In-memory order list kept consistent with the admin's intent.
///
/// Status transitions are applied optimistically: the local list is
/// rewritten before the network call resolves and is NOT rolled back on
/// failure; the periodic refetch is the reconciliation mechanism, not a
/// compensating transaction.
///
/// Every fetch carries a generation number. A response that resolves after
/// a newer fetch has already been applied is discarded, so a slow stale
/// response can never overwrite newer state.
pub struct OrdersService<'a> {
    api: &'a dyn OrderingApi,
    storage: &'a ClientStorage,
    orders: Vec<Order>,
    next_generation: u64,
    applied_generation: u64,
}

impl<'a> OrdersService<'a> {
    /// Builds the board, hydrating from the snapshot of the last
    /// successful fetch. The snapshot is a stale fallback only,
    /// overwritten by the first refresh.
    #[must_use]
    pub fn open(api: &'a dyn OrderingApi, storage: &'a ClientStorage) -> Self {
        let orders: Vec<Order> = storage.read(ORDERS_FILE).unwrap_or_default();

        Self {
            api,
            storage,
            orders,
            next_generation: 0,
            applied_generation: 0,
        }
    }

    /// The current list, in server order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Looks up one order locally.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    /// Refetches the full list.
    ///
    /// # Errors
    ///
    /// Propagates the API failure; local state is unchanged in that case.
    pub async fn refresh(&mut self) -> Result<(), OrdersError> {
        let generation = self.begin_fetch();
        let fetched = self.api.list_orders().await?;

        self.apply_fetch(generation, fetched);

        Ok(())
    }

    /// Reserves a generation number for a fetch that is about to start.
    #[must_use]
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Applies a fetched list, unless a newer fetch already landed.
    /// Returns whether the response was applied.
    pub fn apply_fetch(&mut self, generation: u64, fetched: Vec<Order>) -> bool {
        if generation <= self.applied_generation {
            debug!(generation, "discarding stale order list response");
            return false;
        }

        self.applied_generation = generation;
        self.orders = fetched;

        // Snapshot cache is best-effort; the in-memory list stays
        // authoritative even when the mirror write fails.
        if let Err(error) = self.storage.write(ORDERS_FILE, &self.orders) {
            warn!(%error, "could not mirror the order snapshot");
        }

        true
    }

    /// Requests a status transition.
    ///
    /// The local entry is rewritten immediately (new status, fresh
    /// `updated_at`) independent of the network outcome; the transition
    /// request then goes out. On failure the optimistic change stays in
    /// place until the next refresh reconciles it.
    ///
    /// # Errors
    ///
    /// Propagates the API failure for a one-shot notification.
    pub async fn set_status(
        &mut self,
        id: &str,
        new_status: OrderStatus,
    ) -> Result<(), OrdersError> {
        if let Some(order) = self.orders.iter_mut().find(|order| order.id == id) {
            order.status = new_status;
            order.updated_at = Timestamp::now();
        }

        self.api.update_order_status(id, new_status).await?;

        Ok(())
    }

    /// Sends the order to the counter printer.
    ///
    /// # Errors
    ///
    /// Propagates the API failure.
    pub async fn print(&self, id: &str) -> Result<(), OrdersError> {
        self.api.print_order(id).await?;

        Ok(())
    }
}

/// Errors from the admin order board.
#[derive(Debug, Error)]
pub enum OrdersError {
    /// The API rejected or failed the request.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use sagra::orders::{Order, OrderStatus};
    use testresult::TestResult;

    use crate::api::{ApiError, MockOrderingApi};
    use crate::storage::ClientStorage;

    use super::OrdersService;

    fn order(id: &str, status: OrderStatus) -> Order {
        let now = Timestamp::UNIX_EPOCH;

        Order {
            id: id.to_string(),
            code: format!("C{id}"),
            name: "Mario".to_string(),
            items: Vec::new(),
            total: Decimal::new(1000, 2),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn transition_is_applied_locally_even_when_the_request_fails() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_list_orders()
            .return_once(|| Ok(vec![order("o1", OrderStatus::DaPagare)]));
        api.expect_update_order_status()
            .withf(|id, status| id == "o1" && *status == OrderStatus::Pagato)
            .return_once(|_, _| {
                Err(ApiError::UnexpectedResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: String::new(),
                })
            });

        let mut board = OrdersService::open(&api, &storage);
        board.refresh().await?;

        let result = board.set_status("o1", OrderStatus::Pagato).await;

        assert!(result.is_err(), "the failure is surfaced for notification");
        assert_eq!(
            board.get("o1").map(|order| order.status),
            Some(OrderStatus::Pagato),
            "the optimistic change is not rolled back"
        );

        Ok(())
    }

    #[tokio::test]
    async fn stale_poll_responses_are_discarded() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;
        let api = MockOrderingApi::new();

        let mut board = OrdersService::open(&api, &storage);

        // Two overlapping fetches: the older one resolves last.
        let slow = board.begin_fetch();
        let fast = board.begin_fetch();

        assert!(board.apply_fetch(fast, vec![order("o2", OrderStatus::DaPagare)]));
        assert!(
            !board.apply_fetch(slow, vec![order("o1", OrderStatus::DaPagare)]),
            "the late stale response must not overwrite newer state"
        );
        assert_eq!(board.orders().first().map(|o| o.id.as_str()), Some("o2"));

        Ok(())
    }

    #[tokio::test]
    async fn refresh_overwrites_the_snapshot_cache() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_list_orders()
            .return_once(|| Ok(vec![order("o1", OrderStatus::Pagato)]));

        {
            let mut board = OrdersService::open(&api, &storage);
            board.refresh().await?;
        }

        // A fresh board starts from the stale snapshot before any fetch.
        let rehydrated = OrdersService::open(&api, &storage);

        assert_eq!(
            rehydrated.orders().first().map(|o| o.id.as_str()),
            Some("o1")
        );

        Ok(())
    }

    #[tokio::test]
    async fn transition_for_an_unknown_order_still_issues_the_request() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = ClientStorage::open(dir.path())?;

        let mut api = MockOrderingApi::new();
        api.expect_update_order_status()
            .withf(|id, _| id == "ghost")
            .return_once(|_, _| Ok(()));

        let mut board = OrdersService::open(&api, &storage);

        board.set_status("ghost", OrderStatus::Annullato).await?;

        Ok(())
    }
}
