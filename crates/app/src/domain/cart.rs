//! The cart store: in-memory source of truth with a durable mirror.

use sagra::cart::{Cart, CartItem};
use sagra::catalog::Dish;
use rust_decimal::Decimal;

use crate::storage::{CART_FILE, ClientStorage, StorageError};

/// Single source of truth for the pending order.
///
/// The in-memory cart is authoritative; durable storage is a mirror
/// rewritten in full after every mutation. Hydration happens once, at
/// `open`, and a missing or malformed document is simply an empty cart.
#[derive(Debug)]
pub struct CartStore<'a> {
    cart: Cart,
    storage: &'a ClientStorage,
}

impl<'a> CartStore<'a> {
    /// Opens the store, hydrating from durable storage.
    #[must_use]
    pub fn open(storage: &'a ClientStorage) -> Self {
        let items: Vec<CartItem> = storage.read(CART_FILE).unwrap_or_default();

        Self {
            cart: Cart::from_items(items),
            storage,
        }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Derived total, recomputed on every read.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// Adds one unit of `dish` and mirrors the cart to storage. The dish's
    /// orderability is checked by the caller, not here.
    ///
    /// # Errors
    ///
    /// Returns an error only when the mirror write fails; the domain
    /// operation itself has no failure conditions.
    pub fn add_item(&mut self, dish: &Dish) -> Result<(), StorageError> {
        self.cart.add(dish);
        self.persist()
    }

    /// Removes the line for `id` (no-op when absent) and mirrors.
    ///
    /// # Errors
    ///
    /// Returns an error when the mirror write fails.
    pub fn remove_item(&mut self, id: &str) -> Result<(), StorageError> {
        self.cart.remove(id);
        self.persist()
    }

    /// Sets an absolute quantity (zero or less removes the line) and
    /// mirrors.
    ///
    /// # Errors
    ///
    /// Returns an error when the mirror write fails.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), StorageError> {
        self.cart.set_quantity(id, quantity);
        self.persist()
    }

    /// Empties the cart and overwrites storage with the empty list.
    ///
    /// # Errors
    ///
    /// Returns an error when the mirror write fails.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.storage.write(CART_FILE, &self.cart.items())
    }
}
