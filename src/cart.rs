//! The pending order: cart lines and their mutation rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Dish;

/// One line of the pending order. Price, name and image are snapshots taken
/// when the dish was added, not live references into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// The dish this line refers to.
    pub id: String,
    /// Dish name at add time.
    pub name: String,
    /// Unit price at add time.
    pub price: Decimal,
    /// Always positive; a line at zero is removed instead.
    pub quantity: u64,
    /// Dish image at add time.
    pub image: String,
}

/// The client's locally held, not-yet-submitted selection of dishes.
///
/// Lines keep insertion order. There is at most one line per dish id:
/// adding a dish that is already present increments its quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from previously persisted lines.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of lines (not total quantity).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of `dish`. Always succeeds; whether the dish is
    /// orderable today is the caller's concern, checked before this call.
    pub fn add(&mut self, dish: &Dish) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == dish.id) {
            item.quantity += 1;
            return;
        }

        self.items.push(CartItem {
            id: dish.id.clone(),
            name: dish.name.clone(),
            price: dish.price,
            quantity: 1,
            image: dish.image.clone(),
        });
    }

    /// Removes the line for `id`; silent no-op when absent.
    pub fn remove(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
    }

    /// Sets the absolute quantity of the line for `id`. A quantity of zero
    /// or less behaves as [`Cart::remove`]. No upper bound is enforced.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        let Ok(quantity) = u64::try_from(quantity) else {
            self.remove(id);
            return;
        };

        if quantity == 0 {
            self.remove(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines, recomputed on every read
    /// so it can never go stale relative to the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.price * Decimal::from(item.quantity))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::catalog::{Dish, DishCategory};

    use super::Cart;

    fn dish(id: &str, price: Decimal) -> Dish {
        Dish {
            id: id.to_string(),
            name: format!("Dish {id}"),
            description: String::new(),
            price,
            category: DishCategory::Primi,
            image: format!("/images/{id}.webp"),
            available: true,
            available_dates: None,
            available_on: None,
        }
    }

    #[test]
    fn adding_the_same_dish_increments_its_line() {
        let mut cart = Cart::new();
        let pasta = dish("d1", Decimal::new(800, 2));

        cart.add(&pasta);
        cart.add(&pasta);
        cart.add(&pasta);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items().first().map(|item| item.quantity), Some(3));
    }

    #[test]
    fn add_snapshots_price_at_add_time() {
        let mut cart = Cart::new();
        let mut pasta = dish("d1", Decimal::new(800, 2));

        cart.add(&pasta);

        // A later catalog price change must not affect the existing line.
        pasta.price = Decimal::new(950, 2);
        cart.add(&pasta);

        assert_eq!(
            cart.items().first().map(|item| item.price),
            Some(Decimal::new(800, 2))
        );
    }

    #[test]
    fn total_is_recomputed_from_lines() {
        let mut cart = Cart::new();
        let pasta = dish("d1", Decimal::new(800, 2));
        let wine = dish("d2", Decimal::new(1200, 2));

        cart.add(&pasta);
        cart.add(&pasta);
        cart.add(&wine);

        assert_eq!(cart.total(), Decimal::new(2800, 2));

        cart.set_quantity("d2", 3);

        assert_eq!(cart.total(), Decimal::new(5200, 2));
    }

    #[test]
    fn zero_and_negative_quantities_remove_the_line() {
        let mut cart = Cart::new();
        let pasta = dish("d1", Decimal::new(800, 2));
        let wine = dish("d2", Decimal::new(1200, 2));

        cart.add(&pasta);
        cart.add(&wine);

        cart.set_quantity("d1", 0);
        cart.set_quantity("d2", -4);

        assert!(cart.is_empty());
    }

    #[test]
    fn removing_an_absent_line_is_a_no_op() {
        let mut cart = Cart::new();
        let pasta = dish("d1", Decimal::new(800, 2));

        cart.add(&pasta);
        cart.remove("d9");

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();

        cart.add(&dish("d1", Decimal::new(800, 2)));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }
}
