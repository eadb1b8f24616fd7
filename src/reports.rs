//! Per-day admin reports over fetched orders.
//!
//! Cancelled orders are skipped entirely; revenue is `price * quantity` of
//! the snapshotted lines. Day attribution and line times are computed under
//! an injected time zone.

use jiff::tz::TimeZone;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;

use crate::catalog::{Dish, DishCategory};
use crate::dates::ServiceDate;
use crate::orders::{Order, OrderStatus, service_day};

/// One order touching a dish, for the per-dish detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Order identifier.
    pub order_id: String,
    /// Human-facing order code.
    pub code: String,
    /// Customer display name.
    pub customer: String,
    /// Quantity of the dish in this order.
    pub quantity: u64,
    /// Local `HH:MM` time the order was created.
    pub time: String,
    /// Order status at report time.
    pub status: OrderStatus,
}

/// Aggregated figures for one dish on the selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct DishTotals {
    /// Dish identifier.
    pub id: String,
    /// Dish name, falling back to the raw id when the dish has been
    /// removed from the catalog since the order was taken.
    pub name: String,
    /// Units sold.
    pub quantity: u64,
    /// Revenue from the snapshotted line prices.
    pub revenue: Decimal,
    /// Contributing orders, sorted by time of day.
    pub lines: Vec<OrderLine>,
}

/// Per-dish entry inside a category breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDish {
    /// Dish name.
    pub name: String,
    /// Units sold.
    pub quantity: u64,
    /// Revenue from the snapshotted line prices.
    pub revenue: Decimal,
}

/// Aggregated figures for one category on the selected day.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    /// The category.
    pub category: DishCategory,
    /// Units sold across the category.
    pub quantity: u64,
    /// Revenue across the category.
    pub revenue: Decimal,
    /// Per-dish breakdown, sorted by quantity descending.
    pub dishes: Vec<CategoryDish>,
}

/// The full report for one service day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    /// The day the report covers.
    pub day: ServiceDate,
    /// Per-dish aggregation, sorted by quantity descending.
    pub per_dish: Vec<DishTotals>,
    /// Per-category aggregation, sorted by quantity descending. Lines
    /// whose dish is no longer in the catalog are skipped here, since the
    /// category is unknown.
    pub per_category: Vec<CategoryTotals>,
}

/// Builds the report for `day` from the fetched order list and the current
/// catalog.
#[must_use]
pub fn day_report(orders: &[Order], dishes: &[Dish], day: &ServiceDate, tz: &TimeZone) -> DayReport {
    let for_day: Vec<&Order> = orders
        .iter()
        .filter(|order| service_day(order.created_at, tz) == *day)
        .filter(|order| order.status != OrderStatus::Annullato)
        .collect();

    DayReport {
        day: day.clone(),
        per_dish: per_dish(&for_day, dishes, tz),
        per_category: per_category(&for_day, dishes),
    }
}

fn per_dish(orders: &[&Order], dishes: &[Dish], tz: &TimeZone) -> Vec<DishTotals> {
    let mut totals: FxHashMap<&str, (u64, Decimal)> = FxHashMap::default();
    let mut details: FxHashMap<&str, Vec<OrderLine>> = FxHashMap::default();

    for order in orders {
        let time = order
            .created_at
            .to_zoned(tz.clone())
            .strftime("%H:%M")
            .to_string();

        for item in &order.items {
            let entry = totals.entry(&item.id).or_default();
            entry.0 += item.quantity;
            entry.1 += item.price * Decimal::from(item.quantity);

            details.entry(&item.id).or_default().push(OrderLine {
                order_id: order.id.clone(),
                code: order.code.clone(),
                customer: order.name.clone(),
                quantity: item.quantity,
                time: time.clone(),
                status: order.status,
            });
        }
    }

    let mut rows: Vec<DishTotals> = totals
        .into_iter()
        .map(|(id, (quantity, revenue))| {
            let name = dishes
                .iter()
                .find(|dish| dish.id == id)
                .map_or_else(|| id.to_string(), |dish| dish.name.clone());

            let mut lines = details.remove(id).unwrap_or_default();
            lines.sort_by(|a, b| a.time.cmp(&b.time));

            DishTotals {
                id: id.to_string(),
                name,
                quantity,
                revenue,
                lines,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    rows
}

fn per_category(orders: &[&Order], dishes: &[Dish]) -> Vec<CategoryTotals> {
    let mut totals: FxHashMap<DishCategory, (u64, Decimal)> = FxHashMap::default();
    let mut by_dish: FxHashMap<DishCategory, FxHashMap<&str, CategoryDish>> = FxHashMap::default();

    for order in orders {
        for item in &order.items {
            let Some(dish) = dishes.iter().find(|dish| dish.id == item.id) else {
                continue;
            };

            let revenue = item.price * Decimal::from(item.quantity);

            let entry = totals.entry(dish.category).or_default();
            entry.0 += item.quantity;
            entry.1 += revenue;

            let breakdown = by_dish
                .entry(dish.category)
                .or_default()
                .entry(&item.id)
                .or_insert_with(|| CategoryDish {
                    name: dish.name.clone(),
                    quantity: 0,
                    revenue: Decimal::ZERO,
                });
            breakdown.quantity += item.quantity;
            breakdown.revenue += revenue;
        }
    }

    let mut rows: Vec<CategoryTotals> = totals
        .into_iter()
        .map(|(category, (quantity, revenue))| {
            let mut dishes: Vec<CategoryDish> = by_dish
                .remove(&category)
                .unwrap_or_default()
                .into_values()
                .collect();
            dishes.sort_by(|a, b| b.quantity.cmp(&a.quantity));

            CategoryTotals {
                category,
                quantity,
                revenue,
                dishes,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));

    rows
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use jiff::tz::TimeZone;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::cart::CartItem;
    use crate::catalog::{Dish, DishCategory};
    use crate::orders::{Order, OrderStatus};

    use super::day_report;

    fn item(id: &str, price: Decimal, quantity: u64) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: format!("Dish {id}"),
            price,
            quantity,
            image: String::new(),
        }
    }

    fn order(id: &str, created_at: &str, status: OrderStatus, items: Vec<CartItem>) -> Order {
        let created_at: Timestamp = created_at.parse().unwrap_or(Timestamp::UNIX_EPOCH);
        let total = items
            .iter()
            .map(|line| line.price * Decimal::from(line.quantity))
            .sum();

        Order {
            id: id.to_string(),
            code: format!("C{id}"),
            name: "Mario".to_string(),
            items,
            total,
            status,
            created_at,
            updated_at: created_at,
        }
    }

    fn dish(id: &str, name: &str, category: DishCategory) -> Dish {
        Dish {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(500, 2),
            category,
            image: String::new(),
            available: true,
            available_dates: None,
            available_on: None,
        }
    }

    #[test]
    fn aggregates_per_dish_and_skips_cancelled_orders() -> TestResult {
        let dishes = vec![
            dish("d1", "Porchetta", DishCategory::Porchetta),
            dish("d2", "Anguria", DishCategory::FruttaDolci),
        ];
        let orders = vec![
            order(
                "o1",
                "2025-09-12T18:00:00Z",
                OrderStatus::DaPagare,
                vec![item("d1", Decimal::new(800, 2), 2)],
            ),
            order(
                "o2",
                "2025-09-12T19:30:00Z",
                OrderStatus::Pagato,
                vec![
                    item("d1", Decimal::new(800, 2), 1),
                    item("d2", Decimal::new(300, 2), 4),
                ],
            ),
            order(
                "o3",
                "2025-09-12T20:00:00Z",
                OrderStatus::Annullato,
                vec![item("d1", Decimal::new(800, 2), 10)],
            ),
        ];

        let report = day_report(&orders, &dishes, &"2025-09-12".parse()?, &TimeZone::UTC);

        let anguria = report
            .per_dish
            .iter()
            .find(|row| row.id == "d2")
            .ok_or("missing d2 row")?;

        assert_eq!(report.per_dish.first().map(|row| row.id.as_str()), Some("d2"));
        assert_eq!(anguria.quantity, 4);
        assert_eq!(anguria.revenue, Decimal::new(1200, 2));

        let porchetta = report
            .per_dish
            .iter()
            .find(|row| row.id == "d1")
            .ok_or("missing d1 row")?;

        assert_eq!(porchetta.quantity, 3, "the cancelled order is skipped");
        assert_eq!(porchetta.name, "Porchetta");

        Ok(())
    }

    #[test]
    fn detail_lines_are_sorted_by_time_of_day() -> TestResult {
        let dishes = vec![dish("d1", "Porchetta", DishCategory::Porchetta)];
        let orders = vec![
            order(
                "o1",
                "2025-09-12T20:15:00Z",
                OrderStatus::Pagato,
                vec![item("d1", Decimal::new(800, 2), 1)],
            ),
            order(
                "o2",
                "2025-09-12T18:05:00Z",
                OrderStatus::Pagato,
                vec![item("d1", Decimal::new(800, 2), 1)],
            ),
        ];

        let report = day_report(&orders, &dishes, &"2025-09-12".parse()?, &TimeZone::UTC);
        let row = report.per_dish.first().ok_or("missing row")?;
        let times: Vec<&str> = row.lines.iter().map(|line| line.time.as_str()).collect();

        assert_eq!(times, ["18:05", "20:15"]);

        Ok(())
    }

    #[test]
    fn per_category_skips_lines_whose_dish_is_gone() -> TestResult {
        let dishes = vec![dish("d1", "Porchetta", DishCategory::Porchetta)];
        let orders = vec![order(
            "o1",
            "2025-09-12T18:00:00Z",
            OrderStatus::Pagato,
            vec![
                item("d1", Decimal::new(800, 2), 2),
                item("ghost", Decimal::new(100, 2), 9),
            ],
        )];

        let report = day_report(&orders, &dishes, &"2025-09-12".parse()?, &TimeZone::UTC);

        assert_eq!(report.per_category.len(), 1);

        let porchetta = report.per_category.first().ok_or("missing category")?;

        assert_eq!(porchetta.category, DishCategory::Porchetta);
        assert_eq!(porchetta.quantity, 2);

        // The unknown dish still shows up in the per-dish view, under its id.
        assert!(report.per_dish.iter().any(|row| row.name == "ghost"));

        Ok(())
    }

    #[test]
    fn other_days_are_excluded() -> TestResult {
        let dishes = vec![dish("d1", "Porchetta", DishCategory::Porchetta)];
        let orders = vec![order(
            "o1",
            "2025-09-11T18:00:00Z",
            OrderStatus::Pagato,
            vec![item("d1", Decimal::new(800, 2), 2)],
        )];

        let report = day_report(&orders, &dishes, &"2025-09-12".parse()?, &TimeZone::UTC);

        assert!(report.per_dish.is_empty());
        assert!(report.per_category.is_empty());

        Ok(())
    }
}
