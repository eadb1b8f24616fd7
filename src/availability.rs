//! Dish availability rules and date labels.
//!
//! Pure computation: "today" is always injected by the caller, never read
//! from a clock.

use crate::catalog::Dish;
use crate::dates::ServiceDate;

const MONTH_NAMES: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

/// Whether the dish can be ordered on `today`.
///
/// The master switch always wins; with no date list the dish is orderable
/// every day; otherwise only on a listed day.
#[must_use]
pub fn is_orderable(dish: &Dish, today: &ServiceDate) -> bool {
    if !dish.available {
        return false;
    }

    match dish.available_dates.as_deref() {
        None | Some([]) => true,
        Some(dates) => dates.contains(today),
    }
}

/// The date to show next to a dish with a date list: the earliest day on or
/// after `today`, falling back to the most recent past day rather than
/// nothing. `None` when the dish has no date list.
#[must_use]
pub fn display_date(dish: &Dish, today: &ServiceDate) -> Option<ServiceDate> {
    let dates = match dish.available_dates.as_deref() {
        None | Some([]) => return None,
        Some(dates) => dates,
    };

    dates
        .iter()
        .filter(|date| *date >= today)
        .min()
        .or_else(|| dates.iter().max())
        .cloned()
}

/// Customer-facing label for an availability date: `"oggi"`, `"domani"`, or
/// an Italian day-and-month form such as `"12 settembre"`.
#[must_use]
pub fn date_label(date: &ServiceDate, today: &ServiceDate) -> String {
    if date == today {
        return "oggi".to_string();
    }

    if today.next_day().as_ref() == Some(date) {
        return "domani".to_string();
    }

    let civil = date.civil();
    let month = usize::try_from(civil.month())
        .ok()
        .and_then(|month| MONTH_NAMES.get(month.wrapping_sub(1)))
        .copied()
        .unwrap_or_default();

    format!("{} {month}", civil.day())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::catalog::{Dish, DishCategory};
    use crate::dates::ServiceDate;

    use super::{date_label, display_date, is_orderable};

    fn dish(available: bool, dates: &[&str]) -> Dish {
        let available_dates = if dates.is_empty() {
            None
        } else {
            Some(dates.iter().filter_map(|raw| raw.parse().ok()).collect())
        };

        Dish {
            id: "d1".to_string(),
            name: "Pizza Fritta".to_string(),
            description: String::new(),
            price: Decimal::new(650, 2),
            category: DishCategory::PizzeFritte,
            image: String::new(),
            available,
            available_dates,
            available_on: None,
        }
    }

    #[test]
    fn master_switch_always_wins() -> TestResult {
        let today: ServiceDate = "2025-09-12".parse()?;

        assert!(!is_orderable(&dish(false, &[]), &today));
        assert!(!is_orderable(&dish(false, &["2025-09-12"]), &today));

        Ok(())
    }

    #[test]
    fn no_date_list_means_every_day() -> TestResult {
        let today: ServiceDate = "2025-09-12".parse()?;

        assert!(is_orderable(&dish(true, &[]), &today));

        Ok(())
    }

    #[test]
    fn dated_dish_is_orderable_only_on_listed_days() -> TestResult {
        let listed = dish(true, &["2025-09-12"]);

        assert!(is_orderable(&listed, &"2025-09-12".parse()?));
        assert!(!is_orderable(&listed, &"2025-09-13".parse()?));

        Ok(())
    }

    #[test]
    fn display_date_prefers_the_earliest_upcoming_day() -> TestResult {
        let today: ServiceDate = "2025-09-12".parse()?;
        let listed = dish(true, &["2025-09-20", "2025-09-14", "2025-09-01"]);

        assert_eq!(
            display_date(&listed, &today),
            Some("2025-09-14".parse()?),
            "earliest day on or after today"
        );

        Ok(())
    }

    #[test]
    fn display_date_falls_back_to_the_most_recent_past_day() -> TestResult {
        let today: ServiceDate = "2025-09-12".parse()?;
        let listed = dish(true, &["2025-09-01", "2025-09-05"]);

        assert_eq!(
            display_date(&listed, &today),
            Some("2025-09-05".parse()?),
            "latest past day rather than nothing"
        );

        Ok(())
    }

    #[test]
    fn labels_for_today_tomorrow_and_other_days() -> TestResult {
        let today: ServiceDate = "2025-09-12".parse()?;

        assert_eq!(date_label(&"2025-09-12".parse()?, &today), "oggi");
        assert_eq!(date_label(&"2025-09-13".parse()?, &today), "domani");
        assert_eq!(date_label(&"2025-09-20".parse()?, &today), "20 settembre");

        Ok(())
    }
}
