//! Dish catalog: categories, dishes and the admin dish form.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dates::{self, ServiceDate};

/// Fixed set of menu categories, in menu display order.
///
/// Serialized with the wire codes used by the ordering API (`"SFIZI"`,
/// `"PIZZE_FRITTE"`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DishCategory {
    /// Sfizi
    Sfizi,
    /// Primi piatti e antichi sapori
    Primi,
    /// Pizze fritte
    PizzeFritte,
    /// Porchetta
    Porchetta,
    /// Arrosti
    Arrosti,
    /// Frutta e dolci
    FruttaDolci,
    /// Bibite
    Bibite,
    /// Vini in bottiglia
    Vini,
    /// Birre
    Birre,
}

impl DishCategory {
    /// All categories, in menu display order.
    pub const ALL: [Self; 9] = [
        Self::Sfizi,
        Self::Primi,
        Self::PizzeFritte,
        Self::Porchetta,
        Self::Arrosti,
        Self::FruttaDolci,
        Self::Bibite,
        Self::Vini,
        Self::Birre,
    ];

    /// Customer-facing Italian label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Sfizi => "Sfizi",
            Self::Primi => "Primi Piatti e Antichi Sapori",
            Self::PizzeFritte => "Pizze Fritte",
            Self::Porchetta => "Porchetta",
            Self::Arrosti => "Arrosti",
            Self::FruttaDolci => "Frutta e Dolci",
            Self::Bibite => "Bibite",
            Self::Vini => "Vini (bottiglia)",
            Self::Birre => "Birre",
        }
    }

    /// Wire code as sent by the ordering API.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Sfizi => "SFIZI",
            Self::Primi => "PRIMI",
            Self::PizzeFritte => "PIZZE_FRITTE",
            Self::Porchetta => "PORCHETTA",
            Self::Arrosti => "ARROSTI",
            Self::FruttaDolci => "FRUTTA_DOLCI",
            Self::Bibite => "BIBITE",
            Self::Vini => "VINI",
            Self::Birre => "BIRRE",
        }
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog entry. Created and edited exclusively through the admin API;
/// the storefront only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Opaque, stable identifier assigned by the API.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    #[serde(default)]
    pub description: String,
    /// Unit price, non-negative.
    pub price: Decimal,
    /// Menu category.
    pub category: DishCategory,
    /// Image URI.
    pub image: String,
    /// Admin-controlled master availability switch.
    pub available: bool,
    /// Calendar days on which the dish may be ordered; absent or empty
    /// means every day, subject to `available`.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_lenient_dates",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_dates: Option<Vec<ServiceDate>>,
    /// Legacy single-date field, kept aligned to the first available date
    /// for older API deployments.
    #[serde(
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub available_on: Option<ServiceDate>,
}

/// One field-level problem found while validating a [`DishDraft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field the message belongs to.
    pub field: &'static str,
    /// Customer-facing message, in Italian like the rest of the admin UI.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation outcome of a [`DishDraft`], one entry per offending field.
#[derive(Debug, Clone, Error)]
#[error("{}", join_errors(.0))]
pub struct DishValidationErrors(pub Vec<FieldError>);

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Admin dish form state. Dates are held as raw strings until validation so
/// the form can report exactly which entry is malformed.
#[derive(Debug, Clone, Default)]
pub struct DishDraft {
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Unit price.
    pub price: Decimal,
    /// Menu category.
    pub category: Option<DishCategory>,
    /// Image URI.
    pub image: String,
    /// Master availability switch.
    pub available: bool,
    /// Raw date entries, kept sorted and deduplicated.
    pub available_dates: Vec<String>,
}

impl DishDraft {
    /// Pre-fills the form from an existing dish, for editing.
    #[must_use]
    pub fn from_dish(dish: &Dish) -> Self {
        let available_dates = dish
            .available_dates
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(ServiceDate::to_string)
            .collect();

        Self {
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price,
            category: Some(dish.category),
            image: dish.image.clone(),
            available: dish.available,
            available_dates,
        }
    }

    /// Adds a date entry, keeping the list sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Rejects input that is not a valid `YYYY-MM-DD` day.
    pub fn add_date(&mut self, raw: &str) -> Result<(), FieldError> {
        let parsed: ServiceDate = raw.parse().map_err(|_| FieldError {
            field: "availableDates",
            message: "Data non valida".to_string(),
        })?;

        let canonical = parsed.to_string();

        if !self.available_dates.contains(&canonical) {
            self.available_dates.push(canonical);
            self.available_dates.sort();
        }

        Ok(())
    }

    /// Removes a date entry; no-op when absent.
    pub fn remove_date(&mut self, date: &str) {
        self.available_dates.retain(|entry| entry != date);
    }

    /// Validates the form, collecting one message per offending field.
    /// No request may be sent while this fails.
    ///
    /// # Errors
    ///
    /// Returns every field-level problem at once.
    pub fn validate(&self) -> Result<(), DishValidationErrors> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError {
                field: "name",
                message: "Il nome è obbligatorio".to_string(),
            });
        }

        if self.price <= Decimal::ZERO {
            errors.push(FieldError {
                field: "price",
                message: "Il prezzo deve essere maggiore di zero".to_string(),
            });
        }

        if self.image.trim().is_empty() {
            errors.push(FieldError {
                field: "image",
                message: "L'URL dell'immagine è obbligatorio".to_string(),
            });
        }

        if self.category.is_none() {
            errors.push(FieldError {
                field: "category",
                message: "La categoria è obbligatoria".to_string(),
            });
        }

        if let Some(invalid) = self
            .available_dates
            .iter()
            .find(|raw| raw.parse::<ServiceDate>().is_err())
        {
            errors.push(FieldError {
                field: "availableDates",
                message: format!("Data non valida: {invalid}"),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DishValidationErrors(errors))
        }
    }

    /// Validated date list, sorted ascending.
    ///
    /// Call only after [`DishDraft::validate`] has passed; entries that do
    /// not parse are skipped.
    #[must_use]
    pub fn service_dates(&self) -> Vec<ServiceDate> {
        self.available_dates
            .iter()
            .filter_map(|raw| raw.parse().ok())
            .collect()
    }
}

/// Case-insensitive substring search over dish name and description.
/// An empty query matches everything.
#[must_use]
pub fn search<'a>(dishes: &'a [Dish], query: &str) -> Vec<&'a Dish> {
    let needle = query.to_lowercase();

    dishes
        .iter()
        .filter(|dish| {
            dish.name.to_lowercase().contains(&needle)
                || dish.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of pages needed to show `len` entries, `per_page` at a time.
/// Always at least one page.
#[must_use]
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 1;
    }

    len.div_ceil(per_page).max(1)
}

/// The 1-based `page` slice of `items`; out-of-range pages are empty.
#[must_use]
pub fn page_slice<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(items.len());

    items.get(start..end).unwrap_or_default()
}

/// Groups dishes by category, in menu display order, skipping empty
/// categories.
#[must_use]
pub fn by_category(dishes: &[Dish]) -> Vec<(DishCategory, Vec<&Dish>)> {
    DishCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let in_category: Vec<&Dish> = dishes
                .iter()
                .filter(|dish| dish.category == category)
                .collect();

            if in_category.is_empty() {
                None
            } else {
                Some((category, in_category))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::{Dish, DishCategory, DishDraft, by_category, page_count, page_slice, search};

    fn dish(id: &str, name: &str, category: DishCategory) -> Dish {
        Dish {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: Decimal::new(500, 2),
            category,
            image: format!("/images/{id}.webp"),
            available: true,
            available_dates: None,
            available_on: None,
        }
    }

    fn valid_draft() -> DishDraft {
        DishDraft {
            name: "Pizza Fritta".to_string(),
            description: "Con mortadella".to_string(),
            price: Decimal::new(650, 2),
            category: Some(DishCategory::PizzeFritte),
            image: "/images/pizza.webp".to_string(),
            available: true,
            available_dates: Vec::new(),
        }
    }

    #[test]
    fn category_codes_round_trip_through_serde() -> TestResult {
        let encoded = serde_json::to_string(&DishCategory::PizzeFritte)?;

        assert_eq!(encoded, "\"PIZZE_FRITTE\"");

        let decoded: DishCategory = serde_json::from_str("\"FRUTTA_DOLCI\"")?;

        assert_eq!(decoded, DishCategory::FruttaDolci);

        Ok(())
    }

    #[test]
    fn draft_validation_collects_per_field_messages() -> TestResult {
        let draft = DishDraft {
            name: "  ".to_string(),
            price: Decimal::ZERO,
            image: String::new(),
            ..valid_draft()
        };

        let errors = draft
            .validate()
            .err()
            .ok_or("expected validation to fail")?
            .0;

        let fields: Vec<&str> = errors.iter().map(|error| error.field).collect();

        assert_eq!(fields, ["name", "price", "image"]);
        assert!(
            errors
                .iter()
                .any(|error| error.message == "Il prezzo deve essere maggiore di zero"),
            "price message should match the admin form"
        );

        Ok(())
    }

    #[test]
    fn draft_validation_reports_malformed_dates() -> TestResult {
        let mut draft = valid_draft();
        draft.available_dates = vec!["2025-09-12".to_string(), "12 settembre".to_string()];

        let errors = draft
            .validate()
            .err()
            .ok_or("expected validation to fail")?
            .0;

        assert_eq!(
            errors.first().map(|error| error.message.as_str()),
            Some("Data non valida: 12 settembre")
        );

        Ok(())
    }

    #[test]
    fn add_date_keeps_the_list_sorted_and_deduplicated() -> TestResult {
        let mut draft = valid_draft();

        draft.add_date("2025-09-14")?;
        draft.add_date("2025-09-12")?;
        draft.add_date("2025-09-14")?;

        assert_eq!(draft.available_dates, ["2025-09-12", "2025-09-14"]);

        draft.remove_date("2025-09-12");

        assert_eq!(draft.available_dates, ["2025-09-14"]);

        Ok(())
    }

    #[test]
    fn search_matches_name_and_description_case_insensitively() {
        let mut porchetta = dish("d1", "Porchetta", DishCategory::Porchetta);
        porchetta.description = "Cotta a legna".to_string();
        let dishes = vec![porchetta, dish("d2", "Anguria", DishCategory::FruttaDolci)];

        assert_eq!(search(&dishes, "PORCH").len(), 1);
        assert_eq!(search(&dishes, "legna").len(), 1);
        assert_eq!(search(&dishes, "").len(), 2);
        assert!(search(&dishes, "tiramisù").is_empty());
    }

    #[test]
    fn pagination_slices_one_based_pages() {
        let items: Vec<u32> = (0..25).collect();

        assert_eq!(page_count(items.len(), 10), 3);
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_slice(&items, 1, 10).len(), 10);
        assert_eq!(page_slice(&items, 3, 10), [20, 21, 22, 23, 24]);
        assert!(page_slice(&items, 4, 10).is_empty());
    }

    #[test]
    fn grouping_follows_menu_order_and_skips_empty_categories() {
        let dishes = vec![
            dish("d1", "Anguria", DishCategory::FruttaDolci),
            dish("d2", "Sfizio", DishCategory::Sfizi),
            dish("d3", "Porchetta", DishCategory::Porchetta),
        ];

        let grouped = by_category(&dishes);
        let order: Vec<DishCategory> = grouped.iter().map(|(category, _)| *category).collect();

        assert_eq!(
            order,
            [
                DishCategory::Sfizi,
                DishCategory::Porchetta,
                DishCategory::FruttaDolci
            ]
        );
    }
}
