use clap::Args;
use tabled::{Table, Tabled};

use sagra::availability::{date_label, display_date, is_orderable};
use sagra::catalog::{self, Dish};
use sagra::dates::ServiceDate;
use sagra::money::format_eur;
use sagra_app::api::OrderingApi;
use sagra_app::config::AppConfig;

use super::{api, parse_category, today};

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    /// Only show one category (wire code, e.g. PRIMI)
    #[arg(long)]
    category: Option<String>,
}

#[derive(Tabled)]
struct DishRow {
    #[tabled(rename = "Piatto")]
    name: String,
    #[tabled(rename = "Prezzo")]
    price: String,
    #[tabled(rename = "Disponibilità")]
    availability: String,
}

pub(crate) async fn run(config: &AppConfig, args: MenuArgs) -> Result<(), String> {
    let api = api(config);
    let dishes = api
        .list_dishes()
        .await
        .map_err(|error| format!("failed to fetch the menu: {error}"))?;

    let only = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;

    let today = today();

    for (category, in_category) in catalog::by_category(&dishes) {
        if only.is_some_and(|wanted| wanted != category) {
            continue;
        }

        let rows: Vec<DishRow> = in_category
            .iter()
            .map(|dish| dish_row(dish, &today))
            .collect();

        println!("\n{}", category.label());
        println!("{}", Table::new(rows));
    }

    Ok(())
}

fn dish_row(dish: &Dish, today: &ServiceDate) -> DishRow {
    let availability = if !dish.available {
        "Non Disponibile".to_string()
    } else if is_orderable(dish, today) {
        match display_date(dish, today) {
            Some(date) => date_label(&date, today),
            None => "oggi".to_string(),
        }
    } else {
        match display_date(dish, today) {
            Some(date) => date_label(&date, today),
            None => "Non Disponibile".to_string(),
        }
    };

    DishRow {
        name: dish.name.clone(),
        price: format_eur(dish.price),
        availability,
    }
}
