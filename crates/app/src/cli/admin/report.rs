use clap::Args;
use jiff::tz::TimeZone;
use tabled::{Table, Tabled};

use sagra::dates::ServiceDate;
use sagra::money::format_eur;
use sagra::reports::day_report;
use sagra_app::config::AppConfig;
use sagra_app::domain::dishes::DishesService;
use sagra_app::domain::orders::OrdersService;

use super::super::{admin_api, open_storage, today};

#[derive(Debug, Args)]
pub(crate) struct ReportArgs {
    /// Service day (defaults to today)
    #[arg(long)]
    day: Option<ServiceDate>,
}

#[derive(Tabled)]
struct DishReportRow {
    #[tabled(rename = "Piatto")]
    name: String,
    #[tabled(rename = "Quantità")]
    quantity: u64,
    #[tabled(rename = "Ricavo")]
    revenue: String,
}

#[derive(Tabled)]
struct CategoryReportRow {
    #[tabled(rename = "Categoria")]
    label: &'static str,
    #[tabled(rename = "Quantità")]
    quantity: u64,
    #[tabled(rename = "Ricavo")]
    revenue: String,
}

pub(crate) async fn run(config: &AppConfig, args: ReportArgs) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = admin_api(config, &storage)?;

    let mut board = OrdersService::open(&api, &storage);
    let mut desk = DishesService::open(&api, &storage);

    board
        .refresh()
        .await
        .map_err(|error| format!("failed to fetch orders: {error}"))?;
    desk.refresh()
        .await
        .map_err(|error| format!("failed to fetch dishes: {error}"))?;

    let day = args.day.unwrap_or_else(today);
    let report = day_report(board.orders(), desk.dishes(), &day, &TimeZone::system());

    println!("Report del {day}");

    if report.per_dish.is_empty() {
        println!("Nessun ordine per questo giorno.");
        return Ok(());
    }

    let dish_rows: Vec<DishReportRow> = report
        .per_dish
        .iter()
        .map(|row| DishReportRow {
            name: row.name.clone(),
            quantity: row.quantity,
            revenue: format_eur(row.revenue),
        })
        .collect();

    println!("\nPer piatto");
    println!("{}", Table::new(dish_rows));

    let category_rows: Vec<CategoryReportRow> = report
        .per_category
        .iter()
        .map(|row| CategoryReportRow {
            label: row.category.label(),
            quantity: row.quantity,
            revenue: format_eur(row.revenue),
        })
        .collect();

    println!("\nPer categoria");
    println!("{}", Table::new(category_rows));

    Ok(())
}
