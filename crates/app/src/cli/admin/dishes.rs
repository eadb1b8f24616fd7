use clap::{ArgAction, Args, Subcommand};
use rust_decimal::Decimal;
use tabled::{Table, Tabled};

use sagra::catalog::{self, Dish, DishDraft};
use sagra::money::format_eur;
use sagra_app::config::AppConfig;
use sagra_app::domain::dishes::DishesService;

use super::super::{admin_api, open_storage, parse_category};

#[derive(Debug, Args)]
pub(crate) struct DishesCommand {
    #[command(subcommand)]
    command: DishesSubcommand,
}

#[derive(Debug, Subcommand)]
enum DishesSubcommand {
    /// List the catalog, with search and pagination
    List(ListArgs),
    /// Create a dish
    Create(FormArgs),
    /// Update a dish in full
    Update(UpdateArgs),
    /// Delete a dish
    Delete(IdArgs),
    /// Flip the availability switch
    Toggle(ToggleArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive search over name and description; shows all
    /// matches on one page
    #[arg(long)]
    search: Option<String>,

    /// 1-based page
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Page size
    #[arg(long, default_value_t = 10)]
    per_page: usize,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// Dish name
    #[arg(long)]
    name: String,

    /// Dish description
    #[arg(long, default_value = "")]
    description: String,

    /// Unit price in euros
    #[arg(long)]
    price: Decimal,

    /// Category wire code, e.g. PIZZE_FRITTE
    #[arg(long)]
    category: String,

    /// Image URI
    #[arg(long)]
    image: String,

    /// Create the dish hidden from the storefront
    #[arg(long)]
    unavailable: bool,

    /// Restrict ordering to these days (repeatable)
    #[arg(long = "date")]
    dates: Vec<String>,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Dish id
    id: String,

    #[command(flatten)]
    form: FormArgs,
}

#[derive(Debug, Args)]
struct IdArgs {
    /// Dish id
    id: String,
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Dish id
    id: String,

    /// New availability value
    #[arg(long, action = ArgAction::Set)]
    available: bool,
}

#[derive(Tabled)]
struct DishRow {
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Piatto")]
    name: String,
    #[tabled(rename = "Prezzo")]
    price: String,
    #[tabled(rename = "Categoria")]
    category: &'static str,
    #[tabled(rename = "Disponibile")]
    available: &'static str,
    #[tabled(rename = "Giorni")]
    dates: String,
}

pub(crate) async fn run(config: &AppConfig, command: DishesCommand) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = admin_api(config, &storage)?;
    let mut desk = DishesService::open(&api, &storage);

    match command.command {
        DishesSubcommand::List(args) => {
            desk.refresh()
                .await
                .map_err(|error| format!("failed to fetch dishes: {error}"))?;

            render(desk.dishes(), &args);

            Ok(())
        }
        DishesSubcommand::Create(args) => {
            let draft = draft_from(&args)?;
            let created = desk
                .create(&draft)
                .await
                .map_err(|error| error.to_string())?;

            println!("Piatto creato: {} ({})", created.name, created.id);

            Ok(())
        }
        DishesSubcommand::Update(args) => {
            let draft = draft_from(&args.form)?;

            desk.update(&args.id, &draft)
                .await
                .map_err(|error| error.to_string())?;

            println!("Piatto aggiornato: {}", args.id);

            Ok(())
        }
        DishesSubcommand::Delete(args) => {
            desk.delete(&args.id)
                .await
                .map_err(|error| {
                    format!("Non è stato possibile eliminare il piatto. Riprova. ({error})")
                })?;

            println!("Piatto eliminato: {}", args.id);

            Ok(())
        }
        DishesSubcommand::Toggle(args) => {
            desk.refresh()
                .await
                .map_err(|error| format!("failed to fetch dishes: {error}"))?;

            desk.toggle_availability(&args.id, args.available)
                .await
                .map_err(|error| {
                    format!(
                        "Non è stato possibile aggiornare la disponibilità del piatto. ({error})"
                    )
                })?;

            println!(
                "Il piatto {} è ora {}",
                args.id,
                if args.available {
                    "disponibile"
                } else {
                    "non disponibile"
                }
            );

            Ok(())
        }
    }
}

fn draft_from(args: &FormArgs) -> Result<DishDraft, String> {
    let category = parse_category(&args.category)?;

    let mut draft = DishDraft {
        name: args.name.clone(),
        description: args.description.clone(),
        price: args.price,
        category: Some(category),
        image: args.image.clone(),
        available: !args.unavailable,
        available_dates: Vec::new(),
    };

    for raw in &args.dates {
        draft
            .add_date(raw)
            .map_err(|error| error.message.clone())?;
    }

    Ok(draft)
}

fn render(dishes: &[Dish], args: &ListArgs) {
    let matches = catalog::search(dishes, args.search.as_deref().unwrap_or_default());

    // An active search shows everything on one page.
    let (page_dishes, pages) = if args.search.is_some() {
        (matches.as_slice(), 1)
    } else {
        (
            catalog::page_slice(&matches, args.page, args.per_page),
            catalog::page_count(matches.len(), args.per_page),
        )
    };

    if page_dishes.is_empty() {
        println!("Nessun piatto trovato.");
        return;
    }

    let rows: Vec<DishRow> = page_dishes
        .iter()
        .map(|dish| DishRow {
            id: dish.id.clone(),
            name: dish.name.clone(),
            price: format_eur(dish.price),
            category: dish.category.label(),
            available: if dish.available { "sì" } else { "no" },
            dates: dish
                .available_dates
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("Pagina {} di {pages}", args.page.min(pages));
}
