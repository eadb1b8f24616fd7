use clap::{Args, Subcommand};
use tabled::{Table, Tabled};

use sagra::availability::is_orderable;
use sagra::money::format_eur;
use sagra_app::api::OrderingApi;
use sagra_app::config::AppConfig;
use sagra_app::domain::cart::CartStore;

use super::{api, open_storage, today};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the current cart
    Show,
    /// Add one unit of a dish
    Add(AddArgs),
    /// Remove a line
    Remove(LineArgs),
    /// Set the absolute quantity of a line (zero removes it)
    Set(SetArgs),
    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Dish id as listed by `menu`
    dish_id: String,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Dish id of the line
    dish_id: String,
}

#[derive(Debug, Args)]
struct SetArgs {
    /// Dish id of the line
    dish_id: String,
    /// New absolute quantity
    quantity: i64,
}

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "Piatto")]
    name: String,
    #[tabled(rename = "Quantità")]
    quantity: u64,
    #[tabled(rename = "Prezzo")]
    price: String,
    #[tabled(rename = "Subtotale")]
    subtotal: String,
}

pub(crate) async fn run(config: &AppConfig, command: CartCommand) -> Result<(), String> {
    let storage = open_storage(config)?;
    let mut store = CartStore::open(&storage);

    match command.command {
        CartSubcommand::Show => {
            show(&store);
            Ok(())
        }
        CartSubcommand::Add(args) => {
            let api = api(config);
            let dishes = api
                .list_dishes()
                .await
                .map_err(|error| format!("failed to fetch the menu: {error}"))?;

            let dish = dishes
                .iter()
                .find(|dish| dish.id == args.dish_id)
                .ok_or_else(|| format!("no dish with id {}", args.dish_id))?;

            // Orderability is the caller's check; the store itself never
            // refuses an add.
            if !is_orderable(dish, &today()) {
                return Err(format!("{} non è disponibile oggi", dish.name));
            }

            store
                .add_item(dish)
                .map_err(|error| format!("failed to save the cart: {error}"))?;

            println!("Aggiunto: {}", dish.name);
            show(&store);

            Ok(())
        }
        CartSubcommand::Remove(args) => {
            store
                .remove_item(&args.dish_id)
                .map_err(|error| format!("failed to save the cart: {error}"))?;

            show(&store);

            Ok(())
        }
        CartSubcommand::Set(args) => {
            store
                .update_quantity(&args.dish_id, args.quantity)
                .map_err(|error| format!("failed to save the cart: {error}"))?;

            show(&store);

            Ok(())
        }
        CartSubcommand::Clear => {
            store
                .clear()
                .map_err(|error| format!("failed to save the cart: {error}"))?;

            println!("Carrello svuotato");

            Ok(())
        }
    }
}

fn show(store: &CartStore<'_>) {
    if store.is_empty() {
        println!("Il tuo carrello è vuoto");
        return;
    }

    let rows: Vec<CartRow> = store
        .items()
        .iter()
        .map(|item| CartRow {
            name: item.name.clone(),
            quantity: item.quantity,
            price: format_eur(item.price),
            subtotal: format_eur(item.price * rust_decimal::Decimal::from(item.quantity)),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("Totale: {}", format_eur(store.total()));
}
