use clap::Args;
use tabled::{Table, Tabled};

use sagra::money::format_eur;
use sagra::orders::Order;
use sagra_app::api::OrderingApi;
use sagra_app::config::AppConfig;
use sagra_app::domain::cart::CartStore;
use sagra_app::domain::checkout::CheckoutService;

use super::{api, open_storage};

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name attached to the order
    #[arg(long)]
    name: String,
}

#[derive(Debug, Args)]
pub(crate) struct ReceiptArgs {
    /// Order id; defaults to the last submitted order
    id: Option<String>,
}

pub(crate) async fn checkout(config: &AppConfig, args: CheckoutArgs) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = api(config);

    let mut cart = CartStore::open(&storage);
    let service = CheckoutService::new(&api, &storage);

    let order = service
        .submit(&mut cart, &args.name)
        .await
        .map_err(|error| format!("Non è stato possibile confermare l'ordine. Riprova. ({error})"))?;

    println!("Ordine confermato! Codice #{}", order.code);
    println!("Ritira e paga alla cassa. Scontrino: `sagra-app receipt {}`", order.id);

    Ok(())
}

#[derive(Tabled)]
struct ReceiptRow {
    #[tabled(rename = "Piatto")]
    name: String,
    #[tabled(rename = "Quantità")]
    quantity: u64,
    #[tabled(rename = "Importo")]
    amount: String,
}

pub(crate) async fn receipt(config: &AppConfig, args: ReceiptArgs) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = api(config);

    let id = match args.id {
        Some(id) => id,
        None => CheckoutService::new(&api, &storage)
            .last_order()
            .map(|last| last.id)
            .ok_or_else(|| "no recent order on this device; pass an order id".to_string())?,
    };

    let order = api
        .get_order(&id)
        .await
        .map_err(|error| format!("failed to fetch the order: {error}"))?;

    match order {
        Some(order) => render(&order),
        None => println!("Ordine non trovato."),
    }

    Ok(())
}

fn render(order: &Order) {
    println!("Scontrino Digitale | Ordine #{}", order.code);
    println!("Nome: {}", order.name);
    println!("Stato: {}", order.status.label());
    println!("Creato: {}", order.created_at);

    let rows: Vec<ReceiptRow> = order
        .items
        .iter()
        .map(|item| ReceiptRow {
            name: item.name.clone(),
            quantity: item.quantity,
            amount: format_eur(item.price * rust_decimal::Decimal::from(item.quantity)),
        })
        .collect();

    println!("{}", Table::new(rows));
    println!("Totale: {}", format_eur(order.total));
    println!("Il pagamento avviene alla cassa al momento del ritiro");
}
