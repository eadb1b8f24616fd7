use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use jiff::tz::TimeZone;
use tabled::{Table, Tabled};
use tracing::warn;

use sagra::dates::ServiceDate;
use sagra::money::format_eur;
use sagra::orders::{
    Order, OrderFilter, OrderSortField, OrderStatus, SortDirection, item_count, sort_orders,
};
use sagra_app::config::AppConfig;
use sagra_app::domain::orders::OrdersService;

use super::super::{admin_api, open_storage};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, with client-side filters
    List(ListArgs),
    /// Poll the order list on a fixed interval
    Watch(WatchArgs),
    /// Request a status transition
    SetStatus(SetStatusArgs),
    /// Send an order to the counter printer
    Print(PrintArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Only orders in this status (da-pagare, pagato, annullato)
    #[arg(long)]
    status: Option<OrderStatus>,

    /// Only orders created on these days (repeatable)
    #[arg(long = "day")]
    days: Vec<ServiceDate>,

    /// Inclusive start of a day range
    #[arg(long)]
    from: Option<ServiceDate>,

    /// Inclusive end of a day range
    #[arg(long)]
    to: Option<ServiceDate>,

    /// Sort column
    #[arg(long, value_enum, default_value_t = SortArg::CreatedAt)]
    sort: SortArg,

    /// Sort ascending instead of descending
    #[arg(long)]
    asc: bool,
}

#[derive(Debug, Args)]
struct WatchArgs {
    /// Seconds between refreshes
    #[arg(long, default_value_t = 3)]
    interval: u64,
}

#[derive(Debug, Args)]
struct SetStatusArgs {
    /// Order id
    id: String,

    /// Target status (pagato, annullato, da-pagare)
    status: OrderStatus,
}

#[derive(Debug, Args)]
struct PrintArgs {
    /// Order id
    id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    CreatedAt,
    Total,
    Items,
}

impl From<SortArg> for OrderSortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::CreatedAt => Self::CreatedAt,
            SortArg::Total => Self::Total,
            SortArg::Items => Self::ItemCount,
        }
    }
}

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "Codice")]
    code: String,
    #[tabled(rename = "Nome")]
    name: String,
    #[tabled(rename = "Piatti")]
    items: u64,
    #[tabled(rename = "Totale")]
    total: String,
    #[tabled(rename = "Stato")]
    status: &'static str,
    #[tabled(rename = "Creato")]
    created_at: String,
    #[tabled(rename = "Id")]
    id: String,
}

pub(crate) async fn run(config: &AppConfig, command: OrdersCommand) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = admin_api(config, &storage)?;
    let mut board = OrdersService::open(&api, &storage);

    match command.command {
        OrdersSubcommand::List(args) => {
            board
                .refresh()
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            render(board.orders(), &args);

            Ok(())
        }
        OrdersSubcommand::Watch(args) => {
            let interval = Duration::from_secs(args.interval.max(1));
            let list_args = ListArgs {
                status: None,
                days: Vec::new(),
                from: None,
                to: None,
                sort: SortArg::CreatedAt,
                asc: false,
            };

            // Fixed-interval poll, no backoff: a failed fetch surfaces once
            // and the next tick tries again.
            loop {
                match board.refresh().await {
                    Ok(()) => render(board.orders(), &list_args),
                    Err(error) => warn!(%error, "order refresh failed"),
                }

                tokio::time::sleep(interval).await;
            }
        }
        OrdersSubcommand::SetStatus(args) => {
            board
                .refresh()
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            match board.set_status(&args.id, args.status).await {
                Ok(()) => {
                    println!(
                        "Ordine {} aggiornato a {}",
                        args.id,
                        args.status.label()
                    );

                    Ok(())
                }
                Err(error) => {
                    // The optimistic local change stays; the next refetch
                    // reconciles it.
                    Err(format!(
                        "Non è stato possibile aggiornare l'ordine. Riprova. ({error})"
                    ))
                }
            }
        }
        OrdersSubcommand::Print(args) => {
            board
                .print(&args.id)
                .await
                .map_err(|error| {
                    format!("Non è stato possibile stampare l'ordine. Riprova. ({error})")
                })?;

            println!("Ordine {} inviato alla stampante", args.id);

            Ok(())
        }
    }
}

fn render(orders: &[Order], args: &ListArgs) {
    let tz = TimeZone::system();

    let filter = OrderFilter {
        status: args.status,
        days: args.days.clone(),
        from: args.from.clone(),
        to: args.to.clone(),
    };

    let mut filtered: Vec<Order> = orders
        .iter()
        .filter(|order| filter.matches(order, &tz))
        .cloned()
        .collect();

    let direction = if args.asc {
        SortDirection::Asc
    } else {
        SortDirection::Desc
    };

    sort_orders(&mut filtered, args.sort.into(), direction);

    if filtered.is_empty() {
        println!("Nessun ordine trovato.");
        return;
    }

    let rows: Vec<OrderRow> = filtered
        .iter()
        .map(|order| OrderRow {
            code: format!("#{}", order.code),
            name: order.name.clone(),
            items: item_count(order),
            total: format_eur(order.total),
            status: order.status.label(),
            created_at: order.created_at.to_zoned(tz.clone()).to_string(),
            id: order.id.clone(),
        })
        .collect();

    println!("{}", Table::new(rows));
}
