use clap::{Parser, Subcommand};

use sagra::catalog::DishCategory;
use sagra::dates::ServiceDate;
use sagra_app::api::{ApiConfig, HttpOrderingApi};
use sagra_app::auth;
use sagra_app::config::AppConfig;
use sagra_app::logging;
use sagra_app::storage::ClientStorage;

mod admin;
mod cart;
mod menu;
mod order;

#[derive(Debug, Parser)]
#[command(name = "sagra-app", about = "Sagra storefront and admin CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the menu
    Menu(menu::MenuArgs),
    /// Manage the cart
    Cart(cart::CartCommand),
    /// Submit the cart as an order
    Checkout(order::CheckoutArgs),
    /// Look up an order receipt
    Receipt(order::ReceiptArgs),
    /// Administrative back-office
    Admin(admin::AdminCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        logging::init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        match self.command {
            Commands::Menu(args) => menu::run(&self.config, args).await,
            Commands::Cart(command) => cart::run(&self.config, command).await,
            Commands::Checkout(args) => order::checkout(&self.config, args).await,
            Commands::Receipt(args) => order::receipt(&self.config, args).await,
            Commands::Admin(command) => admin::run(&self.config, command).await,
        }
    }
}

pub(crate) fn open_storage(config: &AppConfig) -> Result<ClientStorage, String> {
    ClientStorage::open(&config.data_dir)
        .map_err(|error| format!("failed to open the data directory: {error}"))
}

pub(crate) fn api(config: &AppConfig) -> HttpOrderingApi {
    HttpOrderingApi::new(ApiConfig {
        base_url: config.api_url.clone(),
    })
}

/// Authenticated client for admin calls; requires a prior login.
pub(crate) fn admin_api(
    config: &AppConfig,
    storage: &ClientStorage,
) -> Result<HttpOrderingApi, String> {
    let token = auth::stored_token(storage)
        .ok_or_else(|| "not logged in: run `sagra-app admin login` first".to_string())?;

    Ok(api(config).with_token(token.as_str()))
}

/// Today's service day under the system time zone.
pub(crate) fn today() -> ServiceDate {
    ServiceDate::from_civil(jiff::Zoned::now().date())
}

/// Parses a category from its wire code, e.g. `PIZZE_FRITTE`.
pub(crate) fn parse_category(raw: &str) -> Result<DishCategory, String> {
    DishCategory::ALL
        .into_iter()
        .find(|category| category.code().eq_ignore_ascii_case(raw))
        .ok_or_else(|| format!("unknown category: {raw}"))
}
