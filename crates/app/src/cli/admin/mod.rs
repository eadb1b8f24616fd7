use clap::{Args, Subcommand};

use sagra_app::config::AppConfig;

mod dishes;
mod login;
mod orders;
mod report;

#[derive(Debug, Args)]
pub(crate) struct AdminCommand {
    #[command(subcommand)]
    command: AdminSubcommand,
}

#[derive(Debug, Subcommand)]
enum AdminSubcommand {
    /// Log in and store the bearer token
    Login(login::LoginArgs),
    /// Forget the stored bearer token
    Logout,
    /// Manage orders
    Orders(orders::OrdersCommand),
    /// Manage the dish catalog
    Dishes(dishes::DishesCommand),
    /// Per-day sales report
    Report(report::ReportArgs),
}

pub(crate) async fn run(config: &AppConfig, command: AdminCommand) -> Result<(), String> {
    match command.command {
        AdminSubcommand::Login(args) => login::run(config, args).await,
        AdminSubcommand::Logout => login::logout(config),
        AdminSubcommand::Orders(command) => orders::run(config, command).await,
        AdminSubcommand::Dishes(command) => dishes::run(config, command).await,
        AdminSubcommand::Report(args) => report::run(config, args).await,
    }
}
