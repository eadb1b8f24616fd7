use clap::Args;

use sagra_app::auth::AuthService;
use sagra_app::config::AppConfig;

use super::super::{api, open_storage};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Admin username
    #[arg(long)]
    username: String,

    /// Admin password
    #[arg(long, env = "SAGRA_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(config: &AppConfig, args: LoginArgs) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = api(config);

    AuthService::new(&api, &storage)
        .login(&args.username, &args.password)
        .await
        .map_err(|error| format!("login failed: {error}"))?;

    println!("Login effettuato");

    Ok(())
}

pub(crate) fn logout(config: &AppConfig) -> Result<(), String> {
    let storage = open_storage(config)?;
    let api = api(config);

    AuthService::new(&api, &storage)
        .logout()
        .map_err(|error| format!("logout failed: {error}"))?;

    println!("Token dimenticato");

    Ok(())
}
