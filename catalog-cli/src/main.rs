mod cli;
mod commands;

use catalog_client::{ClientConfig, TokenStore};
use clap::Parser;
use cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 必须在 clap 读取环境变量之前加载
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog=info,catalog_client=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let tokens = TokenStore::new(&cli.state_dir);

    match cli.command {
        Command::Login { token } => commands::login(&tokens, &config, &token),
        Command::Logout => commands::logout(&tokens, &config),
        Command::Whoami => commands::whoami(&tokens, &config),
        Command::Products(cmd) => commands::products(&config, &tokens, cmd).await,
        Command::Categories(cmd) => commands::categories(&config, &tokens, cmd).await,
        Command::Gallery(cmd) => commands::gallery(&config, &tokens, cmd).await,
    }
}
