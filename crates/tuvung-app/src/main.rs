use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod cli;
pub mod commands;
pub mod state;

use self::cli::{Cli, Command};
use self::state::{AppState, load_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries the results
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tuvung=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {e}");
    }

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    let state = AppState::new(config);

    match &cli.command {
        Command::Lookup(args) => commands::handle_lookup(&state, args).await,
        Command::Chat { message } => commands::handle_chat(&state, &message.join(" ")).await,
        Command::List => commands::handle_list(&state).await,
    }
}
