use anyhow::Result;
use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use self::args::{Command, Parser};

mod args;
mod scripts;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Parser::parse().command {
        Command::Deploy { config } => scripts::deploy(&config).map(drop),
        Command::Interact {
            config,
            contract,
            amount,
        } => scripts::interact(&config, contract.as_deref(), amount)
            .await
            .map(drop),
    }
}
