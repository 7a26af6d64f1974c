use clap::Parser;
use tracing_subscriber::EnvFilter;

use cmorph_sync::cli::Cli;
use cmorph_sync::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = Config::from_cli(cli)?;
    cmorph_sync::run(&config).await?;
    Ok(())
}
