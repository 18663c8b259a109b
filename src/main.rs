use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mindsync::app::AppContext;
use mindsync::cli::{commands, Cli, Commands};
use mindsync::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::load(cli.config.as_deref())?);
    let ctx = AppContext::new(config)?;

    match cli.command() {
        Commands::Sync => {
            commands::sync(&ctx, cli.force).await?;
        }
        Commands::List => {
            commands::list(&ctx)?;
        }
    }

    Ok(())
}
