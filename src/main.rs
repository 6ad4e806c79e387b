use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use local_time::{Args, Server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ServerConfig::from_args(args)?;
    let server = Server::bind(config)
        .await
        .context("failed to start server")?;

    server.run().await.context("server stopped")?;

    Ok(())
}
