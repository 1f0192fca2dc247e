use anyhow::Result;
use clap::Parser;
use minify_cli::{cli::Cli, commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    dotenv::dotenv().ok();

    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    commands::sync::handle(cli).await
}
