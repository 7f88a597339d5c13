//! libre-probe - log in to LibreLinkUp and print the latest glucose reading.
//!
//! Credentials come from `--email`/`--password` or the `LIBRE_EMAIL`/
//! `LIBRE_PASSWORD` environment variables. Nothing is stored.

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use libre_probe::api::ApiClient;
use libre_probe::cli::Cli;
use libre_probe::config::Credentials;
use libre_probe::flow::{self, FlowOptions};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let credentials = match Credentials::resolve(cli.email, cli.password, Some(cli.region)) {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(region = %credentials.region, "Starting LibreLinkUp smoke test");

    let client = ApiClient::new()?;
    let options = FlowOptions {
        skip_graph: cli.skip_graph,
    };
    flow::run(&client, &credentials, options, &mut io::stdout()).await?;

    Ok(())
}
