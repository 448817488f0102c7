//! Wine Quality Checker - local web form for red wine quality prediction
//!
//! # Usage
//!
//! ```bash
//! # Serve the form on http://127.0.0.1:8501
//! winecheck
//!
//! # Use another port and model artifacts
//! winecheck --port 8080 --scaler models/scaler.json --model models/wine_model.json
//!
//! # Print the ideal values table
//! winecheck ranges
//!
//! # Predict one sample from the command line
//! winecheck predict --set alcohol=12.5 --set sulphates=0.75
//!
//! # Write the current settings to the config file
//! winecheck --port 8080 config save
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use winecheck::cli::{ConfigArgs, PredictArgs, RangesArgs};
use winecheck::config::Config;
use winecheck::constants::APP_NAME;
use winecheck::web;

/// Wine Quality Checker - predict red wine quality from its chemistry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Fitted scaler artifact
    #[arg(long, value_name = "FILE", global = true)]
    scaler: Option<PathBuf>,

    /// Fitted classifier artifact
    #[arg(long, value_name = "FILE", global = true)]
    model: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ideal values table
    Ranges(RangesArgs),
    /// Predict a single sample
    Predict(PredictArgs),
    /// Show or save configuration
    Config(ConfigArgs),
}

/// Loads the config file and applies command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().context("Failed to load configuration")?,
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(host) = &cli.host {
        config.server.host.clone_from(host);
    }
    if let Some(scaler) = &cli.scaler {
        config.paths.scaler.clone_from(scaler);
    }
    if let Some(model) = &cli.model {
        config.paths.model.clone_from(model);
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = resolve_config(&cli)?;

    match &cli.command {
        Some(Command::Ranges(args)) => args.execute(),
        Some(Command::Predict(args)) => args.execute(&config),
        Some(Command::Config(args)) => args.execute(&config, cli.config.as_deref()),
        None => {
            info!("{} v{}", APP_NAME, env!("CARGO_PKG_VERSION"));
            info!(
                "Model artifacts: {} + {}",
                config.paths.scaler.display(),
                config.paths.model.display()
            );

            let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
                .parse()
                .context("Invalid host or port")?;

            web::run_server(config, addr).await
        }
    }
}
