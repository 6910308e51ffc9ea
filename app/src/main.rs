// In app/src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use core_types::{Interval, Symbol};
use engine::Pipeline;
use tracing_subscriber::prelude::*;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    author,
    version,
    about,
    long_about = "A crypto market dashboard: price bars, SMA/RSI/MACD and a BUY/SELL/HOLD signal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs one pass and prints the signal, latest bar and indicator table.
    Show {
        /// The symbol to show (e.g., "ETH-USD"). Defaults to the configured one.
        #[arg(short, long)]
        symbol: Option<String>,

        /// The bar interval (1m, 5m, 15m, 1h, 1d). Defaults to the configured one.
        #[arg(short, long)]
        interval: Option<String>,

        /// Maximum number of bars to keep.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Number of rows in the indicator table.
        #[arg(short, long)]
        rows: Option<usize>,
    },

    /// Serves the web dashboard on the configured host and port.
    Serve,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting crypto dashboard");

    match cli.command {
        Commands::Show {
            symbol,
            interval,
            limit,
            rows,
        } => handle_show(&settings, symbol, interval, limit, rows).await?,
        Commands::Serve => handle_serve(settings).await?,
    }

    Ok(())
}

/// Installs the fmt layer. Chatty HTTP internals are capped at WARN.
fn init_tracing(log_level: &str) {
    let default_level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(
            tracing_subscriber::filter::Targets::new()
                .with_target("hyper", tracing::Level::WARN)
                .with_target("reqwest", tracing::Level::WARN)
                .with_default(default_level),
        );
    tracing_subscriber::registry().with(fmt_layer).init();
}

// --- "Show" Subcommand Logic ---

async fn handle_show(
    settings: &app_config::Settings,
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<usize>,
    rows: Option<usize>,
) -> Result<()> {
    let dashboard = &settings.dashboard;

    let symbol = match symbol {
        Some(s) if dashboard.offers(&s) => Symbol(s),
        Some(s) => anyhow::bail!(
            "Unsupported symbol '{}'. Choose one of: {}",
            s,
            dashboard.symbols.join(", ")
        ),
        None => dashboard.default_symbol(),
    };
    let interval: Interval = match interval {
        Some(raw) => raw.parse()?,
        None => dashboard.interval()?,
    };
    let limit = limit.unwrap_or(dashboard.bar_limit);
    let rows = rows.unwrap_or(dashboard.table_rows);

    let pipeline = Pipeline::from_settings(settings)?;
    let snapshot = pipeline.run_with_limit(&symbol, interval, limit).await;

    print!("{}", report::render(&snapshot, rows));
    Ok(())
}

// --- "Serve" Subcommand Logic ---

async fn handle_serve(settings: app_config::Settings) -> Result<()> {
    let pipeline = Pipeline::from_settings(&settings)?;
    let state = web_server::AppState::new(pipeline, settings.dashboard.clone());

    web_server::run(&settings.server, state).await?;

    tracing::warn!("Web server has stopped.");
    Ok(())
}
